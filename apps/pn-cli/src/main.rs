use clap::{Parser, Subcommand, ValueEnum};
use pn_app::{
    AppConfig, AppError, AppResult, DirectoryAssembler, PngCapture, ReplayService, Session, SvgCapture,
    export_report,
};
use pn_layout::{RenderMode, labels_fit, render_svg};
use pn_project::{Catalog, ProjectError, Scenario, load_any, validate_scenario};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// How long to wait for replayed responses.
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "pn-cli")]
#[command(about = "PumpNet CLI - pumping system schematics, requests and reports", long_about = None)]
struct Cli {
    /// Settings file (YAML); defaults apply when absent
    #[arg(long, global = true, default_value = "pumpnet.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file
    Validate {
        /// Path to the scenario (YAML or JSON)
        scenario: PathBuf,
    },
    /// Show the segments of a scenario by region
    Summary {
        /// Path to the scenario (YAML or JSON)
        scenario: PathBuf,
    },
    /// Print the calculation request for a scenario as JSON
    Request {
        /// Path to the scenario (YAML or JSON)
        scenario: PathBuf,
        #[arg(long, value_enum, default_value = "operating-point")]
        kind: RequestArg,
        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Lay out the schematic
    Layout {
        /// Path to the scenario (YAML or JSON)
        scenario: PathBuf,
        #[arg(long, value_enum, default_value = "svg")]
        format: LayoutFormat,
        /// Use print sizing (larger fonts, thicker strokes)
        #[arg(long)]
        print: bool,
        /// Recorded responses used to annotate segments
        #[arg(long)]
        responses: Option<PathBuf>,
        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export the merged head/NPSH chart series as CSV
    Chart {
        /// Path to the scenario (YAML or JSON)
        scenario: PathBuf,
        /// Recorded responses
        #[arg(long)]
        responses: PathBuf,
        /// Output CSV file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the built-in materials, diameters, fluids and fittings
    Catalog,
    /// Export a report (schematic, charts, summary) into a directory
    Report {
        /// Path to the scenario (YAML or JSON)
        scenario: PathBuf,
        /// Recorded responses
        #[arg(long)]
        responses: PathBuf,
        /// Output directory
        #[arg(short, long)]
        out: PathBuf,
        /// Rasterize figures to PNG instead of writing SVG
        #[arg(long)]
        png: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RequestArg {
    OperatingPoint,
    SystemCurve,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutFormat {
    Svg,
    Json,
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Validate { scenario } => cmd_validate(&scenario),
        Commands::Summary { scenario } => cmd_summary(&scenario),
        Commands::Request {
            scenario,
            kind,
            output,
        } => cmd_request(&scenario, kind, output.as_deref(), config),
        Commands::Layout {
            scenario,
            format,
            print,
            responses,
            output,
        } => cmd_layout(
            &scenario,
            format,
            print,
            responses.as_deref(),
            output.as_deref(),
            config,
        ),
        Commands::Chart {
            scenario,
            responses,
            output,
        } => cmd_chart(&scenario, &responses, output.as_deref(), config),
        Commands::Catalog => cmd_catalog(),
        Commands::Report {
            scenario,
            responses,
            out,
            png,
        } => cmd_report(&scenario, &responses, &out, png, config),
    }
}

fn load(path: &Path) -> AppResult<Scenario> {
    let scenario = load_any(path)?;
    validate_scenario(&scenario).map_err(ProjectError::from)?;
    Ok(scenario)
}

fn write_or_print(output: Option<&Path>, content: &str, what: &str) -> AppResult<()> {
    if let Some(path) = output {
        std::fs::write(path, content).map_err(|e| AppError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        println!("✓ Wrote {} to {}", what, path.display());
    } else {
        print!("{}", content);
    }
    Ok(())
}

/// Session backed by a response book, with both calculations applied.
fn replayed_session(scenario_path: &Path, book: &Path, config: AppConfig) -> AppResult<Session> {
    let scenario = load(scenario_path)?;
    let service = ReplayService::load(book)?;
    let mut session = Session::new(scenario, Arc::new(service), config)?;

    session.calculate();
    session.refresh_system_curve();
    let mut received = 0;
    while received < 2 {
        let n = session.wait(RESPONSE_TIMEOUT);
        if n == 0 {
            warn!("timed out waiting for replayed responses");
            break;
        }
        received += n;
    }
    if let Some(notice) = session.notice() {
        eprintln!("⚠ {}", notice.message);
    }
    Ok(session)
}

fn cmd_validate(path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", path.display());
    load(path)?;
    println!("✓ Scenario is valid");
    Ok(())
}

fn cmd_summary(path: &Path) -> AppResult<()> {
    let scenario = load(path)?;
    let topology = &scenario.topology;

    println!("Scenario: {}", scenario.name);
    println!("  Fluid: {} (ρ = {} kg/m³)", scenario.fluid.name, scenario.fluid.rho);
    println!(
        "  Pump: {} {} ({} curve points)",
        scenario.pump.manufacturer,
        scenario.pump.model,
        scenario.pump.curve.len()
    );
    println!(
        "  Static head: {} m ({:.2} m including gauge pressures)",
        scenario.parameters.static_head_m,
        scenario.parameters.total_static_head_m(&scenario.fluid)
    );

    if topology.is_empty() {
        println!("\nNo segments");
        return Ok(());
    }

    println!("\nSegments ({}):", topology.segment_count());
    for (region, seg) in topology.segments() {
        println!(
            "  [{}] {} - {} (L = {} m, D = {} mm, K = {:.2})",
            region,
            seg.id.as_str(),
            seg.display_name(|| "(unnamed)".to_string()),
            seg.length_m,
            seg.diameter_mm,
            seg.total_k()
        );
    }

    if topology.has_branches() {
        println!("\nParallel branches:");
        for branch in topology.parallel_branches.iter() {
            println!("  {} ({} segments)", branch.name, branch.segments.len());
        }
    }
    Ok(())
}

fn cmd_request(path: &Path, kind: RequestArg, output: Option<&Path>, config: AppConfig) -> AppResult<()> {
    let scenario = load(path)?;
    let session = Session::new(scenario, Arc::new(ReplayService::default()), config)?;

    let json = match kind {
        RequestArg::OperatingPoint => serde_json::to_string_pretty(&session.operating_point_request()),
        RequestArg::SystemCurve => serde_json::to_string_pretty(&session.system_curve_request()),
    }
    .map_err(|e| AppError::Results(e.to_string()))?;

    write_or_print(output, &(json + "\n"), "request")
}

fn cmd_layout(
    path: &Path,
    format: LayoutFormat,
    print: bool,
    responses: Option<&Path>,
    output: Option<&Path>,
    config: AppConfig,
) -> AppResult<()> {
    let mut session = match responses {
        Some(book) => replayed_session(path, book, config)?,
        None => Session::new(load(path)?, Arc::new(ReplayService::default()), config)?,
    };
    let mode = if print { RenderMode::Print } else { RenderMode::Screen };
    let layout = session.layout(mode);

    if !labels_fit(layout) {
        warn!("some labels extend past the canvas");
    }

    let content = match format {
        LayoutFormat::Svg => render_svg(layout),
        LayoutFormat::Json => {
            serde_json::to_string_pretty(layout).map_err(|e| AppError::Results(e.to_string()))? + "\n"
        }
    };
    write_or_print(output, &content, "schematic")
}

fn csv_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn cmd_chart(path: &Path, responses: &Path, output: Option<&Path>, config: AppConfig) -> AppResult<()> {
    let session = replayed_session(path, responses, config)?;
    let points = session.chart();

    let mut csv = String::from("flow_m3h,system_head_m,pump_head_m,npsh_available_m,npsh_required_m\n");
    for p in &points {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            p.flow,
            csv_cell(p.system_head),
            csv_cell(p.pump_head),
            csv_cell(p.npsh_available),
            csv_cell(p.npsh_required)
        ));
    }

    if output.is_some() {
        println!("Chart has {} points", points.len());
    }
    write_or_print(output, &csv, "chart series")
}

fn cmd_catalog() -> AppResult<()> {
    let catalog = Catalog::builtin();

    println!("Materials (roughness, mm):");
    for m in catalog.materials() {
        println!("  {:<32} {}", m.name, m.roughness_mm);
    }
    println!("\nNominal diameters (internal, mm):");
    for d in catalog.diameters() {
        println!("  {:<16} {}", d.nominal, d.internal_mm);
    }
    println!("\nFluids (ρ kg/m³, ν m²/s, pv kPa):");
    for f in catalog.fluids() {
        println!("  {:<24} {} {:e} {}", f.name, f.rho, f.nu, f.pv_kpa);
    }
    println!("\nFittings (K):");
    for f in catalog.fittings() {
        println!("  {:<32} {}", f.name, f.k);
    }
    Ok(())
}

fn cmd_report(path: &Path, responses: &Path, out: &Path, png: bool, config: AppConfig) -> AppResult<()> {
    let mut session = replayed_session(path, responses, config)?;
    let mut assembler = DirectoryAssembler::new(out);
    let report = if png {
        export_report(&mut session, &mut PngCapture::default(), &mut assembler)?
    } else {
        export_report(&mut session, &mut SvgCapture, &mut assembler)?
    };
    println!("✓ Report written to {}", report.display());
    Ok(())
}
