//! Report export.
//!
//! Three surfaces are captured in a fixed order (schematic, head chart, NPSH
//! chart) and handed with a textual summary to a document assembler. The first
//! failure aborts the export and names the step; no partial document is built.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pn_layout::{Layout, RenderMode, render_svg};
use pn_results::{ChartPoint, OperatingMarker};
use resvg::{tiny_skia, usvg};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::chart_svg;
use crate::error::{BoxError, ExportError};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureStep {
    Schematic,
    HeadChart,
    NpshChart,
}

impl CaptureStep {
    pub const ORDER: [CaptureStep; 3] = [
        CaptureStep::Schematic,
        CaptureStep::HeadChart,
        CaptureStep::NpshChart,
    ];

    pub fn file_stem(self) -> &'static str {
        match self {
            CaptureStep::Schematic => "schematic",
            CaptureStep::HeadChart => "head_chart",
            CaptureStep::NpshChart => "npsh_chart",
        }
    }
}

impl fmt::Display for CaptureStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureStep::Schematic => f.write_str("schematic"),
            CaptureStep::HeadChart => f.write_str("head/flow chart"),
            CaptureStep::NpshChart => f.write_str("NPSH chart"),
        }
    }
}

/// What a capture step renders.
#[derive(Debug, Clone, Copy)]
pub enum Surface<'a> {
    Schematic(&'a Layout),
    HeadChart {
        points: &'a [ChartPoint],
        marker: Option<OperatingMarker>,
    },
    NpshChart {
        points: &'a [ChartPoint],
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    pub step: CaptureStep,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl CapturedImage {
    pub fn extension(&self) -> &'static str {
        match self.media_type.as_str() {
            "image/svg+xml" => "svg",
            "image/png" => "png",
            _ => "bin",
        }
    }
}

pub trait SurfaceCapture {
    fn capture(&mut self, step: CaptureStep, surface: &Surface<'_>) -> Result<CapturedImage, BoxError>;
}

pub trait DocumentAssembler {
    type Document;

    fn assemble(
        &mut self,
        summary: &ReportSummary,
        images: &[CapturedImage],
    ) -> Result<Self::Document, BoxError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRow {
    pub region: String,
    pub name: String,
    pub length_m: f64,
    pub diameter_mm: f64,
    pub velocity_m_s: Option<f64>,
    pub reynolds: Option<f64>,
    pub total_loss_m: Option<f64>,
}

/// Numbers printed next to the captured images.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub scenario: String,
    pub generated_at: String,
    pub fluid: String,
    pub pump: String,
    pub flow_m3h: f64,
    pub head_m: f64,
    pub efficiency: Option<f64>,
    pub power_kw: Option<f64>,
    pub cost_per_year: Option<f64>,
    pub npsh_available: Option<f64>,
    pub npsh_required: Option<f64>,
    pub npsh_margin: Option<f64>,
    pub cavitation_risk: bool,
    pub is_extrapolated: bool,
    pub segments: Vec<SegmentRow>,
}

fn opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "-".to_string(),
    }
}

impl ReportSummary {
    /// `None` until an operating point has been applied.
    pub fn from_session(session: &Session) -> Option<Self> {
        let op = session.operating_point()?;
        let results = session.results();
        let segments = session
            .topology()
            .segments()
            .enumerate()
            .map(|(i, (region, seg))| {
                let r = results.result_for(&seg.id);
                SegmentRow {
                    region: region.to_string(),
                    name: seg.display_name(|| format!("Segment {}", i + 1)),
                    length_m: seg.length_m,
                    diameter_mm: seg.diameter_mm,
                    velocity_m_s: r.map(|r| r.velocity_m_s),
                    reynolds: r.map(|r| r.reynolds),
                    total_loss_m: r.map(|r| r.total_loss_m),
                }
            })
            .collect();
        let pump = session.pump();
        Some(Self {
            scenario: session.name().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            fluid: session.fluid().name.clone(),
            pump: format!("{} {}", pump.manufacturer, pump.model).trim().to_string(),
            flow_m3h: op.flow_op,
            head_m: op.head_op,
            efficiency: op.efficiency_op,
            power_kw: op.power_kw,
            cost_per_year: op.cost_per_year,
            npsh_available: op.npsh_available,
            npsh_required: op.npsh_required,
            npsh_margin: op.npsh_margin(),
            cavitation_risk: op.cavitation_risk,
            is_extrapolated: op.is_extrapolated,
            segments,
        })
    }

    pub fn to_markdown(&self) -> String {
        let mut md = format!("# {}\n\nGenerated {}\n\n", self.scenario, self.generated_at);
        md.push_str("## Operating point\n\n");
        md.push_str(&format!("- Fluid: {}\n", self.fluid));
        if !self.pump.is_empty() {
            md.push_str(&format!("- Pump: {}\n", self.pump));
        }
        md.push_str(&format!("- Flow: {:.1} m³/h\n", self.flow_m3h));
        md.push_str(&format!("- Head: {:.2} m\n", self.head_m));
        md.push_str(&format!(
            "- Efficiency: {}\n",
            opt(self.efficiency.map(|e| e * 100.0), 1) + " %"
        ));
        md.push_str(&format!("- Power: {} kW\n", opt(self.power_kw, 2)));
        md.push_str(&format!("- Cost per year: {}\n", opt(self.cost_per_year, 0)));
        md.push_str(&format!(
            "- NPSH available / required / margin: {} / {} / {} m\n",
            opt(self.npsh_available, 2),
            opt(self.npsh_required, 2),
            opt(self.npsh_margin, 2)
        ));
        if self.cavitation_risk {
            md.push_str("- **Cavitation risk**\n");
        }
        if self.is_extrapolated {
            md.push_str("- Operating point lies outside the pump curve (extrapolated)\n");
        }

        md.push_str("\n## Segments\n\n| Region | Segment | L (m) | D (mm) | v (m/s) | Re | Loss (m) |\n|---|---|---|---|---|---|---|\n");
        for row in &self.segments {
            md.push_str(&format!(
                "| {} | {} | {:.1} | {:.1} | {} | {} | {} |\n",
                row.region,
                row.name,
                row.length_m,
                row.diameter_mm,
                opt(row.velocity_m_s, 2),
                opt(row.reynolds, 0),
                opt(row.total_loss_m, 2)
            ));
        }
        md
    }
}

/// Capture every surface, then assemble.
pub fn export_report<C, A>(
    session: &mut Session,
    capture: &mut C,
    assembler: &mut A,
) -> Result<A::Document, ExportError>
where
    C: SurfaceCapture,
    A: DocumentAssembler,
{
    let summary = ReportSummary::from_session(session).ok_or(ExportError::NoResults)?;
    let points = session.chart();
    let marker = session.operating_point().map(OperatingMarker::from);
    let layout = session.layout(RenderMode::Print).clone();

    let mut images = Vec::with_capacity(CaptureStep::ORDER.len());
    for step in CaptureStep::ORDER {
        let surface = match step {
            CaptureStep::Schematic => Surface::Schematic(&layout),
            CaptureStep::HeadChart => Surface::HeadChart {
                points: &points,
                marker,
            },
            CaptureStep::NpshChart => Surface::NpshChart { points: &points },
        };
        let image = capture.capture(step, &surface).map_err(|source| {
            warn!(%step, error = %source, "capture failed; export aborted");
            ExportError::Capture { step, source }
        })?;
        debug!(%step, bytes = image.bytes.len(), "surface captured");
        images.push(image);
    }

    let document = assembler
        .assemble(&summary, &images)
        .map_err(ExportError::Assembly)?;
    info!(scenario = %summary.scenario, "report exported");
    Ok(document)
}

/// Renders every surface to SVG.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgCapture;

impl SurfaceCapture for SvgCapture {
    fn capture(&mut self, step: CaptureStep, surface: &Surface<'_>) -> Result<CapturedImage, BoxError> {
        Ok(CapturedImage {
            step,
            media_type: "image/svg+xml".to_string(),
            bytes: surface_svg(surface).into_bytes(),
        })
    }
}

fn surface_svg(surface: &Surface<'_>) -> String {
    match surface {
        Surface::Schematic(layout) => render_svg(layout),
        Surface::HeadChart { points, marker } => chart_svg::head_chart(points, *marker),
        Surface::NpshChart { points } => chart_svg::npsh_chart(points),
    }
}

/// Rasterizes every surface to PNG at `scale` pixels per diagram unit.
#[derive(Clone)]
pub struct PngCapture {
    scale: f32,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl PngCapture {
    /// Loads the system fonts once; labels render with whatever sans-serif
    /// face the host provides.
    pub fn new(scale: f32) -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        debug!(faces = fontdb.len(), "font database loaded");
        Self {
            scale,
            fontdb: Arc::new(fontdb),
        }
    }

    pub fn rasterize(&self, svg: &str) -> Result<Vec<u8>, BoxError> {
        let options = usvg::Options {
            font_family: "sans-serif".to_string(),
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(svg, &options).map_err(|e| format!("invalid SVG: {e}"))?;

        let size = tree.size();
        let px_w = (size.width() * self.scale).ceil() as u32;
        let px_h = (size.height() * self.scale).ceil() as u32;
        let mut pixmap = tiny_skia::Pixmap::new(px_w, px_h)
            .ok_or_else(|| format!("cannot allocate a {px_w}x{px_h} image"))?;
        pixmap.fill(tiny_skia::Color::WHITE);

        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(self.scale, self.scale),
            &mut pixmap.as_mut(),
        );
        let png = pixmap
            .encode_png()
            .map_err(|e| format!("PNG encoding failed: {e}"))?;
        Ok(png)
    }
}

impl Default for PngCapture {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl SurfaceCapture for PngCapture {
    fn capture(&mut self, step: CaptureStep, surface: &Surface<'_>) -> Result<CapturedImage, BoxError> {
        Ok(CapturedImage {
            step,
            media_type: "image/png".to_string(),
            bytes: self.rasterize(&surface_svg(surface))?,
        })
    }
}

/// Writes the images and a Markdown summary into one directory.
#[derive(Debug, Clone)]
pub struct DirectoryAssembler {
    dir: PathBuf,
}

impl DirectoryAssembler {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DocumentAssembler for DirectoryAssembler {
    type Document = PathBuf;

    fn assemble(
        &mut self,
        summary: &ReportSummary,
        images: &[CapturedImage],
    ) -> Result<PathBuf, BoxError> {
        std::fs::create_dir_all(&self.dir)?;
        let mut md = summary.to_markdown();
        md.push_str("\n## Figures\n\n");
        for image in images {
            let file = format!("{}.{}", image.step.file_stem(), image.extension());
            std::fs::write(self.dir.join(&file), &image.bytes)?;
            md.push_str(&format!("![{}]({file})\n\n", image.step));
        }
        let path = self.dir.join("report.md");
        std::fs::write(&path, md)?;
        Ok(path)
    }
}
