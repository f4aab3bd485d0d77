//! Head/flow and NPSH charts as standalone SVG, for report capture.

use pn_layout::svg::escape;
use pn_results::{ChartPoint, OperatingMarker, chart::column};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;
const TICKS: usize = 5;

pub struct Series {
    pub name: &'static str,
    pub color: &'static str,
    pub points: Vec<[f64; 2]>,
}

struct Frame {
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
}

impl Frame {
    fn fit(series: &[Series], marker: Option<[f64; 2]>) -> Self {
        let all = series
            .iter()
            .flat_map(|s| s.points.iter().copied())
            .chain(marker)
            .filter(|p| p[0].is_finite() && p[1].is_finite());
        let (mut x0, mut x1, mut y1) = (f64::INFINITY, f64::NEG_INFINITY, 0.0_f64);
        for [x, y] in all {
            x0 = x0.min(x);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        if !(x0.is_finite() && x1 > x0) {
            x0 = if x0.is_finite() { x0 } else { 0.0 };
            x1 = x0 + 1.0;
        }
        let y1 = if y1 > 0.0 { y1 * 1.1 } else { 1.0 };
        Self {
            x0,
            x1,
            y0: 0.0,
            y1,
        }
    }

    fn sx(&self, x: f64) -> f64 {
        MARGIN_LEFT + (x - self.x0) / (self.x1 - self.x0) * (WIDTH - MARGIN_LEFT - MARGIN_RIGHT)
    }

    fn sy(&self, y: f64) -> f64 {
        HEIGHT - MARGIN_BOTTOM - (y - self.y0) / (self.y1 - self.y0) * (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM)
    }
}

pub fn line_chart(title: &str, y_label: &str, series: &[Series], marker: Option<[f64; 2]>) -> String {
    let frame = Frame::fit(series, marker);
    let bottom = HEIGHT - MARGIN_BOTTOM;
    let right = WIDTH - MARGIN_RIGHT;

    let mut out = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" width=\"{WIDTH}\" height=\"{HEIGHT}\" font-family=\"sans-serif\" font-size=\"11\">"
    );
    out.push_str(&format!(
        "<rect width=\"{WIDTH}\" height=\"{HEIGHT}\" fill=\"white\"/>"
    ));
    out.push_str(&format!(
        "<text x=\"{}\" y=\"24\" text-anchor=\"middle\" font-size=\"14\" font-weight=\"bold\">{}</text>",
        WIDTH * 0.5,
        escape(title)
    ));

    // axes
    out.push_str(&format!(
        "<polyline points=\"{MARGIN_LEFT},{MARGIN_TOP} {MARGIN_LEFT},{bottom} {right},{bottom}\" fill=\"none\" stroke=\"#333333\"/>"
    ));
    for i in 0..=TICKS {
        let t = i as f64 / TICKS as f64;
        let xv = frame.x0 + t * (frame.x1 - frame.x0);
        let yv = frame.y0 + t * (frame.y1 - frame.y0);
        out.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\">{xv:.0}</text>",
            frame.sx(xv),
            bottom + 16.0
        ));
        out.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" text-anchor=\"end\">{yv:.1}</text>",
            MARGIN_LEFT - 6.0,
            frame.sy(yv) + 4.0
        ));
    }
    out.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\">Flow (m³/h)</text>",
        (MARGIN_LEFT + right) * 0.5,
        HEIGHT - 12.0
    ));
    out.push_str(&format!(
        "<text x=\"16\" y=\"{y}\" text-anchor=\"middle\" transform=\"rotate(-90 16 {y})\">{}</text>",
        escape(y_label),
        y = (MARGIN_TOP + bottom) * 0.5
    ));

    for (i, s) in series.iter().enumerate() {
        let pts: Vec<String> = s
            .points
            .iter()
            .filter(|p| p[0].is_finite() && p[1].is_finite())
            .map(|p| format!("{},{}", frame.sx(p[0]), frame.sy(p[1])))
            .collect();
        if pts.len() >= 2 {
            out.push_str(&format!(
                "<polyline class=\"series\" points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>",
                pts.join(" "),
                s.color
            ));
        }
        let ly = MARGIN_TOP + 4.0 + i as f64 * 14.0;
        out.push_str(&format!(
            "<line x1=\"{x}\" y1=\"{ly}\" x2=\"{x2}\" y2=\"{ly}\" stroke=\"{}\" stroke-width=\"2\"/><text x=\"{tx}\" y=\"{ty}\">{}</text>",
            s.color,
            escape(s.name),
            x = right - 140.0,
            x2 = right - 120.0,
            tx = right - 114.0,
            ty = ly + 4.0,
        ));
    }

    if let Some([x, y]) = marker
        && x.is_finite()
        && y.is_finite()
    {
        out.push_str(&format!(
            "<circle class=\"marker\" cx=\"{}\" cy=\"{}\" r=\"5\" fill=\"#dc2626\"/>",
            frame.sx(x),
            frame.sy(y)
        ));
    }

    out.push_str("</svg>");
    out
}

pub fn head_chart(points: &[ChartPoint], marker: Option<OperatingMarker>) -> String {
    let series = [
        Series {
            name: "System curve",
            color: "#2563eb",
            points: column(points, |p| p.system_head),
        },
        Series {
            name: "Pump curve",
            color: "#ea580c",
            points: column(points, |p| p.pump_head),
        },
    ];
    line_chart("Head vs flow", "Head (m)", &series, marker.map(|m| [m.flow, m.head]))
}

pub fn npsh_chart(points: &[ChartPoint]) -> String {
    let series = [
        Series {
            name: "NPSH available",
            color: "#16a34a",
            points: column(points, |p| p.npsh_available),
        },
        Series {
            name: "NPSH required",
            color: "#dc2626",
            points: column(points, |p| p.npsh_required),
        },
    ];
    line_chart("NPSH vs flow", "NPSH (m)", &series, None)
}
