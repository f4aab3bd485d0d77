//! Render modes and the size constants that depend on them.

use serde::{Deserialize, Serialize};

/// Fixed diagram geometry, in diagram units.
pub mod dims {
    pub const START_X: f64 = 50.0;
    pub const TANK_WIDTH: f64 = 100.0;
    pub const TANK_HEIGHT: f64 = 70.0;
    /// Centerline of the main pipe run.
    pub const PIPE_Y: f64 = 150.0;
    /// Vertical distance of a branch row from the centerline.
    pub const PARALLEL_OFFSET: f64 = 100.0;
    pub const PUMP_RADIUS: f64 = 40.0;
    pub const END_RADIUS: f64 = 35.0;
    pub const JUNCTION_SIZE: f64 = 6.0;
    pub const BRANCH_MIN_RUN: f64 = 260.0;
    pub const BRANCH_PAD: f64 = 130.0;
    /// Merge point to end node when no discharge-after segment exists,
    /// capped at the current spacing.
    pub const CONNECTOR_RUN: f64 = 40.0;
    pub const TRAILING_PAD: f64 = 100.0;
    /// Height of the coordinate system handed to renderers.
    pub const HEIGHT: f64 = 400.0;

    pub const PIPE_LABEL_OFFSET: f64 = -25.0;
    pub const BRANCH_LABEL_OFFSET: f64 = -20.0;
    pub const EMPTY_LABEL_OFFSET: f64 = -10.0;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Compact on-screen scale.
    #[default]
    Screen,
    /// Enlarged scale for raster capture into reports.
    Print,
}

/// Font and stroke sizes for one render mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub text_scale: f64,
    pub stroke_scale: f64,
    pub base_font: f64,
    pub header_font: f64,
    pub stroke_width: f64,
    pub heavy_stroke: f64,
}

impl Style {
    pub fn for_mode(mode: RenderMode) -> Self {
        let (text_scale, stroke_scale) = match mode {
            RenderMode::Screen => (1.0, 1.0),
            RenderMode::Print => (1.8, 2.0),
        };
        Self {
            text_scale,
            stroke_scale,
            base_font: 10.0 * text_scale,
            header_font: 12.0 * text_scale,
            stroke_width: 1.5 * stroke_scale,
            heavy_stroke: 2.0 * stroke_scale,
        }
    }

    pub fn line_height(&self) -> f64 {
        self.base_font * 1.2
    }

    /// Height of a label block, from the top of its first line to the
    /// baseline of its last.
    pub fn label_extent(&self, lines: usize) -> f64 {
        match lines {
            0 => 0.0,
            n => (n - 1) as f64 * self.line_height() + self.base_font,
        }
    }

    pub fn junction_radius(&self) -> f64 {
        3.0 * self.stroke_scale
    }
}
