mod chart_view;
mod inspect_view;
mod schematic_view;

pub use chart_view::ChartView;
pub use inspect_view::{InspectAction, InspectView, default_draft};
pub use schematic_view::{SchematicView, Selection};
