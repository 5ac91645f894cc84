//! Charts module - plot requests, dispatch and static rendering

pub mod correlation;
mod dispatcher;
pub mod histogram;
mod renderer;
mod request;

pub use dispatcher::{PlotDispatcher, RenderedPlot};
pub use renderer::{diverging_color, Axis, ChartRenderer, RenderOptions};
pub use request::{ColumnSelection, PlotKind};
