//! Charts module - projection, palette and chart rendering

mod palette;
mod plotter;
mod projection;
mod renderer;
mod scale;

pub use palette::{ContinentPalette, Rgb, CATEGORY10, DEFAULT_CONTINENTS, FALLBACK_COLOR};
pub use plotter::ChartPlotter;
pub use projection::{
    project_sparkline, AxisDomain, ChartSize, DomainMaxima, ProjectedPoint, ProjectionBuilder,
    ScatterProjection, SparklineGeometry, SparklineLabel, SparklineSize,
};
pub use renderer::{ExportError, StaticChartRenderer};
pub use scale::{nice_step, LinearScale};
