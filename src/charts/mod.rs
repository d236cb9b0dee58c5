//! Charts module - chart views and PNG rendering

mod palette;
mod renderer;
mod views;

pub use renderer::{ChartError, StaticChartRenderer};
pub use views::{age_donut, mean_by_sex, HeatmapView, HistogramView};
