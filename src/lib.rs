//! Population dashboard: density vs. growth scatterplot, world-population
//! sparkline and KPI, fed by a CSV time series and a country→continent lookup.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod state;
pub mod stats;
