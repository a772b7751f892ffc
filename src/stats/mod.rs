//! Stats module - population totals

mod aggregator;

pub use aggregator::{PopulationAggregator, YearTotal};
