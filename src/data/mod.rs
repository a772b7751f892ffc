//! Data module - file loading, normalization and year filtering

mod loader;
mod processor;

pub use loader::{
    ContinentLookup, DataLoader, DataSources, LoaderError, RawRow, COL_COUNTRY, COL_DENSITY,
    COL_GROWTH, COL_POPULATION, COL_YEAR,
};
pub use processor::{
    DataProcessor, Dataset, NormalizeReport, NormalizedRecord, Year, UNKNOWN_CONTINENT,
};
