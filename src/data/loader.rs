//! CSV / JSON Data Loader Module
//! Reads the population table with Polars and the continent lookup with serde_json.

use super::processor::Dataset;
use polars::prelude::*;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const COL_YEAR: &str = "Year";
pub const COL_COUNTRY: &str = "Country";
pub const COL_DENSITY: &str = "Population_Density";
pub const COL_GROWTH: &str = "Population_Growth_Rate";
pub const COL_POPULATION: &str = "Population (000s)";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse continent lookup: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Column '{0}' not found in CSV")]
    MissingColumn(String),
    #[error("Invalid continent lookup: {0}")]
    InvalidLookup(String),
}

/// One untouched row of the population table.
///
/// Every field is kept as text; numeric coercion happens during normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub country: String,
    pub year: String,
    pub population: String,
    pub density: String,
    pub growth_rate: String,
}

/// Country name to continent name.
#[derive(Debug, Clone, Default)]
pub struct ContinentLookup {
    map: HashMap<String, String>,
}

impl ContinentLookup {
    /// Parse a flat `{ "Country": "Continent" }` JSON object.
    ///
    /// Entries whose value is not a string are skipped.
    pub fn from_json_str(text: &str) -> Result<Self, LoaderError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(entries) = value else {
            return Err(LoaderError::InvalidLookup(
                "expected a JSON object of country to continent".to_string(),
            ));
        };

        let mut map = HashMap::with_capacity(entries.len());
        for (country, continent) in entries {
            match continent {
                Value::String(name) => {
                    map.insert(country.trim().to_string(), name);
                }
                other => warn!(%country, value = %other, "skipping non-string continent"),
            }
        }
        Ok(Self { map })
    }

    pub fn get(&self, country: &str) -> Option<&str> {
        self.map.get(country.trim()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ContinentLookup {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(k, v)| (k.into().trim().to_string(), v.into()))
                .collect(),
        }
    }
}

/// Locations of the two input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub csv_path: PathBuf,
    pub continents_path: PathBuf,
}

/// Loads the population table and continent lookup from disk.
pub struct DataLoader {
    sources: DataSources,
}

impl DataLoader {
    pub fn new(sources: DataSources) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &DataSources {
        &self.sources
    }

    /// Load both files and build the normalized dataset.
    pub fn load_dataset(&self) -> Result<Dataset, LoaderError> {
        let rows = Self::load_csv(&self.sources.csv_path)?;
        let lookup = Self::load_continents(&self.sources.continents_path)?;
        let dataset = Dataset::from_rows(&rows, &lookup);
        info!(
            rows = dataset.len(),
            years = dataset.years().len(),
            countries_mapped = lookup.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Read the population CSV into raw rows.
    pub fn load_csv(path: &Path) -> Result<Vec<RawRow>, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            });
        }

        // Schema inference disabled: every column is read as text
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(0))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        Self::rows_from_frame(&df)
    }

    /// Extract raw rows from a DataFrame, resolving headers by trimmed name.
    pub fn rows_from_frame(df: &DataFrame) -> Result<Vec<RawRow>, LoaderError> {
        let country = Self::text_column(df, COL_COUNTRY)?;
        let year = Self::text_column(df, COL_YEAR)?;
        let population = Self::text_column(df, COL_POPULATION)?;
        let density = Self::text_column(df, COL_DENSITY)?;
        let growth = Self::text_column(df, COL_GROWTH)?;

        let rows = (0..df.height())
            .map(|i| RawRow {
                country: country.get(i).unwrap_or_default().to_string(),
                year: year.get(i).unwrap_or_default().to_string(),
                population: population.get(i).unwrap_or_default().to_string(),
                density: density.get(i).unwrap_or_default().to_string(),
                growth_rate: growth.get(i).unwrap_or_default().to_string(),
            })
            .collect();

        Ok(rows)
    }

    fn text_column(df: &DataFrame, wanted: &str) -> Result<StringChunked, LoaderError> {
        let name = df
            .get_column_names()
            .into_iter()
            .find(|name| name.as_str().trim() == wanted)
            .ok_or_else(|| LoaderError::MissingColumn(wanted.to_string()))?
            .clone();

        let column = df.column(name.as_str())?.cast(&DataType::String)?;
        Ok(column.as_materialized_series().str()?.clone())
    }

    /// Read the continent lookup JSON.
    pub fn load_continents(path: &Path) -> Result<ContinentLookup, LoaderError> {
        let text = fs::read_to_string(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ContinentLookup::from_json_str(&text)
    }
}
