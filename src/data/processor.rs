//! Data Processor Module
//! Joins raw CSV rows with their continent and selects yearly subsets.

use super::loader::{ContinentLookup, RawRow};
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Group assigned to countries missing from the continent lookup.
pub const UNKNOWN_CONTINENT: &str = "unknown";

/// Normalized year value.
///
/// Text and numbers denoting the same year compare equal, so `"2021"`,
/// `" 2021 "` and `2021` all select the same records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Year {
    Numeric(i64),
    /// Non-numeric label; sorts after every numeric year.
    Label(String),
}

impl Year {
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return Year::Numeric(value);
        }
        // Float-typed CSV columns come back as "2021.0"
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() && value.fract() == 0.0 => Year::Numeric(value as i64),
            _ => Year::Label(trimmed.to_string()),
        }
    }

    /// Numeric value, if the year is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Year::Numeric(v) => Some(*v as f64),
            Year::Label(_) => None,
        }
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Year::Numeric(v) => write!(f, "{}", v),
            Year::Label(s) => f.write_str(s),
        }
    }
}

impl FromStr for Year {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Year::parse(s))
    }
}

impl From<&str> for Year {
    fn from(s: &str) -> Self {
        Year::parse(s)
    }
}

impl From<String> for Year {
    fn from(s: String) -> Self {
        Year::parse(&s)
    }
}

impl From<i64> for Year {
    fn from(v: i64) -> Self {
        Year::Numeric(v)
    }
}

impl From<i32> for Year {
    fn from(v: i32) -> Self {
        Year::Numeric(v as i64)
    }
}

/// One country-year observation joined with its continent.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub country: String,
    pub year: Year,
    pub density: Option<f64>,
    pub growth_rate: Option<f64>,
    pub population: Option<f64>,
    /// Population cell as written in the CSV, trimmed.
    pub population_text: String,
    pub continent: String,
}

impl NormalizedRecord {
    /// Whether the record can be placed on the scatterplot.
    pub fn is_plottable(&self) -> bool {
        self.density.is_some() && self.growth_rate.is_some()
    }

    pub fn has_known_continent(&self) -> bool {
        self.continent != UNKNOWN_CONTINENT
    }
}

/// Counters collected while normalizing one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub rows: usize,
    pub lookup_misses: usize,
    pub bad_population: usize,
    pub bad_position: usize,
}

/// The immutable result of one full load.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<NormalizedRecord>,
    years: Vec<Year>,
}

impl Dataset {
    /// Normalize raw rows and index their years.
    pub fn from_rows(rows: &[RawRow], lookup: &ContinentLookup) -> Self {
        let (records, report) = DataProcessor::normalize_with_report(rows, lookup);
        if report.lookup_misses > 0 {
            warn!(
                misses = report.lookup_misses,
                "countries missing from continent lookup, grouped as '{}'",
                UNKNOWN_CONTINENT
            );
        }
        if report.bad_population > 0 || report.bad_position > 0 {
            warn!(
                bad_population = report.bad_population,
                bad_position = report.bad_position,
                "rows with non-numeric fields"
            );
        }
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<NormalizedRecord>) -> Self {
        let years = DataProcessor::distinct_years(&records);
        Self { records, years }
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> &[Year] {
        &self.years
    }

    pub fn contains_year(&self, year: &Year) -> bool {
        self.years.binary_search(year).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn filter_by_year(&self, year: &Year) -> Vec<&NormalizedRecord> {
        DataProcessor::filter_by_year(&self.records, year)
    }
}

/// Handles row normalization and year filtering.
pub struct DataProcessor;

impl DataProcessor {
    /// Parse a formatted population count such as `" 1,234,567 "`.
    ///
    /// Returns `None` when nothing numeric is left after stripping.
    pub fn parse_population(text: &str) -> Option<f64> {
        Self::parse_metric(text)
    }

    /// Parse a numeric field, ignoring whitespace and thousands separators.
    pub fn parse_metric(text: &str) -> Option<f64> {
        let cleaned: String = text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .collect();
        if cleaned.is_empty() {
            return None;
        }
        cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Join every raw row with its continent, preserving input order.
    pub fn normalize_rows(rows: &[RawRow], lookup: &ContinentLookup) -> Vec<NormalizedRecord> {
        Self::normalize_with_report(rows, lookup).0
    }

    pub fn normalize_with_report(
        rows: &[RawRow],
        lookup: &ContinentLookup,
    ) -> (Vec<NormalizedRecord>, NormalizeReport) {
        let mut report = NormalizeReport {
            rows: rows.len(),
            ..Default::default()
        };

        let records = rows
            .iter()
            .map(|row| {
                let continent = match lookup.get(&row.country) {
                    Some(c) if !c.trim().is_empty() => c.trim().to_string(),
                    _ => {
                        debug!(country = %row.country, "no continent for country");
                        report.lookup_misses += 1;
                        UNKNOWN_CONTINENT.to_string()
                    }
                };

                let population = Self::parse_population(&row.population);
                if population.is_none() {
                    debug!(
                        country = %row.country,
                        field = "population",
                        value = %row.population,
                        "non-numeric field"
                    );
                    report.bad_population += 1;
                }

                let record = NormalizedRecord {
                    country: row.country.trim().to_string(),
                    year: Year::parse(&row.year),
                    density: Self::parse_metric(&row.density),
                    growth_rate: Self::parse_metric(&row.growth_rate),
                    population,
                    population_text: row.population.trim().to_string(),
                    continent,
                };
                if !record.is_plottable() {
                    let field = if record.density.is_none() {
                        "density"
                    } else {
                        "growth_rate"
                    };
                    debug!(country = %row.country, field, "non-numeric field");
                    report.bad_position += 1;
                }
                record
            })
            .collect();

        (records, report)
    }

    /// Records whose year equals `year`, in input order.
    pub fn filter_by_year<'a>(
        records: &'a [NormalizedRecord],
        year: &Year,
    ) -> Vec<&'a NormalizedRecord> {
        records.iter().filter(|r| &r.year == year).collect()
    }

    /// Every distinct year, ascending.
    pub fn distinct_years(records: &[NormalizedRecord]) -> Vec<Year> {
        let unique: HashSet<&Year> = records.iter().map(|r| &r.year).collect();
        let mut years: Vec<Year> = unique.into_iter().cloned().collect();
        years.sort();
        years
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(country: &str, year: &str, pop: &str, density: &str, growth: &str) -> RawRow {
        RawRow {
            country: country.to_string(),
            year: year.to_string(),
            population: pop.to_string(),
            density: density.to_string(),
            growth_rate: growth.to_string(),
        }
    }

    #[test]
    fn strips_separators_from_population() {
        assert_eq!(DataProcessor::parse_population(" 1,234,567 "), Some(1234567.0));
        assert_eq!(DataProcessor::parse_population("12 345"), Some(12345.0));
        assert_eq!(DataProcessor::parse_population("-"), None);
        assert_eq!(DataProcessor::parse_population("   "), None);
        assert_eq!(DataProcessor::parse_population("n/a"), None);
    }

    #[test]
    fn year_text_and_number_compare_equal() {
        assert_eq!(Year::parse(" 2021 "), Year::from(2021));
        assert_eq!(Year::parse("2021.0"), Year::Numeric(2021));
        assert_eq!(Year::from("1950"), Year::from(1950i64));
        assert!(Year::Numeric(1990) < Year::Numeric(2000));
        assert!(Year::Numeric(3000) < Year::Label("latest".into()));
        assert_eq!(Year::parse("latest").to_string(), "latest");
    }

    #[test]
    fn lookup_miss_becomes_unknown() {
        let lookup: ContinentLookup = [("France", "Europe")].into_iter().collect();
        let rows = vec![
            row("France", "2021", "20,000", "119", "0.1"),
            row("Atlantis", "2021", "5", "1", "1"),
        ];
        let (records, report) = DataProcessor::normalize_with_report(&rows, &lookup);

        assert_eq!(records[0].continent, "Europe");
        assert_eq!(records[0].population, Some(20_000.0));
        assert_eq!(records[0].population_text, "20,000");
        assert_eq!(records[1].continent, UNKNOWN_CONTINENT);
        assert!(!records[1].has_known_continent());
        assert_eq!(report.lookup_misses, 1);
    }

    #[test]
    fn bad_fields_become_none() {
        let lookup = ContinentLookup::default();
        let rows = vec![row("X", "2000", "abc", "", "1.5")];
        let records = DataProcessor::normalize_rows(&rows, &lookup);

        assert_eq!(records[0].population, None);
        assert_eq!(records[0].density, None);
        assert_eq!(records[0].growth_rate, Some(1.5));
        assert!(!records[0].is_plottable());
    }

    #[test]
    fn filter_matches_mixed_year_representations() {
        let lookup = ContinentLookup::default();
        let rows = vec![
            row("A", " 2021", "1", "1", "1"),
            row("B", "2021", "1", "1", "1"),
            row("C", "1950", "1", "1", "1"),
        ];
        let records = DataProcessor::normalize_rows(&rows, &lookup);

        let hits = DataProcessor::filter_by_year(&records, &Year::from(2021));
        assert_eq!(hits.len(), 2);
        assert!(DataProcessor::filter_by_year(&records, &Year::from(1800)).is_empty());
    }

    #[test]
    fn dataset_indexes_sorted_years() {
        let lookup = ContinentLookup::default();
        let rows = vec![
            row("A", "2021", "1", "1", "1"),
            row("A", "1950", "1", "1", "1"),
            row("B", "2021", "1", "1", "1"),
        ];
        let dataset = Dataset::from_rows(&rows, &lookup);

        assert_eq!(dataset.years(), &[Year::Numeric(1950), Year::Numeric(2021)]);
        assert!(dataset.contains_year(&Year::from("2021")));
        assert_eq!(dataset.len(), 3);
    }
}
