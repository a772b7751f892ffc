//! Population Aggregator Module
//! KPI totals and the yearly world-population series.

use crate::data::{NormalizedRecord, Year};
use rayon::prelude::*;
use std::collections::BTreeMap;

const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;

/// Total population of one year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearTotal {
    pub year: Year,
    pub population: f64,
}

/// Computes aggregate KPIs over normalized records.
pub struct PopulationAggregator;

impl PopulationAggregator {
    /// Sum of populations; missing values contribute zero.
    pub fn sum_population<'a, I>(records: I) -> f64
    where
        I: IntoIterator<Item = &'a NormalizedRecord>,
    {
        records
            .into_iter()
            .filter_map(|r| r.population)
            .sum()
    }

    /// World population for one year.
    pub fn total_population(records: &[NormalizedRecord], year: &Year) -> f64 {
        Self::sum_population(records.iter().filter(|r| &r.year == year))
    }

    /// Yearly totals, ascending by year.
    ///
    /// Each year is summed in input order, so the result does not depend on
    /// how rayon schedules the groups.
    pub fn population_series(records: &[NormalizedRecord]) -> Vec<YearTotal> {
        let mut by_year: BTreeMap<&Year, Vec<f64>> = BTreeMap::new();
        for record in records {
            let values = by_year.entry(&record.year).or_default();
            if let Some(p) = record.population {
                values.push(p);
            }
        }

        let groups: Vec<(&Year, Vec<f64>)> = by_year.into_iter().collect();
        groups
            .par_iter()
            .map(|(year, values)| YearTotal {
                year: (*year).clone(),
                population: values.iter().sum(),
            })
            .collect()
    }

    /// First and last points of a series.
    pub fn series_endpoints(series: &[YearTotal]) -> Option<(&YearTotal, &YearTotal)> {
        Some((series.first()?, series.last()?))
    }

    /// Human readable population: "1.50 bn" or "2.50 mn".
    pub fn convert_population(value: f64) -> String {
        if value >= BILLION {
            format!("{:.2} bn", value / BILLION)
        } else {
            format!("{:.2} mn", value / MILLION)
        }
    }
}
