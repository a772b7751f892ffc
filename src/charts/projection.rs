//! Projection Module
//! Maps normalized records and yearly totals to screen coordinates.

use super::palette::{ContinentPalette, Rgb};
use super::scale::LinearScale;
use crate::data::{NormalizedRecord, Year};
use crate::stats::{PopulationAggregator, YearTotal};
use serde::{Deserialize, Serialize};

/// Which records the axis maxima are taken from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisDomain {
    /// Every year; axes stay put when the year changes.
    #[default]
    FullDataset,
    /// Only the records of the selected year.
    SelectedYear,
}

/// Scatterplot dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSize {
    pub width: f64,
    pub height: f64,
    pub min_radius: f64,
    pub max_radius: f64,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 300.0,
            min_radius: 3.0,
            max_radius: 12.0,
        }
    }
}

/// A record placed on the scatterplot.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Rgb,
    pub continent: String,
    pub country: String,
    pub population: Option<f64>,
    /// Population as written in the source table, for tooltips.
    pub population_text: String,
}

/// Observed maxima of the three plotted metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DomainMaxima {
    pub density: f64,
    pub growth_rate: f64,
    pub population: f64,
}

impl DomainMaxima {
    /// Largest valid value per metric; zero when none is valid.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a NormalizedRecord>,
    {
        let mut density = None::<f64>;
        let mut growth = None::<f64>;
        let mut population = None::<f64>;

        for r in records {
            density = max_opt(density, r.density);
            growth = max_opt(growth, r.growth_rate);
            population = max_opt(population, r.population);
        }

        DomainMaxima {
            density: density.unwrap_or(0.0),
            growth_rate: growth.unwrap_or(0.0),
            population: population.unwrap_or(0.0),
        }
    }
}

fn max_opt(current: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (current, value) {
        (Some(c), Some(v)) => Some(c.max(v)),
        (None, v) => v,
        (c, None) => c,
    }
}

/// The three scales of one scatterplot render plus its points.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterProjection {
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub radius_scale: LinearScale,
    pub points: Vec<ProjectedPoint>,
}

impl ScatterProjection {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Builds scatterplot projections for a chart size.
pub struct ProjectionBuilder<'a> {
    size: ChartSize,
    palette: &'a ContinentPalette,
    domain: AxisDomain,
}

impl<'a> ProjectionBuilder<'a> {
    pub fn new(size: ChartSize, palette: &'a ContinentPalette, domain: AxisDomain) -> Self {
        Self {
            size,
            palette,
            domain,
        }
    }

    /// Project `subset`, taking axis maxima from `all` or from `subset`
    /// according to the configured [`AxisDomain`].
    pub fn project(
        &self,
        all: &[NormalizedRecord],
        subset: &[&NormalizedRecord],
    ) -> ScatterProjection {
        let maxima = match self.domain {
            AxisDomain::FullDataset => DomainMaxima::from_records(all),
            AxisDomain::SelectedYear => DomainMaxima::from_records(subset.iter().copied()),
        };

        let x_scale = LinearScale::new((0.0, maxima.density), (0.0, self.size.width));
        let y_scale = LinearScale::new((0.0, maxima.growth_rate), (self.size.height, 0.0));
        let radius_scale = LinearScale::new(
            (0.0, maxima.population),
            (self.size.min_radius, self.size.max_radius),
        );

        let points = subset
            .iter()
            .filter_map(|record| {
                let (density, growth) = (record.density?, record.growth_rate?);
                let radius = record
                    .population
                    .map(|p| radius_scale.apply(p))
                    .unwrap_or(self.size.min_radius);
                Some(ProjectedPoint {
                    x: x_scale.apply(density),
                    y: y_scale.apply(growth),
                    radius,
                    color: self.palette.color_for(&record.continent),
                    continent: record.continent.clone(),
                    country: record.country.clone(),
                    population: record.population,
                    population_text: record.population_text.clone(),
                })
            })
            .collect();

        ScatterProjection {
            x_scale,
            y_scale,
            radius_scale,
            points,
        }
    }
}

/// Sparkline dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparklineSize {
    pub width: f64,
    pub height: f64,
    /// Headroom kept above the highest point for the value labels.
    pub top_padding: f64,
}

impl Default for SparklineSize {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 60.0,
            top_padding: 15.0,
        }
    }
}

/// Year and formatted total shown at one end of the sparkline.
#[derive(Debug, Clone, PartialEq)]
pub struct SparklineLabel {
    pub year: Year,
    pub value: String,
    pub x: f64,
    pub y: f64,
}

/// Projected world-population series.
#[derive(Debug, Clone, PartialEq)]
pub struct SparklineGeometry {
    pub size: SparklineSize,
    /// Line vertices; the area closes them down to `baseline`.
    pub line: Vec<(f64, f64)>,
    pub baseline: f64,
    pub start: Option<SparklineLabel>,
    pub end: Option<SparklineLabel>,
}

impl SparklineGeometry {
    /// Closed polygon under the line, for area fills.
    pub fn area(&self) -> Vec<(f64, f64)> {
        let (Some(first), Some(last)) = (self.line.first(), self.line.last()) else {
            return Vec::new();
        };
        let mut polygon = Vec::with_capacity(self.line.len() + 2);
        polygon.push((first.0, self.baseline));
        polygon.extend(self.line.iter().copied());
        polygon.push((last.0, self.baseline));
        polygon
    }
}

/// Project the yearly totals into sparkline space.
///
/// Years are placed by value; if any year is not numeric, every year is placed
/// by its position in the series instead.
pub fn project_sparkline(series: &[YearTotal], size: SparklineSize) -> SparklineGeometry {
    let numeric: Option<Vec<f64>> = series.iter().map(|t| t.year.as_f64()).collect();
    let xs: Vec<f64> = numeric.unwrap_or_else(|| (0..series.len()).map(|i| i as f64).collect());

    let x_min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let x_domain = if x_min.is_finite() { (x_min, x_max) } else { (0.0, 0.0) };
    let max_total = series.iter().map(|t| t.population).fold(0.0, f64::max);

    let x_scale = LinearScale::new(x_domain, (0.0, size.width));
    let y_scale = LinearScale::new((0.0, max_total), (size.height, size.top_padding));

    let line: Vec<(f64, f64)> = xs
        .iter()
        .zip(series)
        .map(|(&x, total)| (x_scale.apply(x), y_scale.apply(total.population)))
        .collect();

    let label = |total: &YearTotal, x: f64| SparklineLabel {
        year: total.year.clone(),
        value: PopulationAggregator::convert_population(total.population),
        x,
        y: y_scale.apply(total.population) - 5.0,
    };
    let (start, end) = match PopulationAggregator::series_endpoints(series) {
        Some((first, last)) => (Some(label(first, 0.0)), Some(label(last, size.width))),
        None => (None, None),
    };

    SparklineGeometry {
        size,
        line,
        baseline: size.height,
        start,
        end,
    }
}
