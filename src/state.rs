//! Dashboard state and its transitions.
//!
//! State is an immutable snapshot. Each trigger (load finished, year picked,
//! window resized) produces a new snapshot through [`DashboardState::apply`],
//! and [`DashboardState::view`] derives everything the renderers draw.

use crate::charts::{
    project_sparkline, ChartSize, ProjectionBuilder, Rgb, ScatterProjection, SparklineGeometry,
};
use crate::config::DashboardConfig;
use crate::data::{Dataset, LoaderError, Year};
use crate::stats::PopulationAggregator;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Viewport classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    Mobile,
    #[default]
    Desktop,
}

impl Layout {
    pub fn classify(viewport_width: f32, breakpoint: f32) -> Self {
        if viewport_width <= breakpoint {
            Layout::Mobile
        } else {
            Layout::Desktop
        }
    }

    pub fn shows_sparkline(&self) -> bool {
        matches!(self, Layout::Desktop)
    }
}

/// Triggers that re-derive the dashboard.
#[derive(Debug)]
pub enum Event {
    LoadComplete(Result<Dataset, LoaderError>),
    YearChanged(Year),
    Resized(f32),
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    dataset: Option<Arc<Dataset>>,
    year: Option<Year>,
    default_year: Year,
    layout: Layout,
    breakpoint: f32,
    viewport_width: f32,
    last_error: Option<String>,
}

impl DashboardState {
    pub fn new(config: &DashboardConfig, viewport_width: f32) -> Self {
        let breakpoint = config.layout.breakpoint;
        Self {
            dataset: None,
            year: Some(config.default_year()),
            default_year: config.default_year(),
            layout: Layout::classify(viewport_width, breakpoint),
            breakpoint,
            viewport_width,
            last_error: None,
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_deref()
    }

    pub fn year(&self) -> Option<&Year> {
        self.year.as_ref()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Produce the next snapshot for `event`.
    pub fn apply(&self, event: Event) -> Self {
        let mut next = self.clone();
        match event {
            Event::LoadComplete(Ok(dataset)) => {
                let year = self
                    .year
                    .clone()
                    .filter(|y| dataset.contains_year(y))
                    .or_else(|| {
                        Some(self.default_year.clone()).filter(|y| dataset.contains_year(y))
                    })
                    .or_else(|| dataset.years().first().cloned());
                info!(
                    records = dataset.len(),
                    year = ?year.as_ref().map(|y| y.to_string()),
                    "load complete"
                );
                next.year = year;
                next.dataset = Some(Arc::new(dataset));
                next.last_error = None;
            }
            Event::LoadComplete(Err(e)) => {
                error!(error = %e, "failed to load population data");
                next.dataset = None;
                next.last_error = Some(e.to_string());
            }
            Event::YearChanged(year) => {
                debug!(%year, "year changed");
                next.year = Some(year);
            }
            Event::Resized(width) => {
                next.viewport_width = width;
                next.layout = Layout::classify(width, self.breakpoint);
                if next.layout != self.layout {
                    debug!(width, layout = ?next.layout, "layout changed");
                }
            }
        }
        next
    }

    /// Derive everything one render needs, from scratch.
    pub fn view(&self, config: &DashboardConfig) -> DashboardView {
        let palette = config.palette();
        let chart_size = config.chart_size(self.layout);
        let builder = ProjectionBuilder::new(chart_size, &palette, config.chart.axis_domain);

        let records = self.dataset.as_deref().map(Dataset::records).unwrap_or(&[]);
        let subset = match (&self.dataset, &self.year) {
            (Some(dataset), Some(year)) => dataset.filter_by_year(year),
            _ => Vec::new(),
        };

        let world_population = PopulationAggregator::sum_population(subset.iter().copied());
        let scatter = builder.project(records, &subset);
        let sparkline = self.layout.shows_sparkline().then(|| {
            let series = PopulationAggregator::population_series(records);
            project_sparkline(&series, config.sparkline_size())
        });

        debug!(
            points = scatter.points.len(),
            excluded = subset.len() - scatter.points.len(),
            "view derived"
        );

        DashboardView {
            years: self
                .dataset
                .as_deref()
                .map(|d| d.years().to_vec())
                .unwrap_or_default(),
            selected_year: self.year.clone(),
            world_population,
            world_population_label: PopulationAggregator::convert_population(world_population),
            layout: self.layout,
            chart_size,
            scatter,
            legend: palette.legend(),
            sparkline,
            error: self.last_error.clone(),
        }
    }
}

/// Plain data consumed by the renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Every year in the data, ascending; feeds the year selector.
    pub years: Vec<Year>,
    pub selected_year: Option<Year>,
    pub world_population: f64,
    pub world_population_label: String,
    pub layout: Layout,
    pub chart_size: ChartSize,
    pub scatter: ScatterProjection,
    pub legend: Vec<(String, Rgb)>,
    /// Present on desktop layouts only.
    pub sparkline: Option<SparklineGeometry>,
    pub error: Option<String>,
}
