//! Dashboard configuration, read from an optional TOML file.

use crate::charts::{AxisDomain, ChartSize, ContinentPalette, SparklineSize, DEFAULT_CONTINENTS};
use crate::data::{DataSources, Year};
use crate::state::Layout;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Largest chart side accepted from configuration.
pub const MAX_CHART_PX: f64 = 10_000.0;

/// NaN and values below one pixel become one pixel.
fn clamp_px(value: f64) -> f64 {
    value.max(1.0).min(MAX_CHART_PX)
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data: DataConfig,
    pub chart: ChartConfig,
    pub sparkline: SparklineConfig,
    pub layout: LayoutConfig,
    /// Year selected before the user picks one.
    pub default_year: String,
    /// Continents with a palette color, in color order.
    pub continents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub csv_path: PathBuf,
    pub continents_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub height: f64,
    pub desktop_width: f64,
    pub mobile_width: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub axis_domain: AxisDomain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparklineConfig {
    pub width: f64,
    pub height: f64,
    pub top_padding: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Viewports at most this wide use the mobile layout.
    pub breakpoint: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            chart: ChartConfig::default(),
            sparkline: SparklineConfig::default(),
            layout: LayoutConfig::default(),
            default_year: "1950".to_string(),
            continents: DEFAULT_CONTINENTS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("data/population.csv"),
            continents_path: PathBuf::from("data/CountryContinent.json"),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            height: 300.0,
            desktop_width: 800.0,
            mobile_width: 200.0,
            min_radius: 3.0,
            max_radius: 12.0,
            axis_domain: AxisDomain::FullDataset,
        }
    }
}

impl Default for SparklineConfig {
    fn default() -> Self {
        let size = SparklineSize::default();
        Self {
            width: size.width,
            height: size.height,
            top_padding: size.top_padding,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { breakpoint: 700.0 }
    }
}

impl DashboardConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Scatterplot size for a layout, each side kept within `1..=MAX_CHART_PX`.
    pub fn chart_size(&self, layout: Layout) -> ChartSize {
        let width = match layout {
            Layout::Mobile => self.chart.mobile_width,
            Layout::Desktop => self.chart.desktop_width,
        };
        ChartSize {
            width: clamp_px(width),
            height: clamp_px(self.chart.height),
            min_radius: self.chart.min_radius,
            max_radius: self.chart.max_radius,
        }
    }

    pub fn sparkline_size(&self) -> SparklineSize {
        SparklineSize {
            width: self.sparkline.width,
            height: self.sparkline.height,
            top_padding: self.sparkline.top_padding,
        }
    }

    pub fn palette(&self) -> ContinentPalette {
        ContinentPalette::new(self.continents.clone())
    }

    pub fn sources(&self) -> DataSources {
        DataSources {
            csv_path: self.data.csv_path.clone(),
            continents_path: self.data.continents_path.clone(),
        }
    }

    pub fn default_year(&self) -> Year {
        Year::parse(&self.default_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.default_year(), Year::from(1950));
        assert_eq!(config.layout.breakpoint, 700.0);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = DashboardConfig::from_toml_str(
            r#"
            default_year = "2021"

            [chart]
            axis_domain = "selected_year"
            max_radius = 20.0

            [data]
            csv_path = "/srv/pop.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.chart.axis_domain, AxisDomain::SelectedYear);
        assert_eq!(config.chart.max_radius, 20.0);
        assert_eq!(config.chart.min_radius, 3.0);
        assert_eq!(config.data.csv_path, PathBuf::from("/srv/pop.csv"));
        assert_eq!(
            config.data.continents_path,
            PathBuf::from("data/CountryContinent.json")
        );
        assert_eq!(config.default_year(), Year::from(2021));
    }

    #[test]
    fn layout_picks_chart_width() {
        let config = DashboardConfig::default();
        assert_eq!(config.chart_size(Layout::Desktop).width, 800.0);
        assert_eq!(config.chart_size(Layout::Mobile).width, 200.0);
        assert_eq!(config.chart_size(Layout::Mobile).height, 300.0);
    }

    #[test]
    fn chart_size_is_clamped() {
        let config = DashboardConfig::from_toml_str(
            r#"
            [chart]
            desktop_width = 1e15
            height = -5.0
            "#,
        )
        .unwrap();

        let size = config.chart_size(Layout::Desktop);
        assert_eq!(size.width, MAX_CHART_PX);
        assert_eq!(size.height, 1.0);
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let err = DashboardConfig::from_toml_str("chart = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
