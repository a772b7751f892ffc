//! Static Chart Renderer
//! Writes the dashboard charts to SVG with plotters.
//!
//! Layout of the scatterplot file:
//! 1. Legend: one colored dot + continent name per palette entry
//! 2. Plot area with x/y axes and round ticks
//! 3. Axis titles: "Population Density" below, "Population Growth (%)" rotated left
//!
//! The sparkline file holds the area, line and endpoint labels only.

use super::palette::Rgb;
use super::projection::{ScatterProjection, SparklineGeometry};
use super::scale::LinearScale;
use crate::state::DashboardView;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

const AXIS: RGBColor = RGBColor(33, 33, 33);
const AXIS_LABEL: RGBColor = RGBColor(117, 117, 117);
const SPARK_FILL: RGBColor = RGBColor(255, 229, 127);
const SPARK_LINE: RGBColor = RGBColor(255, 165, 0);

// Margins around the plot area (px)
const MARGIN_TOP: i32 = 20;
const MARGIN_RIGHT: i32 = 30;
const MARGIN_BOTTOM: i32 = 30;
const MARGIN_LEFT: i32 = 40;
const LABEL_H: i32 = 30;
const LEGEND_H: i32 = 24;
const LEGEND_SPACING: i32 = 100;
const TICK_LEN: i32 = 6;
/// Largest chart side drawn, in px.
const MAX_EXTENT: i32 = 16_384;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("SVG drawing failed: {0}")]
    Svg(String),
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("No data loaded; nothing to export")]
    NoData,
}

fn svg_err<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Svg(e.to_string())
}

fn px(v: f64) -> i32 {
    v.round() as i32
}

/// A chart side in px, kept within `1..=MAX_EXTENT`.
fn extent(v: f64) -> i32 {
    px(v).clamp(1, MAX_EXTENT)
}

impl From<Rgb> for RGBColor {
    fn from(c: Rgb) -> Self {
        RGBColor(c.r, c.g, c.b)
    }
}

/// Tick value without float noise, e.g. `0.30000000000000004` -> `0.3`.
fn tick_label(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    format!("{}", rounded + 0.0)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the scatterplot and legend of `view` as an SVG document.
    pub fn render_scatter_svg(view: &DashboardView) -> Result<String, ExportError> {
        let chart_w = extent(view.chart_size.width);
        let chart_h = extent(view.chart_size.height);
        let width = (LABEL_H + MARGIN_LEFT + chart_w + MARGIN_RIGHT) as u32;
        let height = (LEGEND_H + MARGIN_TOP + chart_h + MARGIN_BOTTOM + LABEL_H) as u32;

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(svg_err)?;

            Self::draw_legend(&root, &view.legend)?;

            let origin = (LABEL_H + MARGIN_LEFT, LEGEND_H + MARGIN_TOP);
            Self::draw_axes(&root, &view.scatter, origin, (chart_w, chart_h))?;
            Self::draw_points(&root, &view.scatter, origin)?;

            root.present().map_err(svg_err)?;
        }
        Ok(svg)
    }

    /// Render the world-population sparkline as an SVG document.
    pub fn render_sparkline_svg(geometry: &SparklineGeometry) -> Result<String, ExportError> {
        let size = geometry.size;
        let width = extent(size.width) as u32;
        // Room under the baseline for the year labels
        let height = (extent(size.height) + 20) as u32;

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(svg_err)?;

            let area: Vec<(i32, i32)> = geometry
                .area()
                .into_iter()
                .map(|(x, y)| (px(x), px(y)))
                .collect();
            if !area.is_empty() {
                root.draw(&Polygon::new(area, SPARK_FILL.filled()))
                    .map_err(svg_err)?;
            }
            let line: Vec<(i32, i32)> =
                geometry.line.iter().map(|&(x, y)| (px(x), px(y))).collect();
            root.draw(&PathElement::new(line, SPARK_LINE.stroke_width(1)))
                .map_err(svg_err)?;

            for (label, hpos) in [(&geometry.start, HPos::Left), (&geometry.end, HPos::Right)] {
                let Some(label) = label else { continue };
                let value_style = ("sans-serif", 11)
                    .into_font()
                    .color(&AXIS)
                    .pos(Pos::new(hpos, VPos::Bottom));
                root.draw(&Text::new(
                    label.value.clone(),
                    (px(label.x), px(label.y)),
                    value_style,
                ))
                .map_err(svg_err)?;

                let year_style = ("sans-serif", 11)
                    .into_font()
                    .color(&AXIS_LABEL)
                    .pos(Pos::new(hpos, VPos::Top));
                root.draw(&Text::new(
                    label.year.to_string(),
                    (px(label.x), px(geometry.baseline) + 4),
                    year_style,
                ))
                .map_err(svg_err)?;
            }

            root.present().map_err(svg_err)?;
        }
        Ok(svg)
    }

    /// Write `scatter-<year>.svg` and, when the layout has one,
    /// `sparkline.svg` into `out_dir`.
    pub fn export(view: &DashboardView, out_dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        let Some(year) = view.selected_year.as_ref().filter(|_| !view.years.is_empty()) else {
            error!("export requested before any data was loaded");
            return Err(ExportError::NoData);
        };

        fs::create_dir_all(out_dir).map_err(|source| ExportError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::new();
        let scatter_path = out_dir.join(format!("scatter-{year}.svg"));
        Self::write(&scatter_path, &Self::render_scatter_svg(view)?)?;
        written.push(scatter_path);

        if let Some(geometry) = &view.sparkline {
            let sparkline_path = out_dir.join("sparkline.svg");
            Self::write(&sparkline_path, &Self::render_sparkline_svg(geometry)?)?;
            written.push(sparkline_path);
        }

        info!(
            %year,
            points = view.scatter.points.len(),
            files = written.len(),
            "exported charts"
        );
        Ok(written)
    }

    fn write(path: &Path, svg: &str) -> Result<(), ExportError> {
        fs::write(path, svg).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn draw_legend(
        root: &DrawingArea<SVGBackend, Shift>,
        legend: &[(String, Rgb)],
    ) -> Result<(), ExportError> {
        let y = LEGEND_H / 2;
        for (i, (continent, color)) in legend.iter().enumerate() {
            let x = LABEL_H + MARGIN_LEFT + i as i32 * LEGEND_SPACING;
            root.draw(&Circle::new((x + 6, y), 6, RGBColor::from(*color).filled()))
                .map_err(svg_err)?;
            let style = ("sans-serif", 12)
                .into_font()
                .color(&AXIS)
                .pos(Pos::new(HPos::Left, VPos::Center));
            root.draw(&Text::new(continent.clone(), (x + 16, y), style))
                .map_err(svg_err)?;
        }
        Ok(())
    }

    fn draw_axes(
        root: &DrawingArea<SVGBackend, Shift>,
        scatter: &ScatterProjection,
        (ox, oy): (i32, i32),
        (w, h): (i32, i32),
    ) -> Result<(), ExportError> {
        let axis_style = AXIS.stroke_width(1);
        root.draw(&PathElement::new(vec![(ox, oy + h), (ox + w, oy + h)], axis_style))
            .map_err(svg_err)?;
        root.draw(&PathElement::new(vec![(ox, oy), (ox, oy + h)], axis_style))
            .map_err(svg_err)?;

        let tick_font = ("sans-serif", 10).into_font().color(&AXIS);

        for value in Self::axis_ticks(&scatter.x_scale, w) {
            let x = ox + px(scatter.x_scale.apply(value));
            root.draw(&PathElement::new(
                vec![(x, oy + h), (x, oy + h + TICK_LEN)],
                axis_style,
            ))
            .map_err(svg_err)?;
            root.draw(&Text::new(
                tick_label(value),
                (x, oy + h + TICK_LEN + 2),
                tick_font.pos(Pos::new(HPos::Center, VPos::Top)),
            ))
            .map_err(svg_err)?;
        }

        for value in Self::axis_ticks(&scatter.y_scale, h) {
            let y = oy + px(scatter.y_scale.apply(value));
            root.draw(&PathElement::new(vec![(ox - TICK_LEN, y), (ox, y)], axis_style))
                .map_err(svg_err)?;
            root.draw(&Text::new(
                tick_label(value),
                (ox - TICK_LEN - 2, y),
                tick_font.pos(Pos::new(HPos::Right, VPos::Center)),
            ))
            .map_err(svg_err)?;
        }

        let title_font = ("sans-serif", 13).into_font().color(&AXIS_LABEL);
        root.draw(&Text::new(
            "Population Density",
            (ox + w / 2, oy + h + MARGIN_BOTTOM + LABEL_H / 2),
            title_font.pos(Pos::new(HPos::Center, VPos::Center)),
        ))
        .map_err(svg_err)?;
        root.draw(&Text::new(
            "Population Growth (%)",
            (LABEL_H / 2, oy + h / 2),
            title_font
                .transform(FontTransform::Rotate270)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        ))
        .map_err(svg_err)?;

        Ok(())
    }

    fn axis_ticks(scale: &LinearScale, extent_px: i32) -> Vec<f64> {
        let target = (extent_px / 80).clamp(2, 10) as usize;
        scale.ticks(target)
    }

    fn draw_points(
        root: &DrawingArea<SVGBackend, Shift>,
        scatter: &ScatterProjection,
        (ox, oy): (i32, i32),
    ) -> Result<(), ExportError> {
        for point in &scatter.points {
            let style = RGBColor::from(point.color).mix(0.8).filled();
            root.draw(&Circle::new(
                (ox + px(point.x), oy + px(point.y)),
                px(point.radius).max(1),
                style,
            ))
            .map_err(svg_err)?;
        }
        Ok(())
    }
}
