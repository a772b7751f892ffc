//! Chart Plotter Module
//! Interactive scatterplot and sparkline using egui_plot.

use super::palette::Rgb;
use super::projection::{ProjectedPoint, ScatterProjection, SparklineGeometry};
use egui::{Align2, Color32, RichText};
use egui_plot::{Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};

/// Sparkline fill and stroke
const SPARK_FILL: Color32 = Color32::from_rgb(255, 229, 127);
const SPARK_LINE: Color32 = Color32::from_rgb(255, 165, 0);
const AXIS_LABEL: Color32 = Color32::from_rgb(117, 117, 117);

impl From<Rgb> for Color32 {
    fn from(c: Rgb) -> Self {
        Color32::from_rgb(c.r, c.g, c.b)
    }
}

/// Draws dashboard charts with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Nearest projected point to a plot position, within its own radius plus a margin.
    fn hovered_point<'p>(
        points: &'p [ProjectedPoint],
        height: f64,
        pos: &PlotPoint,
    ) -> Option<&'p ProjectedPoint> {
        points
            .iter()
            .map(|p| {
                let dx = p.x - pos.x;
                let dy = (height - p.y) - pos.y;
                (p, (dx * dx + dy * dy).sqrt())
            })
            .filter(|(p, dist)| *dist <= p.radius + 4.0)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(p, _)| p)
    }

    /// Hover text; the population is shown as written in the table.
    fn tooltip(point: &ProjectedPoint) -> String {
        let population = if point.population_text.is_empty() {
            "-"
        } else {
            point.population_text.as_str()
        };
        format!("Country: {}\nPopulation: {}", point.country, population)
    }

    /// Draw the density vs. growth scatterplot.
    ///
    /// Points are laid out in the projection's screen space with y flipped, so
    /// the axes format ticks back through the inverse scales.
    pub fn draw_scatter(ui: &mut egui::Ui, projection: &ScatterProjection, width: f32, height: f32) {
        let h = height as f64;
        let x_scale = projection.x_scale;
        let y_scale = projection.y_scale;
        let points = &projection.points;

        Plot::new("population_scatter")
            .width(width)
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .include_x(0.0)
            .include_x(width as f64)
            .include_y(0.0)
            .include_y(h)
            .x_axis_label(RichText::new("Population Density").strong().color(AXIS_LABEL))
            .y_axis_label(RichText::new("Population Growth (%)").strong().color(AXIS_LABEL))
            .x_axis_formatter(move |mark, _range| format!("{:.0}", x_scale.invert(mark.value)))
            .y_axis_formatter(move |mark, _range| {
                format!("{:.1}", y_scale.invert(h - mark.value))
            })
            .legend(Legend::default())
            .label_formatter(move |_name, pos| {
                Self::hovered_point(points, h, pos)
                    .map(Self::tooltip)
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                let hover = plot_ui
                    .pointer_coordinate()
                    .and_then(|pos| Self::hovered_point(points, h, &pos));

                for point in points {
                    let highlighted = hover.is_some_and(|p| std::ptr::eq(p, point));
                    let color = if highlighted {
                        SPARK_LINE
                    } else {
                        Color32::from(point.color)
                    };
                    plot_ui.points(
                        Points::new(PlotPoints::new(vec![[point.x, h - point.y]]))
                            .radius(point.radius as f32)
                            .color(color)
                            .filled(true)
                            .name(&point.continent),
                    );
                }
            });
    }

    /// Draw the continent legend as colored dots.
    pub fn draw_legend(ui: &mut egui::Ui, legend: &[(String, Rgb)]) {
        ui.horizontal(|ui| {
            for (continent, color) in legend {
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter()
                    .circle_filled(rect.center(), 6.0, Color32::from(*color));
                ui.label(RichText::new(continent).size(12.0));
                ui.add_space(24.0);
            }
        });
    }

    /// Draw the world-population sparkline with its endpoint labels.
    pub fn draw_sparkline(ui: &mut egui::Ui, geometry: &SparklineGeometry) {
        let size = geometry.size;
        let h = size.height;

        Plot::new("population_sparkline")
            .width(size.width as f32)
            .height((size.height + 20.0) as f32)
            .show_axes(false)
            .show_grid(false)
            .show_x(false)
            .show_y(false)
            .show_background(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .include_x(0.0)
            .include_x(size.width)
            .include_y(-12.0)
            .include_y(h)
            .show(ui, |plot_ui| {
                // Flip screen y into plot space
                let flipped: Vec<[f64; 2]> =
                    geometry.line.iter().map(|&(x, y)| [x, h - y]).collect();
                plot_ui.line(
                    Line::new(PlotPoints::new(flipped.clone()))
                        .color(SPARK_FILL)
                        .width(0.0)
                        .fill(0.0)
                        .fill_alpha(1.0),
                );
                plot_ui.line(Line::new(PlotPoints::new(flipped)).color(SPARK_LINE).width(1.0));

                for (label, align) in [
                    (&geometry.start, Align2::LEFT_BOTTOM),
                    (&geometry.end, Align2::RIGHT_BOTTOM),
                ] {
                    let Some(label) = label else { continue };
                    plot_ui.text(
                        Text::new(PlotPoint::new(label.x, h - label.y), label.value.clone())
                            .anchor(align),
                    );
                    plot_ui.text(
                        Text::new(PlotPoint::new(label.x, -2.0), label.year.to_string())
                            .anchor(Align2([align.x(), egui::Align::TOP])),
                    );
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(country: &str, population: Option<f64>, text: &str) -> ProjectedPoint {
        ProjectedPoint {
            x: 10.0,
            y: 20.0,
            radius: 6.0,
            color: Rgb::new(31, 119, 180),
            continent: "Americas".to_string(),
            country: country.to_string(),
            population,
            population_text: text.to_string(),
        }
    }

    #[test]
    fn tooltip_shows_population_as_written() {
        let brazil = point("Brazil", Some(214_326.0), "214,326");
        assert_eq!(
            ChartPlotter::tooltip(&brazil),
            "Country: Brazil\nPopulation: 214,326"
        );
    }

    #[test]
    fn tooltip_marks_missing_population() {
        let unknown = point("Atlantis", None, "");
        assert_eq!(
            ChartPlotter::tooltip(&unknown),
            "Country: Atlantis\nPopulation: -"
        );
    }

    #[test]
    fn hover_picks_nearest_point_within_radius() {
        let points = vec![point("Brazil", None, ""), point("France", None, "")];
        // Plot space is y-flipped against a 300px chart
        let near = PlotPoint::new(12.0, 300.0 - 21.0);
        let hit = ChartPlotter::hovered_point(&points, 300.0, &near).unwrap();
        assert_eq!(hit.country, "Brazil");

        let far = PlotPoint::new(200.0, 10.0);
        assert!(ChartPlotter::hovered_point(&points, 300.0, &far).is_none());
    }
}
