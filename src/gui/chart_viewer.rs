//! Chart Viewer Widget
//! Central panel with the sparkline, the scatterplot and its legend.

use crate::charts::ChartPlotter;
use crate::state::DashboardView;
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 15.0;

/// Draws the charts of a [`DashboardView`].
#[derive(Default)]
pub struct ChartViewer;

impl ChartViewer {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut egui::Ui, view: &DashboardView) {
        if view.years.is_empty() {
            ui.centered_and_justified(|ui| {
                let text = match &view.error {
                    Some(err) => RichText::new(format!("No Data\n{err}"))
                        .size(16.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                    None => RichText::new("No Data").size(20.0),
                };
                ui.label(text);
            });
            return;
        }

        ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
            if let Some(sparkline) = &view.sparkline {
                egui::Frame::none()
                    .rounding(8.0)
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.label(RichText::new("World Population").size(14.0).strong());
                        ChartPlotter::draw_sparkline(ui, sparkline);
                    });
                ui.add_space(SECTION_SPACING);
            }

            ui.label(
                RichText::new("Population Growth Vs Density Correlation")
                    .size(18.0)
                    .strong(),
            );
            ui.add_space(8.0);
            ChartPlotter::draw_legend(ui, &view.legend);
            ui.add_space(8.0);

            if view.scatter.is_empty() {
                ui.label(RichText::new("No plottable records for this year").color(Color32::GRAY));
            }
            ChartPlotter::draw_scatter(
                ui,
                &view.scatter,
                view.chart_size.width as f32,
                view.chart_size.height as f32,
            );
        });
    }
}
