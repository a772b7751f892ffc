//! Control Panel Widget
//! Left side panel with data sources, year selector, KPI card and export.

use crate::data::{DataSources, Year};
use crate::state::DashboardView;
use egui::{Color32, ComboBox, RichText};
use std::path::Path;

/// Left side control panel.
pub struct ControlPanel {
    pub status: String,
    pub loading: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            status: "Ready".to_string(),
            loading: false,
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "No file selected".to_string())
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        sources: &DataSources,
        view: &DashboardView,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌍 Population Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let rows = [
                    (&sources.csv_path, ControlPanelAction::BrowseCsv),
                    (&sources.continents_path, ControlPanelAction::BrowseContinents),
                ];
                for (path, browse) in rows {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(file_label(path)).size(12.0));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.add_enabled_ui(!self.loading, |ui| {
                                if ui.button("📂 Browse").clicked() {
                                    action = browse.clone();
                                }
                            });
                        });
                    });
                }
                ui.add_enabled_ui(!self.loading, |ui| {
                    if ui.small_button("⟳ Reload").clicked() {
                        action = ControlPanelAction::Reload;
                    }
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Year Section =====
        let selected_text = view
            .selected_year
            .as_ref()
            .map(|y| format!("Year: {y}"))
            .unwrap_or_else(|| "Year: -".to_string());

        ComboBox::from_id_salt("year_select")
            .width(150.0)
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for year in &view.years {
                    let selected = view.selected_year.as_ref() == Some(year);
                    if ui
                        .selectable_label(selected, format!("Year: {year}"))
                        .clicked()
                        && !selected
                    {
                        action = ControlPanelAction::YearChanged(year.clone());
                    }
                }
            });

        ui.add_space(10.0);

        // ===== KPI card =====
        let year_text = view
            .selected_year
            .as_ref()
            .map(Year::to_string)
            .unwrap_or_default();
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    RichText::new(format!("World Population ({year_text})"))
                        .size(12.0)
                        .color(Color32::GRAY),
                );
                ui.label(
                    RichText::new(&view.world_population_label)
                        .size(26.0)
                        .strong(),
                );
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(!view.years.is_empty(), |ui| {
                let button = egui::Button::new(RichText::new("📄 Export SVG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportSvg;
                }
            });
        });

        ui.add_space(15.0);

        if self.loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new(&self.status).size(11.0));
            });
        } else {
            let status_color = if self.status.contains("Error") {
                Color32::from_rgb(220, 53, 69)
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        }

        action
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    YearChanged(Year),
    BrowseCsv,
    BrowseContinents,
    Reload,
    ExportSvg,
}
