//! Population Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::{DataLoader, Dataset, LoaderError};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::state::{DashboardState, DashboardView, Event};
use egui::SidePanel;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use tracing::{error, info};

/// Data loading result from background thread
enum LoadResult {
    Progress(String),
    Complete(Result<Dataset, LoaderError>),
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    state: DashboardState,
    view: DashboardView,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let state = DashboardState::new(&config, cc.egui_ctx.screen_rect().width());
        let view = state.view(&config);
        let mut app = Self {
            config,
            state,
            view,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };
        app.start_load();
        app
    }

    /// Run a state transition and re-derive the view.
    fn transition(&mut self, event: Event) {
        self.state = self.state.apply(event);
        self.view = self.state.view(&self.config);
    }

    /// Load both input files on a background thread.
    fn start_load(&mut self) {
        if self.is_loading {
            return;
        }

        let loader = DataLoader::new(self.config.sources());
        info!(
            csv = %loader.sources().csv_path.display(),
            continents = %loader.sources().continents_path.display(),
            "loading population data"
        );

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.control_panel.loading = true;
        self.control_panel.set_status("Loading data...");

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress("Reading CSV file...".to_string()));
            let _ = tx.send(LoadResult::Complete(loader.load_dataset()));
        });
    }

    /// Check for loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };
        let mut should_keep_receiver = true;

        while let Ok(result) = rx.try_recv() {
            match result {
                LoadResult::Progress(status) => self.control_panel.set_status(status),
                LoadResult::Complete(result) => {
                    let status = match &result {
                        Ok(dataset) => format!(
                            "Loaded {} records, {} years",
                            dataset.len(),
                            dataset.years().len()
                        ),
                        Err(e) => format!("Error: {e}"),
                    };
                    self.transition(Event::LoadComplete(result));
                    self.control_panel.set_status(status);
                    self.control_panel.loading = false;
                    self.is_loading = false;
                    should_keep_receiver = false;
                }
            }
        }

        if should_keep_receiver {
            self.load_rx = Some(rx);
        }
    }

    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.config.data.csv_path = path;
            self.start_load();
        }
    }

    fn handle_browse_continents(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON Files", &["json"])
            .pick_file()
        {
            self.config.data.continents_path = path;
            self.start_load();
        }
    }

    /// Write the current charts to SVG files in a chosen folder
    fn handle_export_svg(&mut self) {
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        match StaticChartRenderer::export(&self.view, &dir) {
            Ok(files) => self.control_panel.set_status(format!(
                "Exported {} SVG file(s) to {}",
                files.len(),
                dir.display()
            )),
            Err(e) => {
                error!(error = %e, "SVG export failed");
                self.control_panel.set_status(format!("Error: {e}"));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        let width = ctx.screen_rect().width();
        if (width - self.state.viewport_width()).abs() >= 1.0 {
            self.transition(Event::Resized(width));
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let sources = self.config.sources();
                    let action = self.control_panel.show(ui, &sources, &self.view);

                    match action {
                        ControlPanelAction::YearChanged(year) => {
                            self.transition(Event::YearChanged(year))
                        }
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::BrowseContinents => self.handle_browse_continents(),
                        ControlPanelAction::Reload => self.start_load(),
                        ControlPanelAction::ExportSvg => self.handle_export_svg(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, &self.view);
        });
    }
}
