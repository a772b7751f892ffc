//! Population Dashboard - density vs. growth scatterplot with world totals
//!
//! Opens the interactive dashboard by default; `export` writes the charts to
//! SVG without a window.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use eframe::egui;
use popdash::charts::StaticChartRenderer;
use popdash::config::DashboardConfig;
use popdash::data::{DataLoader, Year};
use popdash::gui::DashboardApp;
use popdash::state::{DashboardState, Event};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Population CSV, overrides the configured path
    #[arg(long, value_name = "CSV")]
    data: Option<PathBuf>,

    /// Country to continent JSON, overrides the configured path
    #[arg(long, value_name = "JSON")]
    continents: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard
    View,
    /// Write scatter-<YEAR>.svg and sparkline.svg
    Export {
        #[arg(short, long)]
        year: String,
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,
        /// Viewport width used to pick the layout
        #[arg(short, long, default_value_t = 1200.0)]
        width: f32,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(data) = cli.data {
        config.data.csv_path = data;
    }
    if let Some(continents) = cli.continents {
        config.data.continents_path = continents;
    }

    match cli.command.unwrap_or(Commands::View) {
        Commands::View => run_gui(config),
        Commands::Export { year, out, width } => run_export(config, &year, &out, width),
    }
}

fn run_gui(config: DashboardConfig) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([360.0, 480.0])
            .with_title("Population Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Population Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {e}"))
}

fn run_export(
    config: DashboardConfig,
    year: &str,
    out: &std::path::Path,
    width: f32,
) -> anyhow::Result<()> {
    let dataset = DataLoader::new(config.sources())
        .load_dataset()
        .context("loading population data")?;

    let year = Year::parse(year);
    if !dataset.contains_year(&year) {
        bail!("year {year} is not present in the data");
    }

    let state = DashboardState::new(&config, width)
        .apply(Event::LoadComplete(Ok(dataset)))
        .apply(Event::YearChanged(year.clone()));
    let view = state.view(&config);

    let files = StaticChartRenderer::export(&view, out)
        .with_context(|| format!("exporting charts to {}", out.display()))?;

    println!("World Population ({year}): {}", view.world_population_label);
    for file in files {
        println!("wrote {}", file.display());
    }
    Ok(())
}
