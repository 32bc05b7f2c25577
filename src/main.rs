//! Prénoms Dashboard - French baby names explorer
//!
//! Opens the interactive dashboard, or with `--export <dir>` writes every chart
//! to disk without a window.

mod gui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use gui::DashboardApp;
use prenoms_dashboard::config::AppConfig;
use prenoms_dashboard::data::DataLoader;
use prenoms_dashboard::export::{ExportSelection, Exporter};
use prenoms_dashboard::stats::{DepartmentFilter, NameStats};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let config = AppConfig::parse();

    let env = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!(
        names = %config.names_path.display(),
        departments = %config.departments_path.display(),
        "startup"
    );

    match config.export_dir.clone() {
        Some(out_dir) => export_headless(&config, &out_dir),
        None => run_gui(config),
    }
}

fn export_headless(config: &AppConfig, out_dir: &Path) -> Result<()> {
    let dataset = DataLoader::load(config).context("loading dataset")?;
    let mut stats = NameStats::new(Arc::new(dataset));

    let name = stats
        .default_name(&config.default_name)
        .unwrap_or_else(|| config.default_name.clone());
    let selection = ExportSelection {
        year: config.default_year,
        name,
        department: DepartmentFilter::All,
    };

    let summary = Exporter::export_all(&mut stats, &selection, out_dir)
        .with_context(|| format!("exporting to {}", out_dir.display()))?;
    for file in &summary.files {
        println!("{}", file.display());
    }
    Ok(())
}

fn run_gui(config: AppConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1200.0, 700.0])
            .with_title("Prénoms Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Prénoms Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
