//! Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, Tab, UserSettings};
use egui::SidePanel;
use prenoms_dashboard::config::AppConfig;
use prenoms_dashboard::data::{DataLoader, Dataset, DatasetCache, SourceKey};
use prenoms_dashboard::export::{ExportSelection, Exporter};
use prenoms_dashboard::stats::{DepartmentFilter, NameStats};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::{error, info, warn};

/// Dataset loading result from background thread
enum LoadResult {
    Progress(f32, String),
    Complete { key: SourceKey, stats: NameStats },
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    config: AppConfig,
    cache: DatasetCache,
    stats: Option<NameStats>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async dataset loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let settings = UserSettings {
            names_path: config.names_path.clone(),
            departments_path: config.departments_path.clone(),
            tab: Tab::default(),
            year: config.default_year,
            name: config.default_name.clone(),
            department: DepartmentFilter::ALL_LABEL.to_string(),
        };

        let mut app = Self {
            config,
            cache: DatasetCache::new(),
            stats: None,
            control_panel: ControlPanel::new(settings),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };
        app.start_loading();
        app
    }

    /// Load the selected files in a background thread, reusing a cached dataset
    /// when the files have not changed.
    fn start_loading(&mut self) {
        if self.is_loading {
            return;
        }

        let names_path = self.control_panel.settings.names_path.clone();
        let departments_path = self.control_panel.settings.departments_path.clone();

        let key = match SourceKey::of(&names_path, &departments_path) {
            Ok(key) => key,
            Err(e) => {
                warn!("cannot load dataset: {}", e);
                self.control_panel.set_progress(0.0, &format!("Error: {}", e));
                return;
            }
        };
        let cached = self.cache.get(&key);

        self.chart_viewer.clear();
        self.control_panel.export_enabled = false;
        self.control_panel.set_progress(5.0, "Loading dataset...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let dataset: Arc<Dataset> = match cached {
                Some(dataset) => dataset,
                None => {
                    let _ = tx.send(LoadResult::Progress(
                        10.0,
                        "Reading names and boundaries...".to_string(),
                    ));
                    match DataLoader::load_paths(&names_path, &departments_path) {
                        Ok(dataset) => Arc::new(dataset),
                        Err(e) => {
                            let _ = tx.send(LoadResult::Error(e.to_string()));
                            return;
                        }
                    }
                }
            };

            let _ = tx.send(LoadResult::Progress(60.0, "Aggregating...".to_string()));
            let mut stats = NameStats::new(dataset);
            stats.department_extremes();

            let _ = tx.send(LoadResult::Complete { key, stats });
        });
    }

    /// Check for dataset loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    LoadResult::Complete { key, stats } => {
                        self.cache.insert(key, Arc::clone(stats.dataset()));
                        self.install_stats(stats);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(e) => {
                        error!("dataset load failed: {}", e);
                        self.control_panel.set_progress(0.0, &format!("Error: {}", e));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    fn install_stats(&mut self, mut stats: NameStats) {
        let dataset = Arc::clone(stats.dataset());
        self.control_panel.update_options(
            stats.year_range(),
            dataset.unique_names(),
            dataset.department_names(),
            stats.default_name(&self.config.default_name),
        );
        self.chart_viewer
            .refresh(&mut stats, &self.control_panel.settings);
        self.control_panel.set_progress(
            100.0,
            &format!(
                "Loaded {} records, {} departments",
                dataset.names.len(),
                dataset.departments.len()
            ),
        );
        info!(records = dataset.names.len(), "dashboard ready");
        self.stats = Some(stats);
    }

    fn refresh_charts(&mut self) {
        if let Some(stats) = self.stats.as_mut() {
            self.chart_viewer
                .refresh(stats, &self.control_panel.settings);
        }
    }

    fn pick_file(title: &str, filter_name: &str, extensions: &[&str]) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title(title)
            .add_filter(filter_name, extensions)
            .pick_file()
    }

    /// Handle chart export - specs, tidy tables and PNGs into a chosen folder
    fn handle_export(&mut self) {
        let Some(stats) = self.stats.as_mut() else {
            self.control_panel.set_progress(0.0, "No charts to export");
            return;
        };

        // Ask user for output location
        let Some(out_dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        let settings = &self.control_panel.settings;
        let selection = ExportSelection {
            year: settings.year,
            name: settings.name.clone(),
            department: settings.department_filter(),
        };

        self.control_panel.set_progress(50.0, "Exporting charts...");
        match Exporter::export_all(stats, &selection, &out_dir) {
            Ok(summary) => {
                let mut status = format!("Exported {} files", summary.files.len());
                if summary.gender_no_data {
                    status.push_str(" (gender chart skipped: no data)");
                }
                self.control_panel.set_progress(100.0, &status);
                if let Err(e) = open::that(&out_dir) {
                    warn!("could not open {}: {}", out_dir.display(), e);
                }
            }
            Err(e) => {
                error!("export failed: {}", e);
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseNames => {
                            if let Some(path) =
                                Self::pick_file("Names dataset", "CSV Files", &["csv"])
                            {
                                self.control_panel.settings.names_path = path;
                                self.start_loading();
                            }
                        }
                        ControlPanelAction::BrowseDepartments => {
                            if let Some(path) = Self::pick_file(
                                "Department boundaries",
                                "GeoJSON Files",
                                &["geojson", "json"],
                            ) {
                                self.control_panel.settings.departments_path = path;
                                self.start_loading();
                            }
                        }
                        ControlPanelAction::Reload => self.start_loading(),
                        ControlPanelAction::FiltersChanged => self.refresh_charts(),
                        ControlPanelAction::Export => self.handle_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        let tab = self.control_panel.settings.tab;
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, tab);
        });
    }
}
