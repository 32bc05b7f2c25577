//! Chart Viewer Widget
//! Central panel showing the chart of the selected tab.

use crate::gui::control_panel::{Tab, UserSettings};
use egui::RichText;
use prenoms_dashboard::charts::{
    gender_title, ChartPlotter, DepartmentMapRow, GenderShareRow, TidyTables, TopNameRow,
};
use prenoms_dashboard::stats::NameStats;

/// Tidy rows of the charts currently on screen.
#[derive(Default)]
pub struct ChartViewer {
    year: i32,
    top_rows: Vec<TopNameRow>,
    map_rows: Vec<DepartmentMapRow>,
    gender_rows: Option<Vec<GenderShareRow>>,
    gender_title: String,
    no_data_message: String,
    hovered: Option<usize>,
    loaded: bool,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all charts
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Recompute the rows for the current selections (memoized in `stats`).
    pub fn refresh(&mut self, stats: &mut NameStats, settings: &UserSettings) {
        self.year = stats.clamp_year(settings.year);
        self.top_rows = TidyTables::top_names(self.year, &stats.top_names(self.year));

        if self.map_rows.is_empty() {
            let extremes = stats.department_extremes();
            self.map_rows = TidyTables::department_map(&stats.dataset().departments, &extremes);
        }

        let filter = settings.department_filter();
        let trend = stats.gender_trend(&settings.name, &filter);
        self.gender_rows = TidyTables::gender_shares(&trend);
        self.gender_title = gender_title(&settings.name, &filter);
        self.no_data_message = format!(
            "No data available for the name '{}' with the selected filters.",
            settings.name
        );
        self.loaded = true;
    }

    pub fn show(&mut self, ui: &mut egui::Ui, tab: Tab) {
        if !self.loaded {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        ui.heading(tab.title());
        ui.add_space(6.0);

        match tab {
            Tab::TopNames => {
                ui.label(
                    RichText::new(format!("Top 15 Baby Names - {}", self.year))
                        .size(15.0)
                        .strong(),
                );
                if self.top_rows.is_empty() {
                    ChartPlotter::draw_no_data(ui, &format!("No births recorded in {}.", self.year));
                } else {
                    ChartPlotter::draw_top_names(ui, &self.top_rows, self.year);
                }
            }
            Tab::DepartmentMap => {
                let hovered = self.hovered.and_then(|i| self.map_rows.get(i));
                ChartPlotter::draw_department_details(ui, hovered);
                ui.add_space(6.0);
                self.hovered = ChartPlotter::draw_department_map(ui, &self.map_rows);
            }
            Tab::GenderShares => match &self.gender_rows {
                Some(rows) => ChartPlotter::draw_gender_shares(ui, rows, &self.gender_title),
                None => ChartPlotter::draw_no_data(ui, &self.no_data_message),
            },
        }
    }
}
