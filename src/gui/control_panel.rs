//! Control Panel Widget
//! Left side panel with data sources, view selection and filters.

use egui::{Color32, ComboBox, RichText, ScrollArea};
use prenoms_dashboard::stats::DepartmentFilter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Maximum number of names listed in the picker at once.
const NAME_LIST_LIMIT: usize = 200;

/// Dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    TopNames,
    DepartmentMap,
    GenderShares,
}

impl Tab {
    pub fn title(self) -> &'static str {
        match self {
            Tab::TopNames => "🏆 Top Names by Year",
            Tab::DepartmentMap => "🗺 Name Popularity Map",
            Tab::GenderShares => "🚻 Gender Distribution",
        }
    }
}

/// User selections driving the charts.
#[derive(Debug, Clone)]
pub struct UserSettings {
    pub names_path: PathBuf,
    pub departments_path: PathBuf,
    pub tab: Tab,
    pub year: i32,
    pub name: String,
    pub department: String,
}

impl UserSettings {
    pub fn department_filter(&self) -> DepartmentFilter {
        DepartmentFilter::from_label(&self.department)
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub year_range: Option<(i32, i32)>,
    pub names: Vec<Arc<str>>,
    pub departments: Vec<String>,
    pub name_query: String,
    pub progress: f32,
    pub status: String,
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(settings: UserSettings) -> Self {
        Self {
            settings,
            year_range: None,
            names: Vec::new(),
            departments: Vec::new(),
            name_query: String::new(),
            progress: 0.0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }

    /// Refresh picker options after a dataset load.
    pub fn update_options(
        &mut self,
        year_range: Option<(i32, i32)>,
        names: Vec<Arc<str>>,
        departments: Vec<String>,
        default_name: Option<String>,
    ) {
        self.year_range = year_range;
        if let Some((min, max)) = year_range {
            self.settings.year = self.settings.year.clamp(min, max);
        }
        self.names = names;

        let mut options = vec![DepartmentFilter::ALL_LABEL.to_string()];
        options.extend(departments);
        if !options.contains(&self.settings.department) {
            self.settings.department = DepartmentFilter::ALL_LABEL.to_string();
        }
        self.departments = options;

        if let Some(name) = default_name {
            if !self.names.iter().any(|n| **n == *self.settings.name) {
                self.settings.name = name;
            }
        }
        self.export_enabled = true;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("👶 Prénoms de France")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Baby names 1900-2020")
                    .size(11.0)
                    .color(Color32::GRAY),
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
                if Self::path_row(ui, "Names:", &self.settings.names_path) {
                    action = ControlPanelAction::BrowseNames;
                }
                ui.add_space(4.0);
                if Self::path_row(ui, "Boundaries:", &self.settings.departments_path) {
                    action = ControlPanelAction::BrowseDepartments;
                }
                ui.add_space(6.0);
                ui.vertical_centered(|ui| {
                    if ui.button("⟳ Reload").clicked() {
                        action = ControlPanelAction::Reload;
                    }
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== View Section =====
        ui.label(RichText::new("📊 View").size(14.0).strong());
        ui.add_space(5.0);

        for tab in [Tab::TopNames, Tab::DepartmentMap, Tab::GenderShares] {
            if ui
                .radio_value(&mut self.settings.tab, tab, tab.title())
                .changed()
            {
                action = ControlPanelAction::FiltersChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Section =====
        ui.label(RichText::new("🔧 Filters").size(14.0).strong());
        ui.add_space(8.0);

        match self.settings.tab {
            Tab::TopNames => {
                if let Some((min, max)) = self.year_range {
                    ui.horizontal(|ui| {
                        ui.label("Year:");
                        if ui
                            .add(egui::Slider::new(&mut self.settings.year, min..=max))
                            .changed()
                        {
                            action = ControlPanelAction::FiltersChanged;
                        }
                    });
                } else {
                    ui.label(RichText::new("No years loaded").color(Color32::GRAY));
                }
            }
            Tab::DepartmentMap => {
                ui.label(
                    RichText::new("Most and least given names over all years")
                        .size(12.0)
                        .color(Color32::GRAY),
                );
            }
            Tab::GenderShares => {
                if self.show_gender_filters(ui) {
                    action = ControlPanelAction::FiltersChanged;
                }
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("💾 Export Charts").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Export;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("⏳ Status").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") || self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Name search + picker and department picker. Returns true on change.
    fn show_gender_filters(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;
        let label_width = 90.0;
        let combo_width = 170.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Search:"));
            ui.add(egui::TextEdit::singleline(&mut self.name_query).desired_width(combo_width));
        });
        ui.add_space(5.0);

        let query = self.name_query.trim().to_uppercase();
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Name:"));
            ComboBox::from_id_salt("name")
                .width(combo_width)
                .selected_text(&self.settings.name)
                .show_ui(ui, |ui| {
                    ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                        for name in self
                            .names
                            .iter()
                            .filter(|n| n.starts_with(query.as_str()))
                            .take(NAME_LIST_LIMIT)
                        {
                            if ui
                                .selectable_label(*self.settings.name == **name, name.as_ref())
                                .clicked()
                            {
                                self.settings.name = name.to_string();
                                changed = true;
                            }
                        }
                    });
                });
        });
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Department:"));
            ComboBox::from_id_salt("department")
                .width(combo_width)
                .selected_text(&self.settings.department)
                .show_ui(ui, |ui| {
                    for department in &self.departments {
                        if ui
                            .selectable_label(self.settings.department == *department, department)
                            .clicked()
                        {
                            self.settings.department = department.clone();
                            changed = true;
                        }
                    }
                });
        });

        changed
    }

    /// File name with a browse button; true when the button was clicked.
    fn path_row(ui: &mut egui::Ui, label: &str, path: &Path) -> bool {
        let mut clicked = false;
        ui.horizontal(|ui| {
            ui.label(RichText::new(label).size(12.0));
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "No file selected".to_string());
            ui.label(RichText::new(file_name).size(12.0).color(if path.exists() {
                Color32::WHITE
            } else {
                Color32::GRAY
            }));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("📂 Browse").clicked() {
                    clicked = true;
                }
            });
        });
        clicked
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseNames,
    BrowseDepartments,
    Reload,
    FiltersChanged,
    Export,
}
