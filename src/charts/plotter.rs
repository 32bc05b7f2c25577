//! Chart Plotter Module
//! Interactive versions of the three charts using egui_plot.

use crate::charts::tidy::{DepartmentMapRow, GenderShareRow, TopNameRow};
use crate::charts::{heat_rgb, BOYS_RGB, GIRLS_RGB, NO_DATA_RGB};
use egui::{Color32, RichText, Stroke};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points, Polygon};

pub const BAR_COLOR: Color32 = Color32::from_rgb(70, 130, 180); // Steel blue

fn rgb((r, g, b): (u8, u8, u8)) -> Color32 {
    Color32::from_rgb(r, g, b)
}

/// Draws the dashboard charts with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Horizontal bars, best rank on top.
    pub fn draw_top_names(ui: &mut egui::Ui, rows: &[TopNameRow], year: i32) {
        let n = rows.len();
        // Bar i sits at y = n - 1 - i so rank 1 is the top bar
        let y_labels: Vec<String> = (0..n).rev().map(|i| rows[i].name.clone()).collect();

        let bars: Vec<Bar> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Bar::new((n - 1 - i) as f64, row.births as f64)
                    .name(format!("{} ({}): {}", row.name, row.year, row.births))
            })
            .collect();

        Plot::new(format!("top_names_{}", year))
            .height(ui.available_height().max(300.0))
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label("Number of Births")
            .y_axis_label("Name")
            .include_x(0.0)
            .y_axis_formatter(move |mark, _range| {
                let v = mark.value;
                if (v - v.round()).abs() > 1e-6 || v < 0.0 {
                    return String::new();
                }
                y_labels.get(v.round() as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .horizontal()
                        .width(0.7)
                        .color(BAR_COLOR)
                        .name("Births")
                        .element_formatter(Box::new(|bar, _chart| bar.name.clone())),
                );
            });
    }

    /// Choropleth of `max_count`; returns the index of the hovered row.
    pub fn draw_department_map(ui: &mut egui::Ui, rows: &[DepartmentMapRow]) -> Option<usize> {
        let max_count = rows.iter().filter_map(|r| r.max_count).max().unwrap_or(1).max(1);

        // Equirectangular map around mainland France latitudes
        let mean_lat = rows
            .iter()
            .filter_map(|r| r.boundary.geometry.as_ref()?.bounds())
            .map(|b| (b[1] + b[3]) / 2.0)
            .fold((0.0, 0usize), |(sum, n), lat| (sum + lat, n + 1));
        let aspect = if mean_lat.1 > 0 {
            1.0 / (mean_lat.0 / mean_lat.1 as f64).to_radians().cos().max(0.1)
        } else {
            1.0
        };

        let response = Plot::new("department_map")
            .height(ui.available_height().max(400.0))
            .data_aspect(aspect as f32)
            .show_axes(false)
            .show_grid(false)
            .allow_scroll(false)
            .show_x(false)
            .show_y(false)
            .show(ui, |plot_ui| {
                let hovered = plot_ui.pointer_coordinate().and_then(|p| {
                    rows.iter().position(|r| {
                        r.boundary
                            .geometry
                            .as_ref()
                            .is_some_and(|g| g.contains([p.x, p.y]))
                    })
                });

                for (i, row) in rows.iter().enumerate() {
                    let Some(geometry) = &row.boundary.geometry else {
                        continue;
                    };
                    let fill = match row.max_count {
                        Some(count) => rgb(heat_rgb(count as f64 / max_count as f64)),
                        None => rgb(NO_DATA_RGB),
                    };
                    let stroke = if hovered == Some(i) {
                        Stroke::new(2.5, Color32::BLACK)
                    } else {
                        Stroke::new(0.8, Color32::WHITE)
                    };

                    for ring in geometry.outer_rings() {
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::from(ring.clone()))
                                .fill_color(fill)
                                .stroke(stroke)
                                .name(&row.department),
                        );
                    }
                }

                hovered
            });

        response.inner
    }

    /// Details of the hovered department, or a hint when nothing is hovered.
    pub fn draw_department_details(ui: &mut egui::Ui, row: Option<&DepartmentMapRow>) {
        let Some(row) = row else {
            ui.label(
                RichText::new("Hover over a department to see details")
                    .size(12.0)
                    .color(Color32::GRAY),
            );
            return;
        };

        egui::Grid::new("department_details")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Department").strong());
                ui.label(format!("{} ({})", row.department, row.code));
                ui.end_row();

                match (&row.max_name, row.max_count, &row.min_name, row.min_count) {
                    (Some(max_name), Some(max_count), Some(min_name), Some(min_count)) => {
                        ui.label(RichText::new("Most given").strong());
                        ui.label(format!("{} ({})", max_name, max_count));
                        ui.end_row();
                        ui.label(RichText::new("Least given").strong());
                        ui.label(format!("{} ({})", min_name, min_count));
                        ui.end_row();
                    }
                    _ => {
                        ui.label(RichText::new("Names").strong());
                        ui.label("No records");
                        ui.end_row();
                    }
                }
            });
    }

    /// One line per sex, percentages on a fixed 0-100 axis.
    pub fn draw_gender_shares(ui: &mut egui::Ui, rows: &[GenderShareRow], title: &str) {
        ui.label(RichText::new(title).size(15.0).strong());
        ui.add_space(6.0);

        Plot::new("gender_shares")
            .height(ui.available_height().max(300.0))
            .legend(Legend::default())
            .x_axis_label("Year")
            .y_axis_label("Percentage (%)")
            .include_y(0.0)
            .include_y(100.0)
            .x_axis_formatter(|mark, _range| {
                let v = mark.value;
                if (v - v.round()).abs() < 1e-6 {
                    format!("{}", v.round() as i64)
                } else {
                    String::new()
                }
            })
            .label_formatter(|name, value| {
                if name.is_empty() {
                    String::new()
                } else {
                    format!("{}\n{}: {:.1}%", name, value.x.round() as i64, value.y)
                }
            })
            .show(ui, |plot_ui| {
                for (label, color) in [("Boys", rgb(BOYS_RGB)), ("Girls", rgb(GIRLS_RGB))] {
                    let points: Vec<[f64; 2]> = rows
                        .iter()
                        .filter(|r| r.sex == label)
                        .map(|r| [r.year as f64, r.percentage])
                        .collect();

                    plot_ui.line(
                        Line::new(PlotPoints::from(points.clone()))
                            .color(color)
                            .width(2.0)
                            .name(label),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from(points))
                            .radius(3.0)
                            .color(color)
                            .name(label),
                    );
                }
            });
    }

    /// Centered "no data" notice.
    pub fn draw_no_data(ui: &mut egui::Ui, message: &str) {
        ui.centered_and_justified(|ui| {
            ui.label(
                RichText::new(format!("⚠ {}", message))
                    .size(16.0)
                    .color(Color32::from_rgb(230, 126, 34)),
            );
        });
    }
}
