//! Static Chart Renderer
//! Draws the three dashboard charts to PNG files with plotters.
//!
//! - Top names: horizontal bars, best rank on top, birth count after each bar
//! - Department map: filled boundaries shaded by the most given name's births
//! - Gender shares: one line per sex, percentages on a fixed 0-100 axis

use crate::charts::tidy::{DepartmentMapRow, GenderShareRow, TopNameRow};
use crate::charts::{heat_rgb, BOYS_RGB, GIRLS_RGB, NO_DATA_RGB};
use crate::export::ExportError;
use plotters::prelude::*;
use std::fmt::Display;
use std::path::Path;

const STEELBLUE: RGBColor = RGBColor(70, 130, 180);

fn drawing(err: impl Display) -> ExportError {
    ExportError::Drawing(err.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    pub fn render_top_names(
        rows: &[TopNameRow],
        year: i32,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), ExportError> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let n = rows.len().max(1);
        let max_births = rows.iter().map(|r| r.births).max().unwrap_or(0).max(1) as f64;
        // Bottom slot holds the last rank
        let slot = |rank_index: usize| n - 1 - rank_index;
        let labels: Vec<String> = (0..n)
            .map(|s| {
                rows.get(n - 1 - s)
                    .map(|r| r.name.clone())
                    .unwrap_or_default()
            })
            .collect();

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Top 15 Baby Names - {year}"), ("sans-serif", 26))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(130)
            .build_cartesian_2d(0f64..max_births * 1.12, (0usize..n).into_segmented())
            .map_err(drawing)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc("Number of Births")
            .y_desc("Name")
            .y_labels(n)
            .y_label_formatter(&|v| match v {
                SegmentValue::CenterOf(s) => labels.get(*s).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .draw()
            .map_err(drawing)?;

        chart
            .draw_series(rows.iter().enumerate().map(|(i, row)| {
                let s = slot(i);
                let mut bar = Rectangle::new(
                    [
                        (0.0, SegmentValue::Exact(s)),
                        (row.births as f64, SegmentValue::Exact(s + 1)),
                    ],
                    STEELBLUE.filled(),
                );
                bar.set_margin(3, 3, 0, 0);
                bar
            }))
            .map_err(drawing)?;

        chart
            .draw_series(rows.iter().enumerate().map(|(i, row)| {
                Text::new(
                    row.births.to_string(),
                    (row.births as f64, SegmentValue::CenterOf(slot(i))),
                    ("sans-serif", 13).into_font().color(&BLACK),
                )
            }))
            .map_err(drawing)?;

        root.present().map_err(drawing)?;
        Ok(())
    }

    pub fn render_department_map(
        rows: &[DepartmentMapRow],
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), ExportError> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let bounds = rows
            .iter()
            .filter_map(|r| r.boundary.geometry.as_ref()?.bounds())
            .reduce(|a, b| [a[0].min(b[0]), a[1].min(b[1]), a[2].max(b[2]), a[3].max(b[3])])
            .unwrap_or([0.0, 0.0, 1.0, 1.0]);
        let max_count = rows.iter().filter_map(|r| r.max_count).max().unwrap_or(1).max(1);

        let mut chart = ChartBuilder::on(&root)
            .caption("Most Popular Name by Department (All Years)", ("sans-serif", 26))
            .margin(15)
            .build_cartesian_2d(bounds[0]..bounds[2], bounds[1]..bounds[3])
            .map_err(drawing)?;

        for row in rows {
            let Some(geometry) = &row.boundary.geometry else {
                continue;
            };
            let (r, g, b) = match row.max_count {
                Some(count) => heat_rgb(count as f64 / max_count as f64),
                None => NO_DATA_RGB,
            };
            let fill = RGBColor(r, g, b);

            for ring in geometry.outer_rings() {
                let points: Vec<(f64, f64)> = ring.iter().map(|&[x, y]| (x, y)).collect();
                chart
                    .draw_series(std::iter::once(Polygon::new(points.clone(), fill.filled())))
                    .map_err(drawing)?;
                chart
                    .draw_series(std::iter::once(PathElement::new(points, WHITE.stroke_width(1))))
                    .map_err(drawing)?;
            }
        }

        root.present().map_err(drawing)?;
        Ok(())
    }

    pub fn render_gender_shares(
        rows: &[GenderShareRow],
        title: &str,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), ExportError> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let min_year = rows.iter().map(|r| r.year).min().unwrap_or(1900);
        let max_year = rows.iter().map(|r| r.year).max().unwrap_or(min_year);

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(min_year..max_year + 1, 0f64..100f64)
            .map_err(drawing)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Percentage (%)")
            .draw()
            .map_err(drawing)?;

        for (label, (r, g, b)) in [("Boys", BOYS_RGB), ("Girls", GIRLS_RGB)] {
            let color = RGBColor(r, g, b);
            let points: Vec<(i32, f64)> = rows
                .iter()
                .filter(|row| row.sex == label)
                .map(|row| (row.year, row.percentage))
                .collect();

            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
                .map_err(drawing)?
                .label(label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            chart
                .draw_series(points.into_iter().map(|p| Circle::new(p, 3, color.filled())))
                .map_err(drawing)?;
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(drawing)?;

        root.present().map_err(drawing)?;
        Ok(())
    }
}
