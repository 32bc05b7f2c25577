//! Export Module
//! Writes the chart specifications, tidy tables and PNG renderings of the
//! three views into a directory.

use crate::charts::{gender_title, ChartSpecs, StaticChartRenderer, TidyTables, TopNameRow};
use crate::stats::{DepartmentFilter, NameStats};
use polars::prelude::*;
use serde_json::Value;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const IMAGE_SIZE: (u32, u32) = (1400, 1000);

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Drawing failed: {0}")]
    Drawing(String),
}

/// Filter values the export is taken at.
#[derive(Debug, Clone)]
pub struct ExportSelection {
    pub year: i32,
    pub name: String,
    pub department: DepartmentFilter,
}

/// Files written by one export.
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub files: Vec<PathBuf>,
    /// Set when the gender selection matched nothing and its chart was skipped.
    pub gender_no_data: bool,
}

pub struct Exporter;

impl Exporter {
    /// Write every spec and tidy table, then render the PNGs.
    ///
    /// A failed rendering does not stop the others; drawing errors are reported
    /// together once all files have been attempted.
    pub fn export_all(
        stats: &mut NameStats,
        selection: &ExportSelection,
        out_dir: &Path,
    ) -> Result<ExportSummary, ExportError> {
        fs::create_dir_all(out_dir)?;
        let mut summary = ExportSummary::default();
        let year = stats.clamp_year(selection.year);

        // View 1: every year's ranking so the year slider can move freely
        let years: Vec<i32> = stats.yearly().years().collect();
        let mut all_rows: Vec<TopNameRow> = Vec::new();
        for y in years {
            all_rows.extend(TidyTables::top_names(y, &stats.top_names(y)));
        }
        let year_rows = TidyTables::top_names(year, &stats.top_names(year));
        let year_range = stats.year_range().unwrap_or((year, year));

        Self::write_json(
            &ChartSpecs::top_names(&all_rows, year_range, year),
            &out_dir.join("top_names.vl.json"),
            &mut summary,
        )?;
        Self::write_csv(
            &mut TidyTables::top_names_frame(&all_rows)?,
            &out_dir.join("top_names.csv"),
            &mut summary,
        )?;

        // View 2
        let extremes = stats.department_extremes();
        let map_rows = TidyTables::department_map(&stats.dataset().departments, &extremes);
        Self::write_json(
            &ChartSpecs::department_map(&map_rows),
            &out_dir.join("department_map.vl.json"),
            &mut summary,
        )?;
        Self::write_csv(
            &mut TidyTables::department_map_frame(&map_rows)?,
            &out_dir.join("department_map.csv"),
            &mut summary,
        )?;

        // View 3
        let trend = stats.gender_trend(&selection.name, &selection.department);
        let title = gender_title(&selection.name, &selection.department);
        let gender_rows = TidyTables::gender_shares(&trend);
        match &gender_rows {
            Some(rows) => {
                Self::write_json(
                    &ChartSpecs::gender_shares(rows, &title),
                    &out_dir.join("gender_shares.vl.json"),
                    &mut summary,
                )?;
                Self::write_csv(
                    &mut TidyTables::gender_shares_frame(rows)?,
                    &out_dir.join("gender_shares.csv"),
                    &mut summary,
                )?;
            }
            None => {
                warn!(
                    name = %selection.name,
                    department = %selection.department,
                    "no data for gender chart, skipped"
                );
                summary.gender_no_data = true;
            }
        }

        // PNGs last
        let mut failures: Vec<String> = Vec::new();
        let png = out_dir.join("top_names.png");
        Self::record_png(
            StaticChartRenderer::render_top_names(&year_rows, year, &png, IMAGE_SIZE),
            png,
            &mut summary,
            &mut failures,
        );
        let png = out_dir.join("department_map.png");
        Self::record_png(
            StaticChartRenderer::render_department_map(&map_rows, &png, IMAGE_SIZE),
            png,
            &mut summary,
            &mut failures,
        );
        if let Some(rows) = &gender_rows {
            let png = out_dir.join("gender_shares.png");
            Self::record_png(
                StaticChartRenderer::render_gender_shares(rows, &title, &png, IMAGE_SIZE),
                png,
                &mut summary,
                &mut failures,
            );
        }

        if !failures.is_empty() {
            return Err(ExportError::Drawing(failures.join("; ")));
        }

        info!(files = summary.files.len(), dir = %out_dir.display(), "export complete");
        Ok(summary)
    }

    fn record_png(
        result: Result<(), ExportError>,
        path: PathBuf,
        summary: &mut ExportSummary,
        failures: &mut Vec<String>,
    ) {
        match result {
            Ok(()) => summary.files.push(path),
            Err(e) => {
                warn!(path = %path.display(), "rendering failed: {}", e);
                failures.push(format!("{}: {}", path.display(), e));
            }
        }
    }

    fn write_json(
        spec: &Value,
        path: &Path,
        summary: &mut ExportSummary,
    ) -> Result<(), ExportError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, spec)?;
        summary.files.push(path.to_path_buf());
        Ok(())
    }

    fn write_csv(
        df: &mut DataFrame,
        path: &Path,
        summary: &mut ExportSummary,
    ) -> Result<(), ExportError> {
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b';')
            .finish(df)?;
        summary.files.push(path.to_path_buf());
        Ok(())
    }
}
