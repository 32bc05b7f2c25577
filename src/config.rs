//! Application Configuration
//! Dataset locations and default filters, from command-line flags with
//! `PRENOMS_*` / `LOG_LEVEL` environment fallbacks.

use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_NAMES_CSV: &str = "dpt2020.csv";
pub const DEFAULT_DEPARTMENTS_GEOJSON: &str = "departements-version-simplifiee.geojson";
pub const DEFAULT_YEAR: i32 = 2000;
pub const DEFAULT_NAME: &str = "CAMILLE";

/// Runtime configuration for the dashboard.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "prenoms_dashboard",
    version,
    about = "French baby names dashboard: yearly top names, department map and gender trends"
)]
pub struct AppConfig {
    /// Semicolon-delimited names-by-department file.
    #[arg(
        long = "names",
        value_name = "PATH",
        env = "PRENOMS_NAMES_CSV",
        default_value = DEFAULT_NAMES_CSV
    )]
    pub names_path: PathBuf,

    /// GeoJSON feature collection of department boundaries.
    #[arg(
        long = "departments",
        value_name = "PATH",
        env = "PRENOMS_DEPARTMENTS_GEOJSON",
        default_value = DEFAULT_DEPARTMENTS_GEOJSON
    )]
    pub departments_path: PathBuf,

    /// Year shown first in the top names view.
    #[arg(long = "year", env = "PRENOMS_DEFAULT_YEAR", default_value_t = DEFAULT_YEAR)]
    pub default_year: i32,

    /// Name shown first in the gender view.
    #[arg(
        long = "name",
        env = "PRENOMS_DEFAULT_NAME",
        default_value = DEFAULT_NAME,
        value_parser = upper_name
    )]
    pub default_name: String,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Export every chart into this directory and exit, without a window.
    #[arg(long = "export", value_name = "DIR")]
    pub export_dir: Option<PathBuf>,
}

fn upper_name(value: &str) -> Result<String, String> {
    let name = value.trim().to_uppercase();
    if name.is_empty() {
        return Err("name must not be empty".to_string());
    }
    Ok(name)
}
