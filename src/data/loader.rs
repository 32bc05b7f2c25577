//! Dataset Loader Module
//! Reads the names CSV with Polars and the department GeoJSON, cleans the
//! names table and joins the two.

use crate::config::AppConfig;
use crate::data::geo::{self, RawFeature};
use crate::data::model::{Dataset, DepartmentBoundary, NameRecord, Sex};
use polars::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

/// Placeholder name standing for every rare name of a department/year.
pub const RARE_NAMES: &str = "_PRENOMS_RARES";
/// Department code for births recorded abroad or with no known department.
pub const UNKNOWN_DEPARTMENT: &str = "XX";

pub const COL_SEX: &str = "sexe";
pub const COL_NAME: &str = "preusuel";
pub const COL_YEAR: &str = "annais";
pub const COL_DEPARTMENT: &str = "dpt";
pub const COL_COUNT: &str = "nombre";

const REQUIRED_COLUMNS: [&str; 5] = [COL_SEX, COL_NAME, COL_YEAR, COL_DEPARTMENT, COL_COUNT];

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Malformed GeoJSON in {path}: {source}")]
    GeoJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },
    #[error("Feature #{index} is missing required property '{property}'")]
    MissingProperty { index: usize, property: String },
}

/// Loads the names table and the department boundaries.
pub struct DataLoader;

impl DataLoader {
    /// Load, clean and join both inputs named by `config`.
    pub fn load(config: &AppConfig) -> Result<Dataset, DataLoadError> {
        Self::load_paths(&config.names_path, &config.departments_path)
    }

    pub fn load_paths(names_path: &Path, departments_path: &Path) -> Result<Dataset, DataLoadError> {
        let start = Instant::now();

        let (names, departments) = rayon::join(
            || Self::load_names(names_path),
            || Self::load_departments(departments_path),
        );
        let names = names?;
        let departments = departments?;

        let dataset = Dataset::new(names, departments);
        info!(
            names = dataset.names.len(),
            departments = dataset.departments.len(),
            elapsed = ?start.elapsed(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Read and clean the semicolon-delimited names file.
    pub fn load_names(path: &Path) -> Result<Vec<NameRecord>, DataLoadError> {
        fs::metadata(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        // Read every column as text; coercion happens in `clean_names`
        let raw = LazyCsvReader::new(path)
            .with_separator(b';')
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;
        debug!(rows = raw.height(), path = %path.display(), "names file read");

        let columns: Vec<String> = raw
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        for required in REQUIRED_COLUMNS {
            if !columns.iter().any(|c| c == required) {
                return Err(DataLoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: required.to_string(),
                });
            }
        }

        let cleaned = Self::clean_names(raw)?;
        let records = Self::to_records(&cleaned)?;
        debug!(rows = records.len(), "names table cleaned");
        Ok(records)
    }

    /// Drop placeholder rows and coerce year/count/sex to integers.
    ///
    /// Rows where a coercion fails or the name is empty are dropped.
    pub fn clean_names(raw: DataFrame) -> Result<DataFrame, DataLoadError> {
        let df = raw
            .lazy()
            .filter(col(COL_NAME).neq(lit(RARE_NAMES)))
            .filter(col(COL_DEPARTMENT).neq(lit(UNKNOWN_DEPARTMENT)))
            .with_columns([
                col(COL_YEAR)
                    .cast(DataType::Float64)
                    .cast(DataType::Int32)
                    .alias(COL_YEAR),
                col(COL_COUNT)
                    .cast(DataType::Float64)
                    .cast(DataType::Int64)
                    .alias(COL_COUNT),
                col(COL_SEX)
                    .cast(DataType::Float64)
                    .cast(DataType::Int32)
                    .alias(COL_SEX),
            ])
            .filter(
                col(COL_YEAR)
                    .is_not_null()
                    .and(col(COL_COUNT).is_not_null())
                    .and(col(COL_COUNT).gt_eq(lit(0)))
                    .and(col(COL_NAME).is_not_null())
                    .and(col(COL_NAME).neq(lit("")))
                    .and(col(COL_DEPARTMENT).is_not_null()),
            )
            .collect()?;
        Ok(df)
    }

    /// Convert the cleaned frame into typed records, interning repeated strings.
    fn to_records(df: &DataFrame) -> Result<Vec<NameRecord>, DataLoadError> {
        let departments = df.column(COL_DEPARTMENT)?.str()?;
        let names = df.column(COL_NAME)?.str()?;
        let sexes = df.column(COL_SEX)?.i32()?;
        let years = df.column(COL_YEAR)?.i32()?;
        let counts = df.column(COL_COUNT)?.i64()?;

        let mut interned: HashMap<String, Arc<str>> = HashMap::new();
        let mut intern = |value: &str| -> Arc<str> {
            if let Some(existing) = interned.get(value) {
                return Arc::clone(existing);
            }
            let shared: Arc<str> = Arc::from(value);
            interned.insert(value.to_string(), Arc::clone(&shared));
            shared
        };

        let mut records = Vec::with_capacity(df.height());
        let rows = departments
            .into_iter()
            .zip(names)
            .zip(sexes)
            .zip(years)
            .zip(counts);
        for ((((dpt, name), sex), year), count) in rows {
            let (Some(dpt), Some(name), Some(sex), Some(year), Some(count)) =
                (dpt, name, sex, year, count)
            else {
                continue;
            };
            let Some(sex) = Sex::from_code(sex) else {
                continue;
            };
            let name = name.trim().to_uppercase();
            if name.is_empty() {
                continue;
            }

            records.push(NameRecord {
                department_code: intern(dpt.trim()),
                name: intern(&name),
                sex,
                year,
                count: count as u64,
            });
        }

        Ok(records)
    }

    /// Read the department feature collection.
    pub fn load_departments(path: &Path) -> Result<Vec<DepartmentBoundary>, DataLoadError> {
        let text = fs::read_to_string(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let features = geo::parse_feature_collection(&text).map_err(|source| {
            DataLoadError::GeoJson {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let departments = Self::to_departments(features)?;
        debug!(departments = departments.len(), path = %path.display(), "boundaries read");
        Ok(departments)
    }

    fn to_departments(features: Vec<RawFeature>) -> Result<Vec<DepartmentBoundary>, DataLoadError> {
        features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| {
                let code = feature
                    .property("code")
                    .ok_or_else(|| DataLoadError::MissingProperty {
                        index,
                        property: "code".to_string(),
                    })?;
                let name = feature
                    .property("nom")
                    .ok_or_else(|| DataLoadError::MissingProperty {
                        index,
                        property: "nom".to_string(),
                    })?;
                Ok(DepartmentBoundary {
                    code,
                    name,
                    geometry: feature.geometry,
                })
            })
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::test_files::*;
    use super::*;

    #[test]
    fn test_load_names_applies_cleaning_rules() {
        let file = write_temp(NAMES_CSV, ".csv");
        let records = DataLoader::load_names(file.path()).unwrap();

        assert!(records.iter().all(|r| &*r.name != RARE_NAMES));
        assert!(records.iter().all(|r| &*r.department_code != UNKNOWN_DEPARTMENT));
        // ALICE, BOB, ALICE, CAMILLE x2, LEO survive; bad year/count/sex/empty name are dropped
        assert_eq!(records.len(), 6);
        assert!(records.iter().all(|r| !r.name.is_empty()));
        assert_eq!(records[0].name.as_ref(), "ALICE");
        assert_eq!(records[0].sex, Sex::Female);
        assert_eq!(records[0].year, 2000);
        assert_eq!(records[0].count, 50);
    }

    #[test]
    fn test_negative_and_fractional_values() {
        let file = write_temp(NAMES_CSV, ".csv");
        let records = DataLoader::load_names(file.path()).unwrap();

        assert!(records.iter().all(|r| &*r.name != "ZOE"));
        let leo = records.iter().find(|r| &*r.name == "LEO").unwrap();
        assert_eq!(leo.year, 1990);
        assert_eq!(leo.count, 12);
        assert_eq!(&*leo.department_code, "03");
    }

    #[test]
    fn test_load_names_is_deterministic() {
        let file = write_temp(NAMES_CSV, ".csv");
        let first = DataLoader::load_names(file.path()).unwrap();
        let second = DataLoader::load_names(file.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let file = write_temp("sexe;preusuel;annais;dpt\n1;BOB;2000;01\n", ".csv");
        let err = DataLoader::load_names(file.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn { ref column, .. } if column == "nombre"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = DataLoader::load_names(Path::new("/nonexistent/dpt2020.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
    }

    #[test]
    fn test_load_departments() {
        let file = write_temp(DEPARTMENTS_GEOJSON, ".geojson");
        let departments = DataLoader::load_departments(file.path()).unwrap();
        assert_eq!(departments.len(), 3);
        assert_eq!(departments[1].code, "02");
        assert_eq!(departments[1].name, "Aisne");
        assert!(departments[1].geometry.is_some());
    }

    #[test]
    fn test_department_without_name_is_an_error() {
        let file = write_temp(
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"code":"01"},"geometry":null}]}"#,
            ".geojson",
        );
        let err = DataLoader::load_departments(file.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingProperty { index: 0, .. }));
    }

    #[test]
    fn test_load_joins_tables() {
        let names = write_temp(NAMES_CSV, ".csv");
        let departments = write_temp(DEPARTMENTS_GEOJSON, ".geojson");
        let dataset = DataLoader::load_paths(names.path(), departments.path()).unwrap();

        assert_eq!(dataset.joined.len(), dataset.names.len());
        assert!(dataset
            .joined
            .iter()
            .all(|j| j.department_name().is_some()));
        assert_eq!(dataset.joined[1].department_name(), Some("Aisne"));
    }
}
