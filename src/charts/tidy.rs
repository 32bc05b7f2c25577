//! Tidy Table Module
//! Reshapes aggregation results into the long-format rows the charts encode.

use crate::data::{DepartmentBoundary, Sex};
use crate::stats::{DepartmentExtremes, GenderTrend, NameTotal};
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// One bar of the yearly ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopNameRow {
    pub year: i32,
    pub rank: usize,
    pub name: String,
    pub births: u64,
}

/// One department on the map, with its extremes when it has records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentMapRow {
    pub code: String,
    pub department: String,
    pub max_name: Option<String>,
    pub max_count: Option<u64>,
    pub min_name: Option<String>,
    pub min_count: Option<u64>,
    #[serde(skip)]
    pub boundary: Arc<DepartmentBoundary>,
}

/// One point of the gender line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderShareRow {
    pub year: i32,
    pub sex: &'static str,
    pub percentage: f64,
}

pub struct TidyTables;

impl TidyTables {
    /// Ranked rows for one year, rank starting at 1.
    pub fn top_names(year: i32, totals: &[NameTotal]) -> Vec<TopNameRow> {
        totals
            .iter()
            .enumerate()
            .map(|(i, t)| TopNameRow {
                year,
                rank: i + 1,
                name: t.name.to_string(),
                births: t.total,
            })
            .collect()
    }

    /// Left join of every boundary with its department's extremes.
    pub fn department_map(
        departments: &[Arc<DepartmentBoundary>],
        extremes: &[DepartmentExtremes],
    ) -> Vec<DepartmentMapRow> {
        let by_code: HashMap<&str, &DepartmentExtremes> = extremes
            .iter()
            .map(|e| (e.department_code.as_ref(), e))
            .collect();

        departments
            .iter()
            .map(|d| {
                let e = by_code.get(d.code.as_str());
                DepartmentMapRow {
                    code: d.code.clone(),
                    department: d.name.clone(),
                    max_name: e.map(|e| e.max_name.to_string()),
                    max_count: e.map(|e| e.max_count),
                    min_name: e.map(|e| e.min_name.to_string()),
                    min_count: e.map(|e| e.min_count),
                    boundary: Arc::clone(d),
                }
            })
            .collect()
    }

    /// Melt the per-year percentages into one row per (year, sex).
    ///
    /// `None` when the trend carries the no-data signal.
    pub fn gender_shares(trend: &GenderTrend) -> Option<Vec<GenderShareRow>> {
        let GenderTrend::Series(years) = trend else {
            return None;
        };

        let mut rows = Vec::with_capacity(years.len() * 2);
        for y in years {
            for (sex, percentage) in [(Sex::Male, y.pct_boys), (Sex::Female, y.pct_girls)] {
                rows.push(GenderShareRow {
                    year: y.year,
                    sex: sex.label(),
                    percentage,
                });
            }
        }
        Some(rows)
    }

    pub fn top_names_frame(rows: &[TopNameRow]) -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            Column::new("year".into(), rows.iter().map(|r| r.year).collect::<Vec<i32>>()),
            Column::new(
                "rank".into(),
                rows.iter().map(|r| r.rank as u32).collect::<Vec<u32>>(),
            ),
            Column::new(
                "name".into(),
                rows.iter().map(|r| r.name.as_str()).collect::<Vec<&str>>(),
            ),
            Column::new(
                "births".into(),
                rows.iter().map(|r| r.births).collect::<Vec<u64>>(),
            ),
        ])
    }

    pub fn department_map_frame(rows: &[DepartmentMapRow]) -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            Column::new(
                "code".into(),
                rows.iter().map(|r| r.code.as_str()).collect::<Vec<&str>>(),
            ),
            Column::new(
                "department".into(),
                rows.iter()
                    .map(|r| r.department.as_str())
                    .collect::<Vec<&str>>(),
            ),
            Column::new(
                "max_name".into(),
                rows.iter()
                    .map(|r| r.max_name.as_deref())
                    .collect::<Vec<Option<&str>>>(),
            ),
            Column::new(
                "max_count".into(),
                rows.iter().map(|r| r.max_count).collect::<Vec<Option<u64>>>(),
            ),
            Column::new(
                "min_name".into(),
                rows.iter()
                    .map(|r| r.min_name.as_deref())
                    .collect::<Vec<Option<&str>>>(),
            ),
            Column::new(
                "min_count".into(),
                rows.iter().map(|r| r.min_count).collect::<Vec<Option<u64>>>(),
            ),
        ])
    }

    pub fn gender_shares_frame(rows: &[GenderShareRow]) -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            Column::new("year".into(), rows.iter().map(|r| r.year).collect::<Vec<i32>>()),
            Column::new("sex".into(), rows.iter().map(|r| r.sex).collect::<Vec<&str>>()),
            Column::new(
                "percentage".into(),
                rows.iter().map(|r| r.percentage).collect::<Vec<f64>>(),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{department, record};
    use crate::data::Dataset;
    use crate::stats::{department_extremes, gender_trend, top_names_for_year, DepartmentFilter};

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                record("01", "ALICE", Sex::Female, 2000, 50),
                record("02", "BOB", Sex::Male, 2000, 70),
                record("02", "ALICE", Sex::Female, 2000, 30),
                record("01", "CAMILLE", Sex::Male, 1980, 10),
                record("01", "CAMILLE", Sex::Female, 1980, 40),
            ],
            vec![
                department("01", "Ain"),
                department("02", "Aisne"),
                department("03", "Allier"),
            ],
        )
    }

    #[test]
    fn test_top_name_rows_are_ranked() {
        let dataset = dataset();
        let rows = TidyTables::top_names(2000, &top_names_for_year(&dataset.names, 2000));
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].name, "ALICE");
        assert_eq!(rows[0].births, 80);
        assert_eq!(rows[1].rank, 2);

        let frame = TidyTables::top_names_frame(&rows).unwrap();
        assert_eq!(frame.shape(), (2, 4));
    }

    #[test]
    fn test_map_keeps_departments_without_records() {
        let dataset = dataset();
        let extremes = department_extremes(&dataset.names);
        let rows = TidyTables::department_map(&dataset.departments, &extremes);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].max_name.as_deref(), Some("ALICE"));
        assert_eq!(rows[1].max_name.as_deref(), Some("BOB"));
        assert_eq!(rows[2].department, "Allier");
        assert_eq!(rows[2].max_count, None);

        let frame = TidyTables::department_map_frame(&rows).unwrap();
        assert_eq!(frame.shape(), (3, 6));
    }

    #[test]
    fn test_gender_melt_is_long_format() {
        let dataset = dataset();
        let trend = gender_trend(&dataset.joined, "Camille", &DepartmentFilter::All);
        let rows = TidyTables::gender_shares(&trend).unwrap();

        assert_eq!(
            rows,
            vec![
                GenderShareRow { year: 1980, sex: "Boys", percentage: 20.0 },
                GenderShareRow { year: 1980, sex: "Girls", percentage: 80.0 },
            ]
        );
        assert_eq!(TidyTables::gender_shares_frame(&rows).unwrap().height(), 2);
    }

    #[test]
    fn test_no_data_has_no_rows() {
        assert!(TidyTables::gender_shares(&GenderTrend::NoData).is_none());
    }
}
