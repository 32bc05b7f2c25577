//! Stats module - the three aggregations behind the dashboard views

pub mod extremes;
pub mod gender;
pub mod ranking;
pub mod views;

use thiserror::Error;

pub use extremes::{department_extremes, DepartmentExtremes};
pub use gender::{gender_trend, DepartmentFilter, GenderTrend, GenderYear};
pub use ranking::{top_names_for_year, NameTotal, YearlyTotals, TOP_N};
pub use views::NameStats;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AggregationError {
    #[error("Department {0} has no records")]
    EmptyDepartment(String),
}
