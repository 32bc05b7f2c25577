//! Gender Trend Module
//! Share of boys and girls given a name, year by year.

use crate::data::{JoinedRecord, Sex};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Which departments a trend covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum DepartmentFilter {
    #[default]
    All,
    /// Department name as listed in the boundary table.
    Named(String),
}

impl DepartmentFilter {
    pub const ALL_LABEL: &'static str = "All";

    /// Parse a picker label; `"All"` selects every department.
    pub fn from_label(label: &str) -> Self {
        if label == Self::ALL_LABEL {
            DepartmentFilter::All
        } else {
            DepartmentFilter::Named(label.to_string())
        }
    }

    fn matches(&self, record: &JoinedRecord) -> bool {
        match self {
            DepartmentFilter::All => true,
            DepartmentFilter::Named(name) => record.department_name() == Some(name.as_str()),
        }
    }
}

impl fmt::Display for DepartmentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepartmentFilter::All => f.write_str(Self::ALL_LABEL),
            DepartmentFilter::Named(name) => f.write_str(name),
        }
    }
}

/// Boys and girls given the name in one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderYear {
    pub year: i32,
    pub boys_count: u64,
    pub girls_count: u64,
    pub total: u64,
    pub pct_boys: f64,
    pub pct_girls: f64,
}

impl GenderYear {
    fn new(year: i32, boys_count: u64, girls_count: u64) -> Self {
        let total = boys_count + girls_count;
        let (pct_boys, pct_girls) = if total == 0 {
            (0.0, 0.0)
        } else {
            (
                boys_count as f64 / total as f64 * 100.0,
                girls_count as f64 / total as f64 * 100.0,
            )
        };
        Self {
            year,
            boys_count,
            girls_count,
            total,
            pct_boys,
            pct_girls,
        }
    }
}

/// Result of a gender query.
#[derive(Debug, Clone, PartialEq)]
pub enum GenderTrend {
    /// Nothing matched the name/department selection.
    NoData,
    /// One entry per year present, ascending.
    Series(Vec<GenderYear>),
}

impl GenderTrend {
    pub fn is_no_data(&self) -> bool {
        matches!(self, GenderTrend::NoData)
    }

    pub fn years(&self) -> &[GenderYear] {
        match self {
            GenderTrend::NoData => &[],
            GenderTrend::Series(years) => years,
        }
    }
}

/// Gender split of `name` (case-insensitive) within `filter`.
pub fn gender_trend(joined: &[JoinedRecord], name: &str, filter: &DepartmentFilter) -> GenderTrend {
    // Stored names are upper-case already
    let wanted = name.trim().to_uppercase();

    let mut by_year: BTreeMap<i32, (u64, u64)> = BTreeMap::new();
    let mut matched = false;
    for joined_record in joined {
        let record = &joined_record.record;
        if *record.name != *wanted || !filter.matches(joined_record) {
            continue;
        }
        matched = true;
        let entry = by_year.entry(record.year).or_insert((0, 0));
        match record.sex {
            Sex::Male => entry.0 += record.count,
            Sex::Female => entry.1 += record.count,
        }
    }

    if !matched {
        return GenderTrend::NoData;
    }

    GenderTrend::Series(
        by_year
            .into_iter()
            .map(|(year, (boys, girls))| GenderYear::new(year, boys, girls))
            .collect(),
    )
}
