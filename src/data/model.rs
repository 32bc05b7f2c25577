//! Dataset Model
//! Typed rows of the cleaned names table, the department boundaries and
//! their join.

use crate::data::geo::Geometry;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

/// Sex as encoded in the `sexe` column (1 = boys, 2 = girls).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Sex::Male),
            2 => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Sex::Male => 1,
            Sex::Female => 2,
        }
    }

    /// Chart label for the series.
    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "Boys",
            Sex::Female => "Girls",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One cleaned row of the names dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NameRecord {
    pub department_code: Arc<str>,
    /// Upper-case first name.
    pub name: Arc<str>,
    pub sex: Sex,
    pub year: i32,
    pub count: u64,
}

/// A department and its boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentBoundary {
    pub code: String,
    pub name: String,
    pub geometry: Option<Geometry>,
}

/// A name record with its department boundary, if one matched.
#[derive(Debug, Clone)]
pub struct JoinedRecord {
    pub record: NameRecord,
    pub department: Option<Arc<DepartmentBoundary>>,
}

impl JoinedRecord {
    pub fn department_name(&self) -> Option<&str> {
        self.department.as_deref().map(|d| d.name.as_str())
    }
}

/// The three loaded tables. Built once and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub names: Vec<NameRecord>,
    pub departments: Vec<Arc<DepartmentBoundary>>,
    pub joined: Vec<JoinedRecord>,
}

impl Dataset {
    /// Assemble a dataset, joining every name record to its boundary on code.
    ///
    /// Name records without a boundary are kept with no department.
    pub fn new(names: Vec<NameRecord>, departments: Vec<DepartmentBoundary>) -> Self {
        let departments: Vec<Arc<DepartmentBoundary>> =
            departments.into_iter().map(Arc::new).collect();

        let by_code: HashMap<&str, &Arc<DepartmentBoundary>> = departments
            .iter()
            .map(|d| (d.code.as_str(), d))
            .collect();

        let joined = names
            .iter()
            .map(|record| JoinedRecord {
                record: record.clone(),
                department: by_code.get(&*record.department_code).map(|d| Arc::clone(d)),
            })
            .collect();

        Self {
            names,
            departments,
            joined,
        }
    }

    /// Sorted unique first names.
    pub fn unique_names(&self) -> Vec<Arc<str>> {
        let names: BTreeSet<&Arc<str>> = self.names.iter().map(|r| &r.name).collect();
        names.into_iter().cloned().collect()
    }

    /// Sorted unique department names from the boundary table.
    pub fn department_names(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self.departments.iter().map(|d| d.name.as_str()).collect();
        names.into_iter().map(str::to_string).collect()
    }

    /// Observed (min, max) year, or `None` for an empty table.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.names.iter().map(|r| r.year).min()?;
        let max = self.names.iter().map(|r| r.year).max()?;
        Some((min, max))
    }

    pub fn department(&self, code: &str) -> Option<&Arc<DepartmentBoundary>> {
        self.departments.iter().find(|d| d.code == code)
    }
}
