//! Department Extremes Module
//! Most and least given (name, sex) pair per department, over all years.

use crate::data::{NameRecord, Sex};
use crate::stats::AggregationError;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Births of one (name, sex) pair within a department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairTotal {
    pub name: Arc<str>,
    pub sex: Sex,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentExtremes {
    pub department_code: Arc<str>,
    pub max_name: Arc<str>,
    pub max_sex: Sex,
    pub max_count: u64,
    pub min_name: Arc<str>,
    pub min_sex: Sex,
    pub min_count: u64,
}

/// Totals per department, each list ordered by (name, sex).
pub fn department_pair_totals(records: &[NameRecord]) -> BTreeMap<Arc<str>, Vec<PairTotal>> {
    let mut sums: HashMap<(&Arc<str>, &Arc<str>, Sex), u64> = HashMap::new();
    for r in records {
        *sums.entry((&r.department_code, &r.name, r.sex)).or_insert(0) += r.count;
    }

    let mut by_department: BTreeMap<Arc<str>, Vec<PairTotal>> = BTreeMap::new();
    for ((dpt, name, sex), total) in sums {
        by_department
            .entry(Arc::clone(dpt))
            .or_default()
            .push(PairTotal {
                name: Arc::clone(name),
                sex,
                total,
            });
    }
    for pairs in by_department.values_mut() {
        pairs.sort_by(|a, b| a.name.cmp(&b.name).then(a.sex.cmp(&b.sex)));
    }
    by_department
}

/// Extremes of one department from its ordered pair totals.
///
/// Ties go to the first pair in (name, sex) order.
pub fn extremes_for(
    department_code: &Arc<str>,
    pairs: &[PairTotal],
) -> Result<DepartmentExtremes, AggregationError> {
    let first = pairs
        .first()
        .ok_or_else(|| AggregationError::EmptyDepartment(department_code.to_string()))?;

    let mut max = first;
    let mut min = first;
    for pair in &pairs[1..] {
        if pair.total > max.total {
            max = pair;
        }
        if pair.total < min.total {
            min = pair;
        }
    }

    Ok(DepartmentExtremes {
        department_code: Arc::clone(department_code),
        max_name: Arc::clone(&max.name),
        max_sex: max.sex,
        max_count: max.total,
        min_name: Arc::clone(&min.name),
        min_sex: min.sex,
        min_count: min.total,
    })
}

/// Extremes of every department that has records, ordered by code.
pub fn department_extremes(records: &[NameRecord]) -> Vec<DepartmentExtremes> {
    let totals = department_pair_totals(records);
    totals
        .par_iter()
        .filter_map(|(code, pairs)| extremes_for(code, pairs).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;

    fn records() -> Vec<NameRecord> {
        vec![
            record("01", "ALICE", Sex::Female, 2000, 50),
            record("01", "ALICE", Sex::Female, 2001, 25),
            record("01", "BOB", Sex::Male, 2000, 3),
            record("01", "CAMILLE", Sex::Male, 1980, 10),
            record("01", "CAMILLE", Sex::Female, 1980, 40),
            record("02", "ZOE", Sex::Female, 1999, 7),
        ]
    }

    #[test]
    fn test_max_and_min_per_department() {
        let extremes = department_extremes(&records());
        assert_eq!(extremes.len(), 2);

        let ain = &extremes[0];
        assert_eq!(ain.department_code.as_ref(), "01");
        assert_eq!(ain.max_name.as_ref(), "ALICE");
        assert_eq!(ain.max_count, 75);
        assert_eq!(ain.min_name.as_ref(), "BOB");
        assert_eq!(ain.min_count, 3);
        assert_eq!(ain.min_sex, Sex::Male);
    }

    #[test]
    fn test_single_pair_department() {
        let extremes = department_extremes(&records());
        let aisne = &extremes[1];
        assert_eq!(aisne.max_name, aisne.min_name);
        assert_eq!(aisne.max_count, aisne.min_count);
    }

    #[test]
    fn test_empty_department_is_an_error() {
        let code: Arc<str> = Arc::from("99");
        let err = extremes_for(&code, &[]).unwrap_err();
        assert!(matches!(err, AggregationError::EmptyDepartment(ref c) if c == "99"));
    }

    #[test]
    fn test_extremes_are_recorded_names() {
        let records = records();
        for e in department_extremes(&records) {
            assert!(e.max_count >= e.min_count);
            let names: Vec<&str> = records
                .iter()
                .filter(|r| r.department_code == e.department_code)
                .map(|r| r.name.as_ref())
                .collect();
            assert!(names.contains(&e.max_name.as_ref()));
            assert!(names.contains(&e.min_name.as_ref()));
        }
    }

    #[test]
    fn test_ties_pick_first_pair() {
        let records = vec![
            record("05", "MARIE", Sex::Female, 1950, 5),
            record("05", "LEA", Sex::Female, 1950, 5),
        ];
        let extremes = department_extremes(&records);
        assert_eq!(extremes[0].max_name.as_ref(), "LEA");
        assert_eq!(extremes[0].min_name.as_ref(), "LEA");
    }
}
