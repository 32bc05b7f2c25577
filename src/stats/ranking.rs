//! Yearly Ranking Module
//! Births per (year, name) summed across departments and sexes, and the
//! top names of a year.

use crate::data::NameRecord;
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Number of names shown in the yearly ranking.
pub const TOP_N: usize = 15;

/// Total births of a name in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameTotal {
    pub name: Arc<str>,
    pub total: u64,
}

/// Descending by total, then ascending by name.
fn ranking_order(a: &NameTotal, b: &NameTotal) -> Ordering {
    b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name))
}

/// Per-year name totals, each year already in ranking order.
#[derive(Debug, Clone, Default)]
pub struct YearlyTotals {
    by_year: BTreeMap<i32, Vec<NameTotal>>,
}

impl YearlyTotals {
    /// Group by (year, name) and sum births.
    pub fn from_records(records: &[NameRecord]) -> Self {
        let sums: HashMap<(i32, Arc<str>), u64> = records
            .par_iter()
            .fold(HashMap::new, |mut acc, r| {
                *acc.entry((r.year, Arc::clone(&r.name))).or_insert(0) += r.count;
                acc
            })
            .reduce(HashMap::new, |mut a, b| {
                for (key, count) in b {
                    *a.entry(key).or_insert(0) += count;
                }
                a
            });

        let mut by_year: BTreeMap<i32, Vec<NameTotal>> = BTreeMap::new();
        for ((year, name), total) in sums {
            by_year.entry(year).or_default().push(NameTotal { name, total });
        }
        by_year
            .par_iter_mut()
            .for_each(|(_, totals)| totals.sort_by(ranking_order));

        Self { by_year }
    }

    /// Observed (min, max) year.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = *self.by_year.keys().next()?;
        let max = *self.by_year.keys().next_back()?;
        Some((min, max))
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_year.keys().copied()
    }

    /// Top `n` names of `year`; empty if the year has no records.
    pub fn top_names(&self, year: i32, n: usize) -> Vec<NameTotal> {
        self.by_year
            .get(&year)
            .map(|totals| totals.iter().take(n).cloned().collect())
            .unwrap_or_default()
    }

    /// All births recorded in `year`.
    pub fn year_total(&self, year: i32) -> u64 {
        self.by_year
            .get(&year)
            .map(|totals| totals.iter().map(|t| t.total).sum())
            .unwrap_or(0)
    }
}

/// Top 15 names of `year` straight from the cleaned records.
pub fn top_names_for_year(records: &[NameRecord], year: i32) -> Vec<NameTotal> {
    let mut sums: HashMap<&Arc<str>, u64> = HashMap::new();
    for r in records.iter().filter(|r| r.year == year) {
        *sums.entry(&r.name).or_insert(0) += r.count;
    }

    let mut totals: Vec<NameTotal> = sums
        .into_iter()
        .map(|(name, total)| NameTotal {
            name: Arc::clone(name),
            total,
        })
        .collect();
    totals.sort_by(ranking_order);
    totals.truncate(TOP_N);
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;
    use crate::data::Sex;

    fn scenario() -> Vec<NameRecord> {
        vec![
            record("01", "ALICE", Sex::Female, 2000, 50),
            record("02", "BOB", Sex::Male, 2000, 70),
            record("02", "ALICE", Sex::Female, 2000, 30),
            record("02", "ALICE", Sex::Female, 2001, 900),
        ]
    }

    #[test]
    fn test_alice_outranks_bob() {
        let top = top_names_for_year(&scenario(), 2000);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name.as_ref(), "ALICE");
        assert_eq!(top[0].total, 80);
        assert_eq!(top[1].name.as_ref(), "BOB");
        assert_eq!(top[1].total, 70);

        let totals = YearlyTotals::from_records(&scenario());
        assert_eq!(totals.top_names(2000, TOP_N), top);
    }

    #[test]
    fn test_missing_year_is_empty() {
        assert!(top_names_for_year(&scenario(), 1950).is_empty());
        assert!(YearlyTotals::from_records(&scenario())
            .top_names(1950, TOP_N)
            .is_empty());
    }

    #[test]
    fn test_cap_and_tie_break() {
        let records: Vec<NameRecord> = (0..20)
            .map(|i| record("01", &format!("NAME{:02}", 19 - i), Sex::Male, 1990, 10))
            .collect();

        let top = top_names_for_year(&records, 1990);
        assert_eq!(top.len(), TOP_N);
        assert_eq!(top[0].name.as_ref(), "NAME00");
        assert_eq!(top[14].name.as_ref(), "NAME14");
    }

    #[test]
    fn test_top_never_exceeds_year_total() {
        let mut records = scenario();
        records.extend((0..30).map(|i| record("03", &format!("N{i}"), Sex::Female, 2000, i)));
        let totals = YearlyTotals::from_records(&records);

        for year in totals.years() {
            let top = totals.top_names(year, TOP_N);
            assert!(top.len() <= TOP_N);
            let shown: u64 = top.iter().map(|t| t.total).sum();
            assert!(shown <= totals.year_total(year));
        }
        assert_eq!(totals.year_range(), Some((2000, 2001)));
    }
}
