//! Memoized Views
//! One session's view of a shared dataset: base aggregates are computed once,
//! filter-dependent results are remembered per filter value.

use crate::data::Dataset;
use crate::stats::extremes::{department_extremes, DepartmentExtremes};
use crate::stats::gender::{gender_trend, DepartmentFilter, GenderTrend};
use crate::stats::ranking::{NameTotal, YearlyTotals, TOP_N};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Filter-dependent results kept per session before the memo is reset.
pub const MEMO_LIMIT: usize = 256;

pub struct NameStats {
    dataset: Arc<Dataset>,
    yearly: YearlyTotals,
    extremes: Option<Arc<Vec<DepartmentExtremes>>>,
    top_by_year: HashMap<i32, Arc<Vec<NameTotal>>>,
    gender_by_filter: HashMap<(String, DepartmentFilter), Arc<GenderTrend>>,
}

impl NameStats {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let yearly = YearlyTotals::from_records(&dataset.names);
        Self {
            dataset,
            yearly,
            extremes: None,
            top_by_year: HashMap::new(),
            gender_by_filter: HashMap::new(),
        }
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn yearly(&self) -> &YearlyTotals {
        &self.yearly
    }

    pub fn year_range(&self) -> Option<(i32, i32)> {
        self.yearly.year_range()
    }

    /// Clamp a requested year into the observed range.
    pub fn clamp_year(&self, year: i32) -> i32 {
        match self.year_range() {
            Some((min, max)) => year.clamp(min, max),
            None => year,
        }
    }

    /// Top 15 names of `year`.
    pub fn top_names(&mut self, year: i32) -> Arc<Vec<NameTotal>> {
        if self.top_by_year.len() >= MEMO_LIMIT && !self.top_by_year.contains_key(&year) {
            self.top_by_year.clear();
        }
        let yearly = &self.yearly;
        Arc::clone(
            self.top_by_year
                .entry(year)
                .or_insert_with(|| Arc::new(yearly.top_names(year, TOP_N))),
        )
    }

    pub fn department_extremes(&mut self) -> Arc<Vec<DepartmentExtremes>> {
        if let Some(extremes) = &self.extremes {
            return Arc::clone(extremes);
        }
        let extremes = Arc::new(department_extremes(&self.dataset.names));
        debug!(departments = extremes.len(), "department extremes computed");
        self.extremes = Some(Arc::clone(&extremes));
        extremes
    }

    pub fn gender_trend(&mut self, name: &str, filter: &DepartmentFilter) -> Arc<GenderTrend> {
        let key = (name.trim().to_uppercase(), filter.clone());
        if let Some(trend) = self.gender_by_filter.get(&key) {
            return Arc::clone(trend);
        }
        let trend = Arc::new(gender_trend(&self.dataset.joined, &key.0, filter));
        if self.gender_by_filter.len() >= MEMO_LIMIT {
            debug!(entries = self.gender_by_filter.len(), "gender memo reset");
            self.gender_by_filter.clear();
        }
        self.gender_by_filter.insert(key, Arc::clone(&trend));
        trend
    }

    /// Default name for the gender view: `preferred` if present, else the first name.
    pub fn default_name(&self, preferred: &str) -> Option<String> {
        let names = self.dataset.unique_names();
        let preferred = preferred.to_uppercase();
        if names.iter().any(|n| **n == *preferred) {
            return Some(preferred);
        }
        names.first().map(|n| n.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{department, record};
    use crate::data::Sex;

    fn stats() -> NameStats {
        let dataset = Dataset::new(
            vec![
                record("01", "ALICE", Sex::Female, 2000, 50),
                record("02", "BOB", Sex::Male, 2000, 70),
                record("02", "ALICE", Sex::Female, 2000, 30),
                record("01", "CAMILLE", Sex::Male, 1980, 10),
                record("01", "CAMILLE", Sex::Female, 1980, 40),
            ],
            vec![department("01", "Ain"), department("02", "Aisne")],
        );
        NameStats::new(Arc::new(dataset))
    }

    #[test]
    fn test_results_are_memoized() {
        let mut stats = stats();
        let first = stats.top_names(2000);
        let second = stats.top_names(2000);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first[0].name.as_ref(), "ALICE");

        let a = stats.gender_trend("camille", &DepartmentFilter::All);
        let b = stats.gender_trend("CAMILLE ", &DepartmentFilter::All);
        assert!(Arc::ptr_eq(&a, &b));

        let e1 = stats.department_extremes();
        let e2 = stats.department_extremes();
        assert!(Arc::ptr_eq(&e1, &e2));
    }

    #[test]
    fn test_memo_stays_bounded() {
        let mut stats = stats();
        for i in 0..(MEMO_LIMIT + 10) {
            stats.gender_trend(&format!("NAME{i}"), &DepartmentFilter::All);
            stats.top_names(1000 + i as i32);
        }
        assert!(stats.gender_by_filter.len() <= MEMO_LIMIT);
        assert!(stats.top_by_year.len() <= MEMO_LIMIT);

        let trend = stats.gender_trend("CAMILLE", &DepartmentFilter::All);
        assert_eq!(trend.years().len(), 1);
    }

    #[test]
    fn test_sessions_share_dataset_not_results() {
        let mut one = stats();
        let mut two = NameStats::new(Arc::clone(one.dataset()));
        assert!(Arc::ptr_eq(one.dataset(), two.dataset()));
        assert!(!Arc::ptr_eq(&one.top_names(2000), &two.top_names(2000)));
    }

    #[test]
    fn test_year_clamp_and_default_name() {
        let stats = stats();
        assert_eq!(stats.clamp_year(1900), 1980);
        assert_eq!(stats.clamp_year(2050), 2000);
        assert_eq!(stats.default_name("camille").as_deref(), Some("CAMILLE"));
        assert_eq!(stats.default_name("ZOE").as_deref(), Some("ALICE"));
    }
}
