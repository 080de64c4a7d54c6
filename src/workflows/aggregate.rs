use std::collections::BTreeMap;

use crate::domain::models::{Entry, YearCount};

/// One count per distinct year, ascending. Entries without a year are skipped.
pub fn count_by_year(entries: &[Entry]) -> Vec<YearCount> {
    let mut counts: BTreeMap<u16, usize> = BTreeMap::new();
    for year in entries.iter().filter_map(|e| e.year) {
        *counts.entry(year).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// The `n` busiest years, highest count first; ties go to the earlier year.
pub fn top_years(counts: &[YearCount], n: usize) -> Vec<YearCount> {
    let mut sorted = counts.to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then(a.year.cmp(&b.year)));
    sorted.truncate(n);
    sorted
}
