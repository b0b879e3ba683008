//! Result aggregation: dedup plus canonical sort.

use crate::record::RaceRecord;

/// Deduplicates identical 5-tuples and sorts records canonically.
///
/// Duplicate tuples arise when a reference list names the same signal at the
/// same anchor more than once. The sort key is the [`RaceRecord`] `Ord`:
/// kind priority, target, anchor_a, anchor_b.
pub fn dedup_and_sort(mut records: Vec<RaceRecord>) -> Vec<RaceRecord> {
    records.sort();
    records.dedup();
    records
}
