//! Top-N frequency distribution over one record field.

use indexmap::IndexMap;

use crate::records::{DistributionBucket, Record};

/// Number of buckets charted per category.
pub const DEFAULT_TOP_N: usize = 5;

/// Label used for records where the field is absent or empty.
const UNKNOWN_LABEL: &str = "Unknown";

/// Count records by the upper-cased value of `field`, most frequent first.
///
/// Equal counts keep first-seen order. At most `top_n` buckets are returned.
pub fn distribution_of(records: &[Record], field: &str, top_n: usize) -> Vec<DistributionBucket> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();

    for record in records {
        let label = record
            .non_empty(field)
            .unwrap_or(UNKNOWN_LABEL)
            .to_uppercase();
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut buckets: Vec<DistributionBucket> = counts
        .into_iter()
        .map(|(label, count)| DistributionBucket { label, count })
        .collect();

    // sort_by is stable, so ties stay in first-seen order
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets.truncate(top_n);
    buckets
}
