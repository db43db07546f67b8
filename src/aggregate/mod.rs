//! Aggregations over decoded records: distributions, severity buckets and
//! per-category summary metrics.

mod distribution;
mod severity;
mod summary;

pub use distribution::*;
pub use severity::*;
pub use summary::*;

use crate::records::{Category, OverviewSlice, Record};

/// Build one overview slice from a category's records.
pub fn overview_slice(category: Category, records: &[Record]) -> OverviewSlice {
    OverviewSlice {
        category,
        total: records.len(),
        distribution: distribution_of(records, category.distribution_field(), DEFAULT_TOP_N),
        severity: category
            .has_severity()
            .then(|| severity_buckets_of(records)),
    }
}
