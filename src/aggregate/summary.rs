//! Headline metrics derived from the currently loaded records.

use std::collections::HashSet;

use chrono::Local;

use super::severity::is_high;
use crate::records::{Category, Metric, Record};

/// Today's local date in `YYYY-MM-DD` form.
pub fn today_string() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Records whose `field` starts with `today`.
pub fn count_on_date(records: &[Record], field: &str, today: &str) -> usize {
    records
        .iter()
        .filter(|r| r.get(field).is_some_and(|v| v.starts_with(today)))
        .count()
}

/// Distinct values of `field`, counting an absent field as one more value.
///
/// A non-empty set where no record carries the field therefore reports 1.
pub fn distinct_count(records: &[Record], field: &str) -> usize {
    records
        .iter()
        .map(|r| r.get(field))
        .collect::<HashSet<_>>()
        .len()
}

fn is_rejected(record: &Record) -> bool {
    record
        .get("action")
        .is_some_and(|a| a.eq_ignore_ascii_case("REJECT"))
}

fn has_error_code(record: &Record) -> bool {
    record.non_empty("errorcode").is_some()
}

struct MetricFields {
    date_field: &'static str,
    distinct_field: &'static str,
    flagged: fn(&Record) -> bool,
    labels: [(&'static str, &'static str); 4],
}

fn fields_for(category: Category) -> MetricFields {
    match category {
        Category::IntrusionFindings => MetricFields {
            date_field: "created_at",
            distinct_field: "region",
            flagged: is_high,
            labels: [
                ("Total Findings", "loaded"),
                ("Today's Findings", "created today"),
                ("High Severity", "severity above 7"),
                ("Regions", "distinct regions"),
            ],
        },
        Category::AuditLogs => MetricFields {
            date_field: "eventtime",
            distinct_field: "username",
            flagged: has_error_code,
            labels: [
                ("Total Events", "loaded"),
                ("Today's Events", "recorded today"),
                ("Failed Calls", "with an error code"),
                ("Users", "distinct users"),
            ],
        },
        Category::NetworkFlow => MetricFields {
            date_field: "timestamp",
            distinct_field: "interface_id",
            flagged: is_rejected,
            labels: [
                ("Total Flows", "loaded"),
                ("Today's Flows", "seen today"),
                ("Rejected", "action REJECT"),
                ("Interfaces", "distinct interfaces"),
            ],
        },
        Category::InterfaceFlow => MetricFields {
            date_field: "timestamp",
            distinct_field: "srcaddr",
            flagged: is_rejected,
            labels: [
                ("Total Flows", "loaded"),
                ("Today's Flows", "seen today"),
                ("Rejected", "action REJECT"),
                ("Sources", "distinct source addresses"),
            ],
        },
    }
}

/// Summary cards for `category` over the loaded `records`.
pub fn summary_metrics(category: Category, records: &[Record], today: &str) -> Vec<Metric> {
    let fields = fields_for(category);
    let [total, dated, flagged, distinct] = fields.labels;

    vec![
        Metric::new(total.0, records.len(), total.1),
        Metric::new(dated.0, count_on_date(records, fields.date_field, today), dated.1),
        Metric::new(
            flagged.0,
            records.iter().filter(|r| (fields.flagged)(r)).count(),
            flagged.1,
        ),
        Metric::new(
            distinct.0,
            distinct_count(records, fields.distinct_field),
            distinct.1,
        ),
    ]
}
