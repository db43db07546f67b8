//! Severity parsing and bucketing.

use crate::records::{Record, SeverityBuckets};

pub const SEVERITY_FIELD: &str = "severity";

/// Severity above this is high.
pub const HIGH_THRESHOLD: f64 = 7.0;
/// Severity at or above this (and not high) is medium.
pub const MEDIUM_THRESHOLD: f64 = 4.0;

/// Numeric severity of a record; missing or unparsable values read as 0.
///
/// Only the leading number counts, so `"8.5 (High)"` reads as 8.5.
pub fn severity_of(record: &Record) -> f64 {
    record
        .get(SEVERITY_FIELD)
        .and_then(leading_number)
        .unwrap_or(0.0)
}

/// Parse the longest decimal prefix of `s` after leading whitespace.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    end = digits_from(end);
    if bytes.get(end) == Some(&b'.') {
        end = digits_from(end + 1);
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

pub fn is_high(record: &Record) -> bool {
    severity_of(record) > HIGH_THRESHOLD
}

pub fn severity_buckets_of(records: &[Record]) -> SeverityBuckets {
    records
        .iter()
        .fold(SeverityBuckets::default(), |mut buckets, record| {
            let severity = severity_of(record);
            if severity > HIGH_THRESHOLD {
                buckets.high += 1;
            } else if (MEDIUM_THRESHOLD..=HIGH_THRESHOLD).contains(&severity) {
                buckets.medium += 1;
            } else {
                buckets.low += 1;
            }
            buckets
        })
}
