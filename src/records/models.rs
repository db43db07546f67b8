//! Record and category model types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One decoded event: an ordered mapping of field name to string value.
///
/// Key order is the order fields were first inserted (header order for
/// columnar results). Re-inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Field value, or `None` when absent or empty.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
impl Record {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Error returned when a tab or category identifier is not recognised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown tab: {0}")]
pub struct UnknownTab(pub String);

/// The fixed set of event categories served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    IntrusionFindings,
    AuditLogs,
    NetworkFlow,
    InterfaceFlow,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::IntrusionFindings,
        Category::AuditLogs,
        Category::NetworkFlow,
        Category::InterfaceFlow,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Category::IntrusionFindings => "intrusion-findings",
            Category::AuditLogs => "audit-logs",
            Category::NetworkFlow => "network-flow",
            Category::InterfaceFlow => "interface-flow",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::IntrusionFindings => "Intrusion Findings",
            Category::AuditLogs => "Audit Logs",
            Category::NetworkFlow => "Network Flow",
            Category::InterfaceFlow => "Interface Flow",
        }
    }

    /// Backend path for the list endpoint, relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Category::IntrusionFindings => "findings",
            Category::AuditLogs => "audit-logs",
            Category::NetworkFlow => "network-flow",
            Category::InterfaceFlow => "interface-flow",
        }
    }

    /// Display columns, in table order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Category::IntrusionFindings => {
                &["finding_id", "type", "severity", "region", "created_at"]
            }
            Category::AuditLogs => &[
                "eventtime",
                "eventname",
                "username",
                "sourceipaddress",
                "errorcode",
            ],
            Category::NetworkFlow => &[
                "srcaddr",
                "dstaddr",
                "dstport",
                "protocol",
                "action",
                "interface_id",
                "timestamp",
            ],
            Category::InterfaceFlow => &[
                "interface_id",
                "srcaddr",
                "dstaddr",
                "bytes",
                "action",
                "timestamp",
            ],
        }
    }

    /// Field grouped by the overview distribution chart.
    pub fn distribution_field(self) -> &'static str {
        match self {
            Category::IntrusionFindings => "region",
            Category::AuditLogs => "eventname",
            Category::NetworkFlow => "action",
            Category::InterfaceFlow => "interface_id",
        }
    }

    /// Identifier field usable for a detail lookup, if the category has one.
    pub fn detail_key(self) -> Option<&'static str> {
        match self {
            Category::IntrusionFindings => Some("finding_id"),
            _ => None,
        }
    }

    pub fn has_severity(self) -> bool {
        matches!(self, Category::IntrusionFindings)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| UnknownTab(s.to_string()))
    }
}

/// The active view: one category's list, or the cross-category overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "category", rename_all = "kebab-case")]
pub enum Tab {
    Overview,
    Category(Category),
}

impl Tab {
    pub fn category(self) -> Option<Category> {
        match self {
            Tab::Overview => None,
            Tab::Category(c) => Some(c),
        }
    }
}

impl Default for Tab {
    fn default() -> Self {
        Tab::Category(Category::IntrusionFindings)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Overview => f.write_str("overview"),
            Tab::Category(c) => c.fmt(f),
        }
    }
}

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "overview" {
            return Ok(Tab::Overview);
        }
        s.parse().map(Tab::Category)
    }
}

/// A (label, count) pair from a top-N frequency aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionBucket {
    pub label: String,
    pub count: usize,
}

/// High/medium/low severity counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityBuckets {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// A headline number shown on a summary card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: usize,
    pub sub_label: String,
}

impl Metric {
    pub fn new(label: &str, value: usize, sub_label: &str) -> Self {
        Self {
            label: label.to_string(),
            value,
            sub_label: sub_label.to_string(),
        }
    }
}

/// One category's contribution to the overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewSlice {
    pub category: Category,
    pub total: usize,
    pub distribution: Vec<DistributionBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<SeverityBuckets>,
}

/// Aggregate view across every category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overview {
    pub slices: Vec<OverviewSlice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_insert_keeps_position() {
        let mut record = Record::new();
        record.insert("a", "1");
        record.insert("b", "2");
        record.insert("a", "3");

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(record.get("a"), Some("3"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_record_non_empty() {
        let record: Record = [("region", ""), ("severity", "5")].into_iter().collect();
        assert_eq!(record.non_empty("region"), None);
        assert_eq!(record.non_empty("severity"), Some("5"));
        assert_eq!(record.non_empty("missing"), None);
    }

    #[test]
    fn test_record_serializes_in_order() {
        let record: Record = [("zeta", "1"), ("alpha", "2")].into_iter().collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"zeta":"1","alpha":"2"}"#);
    }

    #[test]
    fn test_record_duplicate_key_keeps_last_value() {
        let record: Record = [("severity", "2"), ("region", "x"), ("severity", "9")]
            .into_iter()
            .collect();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["severity", "region"]);
        assert_eq!(record.get("severity"), Some("9"));
    }

    #[test]
    fn test_tab_parse() {
        assert_eq!("overview".parse::<Tab>().unwrap(), Tab::Overview);
        assert_eq!(
            "audit-logs".parse::<Tab>().unwrap(),
            Tab::Category(Category::AuditLogs)
        );
        assert_eq!(
            "bogus".parse::<Tab>(),
            Err(UnknownTab("bogus".to_string()))
        );
    }

    #[test]
    fn test_category_ids_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.id().parse::<Category>().unwrap(), category);
            assert_eq!(category.to_string(), category.id());
        }
    }

    #[test]
    fn test_only_findings_support_detail() {
        assert_eq!(Category::IntrusionFindings.detail_key(), Some("finding_id"));
        assert!(Category::ALL
            .iter()
            .filter(|c| **c != Category::IntrusionFindings)
            .all(|c| c.detail_key().is_none()));
    }
}
