//! View state and its transitions.
//!
//! `ViewState` is a plain value. Every change goes through [`ViewState::apply`],
//! which maps (old state, event) to the new state without side effects.

use serde::Serialize;

use super::pagination::{page_slice, total_pages, PAGE_SIZE};
use crate::aggregate::{severity_buckets_of, summary_metrics};
use crate::records::{Metric, Overview, Record, SeverityBuckets, Tab};

/// Detail modal state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Modal {
    pub open: bool,
    pub loading: bool,
    /// Resolved detail record, once available.
    pub record: Option<Record>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub tab: Tab,
    pub records: Vec<Record>,
    pub overview: Option<Overview>,
    /// 1-based page number.
    pub page: usize,
    /// Row the user clicked, kept while the detail resolves.
    pub selected: Option<Record>,
    pub modal: Modal,
    pub loading: bool,
    pub error: Option<String>,
    /// Bumped on every load start; completions carry the value they started under.
    pub generation: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            tab: Tab::default(),
            records: Vec::new(),
            overview: None,
            page: 1,
            selected: None,
            modal: Modal::default(),
            loading: false,
            error: None,
            generation: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    TabChanged(Tab),
    LoadStarted,
    ListLoaded(Vec<Record>),
    OverviewLoaded(Overview),
    LoadFailed(String),
    NextPage,
    PrevPage,
    ModalOpened(Record),
    DetailResolved(Record),
    ModalClosed,
}

impl ViewState {
    pub fn apply(self, event: ViewEvent) -> Self {
        match event {
            ViewEvent::TabChanged(tab) => Self {
                tab,
                records: Vec::new(),
                overview: None,
                page: 1,
                selected: None,
                modal: Modal::default(),
                error: None,
                ..self
            },
            ViewEvent::LoadStarted => Self {
                records: Vec::new(),
                overview: None,
                page: 1,
                loading: true,
                error: None,
                generation: self.generation.wrapping_add(1),
                ..self
            },
            ViewEvent::ListLoaded(records) => Self {
                records,
                loading: false,
                error: None,
                ..self
            },
            ViewEvent::OverviewLoaded(overview) => Self {
                overview: Some(overview),
                loading: false,
                error: None,
                ..self
            },
            ViewEvent::LoadFailed(message) => Self {
                records: Vec::new(),
                overview: None,
                loading: false,
                error: Some(message),
                ..self
            },
            ViewEvent::NextPage => {
                let page = if self.page < self.total_pages() {
                    self.page + 1
                } else {
                    self.page
                };
                Self { page, ..self }
            }
            ViewEvent::PrevPage => {
                let page = if self.page > 1 { self.page - 1 } else { self.page };
                Self { page, ..self }
            }
            ViewEvent::ModalOpened(record) => Self {
                selected: Some(record),
                modal: Modal {
                    open: true,
                    loading: true,
                    record: None,
                },
                ..self
            },
            ViewEvent::DetailResolved(record) => Self {
                modal: Modal {
                    loading: false,
                    record: Some(record),
                    ..self.modal
                },
                ..self
            },
            ViewEvent::ModalClosed => Self {
                selected: None,
                modal: Modal::default(),
                ..self
            },
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.records.len(), PAGE_SIZE)
    }

    pub fn visible(&self) -> &[Record] {
        page_slice(&self.records, self.page, PAGE_SIZE)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Read-only projection for rendering, with metrics evaluated against `today`.
    pub fn snapshot(&self, today: &str) -> ViewSnapshot {
        let (columns, metrics, severity) = match self.tab {
            Tab::Category(category) => (
                category.columns().to_vec(),
                summary_metrics(category, &self.records, today),
                category
                    .has_severity()
                    .then(|| severity_buckets_of(&self.records)),
            ),
            Tab::Overview => (
                Vec::new(),
                self.overview
                    .iter()
                    .flat_map(|o| o.slices.iter())
                    .map(|s| Metric::new(s.category.label(), s.total, "records loaded"))
                    .collect(),
                None,
            ),
        };

        ViewSnapshot {
            tab: self.tab,
            page: self.page,
            total_pages: self.total_pages(),
            has_next: self.has_next(),
            has_prev: self.has_prev(),
            total_records: self.records.len(),
            columns,
            rows: self.visible().to_vec(),
            metrics,
            severity,
            overview: self.overview.clone(),
            loading: self.loading,
            error: self.error.clone(),
            modal: self.modal.clone(),
        }
    }
}

/// Everything the presentation layer needs to draw the current view.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub tab: Tab,
    pub page: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
    pub total_records: usize,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Record>,
    pub metrics: Vec<Metric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<SeverityBuckets>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<Overview>,
    pub loading: bool,
    pub error: Option<String>,
    pub modal: Modal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Category;

    fn numbered(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| [("finding_id", i.to_string())].into_iter().collect())
            .collect()
    }

    fn loaded(n: usize) -> ViewState {
        ViewState::default()
            .apply(ViewEvent::LoadStarted)
            .apply(ViewEvent::ListLoaded(numbered(n)))
    }

    #[test]
    fn test_load_lifecycle() {
        let state = ViewState::default().apply(ViewEvent::LoadStarted);
        assert!(state.loading);
        assert_eq!(state.generation, 1);
        assert!(state.error.is_none());

        let state = state.apply(ViewEvent::ListLoaded(numbered(3)));
        assert!(!state.loading);
        assert_eq!(state.records.len(), 3);
    }

    #[test]
    fn test_load_failure_clears_data() {
        let state = loaded(5)
            .apply(ViewEvent::LoadStarted)
            .apply(ViewEvent::LoadFailed("HTTP error! status: 500".to_string()));
        assert!(!state.loading);
        assert!(state.records.is_empty());
        assert_eq!(state.error.as_deref(), Some("HTTP error! status: 500"));
    }

    #[test]
    fn test_paging_bounds() {
        let mut state = loaded(25);
        assert_eq!(state.total_pages(), 3);
        assert!(!state.has_prev());

        state = state.apply(ViewEvent::PrevPage);
        assert_eq!(state.page, 1);

        state = state.apply(ViewEvent::NextPage).apply(ViewEvent::NextPage);
        assert_eq!(state.page, 3);
        assert_eq!(state.visible().len(), 5);
        assert!(!state.has_next());

        state = state.apply(ViewEvent::NextPage);
        assert_eq!(state.page, 3);

        state = state.apply(ViewEvent::PrevPage);
        assert_eq!(state.page, 2);
        assert_eq!(state.visible()[0].get("finding_id"), Some("10"));
    }

    #[test]
    fn test_empty_set_has_one_page() {
        let state = loaded(0).apply(ViewEvent::NextPage);
        assert_eq!(state.total_pages(), 1);
        assert_eq!(state.page, 1);
        assert!(!state.has_next());
        assert!(!state.has_prev());
    }

    #[test]
    fn test_tab_change_resets() {
        let state = loaded(25)
            .apply(ViewEvent::NextPage)
            .apply(ViewEvent::ModalOpened(Record::new()))
            .apply(ViewEvent::TabChanged(Tab::Category(Category::AuditLogs)));
        assert_eq!(state.page, 1);
        assert!(state.records.is_empty());
        assert!(!state.modal.open);
        assert!(state.selected.is_none());
        assert_eq!(state.tab, Tab::Category(Category::AuditLogs));
    }

    #[test]
    fn test_refresh_resets_page() {
        let state = loaded(25).apply(ViewEvent::NextPage).apply(ViewEvent::LoadStarted);
        assert_eq!(state.page, 1);
        assert_eq!(state.generation, 2);
    }

    #[test]
    fn test_modal_flow() {
        let clicked: Record = [("finding_id", "f-1")].into_iter().collect();
        let state = loaded(1).apply(ViewEvent::ModalOpened(clicked.clone()));
        assert!(state.modal.open);
        assert!(state.modal.loading);
        assert!(state.modal.record.is_none());

        let state = state.apply(ViewEvent::DetailResolved(clicked.clone()));
        assert!(state.modal.open);
        assert!(!state.modal.loading);
        assert_eq!(state.modal.record, Some(clicked));

        let state = state.apply(ViewEvent::ModalClosed);
        assert!(!state.modal.open);
        assert!(state.selected.is_none());
    }

    #[test]
    fn test_snapshot_for_findings() {
        let records: Vec<Record> = vec![
            [("severity", "8.5"), ("region", "us-east-1")].into_iter().collect(),
            [("severity", "2"), ("region", "eu-west-1")].into_iter().collect(),
        ];
        let state = ViewState::default()
            .apply(ViewEvent::LoadStarted)
            .apply(ViewEvent::ListLoaded(records));

        let snapshot = state.snapshot("2024-03-01");
        assert_eq!(snapshot.rows.len(), 2);
        assert_eq!(snapshot.metrics.len(), 4);
        assert_eq!(
            snapshot.severity,
            Some(SeverityBuckets {
                high: 1,
                medium: 0,
                low: 1
            })
        );
        assert_eq!(snapshot.columns, Category::IntrusionFindings.columns().to_vec());
    }

    #[test]
    fn test_snapshot_for_overview() {
        let overview = Overview {
            slices: vec![crate::aggregate::overview_slice(Category::AuditLogs, &numbered(4))],
        };
        let state = ViewState {
            tab: Tab::Overview,
            ..Default::default()
        }
        .apply(ViewEvent::LoadStarted)
        .apply(ViewEvent::OverviewLoaded(overview));

        let snapshot = state.snapshot("2024-03-01");
        assert!(snapshot.columns.is_empty());
        assert_eq!(snapshot.metrics[0].value, 4);
        assert!(snapshot.overview.is_some());
    }
}
