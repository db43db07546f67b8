//! Fetch orchestration: loads category lists, the overview and finding
//! details, and feeds the results into the view state.

mod client;
mod error;

pub use client::*;
pub use error::*;

use crate::aggregate::{overview_slice, today_string};
use crate::config::DashboardConfig;
use crate::records::{Category, Overview, Record, Tab};
use crate::view::{ViewEvent, ViewSnapshot, ViewState};

use futures::future::try_join_all;
use tokio::sync::RwLock;

/// Owns the view state and drives it from backend responses.
pub struct Dashboard {
    client: ApiClient,
    state: RwLock<ViewState>,
    list_limit: u32,
    overview_limit: u32,
    guard_stale: bool,
}

impl Dashboard {
    pub fn new(client: ApiClient, config: &DashboardConfig) -> Self {
        tracing::debug!("Dashboard: Backend endpoints under {}", client.base_url());
        Self {
            client,
            state: RwLock::new(ViewState::default()),
            list_limit: config.list_limit,
            overview_limit: config.overview_limit,
            guard_stale: config.guard_stale_responses,
        }
    }

    /// A copy of the current view state.
    #[cfg(test)]
    pub async fn state(&self) -> ViewState {
        self.state.read().await.clone()
    }

    /// Render-ready view, with date metrics evaluated against today's local date.
    pub async fn snapshot(&self) -> ViewSnapshot {
        self.state.read().await.snapshot(&today_string())
    }

    /// Switch to `tab` and load it.
    pub async fn select_tab(&self, tab: Tab) -> Result<(), FetchError> {
        self.transition(ViewEvent::TabChanged(tab)).await;
        self.refresh().await
    }

    /// Reload whatever tab is active.
    pub async fn refresh(&self) -> Result<(), FetchError> {
        let tab = self.state.read().await.tab;
        match tab {
            Tab::Overview => self.load_overview().await,
            Tab::Category(category) => self.load_list(category).await,
        }
    }

    /// Fetch one category's records into the view.
    ///
    /// On failure the error message is stored in the view and the error returned.
    pub async fn load_list(&self, category: Category) -> Result<(), FetchError> {
        let generation = self.start_load().await;
        tracing::info!("Dashboard: Loading {} (limit {})", category, self.list_limit);

        match self.client.fetch_list(category, self.list_limit).await {
            Ok(records) => {
                tracing::info!("Dashboard: Loaded {} {} records", records.len(), category);
                self.complete(generation, ViewEvent::ListLoaded(records)).await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Dashboard: Failed to load {}: {}", category, e);
                self.complete(generation, ViewEvent::LoadFailed(e.user_message()))
                    .await;
                Err(e)
            }
        }
    }

    /// Fetch every category concurrently and aggregate them.
    ///
    /// Any single failure fails the whole overview; no partial aggregate is stored.
    pub async fn load_overview(&self) -> Result<(), FetchError> {
        let generation = self.start_load().await;
        tracing::info!("Dashboard: Loading overview across {} categories", Category::ALL.len());

        let requests = Category::ALL.into_iter().map(|category| async move {
            let records = self.client.fetch_list(category, self.overview_limit).await?;
            Ok::<_, FetchError>(overview_slice(category, &records))
        });

        match try_join_all(requests).await {
            Ok(slices) => {
                self.complete(generation, ViewEvent::OverviewLoaded(Overview { slices }))
                    .await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Dashboard: Failed to load overview: {}", e);
                self.complete(generation, ViewEvent::LoadFailed(e.user_message()))
                    .await;
                Err(e)
            }
        }
    }

    /// Open the detail modal for `record` and resolve its full detail.
    ///
    /// The modal opens in a loading state even when no request is needed.
    pub async fn load_detail(&self, record: Record) {
        let category = {
            let mut state = self.state.write().await;
            let category = state.tab.category();
            apply(&mut state, ViewEvent::ModalOpened(record.clone()));
            category
        };

        let finding_id = category
            .and_then(Category::detail_key)
            .and_then(|key| record.non_empty(key))
            .map(str::to_string);

        let detail = match finding_id {
            Some(id) => match self.client.fetch_detail(&id).await {
                Ok(records) => records.into_iter().next().unwrap_or(record),
                Err(e) => {
                    tracing::error!("Dashboard: Failed to load detail for {}: {}", id, e);
                    error_record(&id, &e)
                }
            },
            None => record,
        };

        self.transition(ViewEvent::DetailResolved(detail)).await;
    }

    /// Open the detail for the row at `index` of the visible page.
    ///
    /// Returns false when there is no such row.
    pub async fn select_row(&self, index: usize) -> bool {
        let record = self.state.read().await.visible().get(index).cloned();
        match record {
            Some(record) => {
                self.load_detail(record).await;
                true
            }
            None => false,
        }
    }

    pub async fn next_page(&self) {
        self.transition(ViewEvent::NextPage).await;
    }

    pub async fn prev_page(&self) {
        self.transition(ViewEvent::PrevPage).await;
    }

    pub async fn close_modal(&self) {
        self.transition(ViewEvent::ModalClosed).await;
    }

    async fn transition(&self, event: ViewEvent) {
        let mut state = self.state.write().await;
        apply(&mut state, event);
    }

    async fn start_load(&self) -> u64 {
        let mut state = self.state.write().await;
        apply(&mut state, ViewEvent::LoadStarted);
        state.generation
    }

    /// Apply a load completion, unless it is stale and the guard is on.
    async fn complete(&self, generation: u64, event: ViewEvent) {
        let mut state = self.state.write().await;
        if self.guard_stale && state.generation != generation {
            tracing::warn!(
                "Dashboard: Discarding stale response (generation {}, current {})",
                generation,
                state.generation
            );
            return;
        }
        apply(&mut state, event);
    }
}

fn apply(state: &mut ViewState, event: ViewEvent) {
    let current = std::mem::take(state);
    *state = current.apply(event);
}

/// Placeholder shown in the modal when a detail request fails.
fn error_record(finding_id: &str, err: &FetchError) -> Record {
    [
        ("finding_id", finding_id.to_string()),
        ("error", "Failed to load finding details".to_string()),
        ("message", err.user_message()),
    ]
    .into_iter()
    .collect()
}
