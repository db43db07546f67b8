//! HTTP request handlers.
//!
//! Every mutating endpoint answers with the resulting view snapshot. Load
//! failures are not HTTP errors here: they travel inside the snapshot's `error`.

use super::AppState;
use crate::records::{Category, Tab};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;

// ============================================================================
// Catalogue
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub columns: &'static [&'static str],
    pub detail_lookup: bool,
}

pub async fn handle_categories() -> impl IntoResponse {
    let categories: Vec<CategoryInfo> = Category::ALL
        .into_iter()
        .map(|c| CategoryInfo {
            id: c.id(),
            label: c.label(),
            columns: c.columns(),
            detail_lookup: c.detail_key().is_some(),
        })
        .collect();

    Json(categories)
}

// ============================================================================
// View
// ============================================================================

pub async fn handle_view(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.dashboard.snapshot().await)
}

pub async fn handle_select_tab(
    State(state): State<AppState>,
    Path(tab): Path<String>,
) -> impl IntoResponse {
    let tab: Tab = match tab.parse() {
        Ok(t) => t,
        Err(e) => return (StatusCode::BAD_REQUEST, format!("{}", e)).into_response(),
    };

    // The outcome is recorded in the view state either way.
    let _ = state.dashboard.select_tab(tab).await;
    Json(state.dashboard.snapshot().await).into_response()
}

pub async fn handle_refresh(State(state): State<AppState>) -> impl IntoResponse {
    let _ = state.dashboard.refresh().await;
    Json(state.dashboard.snapshot().await)
}

// ============================================================================
// Paging and detail
// ============================================================================

pub async fn handle_next_page(State(state): State<AppState>) -> impl IntoResponse {
    state.dashboard.next_page().await;
    Json(state.dashboard.snapshot().await)
}

pub async fn handle_prev_page(State(state): State<AppState>) -> impl IntoResponse {
    state.dashboard.prev_page().await;
    Json(state.dashboard.snapshot().await)
}

pub async fn handle_select_row(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> impl IntoResponse {
    if !state.dashboard.select_row(index).await {
        return (StatusCode::NOT_FOUND, "Row not found").into_response();
    }
    Json(state.dashboard.snapshot().await).into_response()
}

pub async fn handle_close_modal(State(state): State<AppState>) -> impl IntoResponse {
    state.dashboard.close_modal().await;
    Json(state.dashboard.snapshot().await)
}
