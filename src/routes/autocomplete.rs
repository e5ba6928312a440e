use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    #[serde(default)]
    pub search: String,
}

/// Destination names matching a partial query.
///
/// GET /autocomplete?search=<query>
pub async fn autocomplete(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AutocompleteQuery>,
) -> Json<Vec<String>> {
    Json(state.catalog.search(&query.search))
}
