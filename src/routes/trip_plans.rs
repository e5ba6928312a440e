//! Trip plan endpoints: generation, HTML rendering and save/notify.

use anyhow::Context;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::response::{Accepted, MessageResponse};
use crate::api::ApiJson;
use crate::app::AppState;
use crate::domain::contact::submit_contact;
use crate::domain::{ContactInfo, TripFormData, TripFormDraft, TripPlan};
use crate::error::ApiResult;
use crate::middleware::RequestIdExt;
use crate::render::render_html;
use crate::services::itinerary;

/// Generate an itinerary from trip preferences.
///
/// POST /generate-trip-plan
pub async fn generate_trip_plan(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    ApiJson(draft): ApiJson<TripFormDraft>,
) -> ApiResult<Json<TripPlan>> {
    // Invalid input never reaches the provider
    let form = TripFormData::try_from(draft)?;

    let plan = itinerary::generate_trip_plan(
        &state.llm_client,
        &state.templates,
        &form,
        headers.request_id(),
    )
    .await?;

    Ok(Json(plan))
}

/// Render a plan as a standalone HTML page.
///
/// POST /trip-plans/render
pub async fn render_trip_plan(
    State(state): State<Arc<AppState>>,
    ApiJson(plan): ApiJson<TripPlan>,
) -> ApiResult<Html<String>> {
    let page = render_html(&state.templates, &plan).context("Failed to render itinerary page")?;
    Ok(Html(page))
}

#[derive(Debug, Deserialize)]
pub struct SaveTripPlanRequest {
    pub contact: ContactInfo,
    pub plan: TripPlan,
}

/// Validate contact details and hand the plan to the notification service.
///
/// POST /trip-plans/save
pub async fn save_trip_plan(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SaveTripPlanRequest>,
) -> ApiResult<impl IntoResponse> {
    let request_id = headers.request_id().map(str::to_string);
    let plan = req.plan;

    submit_contact(req.contact, |contact| {
        state.notifier.dispatch(contact, plan, request_id);
        std::future::ready(())
    })
    .await?;

    Ok(Accepted(MessageResponse::new(
        "We'll send you the details shortly.",
    )))
}
