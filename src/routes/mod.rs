pub mod autocomplete;
pub mod health;
pub mod pdf;
pub mod trip_form;
pub mod trip_plans;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        // Wizard
        .route("/trip-form/validate", post(trip_form::validate_form_step))
        // Generation
        .route("/generate-trip-plan", post(trip_plans::generate_trip_plan))
        .route("/autocomplete", get(autocomplete::autocomplete))
        // Rendering and export
        .route("/trip-plans/render", post(trip_plans::render_trip_plan))
        .route("/api/generate-pdf", post(pdf::generate_pdf))
        // Save / notify
        .route("/trip-plans/save", post(trip_plans::save_trip_plan))
}
