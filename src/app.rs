use anyhow::Context;
use axum::{http::HeaderValue, Router};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Settings;
use crate::middleware::request_id_layer;
use crate::routes;
use crate::services::{DestinationCatalog, LlmClient, Notifier};
use crate::templates::Templates;

/// Shared application state
pub struct AppState {
    pub settings: Settings,
    pub llm_client: LlmClient,
    pub catalog: DestinationCatalog,
    pub notifier: Notifier,
    pub templates: Templates,
}

impl AppState {
    pub fn new(
        settings: Settings,
        llm_client: LlmClient,
        catalog: DestinationCatalog,
        notifier: Notifier,
        templates: Templates,
    ) -> Arc<Self> {
        Arc::new(Self {
            settings,
            llm_client,
            catalog,
            notifier,
            templates,
        })
    }

    /// Build every collaborator from configuration.
    pub fn from_settings(settings: Settings) -> anyhow::Result<Arc<Self>> {
        let llm_client = LlmClient::new(&settings)?;
        let catalog = DestinationCatalog::new(
            &settings.autocomplete_extra_destinations,
            settings.autocomplete_limit,
        );
        let notifier = Notifier::new(
            settings.notify_service_url.as_deref(),
            settings.notify_service_token.as_deref(),
            settings.notify_timeout_seconds,
        )?;
        let templates = Templates::new().context("Failed to compile templates")?;
        Ok(Self::new(settings, llm_client, catalog, notifier, templates))
    }
}

/// Build the complete application with all middleware
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = build_cors_layer(&state.settings);

    // Build trace layer (use DEBUG for spans to reduce overhead at INFO level)
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::DEBUG));

    let (set_request_id, propagate_request_id) = request_id_layer();
    let body_limit = RequestBodyLimitLayer::new(state.settings.max_body_bytes);

    Router::new()
        .merge(routes::api_router())
        // Middleware stack (applied bottom-up)
        .layer(body_limit)
        .layer(propagate_request_id)
        .layer(trace_layer)
        .layer(set_request_id)
        .layer(cors)
        .with_state(state)
}

fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors_allow_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // Longer preflight cache in development
    let max_age = if settings.env.is_dev() {
        std::time::Duration::from_secs(86400)
    } else {
        std::time::Duration::from_secs(3600)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::list([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            axum::http::HeaderName::from_static("x-request-id"),
        ]))
        .max_age(max_age)
}
