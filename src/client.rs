//! Typed HTTP client for the trip planner API.
//!
//! Drives the form wizard and the autocomplete box the way a browser front
//! end does: submissions go through [`Wizard::begin_submit`] so only a fully
//! valid form is ever sent, and autocomplete input is debounced and
//! sequenced so a slow, stale response never replaces a newer one.

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::api::response::MessageResponse;
use crate::domain::autocomplete::{Debouncer, QuerySequencer};
use crate::domain::wizard::{Wizard, WizardError};
use crate::domain::{ContactInfo, TripPlan};
use crate::error::ErrorResponse;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error("{status}: {}", .error.message)]
    Api {
        status: StatusCode,
        error: ErrorResponse,
    },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct SaveRequest<'a> {
    contact: &'a ContactInfo,
    plan: &'a TripPlan,
}

#[derive(Deserialize)]
struct PdfBody {
    pdf: String,
}

#[derive(Clone)]
pub struct TripPlannerClient {
    client: Client,
    base_url: String,
}

impl TripPlannerClient {
    pub fn new(base_url: &str, timeout_seconds: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Submit the wizard's form. The wizard is locked while the request is
    /// in flight and moves to `Submitted` only on success.
    pub async fn generate(&self, wizard: &mut Wizard) -> Result<TripPlan, ClientError> {
        let ticket = wizard.begin_submit()?;

        let result = async {
            let response = self
                .client
                .post(format!("{}/generate-trip-plan", self.base_url))
                .json(ticket.form())
                .send()
                .await?;
            parse::<TripPlan>(response).await
        }
        .await;

        wizard.finish_submit(ticket, result.is_ok());
        result
    }

    pub async fn autocomplete(&self, query: &str) -> Result<Vec<String>, ClientError> {
        let response = self
            .client
            .get(format!("{}/autocomplete", self.base_url))
            .query(&[("search", query)])
            .send()
            .await?;
        parse(response).await
    }

    /// Raw PDF bytes for a plan.
    pub async fn download_pdf(&self, plan: &TripPlan) -> Result<Vec<u8>, ClientError> {
        let response = self
            .client
            .post(format!("{}/api/generate-pdf", self.base_url))
            .json(plan)
            .send()
            .await?;
        let body: PdfBody = parse(response).await?;
        let bytes = STANDARD
            .decode(body.pdf)
            .context("PDF payload is not valid base64")?;
        Ok(bytes)
    }

    pub async fn save(&self, contact: &ContactInfo, plan: &TripPlan) -> Result<String, ClientError> {
        let response = self
            .client
            .post(format!("{}/trip-plans/save", self.base_url))
            .json(&SaveRequest { contact, plan })
            .send()
            .await?;
        let body: MessageResponse = parse(response).await?;
        Ok(body.message)
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let error = response.json::<ErrorResponse>().await.unwrap_or_else(|e| ErrorResponse {
            code: "UNKNOWN".to_string(),
            message: e.to_string(),
            field: None,
        });
        return Err(ClientError::Api { status, error });
    }
    Ok(response.json().await?)
}

/// One autocomplete input box.
pub struct AutocompleteSession {
    client: TripPlannerClient,
    debouncer: Debouncer,
    sequencer: QuerySequencer,
}

impl AutocompleteSession {
    pub fn new(client: TripPlannerClient) -> Arc<Self> {
        Self::with_debouncer(client, Debouncer::default())
    }

    pub fn with_debouncer(client: TripPlannerClient, debouncer: Debouncer) -> Arc<Self> {
        Arc::new(Self {
            client,
            debouncer,
            sequencer: QuerySequencer::new(),
        })
    }

    /// Handle one keystroke. `None` means the input was superseded, either
    /// while debouncing or by a newer request, and nothing should change.
    pub async fn on_input(&self, query: String) -> Result<Option<Vec<String>>, ClientError> {
        let Some(query) = self.debouncer.settle(query).await else {
            return Ok(None);
        };

        let seq = self.sequencer.issue();
        let suggestions = self.client.autocomplete(&query).await?;
        Ok(self.sequencer.accept(seq).then_some(suggestions))
    }
}
