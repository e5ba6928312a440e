//! Save/notify hand-off
//!
//! A saved itinerary is posted, fire-and-forget, to an external
//! notification service that emails or messages it to the traveler.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::domain::{ContactInfo, TripPlan};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SavePayload<'a> {
    contact: &'a ContactInfo,
    plan: &'a TripPlan,
}

#[derive(Clone)]
pub struct Notifier {
    client: Client,
    endpoint: Option<String>,
    token: Option<String>,
}

impl Notifier {
    pub fn new(endpoint: Option<&str>, token: Option<&str>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        match endpoint {
            Some(url) => tracing::info!(endpoint = url, "Notification service configured"),
            None => tracing::warn!("No notification service configured; saves will be dropped"),
        }

        Ok(Self {
            client,
            endpoint: endpoint.map(str::to_string),
            token: token.map(str::to_string),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Hand `plan` to the notification service on a detached task.
    pub fn dispatch(&self, contact: ContactInfo, plan: TripPlan, request_id: Option<String>) {
        let notifier = self.clone();
        tokio::spawn(async move {
            match notifier.deliver(&contact, &plan, request_id.as_deref()).await {
                Ok(true) => tracing::info!(plan_id = %plan.id(), "Trip plan handed to notification service"),
                Ok(false) => tracing::warn!(plan_id = %plan.id(), "Trip plan save skipped: no notification service"),
                Err(e) => tracing::error!(plan_id = %plan.id(), error = ?e, "Trip plan hand-off failed"),
            }
        });
    }

    /// Returns `Ok(false)` when no service is configured.
    async fn deliver(
        &self,
        contact: &ContactInfo,
        plan: &TripPlan,
        request_id: Option<&str>,
    ) -> Result<bool> {
        let Some(endpoint) = &self.endpoint else {
            return Ok(false);
        };

        let mut req = self.client.post(endpoint).json(&SavePayload { contact, plan });
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if let Some(rid) = request_id {
            req = req.header("x-request-id", rid);
        }

        req.send()
            .await
            .context("Notification service unavailable")?
            .error_for_status()
            .context("Notification service rejected the save")?;

        Ok(true)
    }
}
