//! PDF export endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::ApiJson;
use crate::domain::TripPlan;
use crate::error::{ApiError, ApiResult};
use crate::render::render_pdf_base64;

#[derive(Debug, Serialize, Deserialize)]
pub struct PdfResponse {
    /// Base64-encoded PDF document.
    pub pdf: String,
}

/// Render a plan to PDF.
///
/// POST /api/generate-pdf
pub async fn generate_pdf(ApiJson(plan): ApiJson<TripPlan>) -> ApiResult<Json<PdfResponse>> {
    let plan_id = plan.id();
    let pdf = tokio::task::spawn_blocking(move || render_pdf_base64(&plan))
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("PDF task panicked: {}", e)))?
        .map_err(|e| ApiError::PdfGeneration(e.to_string()))?;

    tracing::debug!(plan_id = %plan_id, encoded_len = pdf.len(), "PDF generated");

    Ok(Json(PdfResponse { pdf }))
}
