//! Wizard step validation.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::response::DataResponse;
use crate::api::ApiJson;
use crate::domain::form::{validate_step, FormStep};
use crate::domain::{TripFormData, TripFormDraft};
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct ValidateStepRequest {
    pub step: u8,
    #[serde(default)]
    pub form: TripFormDraft,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StepValidation {
    pub step: u8,
    pub next_step: Option<u8>,
    /// True once the last step passes, i.e. the whole form is valid.
    pub ready_to_submit: bool,
}

/// Check the fields of one wizard step. The last step checks the whole
/// form, since passing it allows submission.
///
/// POST /trip-form/validate
pub async fn validate_form_step(
    ApiJson(req): ApiJson<ValidateStepRequest>,
) -> ApiResult<Json<DataResponse<StepValidation>>> {
    let step = FormStep::from_number(req.step)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown form step: {}", req.step)))?;

    match step.next() {
        Some(_) => validate_step(step, &req.form)?,
        None => {
            TripFormData::try_from(req.form)?;
        }
    }

    Ok(Json(DataResponse::new(StepValidation {
        step: step.number(),
        next_step: step.next().map(|s| s.number()),
        ready_to_submit: step.next().is_none(),
    })))
}
