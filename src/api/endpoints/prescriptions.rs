use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::PrescriptionRequest;
use crate::pipeline::prescription::{plan_prescriptions, PrescriptionPlan};
use crate::pipeline::NothingToAnalyze;

/// `POST /prescriptions`: medicines, dosages and next-dose reminders
/// read from prescription text.
pub async fn plan(
    Json(request): Json<PrescriptionRequest>,
) -> Result<Json<PrescriptionPlan>, ApiError> {
    if request.text_input.trim().is_empty() {
        return Err(ApiError::NothingToAnalyze(NothingToAnalyze::NoText));
    }
    let now = chrono::Local::now().naive_local();
    Ok(Json(plan_prescriptions(&request.text_input, now)))
}
