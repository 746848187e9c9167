use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::reporting::{load_patient_history, PatientHistory};

/// `GET /patient-history/:patient_name`: most recent stored reports.
pub async fn patient_history(
    State(ctx): State<ApiContext>,
    Path(patient_name): Path<String>,
) -> Result<Json<PatientHistory>, ApiError> {
    if patient_name.trim().is_empty() {
        return Err(ApiError::MissingPatientName);
    }

    let store = ctx.store.clone();
    let limit = ctx.history_limit;
    let history = tokio::task::spawn_blocking(move || {
        load_patient_history(store.as_ref(), &patient_name, limit)
    })
    .await??;
    Ok(Json(history))
}
