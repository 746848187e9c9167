//! `POST /analyze-report`: typed text (JSON) or an uploaded file
//! (multipart) through the full analysis pipeline.

use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use chrono::NaiveDate;

use crate::api::error::ApiError;
use crate::api::types::{AnalyzeReportRequest, ApiContext};
use crate::pipeline::processor::AnalysisRequest;
use crate::reporting::{analyze_and_record, AnalysisOutcome};

enum ReportInput {
    Text(AnalyzeReportRequest),
    Upload {
        patient_name: String,
        file: Vec<u8>,
        report_date: Option<NaiveDate>,
        use_llm: bool,
    },
}

pub async fn analyze_report(
    State(ctx): State<ApiContext>,
    request: Request,
) -> Result<Json<AnalysisOutcome>, ApiError> {
    let input = read_input(request).await?;
    // OCR, the language model and SQLite are all blocking
    let response = tokio::task::spawn_blocking(move || run_analysis(&ctx, input)).await??;
    Ok(Json(response))
}

async fn read_input(request: Request) -> Result<ReportInput, ApiError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
        read_upload(multipart).await
    } else {
        let Json(body) = Json::<AnalyzeReportRequest>::from_request(request, &())
            .await
            .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
        Ok(ReportInput::Text(body))
    }
}

async fn read_upload(mut multipart: Multipart) -> Result<ReportInput, ApiError> {
    let mut patient_name = String::new();
    let mut file = None;
    let mut report_date = None;
    let mut use_llm = false;

    let bad_field = |e: MultipartError| ApiError::rejected(e.status(), e.body_text());
    while let Some(field) = multipart.next_field().await.map_err(bad_field)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "patient_name" => patient_name = field.text().await.map_err(bad_field)?,
            "file" => file = Some(field.bytes().await.map_err(bad_field)?.to_vec()),
            "report_date" => {
                let raw = field.text().await.map_err(bad_field)?;
                report_date = Some(raw.trim().parse::<NaiveDate>().map_err(|e| {
                    ApiError::BadRequest(format!("Invalid report_date '{raw}': {e}"))
                })?);
            }
            "use_llm" => {
                let raw = field.text().await.map_err(bad_field)?;
                use_llm = matches!(raw.trim(), "true" | "1");
            }
            _ => {}
        }
    }

    if patient_name.trim().is_empty() {
        return Err(ApiError::MissingPatientName);
    }
    let file = file.ok_or_else(|| ApiError::BadRequest("No file provided".into()))?;

    Ok(ReportInput::Upload {
        patient_name,
        file,
        report_date,
        use_llm,
    })
}

fn run_analysis(ctx: &ApiContext, input: ReportInput) -> Result<AnalysisOutcome, ApiError> {
    let (patient_name, raw_text, report_date, use_llm) = match input {
        ReportInput::Text(body) => (body.patient_name, body.text_input, body.report_date, body.use_llm),
        ReportInput::Upload {
            patient_name,
            file,
            report_date,
            use_llm,
        } => {
            let extracted = ctx.text_source.extract(&file)?;
            (patient_name, extracted.text, report_date, use_llm)
        }
    };

    let request = AnalysisRequest {
        patient_name: &patient_name,
        raw_text: &raw_text,
        report_date,
    };
    let analyzer = ctx.analyzer_for(use_llm);
    Ok(analyze_and_record(
        &analyzer,
        ctx.store.as_ref(),
        ctx.history_limit,
        &request,
    )?)
}
