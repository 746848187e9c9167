//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! CORS is permissive so the mobile and web clients can call it from any
//! origin.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::pipeline::extraction::MAX_FILE_SIZE;

/// Multipart framing on top of the largest accepted upload.
const BODY_LIMIT: usize = MAX_FILE_SIZE + 64 * 1024;

pub fn api_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    Router::new()
        .route("/", get(endpoints::health::root))
        .route("/health", get(endpoints::health::check))
        .route("/analyze-report", post(endpoints::analyze::analyze_report))
        .route(
            "/patient-history/:patient_name",
            get(endpoints::history::patient_history),
        )
        .route("/test-patterns", get(endpoints::health::test_patterns))
        .route(
            "/test-patterns/:test_name",
            get(endpoints::health::test_pattern),
        )
        .route("/prescriptions", post(endpoints::prescriptions::plan))
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::crypto::ReportKey;
    use crate::db::{EncryptedReportStore, MemoryReportStore, ReportStore};
    use crate::pipeline::explain::{LanguageModel, MockLlmClient};
    use crate::pipeline::extraction::{MockOcrEngine, TextSource};

    const SAMPLE: &str = "Hemoglobin: 12.5 g/dl, Blood Sugar: 95 mg/dl";

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn multipart_request(fields: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        let boundary = "labsense-test-boundary";
        let mut body = Vec::new();
        for (name, filename, content) in fields {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            match filename {
                Some(f) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/analyze-report")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn analyze_body(patient: &str, text: &str) -> serde_json::Value {
        serde_json::json!({ "patient_name": patient, "text_input": text })
    }

    // ── Liveness ─────────────────────────────────────────────

    #[tokio::test]
    async fn root_returns_message() {
        let app = api_router(ApiContext::default());
        let response = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["message"].as_str().unwrap().contains("running"));
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let app = api_router(ApiContext::default());
        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], crate::config::APP_VERSION);
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let app = api_router(ApiContext::default());
        let req = Request::builder()
            .uri("/health")
            .header("origin", "http://phone.local")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    // ── Analyze: JSON ────────────────────────────────────────

    #[tokio::test]
    async fn analyze_text_returns_report() {
        let app = api_router(ApiContext::default());
        let req = json_request("POST", "/analyze-report", analyze_body("Jane Doe", SAMPLE));
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["patient_name"], "Jane Doe");
        assert_eq!(json["health_score"]["score"], 100);
        assert_eq!(json["summary"]["total_tests"], 2);
        assert_eq!(json["summary"]["regular_tests"], 1);
        assert_eq!(json["tests"][0]["test_name"], "Hemoglobin");
        assert_eq!(json["tests"][0]["category"], "periodic");
        assert_eq!(json["tests"][0]["status"], "Normal");
        assert_eq!(json["tests"][1]["test_name"], "Glucose");
        assert!(json["analysis_id"].is_string());
        assert_eq!(json["historical_data"].as_array().unwrap().len(), 0);
        assert_eq!(json["trends"][0]["direction"], "first_reading");
    }

    #[tokio::test]
    async fn analyze_missing_name_is_400() {
        let app = api_router(ApiContext::default());
        let req = json_request("POST", "/analyze-report", analyze_body("  ", SAMPLE));
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "MISSING_PATIENT_NAME");
    }

    #[tokio::test]
    async fn analyze_missing_text_is_400() {
        let app = api_router(ApiContext::default());
        let req = json_request(
            "POST",
            "/analyze-report",
            serde_json::json!({ "patient_name": "Jane" }),
        );
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "No text input provided");
    }

    #[tokio::test]
    async fn analyze_without_parameters_is_400() {
        let app = api_router(ApiContext::default());
        let req = json_request(
            "POST",
            "/analyze-report",
            analyze_body("Jane", "Patient feels fine, no numbers here"),
        );
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "NO_PARAMETERS");
    }

    #[tokio::test]
    async fn analyze_malformed_json_is_400() {
        let app = api_router(ApiContext::default());
        let req = Request::builder()
            .method("POST")
            .uri("/analyze-report")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn analyze_uses_request_date() {
        let app = api_router(ApiContext::default());
        let mut body = analyze_body("Jane", SAMPLE);
        body["report_date"] = serde_json::json!("2024-02-29");
        let response = app
            .oneshot(json_request("POST", "/analyze-report", body))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["report_date"], "2024-02-29");
    }

    #[tokio::test]
    async fn use_llm_routes_to_language_model() {
        let ctx = ApiContext::new(
            Arc::new(MemoryReportStore::new()),
            TextSource::text_only(),
            LanguageModel::enabled(MockLlmClient::new("Model says hello."), "mock"),
            5,
        );
        // Glucose has no static explanation, so the model is consulted
        let mut body = analyze_body("Jane", "Blood Sugar: 95 mg/dl");
        body["use_llm"] = serde_json::json!(true);
        let response = api_router(ctx.clone())
            .oneshot(json_request("POST", "/analyze-report", body))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["tests"][0]["explanation"], "Model says hello.");

        let plain = analyze_body("Jane", "Blood Sugar: 95 mg/dl");
        let response = api_router(ctx)
            .oneshot(json_request("POST", "/analyze-report", plain))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_ne!(json["tests"][0]["explanation"], "Model says hello.");
    }

    // ── Analyze: history and trends ──────────────────────────

    #[tokio::test]
    async fn second_report_sees_history_and_trends() {
        let ctx = ApiContext::new(
            Arc::new(EncryptedReportStore::in_memory(ReportKey::generate()).unwrap()),
            TextSource::text_only(),
            LanguageModel::Disabled,
            5,
        );

        let mut first = analyze_body("Jane", "Blood Sugar: 95 mg/dl");
        first["report_date"] = serde_json::json!("2024-01-10");
        let response = api_router(ctx.clone())
            .oneshot(json_request("POST", "/analyze-report", first))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let mut second = analyze_body("Jane", "Blood Sugar: 120 mg/dl");
        second["report_date"] = serde_json::json!("2024-02-10");
        let response = api_router(ctx.clone())
            .oneshot(json_request("POST", "/analyze-report", second))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["historical_data"].as_array().unwrap().len(), 1);
        assert_eq!(json["historical_data"][0]["date"], "2024-01-10");
        assert_eq!(json["trends"][0]["test_name"], "Glucose");
        assert_eq!(json["trends"][0]["direction"], "higher");
        assert_eq!(json["trends"][0]["previous"], 95.0);

        let response = api_router(ctx)
            .oneshot(get_request("/patient-history/Jane"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["patient_name"], "Jane");
        let reports = json["reports"].as_array().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0]["date"], "2024-02-10");
    }

    #[tokio::test]
    async fn history_for_unknown_patient_is_empty() {
        let app = api_router(ApiContext::default());
        let response = app
            .oneshot(get_request("/patient-history/Nobody"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["reports"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn history_name_is_trimmed() {
        let ctx = ApiContext::default();
        api_router(ctx.clone())
            .oneshot(json_request("POST", "/analyze-report", analyze_body("Jane", SAMPLE)))
            .await
            .unwrap();

        let response = api_router(ctx)
            .oneshot(get_request("/patient-history/%20Jane%20"))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["patient_name"], "Jane");
        assert_eq!(json["reports"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn history_respects_limit() {
        let store = Arc::new(MemoryReportStore::new());
        let ctx = ApiContext::new(store.clone(), TextSource::text_only(), LanguageModel::Disabled, 2);
        for day in 1..=4 {
            let mut body = analyze_body("Jane", SAMPLE);
            body["report_date"] = serde_json::json!(format!("2024-03-0{day}"));
            api_router(ctx.clone())
                .oneshot(json_request("POST", "/analyze-report", body))
                .await
                .unwrap();
        }
        assert_eq!(store.load_recent("Jane", 10).unwrap().len(), 4);

        let response = api_router(ctx)
            .oneshot(get_request("/patient-history/Jane"))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["reports"].as_array().unwrap().len(), 2);
    }

    // ── Analyze: multipart ───────────────────────────────────

    #[tokio::test]
    async fn multipart_text_file_is_analyzed() {
        let app = api_router(ApiContext::default());
        let req = multipart_request(&[
            ("patient_name", None, b"Jane"),
            ("file", Some("report.txt"), SAMPLE.as_bytes()),
        ]);
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["summary"]["total_tests"], 2);
    }

    #[tokio::test]
    async fn multipart_image_goes_through_ocr() {
        let ctx = ApiContext::new(
            Arc::new(MemoryReportStore::new()),
            TextSource::with_ocr(MockOcrEngine::new("W.B.C 7500 cells/cu mm")),
            LanguageModel::Disabled,
            5,
        );
        let png: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x01];
        let req = multipart_request(&[
            ("patient_name", None, b"Jane"),
            ("file", Some("scan.png"), png),
        ]);
        let response = api_router(ctx).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["tests"][0]["value"], 7500.0);
        assert_eq!(json["tests"][0]["status"], "Normal");
    }

    #[tokio::test]
    async fn multipart_image_without_ocr_is_400() {
        let png: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x01];
        let req = multipart_request(&[
            ("patient_name", None, b"Jane"),
            ("file", Some("scan.png"), png),
        ]);
        let response = api_router(ApiContext::default()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "EXTRACTION_FAILED");
    }

    #[tokio::test]
    async fn multipart_without_file_is_400() {
        let req = multipart_request(&[("patient_name", None, b"Jane")]);
        let response = api_router(ApiContext::default()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "No file provided");
    }

    #[tokio::test]
    async fn multipart_without_name_is_400() {
        let req = multipart_request(&[("file", Some("report.txt"), SAMPLE.as_bytes())]);
        let response = api_router(ApiContext::default()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "MISSING_PATIENT_NAME");
    }

    #[tokio::test]
    async fn multipart_just_over_file_cap_is_413() {
        let file = vec![b'a'; MAX_FILE_SIZE + 1];
        let req = multipart_request(&[
            ("patient_name", None, b"Jane"),
            ("file", Some("report.txt"), &file),
        ]);
        let response = api_router(ApiContext::default()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn multipart_over_body_limit_is_413() {
        let file = vec![b'a'; MAX_FILE_SIZE + 128 * 1024];
        let req = multipart_request(&[
            ("patient_name", None, b"Jane"),
            ("file", Some("report.txt"), &file),
        ]);
        let response = api_router(ApiContext::default()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn json_over_body_limit_is_413() {
        let text = "a".repeat(BODY_LIMIT);
        let req = json_request("POST", "/analyze-report", analyze_body("Jane", &text));
        let response = api_router(ApiContext::default()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "PAYLOAD_TOO_LARGE");
    }

    // ── Catalog and prescriptions ────────────────────────────

    #[tokio::test]
    async fn test_pattern_looks_up_one_test() {
        let app = api_router(ApiContext::default());
        let response = app
            .oneshot(get_request("/test-patterns/hemoglobin"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["name"], "Hemoglobin");
        assert_eq!(json["unit"], "g/dl");
        assert_eq!(json["category"], "periodic");
    }

    #[tokio::test]
    async fn test_pattern_unknown_is_404() {
        let app = api_router(ApiContext::default());
        let response = app
            .oneshot(get_request("/test-patterns/Troponin"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "UNKNOWN_TEST");
    }

    #[tokio::test]
    async fn test_patterns_lists_catalog() {
        let app = api_router(ApiContext::default());
        let response = app.oneshot(get_request("/test-patterns")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let tests = json["supported_tests"].as_array().unwrap();
        assert_eq!(tests.len(), crate::knowledge::PRIMARY_CATALOG.len());
        assert_eq!(tests[0]["name"], "Hemoglobin");
        assert!(!json["secondary_patterns"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn prescriptions_are_planned() {
        let app = api_router(ApiContext::default());
        let text = "Report Date: 05/03/2024\nParacetamol 500mg 3 times a day";
        let req = json_request("POST", "/prescriptions", serde_json::json!({ "text_input": text }));
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["report_date"], "2024-03-05");
        assert_eq!(json["prescriptions"][0]["dosage"], "500mg");
        assert_eq!(json["reminders"][0]["doses_per_day"], 3);
        assert_eq!(json["reminders"][0]["next_dose"], "2024-03-05T08:00:00");
    }

    #[tokio::test]
    async fn prescriptions_without_text_is_400() {
        let app = api_router(ApiContext::default());
        let req = json_request("POST", "/prescriptions", serde_json::json!({ "text_input": " " }));
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
