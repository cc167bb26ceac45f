use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sm_core::{Error, ErrorKind, LogProgress, Result, SummaryReport, SummaryRequest};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::form::{FormInput, InputMode};
use crate::page::{self, PageView};
use crate::AppState;

/// Typed error body returned by the JSON API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = match kind {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Extraction => StatusCode::BAD_GATEWAY,
            ErrorKind::Model => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            kind,
            message: self.0.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonMode {
    Url,
    Text,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeBody {
    pub mode: JsonMode,
    pub input: String,
    pub length: Option<usize>,
}

async fn run(state: &AppState, request: SummaryRequest) -> Result<SummaryReport> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("summarize", %request_id, mode = %request.mode());
    let result = state
        .manager
        .run(&request, &LogProgress)
        .instrument(span)
        .await;
    if let Err(err) = &result {
        tracing::warn!(%request_id, kind = %err.kind(), "❌ {}", err);
    }
    result
}

pub async fn index() -> Html<String> {
    Html(page::render(&PageView::default()))
}

pub async fn summarize_form(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Html<String> {
    let input = match FormInput::read(multipart).await {
        Ok(input) => input,
        Err(err) => {
            return Html(page::render(&PageView {
                outcome: Some(err.into()),
                ..PageView::default()
            }))
        }
    };

    let mut view = PageView {
        mode: input.mode,
        url: input.url.clone(),
        text: input.text.clone(),
        pdf_mode: input.pdf_mode,
        length: input.length,
        num_pages: input.num_pages,
        outcome: None,
    };

    // The length slider belongs to the link and text inputs; documents use
    // their own defaults.
    let mut input = input;
    if input.mode == InputMode::Pdf {
        input.length = None;
    }

    let result = match input.into_request() {
        Ok(request) => run(&state, request).await,
        Err(err) => Err(err),
    };
    view.outcome = Some(result.into());
    Html(page::render(&view))
}

pub async fn summarize_json(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SummarizeBody>,
) -> std::result::Result<Json<SummaryReport>, ApiError> {
    let request = match body.mode {
        JsonMode::Url => SummaryRequest::url(body.input),
        JsonMode::Text => SummaryRequest::text(body.input),
    };
    let request = match body.length {
        Some(length) => request.with_length(length),
        None => request,
    };
    Ok(Json(run(&state, request).await?))
}

pub async fn summarize_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> std::result::Result<Json<SummaryReport>, ApiError> {
    let mut input = FormInput::read(multipart).await?;
    input.mode = InputMode::Pdf;
    let request = input.into_request()?;
    Ok(Json(run(&state, request).await?))
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "backend": state.backend(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_app;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use axum::Router;
    use sm_core::{GenerationConfig, ModelLoader, SummaryModel};
    use sm_inference::models::LeadLoader;
    use sm_sources::testing::text_pdf;
    use sm_sources::SummaryManager;
    use tower::ServiceExt;

    const BOUNDARY: &str = "sm-test-boundary";

    #[derive(Debug)]
    struct BrokenModel;

    #[async_trait]
    impl SummaryModel for BrokenModel {
        fn model_id(&self) -> &str {
            "broken"
        }

        async fn summarize(&self, _text: &str, _config: &GenerationConfig) -> Result<String> {
            Err(Error::Model("generation exploded".to_string()))
        }
    }

    struct BrokenLoader;

    #[async_trait]
    impl ModelLoader for BrokenLoader {
        fn name(&self) -> &str {
            "broken"
        }

        async fn load(&self, _model_id: &str) -> Result<Arc<dyn SummaryModel>> {
            Ok(Arc::new(BrokenModel))
        }
    }

    fn app(loader: Arc<dyn ModelLoader>) -> Router {
        create_app(AppState::new(SummaryManager::new(loader).unwrap()))
    }

    fn multipart_body(fields: &[(&str, &str)], file: Option<&[u8]>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                    BOUNDARY, name, value
                )
                .as_bytes(),
            );
        }
        if let Some(bytes) = file {
            body.extend_from_slice(
                format!(
                    "--{}\r\n\
                     Content-Disposition: form-data; name=\"file\"; filename=\"doc.pdf\"\r\n\
                     Content-Type: application/pdf\r\n\r\n",
                    BOUNDARY
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/summarize")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_renders_page() {
        let response = app(Arc::new(LeadLoader))
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Summarizer"));
        assert!(html.contains("SUMMARIZE"));
    }

    #[tokio::test]
    async fn test_health_reports_backend() {
        let response = app(Arc::new(LeadLoader))
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["backend"], "lead");
    }

    #[tokio::test]
    async fn test_json_text_summary() {
        let response = app(Arc::new(LeadLoader))
            .oneshot(json_request(json!({
                "mode": "text",
                "input": "The quick brown fox\n jumps over the lazy dog.",
                "length": 10
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let report: SummaryReport = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(report.model_id, "google/pegasus-xsum");
        assert_eq!(report.summaries.len(), 1);
        assert_eq!(report.summaries[0].text, "The quick brown fox jumps over the lazy dog.");
    }

    #[tokio::test]
    async fn test_json_empty_text_is_bad_request() {
        let response = app(Arc::new(LeadLoader))
            .oneshot(json_request(json!({ "mode": "text", "input": "   " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body.kind, ErrorKind::InvalidInput);
        assert_eq!(body.message, "Please enter some text");
    }

    #[tokio::test]
    async fn test_json_model_failure_is_server_error() {
        let response = app(Arc::new(BrokenLoader))
            .oneshot(json_request(json!({ "mode": "text", "input": "Some text" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body.kind, ErrorKind::Model);
        assert_eq!(body.message, "An error occurred: Model error: generation exploded");
    }

    #[tokio::test]
    async fn test_pdf_api_page_wise() {
        let pdf = text_pdf(&["Page one text", "Page two text", "Page three text"]);
        let body = multipart_body(&[("summary_type", "page_wise"), ("num_pages", "2")], Some(&pdf));
        let response = app(Arc::new(LeadLoader))
            .oneshot(multipart_request("/api/summarize/pdf", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let report: SummaryReport = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(report.model_id, "google/pegasus-large");
        assert_eq!(report.summaries.len(), 2);
        assert_eq!(report.summaries[0].text, "Page one text");
        assert_eq!(report.summaries[1].text, "Page two text");
    }

    #[tokio::test]
    async fn test_pdf_api_without_file() {
        let body = multipart_body(&[("summary_type", "whole_file")], None);
        let response = app(Arc::new(LeadLoader))
            .oneshot(multipart_request("/api/summarize/pdf", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_form_whole_file_summary() {
        let pdf = text_pdf(&["A", "B"]);
        let body = multipart_body(
            &[("mode", "pdf"), ("summary_type", "whole_file"), ("length", "50")],
            Some(&pdf),
        );
        let response = app(Arc::new(LeadLoader))
            .oneshot(multipart_request("/summarize", body))
            .await
            .unwrap();
        let html = body_string(response).await;
        assert!(html.contains("Summary generated successfully!"));
        assert!(html.contains("Whole File Summary:"));
        assert!(html.contains("<p>A B</p>"));
    }

    #[tokio::test]
    async fn test_form_invalid_url_shows_inline_error() {
        let body = multipart_body(&[("mode", "url"), ("url", "not a url"), ("length", "50")], None);
        let response = app(Arc::new(LeadLoader))
            .oneshot(multipart_request("/summarize", body))
            .await
            .unwrap();
        let html = body_string(response).await;
        assert!(html.contains("Please enter a valid URL"));
        assert!(!html.contains("An error occurred"));
        assert!(!html.contains("Summary:"));
    }

    #[tokio::test]
    async fn test_form_generation_failure_shows_one_generic_error() {
        let fields = [("mode", "text"), ("text", "Some text"), ("length", "50")];
        let body = multipart_body(&fields, None);
        let response = app(Arc::new(BrokenLoader))
            .oneshot(multipart_request("/summarize", body))
            .await
            .unwrap();
        let html = body_string(response).await;
        assert_eq!(html.matches("An error occurred:").count(), 1);
        assert!(!html.contains("Summary:"));
        assert!(!html.contains("generated successfully"));
    }
}
