pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::matching::handlers as matching;
use crate::skills::handlers as skills;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog
        .route("/api/v1/roles", get(matching::handle_list_roles))
        // Skills
        .route("/api/v1/skills/extract", post(skills::handle_extract))
        .route("/api/v1/resume", post(skills::handle_resume_upload))
        // Matching
        .route("/api/v1/skill-gap", post(matching::handle_skill_gap))
        .route("/api/v1/recommend", post(matching::handle_recommend))
        .route("/api/v1/learning-plan", post(matching::handle_learning_plan))
        .with_state(state)
}

/// Runs CPU-bound matching off the async workers.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(e.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::catalog::fixtures;
    use crate::config::Config;
    use crate::llm_client::{ChatBackend, LlmError};
    use crate::skills::normalizer::test_support::fuzzy_only;
    use crate::skills::resume::test_support::docx_bytes;

    struct EchoBackend;

    #[async_trait]
    impl ChatBackend for EchoBackend {
        async fn chat(&self, _context: &Value, message: &str) -> Result<String, LlmError> {
            if message.contains("friendly coach") {
                Ok("Keep going!".to_string())
            } else {
                Ok(r#"{"roadmap": [], "reason": "ok"}"#.to_string())
            }
        }
    }

    fn state(narrator: Option<Arc<dyn ChatBackend>>) -> AppState {
        let catalog = fixtures::catalog();
        let normalizer = fuzzy_only(Arc::clone(&catalog.vocabulary));
        AppState {
            catalog: Arc::new(catalog),
            normalizer: Arc::new(normalizer),
            narrator,
            config: Config::default(),
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_catalog() {
        let app = build_router(state(None));
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "elevatr-api");
        assert_eq!(body["catalog"]["roles"], 4);
        assert_eq!(body["narrative_enabled"], false);
    }

    #[tokio::test]
    async fn test_list_roles_in_catalog_order() {
        let app = build_router(state(None));
        let request = Request::get("/api/v1/roles").body(Body::empty()).unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 4);
        assert_eq!(body["roles"][0]["slug"], "data_analyst");
    }

    #[tokio::test]
    async fn test_extract_manual_list() {
        let app = build_router(state(None));
        let request = post_json(
            "/api/v1/skills/extract",
            json!({"text": "Python, SQL, Python", "mode": "manual"}),
        );
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skills"], json!(["python", "sql"]));
        assert_eq!(body["backend"], "fuzzy");
    }

    #[tokio::test]
    async fn test_extract_rejects_blank_text() {
        let app = build_router(state(None));
        let (status, body) = send(app, post_json("/api/v1/skills/extract", json!({"text": " "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_skill_gap_partial_match() {
        let app = build_router(state(None));
        let request = post_json(
            "/api/v1/skill-gap",
            json!({"skills": "python", "target_role": "data_analyst"}),
        );
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transition_type"], "upskill");
        assert_eq!(body["matched_skills"], json!(["python"]));
        assert_eq!(body["missing_skills"], json!(["sql"]));
        assert_eq!(body["completion_percentage"], 50);
        assert_eq!(body["learning_resources"]["sql"][0]["name"], "SQLBolt");
    }

    #[tokio::test]
    async fn test_skill_gap_unknown_role_is_404() {
        let app = build_router(state(None));
        let request = post_json(
            "/api/v1/skill-gap",
            json!({"skills": "python", "target_role": "astronaut"}),
        );
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "ROLE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_skill_gap_nothing_extracted_is_422() {
        let app = build_router(state(None));
        let request = post_json(
            "/api/v1/skill-gap",
            json!({"skills": "origami", "target_role": "data_analyst"}),
        );
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "NO_SKILLS_EXTRACTED");
    }

    #[tokio::test]
    async fn test_recommend_requires_input() {
        let app = build_router(state(None));
        let (status, body) = send(app, post_json("/api/v1/recommend", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Please provide skills for role recommendations"
        );
    }

    #[tokio::test]
    async fn test_recommend_honours_top_k() {
        let app = build_router(state(None));
        let request = post_json(
            "/api/v1/recommend",
            json!({"skills": "python, sql", "top_k": 1}),
        );
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 1);
        assert_eq!(body["recommendations"][0]["role_slug"], "data_analyst");
        assert_eq!(body["user_skills_count"], 2);
    }

    #[tokio::test]
    async fn test_recommend_non_positive_top_k_is_empty() {
        for top_k in [0, -1] {
            let app = build_router(state(None));
            let request = post_json(
                "/api/v1/recommend",
                json!({"skills": "python", "top_k": top_k}),
            );
            let (status, body) = send(app, request).await;
            assert_eq!(status, StatusCode::OK, "top_k = {top_k}");
            assert_eq!(body["recommendations"], json!([]));
            assert_eq!(
                body["analysis_summary"],
                "Found 0 recommended roles based on your 1 skills"
            );
        }
    }

    #[tokio::test]
    async fn test_learning_plan_without_llm_keeps_gap_analysis() {
        let app = build_router(state(None));
        let request = post_json(
            "/api/v1/learning-plan",
            json!({"skills": "python", "target_role": "data_analyst"}),
        );
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["narrative_available"], false);
        assert_eq!(body["gap_analysis"]["completion_percentage"], 50);
    }

    #[tokio::test]
    async fn test_learning_plan_with_llm() {
        let app = build_router(state(Some(Arc::new(EchoBackend))));
        let request = post_json(
            "/api/v1/learning-plan",
            json!({"skills": "python", "target_role": "data_analyst"}),
        );
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["narrative_available"], true);
        assert_eq!(body["message"], "Keep going!");
    }

    fn resume_upload(file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let boundary = "XBOUNDARYX";
        let mut body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"resume\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/resume")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    const DOCX_MIME: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

    #[tokio::test]
    async fn test_resume_upload_extracts_docx_skills() {
        let app = build_router(state(None));
        let data = docx_bytes("Five years of Python and SQL", "Kubernetes");
        let (status, body) = send(app, resume_upload("cv.docx", DOCX_MIME, &data)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skills"], json!(["kubernetes", "python", "sql"]));
    }

    #[tokio::test]
    async fn test_resume_upload_rejects_unsupported_format() {
        let app = build_router(state(None));
        let request = resume_upload("cv.txt", "text/plain", b"python and sql");
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
