pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;
use crate::{analysis, comparison, editor, parser, recommendation};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis & parsing
        .route(
            "/api/v1/jobs/analyze",
            post(analysis::handlers::handle_analyze_job),
        )
        .route(
            "/api/v1/resumes/parse",
            post(parser::handlers::handle_parse_resume),
        )
        .route(
            "/api/v1/resumes/parse-pdf",
            post(parser::handlers::handle_parse_pdf),
        )
        // Tailoring
        .route(
            "/api/v1/tailoring/compare",
            post(comparison::handlers::handle_compare),
        )
        .route(
            "/api/v1/tailoring/keywords",
            post(comparison::handlers::handle_keyword_match),
        )
        .route(
            "/api/v1/tailoring/recommend",
            post(recommendation::handlers::handle_recommend),
        )
        // Editor
        .route(
            "/api/v1/editor",
            post(editor::handlers::handle_create_session),
        )
        .route(
            "/api/v1/editor/:id",
            get(editor::handlers::handle_get_session)
                .delete(editor::handlers::handle_delete_session),
        )
        .route(
            "/api/v1/editor/:id/sections/:name",
            put(editor::handlers::handle_put_section)
                .delete(editor::handlers::handle_delete_section),
        )
        .route(
            "/api/v1/editor/:id/sections/:name/revert",
            post(editor::handlers::handle_revert_section),
        )
        .route(
            "/api/v1/editor/:id/recommendations",
            post(editor::handlers::handle_apply_recommendations),
        )
        .route(
            "/api/v1/editor/:id/history",
            get(editor::handlers::handle_history),
        )
        .route(
            "/api/v1/editor/:id/export/markdown",
            get(editor::handlers::handle_export_markdown),
        )
        .route(
            "/api/v1/editor/:id/export/pdf",
            get(editor::handlers::handle_export_pdf),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::comparison::fit_scoring::KeywordFitScorer;
    use crate::config::Config;
    use crate::editor::EditorStore;
    use crate::llm_client::testing::ScriptedGenerator;

    fn state_with(llm: ScriptedGenerator) -> AppState {
        AppState {
            llm: Arc::new(llm),
            fit_scorer: Arc::new(KeywordFitScorer),
            editors: EditorStore::new(),
            config: Config {
                ollama_base_url: "http://localhost:11434".into(),
                ollama_model: "llama3.1".into(),
                llm_timeout: Duration::from_secs(5),
                llm_max_retries: 0,
                enable_llm_matching: false,
                port: 8000,
                rust_log: "info".into(),
            },
        }
    }

    async fn send(
        router: Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        let request = match body {
            Some(json) => request.body(Body::from(json.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let router = build_router(state_with(ScriptedGenerator::failing()));
        let (status, body) = send(router, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["llm"]["model"], "llama3.1");
    }

    #[tokio::test]
    async fn test_analyze_job_recovers_from_prose() {
        let llm = ScriptedGenerator::replying(&[
            "Sure! Here are the requirements you asked for.",
            r#"{"required_skills": ["Python", "SQL"], "keywords": "backend"}"#,
        ]);
        let router = build_router(state_with(llm));

        let (status, body) = send(
            router,
            "POST",
            "/api/v1/jobs/analyze",
            Some(json!({ "job_text": "Backend engineer, Python and SQL" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["strategy"], "fallback_prompt");
        assert_eq!(body["requirements"]["required_skills"], json!(["Python", "SQL"]));
        assert_eq!(body["requirements"]["keywords"], json!(["backend"]));
        assert_eq!(body["requirements"]["preferred_skills"], json!([]));
    }

    #[tokio::test]
    async fn test_empty_job_text_is_rejected() {
        let router = build_router(state_with(ScriptedGenerator::failing()));
        let (status, body) = send(
            router,
            "POST",
            "/api/v1/jobs/analyze",
            Some(json!({ "job_text": "   " })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_compare_accepts_loose_shapes() {
        let router = build_router(state_with(ScriptedGenerator::failing()));
        let (status, body) = send(
            router,
            "POST",
            "/api/v1/tailoring/compare",
            Some(json!({
                "resume_sections": { "skills": ["Python", "SQL"], "experience": null },
                "job_requirements": { "required_skills": "Python" }
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["comparison"]["match_score"], 100.0);
        assert_eq!(body["comparison"]["matches"][0]["item"], "Python");
    }

    #[tokio::test]
    async fn test_editor_session_flow() {
        let state = state_with(ScriptedGenerator::failing());

        let (status, created) = send(
            build_router(state.clone()),
            "POST",
            "/api/v1/editor",
            Some(json!({
                "resume_text": "Jane Doe\nPython",
                "sections": { "skills": "- Python", "contact_information": "Jane Doe" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["resume"]["id"].as_str().unwrap().to_string();

        let (status, applied) = send(
            build_router(state.clone()),
            "POST",
            &format!("/api/v1/editor/{id}/recommendations"),
            Some(json!([
                { "section": "skills", "type": "Add", "content": "Docker", "priority": 8 },
                { "section": "skills", "type": "add", "content": "", "priority": 1 }
            ])),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(applied["outcomes"][0]["applied"]["outcome"], "updated");
        assert!(applied["outcomes"][1]["error"].is_string());

        let (status, reverted) = send(
            build_router(state.clone()),
            "POST",
            &format!("/api/v1/editor/{id}/sections/Skills/revert"),
            Some(json!({ "version": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reverted["content"], "- Python\n- Docker");
        assert_eq!(reverted["changed"], false);

        let (status, history) = send(
            build_router(state.clone()),
            "GET",
            &format!("/api/v1/editor/{id}/history"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history[0]["section"], "Skills");

        let (status, _) = send(
            build_router(state.clone()),
            "POST",
            &format!("/api/v1/editor/{id}/sections/Skills/revert"),
            Some(json!({ "version": 42 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_pdf_export_content_type() {
        let state = state_with(ScriptedGenerator::failing());
        let mut resume = crate::editor::EditableResume::new("text");
        resume.add_section("Skills", "- Rust");
        let id = state.editors.insert(resume).await;

        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/editor/{id}/export/pdf"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let router = build_router(state_with(ScriptedGenerator::failing()));
        let (status, body) = send(
            router,
            "GET",
            &format!("/api/v1/editor/{}", uuid::Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
