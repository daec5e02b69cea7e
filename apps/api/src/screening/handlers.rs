use axum::{
    extract::{Multipart, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::screening::aggregate::{to_csv, ResultRow, CSV_FILENAME};
use crate::screening::editable::{from_editable_text, to_editable_text, EditableRequirements};
use crate::screening::pipeline::{analyze_batch, FailedResume, ResumeUpload};
use crate::screening::requirements::{extract_requirements, JobRequirements};
use crate::screening::scorer::ScoringModels;
use crate::screening::ScreeningError;
use crate::session::SessionId;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzeJobDescriptionRequest {
    #[serde(default)]
    pub job_description: String,
    /// Overrides the configured JD model.
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateRequirementsRequest {
    #[serde(default)]
    pub must_have_text: String,
    #[serde(default)]
    pub preferred_text: String,
    #[serde(default)]
    pub additional_text: String,
}

#[derive(Serialize)]
pub struct RequirementsResponse {
    pub success: bool,
    pub message: String,
    pub requirements: JobRequirements,
    /// Text blocks for the edit form.
    pub editable: EditableRequirements,
}

impl RequirementsResponse {
    fn new(message: &str, requirements: JobRequirements) -> Self {
        let editable = to_editable_text(&requirements);
        Self {
            success: true,
            message: message.to_string(),
            requirements,
            editable,
        }
    }
}

#[derive(Serialize)]
pub struct AnalyzeResumesResponse<'a> {
    pub success: bool,
    pub message: String,
    pub run_id: Uuid,
    pub completed_at: DateTime<Utc>,
    /// Ranked, highest semantic score first.
    pub results: Vec<ResultRow<'a>>,
    pub failures: &'a [FailedResume],
}

/// POST /api/analyze-job-description
pub async fn handle_analyze_job_description(
    State(state): State<AppState>,
    SessionId(session): SessionId,
    Json(req): Json<AnalyzeJobDescriptionRequest>,
) -> Result<Json<RequirementsResponse>, AppError> {
    if req.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description is required".to_string(),
        ));
    }
    let model = non_blank(req.model).unwrap_or_else(|| state.config.jd_model.clone());

    let requirements =
        extract_requirements(state.llm.as_ref(), &req.job_description, &model).await?;

    let stored = requirements.clone();
    state
        .sessions
        .update(&session, move |s| {
            s.job_description = Some(req.job_description);
            s.requirements = Some(stored);
        })
        .await;

    Ok(Json(RequirementsResponse::new(
        "Job description analyzed successfully",
        requirements,
    )))
}

/// POST /api/update-requirements
pub async fn handle_update_requirements(
    State(state): State<AppState>,
    SessionId(session): SessionId,
    Json(req): Json<UpdateRequirementsRequest>,
) -> Result<Json<RequirementsResponse>, AppError> {
    let mut requirements =
        from_editable_text(&req.must_have_text, &req.preferred_text, &req.additional_text);

    let stored = state
        .sessions
        .update(&session, |s| {
            requirements.original_job_description = s.job_description.clone().unwrap_or_default();
            s.requirements = Some(requirements.clone());
            requirements
        })
        .await;

    info!(
        "Requirements updated from edited text ({} items)",
        stored.item_count()
    );

    Ok(Json(RequirementsResponse::new(
        "Requirements updated successfully",
        stored,
    )))
}

/// GET /api/current-requirements
pub async fn handle_current_requirements(
    State(state): State<AppState>,
    SessionId(session): SessionId,
) -> Result<Json<RequirementsResponse>, AppError> {
    let requirements = state
        .sessions
        .read(&session, |s| s.requirements.clone())
        .await
        .ok_or_else(|| AppError::NotFound("No requirements available".to_string()))?;

    Ok(Json(RequirementsResponse::new(
        "Current requirements",
        requirements,
    )))
}

/// POST /api/analyze-resumes
/// Multipart body: one or more `files` parts and an optional `model` field.
pub async fn handle_analyze_resumes(
    State(state): State<AppState>,
    SessionId(session): SessionId,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let requirements = state
        .sessions
        .read(&session, |s| s.requirements.clone())
        .await
        .ok_or(ScreeningError::NoRequirements)?;

    let mut uploads = Vec::new();
    let mut saw_files_field = false;
    let mut model = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("files") => {
                saw_files_field = true;
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Could not read upload {filename}: {e}"))
                })?;
                if filename.trim().is_empty() {
                    continue;
                }
                uploads.push(ResumeUpload {
                    filename,
                    content_type,
                    data,
                });
            }
            Some("model") => {
                model = field.text().await.ok();
            }
            _ => {}
        }
    }

    if !saw_files_field {
        return Err(AppError::Validation("No files uploaded".to_string()));
    }
    if uploads.is_empty() {
        return Err(AppError::Validation("No files selected".to_string()));
    }

    // A new run replaces the previous result set, even if it fails midway.
    state.sessions.update(&session, |s| s.results.clear()).await;

    let models = ScoringModels {
        resume: non_blank(model).unwrap_or_else(|| state.config.resume_model.clone()),
        semantic: state.config.semantic_model.clone(),
    };
    let outcome = analyze_batch(state.llm.as_ref(), uploads, &requirements, &models).await;

    let stored = outcome.results.clone();
    state
        .sessions
        .update(&session, move |s| s.results = stored)
        .await;

    let mut message = format!("Analyzed {} resumes successfully", outcome.results.len());
    if !outcome.failures.is_empty() {
        message.push_str(&format!("; {} could not be analyzed", outcome.failures.len()));
    }

    let body = AnalyzeResumesResponse {
        success: true,
        message,
        run_id: outcome.run_id,
        completed_at: outcome.completed_at,
        results: outcome.results.iter().map(ResultRow::from).collect(),
        failures: &outcome.failures,
    };
    Ok(Json(body).into_response())
}

/// GET /api/export-csv
pub async fn handle_export_csv(
    State(state): State<AppState>,
    SessionId(session): SessionId,
) -> Result<Response, AppError> {
    let csv = state
        .sessions
        .read(&session, |s| to_csv(&s.results))
        .await?;

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{CSV_FILENAME}\""))
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/csv")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::llm_client::mock::MockModel;
    use crate::routes::build_router;
    use crate::session::{SessionStore, SESSION_HEADER};

    use super::*;

    const JD: &str = "Senior Python engineer. 3+ years building REST APIs.";

    const JD_REPLY: &str = r#"{
        "must_have_requirements": {
            "technical_skills": ["Python", "REST APIs"],
            "experience": "3+ years",
            "qualifications": ["BSc Computer Science"],
            "core_responsibilities": ["Build backend services"]
        },
        "good_to_have_requirements": {
            "additional_skills": ["Docker"],
            "extra_qualifications": [],
            "bonus_experience": []
        },
        "additional_screening_criteria": ["Full-time"]
    }"#;

    fn analysis_reply(name: &str, recommendation: &str) -> String {
        json!({
            "contact_info": {"full_name": name},
            "requirement_match": {
                "must_have_requirements": {
                    "technical_skills": {"Python": true, "REST APIs": false},
                    "experience": true
                }
            },
            "qualitative_assessment": {"transferability_to_role": "Medium"},
            "final_recommendation": recommendation
        })
        .to_string()
    }

    fn app(mock: MockModel) -> (Router, Arc<MockModel>) {
        let mock = Arc::new(mock);
        let state = AppState {
            llm: mock.clone(),
            config: Config::for_tests(),
            sessions: SessionStore::new(),
        };
        (build_router(state), mock)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    const BOUNDARY: &str = "screener-test-boundary";

    fn multipart(files: &[(&str, &str)], model: Option<&str>) -> Request<Body> {
        let mut body = String::new();
        for (filename, content) in files {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\nContent-Type: text/plain\r\n\r\n{content}\r\n"
            ));
        }
        if let Some(model) = model {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"model\"\r\n\r\n{model}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::post("/api/analyze-resumes")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn analyze_jd(app: &Router) {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/analyze-job-description",
                json!({"job_description": JD}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app(MockModel::new());
        let response = app.oneshot(get("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_check_api_key_reports_provider_failure() {
        let (app, mock) = app(MockModel::new().fail(crate::llm_client::LlmError::Api {
            status: 401,
            message: "invalid api key".to_string(),
        }));
        let response = app.oneshot(get("/api/check-api-key")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("invalid api key"));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_analyze_job_description_returns_requirements_and_editable_text() {
        let (app, mock) = app(MockModel::new().reply(JD_REPLY));
        let response = app
            .oneshot(post_json(
                "/api/analyze-job-description",
                json!({"job_description": JD, "model": "gpt-4.1-mini"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["requirements"]["original_job_description"], JD);
        assert_eq!(
            body["requirements"]["must_have_requirements"]["experience"],
            "3+ years"
        );
        assert!(body["editable"]["must_have"]
            .as_str()
            .unwrap()
            .starts_with("Technical Skills:\n- Python"));
        assert_eq!(mock.calls.lock().unwrap()[0].0, "gpt-4.1-mini");
    }

    #[tokio::test]
    async fn test_blank_job_description_is_rejected_without_model_call() {
        let (app, mock) = app(MockModel::new());
        let response = app
            .oneshot(post_json(
                "/api/analyze-job-description",
                json!({"job_description": "   "}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_extraction_is_bad_gateway_and_keeps_no_requirements() {
        let (app, _) = app(MockModel::new().reply("not json at all"));
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/analyze-job-description",
                json!({"job_description": JD}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = app.oneshot(get("/api/current-requirements")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_current_requirements_not_found_before_analysis() {
        let (app, _) = app(MockModel::new());
        let response = app.oneshot(get("/api/current-requirements")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_update_requirements_replaces_and_keeps_original_jd() {
        let (app, _) = app(MockModel::new().reply(JD_REPLY));
        analyze_jd(&app).await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/update-requirements",
                json!({
                    "must_have_text": "Technical Skills:\n- Rust\n\nExperience:\n- 5 years",
                    "preferred_text": "Additional Skills:\n- Kubernetes",
                    "additional_text": "- Remote OK"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get("/api/current-requirements")).await.unwrap();
        let requirements = &body_json(response).await["requirements"];
        assert_eq!(requirements["original_job_description"], JD);
        assert_eq!(
            requirements["must_have_requirements"]["technical_skills"],
            json!(["Rust"])
        );
        assert_eq!(requirements["must_have_requirements"]["experience"], "5 years");
        assert_eq!(
            requirements["good_to_have_requirements"]["additional_skills"],
            json!(["Kubernetes"])
        );
        assert_eq!(requirements["additional_screening_criteria"], json!(["Remote OK"]));
    }

    #[tokio::test]
    async fn test_analyze_resumes_requires_requirements() {
        let (app, mock) = app(MockModel::new());
        let response = app
            .oneshot(multipart(&[("a.txt", "resume")], None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_resumes_rejects_missing_files() {
        let (app, _) = app(MockModel::new().reply(JD_REPLY));
        analyze_jd(&app).await;

        let response = app
            .clone()
            .oneshot(multipart(&[], Some("o4-mini")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "No files uploaded");

        let response = app.oneshot(multipart(&[("", "x")], None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "No files selected");
    }

    #[tokio::test]
    async fn test_resume_flow_ranks_and_exports() {
        let mock = MockModel::new()
            .reply(JD_REPLY)
            .reply(analysis_reply("Ana Diaz", "No"))
            .reply(r#"{"semantic_score": 41}"#)
            .reply(analysis_reply("Bo Chen", "Yes"));
        // Bo's semantic call finds the script exhausted and falls back: Yes + Medium
        let (app, mock) = app(mock);
        analyze_jd(&app).await;

        let response = app
            .clone()
            .oneshot(multipart(
                &[("ana.txt", "Ana Diaz resume"), ("bo.txt", "Bo Chen resume")],
                Some("o3"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["filename"], "bo.txt");
        assert_eq!(results[0]["semantic_score"], 75);
        assert_eq!(results[0]["semantic_source"], "fallback");
        assert_eq!(results[0]["quantitative_score"], "2/3");
        assert_eq!(results[0]["quantitative_percentage"], 67);
        assert_eq!(results[1]["filename"], "ana.txt");
        assert_eq!(results[1]["percentage"], 41);
        assert_eq!(results[1]["analysis"]["contact_info"]["email"], "N/A");
        assert!(body["failures"].as_array().unwrap().is_empty());

        {
            let calls = mock.calls.lock().unwrap();
            assert_eq!(calls[1].0, "o3");
            assert_eq!(calls[2].0, "gpt-4o-mini");
        }

        let response = app.oneshot(get("/api/export-csv")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume_analysis_results.csv\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("full_name,email,phone"));
        assert!(lines[0].ends_with("filename,quantitative_percentage,semantic_percentage,percentage"));
        assert!(lines[1].starts_with("Bo Chen,"));
        assert!(lines[1].ends_with("bo.txt,67,75,75"));
    }

    #[tokio::test]
    async fn test_new_run_replaces_previous_results() {
        // Second run finds the script exhausted, so every model call fails
        let mock = MockModel::new()
            .reply(JD_REPLY)
            .reply(analysis_reply("Ana Diaz", "Yes"))
            .reply(r#"{"semantic_score": 80}"#);
        let (app, _) = app(mock);
        analyze_jd(&app).await;

        let response = app
            .clone()
            .oneshot(multipart(&[("ana.txt", "Ana Diaz resume")], None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let response = app.clone().oneshot(get("/api/export-csv")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(multipart(&[("bo.txt", "Bo Chen resume")], None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["results"].as_array().unwrap().is_empty());
        assert_eq!(body["failures"][0]["filename"], "bo.txt");

        let response = app.oneshot(get("/api/export-csv")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "NO_RESULTS");
    }

    #[tokio::test]
    async fn test_export_without_results_is_rejected() {
        let (app, _) = app(MockModel::new());
        let response = app.oneshot(get("/api/export-csv")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "no analysis results to export");
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_requirements() {
        let (app, _) = app(MockModel::new().reply(JD_REPLY));
        let mut request = post_json(
            "/api/analyze-job-description",
            json!({"job_description": JD}),
        );
        request
            .headers_mut()
            .insert(SESSION_HEADER, HeaderValue::from_static("team-a"));
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let mut request = get("/api/current-requirements");
        request
            .headers_mut()
            .insert(SESSION_HEADER, HeaderValue::from_static("team-a"));
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get("/api/current-requirements")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
