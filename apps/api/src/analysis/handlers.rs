//! Axum route handlers for the analysis tasks and the resume archive.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::analysis::models::{AtsRequest, AtsResult, BuildRequest, ImproveRequest, ImproveResult};
use crate::errors::AppError;
use crate::state::AppState;
use crate::store::{NewArtifact, ResultStore, ResumeArtifact};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveBody {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub request: ImproveRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveResponse {
    /// `None` when the result could not be archived.
    pub artifact_id: Option<Uuid>,
    #[serde(flatten)]
    pub result: ImproveResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildBody {
    pub user_id: Uuid,
    pub data: BuildRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResponse {
    pub artifact_id: Option<Uuid>,
    pub resume: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct TemplateQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

fn require_non_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Archives a successful result. A store failure never discards the result.
async fn archive(store: &dyn ResultStore, artifact: NewArtifact) -> Option<Uuid> {
    match store.save(artifact).await {
        Ok(saved) => Some(saved.id),
        Err(e) => {
            error!("Failed to archive resume artifact: {e}");
            None
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/improve
pub async fn handle_improve(
    State(state): State<AppState>,
    Json(body): Json<ImproveBody>,
) -> Result<Json<ImproveResponse>, AppError> {
    require_non_blank("originalResume", &body.request.original_resume)?;
    require_non_blank("jobDescription", &body.request.job_description)?;

    let result = state.analysis.execute(&body.request).await?;
    info!("Improved resume for user {}", body.user_id);

    let artifact = NewArtifact::from_improve(body.user_id, &body.request, &result);
    let artifact_id = archive(state.store.as_ref(), artifact).await;

    Ok(Json(ImproveResponse {
        artifact_id,
        result,
    }))
}

/// POST /api/v1/resumes/build
pub async fn handle_build(
    State(state): State<AppState>,
    Json(body): Json<BuildBody>,
) -> Result<Json<BuildResponse>, AppError> {
    let result = state.analysis.execute(&body.data).await?;
    info!("Generated resume from scratch for user {}", body.user_id);

    let artifact = NewArtifact::from_build(body.user_id, &result);
    let artifact_id = archive(state.store.as_ref(), artifact).await;

    Ok(Json(BuildResponse {
        artifact_id,
        resume: result.resume,
    }))
}

/// GET /api/v1/resumes?userId=
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ResumeArtifact>>, AppError> {
    let artifacts = state.store.list_by_user(params.user_id).await?;
    Ok(Json(artifacts))
}

/// POST /api/v1/ats/check
pub async fn handle_ats_check(
    State(state): State<AppState>,
    Json(request): Json<AtsRequest>,
) -> Result<Json<AtsResult>, AppError> {
    require_non_blank("resumeText", &request.resume_text)?;
    let result = state.analysis.execute(&request).await?;
    Ok(Json(result))
}

/// GET /api/v1/builder/template?name=&email=
pub async fn handle_builder_template(Query(params): Query<TemplateQuery>) -> Json<BuildRequest> {
    Json(BuildRequest::seeded(&params.name, &params.email))
}

/// GET /api/v1/builder/demo
pub async fn handle_builder_demo() -> Json<BuildRequest> {
    Json(BuildRequest::demo())
}
