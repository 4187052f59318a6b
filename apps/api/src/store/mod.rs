//! Result Store: persisted resume artifacts.
//!
//! An artifact is written once after a successful improve or build and is
//! never updated or deleted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use uuid::Uuid;

use crate::analysis::models::{BuildResult, ImproveRequest, ImproveResult};

const BUILT_ORIGINAL_TEXT: &str = "Generated from scratch";
const BUILT_JOB_DESCRIPTION: &str = "Self-built Resume";
const BUILT_COVER_LETTER: &str = "Built from scratch using ProBuilder";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeArtifact {
    pub id: Uuid,
    pub user_id: Uuid,
    pub original_text: String,
    pub improved_content: String,
    pub job_description: String,
    pub cover_letter_snippet: String,
    pub created_at: DateTime<Utc>,
}

/// An artifact before the store assigns its id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArtifact {
    pub user_id: Uuid,
    pub original_text: String,
    pub improved_content: String,
    pub job_description: String,
    pub cover_letter_snippet: String,
}

impl NewArtifact {
    pub fn from_improve(user_id: Uuid, request: &ImproveRequest, result: &ImproveResult) -> Self {
        Self {
            user_id,
            original_text: request.original_resume.clone(),
            improved_content: result.improved_resume.clone(),
            job_description: request.job_description.clone(),
            cover_letter_snippet: result.cover_letter.clone(),
        }
    }

    pub fn from_build(user_id: Uuid, result: &BuildResult) -> Self {
        Self {
            user_id,
            original_text: BUILT_ORIGINAL_TEXT.to_string(),
            improved_content: result.resume.clone(),
            job_description: BUILT_JOB_DESCRIPTION.to_string(),
            cover_letter_snippet: BUILT_COVER_LETTER.to_string(),
        }
    }
}

/// Carried in `AppState` as `Arc<dyn ResultStore>`.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn save(&self, artifact: NewArtifact) -> Result<ResumeArtifact, StoreError>;

    /// All of a user's artifacts, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<ResumeArtifact>, StoreError>;
}

pub struct PgResultStore {
    pool: PgPool,
}

impl PgResultStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultStore for PgResultStore {
    async fn save(&self, artifact: NewArtifact) -> Result<ResumeArtifact, StoreError> {
        // Append-only: INSERT, never UPDATE
        let row = sqlx::query_as::<_, ResumeArtifact>(
            r#"
            INSERT INTO resume_artifacts
                (id, user_id, original_text, improved_content, job_description, cover_letter_snippet)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(artifact.user_id)
        .bind(&artifact.original_text)
        .bind(&artifact.improved_content)
        .bind(&artifact.job_description)
        .bind(&artifact.cover_letter_snippet)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<ResumeArtifact>, StoreError> {
        let rows = sqlx::query_as::<_, ResumeArtifact>(
            "SELECT * FROM resume_artifacts WHERE user_id = $1 ORDER BY created_at DESC, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_improve_artifact_copies_inputs_and_outputs() {
        let user_id = Uuid::new_v4();
        let artifact = NewArtifact::from_improve(
            user_id,
            &ImproveRequest {
                original_resume: "old".to_string(),
                job_description: "jd".to_string(),
            },
            &ImproveResult {
                improved_resume: "new".to_string(),
                cover_letter: "letter".to_string(),
            },
        );
        assert_eq!(
            artifact,
            NewArtifact {
                user_id,
                original_text: "old".to_string(),
                improved_content: "new".to_string(),
                job_description: "jd".to_string(),
                cover_letter_snippet: "letter".to_string(),
            }
        );
    }

    #[test]
    fn test_build_artifact_uses_fixed_labels() {
        let artifact = NewArtifact::from_build(
            Uuid::nil(),
            &BuildResult {
                resume: "# Jordan".to_string(),
            },
        );
        assert_eq!(artifact.original_text, "Generated from scratch");
        assert_eq!(artifact.job_description, "Self-built Resume");
        assert_eq!(artifact.cover_letter_snippet, "Built from scratch using ProBuilder");
        assert_eq!(artifact.improved_content, "# Jordan");
    }

    #[test]
    fn test_artifact_wire_names() {
        let artifact = ResumeArtifact {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            original_text: "a".to_string(),
            improved_content: "b".to_string(),
            job_description: "c".to_string(),
            cover_letter_snippet: "d".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&artifact).unwrap();
        assert!(json.get("coverLetterSnippet").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("userId").is_some());
    }

    #[tokio::test]
    async fn test_memory_store_lists_newest_first_per_user() {
        let store = testing::MemoryResultStore::default();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let built = |user| {
            NewArtifact::from_build(
                user,
                &BuildResult {
                    resume: format!("# {user}"),
                },
            )
        };

        let first = store.save(built(alice)).await.unwrap();
        store.save(built(bob)).await.unwrap();
        let second = store.save(built(alice)).await.unwrap();

        let listed = store.list_by_user(alice).await.unwrap();
        assert_eq!(listed, vec![second, first]);
    }
}
