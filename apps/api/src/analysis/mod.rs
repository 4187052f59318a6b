//! Analysis Service Client: improve, ATS-check and build-from-scratch.
//!
//! Every task is one model call: a fixed system instruction, a labeled prompt
//! built from the payload, and a response schema generated from the task's
//! typed result. The reply is parsed, validated against that schema, then
//! deserialized into the result. A caller gets either the full result or an
//! error.

pub mod handlers;
pub mod models;
pub mod prompts;

use std::fmt;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::schema::{self, schema_of};
use crate::llm_client::{
    strip_json_fences, Content, LlmError, ModelRequest, ModelTransport, MODEL_FLASH, MODEL_PRO,
};
use models::{AtsRequest, AtsResult, BuildRequest, BuildResult, Checked, ImproveRequest, ImproveResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisTask {
    ImproveResume,
    CheckAts,
    GenerateFromScratch,
}

impl AnalysisTask {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisTask::ImproveResume => "improve_resume",
            AnalysisTask::CheckAts => "check_ats",
            AnalysisTask::GenerateFromScratch => "generate_from_scratch",
        }
    }

    pub fn model(&self) -> &'static str {
        match self {
            AnalysisTask::ImproveResume | AnalysisTask::GenerateFromScratch => MODEL_PRO,
            AnalysisTask::CheckAts => MODEL_FLASH,
        }
    }

    pub fn system_instruction(&self) -> String {
        match self {
            AnalysisTask::ImproveResume => prompts::improve_system(),
            AnalysisTask::CheckAts => prompts::ats_system(),
            AnalysisTask::GenerateFromScratch => prompts::build_system(),
        }
    }
}

impl fmt::Display for AnalysisTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Network failure, non-success status, empty or malformed reply.
    #[error("{task}: transport failure: {source}")]
    TransportFailure {
        task: AnalysisTask,
        #[source]
        source: LlmError,
    },

    /// The reply parsed as JSON but did not satisfy the declared schema.
    #[error("{task}: reply violated response schema: {detail}")]
    SchemaViolation { task: AnalysisTask, detail: String },
}

/// Binds a request payload to its task and typed result.
pub trait TaskSpec: Sync {
    const TASK: AnalysisTask;
    type Output: DeserializeOwned + JsonSchema + Checked + Send;

    /// Payload fields concatenated in the task's fixed order.
    fn prompt(&self) -> String;
}

impl TaskSpec for ImproveRequest {
    const TASK: AnalysisTask = AnalysisTask::ImproveResume;
    type Output = ImproveResult;

    fn prompt(&self) -> String {
        prompts::improve_prompt(&self.job_description, &self.original_resume)
    }
}

impl TaskSpec for AtsRequest {
    const TASK: AnalysisTask = AnalysisTask::CheckAts;
    type Output = AtsResult;

    fn prompt(&self) -> String {
        prompts::ats_prompt(&self.resume_text)
    }
}

impl TaskSpec for BuildRequest {
    const TASK: AnalysisTask = AnalysisTask::GenerateFromScratch;
    type Output = BuildResult;

    fn prompt(&self) -> String {
        // Plain string fields only; serialization cannot fail.
        let form_json = serde_json::to_string_pretty(self).unwrap_or_default();
        prompts::build_prompt(&form_json)
    }
}

/// Stateless client: each `execute` is an independent single call.
#[derive(Clone)]
pub struct AnalysisClient {
    transport: Arc<dyn ModelTransport>,
}

impl AnalysisClient {
    pub fn new(transport: Arc<dyn ModelTransport>) -> Self {
        Self { transport }
    }

    pub fn request_for<T: TaskSpec>(payload: &T) -> ModelRequest {
        ModelRequest {
            model: T::TASK.model(),
            system_instruction: T::TASK.system_instruction(),
            contents: vec![Content::user(payload.prompt())],
            response_schema: Some(schema_of::<T::Output>()),
            temperature: None,
        }
    }

    pub async fn execute<T: TaskSpec>(&self, payload: &T) -> Result<T::Output, AnalysisError> {
        let task = T::TASK;
        let request = Self::request_for(payload);
        info!("Running {} on {}", task, request.model);

        let raw = self.transport.generate(&request).await.map_err(|source| {
            warn!("{} call failed: {}", task, source);
            AnalysisError::TransportFailure { task, source }
        })?;

        parse_reply(task, &raw, request.response_schema.as_ref()).inspect_err(|e| warn!("{e}"))
    }
}

/// Parses and validates a raw reply. Malformed JSON is a transport failure;
/// anything that parses but does not conform is a schema violation.
fn parse_reply<O>(
    task: AnalysisTask,
    raw: &str,
    response_schema: Option<&Value>,
) -> Result<O, AnalysisError>
where
    O: DeserializeOwned + Checked,
{
    let value: Value = serde_json::from_str(strip_json_fences(raw)).map_err(|e| {
        AnalysisError::TransportFailure {
            task,
            source: LlmError::Parse(e),
        }
    })?;

    let violation = |detail: String| AnalysisError::SchemaViolation { task, detail };

    if let Some(response_schema) = response_schema {
        schema::validate(response_schema, &value).map_err(|e| violation(e.to_string()))?;
    }
    let output: O = serde_json::from_value(value).map_err(|e| violation(e.to_string()))?;
    output.check().map_err(violation)?;

    Ok(output)
}
