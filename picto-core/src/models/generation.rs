//! AI icon generation types.
//!
//! Generation is asynchronous upstream: a write request returns a task id,
//! and the task advances through [`TaskStatus`] until it is terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::CoreError;

// ============================================================================
// Options
// ============================================================================

/// Visual style for generated icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiStyle {
    /// Filled glyphs.
    #[default]
    Solid,
    /// Line art.
    Outline,
    /// Full color.
    Color,
    /// Flat color.
    Flat,
    /// Sticker look.
    Sticker,
}

impl AiStyle {
    /// Returns the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Outline => "outline",
            Self::Color => "color",
            Self::Flat => "flat",
            Self::Sticker => "sticker",
        }
    }

    /// All styles.
    pub fn all() -> &'static [AiStyle] {
        &[
            Self::Solid,
            Self::Outline,
            Self::Color,
            Self::Flat,
            Self::Sticker,
        ]
    }
}

impl fmt::Display for AiStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|style| style.as_str() == lower)
            .ok_or_else(|| {
                CoreError::InvalidParameter(format!(
                    "unknown style '{s}' (expected solid, outline, color, flat or sticker)"
                ))
            })
    }
}

/// Output format for generated icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiFormat {
    /// Raster PNG.
    #[default]
    Png,
    /// Vector SVG.
    Svg,
}

impl AiFormat {
    /// Returns the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

impl fmt::Display for AiFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            _ => Err(CoreError::InvalidParameter(format!(
                "unknown generation format '{s}' (expected png or svg)"
            ))),
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Body of a full generation request.
///
/// Only fields the caller set are serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GenerationRequest {
    /// Free-text prompt. Required and non-empty.
    pub prompt: String,
    /// Visual style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<AiStyle>,
    /// Output format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<AiFormat>,
    /// Diffusion steps, passed through unvalidated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_inference_steps: Option<u32>,
    /// Guidance scale, passed through unvalidated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance_scale: Option<f64>,
}

impl GenerationRequest {
    /// Creates a request for a prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Sets the style.
    #[must_use]
    pub fn style(mut self, style: AiStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn format(mut self, format: AiFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the number of inference steps.
    #[must_use]
    pub fn num_inference_steps(mut self, steps: u32) -> Self {
        self.num_inference_steps = Some(steps);
        self
    }

    /// Sets the guidance scale.
    #[must_use]
    pub fn guidance_scale(mut self, scale: f64) -> Self {
        self.guidance_scale = Some(scale);
        self
    }

    /// Checks that the prompt is non-empty.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_prompt(&self.prompt)
    }
}

/// Body of a preview request: the cheaper variant without tuning parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PreviewRequest {
    /// Free-text prompt. Required and non-empty.
    pub prompt: String,
    /// Visual style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<AiStyle>,
    /// Output format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<AiFormat>,
}

impl PreviewRequest {
    /// Creates a preview request for a prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Sets the style.
    #[must_use]
    pub fn style(mut self, style: AiStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn format(mut self, format: AiFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Checks that the prompt is non-empty.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_prompt(&self.prompt)
    }
}

impl From<&GenerationRequest> for PreviewRequest {
    fn from(request: &GenerationRequest) -> Self {
        Self {
            prompt: request.prompt.clone(),
            style: request.style,
            format: request.format,
        }
    }
}

fn validate_prompt(prompt: &str) -> Result<(), CoreError> {
    if prompt.trim().is_empty() {
        return Err(CoreError::InvalidParameter(
            "prompt must not be empty".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// Task Status
// ============================================================================

/// State of a generation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Accepted, not started.
    #[default]
    Pending,
    /// Running.
    Processing,
    /// Finished with a result.
    Completed,
    /// Finished without a result.
    Failed,
}

impl TaskStatus {
    /// Maps an upstream status string, case-insensitively.
    ///
    /// Unrecognized values are treated as still running.
    pub fn from_wire(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            "pending" | "created" => Self::Pending,
            _ => Self::Processing,
        }
    }

    /// Returns true for `Completed` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns the lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&value))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Generation Task
// ============================================================================

/// A generation task as last reported upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationTask {
    /// Upstream task identifier.
    pub task_id: String,
    /// Current status.
    pub status: TaskStatus,
    /// Direct result URL, when completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Candidate result URLs, when completed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generated: Vec<String>,
    /// Failure description, when failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationTask {
    /// Creates a task in the given state with no results.
    pub fn new(task_id: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            task_id: task_id.into(),
            status,
            icon_url: None,
            generated: Vec::new(),
            error: None,
        }
    }

    /// Decodes an upstream task response.
    ///
    /// Fields may sit at the top level or inside a `data` envelope; top-level
    /// values win. A missing status means the task was just created. Returns
    /// `None` when no task id is present anywhere.
    pub fn from_response(body: &Value) -> Option<Self> {
        let fields = TaskFields::merged(body);
        let task_id = fields.task_id.clone()?;
        Some(fields.into_task(task_id))
    }

    /// Decodes a status response for a known task.
    ///
    /// Status responses need not echo the id; `task_id` fills it in.
    pub fn from_status_response(task_id: &str, body: &Value) -> Self {
        let fields = TaskFields::merged(body);
        let id = fields.task_id.clone().unwrap_or_else(|| task_id.to_string());
        fields.into_task(id)
    }

    /// Returns the result extraction for this task.
    pub fn outcome(&self) -> GenerationOutcome {
        GenerationOutcome::from_task(self)
    }
}

#[derive(Debug, Default)]
struct TaskFields {
    task_id: Option<String>,
    status: Option<TaskStatus>,
    icon_url: Option<String>,
    generated: Vec<String>,
    error: Option<String>,
}

impl TaskFields {
    /// Reads each field independently; a malformed field is skipped on its own.
    fn from_value(value: &Value) -> Self {
        Self {
            task_id: value.get("task_id").and_then(scalar_text),
            status: value
                .get("status")
                .and_then(Value::as_str)
                .map(TaskStatus::from_wire),
            icon_url: value
                .get("icon_url")
                .and_then(Value::as_str)
                .map(str::to_string),
            generated: value
                .get("generated")
                .and_then(Value::as_array)
                .map(|urls| {
                    urls.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            error: value.get("error").and_then(error_text),
        }
    }

    /// Top-level fields win over the `data` envelope.
    fn merged(body: &Value) -> Self {
        let top = Self::from_value(body);
        let nested = body
            .get("data")
            .filter(|data| data.is_object())
            .map(Self::from_value)
            .unwrap_or_default();

        Self {
            task_id: top.task_id.or(nested.task_id),
            status: top.status.or(nested.status),
            icon_url: top.icon_url.or(nested.icon_url),
            generated: if top.generated.is_empty() {
                nested.generated
            } else {
                top.generated
            },
            error: top.error.or(nested.error),
        }
    }

    fn into_task(self, task_id: String) -> GenerationTask {
        GenerationTask {
            task_id,
            status: self.status.unwrap_or_default(),
            icon_url: self.icon_url,
            generated: self.generated,
            error: self.error,
        }
    }
}

/// A string or number id as text.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// An error given as a string, as `{ "message": .. }`, or as any other JSON.
fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(
            other
                .get("message")
                .and_then(Value::as_str)
                .map_or_else(|| other.to_string(), str::to_string),
        ),
    }
}

// ============================================================================
// Generation Outcome
// ============================================================================

/// Where a completed task's result URL comes from.
///
/// Precedence: the direct `icon_url`, then the first entry of `generated`,
/// otherwise nothing. Empty strings do not count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GenerationOutcome {
    /// The task's primary result field.
    DirectUrl(String),
    /// The alternate multi-candidate list; the first entry is used.
    CandidateList(Vec<String>),
    /// No usable result.
    Empty,
}

impl GenerationOutcome {
    /// Applies the extraction policy to a task.
    pub fn from_task(task: &GenerationTask) -> Self {
        if let Some(url) = task.icon_url.as_deref().filter(|u| !u.is_empty()) {
            return Self::DirectUrl(url.to_string());
        }
        if task.generated.first().is_some_and(|u| !u.is_empty()) {
            return Self::CandidateList(task.generated.clone());
        }
        Self::Empty
    }

    /// Returns the chosen URL.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::DirectUrl(url) => Some(url),
            Self::CandidateList(urls) => urls.first().map(String::as_str),
            Self::Empty => None,
        }
    }
}

/// A completed generation with its resolved URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedIcon {
    /// Upstream task identifier.
    pub task_id: String,
    /// Resolved result URL.
    pub url: String,
    /// How the URL was chosen.
    pub outcome: GenerationOutcome,
}

// ============================================================================
// Tests
// ============================================================================
