//! Request and response shapes of the grading portal.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Value of `status` the portal uses for a successful call.
pub const STATUS_SUCCESS: &str = "success";

/// Body of the login request.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    #[serde(rename = "screenId")]
    pub screen_id: &'a str,
    pub password: &'a str,
}

/// `{status, message, ...}` wrapper shared by every portal response.
///
/// The endpoint-specific fields are flattened into `body`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCESS)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub token: Option<String>,
}

/// The portal's own list action answers with `data`; the screen API uses `homeworks`.
///
/// Rows stay untyped until [`HomeworkListBody::into_homeworks`], so an odd
/// column in one row never rejects the whole list.
#[derive(Debug, Default, Deserialize)]
pub struct HomeworkListBody {
    #[serde(default)]
    pub homeworks: Option<Vec<Value>>,
    #[serde(default)]
    pub data: Option<Vec<Value>>,
}

impl HomeworkListBody {
    /// Rows without a usable id are dropped.
    pub fn into_homeworks(self) -> Vec<HomeworkSummary> {
        self.homeworks
            .or(self.data)
            .unwrap_or_default()
            .iter()
            .filter_map(HomeworkSummary::from_row)
            .collect()
    }
}

/// The submit endpoint only carries `status` and `message`.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitBody {}

/// Minimal `{id, name}` record used to pick a homework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeworkSummary {
    pub id: String,
    pub name: String,
}

impl HomeworkSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Read one list row. `id` wins over `Id` and `name` over `title`; a row
    /// without a name is labelled `ID: <id>`.
    pub fn from_row(row: &Value) -> Option<Self> {
        let row = row.as_object()?;
        let id = ["id", "Id"].iter().find_map(|key| scalar_text(row.get(*key)?))?;
        let name = ["name", "title"]
            .iter()
            .find_map(|key| row.get(*key)?.as_str().filter(|n| !n.is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| format!("ID: {}", id));
        Some(Self { id, name })
    }
}

/// Strings as is, numbers and booleans in their JSON spelling. Null, empty
/// strings, arrays and objects are not ids.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(_) | Value::Bool(_) => Some(value.to_string()),
        _ => None,
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Session token, from the body or the portal's session cookie.
    pub token: Option<String>,
}

/// A submission, built at submit time and dropped once answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub student_id: String,
    pub homework_id: String,
    pub screen_id: String,
    pub file: PathBuf,
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub message: Option<String>,
    pub submitted_at: chrono::DateTime<chrono::Local>,
}
