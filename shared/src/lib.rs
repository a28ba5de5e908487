use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

mod validation;

pub use validation::{ValidationError, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(ValidationError::InvalidPriority(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub completed: bool,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/todos`.
///
/// Fields stay raw strings so that a missing title or an unknown priority is
/// reported as a validation failure rather than a JSON decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

/// Body of `PUT /api/todos/:id`.
///
/// `None` means "leave the stored value alone"; `Some(false)` and `Some("")`
/// are real values and are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Seconds since the server started.
    pub uptime: f64,
}

impl Todo {
    /// Builds a fresh record from a create request: trims text fields, applies
    /// the defaults (`completed = false`, `priority = medium`) and validates.
    pub fn new(request: CreateTodoRequest, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let priority = match request.priority.as_deref() {
            None | Some("") => Priority::default(),
            Some(raw) => raw.parse()?,
        };
        let todo = Self {
            id: Uuid::new_v4(),
            title: validation::normalize(request.title.as_deref().unwrap_or_default()),
            description: validation::normalize(request.description.as_deref().unwrap_or_default()),
            completed: false,
            priority,
            created_at: now,
            updated_at: now,
        };
        todo.validate()?;
        Ok(todo)
    }

    /// Returns the record with the fields present in `patch` replaced.
    ///
    /// `id` and `created_at` never change; `updated_at` becomes `now`.
    pub fn apply(&self, patch: &UpdateTodoRequest, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let mut next = self.clone();
        if let Some(title) = &patch.title {
            next.title = validation::normalize(title);
        }
        if let Some(description) = &patch.description {
            next.description = validation::normalize(description);
        }
        if let Some(completed) = patch.completed {
            next.completed = completed;
        }
        if let Some(priority) = &patch.priority {
            next.priority = priority.parse()?;
        }
        next.updated_at = now;
        next.validate()?;
        Ok(next)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::check_title(&self.title)?;
        validation::check_description(&self.description)
    }
}
