use serde::{Deserialize, Serialize};

use crate::model::common::required_text;
use crate::model::{generate_id, Id, ValidationError, Validator};

pub const TASK_DESCRIPTION_MAX_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Id,
    pub description: String,
    pub completed: bool,
}

/// Body of `POST /api/v1/tasks`.
///
/// Every field is optional at the serde level so that a missing
/// description is reported as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTask {
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl NewTask {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            completed: None,
        }
    }

    /// Validate the payload and turn it into a task with a fresh id
    pub fn into_task(self) -> Result<Task, ValidationError> {
        let mut validator = Validator::new();
        let description = validator.check(
            "description",
            required_text(
                self.description.as_deref(),
                "description",
                TASK_DESCRIPTION_MAX_LEN,
            ),
        );
        validator.finish()?;

        Ok(Task {
            id: generate_id(),
            description: description.unwrap_or_default(),
            completed: self.completed.unwrap_or(false),
        })
    }
}

/// Partial update: only the fields that are present are changed
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TaskPatch {
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Re-validate the fields being changed, normalizing them the same way creation does
    pub fn validate(self) -> Result<Self, ValidationError> {
        let mut validator = Validator::new();
        let description = match self.description {
            Some(description) => validator.check(
                "description",
                required_text(Some(&description), "description", TASK_DESCRIPTION_MAX_LEN),
            ),
            None => None,
        };
        validator.finish()?;

        Ok(Self {
            description,
            completed: self.completed,
        })
    }

    pub fn apply_to(&self, task: &Task) -> Task {
        Task {
            id: task.id.clone(),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| task.description.clone()),
            completed: self.completed.unwrap_or(task.completed),
        }
    }
}

/// Query string of `GET /api/v1/tasks`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TaskFilter {
    pub completed: Option<bool>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.completed.map_or(true, |completed| task.completed == completed)
    }
}
