//! Task entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tasker_core::task::TaskStatus;
use tasker_core::types::TaskId;
use validator::Validate;

/// A row from the `tasks` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    /// Stored as text; anything outside [`TaskStatus`] fails to decode.
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
}

/// DTO for creating a new task. The id and status are assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub description: String,
}

/// DTO for a partial update. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct UpdateTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl UpdateTask {
    /// `true` when no field would be changed.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_with_only_status_leaves_other_fields_unset() {
        let update: UpdateTask = serde_json::from_str(r#"{"status":"in_progress"}"#).unwrap();
        assert_eq!(update.title, None);
        assert_eq!(update.description, None);
        assert_eq!(update.status, Some(TaskStatus::InProgress));
        assert!(!update.is_empty());
    }

    #[test]
    fn explicit_null_means_unchanged() {
        let update: UpdateTask =
            serde_json::from_str(r#"{"title":null,"description":null}"#).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn empty_object_is_an_empty_update() {
        let update: UpdateTask = serde_json::from_str("{}").unwrap();
        assert_eq!(update, UpdateTask::default());
        assert!(update.is_empty());
    }

    #[test]
    fn unknown_status_is_rejected_at_decode() {
        let result = serde_json::from_str::<UpdateTask>(r#"{"status":"archived"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn create_requires_title_and_description() {
        assert!(serde_json::from_str::<CreateTask>(r#"{"title":"T"}"#).is_err());
        assert!(serde_json::from_str::<CreateTask>(r#"{"description":"D"}"#).is_err());

        let input: CreateTask =
            serde_json::from_str(r#"{"title":"T","description":""}"#).unwrap();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn empty_title_fails_validation() {
        let input = CreateTask {
            title: String::new(),
            description: "D".to_string(),
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));

        let update = UpdateTask {
            title: Some(String::new()),
            ..UpdateTask::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn task_serializes_status_as_snake_case() {
        let task = Task {
            id: TaskId::nil(),
            title: "T".to_string(),
            description: "D".to_string(),
            status: TaskStatus::InProgress,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
    }
}
