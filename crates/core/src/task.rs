//! Task status vocabulary and listing rules.
//!
//! The status strings are what the `tasks.status` column stores and what the
//! API exchanges, so they must stay in sync with serde's `snake_case` form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Status assigned to every newly created task.
pub const STATUS_CREATED: &str = "created";

/// Work on the task has started.
pub const STATUS_IN_PROGRESS: &str = "in_progress";

/// The task is finished.
pub const STATUS_DONE: &str = "done";

/// All accepted status strings, in lifecycle order.
pub const VALID_STATUSES: &[&str] = &[STATUS_CREATED, STATUS_IN_PROGRESS, STATUS_DONE];

/// Maximum number of tasks returned by a single list query. There is no offset.
pub const LIST_LIMIT: i64 = 20;

/// A string that does not name a [`TaskStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid task status '{value}'. Must be one of: {}", VALID_STATUSES.join(", "))]
pub struct InvalidTaskStatus {
    pub value: String,
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Created,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, InvalidTaskStatus> {
        match s {
            STATUS_CREATED => Ok(Self::Created),
            STATUS_IN_PROGRESS => Ok(Self::InProgress),
            STATUS_DONE => Ok(Self::Done),
            _ => Err(InvalidTaskStatus {
                value: s.to_string(),
            }),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => STATUS_CREATED,
            Self::InProgress => STATUS_IN_PROGRESS,
            Self::Done => STATUS_DONE,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = InvalidTaskStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_value(s)
    }
}

/// Used when decoding the `status` column.
impl TryFrom<String> for TaskStatus {
    type Error = InvalidTaskStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str_value(&value)
    }
}
