/// Task primary keys are server-generated v4 UUIDs.
pub type TaskId = uuid::Uuid;
