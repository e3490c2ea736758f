//! Request-side wire types shared by the JSON API and the page handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::model::{TaskPriority, TaskStatus};

/// Body of `POST /api/tasks`. Required fields are modeled as `Option` so the
/// handler can answer with the contract's per-field 400 messages instead of a
/// deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub user_id: Option<Uuid>,
}

/// Body of `PUT /api/tasks/{id}`: an explicit patch where every field is
/// optional and only supplied fields are applied.
///
/// `due_date` is doubly optional so a body that omits the key leaves the
/// deadline alone while an explicit `"dueDate": null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateTaskRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Raw task-listing query parameters, exactly as they arrive on the wire.
/// Normalization into a structured filter happens in the server's query
/// builder; absent and empty values are equivalent there.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub sort: Option<String>,
}

/// Raw account-listing query parameters for `GET /api/users`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserListParams {
    pub search: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub sort: Option<String>,
}
