//! JSON response envelopes. Every API response carries a `success` flag; the
//! rest of the shape depends on the endpoint.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Task, User};

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Task>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    pub success: bool,
    pub data: Task,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<User>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcrastinateResponse {
    pub success: bool,
    pub message: String,
    pub updated_count: usize,
    pub task_ids: Vec<Uuid>,
}
