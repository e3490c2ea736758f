pub mod api;
pub mod model;
pub mod requests;

pub use api::{
    ErrorResponse, MessageResponse, ProcrastinateResponse, TaskListResponse, TaskResponse,
    UserListResponse,
};
pub use model::{Task, TaskPriority, TaskStatus, User};
pub use requests::{CreateTaskRequest, TaskListParams, UpdateTaskRequest, UserListParams};
