//! Pure translation of raw filter/sort query parameters into structured
//! store queries. No I/O, no failure modes: absent and empty parameters are
//! ignored, unrecognized sort values fall back to the default.

use taskpile_shared::{TaskListParams, UserListParams};
use uuid::Uuid;

/// Structured task filter. All present clauses AND-combine. Status and
/// priority stay raw strings so an unrecognized value matches nothing
/// instead of erroring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Implicit scope from the authenticated surface; never derived from
    /// query parameters.
    pub owner: Option<Uuid>,
    /// Case-insensitive substring over title OR description.
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    /// `created_at` descending.
    #[default]
    NewestFirst,
    /// `created_at` ascending.
    OldestFirst,
    /// `due_date` ascending.
    DueDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Case-insensitive substring over username OR email.
    pub search: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSort {
    #[default]
    NewestFirst,
    OldestFirst,
    Username,
    Email,
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Build the structured query for task listing. `owner`, when given, is
/// AND-combined with everything else.
pub fn build_task_query(params: &TaskListParams, owner: Option<Uuid>) -> (TaskFilter, TaskSort) {
    let filter = TaskFilter {
        owner,
        search: present(&params.search),
        status: present(&params.status),
        priority: present(&params.priority),
    };
    let sort = match params.sort.as_deref() {
        Some("oldest") => TaskSort::OldestFirst,
        Some("dueDate") => TaskSort::DueDate,
        _ => TaskSort::NewestFirst,
    };
    (filter, sort)
}

/// Build the structured query for the account listing.
pub fn build_user_query(params: &UserListParams) -> (UserFilter, UserSort) {
    let filter = UserFilter {
        search: present(&params.search),
        email: present(&params.email),
        username: present(&params.username),
    };
    let sort = match params.sort.as_deref() {
        Some("oldest") => UserSort::OldestFirst,
        Some("username") => UserSort::Username,
        Some("email") => UserSort::Email,
        _ => UserSort::NewestFirst,
    };
    (filter, sort)
}
