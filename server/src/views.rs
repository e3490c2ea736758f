//! Server-rendered pages. Plain HTML strings with manual escaping; the page
//! surface only needs forms, a task table, and flash/error lines.

use taskpile_shared::{Task, TaskListParams};
use uuid::Uuid;

/// String form values used to (re-)fill the task forms. Mirrors the form
/// field names, not the domain types, so a failed submission renders back
/// exactly what the user typed.
#[derive(Debug, Clone)]
pub struct FormValues {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub due_date: String,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: "pending".to_string(),
            priority: "medium".to_string(),
            due_date: String::new(),
        }
    }
}

impl From<&Task> for FormValues {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.as_str().to_string(),
            priority: task.priority.as_str().to_string(),
            due_date: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

fn esc(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - taskpile</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        esc(title),
        body
    )
}

fn flash(error: Option<&str>) -> String {
    match error {
        Some(message) => format!("<p class=\"error\">{}</p>", esc(message)),
        None => String::new(),
    }
}

fn selected(current: &str, value: &str) -> &'static str {
    if current == value {
        " selected"
    } else {
        ""
    }
}

fn status_select(name: &str, current: &str) -> String {
    format!(
        "<select name=\"{name}\">\
         <option value=\"pending\"{}>Pending</option>\
         <option value=\"in-progress\"{}>In progress</option>\
         <option value=\"completed\"{}>Completed</option>\
         </select>",
        selected(current, "pending"),
        selected(current, "in-progress"),
        selected(current, "completed"),
    )
}

fn priority_select(name: &str, current: &str) -> String {
    format!(
        "<select name=\"{name}\">\
         <option value=\"low\"{}>Low</option>\
         <option value=\"medium\"{}>Medium</option>\
         <option value=\"high\"{}>High</option>\
         </select>",
        selected(current, "low"),
        selected(current, "medium"),
        selected(current, "high"),
    )
}

pub fn login(error: Option<&str>, email: &str) -> String {
    let body = format!(
        "<h1>Login</h1>{}\
         <form method=\"post\" action=\"/login\">\
         <label>Email <input type=\"email\" name=\"email\" value=\"{}\" required></label>\
         <label>Password <input type=\"password\" name=\"password\" required></label>\
         <button type=\"submit\">Login</button>\
         </form>\
         <p><a href=\"/register\">Need an account? Register</a></p>",
        flash(error),
        esc(email),
    );
    layout("Login", &body)
}

pub fn register(error: Option<&str>, username: &str, email: &str) -> String {
    let body = format!(
        "<h1>Register</h1>{}\
         <form method=\"post\" action=\"/register\">\
         <label>Username <input name=\"username\" value=\"{}\" required></label>\
         <label>Email <input type=\"email\" name=\"email\" value=\"{}\" required></label>\
         <label>Password <input type=\"password\" name=\"password\" required></label>\
         <label>Confirm password <input type=\"password\" name=\"confirmPassword\" required></label>\
         <button type=\"submit\">Register</button>\
         </form>\
         <p><a href=\"/login\">Already registered? Login</a></p>",
        flash(error),
        esc(username),
        esc(email),
    );
    layout("Register", &body)
}

pub fn logged_out() -> String {
    let body = "<h1>Logged out</h1>\
                <p>You have been logged out. <a href=\"/login\">Log in again</a></p>";
    layout("Logged Out", body)
}

fn task_row(task: &Task) -> String {
    let due = task
        .due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "<tr><td><a href=\"/tasks/{id}\">{title}</a></td>\
         <td>{status}</td><td>{priority}</td><td>{due}</td>\
         <td><a href=\"/tasks/{id}/edit\">Edit</a>\
         <form method=\"post\" action=\"/tasks/{id}/delete\" style=\"display:inline\">\
         <button type=\"submit\">Delete</button></form></td></tr>",
        id = task.id,
        title = esc(&task.title),
        status = task.status.as_str(),
        priority = task.priority.as_str(),
        due = due,
    )
}

pub fn dashboard(tasks: &[Task], filters: &TaskListParams, success: Option<&str>) -> String {
    let success_line = match success {
        Some(message) => format!("<p class=\"success\">{}</p>", esc(message)),
        None => String::new(),
    };
    let rows: String = tasks.iter().map(task_row).collect();
    let table = if tasks.is_empty() {
        "<p>No tasks yet.</p>".to_string()
    } else {
        format!(
            "<table><tr><th>Title</th><th>Status</th><th>Priority</th>\
             <th>Due</th><th></th></tr>{rows}</table>"
        )
    };
    let sort = filters.sort.as_deref().unwrap_or("");
    let body = format!(
        "<h1>Dashboard</h1>{success_line}\
         <p><a href=\"/tasks/new\">New task</a> | <a href=\"/logout\">Logout</a></p>\
         <form method=\"get\" action=\"/tasks\">\
         <input name=\"search\" placeholder=\"Search\" value=\"{search}\">\
         {status}{priority}\
         <select name=\"sort\">\
         <option value=\"\">Newest first</option>\
         <option value=\"oldest\"{oldest}>Oldest first</option>\
         <option value=\"dueDate\"{due}>Due date</option>\
         </select>\
         <button type=\"submit\">Filter</button>\
         </form>\
         <form method=\"post\" action=\"/tasks/procrastinate\">\
         <button type=\"submit\">Procrastinate: postpone everything a day</button>\
         </form>\
         {table}",
        search = esc(filters.search.as_deref().unwrap_or("")),
        status = status_select("status", filters.status.as_deref().unwrap_or("")),
        priority = priority_select("priority", filters.priority.as_deref().unwrap_or("")),
        oldest = selected(sort, "oldest"),
        due = selected(sort, "dueDate"),
    );
    layout("Dashboard", &body)
}

fn task_form(action: &str, values: &FormValues, submit: &str) -> String {
    format!(
        "<form method=\"post\" action=\"{action}\">\
         <label>Title <input name=\"title\" value=\"{title}\" required></label>\
         <label>Description <textarea name=\"description\">{description}</textarea></label>\
         <label>Status {status}</label>\
         <label>Priority {priority}</label>\
         <label>Due date <input type=\"date\" name=\"dueDate\" value=\"{due}\"></label>\
         <button type=\"submit\">{submit}</button>\
         </form>",
        title = esc(&values.title),
        description = esc(&values.description),
        status = status_select("status", &values.status),
        priority = priority_select("priority", &values.priority),
        due = esc(&values.due_date),
    )
}

pub fn task_new(error: Option<&str>, values: &FormValues) -> String {
    let body = format!(
        "<h1>New Task</h1>{}{}<p><a href=\"/tasks\">Back</a></p>",
        flash(error),
        task_form("/tasks", values, "Create"),
    );
    layout("New Task", &body)
}

pub fn task_edit(id: Uuid, error: Option<&str>, values: &FormValues) -> String {
    let body = format!(
        "<h1>Edit Task</h1>{}{}<p><a href=\"/tasks\">Back</a></p>",
        flash(error),
        task_form(&format!("/tasks/{id}"), values, "Save"),
    );
    layout("Edit Task", &body)
}

pub fn task_view(task: &Task) -> String {
    let due = task
        .due_date
        .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "No deadline".to_string());
    let body = format!(
        "<h1>{title}</h1>\
         <p>{description}</p>\
         <ul><li>Status: {status}</li><li>Priority: {priority}</li>\
         <li>Due: {due}</li><li>Created: {created}</li></ul>\
         <p><a href=\"/tasks/{id}/edit\">Edit</a> | <a href=\"/tasks\">Back</a></p>",
        title = esc(&task.title),
        description = esc(&task.description),
        status = task.status.as_str(),
        priority = task.priority.as_str(),
        due = due,
        created = task.created_at.format("%Y-%m-%d %H:%M UTC"),
        id = task.id,
    );
    layout("View Task", &body)
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        "<h1>Error</h1><p>{}</p><p><a href=\"/tasks\">Back to tasks</a></p>",
        esc(message)
    );
    layout("Error", &body)
}

pub fn not_found() -> String {
    let body = "<h1>404 - Page Not Found</h1><p><a href=\"/\">Home</a></p>";
    layout("404 - Page Not Found", body)
}
