//! Session-gated page handlers. Store failures are caught here and turned
//! into a re-rendered form or the error page; nothing propagates unhandled.

use actix_session::Session;
use actix_web::http::header::ContentType;
use actix_web::{get, post, web, HttpResponse};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use taskpile_shared::{
    ErrorResponse, ProcrastinateResponse, TaskListParams, TaskPriority, TaskStatus,
    UpdateTaskRequest,
};
use uuid::Uuid;

use crate::db::Db;
use crate::routes::{html, redirect};
use crate::store::NewTask;
use crate::views::FormValues;
use crate::{auth, procrastinate as postpone, query, store, views};

/// Dashboard query string: the raw filter parameters plus the flash message
/// carried through mutation redirects.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    search: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    sort: Option<String>,
    success: Option<String>,
}

/// Task form bodies. Field names match the HTML form inputs.
#[derive(Debug, Deserialize)]
pub struct TaskForm {
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    #[serde(rename = "dueDate")]
    due_date: Option<String>,
}

impl TaskForm {
    fn values(&self) -> FormValues {
        let defaults = FormValues::default();
        FormValues {
            title: self.title.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            status: self.status.clone().unwrap_or(defaults.status),
            priority: self.priority.clone().unwrap_or(defaults.priority),
            due_date: self.due_date.clone().unwrap_or_default(),
        }
    }
}

/// Accepts a date (`2024-05-01`), a local datetime, or full RFC 3339.
/// Anything else means "no deadline".
fn parse_due_date(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }
    None
}

fn require_user(session: &Session) -> Result<Uuid, HttpResponse> {
    auth::current_user(session).ok_or_else(|| redirect("/login"))
}

fn error_page(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type(ContentType::html())
        .body(views::error_page(message))
}

/// Failed form submissions re-render the form, but as a 500 rather than a
/// success status.
fn render_failure(markup: String) -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type(ContentType::html())
        .body(markup)
}

fn not_found_page(message: &str) -> HttpResponse {
    HttpResponse::NotFound()
        .content_type(ContentType::html())
        .body(views::error_page(message))
}

#[get("/tasks")]
pub async fn dashboard(
    db: web::Data<Db>,
    session: Session,
    params: web::Query<DashboardQuery>,
) -> HttpResponse {
    let user = match require_user(&session) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    let params = params.into_inner();
    let filters = TaskListParams {
        search: params.search,
        status: params.status,
        priority: params.priority,
        sort: params.sort,
    };

    let (filter, sort) = query::build_task_query(&filters, Some(user));
    match db.with_conn(|conn| store::list_tasks(conn, &filter, sort)) {
        Ok(tasks) => html(views::dashboard(&tasks, &filters, params.success.as_deref())),
        Err(err) => {
            log::error!("error fetching tasks: {err}");
            error_page("Failed to load the dashboard. Please try again.")
        }
    }
}

#[get("/tasks/new")]
pub async fn new_task_page(session: Session) -> HttpResponse {
    if let Err(resp) = require_user(&session) {
        return resp;
    }
    html(views::task_new(None, &FormValues::default()))
}

#[post("/tasks")]
pub async fn create_task(
    db: web::Data<Db>,
    session: Session,
    form: web::Form<TaskForm>,
) -> HttpResponse {
    let user = match require_user(&session) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    let form = form.into_inner();

    let title = form.title.clone().unwrap_or_default();
    if title.trim().is_empty() {
        return render_failure(views::task_new(
            Some("Failed to create task. Please try again."),
            &form.values(),
        ));
    }

    let new = NewTask {
        title,
        description: form.description.clone(),
        status: form.status.as_deref().and_then(TaskStatus::parse_wire),
        priority: form.priority.as_deref().and_then(TaskPriority::parse_wire),
        due_date: parse_due_date(form.due_date.as_deref()),
        owner: user,
    };
    match db.with_conn(|conn| store::insert_task(conn, new)) {
        Ok(_) => redirect("/tasks?success=Task+created+successfully"),
        Err(err) => {
            log::error!("error creating task: {err}");
            render_failure(views::task_new(
                Some("Failed to create task. Please try again."),
                &form.values(),
            ))
        }
    }
}

#[get("/tasks/{id}")]
pub async fn view_task(
    db: web::Data<Db>,
    session: Session,
    path: web::Path<Uuid>,
) -> HttpResponse {
    let user = match require_user(&session) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    match db.with_conn(|conn| store::get_task(conn, path.into_inner(), Some(user))) {
        Ok(Some(task)) => html(views::task_view(&task)),
        Ok(None) => not_found_page("Task not found"),
        Err(err) => {
            log::error!("error fetching task: {err}");
            error_page("Failed to fetch task. Please try again.")
        }
    }
}

#[get("/tasks/{id}/edit")]
pub async fn edit_task_page(
    db: web::Data<Db>,
    session: Session,
    path: web::Path<Uuid>,
) -> HttpResponse {
    let user = match require_user(&session) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    let id = path.into_inner();
    match db.with_conn(|conn| store::get_task(conn, id, Some(user))) {
        Ok(Some(task)) => html(views::task_edit(id, None, &FormValues::from(&task))),
        Ok(None) => not_found_page("Task not found"),
        Err(err) => {
            log::error!("error fetching task: {err}");
            error_page("Failed to fetch task. Please try again.")
        }
    }
}

/// Edit-form submission: a full replacement, every editable field supplied.
#[post("/tasks/{id}")]
pub async fn update_task(
    db: web::Data<Db>,
    session: Session,
    path: web::Path<Uuid>,
    form: web::Form<TaskForm>,
) -> HttpResponse {
    let user = match require_user(&session) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    let id = path.into_inner();
    let form = form.into_inner();

    let title = form.title.clone().unwrap_or_default();
    if title.trim().is_empty() {
        return render_failure(views::task_edit(
            id,
            Some("Failed to update task. Please try again."),
            &form.values(),
        ));
    }

    let patch = UpdateTaskRequest {
        title: Some(title),
        description: Some(form.description.clone().unwrap_or_default()),
        status: Some(
            form.status
                .as_deref()
                .and_then(TaskStatus::parse_wire)
                .unwrap_or_default(),
        ),
        priority: Some(
            form.priority
                .as_deref()
                .and_then(TaskPriority::parse_wire)
                .unwrap_or_default(),
        ),
        // Blank input clears the deadline.
        due_date: Some(parse_due_date(form.due_date.as_deref())),
    };

    match db.with_conn(|conn| store::update_task(conn, id, Some(user), &patch)) {
        Ok(Some(_)) => redirect("/tasks?success=Task+updated+successfully"),
        Ok(None) => not_found_page("Task not found"),
        Err(err) => {
            log::error!("error updating task: {err}");
            render_failure(views::task_edit(
                id,
                Some("Failed to update task. Please try again."),
                &form.values(),
            ))
        }
    }
}

#[post("/tasks/{id}/delete")]
pub async fn delete_task(
    db: web::Data<Db>,
    session: Session,
    path: web::Path<Uuid>,
) -> HttpResponse {
    let user = match require_user(&session) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    match db.with_conn(|conn| store::delete_task(conn, path.into_inner(), Some(user))) {
        Ok(Some(_)) => redirect("/tasks?success=Task+deleted+successfully"),
        Ok(None) => not_found_page("Task not found"),
        Err(err) => {
            log::error!("error deleting task: {err}");
            error_page("Failed to delete task. Please try again.")
        }
    }
}

/// Push every task out by one day. JSON even on the page surface, and a
/// 404-shaped body when there is nothing to postpone.
#[post("/tasks/procrastinate")]
pub async fn procrastinate(db: web::Data<Db>, session: Session) -> HttpResponse {
    let user = match require_user(&session) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    let now = Utc::now();
    match db.with_conn(|conn| postpone::procrastinate(conn, user, now)) {
        Ok(Some(outcome)) => HttpResponse::Ok().json(ProcrastinateResponse {
            success: true,
            message: postpone::message(outcome.updated),
            updated_count: outcome.updated,
            task_ids: outcome.task_ids,
        }),
        Ok(None) => HttpResponse::NotFound()
            .json(ErrorResponse::new("No tasks found to procrastinate.")),
        Err(err) => {
            log::error!("error postponing tasks: {err}");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Failed to procrastinate tasks. Please try again.",
            ))
        }
    }
}
