//! The sessionless JSON surface under `/api`. Owner scoping is deliberately
//! absent here: reads are global and the create path trusts the caller's
//! `userId` verbatim. A weaker-trust surface, preserved as documented
//! contract rather than silently hardened.

use actix_web::{delete, get, post, put, web, HttpResponse};
use taskpile_shared::{
    CreateTaskRequest, MessageResponse, TaskListParams, TaskListResponse, TaskResponse,
    UpdateTaskRequest, UserListParams, UserListResponse,
};
use uuid::Uuid;

use crate::db::Db;
use crate::error::AppError;
use crate::store::NewTask;
use crate::{query, store};

#[get("/api/tasks")]
pub async fn list_tasks(
    db: web::Data<Db>,
    params: web::Query<TaskListParams>,
) -> Result<HttpResponse, AppError> {
    let (filter, sort) = query::build_task_query(&params, None);
    let tasks = db
        .with_conn(|conn| store::list_tasks(conn, &filter, sort))
        .map_err(AppError::store("fetch tasks"))?;
    Ok(HttpResponse::Ok().json(TaskListResponse {
        success: true,
        count: tasks.len(),
        data: tasks,
    }))
}

#[get("/api/tasks/{id}")]
pub async fn get_task(db: web::Data<Db>, path: web::Path<Uuid>) -> Result<HttpResponse, AppError> {
    let task = db
        .with_conn(|conn| store::get_task(conn, path.into_inner(), None))
        .map_err(AppError::store("fetch task"))?
        .ok_or(AppError::NotFound("Task"))?;
    Ok(HttpResponse::Ok().json(TaskResponse {
        success: true,
        data: task,
    }))
}

#[post("/api/tasks")]
pub async fn create_task(
    db: web::Data<Db>,
    body: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let title = body
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::validation("Title is required"))?
        .to_string();
    let owner = body
        .user_id
        .ok_or_else(|| AppError::validation("userId is required"))?;

    let new = NewTask {
        title,
        description: body.description,
        status: body.status,
        priority: body.priority,
        due_date: body.due_date,
        owner,
    };
    let task = db
        .with_conn(|conn| store::insert_task(conn, new))
        .map_err(AppError::store("create task"))?;
    Ok(HttpResponse::Created().json(TaskResponse {
        success: true,
        data: task,
    }))
}

#[put("/api/tasks/{id}")]
pub async fn update_task(
    db: web::Data<Db>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, AppError> {
    let patch = body.into_inner();
    let task = db
        .with_conn(|conn| store::update_task(conn, path.into_inner(), None, &patch))
        .map_err(AppError::store("update task"))?
        .ok_or(AppError::NotFound("Task"))?;
    Ok(HttpResponse::Ok().json(TaskResponse {
        success: true,
        data: task,
    }))
}

#[delete("/api/tasks/{id}")]
pub async fn delete_task(
    db: web::Data<Db>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    db.with_conn(|conn| store::delete_task(conn, path.into_inner(), None))
        .map_err(AppError::store("delete task"))?
        .ok_or(AppError::NotFound("Task"))?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: "Task deleted successfully".to_string(),
    }))
}

#[get("/api/users")]
pub async fn list_users(
    db: web::Data<Db>,
    params: web::Query<UserListParams>,
) -> Result<HttpResponse, AppError> {
    let (filter, sort) = query::build_user_query(&params);
    let users = db
        .with_conn(|conn| store::list_users(conn, &filter, sort))
        .map_err(AppError::store("fetch users"))?;
    Ok(HttpResponse::Ok().json(UserListResponse {
        success: true,
        count: users.len(),
        data: users,
    }))
}
