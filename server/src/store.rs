//! SQL data access for tasks and users. Functions are stateless and take a
//! `&Connection`; filters arrive pre-normalized from the query builder and
//! are turned into dynamic WHERE/SET fragments with positional parameters.
//!
//! Not-found is `None`, never an error. Anything the database refuses comes
//! back as [`StoreError`].

use chrono::{DateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension, Row};
use taskpile_shared::{Task, TaskPriority, TaskStatus, UpdateTaskRequest, User};
use uuid::Uuid;

use crate::error::StoreError;
use crate::query::{TaskFilter, TaskSort, UserFilter, UserSort};

const TASK_COLUMNS: &str = "id, title, description, status, priority, due_date, user, created_at";
const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";

/// Fields for a task insert. Missing optionals get the documented defaults.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub owner: Uuid,
}

fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let status: String = row.get(3)?;
    let priority: String = row.get(4)?;
    Ok(Task {
        id: uuid_column(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: TaskStatus::parse_wire(&status).unwrap_or_default(),
        priority: TaskPriority::parse_wire(&priority).unwrap_or_default(),
        due_date: row.get(5)?,
        user: uuid_column(row, 6)?,
        created_at: row.get(7)?,
    })
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_column(row, 0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// List tasks matching `filter`, ordered per `sort`. An empty filter matches
/// everything; the default sort is newest first.
pub fn list_tasks(
    conn: &Connection,
    filter: &TaskFilter,
    sort: TaskSort,
) -> Result<Vec<Task>, StoreError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(owner) = filter.owner {
        conditions.push("user = ?".to_string());
        values.push(Box::new(owner.to_string()));
    }
    if let Some(ref search) = filter.search {
        conditions.push(
            "(instr(lower(title), lower(?)) > 0 OR instr(lower(description), lower(?)) > 0)"
                .to_string(),
        );
        values.push(Box::new(search.clone()));
        values.push(Box::new(search.clone()));
    }
    if let Some(ref status) = filter.status {
        conditions.push("status = ?".to_string());
        values.push(Box::new(status.clone()));
    }
    if let Some(ref priority) = filter.priority {
        conditions.push("priority = ?".to_string());
        values.push(Box::new(priority.clone()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    let order_clause = match sort {
        TaskSort::NewestFirst => "ORDER BY created_at DESC",
        TaskSort::OldestFirst => "ORDER BY created_at ASC",
        TaskSort::DueDate => "ORDER BY due_date ASC",
    };

    let sql = format!("SELECT {TASK_COLUMNS} FROM tasks {where_clause} {order_clause}");
    let param_refs: Vec<&dyn ToSql> = values.iter().map(AsRef::as_ref).collect();

    let mut stmt = conn.prepare(&sql)?;
    let tasks = stmt
        .query_map(param_refs.as_slice(), task_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Point lookup, optionally constrained to an owner. A task owned by someone
/// else is indistinguishable from a missing one.
pub fn get_task(
    conn: &Connection,
    id: Uuid,
    owner: Option<Uuid>,
) -> Result<Option<Task>, StoreError> {
    let task = match owner {
        Some(owner) => conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND user = ?2"),
                params![id.to_string(), owner.to_string()],
                task_from_row,
            )
            .optional()?,
        None => conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id.to_string()],
                task_from_row,
            )
            .optional()?,
    };
    Ok(task)
}

/// Insert a task, assigning id and creation time and applying field defaults.
pub fn insert_task(conn: &Connection, new: NewTask) -> Result<Task, StoreError> {
    let task = Task {
        id: Uuid::new_v4(),
        title: new.title,
        description: new.description.unwrap_or_default(),
        status: new.status.unwrap_or_default(),
        priority: new.priority.unwrap_or_default(),
        due_date: new.due_date,
        user: new.owner,
        created_at: Utc::now(),
    };
    conn.execute(
        "INSERT INTO tasks (id, title, description, status, priority, due_date, user, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            task.id.to_string(),
            task.title,
            task.description,
            task.status.as_str(),
            task.priority.as_str(),
            task.due_date,
            task.user.to_string(),
            task.created_at,
        ],
    )?;
    Ok(task)
}

/// Apply a patch to one task: only fields present in the patch change.
/// Returns the post-update record, or `None` when the id/owner pair does not
/// match anything. An empty patch is a read.
pub fn update_task(
    conn: &Connection,
    id: Uuid,
    owner: Option<Uuid>,
    patch: &UpdateTaskRequest,
) -> Result<Option<Task>, StoreError> {
    if patch.is_empty() {
        return get_task(conn, id, owner);
    }

    let mut sets: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    // A blank title never overwrites an existing one.
    if let Some(ref title) = patch.title {
        if !title.trim().is_empty() {
            sets.push("title = ?".to_string());
            values.push(Box::new(title.clone()));
        }
    }
    if let Some(ref description) = patch.description {
        sets.push("description = ?".to_string());
        values.push(Box::new(description.clone()));
    }
    if let Some(status) = patch.status {
        sets.push("status = ?".to_string());
        values.push(Box::new(status.as_str().to_string()));
    }
    if let Some(priority) = patch.priority {
        sets.push("priority = ?".to_string());
        values.push(Box::new(priority.as_str().to_string()));
    }
    if let Some(due_date) = patch.due_date {
        // Outer Some means the field was supplied; inner None clears it.
        sets.push("due_date = ?".to_string());
        values.push(Box::new(due_date));
    }

    if sets.is_empty() {
        return get_task(conn, id, owner);
    }

    let mut sql = format!("UPDATE tasks SET {} WHERE id = ?", sets.join(", "));
    values.push(Box::new(id.to_string()));
    if let Some(owner) = owner {
        sql.push_str(" AND user = ?");
        values.push(Box::new(owner.to_string()));
    }

    let param_refs: Vec<&dyn ToSql> = values.iter().map(AsRef::as_ref).collect();
    let changed = conn.execute(&sql, param_refs.as_slice())?;
    if changed == 0 {
        return Ok(None);
    }
    get_task(conn, id, owner)
}

/// Delete one task, returning the deleted record when it existed.
pub fn delete_task(
    conn: &Connection,
    id: Uuid,
    owner: Option<Uuid>,
) -> Result<Option<Task>, StoreError> {
    let Some(task) = get_task(conn, id, owner)? else {
        return Ok(None);
    };
    conn.execute("DELETE FROM tasks WHERE id = ?1", params![id.to_string()])?;
    Ok(Some(task))
}

/// Projection used by the procrastination operation: every (id, due_date)
/// pair owned by `owner`.
pub fn due_dates(
    conn: &Connection,
    owner: Uuid,
) -> Result<Vec<(Uuid, Option<DateTime<Utc>>)>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, due_date FROM tasks WHERE user = ?1")?;
    let rows = stmt
        .query_map(params![owner.to_string()], |row| {
            Ok((uuid_column(row, 0)?, row.get::<_, Option<DateTime<Utc>>>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Apply every (id, new due date) pair as its own single-row update. Each
/// update is atomic per-record; the batch as a whole is best-effort, not
/// transactional. Returns the number of rows that changed.
pub fn bulk_update_due_dates(
    conn: &Connection,
    updates: &[(Uuid, DateTime<Utc>)],
) -> Result<usize, StoreError> {
    let mut stmt = conn.prepare("UPDATE tasks SET due_date = ?1 WHERE id = ?2")?;
    let mut applied = 0;
    for (id, due) in updates {
        applied += stmt.execute(params![due, id.to_string()])?;
    }
    Ok(applied)
}

/// Insert a user with a pre-hashed password.
pub fn insert_user(
    conn: &Connection,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, StoreError> {
    let user = User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        created_at: Utc::now(),
    };
    conn.execute(
        "INSERT INTO users (id, username, email, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.id.to_string(),
            user.username,
            user.email,
            user.password_hash,
            user.created_at,
        ],
    )?;
    Ok(user)
}

pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, StoreError> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

/// Uniqueness pre-check used by registration.
pub fn user_exists(conn: &Connection, email: &str, username: &str) -> Result<bool, StoreError> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM users WHERE email = ?1 OR username = ?2 LIMIT 1",
            params![email, username],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Account listing with the secondary query-builder output.
pub fn list_users(
    conn: &Connection,
    filter: &UserFilter,
    sort: UserSort,
) -> Result<Vec<User>, StoreError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(ref search) = filter.search {
        conditions.push(
            "(instr(lower(username), lower(?)) > 0 OR instr(lower(email), lower(?)) > 0)"
                .to_string(),
        );
        values.push(Box::new(search.clone()));
        values.push(Box::new(search.clone()));
    }
    if let Some(ref email) = filter.email {
        conditions.push("email = ?".to_string());
        values.push(Box::new(email.clone()));
    }
    if let Some(ref username) = filter.username {
        conditions.push("username = ?".to_string());
        values.push(Box::new(username.clone()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    let order_clause = match sort {
        UserSort::NewestFirst => "ORDER BY created_at DESC",
        UserSort::OldestFirst => "ORDER BY created_at ASC",
        UserSort::Username => "ORDER BY username ASC",
        UserSort::Email => "ORDER BY email ASC",
    };

    let sql = format!("SELECT {USER_COLUMNS} FROM users {where_clause} {order_clause}");
    let param_refs: Vec<&dyn ToSql> = values.iter().map(AsRef::as_ref).collect();

    let mut stmt = conn.prepare(&sql)?;
    let users = stmt
        .query_map(param_refs.as_slice(), user_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}
