use chrono::{Duration, TimeZone, Utc};
use rusqlite::{params, Connection};
use taskpile_shared::{TaskPriority, TaskStatus, UpdateTaskRequest};
use uuid::Uuid;

use taskpile_server::db::init_schema;
use taskpile_server::query::{TaskFilter, TaskSort, UserFilter, UserSort};
use taskpile_server::store::{self, NewTask};

fn conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

fn make_user(conn: &Connection, name: &str) -> Uuid {
    store::insert_user(conn, name, &format!("{name}@example.com"), "hash")
        .unwrap()
        .id
}

fn new_task(owner: Uuid, title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: None,
        status: None,
        priority: None,
        due_date: None,
        owner,
    }
}

#[test]
fn insert_applies_defaults_and_round_trips() {
    let conn = conn();
    let owner = make_user(&conn, "alice");

    let created = store::insert_task(&conn, new_task(owner, "write report")).unwrap();
    assert_eq!(created.description, "");
    assert_eq!(created.status, TaskStatus::Pending);
    assert_eq!(created.priority, TaskPriority::Medium);
    assert_eq!(created.due_date, None);
    assert_eq!(created.user, owner);

    let fetched = store::get_task(&conn, created.id, None).unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[test]
fn insert_keeps_supplied_fields() {
    let conn = conn();
    let owner = make_user(&conn, "alice");
    let due = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();

    let created = store::insert_task(
        &conn,
        NewTask {
            title: "ship release".to_string(),
            description: Some("cut the tag".to_string()),
            status: Some(TaskStatus::InProgress),
            priority: Some(TaskPriority::High),
            due_date: Some(due),
            owner,
        },
    )
    .unwrap();

    let fetched = store::get_task(&conn, created.id, Some(owner)).unwrap().unwrap();
    assert_eq!(fetched.description, "cut the tag");
    assert_eq!(fetched.status, TaskStatus::InProgress);
    assert_eq!(fetched.priority, TaskPriority::High);
    assert_eq!(fetched.due_date, Some(due));
}

#[test]
fn owner_constraint_hides_other_users_tasks() {
    let conn = conn();
    let alice = make_user(&conn, "alice");
    let bob = make_user(&conn, "bob");
    let task = store::insert_task(&conn, new_task(alice, "private")).unwrap();

    assert!(store::get_task(&conn, task.id, Some(bob)).unwrap().is_none());
    assert!(store::get_task(&conn, task.id, Some(alice)).unwrap().is_some());

    let patch = UpdateTaskRequest {
        status: Some(TaskStatus::Completed),
        ..Default::default()
    };
    assert!(store::update_task(&conn, task.id, Some(bob), &patch)
        .unwrap()
        .is_none());
    assert!(store::delete_task(&conn, task.id, Some(bob)).unwrap().is_none());

    // Still there, still pending.
    let fetched = store::get_task(&conn, task.id, Some(alice)).unwrap().unwrap();
    assert_eq!(fetched.status, TaskStatus::Pending);
}

#[test]
fn partial_update_changes_only_supplied_fields() {
    let conn = conn();
    let owner = make_user(&conn, "alice");
    let due = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let task = store::insert_task(
        &conn,
        NewTask {
            title: "original".to_string(),
            description: Some("details".to_string()),
            status: None,
            priority: Some(TaskPriority::High),
            due_date: Some(due),
            owner,
        },
    )
    .unwrap();

    let patch = UpdateTaskRequest {
        status: Some(TaskStatus::Completed),
        ..Default::default()
    };
    let updated = store::update_task(&conn, task.id, Some(owner), &patch)
        .unwrap()
        .unwrap();

    assert_eq!(updated.status, TaskStatus::Completed);
    assert_eq!(updated.title, "original");
    assert_eq!(updated.description, "details");
    assert_eq!(updated.priority, TaskPriority::High);
    assert_eq!(updated.due_date, Some(due));
}

#[test]
fn due_date_patch_distinguishes_clear_from_leave_alone() {
    let conn = conn();
    let owner = make_user(&conn, "alice");
    let due = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let task = store::insert_task(
        &conn,
        NewTask {
            due_date: Some(due),
            ..new_task(owner, "deadline")
        },
    )
    .unwrap();

    // Patch that leaves the field out: deadline survives.
    let keep = UpdateTaskRequest {
        title: Some("renamed".to_string()),
        ..Default::default()
    };
    let updated = store::update_task(&conn, task.id, None, &keep).unwrap().unwrap();
    assert_eq!(updated.due_date, Some(due));

    // Explicit null clears it.
    let clear = UpdateTaskRequest {
        due_date: Some(None),
        ..Default::default()
    };
    let updated = store::update_task(&conn, task.id, None, &clear).unwrap().unwrap();
    assert_eq!(updated.due_date, None);
}

#[test]
fn blank_title_patch_never_overwrites_the_title() {
    let conn = conn();
    let owner = make_user(&conn, "alice");
    let task = store::insert_task(&conn, new_task(owner, "keep me")).unwrap();

    // Blank title alongside a real change: the other field applies.
    let patch = UpdateTaskRequest {
        title: Some(String::new()),
        status: Some(TaskStatus::Completed),
        ..Default::default()
    };
    let updated = store::update_task(&conn, task.id, Some(owner), &patch)
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "keep me");
    assert_eq!(updated.status, TaskStatus::Completed);

    // A patch that is nothing but a blank title degrades to a read.
    let only_blank = UpdateTaskRequest {
        title: Some("   ".to_string()),
        ..Default::default()
    };
    let unchanged = store::update_task(&conn, task.id, Some(owner), &only_blank)
        .unwrap()
        .unwrap();
    assert_eq!(unchanged, updated);
}

#[test]
fn empty_patch_is_a_read() {
    let conn = conn();
    let owner = make_user(&conn, "alice");
    let task = store::insert_task(&conn, new_task(owner, "untouched")).unwrap();

    let unchanged = store::update_task(&conn, task.id, None, &UpdateTaskRequest::default())
        .unwrap()
        .unwrap();
    assert_eq!(unchanged, task);
}

#[test]
fn delete_returns_the_deleted_record_once() {
    let conn = conn();
    let owner = make_user(&conn, "alice");
    let task = store::insert_task(&conn, new_task(owner, "short-lived")).unwrap();

    let deleted = store::delete_task(&conn, task.id, Some(owner)).unwrap().unwrap();
    assert_eq!(deleted.id, task.id);
    assert!(store::delete_task(&conn, task.id, Some(owner)).unwrap().is_none());
    assert!(store::get_task(&conn, task.id, None).unwrap().is_none());
}

#[test]
fn search_filter_matches_title_or_description_case_insensitively() {
    let conn = conn();
    let owner = make_user(&conn, "alice");
    store::insert_task(&conn, new_task(owner, "Quarterly Report")).unwrap();
    store::insert_task(
        &conn,
        NewTask {
            description: Some("includes the report appendix".to_string()),
            ..new_task(owner, "misc")
        },
    )
    .unwrap();
    store::insert_task(&conn, new_task(owner, "groceries")).unwrap();

    let filter = TaskFilter {
        search: Some("REPORT".to_string()),
        ..Default::default()
    };
    let found = store::list_tasks(&conn, &filter, TaskSort::NewestFirst).unwrap();
    assert_eq!(found.len(), 2);
}

#[test]
fn status_and_priority_filters_are_exact_and_and_combined() {
    let conn = conn();
    let owner = make_user(&conn, "alice");
    store::insert_task(
        &conn,
        NewTask {
            status: Some(TaskStatus::Completed),
            priority: Some(TaskPriority::High),
            ..new_task(owner, "done and urgent")
        },
    )
    .unwrap();
    store::insert_task(
        &conn,
        NewTask {
            status: Some(TaskStatus::Completed),
            ..new_task(owner, "done and medium")
        },
    )
    .unwrap();
    store::insert_task(&conn, new_task(owner, "pending")).unwrap();

    let filter = TaskFilter {
        status: Some("completed".to_string()),
        priority: Some("high".to_string()),
        ..Default::default()
    };
    let found = store::list_tasks(&conn, &filter, TaskSort::NewestFirst).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "done and urgent");

    // An unrecognized status value matches nothing rather than erroring.
    let filter = TaskFilter {
        status: Some("archived".to_string()),
        ..Default::default()
    };
    assert!(store::list_tasks(&conn, &filter, TaskSort::NewestFirst)
        .unwrap()
        .is_empty());
}

#[test]
fn sort_orders_follow_created_and_due_dates() {
    let conn = conn();
    let owner = make_user(&conn, "alice");
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let mut ids = Vec::new();
    for (i, title) in ["first", "second", "third"].iter().enumerate() {
        let task = store::insert_task(&conn, new_task(owner, title)).unwrap();
        // Pin distinct timestamps; insertion within one test shares a clock tick.
        conn.execute(
            "UPDATE tasks SET created_at = ?1, due_date = ?2 WHERE id = ?3",
            params![
                base + Duration::days(i as i64),
                base + Duration::days(10 - i as i64),
                task.id.to_string()
            ],
        )
        .unwrap();
        ids.push(task.id);
    }

    let titles = |sort| -> Vec<String> {
        store::list_tasks(&conn, &TaskFilter::default(), sort)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect()
    };
    assert_eq!(titles(TaskSort::NewestFirst), ["third", "second", "first"]);
    assert_eq!(titles(TaskSort::OldestFirst), ["first", "second", "third"]);
    // Due dates were assigned in reverse, so due-date order flips the list.
    assert_eq!(titles(TaskSort::DueDate), ["third", "second", "first"]);
}

#[test]
fn bulk_update_counts_only_rows_that_exist() {
    let conn = conn();
    let owner = make_user(&conn, "alice");
    let a = store::insert_task(&conn, new_task(owner, "a")).unwrap();
    let b = store::insert_task(&conn, new_task(owner, "b")).unwrap();
    let due = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();

    let applied = store::bulk_update_due_dates(
        &conn,
        &[(a.id, due), (b.id, due), (Uuid::new_v4(), due)],
    )
    .unwrap();
    assert_eq!(applied, 2);
    assert_eq!(
        store::get_task(&conn, a.id, None).unwrap().unwrap().due_date,
        Some(due)
    );
}

#[test]
fn user_listing_filters_and_sorts() {
    let conn = conn();
    store::insert_user(&conn, "alice", "alice@example.com", "h").unwrap();
    store::insert_user(&conn, "bob", "bob@example.com", "h").unwrap();
    store::insert_user(&conn, "carol", "carol@other.org", "h").unwrap();

    let filter = UserFilter {
        search: Some("example".to_string()),
        ..Default::default()
    };
    let found = store::list_users(&conn, &filter, UserSort::Username).unwrap();
    let names: Vec<_> = found.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, ["alice", "bob"]);

    let filter = UserFilter {
        email: Some("carol@other.org".to_string()),
        ..Default::default()
    };
    let found = store::list_users(&conn, &filter, UserSort::NewestFirst).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].username, "carol");
}

#[test]
fn registration_helpers_enforce_uniqueness_checks() {
    let conn = conn();
    store::insert_user(&conn, "alice", "alice@example.com", "h").unwrap();

    assert!(store::user_exists(&conn, "alice@example.com", "someone").unwrap());
    assert!(store::user_exists(&conn, "other@example.com", "alice").unwrap());
    assert!(!store::user_exists(&conn, "other@example.com", "someone").unwrap());

    let found = store::find_user_by_email(&conn, "alice@example.com").unwrap();
    assert_eq!(found.unwrap().username, "alice");
    assert!(store::find_user_by_email(&conn, "missing@example.com")
        .unwrap()
        .is_none());
}
