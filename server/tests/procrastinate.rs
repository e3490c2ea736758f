use std::collections::HashSet;

use chrono::{Duration, TimeZone, Utc};
use rusqlite::Connection;

use taskpile_server::db::init_schema;
use taskpile_server::procrastinate::{message, procrastinate, ONE_DAY_IN_MS};
use taskpile_server::store::{self, NewTask};

fn conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

#[test]
fn shifts_every_due_date_by_exactly_one_day() {
    let conn = conn();
    let owner = store::insert_user(&conn, "alice", "alice@example.com", "h")
        .unwrap()
        .id;

    let d1 = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let d2 = Utc.with_ymd_and_hms(2024, 8, 15, 17, 30, 0).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();

    let mut expected_ids = HashSet::new();
    for due in [Some(d1), Some(d2), None] {
        let task = store::insert_task(
            &conn,
            NewTask {
                title: "task".to_string(),
                description: None,
                status: None,
                priority: None,
                due_date: due,
                owner,
            },
        )
        .unwrap();
        expected_ids.insert(task.id);
    }

    let outcome = procrastinate(&conn, owner, now).unwrap().unwrap();
    assert_eq!(outcome.updated, 3);
    assert_eq!(
        outcome.task_ids.iter().copied().collect::<HashSet<_>>(),
        expected_ids
    );

    let one_day = Duration::milliseconds(ONE_DAY_IN_MS);
    let due_dates: HashSet<_> = store::due_dates(&conn, owner)
        .unwrap()
        .into_iter()
        .map(|(_, due)| due.unwrap())
        .collect();
    // Dated tasks moved from their own deadline; the undated one moved from
    // the single captured "now".
    assert_eq!(
        due_dates,
        HashSet::from([d1 + one_day, d2 + one_day, now + one_day])
    );
}

#[test]
fn zero_tasks_is_a_distinct_nothing_to_do_outcome() {
    let conn = conn();
    let owner = store::insert_user(&conn, "bob", "bob@example.com", "h")
        .unwrap()
        .id;
    let outcome = procrastinate(&conn, owner, Utc::now()).unwrap();
    assert!(outcome.is_none());
}

#[test]
fn only_the_requesting_users_tasks_move() {
    let conn = conn();
    let alice = store::insert_user(&conn, "alice", "alice@example.com", "h")
        .unwrap()
        .id;
    let bob = store::insert_user(&conn, "bob", "bob@example.com", "h")
        .unwrap()
        .id;
    let bobs_due = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    store::insert_task(
        &conn,
        NewTask {
            title: "alice's".to_string(),
            description: None,
            status: None,
            priority: None,
            due_date: None,
            owner: alice,
        },
    )
    .unwrap();
    store::insert_task(
        &conn,
        NewTask {
            title: "bob's".to_string(),
            description: None,
            status: None,
            priority: None,
            due_date: Some(bobs_due),
            owner: bob,
        },
    )
    .unwrap();

    let outcome = procrastinate(&conn, alice, Utc::now()).unwrap().unwrap();
    assert_eq!(outcome.updated, 1);

    let bobs = store::due_dates(&conn, bob).unwrap();
    assert_eq!(bobs[0].1, Some(bobs_due));
}

#[test]
fn summary_message_pluralizes() {
    assert_eq!(message(1), "Postponed 1 task by one day.");
    assert_eq!(message(3), "Postponed 3 tasks by one day.");
}
