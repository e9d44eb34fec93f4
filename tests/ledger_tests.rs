use campusledger::core::ledger::AttendanceLedger;
use campusledger::db::initialize::init_db;
use campusledger::db::pool::DbPool;
use campusledger::db::queries::{get_daily_total, list_daily_totals, list_events};
use campusledger::db::users::insert_user;
use campusledger::errors::AppError;
use campusledger::models::event_kind::EventKind;
use campusledger::models::session_state::SessionState;
use campusledger::models::user::NewUser;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::{Arc, Barrier};
use std::thread;

mod common;
use common::setup_test_db;

fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// File-backed DB with one registered student; returns (path, user id).
fn setup(name: &str) -> (String, i64) {
    let path = setup_test_db(name);
    let mut pool = DbPool::new(&path).unwrap();
    init_db(&pool.conn).unwrap();
    let id = pool
        .unit_of_work(|tx| {
            insert_user(
                tx,
                &NewUser {
                    student_code: "S001".into(),
                    email: "s001@uni.edu".into(),
                    first_name: "Ada".into(),
                    last_name: "Lovelace".into(),
                },
            )
        })
        .unwrap();
    (path, id)
}

fn clock(
    pool: &mut DbPool,
    ledger: &AttendanceLedger,
    user: i64,
    kind: EventKind,
    at: &str,
) -> Result<campusledger::core::ledger::RecordOutcome, AppError> {
    pool.unit_of_work(|tx| ledger.record(tx, user, kind, Some(utc(at)), None))
}

#[test]
fn overnight_session_is_credited_to_both_days() {
    let (path, user) = setup("ledger_overnight");
    let mut pool = DbPool::new(&path).unwrap();
    let ledger = AttendanceLedger::new(chrono_tz::UTC);

    clock(&mut pool, &ledger, user, EventKind::ClockIn, "2025-01-01T23:00:00Z").unwrap();
    let out = clock(&mut pool, &ledger, user, EventKind::ClockOut, "2025-01-02T01:00:00Z").unwrap();
    assert_eq!(out.total_seconds(), 7200);

    // a fresh connection sees the committed state
    let pool = DbPool::new(&path).unwrap();
    assert_eq!(get_daily_total(&pool.conn, user, &day("2025-01-01")).unwrap(), Some(3600));
    assert_eq!(get_daily_total(&pool.conn, user, &day("2025-01-02")).unwrap(), Some(3600));
}

#[test]
fn totals_accumulate_across_sessions_and_days() {
    let (path, user) = setup("ledger_accumulate");
    let mut pool = DbPool::new(&path).unwrap();
    let ledger = AttendanceLedger::new(chrono_tz::Europe::Rome);

    let sessions = [
        ("2025-03-03T07:00:00Z", "2025-03-03T11:00:00Z"),
        ("2025-03-03T12:00:00Z", "2025-03-03T15:30:00Z"),
        // 22:00 → 02:00 Rome time
        ("2025-03-03T21:00:00Z", "2025-03-04T01:00:00Z"),
    ];
    for (i, o) in sessions {
        clock(&mut pool, &ledger, user, EventKind::ClockIn, i).unwrap();
        clock(&mut pool, &ledger, user, EventKind::ClockOut, o).unwrap();
    }

    let totals = list_daily_totals(&pool.conn, user, None).unwrap();
    let pairs: Vec<_> = totals.iter().map(|t| (t.day, t.total_seconds)).collect();
    assert_eq!(
        pairs,
        vec![
            (day("2025-03-03"), 4 * 3600 + 3 * 3600 + 1800 + 2 * 3600),
            (day("2025-03-04"), 2 * 3600),
        ]
    );

    let sum: i64 = totals.iter().map(|t| t.total_seconds).sum();
    assert_eq!(sum, 4 * 3600 + 3 * 3600 + 1800 + 4 * 3600);
}

#[test]
fn rejected_events_leave_no_trace() {
    let (path, user) = setup("ledger_rejected");
    let mut pool = DbPool::new(&path).unwrap();
    let ledger = AttendanceLedger::new(chrono_tz::UTC);

    let err = clock(&mut pool, &ledger, user, EventKind::ClockOut, "2025-01-01T08:00:00Z")
        .unwrap_err();
    assert!(err.is_conflict());

    clock(&mut pool, &ledger, user, EventKind::ClockIn, "2025-01-01T09:00:00Z").unwrap();
    let err = clock(&mut pool, &ledger, user, EventKind::ClockIn, "2025-01-01T09:05:00Z")
        .unwrap_err();
    assert!(err.is_conflict());

    let err = clock(&mut pool, &ledger, user, EventKind::ClockOut, "2025-01-01T09:00:00Z")
        .unwrap_err();
    assert!(err.is_conflict());

    let events = list_events(&pool.conn, user, None).unwrap();
    assert_eq!(events.len(), 1);
    assert!(list_daily_totals(&pool.conn, user, None).unwrap().is_empty());

    match ledger.session_state(&pool.conn, user).unwrap() {
        SessionState::OpenSession { since, .. } => assert_eq!(since, utc("2025-01-01T09:00:00Z")),
        other => panic!("expected open session, got {:?}", other),
    }
}

#[test]
fn unknown_user_is_not_found() {
    let (path, _) = setup("ledger_unknown");
    let mut pool = DbPool::new(&path).unwrap();
    let ledger = AttendanceLedger::new(chrono_tz::UTC);

    let err = clock(&mut pool, &ledger, 999, EventKind::ClockIn, "2025-01-01T08:00:00Z")
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(ledger.session_state(&pool.conn, 999).unwrap_err().is_not_found());
}

#[test]
fn failure_after_record_rolls_back_the_whole_unit() {
    let (path, user) = setup("ledger_rollback");
    let mut pool = DbPool::new(&path).unwrap();
    let ledger = AttendanceLedger::new(chrono_tz::UTC);

    clock(&mut pool, &ledger, user, EventKind::ClockIn, "2025-01-01T08:00:00Z").unwrap();

    let res: Result<(), AppError> = pool.unit_of_work(|tx| {
        ledger.record(tx, user, EventKind::ClockOut, Some(utc("2025-01-01T10:00:00Z")), None)?;
        Err(AppError::Other("simulated storage failure".into()))
    });
    assert!(res.is_err());

    assert!(list_daily_totals(&pool.conn, user, None).unwrap().is_empty());
    assert_eq!(list_events(&pool.conn, user, None).unwrap().len(), 1);
    assert!(ledger.session_state(&pool.conn, user).unwrap().is_open());
}

#[test]
fn concurrent_clock_ins_admit_exactly_one() {
    let (path, user) = setup("ledger_concurrent");
    let workers = 4;
    let barrier = Arc::new(Barrier::new(workers));

    let handles: Vec<_> = (0..workers)
        .map(|i| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut pool = DbPool::with_busy_timeout(&path, 10_000).unwrap();
                let ledger = AttendanceLedger::new(chrono_tz::UTC);
                let at = utc("2025-01-01T08:00:00Z") + chrono::Duration::seconds(i as i64);
                barrier.wait();
                pool.unit_of_work(|tx| ledger.record(tx, user, EventKind::ClockIn, Some(at), None))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let ok = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(ok, 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.is_conflict())
    );

    let pool = DbPool::new(&path).unwrap();
    assert_eq!(list_events(&pool.conn, user, None).unwrap().len(), 1);
}

#[test]
fn concurrent_clock_outs_credit_the_session_once() {
    let (path, user) = setup("ledger_concurrent_out");
    {
        let mut pool = DbPool::new(&path).unwrap();
        let ledger = AttendanceLedger::new(chrono_tz::UTC);
        clock(&mut pool, &ledger, user, EventKind::ClockIn, "2025-01-01T08:00:00Z").unwrap();
    }

    let workers = 3;
    let barrier = Arc::new(Barrier::new(workers));
    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut pool = DbPool::with_busy_timeout(&path, 10_000).unwrap();
                let ledger = AttendanceLedger::new(chrono_tz::UTC);
                barrier.wait();
                pool.unit_of_work(|tx| {
                    ledger.record(tx, user, EventKind::ClockOut, Some(utc("2025-01-01T09:00:00Z")), None)
                })
            })
        })
        .collect();

    let ok = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(ok, 1);

    let pool = DbPool::new(&path).unwrap();
    assert_eq!(get_daily_total(&pool.conn, user, &day("2025-01-01")).unwrap(), Some(3600));
}
