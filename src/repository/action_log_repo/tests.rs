use super::ActionLogRepository;
use crate::domain::action_log::{ActionLog, ActionType};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn setup_test_db() -> Arc<Mutex<Connection>> {
    let conn = Connection::open_in_memory().unwrap();
    crate::db::configure_sqlite_connection(&conn).unwrap();
    crate::db::init_schema(&conn).unwrap();
    Arc::new(Mutex::new(conn))
}

fn make_test_log(action_id: &str, action_type: ActionType, actor: &str, minute: u32) -> ActionLog {
    let mut log = ActionLog::new(action_type, actor);
    log.action_id = action_id.to_string();
    log.action_ts = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(9, minute, 0)
        .unwrap();
    log
}

#[test]
fn test_insert_and_find_by_id() {
    let repo = ActionLogRepository::new(setup_test_db());

    let log = make_test_log("log1", ActionType::CreateJob, "nelson", 0)
        .with_job(7)
        .with_payload(serde_json::json!({"job_number": "J-7"}))
        .with_detail("新建作业 J-7".to_string());
    assert_eq!(repo.insert(&log).unwrap(), "log1");

    let found = repo.find_by_id("log1").unwrap().unwrap();
    assert_eq!(found.action_type, "CREATE_JOB");
    assert_eq!(found.actor, "nelson");
    assert_eq!(found.job_id, Some(7));
    assert_eq!(found.payload_json.unwrap()["job_number"], "J-7");
    assert_eq!(found.action_ts, log.action_ts);

    assert!(repo.find_by_id("missing").unwrap().is_none());
}

#[test]
fn test_find_by_job_id_newest_first() {
    let repo = ActionLogRepository::new(setup_test_db());

    repo.insert(&make_test_log("a", ActionType::CreateJob, "u1", 0).with_job(1))
        .unwrap();
    repo.insert(&make_test_log("b", ActionType::UpdateJob, "u1", 5).with_job(1))
        .unwrap();
    repo.insert(&make_test_log("c", ActionType::UpdateJob, "u1", 6).with_job(2))
        .unwrap();

    let logs = repo.find_by_job_id(1).unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].action_id, "b");
    assert_eq!(logs[1].action_id, "a");
}

#[test]
fn test_batch_insert_and_find_recent() {
    let repo = ActionLogRepository::new(setup_test_db());

    let logs = vec![
        make_test_log("r1", ActionType::AdjustInventory, "u1", 1).with_resource("TMA"),
        make_test_log("r2", ActionType::AdjustInventory, "u2", 2).with_resource("W20-2"),
        make_test_log("r3", ActionType::ExportReport, "u1", 3),
    ];
    assert_eq!(repo.batch_insert(logs).unwrap(), 3);

    let recent = repo.find_recent(2).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].action_id, "r3");
    assert_eq!(recent[1].action_id, "r2");
    assert_eq!(recent[1].resource_id.as_deref(), Some("W20-2"));
}

#[test]
fn test_find_by_actor_and_type() {
    let repo = ActionLogRepository::new(setup_test_db());

    repo.insert(&make_test_log("x1", ActionType::DeleteJob, "alice", 1))
        .unwrap();
    repo.insert(&make_test_log("x2", ActionType::ExportReport, "alice", 2))
        .unwrap();
    repo.insert(&make_test_log("x3", ActionType::ExportReport, "bob", 3))
        .unwrap();

    assert_eq!(repo.find_by_actor("alice", 10).unwrap().len(), 2);
    assert_eq!(repo.count_by_actor("alice").unwrap(), 2);
    assert_eq!(repo.count_by_actor("carol").unwrap(), 0);

    let exports = repo
        .find_by_action_type(ActionType::ExportReport.as_str(), 10)
        .unwrap();
    assert_eq!(exports.len(), 2);
    assert_eq!(exports[0].actor, "bob");
}

#[test]
fn test_batch_insert_rolls_back_on_duplicate() {
    let repo = ActionLogRepository::new(setup_test_db());

    let logs = vec![
        make_test_log("dup", ActionType::CreateJob, "u1", 1),
        make_test_log("dup", ActionType::CreateJob, "u1", 2),
    ];
    assert!(repo.batch_insert(logs).is_err());
    assert!(repo.find_recent(10).unwrap().is_empty());
}
