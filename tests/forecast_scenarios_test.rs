// ==========================================
// 库存预测场景测试
// ==========================================
// 测试目标: 作业落库后读回，验证预测引擎的计数规则与不变量
// ==========================================


use chrono::{Duration, NaiveDate};
use etc_job_board::domain::forecast::{MissingInventoryPolicy, ProjectionRow};
use etc_job_board::domain::job::Job;
use etc_job_board::domain::types::JobStatus;
use etc_job_board::engine::{
    select_shortfalls, EquipmentForecastEngine, InventoryBaselineStore, SignForecastEngine,
};
use etc_job_board::repository::{JobRepository, JobRepositoryImpl};
use std::collections::BTreeMap;
use test_helpers::{create_test_db, date, equipment_job, open_shared_connection, sign_job};

fn baseline(items: &[(&str, i64)]) -> InventoryBaselineStore {
    let counts: BTreeMap<String, i64> = items.iter().map(|(k, v)| (k.to_string(), *v)).collect();
    InventoryBaselineStore::with_counts(MissingInventoryPolicy::Zero, counts).unwrap()
}

fn row<'a>(rows: &'a [ProjectionRow], id: &str) -> &'a ProjectionRow {
    rows.iter()
        .find(|r| r.resource_id == id)
        .unwrap_or_else(|| panic!("缺少资源行 {}", id))
}

/// 持久化作业后按仓储读回（经过完整的行映射）
fn persisted(jobs: Vec<etc_job_board::NewJob>) -> Vec<Job> {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let repo = JobRepositoryImpl::new(open_shared_connection(&db_path).unwrap());
    for job in &jobs {
        repo.create_job(job).unwrap();
    }
    repo.list_jobs().unwrap()
}

// ==========================================
// 基础场景
// ==========================================

#[test]
fn test_ongoing_job_returns_within_window() {
    let jobs = persisted(vec![equipment_job(
        "J-1",
        JobStatus::OnGoing,
        date(2024, 1, 1),
        Some(date(2024, 1, 31)),
        &[("TMA", 2)],
    )]);

    let rows = EquipmentForecastEngine::new()
        .project(&jobs, &baseline(&[("TMA", 1)]), date(2024, 1, 15), date(2024, 2, 15))
        .unwrap();

    let tma = row(&rows, "TMA");
    assert_eq!(tma.current_inventory, 1);
    assert_eq!(tma.in_use, 2);
    assert_eq!(tma.going_out, 0);
    assert_eq!(tma.returning, 2);
    assert_eq!(tma.need_to_order, 0);
}

#[test]
fn test_return_offsets_usage_with_empty_stock() {
    let jobs = persisted(vec![equipment_job(
        "J-1",
        JobStatus::OnGoing,
        date(2024, 1, 1),
        Some(date(2024, 1, 31)),
        &[("TMA", 2)],
    )]);

    let rows = EquipmentForecastEngine::new()
        .project(&jobs, &baseline(&[("TMA", 0)]), date(2024, 1, 15), date(2024, 2, 15))
        .unwrap();

    let tma = row(&rows, "TMA");
    assert_eq!(tma.in_use, 2);
    assert_eq!(tma.projected_available(), 0);
    assert_eq!(tma.need_to_order, 0);
}

#[test]
fn test_pending_job_starting_in_window_goes_out() {
    let jobs = persisted(vec![equipment_job(
        "J-1",
        JobStatus::PendingStart,
        date(2024, 3, 1),
        None,
        &[("TMA", 5)],
    )]);

    let rows = EquipmentForecastEngine::new()
        .project(&jobs, &baseline(&[]), date(2024, 2, 1), date(2024, 3, 10))
        .unwrap();

    let tma = row(&rows, "TMA");
    assert_eq!(tma.going_out, 5);
    assert_eq!(tma.in_use, 0);
    assert_eq!(tma.need_to_order, 5);
}

#[test]
fn test_baseline_only_resource_emits_no_row() {
    let rows = EquipmentForecastEngine::new()
        .project(&[], &baseline(&[("SQ POST", 10)]), date(2024, 1, 1), date(2024, 2, 1))
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_shortfall_selection_keeps_order() {
    let jobs = persisted(vec![
        equipment_job("J-1", JobStatus::PendingStart, date(2024, 3, 1), None, &[("B-LIGHTS", 3)]),
        equipment_job("J-2", JobStatus::PendingStart, date(2024, 3, 2), None, &[("A-FRAME", 1)]),
        equipment_job("J-3", JobStatus::PendingStart, date(2024, 3, 3), None, &[("C-CONES", 4)]),
    ]);

    let rows = EquipmentForecastEngine::new()
        .project(
            &jobs,
            &baseline(&[("A-FRAME", 5), ("C-CONES", 1)]),
            date(2024, 2, 1),
            date(2024, 3, 10),
        )
        .unwrap();
    assert_eq!(rows.len(), 3);

    let shortfalls = select_shortfalls(&rows);
    let ids: Vec<&str> = shortfalls.iter().map(|r| r.resource_id.as_str()).collect();
    assert_eq!(ids, vec!["B-LIGHTS", "C-CONES"]);
    assert_eq!(shortfalls[0].need_to_order, 3);
    assert_eq!(shortfalls[1].need_to_order, 3);
}

// ==========================================
// 标志牌
// ==========================================

#[test]
fn test_sign_rows_merge_across_jobs() {
    let jobs = persisted(vec![
        sign_job(
            "S-1",
            JobStatus::OnGoing,
            date(2024, 1, 1),
            Some(date(2024, 1, 20)),
            &[("W20-1", "Road Work Ahead", 4), ("G20-2", "End Road Work", 2)],
        ),
        sign_job(
            "S-2",
            JobStatus::PendingStart,
            date(2024, 1, 25),
            None,
            &[("W20-1", "ROAD WORK AHEAD (48x48)", 3)],
        ),
    ]);

    let rows = SignForecastEngine::new()
        .project(&jobs, &baseline(&[("W20-1", 5)]), date(2024, 1, 10), date(2024, 2, 10))
        .unwrap();

    let ids: Vec<&str> = rows.iter().map(|r| r.resource_id.as_str()).collect();
    assert_eq!(ids, vec!["G20-2", "W20-1"]);

    let w20 = row(&rows, "W20-1");
    assert_eq!(w20.description.as_deref(), Some("Road Work Ahead"));
    assert_eq!(w20.in_use, 4);
    assert_eq!(w20.going_out, 3);
    assert_eq!(w20.returning, 4);
    assert_eq!(w20.need_to_order, 0);

    let g20 = row(&rows, "G20-2");
    assert_eq!(g20.current_inventory, 0);
    assert_eq!(g20.need_to_order, 0);
}

// ==========================================
// 不变量
// ==========================================

fn mixed_jobs() -> Vec<Job> {
    persisted(vec![
        equipment_job(
            "J-1",
            JobStatus::OnGoing,
            date(2024, 1, 1),
            Some(date(2024, 2, 5)),
            &[("TMA", 2), ("SQ POST", 12)],
        ),
        equipment_job("J-2", JobStatus::OnGoing, date(2024, 1, 10), None, &[("TMA", 1)]),
        equipment_job(
            "J-3",
            JobStatus::PendingStart,
            date(2024, 1, 20),
            Some(date(2024, 3, 1)),
            &[("SQ POST", 8), ("B-LIGHTS", 6)],
        ),
        equipment_job(
            "J-4",
            JobStatus::Complete,
            date(2023, 12, 1),
            Some(date(2024, 1, 18)),
            &[("B-LIGHTS", 4), ("TMA", 0)],
        ),
        equipment_job(
            "J-5",
            JobStatus::PendingStart,
            date(2024, 2, 20),
            Some(date(2024, 2, 28)),
            &[("TMA", 3)],
        ),
    ])
}

#[test]
fn test_projection_is_idempotent() {
    let jobs = mixed_jobs();
    let store = baseline(&[("TMA", 2), ("SQ POST", 10)]);
    let engine = EquipmentForecastEngine::new();

    let first = engine.project(&jobs, &store, date(2024, 1, 15), date(2024, 2, 15)).unwrap();
    let second = engine.project(&jobs, &store, date(2024, 1, 15), date(2024, 2, 15)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_need_to_order_matches_balance() {
    let jobs = mixed_jobs();
    let store = baseline(&[("TMA", 2), ("SQ POST", 10)]);

    let rows = EquipmentForecastEngine::new()
        .project(&jobs, &store, date(2024, 1, 15), date(2024, 2, 15))
        .unwrap();

    for r in &rows {
        assert!(r.need_to_order >= 0);
        assert!(r.in_use >= 0 && r.going_out >= 0 && r.returning >= 0);
        let short = r.current_inventory + r.returning < r.in_use + r.going_out;
        assert_eq!(r.need_to_order > 0, short, "资源 {}", r.resource_id);
        assert_eq!(
            r.need_to_order,
            (r.in_use + r.going_out - r.current_inventory - r.returning).max(0)
        );
    }
}

#[test]
fn test_widening_window_never_decreases_counts() {
    let jobs = mixed_jobs();
    let store = baseline(&[]);
    let engine = EquipmentForecastEngine::new();
    let master = date(2024, 1, 15);

    let mut previous: Option<Vec<ProjectionRow>> = None;
    for days in [0, 5, 20, 40, 90] {
        let forecast: NaiveDate = master + Duration::days(days);
        let rows = engine.project(&jobs, &store, master, forecast).unwrap();

        if let Some(prev) = &previous {
            assert_eq!(prev.len(), rows.len());
            for (a, b) in prev.iter().zip(rows.iter()) {
                assert_eq!(a.resource_id, b.resource_id);
                assert_eq!(a.in_use, b.in_use);
                assert!(b.going_out >= a.going_out);
                assert!(b.returning >= a.returning);
            }
        }
        previous = Some(rows);
    }
}

#[test]
fn test_empty_window_counts_only_in_use() {
    let jobs = mixed_jobs();
    let master = date(2024, 1, 15);

    let rows = EquipmentForecastEngine::new()
        .project(&jobs, &baseline(&[]), master, master)
        .unwrap();

    for r in &rows {
        assert_eq!(r.going_out, 0);
        assert_eq!(r.returning, 0);
    }
    assert_eq!(row(&rows, "TMA").in_use, 3);
    assert_eq!(row(&rows, "SQ POST").in_use, 12);
}

#[test]
fn test_zero_quantity_resource_still_listed() {
    let jobs = mixed_jobs();
    let rows = EquipmentForecastEngine::new()
        .project(&jobs, &baseline(&[]), date(2023, 11, 1), date(2023, 11, 2))
        .unwrap();

    let ids: Vec<&str> = rows.iter().map(|r| r.resource_id.as_str()).collect();
    assert_eq!(ids, vec!["B-LIGHTS", "SQ POST", "TMA"]);
    assert!(rows.iter().all(|r| r.need_to_order == 0));
}
