// ==========================================
// 交通管制作业看板 - 演示数据初始化
// ==========================================
// 用法: seed_demo_jobs [db_path] [job_count]
// 生成确定性的演示作业（相对今天 -60..+60 天），
// 并把默认库存写入 inventory.* 配置
// ==========================================

use chrono::{Duration, Local, NaiveDate};
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

use etc_job_board::app::get_default_db_path;
use etc_job_board::config::{config_keys, ConfigManager};
use etc_job_board::db::{init_schema, open_sqlite_connection};
use etc_job_board::domain::{JobStatus, NewJob, SignItem, SignStatus};
use etc_job_board::repository::{JobRepository, JobRepositoryImpl};

const DEFAULT_JOB_COUNT: usize = 150;

const EQUIPMENT: [(&str, i64, i64); 17] = [
    // (名称, 单个作业上限, 默认库存)
    ("4' TYPE III", 20, 150),
    ("6' TYPE III", 15, 120),
    ("8' TYPE III", 10, 80),
    ("SQ POST", 50, 500),
    ("H STAND", 30, 300),
    ("VP", 25, 250),
    ("SHARPS", 40, 400),
    ("Y/B LITE", 12, 100),
    ("R/B LITE", 12, 100),
    ("W/B LITE", 12, 100),
    ("TMA", 3, 25),
    ("C LITE", 8, 75),
    ("S. TRL", 2, 15),
    ("A. BOARD", 3, 20),
    ("M. BOARD", 2, 15),
    ("UC POST", 35, 350),
    ("SEQ LIGHT", 15, 120),
];

const SIGNS: [(&str, &str, i64); 10] = [
    // (MUTCD 编码, 描述, 默认库存)
    ("W20-2", "Road Closed", 60),
    ("R1-1", "Stop Sign", 80),
    ("W1-1", "Turn", 70),
    ("W3-1", "Stop Ahead", 50),
    ("W20-1", "Road Work Ahead", 90),
    ("W21-1", "Detour", 40),
    ("W4-2", "Lane Ends", 55),
    ("R2-1", "Yield", 75),
    ("W11-1", "Bicycle Warning", 45),
    ("W20-7", "Flagger Ahead", 65),
];

const LOCATIONS: [&str; 10] = [
    "Highway 101 - Mile 45",
    "Main St & 5th Ave",
    "Interstate 5 - Exit 23",
    "Broadway & Oak St",
    "Route 66 - Mile 120",
    "Pacific Coast Hwy",
    "Downtown District",
    "Airport Access Road",
    "Harbor Blvd",
    "Industrial Park Entrance",
];

const CONTRACTORS: [&str; 5] = [
    "SafeZone Traffic Control",
    "RoadGuard Services",
    "Metro Traffic Solutions",
    "Highway Safety Corp",
    "Summit Traffic Safety",
];

const PROJECT_MANAGERS: [&str; 4] = ["john nelson", "larry long", "jim redden", "richard gresh"];
const BRANCHES: [&str; 3] = ["hatfield", "turbotville", "bedford"];
const SIGN_STATUSES: [SignStatus; 5] = [
    SignStatus::Complete,
    SignStatus::InProcess,
    SignStatus::NotReceived,
    SignStatus::Received,
    SignStatus::NotInProcess,
];

fn main() -> Result<(), Box<dyn Error>> {
    etc_job_board::logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    let job_count = std::env::args()
        .nth(2)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_JOB_COUNT);

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    let repo = JobRepositoryImpl::new(conn.clone());
    let today = Local::now().date_naive();
    for i in 0..job_count {
        repo.create_job(&demo_job(i, today))?;
    }

    let config = ConfigManager::from_connection(conn)?;
    let equipment_seed: BTreeMap<&str, i64> =
        EQUIPMENT.iter().map(|(name, _, stock)| (*name, *stock)).collect();
    let sign_seed: BTreeMap<&str, i64> =
        SIGNS.iter().map(|(code, _, stock)| (*code, *stock)).collect();
    config.set_global_config_value(
        config_keys::EQUIPMENT_SEED,
        &serde_json::to_string(&equipment_seed)?,
    )?;
    config.set_global_config_value(config_keys::SIGN_SEED, &serde_json::to_string(&sign_seed)?)?;

    tracing::info!(db_path = %db_path, jobs = job_count, "演示数据已写入");
    Ok(())
}

// 线性同余序列，保证每次生成结果一致
fn pick(i: usize, salt: usize, modulo: usize) -> usize {
    (i.wrapping_mul(2_654_435_761).wrapping_add(salt.wrapping_mul(40_503))) % modulo.max(1)
}

fn demo_job(i: usize, today: NaiveDate) -> NewJob {
    let offset = pick(i, 1, 120) as i64 - 60;
    let duration = pick(i, 2, 28) as i64 + 3;
    let start = today + Duration::days(offset);
    let end = start + Duration::days(duration);

    let status = if start > today {
        JobStatus::PendingStart
    } else if end < today {
        JobStatus::Complete
    } else {
        JobStatus::OnGoing
    };

    let mut job = NewJob::new(&format!("JOB-{:04}", i + 1), start, status);
    job.end_date = Some(end);
    job.bid_number = Some(format!("BID-{:04}", i + 1));
    job.location = Some(LOCATIONS[pick(i, 3, LOCATIONS.len())].to_string());
    job.contractor = Some(CONTRACTORS[pick(i, 4, CONTRACTORS.len())].to_string());
    job.project_manager = Some(PROJECT_MANAGERS[pick(i, 5, PROJECT_MANAGERS.len())].to_string());
    job.branch = Some(BRANCHES[pick(i, 6, BRANCHES.len())].to_string());
    job.last_updated_by = Some("seed".to_string());

    for (k, (name, max, _)) in EQUIPMENT.iter().enumerate() {
        job.equipment
            .insert(name.to_string(), pick(i, 10 + k, *max as usize) as i64);
    }

    // 标志牌状态只跟踪待开工作业
    if status == JobStatus::PendingStart {
        job.sign_status = Some(SIGN_STATUSES[pick(i, 7, SIGN_STATUSES.len())]);
    }

    let count = pick(i, 8, 5) + 3;
    for n in 0..count {
        let (code, description, _) = SIGNS[pick(i, 30 + n, SIGNS.len())];
        let qty = pick(i, 50 + n, 4) as i64 + 1;
        match job.sign_list.iter_mut().find(|s| s.code == code) {
            Some(existing) => existing.quantity += qty,
            None => job.sign_list.push(SignItem::new(code, description, qty)),
        }
    }

    job
}
