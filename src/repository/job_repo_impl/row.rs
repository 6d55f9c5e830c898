use crate::domain::dates::{parse_calendar_date, parse_optional_calendar_date, DATE_FORMAT};
use crate::domain::job::{normalize_branch, normalize_project_manager, Job, SignItem};
use crate::domain::types::{JobStatus, JobType, SignStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Result as SqliteResult, Row};
use std::collections::BTreeMap;

/// 时间戳存储格式
pub(super) const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// SELECT 列清单（与 JobRow::from_row 的下标一一对应）
pub(super) const JOB_COLUMNS: &str = r#"
    id, job_number, bid_number, job_location, contractor,
    rate, fringe, is_rated, start_date, end_date,
    type, office, pm, job_status, sign_status,
    equipment_json, sign_list_json, remarks, last_updated_by,
    created_at, last_updated_at
"#;

// ==========================================
// JobRow - 原始行
// ==========================================
// 先按文本读出，再在闭包外做日期/JSON 解析，
// 解析失败以 RepositoryError 返回，不做静默回退
pub(super) struct JobRow {
    id: i64,
    job_number: String,
    bid_number: Option<String>,
    job_location: Option<String>,
    contractor: Option<String>,
    rate: Option<f64>,
    fringe: Option<f64>,
    is_rated: bool,
    start_date: String,
    end_date: Option<String>,
    job_type: Option<String>,
    office: Option<String>,
    pm: Option<String>,
    job_status: Option<String>,
    sign_status: Option<String>,
    equipment_json: Option<String>,
    sign_list_json: Option<String>,
    remarks: Option<String>,
    last_updated_by: Option<String>,
    created_at: String,
    last_updated_at: String,
}

impl JobRow {
    pub(super) fn from_row(row: &Row<'_>) -> SqliteResult<Self> {
        Ok(Self {
            id: row.get(0)?,
            job_number: row.get(1)?,
            bid_number: row.get(2)?,
            job_location: row.get(3)?,
            contractor: row.get(4)?,
            rate: row.get(5)?,
            fringe: row.get(6)?,
            is_rated: row.get::<_, Option<i64>>(7)?.map_or(true, |v| v != 0),
            start_date: row.get(8)?,
            end_date: row.get(9)?,
            job_type: row.get(10)?,
            office: row.get(11)?,
            pm: row.get(12)?,
            job_status: row.get(13)?,
            sign_status: row.get(14)?,
            equipment_json: row.get(15)?,
            sign_list_json: row.get(16)?,
            remarks: row.get(17)?,
            last_updated_by: row.get(18)?,
            created_at: row.get(19)?,
            last_updated_at: row.get(20)?,
        })
    }

    pub(super) fn into_job(self) -> RepositoryResult<Job> {
        let equipment: BTreeMap<String, i64> = match self.equipment_json.as_deref() {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw)?,
            _ => BTreeMap::new(),
        };
        let sign_list: Vec<SignItem> = match self.sign_list_json.as_deref() {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw)?,
            _ => Vec::new(),
        };

        Ok(Job {
            id: self.id,
            job_number: self.job_number,
            bid_number: self.bid_number,
            location: self.job_location,
            contractor: self.contractor,
            project_manager: normalize_project_manager(self.pm.as_deref()),
            branch: normalize_branch(self.office.as_deref()),
            job_type: JobType::from_db_str(self.job_type.as_deref().unwrap_or_default()),
            rate: self.rate,
            fringe: self.fringe,
            is_rated: self.is_rated,
            start_date: parse_calendar_date("start_date", &self.start_date)?,
            end_date: parse_optional_calendar_date("end_date", self.end_date.as_deref())?,
            status: JobStatus::from_db_str(self.job_status.as_deref().unwrap_or_default()),
            sign_status: self.sign_status.as_deref().and_then(SignStatus::parse),
            equipment,
            sign_list,
            remarks: self.remarks,
            last_updated_by: self.last_updated_by,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            last_updated_at: parse_timestamp("last_updated_at", &self.last_updated_at)?,
        })
    }
}

fn parse_timestamp(field: &str, raw: &str) -> RepositoryResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TS_FORMAT).map_err(|e| {
        RepositoryError::FieldValueError {
            field: field.to_string(),
            message: format!("时间戳格式错误 '{}': {}", raw, e),
        }
    })
}

pub(super) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(super) fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}
