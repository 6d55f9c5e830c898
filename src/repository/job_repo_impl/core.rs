use super::row::{format_date, format_timestamp, JobRow, JOB_COLUMNS};
use crate::domain::job::{Job, JobPatch, NewJob};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::job_repo::JobRepository;
use chrono::{NaiveDateTime, SubsecRound};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// JobRepositoryImpl - 作业仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
pub struct JobRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl JobRepositoryImpl {
    /// 创建新的作业仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 在已持有的连接上按 id 读取
    fn load(conn: &Connection, id: i64) -> RepositoryResult<Option<Job>> {
        let sql = format!("SELECT {} FROM etc_master_jobs WHERE id = ?1", JOB_COLUMNS);
        let row = conn
            .query_row(&sql, params![id], JobRow::from_row)
            .optional()?;

        row.map(JobRow::into_job).transpose()
    }

    /// 写入完整作业（UPDATE 全列）
    fn write(conn: &Connection, job: &Job) -> RepositoryResult<()> {
        conn.execute(
            r#"
            UPDATE etc_master_jobs SET
                job_number = ?2, bid_number = ?3, job_location = ?4, contractor = ?5,
                rate = ?6, fringe = ?7, is_rated = ?8, start_date = ?9, end_date = ?10,
                type = ?11, office = ?12, pm = ?13, job_status = ?14, sign_status = ?15,
                equipment_json = ?16, sign_list_json = ?17, remarks = ?18,
                last_updated_by = ?19, last_updated_at = ?20
            WHERE id = ?1
            "#,
            params![
                job.id,
                job.job_number,
                job.bid_number,
                job.location,
                job.contractor,
                job.rate,
                job.fringe,
                job.is_rated,
                format_date(job.start_date),
                job.end_date.map(format_date),
                job.job_type.to_db_str(),
                job.branch,
                job.project_manager,
                job.status.to_db_str(),
                job.sign_status.map(|s| s.as_str()),
                serde_json::to_string(&job.equipment)?,
                serde_json::to_string(&job.sign_list)?,
                job.remarks,
                job.last_updated_by,
                format_timestamp(job.last_updated_at),
            ],
        )?;
        Ok(())
    }

    fn now() -> NaiveDateTime {
        chrono::Local::now().naive_local().trunc_subsecs(0)
    }
}

impl JobRepository for JobRepositoryImpl {
    fn list_jobs(&self) -> RepositoryResult<Vec<Job>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM etc_master_jobs ORDER BY id ASC", JOB_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt
            .query_map([], JobRow::from_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        rows.into_iter().map(JobRow::into_job).collect()
    }

    fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Job>> {
        let conn = self.get_conn()?;
        Self::load(&conn, id)
    }

    fn create_job(&self, job: &NewJob) -> RepositoryResult<Job> {
        let conn = self.get_conn()?;
        // 先生成完整作业，复用 PM/分公司归一化
        let draft = job.clone().into_job(0, Self::now());

        conn.execute(
            r#"
            INSERT INTO etc_master_jobs (
                job_number, bid_number, job_location, contractor,
                rate, fringe, is_rated, start_date, end_date,
                type, office, pm, job_status, sign_status,
                equipment_json, sign_list_json, remarks, last_updated_by,
                created_at, last_updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
            "#,
            params![
                draft.job_number,
                draft.bid_number,
                draft.location,
                draft.contractor,
                draft.rate,
                draft.fringe,
                draft.is_rated,
                format_date(draft.start_date),
                draft.end_date.map(format_date),
                draft.job_type.to_db_str(),
                draft.branch,
                draft.project_manager,
                draft.status.to_db_str(),
                draft.sign_status.map(|s| s.as_str()),
                serde_json::to_string(&draft.equipment)?,
                serde_json::to_string(&draft.sign_list)?,
                draft.remarks,
                draft.last_updated_by,
                format_timestamp(draft.created_at),
                format_timestamp(draft.last_updated_at),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::load(&conn, id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "Job".to_string(),
            id: id.to_string(),
        })
    }

    fn update_job(&self, id: i64, patch: &JobPatch) -> RepositoryResult<Job> {
        let conn = self.get_conn()?;
        let mut job = Self::load(&conn, id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "Job".to_string(),
            id: id.to_string(),
        })?;

        job.apply_patch(patch);
        job.last_updated_at = Self::now();
        Self::write(&conn, &job)?;

        Ok(job)
    }

    fn delete_job(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM etc_master_jobs WHERE id = ?1", params![id])?;
        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Job".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
