// ==========================================
// 交通管制作业看板 - 作业 API
// ==========================================
// 职责: 作业增删改查、筛选分页、筛选项
// 红线: 所有写入先校验再落库，并记录 ActionLog
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::job::{Job, JobPatch, NewJob};
use crate::engine::job_filter::{
    distinct_branches, distinct_project_managers, paginate, JobFilter, JobPage,
};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::job_repo::JobRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// 筛选项（下拉列表）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFilterOptions {
    pub project_managers: Vec<String>,
    pub branches: Vec<String>,
}

// ==========================================
// JobApi - 作业 API
// ==========================================
pub struct JobApi {
    job_repo: Arc<dyn JobRepository>,
    action_log_repo: Option<Arc<ActionLogRepository>>,
}

impl JobApi {
    pub fn new(
        job_repo: Arc<dyn JobRepository>,
        action_log_repo: Option<Arc<ActionLogRepository>>,
    ) -> Self {
        Self {
            job_repo,
            action_log_repo,
        }
    }

    /// 查询全部作业
    pub fn list_jobs(&self) -> ApiResult<Vec<Job>> {
        Ok(self.job_repo.list_jobs()?)
    }

    /// 查询单个作业
    ///
    /// # 返回
    /// - Err(NotFound): id 不存在
    pub fn get_job(&self, id: i64) -> ApiResult<Job> {
        self.job_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Job(id={})不存在", id)))
    }

    /// 按条件筛选并分页
    pub fn search_jobs(&self, filter: &JobFilter, page: usize, page_size: usize) -> ApiResult<JobPage> {
        let jobs = self.job_repo.list_jobs()?;
        let filtered = filter.apply(&jobs);
        debug!(total = jobs.len(), matched = filtered.len(), page, "作业筛选完成");
        Ok(paginate(filtered, page, page_size))
    }

    /// 项目经理/分公司筛选项
    pub fn filter_options(&self) -> ApiResult<JobFilterOptions> {
        let jobs = self.job_repo.list_jobs()?;
        Ok(JobFilterOptions {
            project_managers: distinct_project_managers(&jobs),
            branches: distinct_branches(&jobs),
        })
    }

    /// 新建作业
    ///
    /// # 校验
    /// - 作业编号非空、完工日期不早于开工日期、数量非负、标志牌编码非空
    pub fn create_job(&self, new_job: NewJob, actor: &str) -> ApiResult<Job> {
        new_job
            .validate()
            .map_err(|v| ApiError::ValidationError(v.to_string()))?;

        let job = self.job_repo.create_job(&new_job)?;
        info!(job_id = job.id, job_number = %job.job_number, actor, "作业已创建");

        self.record(
            ActionLog::new(ActionType::CreateJob, actor)
                .with_job(job.id)
                .with_payload(serde_json::to_value(&new_job).map_err(anyhow::Error::from)?)
                .with_detail(format!("新建作业 {}", job.job_number)),
        )?;
        Ok(job)
    }

    /// 部分字段更新
    ///
    /// 合并后的作业必须仍满足不变量，否则不落库
    pub fn update_job(&self, id: i64, patch: &JobPatch, actor: &str) -> ApiResult<Job> {
        if patch.is_empty() {
            return Err(ApiError::InvalidInput("更新内容不能为空".to_string()));
        }

        let mut preview = self.get_job(id)?;
        preview.apply_patch(patch);
        preview
            .validate()
            .map_err(|v| ApiError::ValidationError(v.to_string()))?;

        let job = self.job_repo.update_job(id, patch)?;
        info!(job_id = id, actor, "作业已更新");

        self.record(
            ActionLog::new(ActionType::UpdateJob, actor)
                .with_job(id)
                .with_payload(serde_json::to_value(patch).map_err(anyhow::Error::from)?)
                .with_detail(format!("修改作业 {}", job.job_number)),
        )?;
        Ok(job)
    }

    /// 删除作业
    pub fn delete_job(&self, id: i64, actor: &str) -> ApiResult<()> {
        let job = self.get_job(id)?;
        self.job_repo.delete_job(id)?;
        info!(job_id = id, actor, "作业已删除");

        self.record(
            ActionLog::new(ActionType::DeleteJob, actor)
                .with_job(id)
                .with_detail(format!("删除作业 {}", job.job_number)),
        )
    }

    fn record(&self, log: ActionLog) -> ApiResult<()> {
        if let Some(repo) = &self.action_log_repo {
            repo.insert(&log)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::JobStatus;
    use crate::repository::job_repo_memory::InMemoryJobRepository;
    use chrono::NaiveDate;

    fn api() -> JobApi {
        JobApi::new(Arc::new(InMemoryJobRepository::new()), None)
    }

    fn new_job(number: &str) -> NewJob {
        NewJob::new(
            number,
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            JobStatus::PendingStart,
        )
    }

    #[test]
    fn test_create_rejects_blank_job_number() {
        let err = api().create_job(new_job("  "), "tester").unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[test]
    fn test_update_rejects_reversed_dates_without_writing() {
        let api = api();
        let job = api.create_job(new_job("J-1"), "tester").unwrap();

        let patch = JobPatch {
            end_date: Some(NaiveDate::from_ymd_opt(2024, 3, 1)),
            ..Default::default()
        };
        assert!(matches!(
            api.update_job(job.id, &patch, "tester"),
            Err(ApiError::ValidationError(_))
        ));
        assert_eq!(api.get_job(job.id).unwrap().end_date, None);
    }

    #[test]
    fn test_empty_patch_is_invalid() {
        let api = api();
        let job = api.create_job(new_job("J-1"), "tester").unwrap();
        assert!(matches!(
            api.update_job(job.id, &JobPatch::default(), "tester"),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        assert!(matches!(api().delete_job(3, "tester"), Err(ApiError::NotFound(_))));
    }
}
