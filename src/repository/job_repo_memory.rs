// ==========================================
// 交通管制作业看板 - 内存作业仓储
// ==========================================
// 用途: 无数据库会话、引擎/接口层测试
// 语义与 JobRepositoryImpl 保持一致（id 自增、NotFound、归一化）
// ==========================================

use crate::domain::job::{Job, JobPatch, NewJob};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::job_repo::JobRepository;
use chrono::SubsecRound;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

struct MemoryState {
    next_id: i64,
    jobs: BTreeMap<i64, Job>,
}

pub struct InMemoryJobRepository {
    state: Mutex<MemoryState>,
}

impl Default for InMemoryJobRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                next_id: 1,
                jobs: BTreeMap::new(),
            }),
        }
    }

    /// 以已有作业初始化（保留原 id，后续 id 从最大值之后分配）
    pub fn with_jobs(jobs: Vec<Job>) -> Self {
        let next_id = jobs.iter().map(|j| j.id).max().unwrap_or(0) + 1;
        let jobs = jobs.into_iter().map(|j| (j.id, j)).collect();
        Self {
            state: Mutex::new(MemoryState { next_id, jobs }),
        }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn not_found(id: i64) -> RepositoryError {
        RepositoryError::NotFound {
            entity: "Job".to_string(),
            id: id.to_string(),
        }
    }
}

impl JobRepository for InMemoryJobRepository {
    fn list_jobs(&self) -> RepositoryResult<Vec<Job>> {
        Ok(self.lock()?.jobs.values().cloned().collect())
    }

    fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Job>> {
        Ok(self.lock()?.jobs.get(&id).cloned())
    }

    fn create_job(&self, job: &NewJob) -> RepositoryResult<Job> {
        let mut state = self.lock()?;
        let id = state.next_id;
        state.next_id += 1;

        let now = chrono::Local::now().naive_local().trunc_subsecs(0);
        let created = job.clone().into_job(id, now);
        state.jobs.insert(id, created.clone());
        Ok(created)
    }

    fn update_job(&self, id: i64, patch: &JobPatch) -> RepositoryResult<Job> {
        let mut state = self.lock()?;
        let job = state.jobs.get_mut(&id).ok_or_else(|| Self::not_found(id))?;

        job.apply_patch(patch);
        job.last_updated_at = chrono::Local::now().naive_local().trunc_subsecs(0);
        Ok(job.clone())
    }

    fn delete_job(&self, id: i64) -> RepositoryResult<()> {
        let mut state = self.lock()?;
        state
            .jobs
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::JobStatus;
    use chrono::NaiveDate;

    fn new_job(number: &str) -> NewJob {
        NewJob::new(
            number,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            JobStatus::PendingStart,
        )
    }

    #[test]
    fn test_ids_are_sequential_and_not_reused() {
        let repo = InMemoryJobRepository::new();
        let a = repo.create_job(&new_job("A")).unwrap();
        let b = repo.create_job(&new_job("B")).unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        repo.delete_job(b.id).unwrap();
        let c = repo.create_job(&new_job("C")).unwrap();
        assert_eq!(c.id, 3);
        assert_eq!(repo.list_jobs().unwrap().len(), 2);
    }

    #[test]
    fn test_update_and_delete_missing() {
        let repo = InMemoryJobRepository::new();
        assert!(matches!(
            repo.update_job(9, &JobPatch::default()),
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(matches!(
            repo.delete_job(9),
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_with_jobs_continues_after_max_id() {
        let seed = new_job("S").into_job(
            40,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        let repo = InMemoryJobRepository::with_jobs(vec![seed]);
        let next = repo.create_job(&new_job("N")).unwrap();
        assert_eq!(next.id, 41);
        assert!(repo.find_by_id(40).unwrap().is_some());
    }
}
