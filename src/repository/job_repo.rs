// ==========================================
// 交通管制作业看板 - 作业仓储 Trait
// ==========================================
// 职责: 定义作业记录的数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// 实现者:
// - JobRepositoryImpl（rusqlite, etc_master_jobs 表）
// - InMemoryJobRepository（进程内存，无数据库会话/测试）
// ==========================================

use crate::domain::job::{Job, JobPatch, NewJob};
use crate::repository::error::RepositoryResult;

// ==========================================
// JobRepository Trait
// ==========================================
pub trait JobRepository: Send + Sync {
    /// 查询全部作业（按 id 升序）
    fn list_jobs(&self) -> RepositoryResult<Vec<Job>>;

    /// 按 id 查询作业
    ///
    /// # 返回
    /// - Ok(Some(Job)): 找到
    /// - Ok(None): 未找到
    fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Job>>;

    /// 新建作业，由仓储分配 id
    fn create_job(&self, job: &NewJob) -> RepositoryResult<Job>;

    /// 部分字段更新
    ///
    /// # 返回
    /// - Ok(Job): 更新后的完整作业
    /// - Err(NotFound): id 不存在
    fn update_job(&self, id: i64, patch: &JobPatch) -> RepositoryResult<Job>;

    /// 删除作业
    ///
    /// # 返回
    /// - Err(NotFound): id 不存在
    fn delete_job(&self, id: i64) -> RepositoryResult<()>;
}
