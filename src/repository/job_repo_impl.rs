// ==========================================
// 交通管制作业看板 - 作业数据仓储 (SQLite)
// ==========================================
// 对齐: etc_master_jobs 表
// 红线: Repository 不含业务逻辑
// ==========================================

mod core;
mod row;


pub use self::core::JobRepositoryImpl;
