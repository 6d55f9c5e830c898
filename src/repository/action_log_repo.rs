// ==========================================
// 交通管制作业看板 - 操作日志数据仓储
// ==========================================
// 对齐: action_log 表
// 红线: 所有人工写入必须记录
// ==========================================

mod core;
mod queries;

#[cfg(test)]
mod tests;

pub use self::core::ActionLogRepository;
