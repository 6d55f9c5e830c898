// ==========================================
// 交通管制作业看板 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、不变量校验
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod dates;
pub mod forecast;
pub mod job;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use dates::{parse_calendar_date, DateParseError};
pub use forecast::{ForecastWindow, MissingInventoryPolicy, ProjectionRow};
pub use job::{Job, JobPatch, JobViolation, NewJob, SignItem};
pub use types::{JobStatus, JobType, ResourceKind, SignStatus};
