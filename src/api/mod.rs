// ==========================================
// 交通管制作业看板 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行入口与上层调用
// ==========================================

pub mod error;
pub mod forecast_api;
pub mod job_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use forecast_api::ForecastApi;
pub use job_api::{JobApi, JobFilterOptions};
