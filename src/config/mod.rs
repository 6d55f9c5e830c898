// ==========================================
// 交通管制作业看板 - 配置层
// ==========================================
// 职责: 系统配置管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod forecast_config_trait;

// 重导出核心配置管理器
pub use config_manager::{
    config_keys, ConfigManager, DEFAULT_HORIZON_DAYS, DEFAULT_PAGE_SIZE,
    MAX_HORIZON_DAYS,
};
pub use forecast_config_trait::ForecastConfigReader;
