// ==========================================
// 交通管制作业看板 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 交通管制作业排期 + 设备/标志牌库存预测
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 预测与报表规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{JobStatus, JobType, ResourceKind, SignStatus};

// 领域实体
pub use domain::{
    ActionLog, ActionType, ForecastWindow, Job, JobPatch, MissingInventoryPolicy, NewJob,
    ProjectionRow, SignItem,
};

// 引擎
pub use engine::{
    EquipmentForecastEngine, ExportOutcome, ForecastError, InventoryBaselineStore,
    InventoryForecastEngine, SignForecastEngine,
};

// API
pub use api::{ForecastApi, JobApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "交通管制作业看板";
