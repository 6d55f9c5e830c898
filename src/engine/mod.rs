// ==========================================
// 交通管制作业看板 - 引擎层
// ==========================================
// 职责: 实现库存预测与报表规则,不拼 SQL
// 红线: Engine 不拼 SQL, 不持有数据库连接
// ==========================================

pub mod baseline;
pub mod error;
pub mod export;
pub mod forecast;
pub mod job_filter;
pub mod shortfall;

// 重导出核心引擎
pub use baseline::InventoryBaselineStore;
pub use error::{ForecastError, ForecastResult};
pub use export::{export_csv, export_file_name, write_export, CsvReport, ExportOutcome};
pub use forecast::{
    EquipmentExtractor, EquipmentForecastEngine, InventoryForecastEngine, ResourceExtractor,
    SignExtractor, SignForecastEngine,
};
pub use job_filter::{distinct_branches, distinct_project_managers, paginate, JobFilter, JobPage};
pub use shortfall::{search_rows, select_shortfalls};
