// ==========================================
// 交通管制作业看板 - 预测配置读取 Trait
// ==========================================
// 职责: 定义预测/库存/作业列表所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::forecast::MissingInventoryPolicy;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::error::Error;

// ==========================================
// ForecastConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ForecastConfigReader: Send + Sync {
    /// 获取缺失库存策略
    ///
    /// # 默认值
    /// - ZERO
    async fn get_missing_inventory_policy(&self) -> Result<MissingInventoryPolicy, Box<dyn Error>>;

    /// 获取默认预测跨度（天），预测日期 = 今天 + N
    ///
    /// # 默认值
    /// - 30
    async fn get_default_horizon_days(&self) -> Result<i64, Box<dyn Error>>;

    /// 获取设备库存种子（设备名 → 数量）
    async fn get_equipment_seed(&self) -> Result<BTreeMap<String, i64>, Box<dyn Error>>;

    /// 获取标志牌库存种子（MUTCD 编码 → 数量）
    async fn get_sign_seed(&self) -> Result<BTreeMap<String, i64>, Box<dyn Error>>;

    /// 获取作业列表分页大小
    ///
    /// # 默认值
    /// - 50
    async fn get_page_size(&self) -> Result<usize, Box<dyn Error>>;
}
