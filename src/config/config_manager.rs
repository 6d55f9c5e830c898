// ==========================================
// 交通管制作业看板 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::forecast_config_trait::ForecastConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::forecast::MissingInventoryPolicy;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 默认预测跨度（天）
pub const DEFAULT_HORIZON_DAYS: i64 = 30;

/// 预测跨度上限（天，绝对值）
pub const MAX_HORIZON_DAYS: i64 = 3_650;

/// 默认作业列表分页大小
pub const DEFAULT_PAGE_SIZE: usize = 50;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        tracing::debug!(config_key = key, "配置已写入");
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有 global 配置的快照（JSON格式，键有序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 解析库存种子（JSON: 资源ID → 数量），负数条目丢弃
    fn read_seed(&self, key: &str) -> Result<BTreeMap<String, i64>, Box<dyn Error>> {
        let value = self.get_config_or_default(key, "{}")?;
        let seed: BTreeMap<String, i64> = serde_json::from_str(&value).unwrap_or_else(|_| {
            tracing::warn!(
                config_key = key,
                raw_value = %value,
                "库存种子配置格式错误，使用空配置"
            );
            BTreeMap::new()
        });

        Ok(seed
            .into_iter()
            .filter(|(resource_id, count)| {
                if *count < 0 {
                    tracing::warn!(config_key = key, resource_id = %resource_id, count, "库存种子数量为负，已忽略");
                    false
                } else {
                    true
                }
            })
            .collect())
    }
}

// ==========================================
// ForecastConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ForecastConfigReader for ConfigManager {
    async fn get_missing_inventory_policy(&self) -> Result<MissingInventoryPolicy, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::MISSING_INVENTORY_POLICY, "ZERO")?;
        Ok(MissingInventoryPolicy::parse(&value).unwrap_or_else(|| {
            tracing::warn!(
                config_key = config_keys::MISSING_INVENTORY_POLICY,
                raw_value = %value,
                "缺失库存策略格式错误，使用 ZERO"
            );
            MissingInventoryPolicy::Zero
        }))
    }

    async fn get_default_horizon_days(&self) -> Result<i64, Box<dyn Error>> {
        let value = self.get_config_or_default(
            config_keys::DEFAULT_HORIZON_DAYS,
            &DEFAULT_HORIZON_DAYS.to_string(),
        )?;
        match value.trim().parse::<i64>() {
            Ok(days) if (-MAX_HORIZON_DAYS..=MAX_HORIZON_DAYS).contains(&days) => Ok(days),
            Ok(days) => {
                tracing::warn!(
                    config_key = config_keys::DEFAULT_HORIZON_DAYS,
                    days,
                    max = MAX_HORIZON_DAYS,
                    "预测跨度超出允许范围，使用默认值"
                );
                Ok(DEFAULT_HORIZON_DAYS)
            }
            Err(_) => {
                tracing::warn!(
                    config_key = config_keys::DEFAULT_HORIZON_DAYS,
                    raw_value = %value,
                    "预测跨度配置格式错误，使用默认值"
                );
                Ok(DEFAULT_HORIZON_DAYS)
            }
        }
    }

    async fn get_equipment_seed(&self) -> Result<BTreeMap<String, i64>, Box<dyn Error>> {
        self.read_seed(config_keys::EQUIPMENT_SEED)
    }

    async fn get_sign_seed(&self) -> Result<BTreeMap<String, i64>, Box<dyn Error>> {
        self.read_seed(config_keys::SIGN_SEED)
    }

    async fn get_page_size(&self) -> Result<usize, Box<dyn Error>> {
        let value =
            self.get_config_or_default(config_keys::PAGE_SIZE, &DEFAULT_PAGE_SIZE.to_string())?;
        match value.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => {
                tracing::warn!(
                    config_key = config_keys::PAGE_SIZE,
                    raw_value = %value,
                    "分页大小配置无效，使用默认值"
                );
                Ok(DEFAULT_PAGE_SIZE)
            }
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 预测
    pub const MISSING_INVENTORY_POLICY: &str = "forecast.missing_inventory_policy";
    pub const DEFAULT_HORIZON_DAYS: &str = "forecast.default_horizon_days";

    // 库存基线种子 (JSON)
    pub const EQUIPMENT_SEED: &str = "inventory.equipment_seed";
    pub const SIGN_SEED: &str = "inventory.sign_seed";

    // 作业列表
    pub const PAGE_SIZE: &str = "jobs.page_size";
}
