// ==========================================
// 交通管制作业看板 - 库存预测 API
// ==========================================
// 职责:
// 1. 设备/标志牌汇总表（按窗口实时计算）
// 2. 需采购清单与 CSV 导出
// 3. 库存基线查询与调整（记录 ActionLog）
// 红线: 预测结果不落库，每次调用重新计算
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::forecast_config_trait::ForecastConfigReader;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::forecast::{ForecastWindow, ProjectionRow};
use crate::domain::types::ResourceKind;
use crate::engine::baseline::InventoryBaselineStore;
use crate::engine::export::{export_csv, write_export, ExportOutcome};
use crate::engine::forecast::{EquipmentForecastEngine, SignForecastEngine};
use crate::engine::shortfall::{search_rows, select_shortfalls};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::job_repo::JobRepository;
use chrono::NaiveDate;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

// ==========================================
// ForecastApi - 库存预测 API
// ==========================================
pub struct ForecastApi {
    job_repo: Arc<dyn JobRepository>,
    equipment_baseline: Mutex<InventoryBaselineStore>,
    sign_baseline: Mutex<InventoryBaselineStore>,
    action_log_repo: Option<Arc<ActionLogRepository>>,
    equipment_engine: EquipmentForecastEngine,
    sign_engine: SignForecastEngine,
}

impl ForecastApi {
    pub fn new(
        job_repo: Arc<dyn JobRepository>,
        equipment_baseline: InventoryBaselineStore,
        sign_baseline: InventoryBaselineStore,
        action_log_repo: Option<Arc<ActionLogRepository>>,
    ) -> Self {
        Self {
            job_repo,
            equipment_baseline: Mutex::new(equipment_baseline),
            sign_baseline: Mutex::new(sign_baseline),
            action_log_repo,
            equipment_engine: EquipmentForecastEngine::new(),
            sign_engine: SignForecastEngine::new(),
        }
    }

    /// 按配置（缺失库存策略 + 库存种子）初始化基线
    pub async fn from_config(
        job_repo: Arc<dyn JobRepository>,
        config: &dyn ForecastConfigReader,
        action_log_repo: Option<Arc<ActionLogRepository>>,
    ) -> ApiResult<Self> {
        let policy = config
            .get_missing_inventory_policy()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let equipment_seed = config
            .get_equipment_seed()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let sign_seed = config
            .get_sign_seed()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        info!(
            policy = %policy,
            equipment = equipment_seed.len(),
            signs = sign_seed.len(),
            "库存基线已从配置加载"
        );

        Ok(Self::new(
            job_repo,
            InventoryBaselineStore::with_counts(policy, equipment_seed)?,
            InventoryBaselineStore::with_counts(policy, sign_seed)?,
            action_log_repo,
        ))
    }

    /// 默认窗口: 今天 .. 今天 + 配置跨度
    pub async fn default_window(
        config: &dyn ForecastConfigReader,
        today: NaiveDate,
    ) -> ApiResult<ForecastWindow> {
        let horizon = config
            .get_default_horizon_days()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        ForecastWindow::starting_at(today, horizon).ok_or_else(|| {
            ApiError::ConfigError(format!("预测跨度超出日期范围: {} 天", horizon))
        })
    }

    // ==========================================
    // 汇总表
    // ==========================================

    /// 计算指定种类的汇总表
    pub fn summary(&self, kind: ResourceKind, window: ForecastWindow) -> ApiResult<Vec<ProjectionRow>> {
        let jobs = self.job_repo.list_jobs()?;
        let baseline = self.baseline(kind)?;

        let rows = match kind {
            ResourceKind::Equipment => self.equipment_engine.project_window(&jobs, &baseline, window)?,
            ResourceKind::Signs => self.sign_engine.project_window(&jobs, &baseline, window)?,
        };
        Ok(rows)
    }

    /// 设备汇总表（日期字符串 YYYY-MM-DD）
    pub fn equipment_summary(&self, master_date: &str, forecast_date: &str) -> ApiResult<Vec<ProjectionRow>> {
        let window = ForecastWindow::parse(master_date, forecast_date)
            .map_err(|e| ApiError::DateParseError(e.to_string()))?;
        self.summary(ResourceKind::Equipment, window)
    }

    /// 标志牌汇总表（日期字符串 YYYY-MM-DD）
    pub fn sign_summary(&self, master_date: &str, forecast_date: &str) -> ApiResult<Vec<ProjectionRow>> {
        let window = ForecastWindow::parse(master_date, forecast_date)
            .map_err(|e| ApiError::DateParseError(e.to_string()))?;
        self.summary(ResourceKind::Signs, window)
    }

    /// 汇总表关键字搜索
    pub fn search_summary(
        &self,
        kind: ResourceKind,
        window: ForecastWindow,
        query: &str,
    ) -> ApiResult<Vec<ProjectionRow>> {
        let rows = self.summary(kind, window)?;
        Ok(search_rows(&rows, query))
    }

    /// 需采购清单
    pub fn need_to_order(&self, kind: ResourceKind, window: ForecastWindow) -> ApiResult<Vec<ProjectionRow>> {
        let rows = self.summary(kind, window)?;
        Ok(select_shortfalls(&rows))
    }

    // ==========================================
    // 报表导出
    // ==========================================

    /// 生成需采购 CSV 报表
    ///
    /// # 返回
    /// - Exported: 报表内容（记录 EXPORT_REPORT）
    /// - NothingToExport: 无缺口，不生成报表
    pub fn export_need_to_order(
        &self,
        kind: ResourceKind,
        window: ForecastWindow,
        generated_on: NaiveDate,
        actor: &str,
    ) -> ApiResult<ExportOutcome> {
        let shortfalls = self.need_to_order(kind, window)?;
        let outcome = export_csv(&shortfalls, kind, generated_on)?;

        match &outcome {
            ExportOutcome::Exported(report) => {
                info!(kind = %kind, rows = report.row_count, file = %report.file_name, actor, "需采购报表已生成");
                self.record(
                    ActionLog::new(ActionType::ExportReport, actor)
                        .with_payload(json!({
                            "kind": kind.slug(),
                            "master_date": window.master_date.to_string(),
                            "forecast_date": window.forecast_date.to_string(),
                            "rows": report.row_count,
                        }))
                        .with_detail(report.file_name.clone()),
                )?;
            }
            ExportOutcome::NothingToExport => {
                warn!(kind = %kind, "无需采购项，未生成报表");
            }
        }
        Ok(outcome)
    }

    /// 生成并写入报表
    ///
    /// # 返回
    /// - Ok(Some(path)): 已写入
    /// - Ok(None): 无可导出内容，未写文件
    pub fn write_need_to_order(
        &self,
        kind: ResourceKind,
        window: ForecastWindow,
        generated_on: NaiveDate,
        dir: &Path,
        actor: &str,
    ) -> ApiResult<Option<PathBuf>> {
        match self.export_need_to_order(kind, window, generated_on, actor)? {
            ExportOutcome::Exported(report) => Ok(Some(write_export(dir, &report)?)),
            ExportOutcome::NothingToExport => Ok(None),
        }
    }

    // ==========================================
    // 库存基线
    // ==========================================

    pub fn get_inventory(&self, kind: ResourceKind, resource_id: &str) -> ApiResult<i64> {
        Ok(self.baseline(kind)?.get(resource_id))
    }

    pub fn inventory_snapshot(&self, kind: ResourceKind) -> ApiResult<BTreeMap<String, i64>> {
        Ok(self.baseline(kind)?.snapshot())
    }

    /// 调整库存（负数拒绝，状态不变）
    ///
    /// 审计写入失败时回滚为调整前的值
    pub fn update_inventory(
        &self,
        kind: ResourceKind,
        resource_id: &str,
        value: i64,
        actor: &str,
    ) -> ApiResult<()> {
        let mut baseline = self.baseline(kind)?;
        let old = baseline.set(resource_id, value)?;

        let recorded = self.record(
            ActionLog::new(ActionType::AdjustInventory, actor)
                .with_resource(resource_id)
                .with_payload(json!({
                    "kind": kind.slug(),
                    "old": old,
                    "new": value,
                }))
                .with_detail(format!("{} 库存调整为 {}", resource_id, value)),
        );
        if let Err(e) = recorded {
            baseline.restore(resource_id, old);
            warn!(kind = %kind, resource_id, error = %e, "操作日志写入失败，库存调整已回滚");
            return Err(e);
        }

        info!(kind = %kind, resource_id, value, old = ?old, actor, "库存已调整");
        Ok(())
    }

    fn baseline(&self, kind: ResourceKind) -> ApiResult<MutexGuard<'_, InventoryBaselineStore>> {
        let store = match kind {
            ResourceKind::Equipment => &self.equipment_baseline,
            ResourceKind::Signs => &self.sign_baseline,
        };
        store
            .lock()
            .map_err(|e| ApiError::InternalError(format!("库存基线锁获取失败: {}", e)))
    }

    fn record(&self, log: ActionLog) -> ApiResult<()> {
        if let Some(repo) = &self.action_log_repo {
            repo.insert(&log)?;
        }
        Ok(())
    }
}
