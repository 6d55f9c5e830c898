use super::extract::{EquipmentExtractor, ResourceExtractor, SignExtractor};
use crate::domain::forecast::{ForecastWindow, ProjectionRow};
use crate::domain::job::Job;
use crate::domain::types::JobStatus;
use crate::engine::baseline::InventoryBaselineStore;
use crate::engine::error::{ForecastError, ForecastResult};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use tracing::{debug, instrument};

/// 设备预测引擎
pub type EquipmentForecastEngine = InventoryForecastEngine<EquipmentExtractor>;

/// 标志牌预测引擎
pub type SignForecastEngine = InventoryForecastEngine<SignExtractor>;

// 单个资源的累加器
#[derive(Default)]
struct Tally {
    description: Option<String>,
    in_use: i64,
    going_out: i64,
    returning: i64,
}

// ==========================================
// InventoryForecastEngine - 库存预测引擎
// ==========================================
// 无状态，可重入
pub struct InventoryForecastEngine<E> {
    _extractor: PhantomData<E>,
}

impl<E: ResourceExtractor> Default for InventoryForecastEngine<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ResourceExtractor> InventoryForecastEngine<E> {
    pub fn new() -> Self {
        Self {
            _extractor: PhantomData,
        }
    }

    /// 计算预测结果
    ///
    /// # 规则（每个作业、每个数量 q > 0 的资源）
    /// - 在用: 状态为进行中 且 start <= master <= end（无 end 视为无限远）
    /// - 出库: master < start <= forecast
    /// - 回库: 有 end 且 master < end <= forecast 且状态为进行中/已完工
    /// - 需采购 = max(0, −(库存 + 回库 − 在用 − 出库))
    ///
    /// # 错误
    /// - 任一作业数量为负或完工日期早于开工日期 → Validation，整次调用失败
    /// - 同一资源数量累计超出 i64 → Validation
    #[instrument(skip(self, jobs, baseline), fields(
        kind = %E::KIND,
        job_count = jobs.len(),
        master = %master_date,
        forecast = %forecast_date,
    ))]
    pub fn project(
        &self,
        jobs: &[Job],
        baseline: &InventoryBaselineStore,
        master_date: NaiveDate,
        forecast_date: NaiveDate,
    ) -> ForecastResult<Vec<ProjectionRow>> {
        let window = ForecastWindow::new(master_date, forecast_date);
        let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();

        for job in jobs {
            Self::check_job(job)?;

            for demand in E::demands(job) {
                // 数量为 0 的资源也要出现在结果中
                let tally = tallies
                    .entry(demand.resource_id.to_string())
                    .or_insert_with(|| Tally {
                        description: demand.description.map(str::to_string),
                        ..Default::default()
                    });

                let q = demand.quantity;
                if q <= 0 {
                    continue;
                }

                if job.status == JobStatus::OnGoing && job.covers(master_date) {
                    Self::accumulate(&mut tally.in_use, q, demand.resource_id)?;
                }
                if window.contains_after_master(job.start_date) {
                    Self::accumulate(&mut tally.going_out, q, demand.resource_id)?;
                }
                if let Some(end) = job.end_date {
                    if job.status.has_started() && window.contains_after_master(end) {
                        Self::accumulate(&mut tally.returning, q, demand.resource_id)?;
                    }
                }
            }
        }

        let rows = tallies
            .into_iter()
            .map(|(resource_id, tally)| {
                let current_inventory = baseline.get(&resource_id);
                let mut row = ProjectionRow {
                    kind: E::KIND,
                    resource_id,
                    description: tally.description,
                    current_inventory,
                    in_use: tally.in_use,
                    going_out: tally.going_out,
                    returning: tally.returning,
                    need_to_order: 0,
                };
                row.need_to_order = Self::need_to_order(&row)?;
                Ok(row)
            })
            .collect::<ForecastResult<Vec<ProjectionRow>>>()?;

        debug!(
            rows = rows.len(),
            shortfalls = rows.iter().filter(|r| r.is_shortfall()).count(),
            "预测完成"
        );
        Ok(rows)
    }

    /// 以窗口对象调用 project
    pub fn project_window(
        &self,
        jobs: &[Job],
        baseline: &InventoryBaselineStore,
        window: ForecastWindow,
    ) -> ForecastResult<Vec<ProjectionRow>> {
        self.project(jobs, baseline, window.master_date, window.forecast_date)
    }

    fn accumulate(slot: &mut i64, quantity: i64, resource_id: &str) -> ForecastResult<()> {
        *slot = slot.checked_add(quantity).ok_or_else(|| {
            ForecastError::validation(
                E::FIELD,
                format!("资源 {} 数量累计溢出（+{}）", resource_id, quantity),
            )
        })?;
        Ok(())
    }

    // 需采购 = max(0, 在用 + 出库 − 库存 − 回库)，结果须可用 i64 表示
    fn need_to_order(row: &ProjectionRow) -> ForecastResult<i64> {
        let demand = i128::from(row.in_use) + i128::from(row.going_out);
        let supply = i128::from(row.current_inventory) + i128::from(row.returning);
        i64::try_from((demand - supply).max(0)).map_err(|_| {
            ForecastError::validation(
                E::FIELD,
                format!("资源 {} 需采购数量超出范围", row.resource_id),
            )
        })
    }

    // 仅校验与本资源种类相关的不变量
    fn check_job(job: &Job) -> ForecastResult<()> {
        if let Some(end) = job.end_date {
            if end < job.start_date {
                return Err(ForecastError::validation(
                    "end_date",
                    format!(
                        "作业 {} 完工日期 {} 早于开工日期 {}",
                        job.job_number, end, job.start_date
                    ),
                ));
            }
        }

        if let Some(bad) = E::demands(job).into_iter().find(|d| d.quantity < 0) {
            return Err(ForecastError::validation(
                E::FIELD,
                format!(
                    "作业 {} 资源 {} 数量为负: {}",
                    job.job_number, bad.resource_id, bad.quantity
                ),
            ));
        }

        Ok(())
    }
}
