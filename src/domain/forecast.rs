// ==========================================
// 交通管制作业看板 - 库存预测领域模型
// ==========================================
// 职责: 预测窗口、预测结果行、缺失库存策略
// 红线: 预测结果行是派生数据，不落库，每次查询重新计算
// ==========================================

use crate::domain::dates::{days_between, parse_calendar_date, DateParseError};
use crate::domain::types::ResourceKind;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ForecastWindow - 预测窗口
// ==========================================
// master_date: 基准日（"截至"日期，判定在用）
// forecast_date: 预测截止日（统计窗口内出库/回库）
// 预测截止日可早于基准日，引擎不校验方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastWindow {
    pub master_date: NaiveDate,
    pub forecast_date: NaiveDate,
}

impl ForecastWindow {
    pub fn new(master_date: NaiveDate, forecast_date: NaiveDate) -> Self {
        Self {
            master_date,
            forecast_date,
        }
    }

    /// 从字符串解析窗口
    pub fn parse(master_date: &str, forecast_date: &str) -> Result<Self, DateParseError> {
        Ok(Self {
            master_date: parse_calendar_date("master_date", master_date)?,
            forecast_date: parse_calendar_date("forecast_date", forecast_date)?,
        })
    }

    /// 以 today 为基准日，向后 horizon_days 天为预测截止日
    ///
    /// # 返回
    /// - None: 截止日超出可表示的日期范围
    pub fn starting_at(today: NaiveDate, horizon_days: i64) -> Option<Self> {
        let forecast_date = today.checked_add_signed(Duration::try_days(horizon_days)?)?;
        Some(Self {
            master_date: today,
            forecast_date,
        })
    }

    /// 窗口长度（天，可为负或零）
    pub fn days_between(&self) -> i64 {
        days_between(self.master_date, self.forecast_date)
    }

    /// master_date < date <= forecast_date
    ///
    /// 窗口左开右闭：基准日当天开工/完工的作业不计入出库/回库
    pub fn contains_after_master(&self, date: NaiveDate) -> bool {
        self.master_date < date && date <= self.forecast_date
    }
}

// ==========================================
// MissingInventoryPolicy - 缺失库存策略
// ==========================================
// 基线库存中查不到某资源时使用的取值
// 缺省 Zero：不默认假设资源存在
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingInventoryPolicy {
    #[default]
    Zero,
    Fixed(i64),
}

impl MissingInventoryPolicy {
    /// 缺失时的取值
    pub fn fallback(&self) -> i64 {
        match self {
            MissingInventoryPolicy::Zero => 0,
            MissingInventoryPolicy::Fixed(n) => *n,
        }
    }

    /// 从配置字符串解析: `ZERO` / `FIXED:<n>`（n ≥ 0）
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim().to_uppercase();
        if value == "ZERO" {
            return Some(MissingInventoryPolicy::Zero);
        }
        let n = value.strip_prefix("FIXED:")?.trim().parse::<i64>().ok()?;
        if n < 0 {
            return None;
        }
        Some(MissingInventoryPolicy::Fixed(n))
    }
}

impl fmt::Display for MissingInventoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingInventoryPolicy::Zero => write!(f, "ZERO"),
            MissingInventoryPolicy::Fixed(n) => write!(f, "FIXED:{}", n),
        }
    }
}

// ==========================================
// ProjectionRow - 预测结果行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub kind: ResourceKind,
    pub resource_id: String,         // 设备名称 或 MUTCD 编码
    pub description: Option<String>, // 标志牌描述（设备为 None）

    pub current_inventory: i64, // 当前库存
    pub in_use: i64,            // 基准日在用
    pub going_out: i64,         // 窗口内出库
    pub returning: i64,         // 窗口内回库
    pub need_to_order: i64,     // 需采购
}

impl ProjectionRow {
    /// 预计可用 = 当前库存 + 回库 − 在用 − 出库（超出 i64 时取边界值）
    pub fn projected_available(&self) -> i64 {
        let balance = i128::from(self.current_inventory) + i128::from(self.returning)
            - i128::from(self.in_use)
            - i128::from(self.going_out);
        balance.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }

    /// 是否存在缺口
    pub fn is_shortfall(&self) -> bool {
        self.need_to_order > 0
    }
}
