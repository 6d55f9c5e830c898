// ==========================================
// 交通管制作业看板 - 作业领域模型
// ==========================================
// 对齐: etc_master_jobs 表
// 说明: 设备需求为开放键集合 (设备名 → 数量)，
//       标志牌需求为有序列表 (MUTCD 编码 + 描述 + 数量)
// ==========================================

use crate::domain::types::{JobStatus, JobType, SignStatus};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 项目经理缺省值
pub const DEFAULT_PROJECT_MANAGER: &str = "NELSON";

/// 分公司缺省值
pub const DEFAULT_BRANCH: &str = "hatfield";

// ==========================================
// SignItem - 标志牌需求条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignItem {
    pub code: String,        // MUTCD 编码 (如 W20-2)
    pub description: String, // 描述 (如 Road Closed)
    pub quantity: i64,       // 数量 (≥ 0)
}

impl SignItem {
    pub fn new(code: &str, description: &str, quantity: i64) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
            quantity,
        }
    }
}

// ==========================================
// Job - 交通管制作业
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    // ===== 主键 =====
    pub id: i64,

    // ===== 基础信息 =====
    pub job_number: String,          // 作业编号
    pub bid_number: Option<String>,  // 投标编号
    pub location: Option<String>,    // 作业地点
    pub contractor: Option<String>,  // 承包商
    pub project_manager: String,     // 项目经理（大写）
    pub branch: String,              // 分公司（小写）
    pub job_type: JobType,           // 公共/私人
    pub rate: Option<f64>,           // 费率
    pub fringe: Option<f64>,         // 附加费率
    pub is_rated: bool,              // 是否计费

    // ===== 时间范围 =====
    pub start_date: NaiveDate,       // 开工日期
    pub end_date: Option<NaiveDate>, // 完工日期 (None 表示持续进行)

    // ===== 状态 =====
    pub status: JobStatus,
    pub sign_status: Option<SignStatus>,

    // ===== 资源需求 =====
    pub equipment: BTreeMap<String, i64>,
    pub sign_list: Vec<SignItem>,

    // ===== 审计字段 =====
    pub remarks: Option<String>,
    pub last_updated_by: Option<String>,
    pub created_at: NaiveDateTime,
    pub last_updated_at: NaiveDateTime,
}

impl Job {
    /// 显示名称：作业地点，缺失时退回作业编号
    pub fn display_name(&self) -> &str {
        match self.location.as_deref() {
            Some(loc) if !loc.trim().is_empty() => loc,
            _ => &self.job_number,
        }
    }

    /// 作业在指定日期是否处于日期区间内（闭区间，无完工日期视为无限远）
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.map_or(true, |end| date <= end)
    }

    /// 校验作业不变量
    ///
    /// - 作业编号非空
    /// - end_date >= start_date
    /// - 设备/标志牌数量 ≥ 0
    /// - 标志牌编码非空
    pub fn validate(&self) -> Result<(), JobViolation> {
        validate_fields(
            &self.job_number,
            self.start_date,
            self.end_date,
            &self.equipment,
            &self.sign_list,
        )
    }

    /// 将部分字段更新合并到作业上（纯数据合并，不做校验）
    pub fn apply_patch(&mut self, patch: &JobPatch) {
        if let Some(v) = &patch.job_number {
            self.job_number = v.clone();
        }
        if let Some(v) = &patch.bid_number {
            self.bid_number = v.clone();
        }
        if let Some(v) = &patch.location {
            self.location = v.clone();
        }
        if let Some(v) = &patch.contractor {
            self.contractor = v.clone();
        }
        if let Some(v) = &patch.project_manager {
            self.project_manager = normalize_project_manager(Some(v));
        }
        if let Some(v) = &patch.branch {
            self.branch = normalize_branch(Some(v));
        }
        if let Some(v) = patch.job_type {
            self.job_type = v;
        }
        if let Some(v) = patch.rate {
            self.rate = v;
        }
        if let Some(v) = patch.fringe {
            self.fringe = v;
        }
        if let Some(v) = patch.is_rated {
            self.is_rated = v;
        }
        if let Some(v) = patch.start_date {
            self.start_date = v;
        }
        if let Some(v) = patch.end_date {
            self.end_date = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.sign_status {
            self.sign_status = v;
        }
        if let Some(v) = &patch.equipment {
            self.equipment = v.clone();
        }
        if let Some(v) = &patch.sign_list {
            self.sign_list = v.clone();
        }
        if let Some(v) = &patch.remarks {
            self.remarks = v.clone();
        }
        if let Some(v) = &patch.last_updated_by {
            self.last_updated_by = Some(v.clone());
        }
    }
}

// ==========================================
// NewJob - 新建作业（无ID）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJob {
    pub job_number: String,
    #[serde(default)]
    pub bid_number: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contractor: Option<String>,
    #[serde(default)]
    pub project_manager: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub fringe: Option<f64>,
    #[serde(default = "default_true")]
    pub is_rated: bool,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub status: JobStatus,
    #[serde(default)]
    pub sign_status: Option<SignStatus>,
    #[serde(default)]
    pub equipment: BTreeMap<String, i64>,
    #[serde(default)]
    pub sign_list: Vec<SignItem>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub last_updated_by: Option<String>,
}

fn default_true() -> bool {
    true
}

impl NewJob {
    /// 最小字段构造（其余字段取缺省值）
    pub fn new(job_number: &str, start_date: NaiveDate, status: JobStatus) -> Self {
        Self {
            job_number: job_number.to_string(),
            bid_number: None,
            location: None,
            contractor: None,
            project_manager: None,
            branch: None,
            job_type: JobType::Public,
            rate: None,
            fringe: None,
            is_rated: true,
            start_date,
            end_date: None,
            status,
            sign_status: None,
            equipment: BTreeMap::new(),
            sign_list: Vec::new(),
            remarks: None,
            last_updated_by: None,
        }
    }

    pub fn validate(&self) -> Result<(), JobViolation> {
        validate_fields(
            &self.job_number,
            self.start_date,
            self.end_date,
            &self.equipment,
            &self.sign_list,
        )
    }

    /// 分配ID与时间戳后生成完整作业
    pub fn into_job(self, id: i64, now: NaiveDateTime) -> Job {
        Job {
            id,
            job_number: self.job_number,
            bid_number: self.bid_number,
            location: self.location,
            contractor: self.contractor,
            project_manager: normalize_project_manager(self.project_manager.as_deref()),
            branch: normalize_branch(self.branch.as_deref()),
            job_type: self.job_type,
            rate: self.rate,
            fringe: self.fringe,
            is_rated: self.is_rated,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
            sign_status: self.sign_status,
            equipment: self.equipment,
            sign_list: self.sign_list,
            remarks: self.remarks,
            last_updated_by: self.last_updated_by,
            created_at: now,
            last_updated_at: now,
        }
    }
}

// ==========================================
// JobPatch - 作业部分更新
// ==========================================
// 外层 None = 字段未提供；可空字段内层 None = 显式清空
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPatch {
    #[serde(default)]
    pub job_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub bid_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub contractor: Option<Option<String>>,
    #[serde(default)]
    pub project_manager: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub job_type: Option<JobType>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub rate: Option<Option<f64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub fringe: Option<Option<f64>>,
    #[serde(default)]
    pub is_rated: Option<bool>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub sign_status: Option<Option<SignStatus>>,
    #[serde(default)]
    pub equipment: Option<BTreeMap<String, i64>>,
    #[serde(default)]
    pub sign_list: Option<Vec<SignItem>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub remarks: Option<Option<String>>,
    #[serde(default)]
    pub last_updated_by: Option<String>,
}

impl JobPatch {
    /// 补丁是否不含任何字段
    pub fn is_empty(&self) -> bool {
        *self == JobPatch::default()
    }
}

// 显式 null 反序列化为 Some(None)，缺失字段由 default 给出 None
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ==========================================
// JobViolation - 作业不变量违反
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobViolation {
    pub field: String,
    pub message: String,
}

impl fmt::Display for JobViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl JobViolation {
    fn new(field: &str, message: String) -> Self {
        Self {
            field: field.to_string(),
            message,
        }
    }
}

fn validate_fields(
    job_number: &str,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    equipment: &BTreeMap<String, i64>,
    sign_list: &[SignItem],
) -> Result<(), JobViolation> {
    if job_number.trim().is_empty() {
        return Err(JobViolation::new("job_number", "作业编号不能为空".to_string()));
    }

    if let Some(end) = end_date {
        if end < start_date {
            return Err(JobViolation::new(
                "end_date",
                format!("完工日期 {} 早于开工日期 {}", end, start_date),
            ));
        }
    }

    for (name, qty) in equipment {
        if name.trim().is_empty() {
            return Err(JobViolation::new("equipment", "设备名称不能为空".to_string()));
        }
        if *qty < 0 {
            return Err(JobViolation::new(
                "equipment",
                format!("设备 {} 数量为负: {}", name, qty),
            ));
        }
    }

    for sign in sign_list {
        if sign.code.trim().is_empty() {
            return Err(JobViolation::new("sign_list", "标志牌编码不能为空".to_string()));
        }
        if sign.quantity < 0 {
            return Err(JobViolation::new(
                "sign_list",
                format!("标志牌 {} 数量为负: {}", sign.code, sign.quantity),
            ));
        }
    }

    Ok(())
}

/// 项目经理归一化：去空白、转大写，缺失时取缺省值
pub fn normalize_project_manager(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_uppercase(),
        _ => DEFAULT_PROJECT_MANAGER.to_string(),
    }
}

/// 分公司归一化：去空白、转小写，缺失时取缺省值
pub fn normalize_branch(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_lowercase(),
        _ => DEFAULT_BRANCH.to_string(),
    }
}
