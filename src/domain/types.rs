// ==========================================
// 交通管制作业看板 - 领域类型定义
// ==========================================
// 依据: etc_master_jobs 表 job_status / sign_status / type 字段
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 作业状态 (Job Status)
// ==========================================
// 三态生命周期: 待开工 → 进行中 → 已完工
// 红线: 状态是权威口径，不从日期反推
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    PendingStart, // 待开工
    OnGoing,      // 进行中
    Complete,     // 已完工
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::PendingStart => write!(f, "pending-start"),
            JobStatus::OnGoing => write!(f, "on-going"),
            JobStatus::Complete => write!(f, "complete"),
        }
    }
}

impl JobStatus {
    /// 全部状态（作业列表默认筛选集合）
    pub const ALL: [JobStatus; 3] = [
        JobStatus::OnGoing,
        JobStatus::Complete,
        JobStatus::PendingStart,
    ];

    /// 从数据库字符串解析状态
    ///
    /// 对齐 etc_master_jobs.job_status: ONGOING / COMPLETE，其余一律视为待开工
    pub fn from_db_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "ONGOING" => JobStatus::OnGoing,
            "COMPLETE" => JobStatus::Complete,
            _ => JobStatus::PendingStart,
        }
    }

    /// 转换为数据库字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            JobStatus::PendingStart => "PENDING",
            JobStatus::OnGoing => "ONGOING",
            JobStatus::Complete => "COMPLETE",
        }
    }

    /// 从界面/接口字符串解析（on-going / complete / pending start / pending-start）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(' ', "-").as_str() {
            "on-going" | "ongoing" => Some(JobStatus::OnGoing),
            "complete" => Some(JobStatus::Complete),
            "pending-start" | "pending" => Some(JobStatus::PendingStart),
            _ => None,
        }
    }

    /// 作业是否已实际开工（进行中或已完工）
    pub fn has_started(&self) -> bool {
        matches!(self, JobStatus::OnGoing | JobStatus::Complete)
    }
}

// ==========================================
// 标志牌状态 (Sign Status)
// ==========================================
// 仅用于待开工作业的备牌进度跟踪
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignStatus {
    #[serde(rename = "complete")]
    Complete, // 已完成
    #[serde(rename = "in process")]
    InProcess, // 处理中
    #[serde(rename = "not received")]
    NotReceived, // 未收到
    #[serde(rename = "received")]
    Received, // 已收到
    #[serde(rename = "not in process")]
    NotInProcess, // 未处理
}

impl fmt::Display for SignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl SignStatus {
    /// 界面与数据库共用的字符串口径
    pub fn as_str(&self) -> &'static str {
        match self {
            SignStatus::Complete => "complete",
            SignStatus::InProcess => "in process",
            SignStatus::NotReceived => "not received",
            SignStatus::Received => "received",
            SignStatus::NotInProcess => "not in process",
        }
    }

    /// 从字符串解析（大小写不敏感）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "complete" => Some(SignStatus::Complete),
            "in process" => Some(SignStatus::InProcess),
            "not received" => Some(SignStatus::NotReceived),
            "received" => Some(SignStatus::Received),
            "not in process" => Some(SignStatus::NotInProcess),
            _ => None,
        }
    }
}

// ==========================================
// 作业类型 (Job Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JobType {
    #[default]
    Public, // 公共工程
    Private, // 私人工程
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl JobType {
    /// 从数据库字符串解析，未知值按 Public 处理
    pub fn from_db_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "private" => JobType::Private,
            _ => JobType::Public,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            JobType::Public => "Public",
            JobType::Private => "Private",
        }
    }
}

// ==========================================
// 资源种类 (Resource Kind)
// ==========================================
// 设备按名称识别，标志牌按 MUTCD 编码识别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Equipment, // 设备
    Signs,     // 标志牌
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl ResourceKind {
    /// 报表文件名中的种类标识
    pub fn slug(&self) -> &'static str {
        match self {
            ResourceKind::Equipment => "equipment",
            ResourceKind::Signs => "signs",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "equipment" => Some(ResourceKind::Equipment),
            "signs" | "sign" => Some(ResourceKind::Signs),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_db_mapping() {
        assert_eq!(JobStatus::from_db_str("ONGOING"), JobStatus::OnGoing);
        assert_eq!(JobStatus::from_db_str("complete"), JobStatus::Complete);
        // 未知/空值一律视为待开工
        assert_eq!(JobStatus::from_db_str(""), JobStatus::PendingStart);
        assert_eq!(JobStatus::from_db_str("BIDDING"), JobStatus::PendingStart);

        for status in JobStatus::ALL {
            assert_eq!(JobStatus::from_db_str(status.to_db_str()), status);
        }
    }

    #[test]
    fn test_job_status_parse_ui_strings() {
        assert_eq!(JobStatus::parse("on-going"), Some(JobStatus::OnGoing));
        assert_eq!(JobStatus::parse("pending start"), Some(JobStatus::PendingStart));
        assert_eq!(JobStatus::parse("Pending-Start"), Some(JobStatus::PendingStart));
        assert_eq!(JobStatus::parse("cancelled"), None);
    }

    #[test]
    fn test_job_status_serde_kebab_case() {
        let json = serde_json::to_string(&JobStatus::PendingStart).unwrap();
        assert_eq!(json, "\"pending-start\"");
        let status: JobStatus = serde_json::from_str("\"on-going\"").unwrap();
        assert_eq!(status, JobStatus::OnGoing);
    }

    #[test]
    fn test_sign_status_round_trip() {
        for s in ["complete", "in process", "not received", "received", "not in process"] {
            let status = SignStatus::parse(s).unwrap();
            assert_eq!(status.as_str(), s);
        }
        assert_eq!(SignStatus::parse("lost"), None);
    }

    #[test]
    fn test_resource_kind_slug() {
        assert_eq!(ResourceKind::Equipment.slug(), "equipment");
        assert_eq!(ResourceKind::parse("SIGNS"), Some(ResourceKind::Signs));
    }
}
