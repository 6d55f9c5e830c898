// ==========================================
// 交通管制作业看板 - 操作日志领域模型
// ==========================================
// 红线: 所有人工写入必须记录（作业增删改、库存调整、报表导出）
// 对齐: action_log 表
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    // ===== 主键 =====
    pub action_id: String,        // 日志ID (UUID)
    pub action_type: String,      // 操作类型 (存储为字符串)
    pub action_ts: NaiveDateTime, // 操作时间戳
    pub actor: String,            // 操作人

    // ===== 关联对象 =====
    pub job_id: Option<i64>,            // 关联作业（库存调整/导出为 None）
    pub resource_id: Option<String>,    // 关联资源（设备名或标志牌编码）

    // ===== 操作负载 =====
    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,          // 详细描述
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    CreateJob,       // 新建作业
    UpdateJob,       // 修改作业
    DeleteJob,       // 删除作业
    AdjustInventory, // 调整基线库存
    ExportReport,    // 导出需采购报表
}

impl ActionType {
    /// 转换为字符串 (用于数据库存储)
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::CreateJob => "CREATE_JOB",
            ActionType::UpdateJob => "UPDATE_JOB",
            ActionType::DeleteJob => "DELETE_JOB",
            ActionType::AdjustInventory => "ADJUST_INVENTORY",
            ActionType::ExportReport => "EXPORT_REPORT",
        }
    }

    /// 从字符串解析
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "CREATE_JOB" => Some(ActionType::CreateJob),
            "UPDATE_JOB" => Some(ActionType::UpdateJob),
            "DELETE_JOB" => Some(ActionType::DeleteJob),
            "ADJUST_INVENTORY" => Some(ActionType::AdjustInventory),
            "EXPORT_REPORT" => Some(ActionType::ExportReport),
            _ => None,
        }
    }
}

impl ActionLog {
    /// 创建新的操作日志（ID 自动生成，时间取本地当前时间）
    pub fn new(action_type: ActionType, actor: &str) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type: action_type.as_str().to_string(),
            action_ts: chrono::Local::now().naive_local(),
            actor: actor.to_string(),
            job_id: None,
            resource_id: None,
            payload_json: None,
            detail: None,
        }
    }

    pub fn with_job(mut self, job_id: i64) -> Self {
        self.job_id = Some(job_id);
        self
    }

    pub fn with_resource(mut self, resource_id: &str) -> Self {
        self.resource_id = Some(resource_id.to_string());
        self
    }

    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload_json = Some(payload);
        self
    }

    pub fn with_detail(mut self, detail: String) -> Self {
        self.detail = Some(detail);
        self
    }
}
