use crate::domain::job::Job;
use crate::domain::types::ResourceKind;

/// 单个作业对某资源的需求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDemand<'a> {
    pub resource_id: &'a str,
    pub description: Option<&'a str>,
    pub quantity: i64,
}

// ==========================================
// ResourceExtractor - 资源抽取策略
// ==========================================
pub trait ResourceExtractor {
    /// 资源种类
    const KIND: ResourceKind;

    /// 校验失败时报告的字段名
    const FIELD: &'static str;

    /// 抽取作业声明的全部资源需求（含数量为 0 的条目）
    fn demands(job: &Job) -> Vec<ResourceDemand<'_>>;
}

/// 设备: equipment 映射，键为设备名
pub struct EquipmentExtractor;

impl ResourceExtractor for EquipmentExtractor {
    const KIND: ResourceKind = ResourceKind::Equipment;
    const FIELD: &'static str = "equipment";

    fn demands(job: &Job) -> Vec<ResourceDemand<'_>> {
        job.equipment
            .iter()
            .map(|(name, qty)| ResourceDemand {
                resource_id: name.as_str(),
                description: None,
                quantity: *qty,
            })
            .collect()
    }
}

/// 标志牌: sign_list 列表，键为 MUTCD 编码
pub struct SignExtractor;

impl ResourceExtractor for SignExtractor {
    const KIND: ResourceKind = ResourceKind::Signs;
    const FIELD: &'static str = "sign_list";

    fn demands(job: &Job) -> Vec<ResourceDemand<'_>> {
        job.sign_list
            .iter()
            .map(|sign| ResourceDemand {
                resource_id: sign.code.as_str(),
                description: Some(sign.description.as_str()),
                quantity: sign.quantity,
            })
            .collect()
    }
}
