// ==========================================
// 交通管制作业看板 - 库存基线
// ==========================================
// 资源ID → 现有数量（≥ 0），进程内可变
// 仅由调度员显式编辑修改；已生成的预测结果不受后续修改影响
// ==========================================

use crate::domain::forecast::MissingInventoryPolicy;
use crate::engine::error::{ForecastError, ForecastResult};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryBaselineStore {
    policy: MissingInventoryPolicy,
    counts: BTreeMap<String, i64>,
}

impl InventoryBaselineStore {
    pub fn new(policy: MissingInventoryPolicy) -> Self {
        Self {
            policy,
            counts: BTreeMap::new(),
        }
    }

    /// 以初始数量构造（负数条目拒绝）
    pub fn with_counts(
        policy: MissingInventoryPolicy,
        counts: BTreeMap<String, i64>,
    ) -> ForecastResult<Self> {
        let mut store = Self::new(policy);
        for (resource_id, value) in counts {
            store.set(&resource_id, value)?;
        }
        Ok(store)
    }

    /// 读取库存，缺失时按策略取值
    pub fn get(&self, resource_id: &str) -> i64 {
        self.counts
            .get(resource_id)
            .copied()
            .unwrap_or_else(|| self.policy.fallback())
    }

    /// 是否显式记录了该资源
    pub fn contains(&self, resource_id: &str) -> bool {
        self.counts.contains_key(resource_id)
    }

    /// 覆写库存
    ///
    /// # 返回
    /// - Ok(Some(old)): 覆写前的显式值
    /// - Ok(None): 此前未记录
    /// - Err(Validation): value < 0，状态不变
    pub fn set(&mut self, resource_id: &str, value: i64) -> ForecastResult<Option<i64>> {
        if resource_id.trim().is_empty() {
            return Err(ForecastError::validation("resource_id", "资源ID不能为空"));
        }
        if value < 0 {
            return Err(ForecastError::validation(
                "current_inventory",
                format!("资源 {} 库存不能为负: {}", resource_id, value),
            ));
        }

        let old = self.counts.insert(resource_id.to_string(), value);
        debug!(resource_id, value, old = ?old, "库存基线已更新");
        Ok(old)
    }

    /// 恢复到 set 之前的状态（previous 为 set 的返回值）
    pub fn restore(&mut self, resource_id: &str, previous: Option<i64>) {
        match previous {
            Some(value) => {
                self.counts.insert(resource_id.to_string(), value);
            }
            None => {
                self.counts.remove(resource_id);
            }
        }
    }

    /// 当前显式记录的全部库存
    pub fn snapshot(&self) -> BTreeMap<String, i64> {
        self.counts.clone()
    }

    pub fn policy(&self) -> MissingInventoryPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_uses_policy() {
        let store = InventoryBaselineStore::new(MissingInventoryPolicy::Zero);
        assert_eq!(store.get("TMA"), 0);

        let store = InventoryBaselineStore::new(MissingInventoryPolicy::Fixed(50));
        assert_eq!(store.get("TMA"), 50);
        assert!(!store.contains("TMA"));
    }

    #[test]
    fn test_set_overwrites_and_returns_old() {
        let mut store = InventoryBaselineStore::default();
        assert_eq!(store.set("TMA", 3).unwrap(), None);
        assert_eq!(store.set("TMA", 5).unwrap(), Some(3));
        assert_eq!(store.get("TMA"), 5);
    }

    #[test]
    fn test_negative_value_rejected_without_mutation() {
        let mut store = InventoryBaselineStore::default();
        store.set("SQ POST", 12).unwrap();

        let err = store.set("SQ POST", -1).unwrap_err();
        assert!(matches!(err, ForecastError::Validation { .. }));
        assert_eq!(store.get("SQ POST"), 12);
    }

    #[test]
    fn test_restore_undoes_set() {
        let mut store = InventoryBaselineStore::default();
        store.set("TMA", 3).unwrap();

        let old = store.set("TMA", 8).unwrap();
        store.restore("TMA", old);
        assert_eq!(store.get("TMA"), 3);

        let old = store.set("VP", 4).unwrap();
        store.restore("VP", old);
        assert!(!store.contains("VP"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_with_counts_rejects_negative_seed() {
        let mut seed = BTreeMap::new();
        seed.insert("TMA".to_string(), 2);
        seed.insert("CONES".to_string(), -4);
        assert!(InventoryBaselineStore::with_counts(MissingInventoryPolicy::Zero, seed).is_err());
    }
}
