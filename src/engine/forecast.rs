// ==========================================
// 交通管制作业看板 - 库存预测引擎
// ==========================================
// 红线: 纯函数，无副作用，相同输入得到相同输出
// 红线: 作业状态是"在用"判定的权威口径，不从日期反推
// ==========================================
// 输入: 作业列表 + 库存基线 + 基准日 + 预测截止日
// 输出: 每种资源一行预测结果（按资源ID字典序）
// 设备与标志牌是同一泛型引擎的两种实例化（资源抽取策略不同）
// ==========================================

mod core;
mod extract;


pub use self::core::{EquipmentForecastEngine, InventoryForecastEngine, SignForecastEngine};
pub use extract::{EquipmentExtractor, ResourceDemand, ResourceExtractor, SignExtractor};
