// ==========================================
// 交通管制作业看板 - 缺口筛选
// ==========================================
// 职责: 从预测结果中选出需采购行；按关键字过滤汇总表
// 红线: 保持引擎输出顺序
// ==========================================

use crate::domain::forecast::ProjectionRow;

/// 选出 need_to_order > 0 的行
pub fn select_shortfalls(rows: &[ProjectionRow]) -> Vec<ProjectionRow> {
    rows.iter().filter(|r| r.is_shortfall()).cloned().collect()
}

/// 汇总表关键字过滤（大小写不敏感，空白关键字返回全部）
///
/// 设备匹配名称；标志牌匹配编码或描述
pub fn search_rows(rows: &[ProjectionRow], query: &str) -> Vec<ProjectionRow> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return rows.to_vec();
    }

    rows.iter()
        .filter(|row| {
            row.resource_id.to_lowercase().contains(&needle)
                || row
                    .description
                    .as_deref()
                    .map_or(false, |d| d.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}
