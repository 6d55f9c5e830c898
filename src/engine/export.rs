// ==========================================
// 交通管制作业看板 - 需采购报表导出
// ==========================================
// 格式: CSV（csv crate 负责转义）
// 文件名: need-to-order-<种类>-<生成日期>.csv
// 红线: 无数据时返回"无可导出"结果，不生成文件
// ==========================================

use crate::domain::dates::DATE_FORMAT;
use crate::domain::forecast::ProjectionRow;
use crate::domain::types::ResourceKind;
use crate::engine::error::{ForecastError, ForecastResult};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

const EQUIPMENT_HEADER: [&str; 6] = [
    "Equipment",
    "Current Inventory",
    "In Use",
    "Going Out",
    "Returning",
    "Need to Order",
];

const SIGN_HEADER: [&str; 7] = [
    "MUTCD Code",
    "Description",
    "Current Inventory",
    "In Use",
    "Going Out",
    "Returning",
    "Need to Order",
];

/// 已生成的 CSV 报表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvReport {
    pub file_name: String,
    pub content: String,
    pub row_count: usize,
}

/// 导出结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Exported(CsvReport),
    /// 没有可导出的行（预期的空状态，不是错误）
    NothingToExport,
}

impl ExportOutcome {
    pub fn report(&self) -> Option<&CsvReport> {
        match self {
            ExportOutcome::Exported(report) => Some(report),
            ExportOutcome::NothingToExport => None,
        }
    }
}

/// 报表文件名
pub fn export_file_name(kind: ResourceKind, generated_on: NaiveDate) -> String {
    format!(
        "need-to-order-{}-{}.csv",
        kind.slug(),
        generated_on.format(DATE_FORMAT)
    )
}

/// 生成 CSV 报表
///
/// # 参数
/// - `rows`: 待导出行（通常为 select_shortfalls 的结果）
/// - `kind`: 决定表头与列
/// - `generated_on`: 生成日期（用于文件名）
pub fn export_csv(
    rows: &[ProjectionRow],
    kind: ResourceKind,
    generated_on: NaiveDate,
) -> ForecastResult<ExportOutcome> {
    if rows.is_empty() {
        return Ok(ExportOutcome::NothingToExport);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    match kind {
        ResourceKind::Equipment => writer.write_record(EQUIPMENT_HEADER)?,
        ResourceKind::Signs => writer.write_record(SIGN_HEADER)?,
    }

    for row in rows {
        let counts = [
            row.current_inventory.to_string(),
            row.in_use.to_string(),
            row.going_out.to_string(),
            row.returning.to_string(),
            row.need_to_order.to_string(),
        ];
        let mut record = vec![row.resource_id.clone()];
        if kind == ResourceKind::Signs {
            record.push(row.description.clone().unwrap_or_default());
        }
        record.extend(counts);
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ForecastError::Export(e.to_string()))?;
    let content = String::from_utf8(bytes).map_err(|e| ForecastError::Export(e.to_string()))?;

    Ok(ExportOutcome::Exported(CsvReport {
        file_name: export_file_name(kind, generated_on),
        content,
        row_count: rows.len(),
    }))
}

/// 将报表写入目录（目录不存在时创建）
pub fn write_export(dir: &Path, report: &CsvReport) -> ForecastResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&report.file_name);
    std::fs::write(&path, report.content.as_bytes())?;

    info!(path = %path.display(), rows = report.row_count, "需采购报表已写入");
    Ok(path)
}
