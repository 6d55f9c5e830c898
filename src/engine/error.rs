// ==========================================
// 交通管制作业看板 - 引擎层错误类型
// ==========================================
// 红线: 任一作业数据非法则整次预测失败，不输出部分结果
// ==========================================

use crate::domain::dates::DateParseError;
use crate::domain::job::JobViolation;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 预测/库存/导出错误
#[derive(Error, Debug)]
pub enum ForecastError {
    /// 日期字符串无法解析
    #[error(transparent)]
    Parse(#[from] DateParseError),

    /// 数量为负、日期倒置、库存为负等（在任何状态变更前拒绝）
    #[error("数据验证失败 (field={field}): {message}")]
    Validation { field: String, message: String },

    /// 仓储错误原样传播
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("报表导出失败: {0}")]
    Export(String),
}

impl ForecastError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ForecastError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<JobViolation> for ForecastError {
    fn from(v: JobViolation) -> Self {
        ForecastError::Validation {
            field: v.field,
            message: v.message,
        }
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::Export(err.to_string())
    }
}

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        ForecastError::Export(err.to_string())
    }
}

/// Result 类型别名
pub type ForecastResult<T> = Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_parse_error_converts() {
        let err: ForecastError = DateParseError {
            field: "master_date".to_string(),
            value: "yesterday".to_string(),
        }
        .into();
        assert!(matches!(err, ForecastError::Parse(_)));
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_job_violation_becomes_validation() {
        let err: ForecastError = JobViolation {
            field: "equipment".to_string(),
            message: "数量为负".to_string(),
        }
        .into();
        match err {
            ForecastError::Validation { field, .. } => assert_eq!(field, "equipment"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
