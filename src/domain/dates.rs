// ==========================================
// 交通管制作业看板 - 日历日期解析
// ==========================================
// 红线: 日期按"日历日"比较，不做时区换算
// 说明: 直接按 UTC 解析 ISO 字符串会在午夜附近偏移一天，
//       此处只取 YYYY-MM-DD 部分，构造本地无时区日期
// ==========================================

use chrono::NaiveDate;
use thiserror::Error;

/// 日期存储/传输格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 日期解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("日期格式错误 (field={field}): 期望 YYYY-MM-DD，实际 '{value}'")]
pub struct DateParseError {
    pub field: String,
    pub value: String,
}

/// 解析日历日期
///
/// 接受:
/// - `2025-09-02`
/// - `2025-09-02T13:45:00Z` 等带时间部分的 ISO 字符串（仅取日期部分，不做时区换算）
///
/// # 参数
/// - `field`: 字段名（用于错误信息）
/// - `raw`: 原始字符串
pub fn parse_calendar_date(field: &str, raw: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = raw.trim();
    let date_part = trimmed
        .split(|c: char| c == 'T' || c == ' ')
        .next()
        .unwrap_or(trimmed);

    NaiveDate::parse_from_str(date_part, DATE_FORMAT).map_err(|_| DateParseError {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

/// 解析可选日历日期（None / 空字符串 → None）
pub fn parse_optional_calendar_date(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, DateParseError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_calendar_date(field, s).map(Some),
    }
}

/// 两个日期之间的天数（可为负）
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        let date = parse_calendar_date("start_date", "2025-09-02").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 9, 2).unwrap());
    }

    #[test]
    fn test_parse_iso_datetime_keeps_calendar_day() {
        // 23:30 UTC 不应被换算到次日或前一日
        let date = parse_calendar_date("end_date", "2025-09-02T23:30:00Z").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 9, 2).unwrap());

        let date = parse_calendar_date("end_date", "2025-09-02 00:10:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 9, 2).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_calendar_date("master_date", "09/02/2025").unwrap_err();
        assert_eq!(err.field, "master_date");
        assert_eq!(err.value, "09/02/2025");

        assert!(parse_calendar_date("master_date", "").is_err());
        assert!(parse_calendar_date("master_date", "2025-02-30").is_err());
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(parse_optional_calendar_date("end_date", None).unwrap(), None);
        assert_eq!(parse_optional_calendar_date("end_date", Some("  ")).unwrap(), None);
        assert!(parse_optional_calendar_date("end_date", Some("2024-13-01")).is_err());
    }

    #[test]
    fn test_days_between_signed() {
        let a = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        assert_eq!(days_between(a, b), 30);
        assert_eq!(days_between(b, a), -30);
        assert_eq!(days_between(a, a), 0);
    }
}
