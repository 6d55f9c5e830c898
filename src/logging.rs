// ==========================================
// 交通管制作业看板 - 日志初始化
// ==========================================
// 调用方: etc-job-board（CLI）、seed_demo_jobs、集成测试
// 输出: 预测引擎 span（job_count / master / forecast）、
//       库存调整与审计回滚告警、配置回退告警
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 未设置 RUST_LOG 时的过滤规则
pub const DEFAULT_DIRECTIVES: &str = "info";

/// 测试默认过滤规则（只放开本 crate 的 debug）
pub const TEST_DIRECTIVES: &str = "warn,etc_job_board=debug";

/// 输出格式环境变量
pub const LOG_FORMAT_ENV: &str = "ETC_LOG_FORMAT";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// 解析 ETC_LOG_FORMAT 的取值（未设置或无法识别 → Text）
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// 初始化日志（进程内只调用一次）
///
/// # 环境变量
/// - RUST_LOG: 过滤规则，默认 `info`。
///   排查某次预测结果: `RUST_LOG=etc_job_board::engine::forecast=debug`，
///   会打印每次 project 的 span 字段以及行数/缺口数
/// - ETC_LOG_FORMAT=json: 每条事件输出一行 JSON，导出报表的定时任务用
///
/// # 示例
/// ```no_run
/// // 与 seed_demo_jobs 相同: 先初始化日志，再打开数据库
/// etc_job_board::logging::init();
/// tracing::info!(db = "etc_job_board.db", "seeding demo jobs");
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let format = LogFormat::from_env_value(std::env::var(LOG_FORMAT_ENV).ok().as_deref());

    match format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_line_number(true)
            .init(),
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_line_number(true)
            .init(),
    }
}

/// 测试用日志，写入测试捕获输出；可重复调用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new(TEST_DIRECTIVES))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_env_value() {
        assert_eq!(LogFormat::from_env_value(None), LogFormat::Text);
        assert_eq!(LogFormat::from_env_value(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some(" JSON ")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some("pretty")), LogFormat::Text);
        assert_eq!(LogFormat::from_env_value(Some("")), LogFormat::Text);
    }

    #[test]
    fn test_directives_parse() {
        assert!(TEST_DIRECTIVES.parse::<EnvFilter>().is_ok());
        assert!(DEFAULT_DIRECTIVES.parse::<EnvFilter>().is_ok());
    }

    #[test]
    fn test_init_test_is_repeatable() {
        init_test();
        init_test();
        tracing::debug!("logging initialised twice");
    }
}
