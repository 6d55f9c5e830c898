// ==========================================
// 交通管制作业看板 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::api::{ApiResult, ForecastApi, JobApi};
use crate::config::config_manager::ConfigManager;
use crate::config::forecast_config_trait::ForecastConfigReader;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::forecast::ForecastWindow;
use crate::repository::{ActionLogRepository, JobRepository, JobRepositoryImpl};

/// 应用状态
///
/// 包含所有API实例和共享资源（单一共享连接）
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 作业API
    pub job_api: Arc<JobApi>,

    /// 库存预测API
    pub forecast_api: Arc<ForecastApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 操作日志仓储（用于审计追踪）
    pub action_log_repo: Arc<ActionLogRepository>,

    /// 作业列表分页大小
    pub page_size: usize,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并建表（幂等）
    /// 2. 初始化所有Repository
    /// 3. 按配置加载库存基线
    /// 4. 创建所有API实例
    pub async fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let job_repo: Arc<dyn JobRepository> = Arc::new(JobRepositoryImpl::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let page_size = config_manager
            .get_page_size()
            .await
            .map_err(|e| format!("读取分页配置失败: {}", e))?;

        // ==========================================
        // 初始化API层
        // ==========================================
        let job_api = Arc::new(JobApi::new(job_repo.clone(), Some(action_log_repo.clone())));
        let forecast_api = Arc::new(
            ForecastApi::from_config(
                job_repo,
                config_manager.as_ref(),
                Some(action_log_repo.clone()),
            )
            .await
            .map_err(|e| format!("无法创建ForecastApi: {}", e))?,
        );

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            job_api,
            forecast_api,
            config_manager,
            action_log_repo,
            page_size,
        })
    }

    /// 默认预测窗口（today .. today + 配置跨度）
    pub async fn default_window(&self, today: NaiveDate) -> ApiResult<ForecastWindow> {
        ForecastApi::default_window(self.config_manager.as_ref(), today).await
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 ETC_JOB_BOARD_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("ETC_JOB_BOARD_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./etc_job_board.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("etc-job-board");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("etc_job_board.db");
        }
    }

    path.to_string_lossy().to_string()
}
