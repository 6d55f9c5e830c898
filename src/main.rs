// ==========================================
// 交通管制作业看板 - 命令行入口
// ==========================================
// 用法:
//   etc-job-board [db_path] [master_date] [forecast_date] [out_dir]
// 缺省: 默认数据库路径；基准日 = 今天；预测截止日 = 今天 + 配置跨度；输出目录 = 当前目录
// ==========================================

use std::error::Error;
use std::path::PathBuf;

use etc_job_board::app::{get_default_db_path, AppState};
use etc_job_board::domain::{ForecastWindow, ProjectionRow, ResourceKind};
use etc_job_board::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", etc_job_board::APP_NAME, etc_job_board::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().collect();
    let db_path = args.get(1).cloned().unwrap_or_else(get_default_db_path);
    let out_dir = PathBuf::from(args.get(4).cloned().unwrap_or_else(|| ".".to_string()));

    let state = AppState::new(db_path).await?;
    let today = chrono::Local::now().date_naive();

    let window = match (args.get(2), args.get(3)) {
        (Some(master), Some(forecast)) => ForecastWindow::parse(master, forecast)?,
        _ => state.default_window(today).await?,
    };

    println!(
        "基准日 {} / 预测截止日 {} ({} 天)",
        window.master_date,
        window.forecast_date,
        window.days_between()
    );

    for kind in [ResourceKind::Equipment, ResourceKind::Signs] {
        let rows = state.forecast_api.summary(kind, window)?;
        print_rows(kind, &rows);

        match state
            .forecast_api
            .write_need_to_order(kind, window, today, &out_dir, "cli")?
        {
            Some(path) => println!("已导出: {}", path.display()),
            None => println!("{}: 无需采购项", kind),
        }
    }

    Ok(())
}

fn print_rows(kind: ResourceKind, rows: &[ProjectionRow]) {
    println!();
    println!(
        "{:<24} {:>9} {:>7} {:>9} {:>9} {:>13}",
        kind.slug().to_uppercase(),
        "Current",
        "In Use",
        "Going Out",
        "Returning",
        "Need to Order"
    );
    for row in rows {
        let label = match &row.description {
            Some(desc) => format!("{} {}", row.resource_id, desc),
            None => row.resource_id.clone(),
        };
        println!(
            "{:<24} {:>9} {:>7} {:>9} {:>9} {:>13}",
            label,
            row.current_inventory,
            row.in_use,
            row.going_out,
            row.returning,
            row.need_to_order
        );
    }
}
