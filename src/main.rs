// ==========================================
// 生产进度看板 - 主入口
// ==========================================
// 技术栈: Tauri + Rust + SQLite
// 启用 tauri-app 特性时启动桌面应用; 否则提供无界面命令行
// ==========================================

// 禁止控制台窗口 (Windows)
#![cfg_attr(all(not(debug_assertions), feature = "tauri-app"), windows_subsystem = "windows")]

use production_tracker::app::{get_default_db_path, AppState};

#[cfg(feature = "tauri-app")]
fn main() {
    use production_tracker::app::tauri_commands::*;

    // 初始化日志系统
    production_tracker::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", production_tracker::APP_NAME);
    tracing::info!("系统版本: {}", production_tracker::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let app_state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("无法初始化AppState: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("AppState初始化成功, 启动Tauri应用...");

    let result = tauri::Builder::default()
        .manage(app_state)
        .invoke_handler(tauri::generate_handler![
            // ==========================================
            // 生产记录 (7个)
            // ==========================================
            list_records,
            get_record,
            get_record_detail,
            create_record,
            update_record,
            delete_record,
            clear_all_records,
            // ==========================================
            // 看板 (3个)
            // ==========================================
            get_dashboard_summary,
            get_worker_breakdown,
            get_product_breakdown,
            // ==========================================
            // 主数据 (4个)
            // ==========================================
            list_masters,
            add_master,
            remove_master,
            import_master_codes,
            // ==========================================
            // 导入 / 导出 (5个)
            // ==========================================
            import_backup,
            export_csv,
            export_print_report,
            export_backup,
            get_last_backup_time,
            // ==========================================
            // 配置 (5个)
            // ==========================================
            list_configs,
            get_config,
            update_config,
            get_config_snapshot,
            restore_config_snapshot,
        ])
        .run(tauri::generate_context!());

    if let Err(e) = result {
        tracing::error!("Tauri应用运行失败: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Tauri应用已退出");
}

#[cfg(not(feature = "tauri-app"))]
fn main() {
    production_tracker::logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = cli::run(&args) {
        eprintln!("错误: {}", e);
        std::process::exit(1);
    }
}

// ==========================================
// 无界面命令行
// ==========================================
#[cfg(not(feature = "tauri-app"))]
mod cli {
    use super::*;
    use production_tracker::api::RecordFilter;
    use production_tracker::ImportMode;

    const USAGE: &str = "\
用法:
  production-tracker                          打印看板汇总
  production-tracker export-csv <dir>         导出 CSV
  production-tracker export-report <dir>      导出打印报告 (HTML)
  production-tracker backup <dir>             导出 JSON 备份
  production-tracker import <file> [merge|replace]  导入 JSON 备份 (默认 merge)

数据库路径可通过环境变量 PRODUCTION_TRACKER_DB_PATH 指定";

    pub fn run(args: &[String]) -> Result<(), String> {
        let state = AppState::new(get_default_db_path())?;
        let filter = RecordFilter::default();

        match args.first().map(String::as_str) {
            None | Some("summary") => print_summary(&state, &filter),
            Some("export-csv") => {
                let path = state
                    .export_api
                    .write_csv(&filter, require_arg(args, 1, "dir")?)
                    .map_err(|e| e.to_string())?;
                println!("{}", path.display());
                Ok(())
            }
            Some("export-report") => {
                let path = state
                    .export_api
                    .write_print_report(&filter, require_arg(args, 1, "dir")?)
                    .map_err(|e| e.to_string())?;
                println!("{}", path.display());
                Ok(())
            }
            Some("backup") => {
                let path = state
                    .export_api
                    .write_backup(require_arg(args, 1, "dir")?)
                    .map_err(|e| e.to_string())?;
                println!("{}", path.display());
                Ok(())
            }
            Some("import") => {
                let file = require_arg(args, 1, "file")?;
                let mode = match args.get(2) {
                    Some(raw) => raw.parse::<ImportMode>()?,
                    None => ImportMode::Merge,
                };
                let summary = state
                    .import_api
                    .import_backup_file(file, mode)
                    .map_err(|e| e.to_string())?;
                println!(
                    "导入完成 ({}): 导入 {} 条, 保留 {} 条, 覆盖 {} 条, 移除 {} 条, 合计 {} 条",
                    summary.mode,
                    summary.imported,
                    summary.kept,
                    summary.overwritten,
                    summary.removed,
                    summary.total
                );
                Ok(())
            }
            Some("help") | Some("--help") | Some("-h") => {
                println!("{}", USAGE);
                Ok(())
            }
            Some(other) => Err(format!("未知命令: {}\n\n{}", other, USAGE)),
        }
    }

    fn require_arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str, String> {
        args.get(index)
            .map(String::as_str)
            .ok_or_else(|| format!("缺少参数 <{}>\n\n{}", name, USAGE))
    }

    fn print_summary(state: &AppState, filter: &RecordFilter) -> Result<(), String> {
        let summary = state
            .dashboard_api
            .get_summary(filter)
            .map_err(|e| e.to_string())?;

        println!("==================================================");
        println!("{} v{}", production_tracker::APP_NAME, production_tracker::VERSION);
        println!("数据库: {}", state.db_path);
        println!("==================================================");
        println!("记录数:       {}", summary.record_count);
        println!(
            "平均效率:     {:.2}% ({})",
            summary.average_efficiency,
            production_tracker::i18n::severity_label(summary.efficiency_severity)
        );
        println!(
            "平均不良率:   {:.2}% ({})",
            summary.average_defect_rate,
            production_tracker::i18n::severity_label(summary.defect_rate_severity)
        );
        println!("效率趋势:     {:+.2}%", summary.efficiency_trend);
        println!("不良率趋势:   {:+.2}%", summary.defect_rate_trend);
        println!("实绩合计:     {}", summary.totals.total_actual);
        println!("不良合计:     {}", summary.totals.total_defects);
        println!("达成率:       {:.2}%", summary.totals.achievement_rate);

        if let Ok(Some(at)) = state.export_api.last_backup_time() {
            println!("最近备份:     {}", at);
        }
        Ok(())
    }
}
