use crate::app::state::AppState;

use super::common::{build_filter, map_api_error, to_json};

// ==========================================
// 导出相关命令
// ==========================================
// 文件写入 output_dir, 文件名带当天日期; 返回写入路径

fn path_payload(path: std::path::PathBuf) -> Result<String, String> {
    to_json(&serde_json::json!({ "path": path.to_string_lossy() }))
}

#[tauri::command(rename_all = "snake_case")]
pub async fn export_csv(
    state: tauri::State<'_, AppState>,
    output_dir: String,
    search: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
) -> Result<String, String> {
    let filter = build_filter(search, start_date, end_date);
    let path = state
        .export_api
        .write_csv(&filter, &output_dir)
        .map_err(map_api_error)?;
    path_payload(path)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn export_print_report(
    state: tauri::State<'_, AppState>,
    output_dir: String,
    search: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
) -> Result<String, String> {
    let filter = build_filter(search, start_date, end_date);
    let path = state
        .export_api
        .write_print_report(&filter, &output_dir)
        .map_err(map_api_error)?;
    path_payload(path)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn export_backup(
    state: tauri::State<'_, AppState>,
    output_dir: String,
) -> Result<String, String> {
    let path = state
        .export_api
        .write_backup(&output_dir)
        .map_err(map_api_error)?;
    path_payload(path)
}

/// 最近备份时间（从未备份为 null）
#[tauri::command(rename_all = "snake_case")]
pub async fn get_last_backup_time(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state.export_api.last_backup_time().map_err(map_api_error)?;
    to_json(&result)
}
