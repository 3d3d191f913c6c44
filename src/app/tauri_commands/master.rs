use crate::app::state::AppState;
use crate::domain::types::MasterKind;

use super::common::{map_api_error, parse_enum_arg, to_json};

// ==========================================
// 主数据相关命令（商品 / 工序 / 作业者）
// ==========================================

#[tauri::command(rename_all = "snake_case")]
pub async fn list_masters(state: tauri::State<'_, AppState>, kind: String) -> Result<String, String> {
    let kind: MasterKind = parse_enum_arg(&kind)?;
    let result = state.master_api.list(kind).map_err(map_api_error)?;
    to_json(&result)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn add_master(
    state: tauri::State<'_, AppState>,
    kind: String,
    label: String,
) -> Result<String, String> {
    let kind: MasterKind = parse_enum_arg(&kind)?;
    let result = state.master_api.add(kind, &label).map_err(map_api_error)?;
    to_json(&result)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn remove_master(
    state: tauri::State<'_, AppState>,
    kind: String,
    id: String,
) -> Result<String, String> {
    let kind: MasterKind = parse_enum_arg(&kind)?;
    state.master_api.remove(kind, &id).map_err(map_api_error)?;
    Ok("{}".to_string())
}

/// 从文件批量导入编码（txt / csv / xlsx）
#[tauri::command(rename_all = "snake_case")]
pub async fn import_master_codes(
    state: tauri::State<'_, AppState>,
    kind: String,
    file_path: String,
) -> Result<String, String> {
    let kind: MasterKind = parse_enum_arg(&kind)?;
    let result = state
        .master_api
        .import_codes_from_file(kind, &file_path)
        .map_err(map_api_error)?;
    to_json(&result)
}
