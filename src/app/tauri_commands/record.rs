use crate::api::RecordQuery;
use crate::app::state::AppState;
use crate::domain::record::RecordInput;

use super::common::{map_api_error, parse_json_arg, to_json};

// ==========================================
// 生产记录相关命令
// ==========================================

/// 查询记录列表（query 为 RecordQuery 的 JSON，可省略）
#[tauri::command(rename_all = "snake_case")]
pub async fn list_records(
    state: tauri::State<'_, AppState>,
    query: Option<String>,
) -> Result<String, String> {
    let query: RecordQuery = match query.as_deref() {
        Some(raw) if !raw.trim().is_empty() => parse_json_arg("query", raw)?,
        _ => RecordQuery::default(),
    };

    let result = state.record_api.list_records(&query).map_err(map_api_error)?;
    to_json(&result)
}

/// 查询单条记录
#[tauri::command(rename_all = "snake_case")]
pub async fn get_record(state: tauri::State<'_, AppState>, id: String) -> Result<String, String> {
    let result = state.record_api.get_record(&id).map_err(map_api_error)?;
    to_json(&result)
}

/// 查询记录详情（含指标与等级）
#[tauri::command(rename_all = "snake_case")]
pub async fn get_record_detail(
    state: tauri::State<'_, AppState>,
    id: String,
) -> Result<String, String> {
    let result = state.record_api.get_record_detail(&id).map_err(map_api_error)?;
    to_json(&result)
}

/// 新增记录（input 为 RecordInput 的 JSON）
#[tauri::command(rename_all = "snake_case")]
pub async fn create_record(
    state: tauri::State<'_, AppState>,
    input: String,
) -> Result<String, String> {
    let input: RecordInput = parse_json_arg("input", &input)?;
    let result = state.record_api.create_record(&input).map_err(map_api_error)?;
    to_json(&result)
}

/// 编辑记录（整条替换）
#[tauri::command(rename_all = "snake_case")]
pub async fn update_record(
    state: tauri::State<'_, AppState>,
    id: String,
    input: String,
) -> Result<String, String> {
    let input: RecordInput = parse_json_arg("input", &input)?;
    let result = state
        .record_api
        .update_record(&id, &input)
        .map_err(map_api_error)?;
    to_json(&result)
}

/// 删除记录
#[tauri::command(rename_all = "snake_case")]
pub async fn delete_record(state: tauri::State<'_, AppState>, id: String) -> Result<String, String> {
    state.record_api.delete_record(&id).map_err(map_api_error)?;
    Ok("{}".to_string())
}

/// 清空全部记录
#[tauri::command(rename_all = "snake_case")]
pub async fn clear_all_records(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let removed = state.record_api.clear_all_records().map_err(map_api_error)?;
    to_json(&serde_json::json!({ "removed": removed }))
}
