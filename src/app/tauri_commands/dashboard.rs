use crate::app::state::AppState;

use super::common::{build_filter, map_api_error, to_json};

// ==========================================
// 看板相关命令
// ==========================================

/// 看板汇总（KPI / 趋势 / 图表序列 / 近期记录）
#[tauri::command(rename_all = "snake_case")]
pub async fn get_dashboard_summary(
    state: tauri::State<'_, AppState>,
    search: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
) -> Result<String, String> {
    let filter = build_filter(search, start_date, end_date);
    let result = state.dashboard_api.get_summary(&filter).map_err(map_api_error)?;
    to_json(&result)
}

/// 按作业者汇总
#[tauri::command(rename_all = "snake_case")]
pub async fn get_worker_breakdown(
    state: tauri::State<'_, AppState>,
    search: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
) -> Result<String, String> {
    let filter = build_filter(search, start_date, end_date);
    let result = state
        .dashboard_api
        .get_worker_breakdown(&filter)
        .map_err(map_api_error)?;
    to_json(&result)
}

/// 按商品汇总
#[tauri::command(rename_all = "snake_case")]
pub async fn get_product_breakdown(
    state: tauri::State<'_, AppState>,
    search: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
) -> Result<String, String> {
    let filter = build_filter(search, start_date, end_date);
    let result = state
        .dashboard_api
        .get_product_breakdown(&filter)
        .map_err(map_api_error)?;
    to_json(&result)
}
