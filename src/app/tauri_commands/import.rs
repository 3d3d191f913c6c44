use crate::app::state::AppState;
use crate::domain::types::ImportMode;

use super::common::{map_api_error, parse_enum_arg, to_json};

// ==========================================
// JSON 备份导入命令
// ==========================================

/// 从备份文件导入
///
/// # 参数
/// - file_path: 备份 JSON 文件路径
/// - mode: MERGE / REPLACE
#[tauri::command(rename_all = "snake_case")]
pub async fn import_backup(
    state: tauri::State<'_, AppState>,
    file_path: String,
    mode: String,
) -> Result<String, String> {
    let mode: ImportMode = parse_enum_arg(&mode)?;
    tracing::info!("导入备份: file={}, mode={}", file_path, mode);

    let summary = state
        .import_api
        .import_backup_file(&file_path, mode)
        .map_err(map_api_error)?;
    to_json(&summary)
}
