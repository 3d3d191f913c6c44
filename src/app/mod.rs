// ==========================================
// 生产进度看板 - 应用层
// ==========================================
// 职责: 应用状态装配 + Tauri 命令
// ==========================================

pub mod state;
pub mod tauri_commands;

pub use state::{get_default_db_path, AppState, DB_PATH_ENV};

#[cfg(feature = "tauri-app")]
pub use tauri_commands::*;
