// ==========================================
// 生产进度看板 - Tauri 命令（按域拆分）
// ==========================================
// 职责: Tauri 命令定义,连接前端与后端 API
// 约定: 返回 JSON 字符串; 错误为 ErrorResponse 的 JSON
// ==========================================

#![cfg(feature = "tauri-app")]

mod common;
mod config;
mod dashboard;
mod export;
mod import;
mod master;
mod record;

pub use config::*;
pub use dashboard::*;
pub use export::*;
pub use import::*;
pub use master::*;
pub use record::*;
