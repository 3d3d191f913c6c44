// ==========================================
// 生产进度看板 - 配置层
// ==========================================
// 职责: 看板阈值、窗口、导出参数的持久化配置
// 存储: config_kv 表
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, DEFAULT_REPORT_ROWS_PER_PAGE, GLOBAL_SCOPE};
