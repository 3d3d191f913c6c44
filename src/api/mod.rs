// ==========================================
// 生产进度看板 - API 层
// ==========================================
// 职责: 提供业务 API 接口, 供 Tauri 命令与命令行调用
// ==========================================

pub mod common;
pub mod config_api;
pub mod dashboard_api;
pub mod error;
pub mod export_api;
pub mod import_api;
pub mod master_api;
pub mod record_api;
pub mod validator;

// 重导出核心类型
pub use common::RecordFilter;
pub use config_api::{ConfigApi, ConfigItem};
pub use dashboard_api::{DashboardApi, DashboardSummary};
pub use error::{ApiError, ApiResult, ValidationViolation};
pub use export_api::ExportApi;
pub use import_api::ImportApi;
pub use master_api::{MasterDataApi, MasterImportResult};
pub use record_api::{RecordApi, RecordDetail, RecordQuery};
pub use validator::RecordValidator;
