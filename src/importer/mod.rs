// ==========================================
// 生产进度看板 - 导入层
// ==========================================
// 职责: JSON 备份解析/合并规划, 主数据编码批量导入
// 红线: 解析与规划为纯逻辑, 持久化由 API 层完成
// ==========================================

pub mod backup;
pub mod error;
pub mod master_codes;

pub use backup::{parse_backup_json, plan_import, ImportPlan, ImportSummary};
pub use error::{ImportError, ImportResult};
pub use master_codes::{plan_master_import, MasterCodeParser, MasterImportPlan};
