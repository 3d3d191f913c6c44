// ==========================================
// 生产进度看板 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod master;
pub mod record;
pub mod types;

// 重导出核心类型
pub use master::{resolve_label, MasterEntity};
pub use record::{ProductionRecord, RecordInput};
pub use types::{ImportMode, MasterKind, RecordSortField, Severity, SortDirection};
