// ==========================================
// 生产进度看板 - 核心库
// ==========================================
// 技术栈: Tauri + Rust + SQLite
// 系统定位: 生产实绩记录 + 指标分析 (KPI / 趋势)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 键值存储
pub mod repository;

// 引擎层 - 指标计算 / 查询 / 等级判定
pub mod engine;

// 导入层 - JSON 备份 / 主数据编码
pub mod importer;

// 导出层 - CSV / 打印报表 / JSON 备份
pub mod exporter;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - Tauri 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ImportMode, MasterKind, RecordSortField, Severity, SortDirection};

// 领域实体
pub use domain::{MasterEntity, ProductionRecord, RecordInput};

// 引擎
pub use engine::{ProductionTotals, RecordMetrics, SeriesPoint, SeverityClassifier};

// 仓储
pub use repository::{InMemoryRecordStore, RecordStore, SqliteRecordStore};

// API
pub use api::{DashboardApi, ExportApi, ImportApi, MasterDataApi, RecordApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "生产进度看板";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
