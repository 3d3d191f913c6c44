// ==========================================
// 生产进度看板 - 领域类型定义
// ==========================================
// 职责: 枚举类型 (等级 / 导入模式 / 主数据种类 / 排序)
// 序列化格式: SCREAMING_SNAKE_CASE (与前端、配置一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 指标等级 (Severity)
// ==========================================
// 替代前端的 green/yellow/red 颜色映射
// 顺序: Good < Warning < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Good,     // 良好
    Warning,  // 关注
    Critical, // 异常
}

impl Severity {
    /// 国际化键 (locales/*.yml)
    pub fn i18n_key(&self) -> &'static str {
        match self {
            Severity::Good => "severity.good",
            Severity::Warning => "severity.warning",
            Severity::Critical => "severity.critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Good => write!(f, "GOOD"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ==========================================
// 导入模式 (Import Mode)
// ==========================================
// MERGE: 保留不冲突的既有记录, 同 id 以导入记录覆盖
// REPLACE: 整体替换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportMode {
    Merge,
    Replace,
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportMode::Merge => write!(f, "MERGE"),
            ImportMode::Replace => write!(f, "REPLACE"),
        }
    }
}

impl FromStr for ImportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MERGE" => Ok(ImportMode::Merge),
            "REPLACE" => Ok(ImportMode::Replace),
            other => Err(format!("未知的导入模式: {}", other)),
        }
    }
}

// ==========================================
// 主数据种类 (Master Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MasterKind {
    Product, // 商品
    Process, // 工序
    Worker,  // 作业者
}

impl MasterKind {
    /// 键值存储中的键名
    pub fn storage_key(&self) -> &'static str {
        match self {
            MasterKind::Product => "products",
            MasterKind::Process => "processes",
            MasterKind::Worker => "workers",
        }
    }

    pub fn all() -> [MasterKind; 3] {
        [MasterKind::Product, MasterKind::Process, MasterKind::Worker]
    }
}

impl fmt::Display for MasterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MasterKind::Product => write!(f, "PRODUCT"),
            MasterKind::Process => write!(f, "PROCESS"),
            MasterKind::Worker => write!(f, "WORKER"),
        }
    }
}

impl FromStr for MasterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PRODUCT" | "PRODUCTS" => Ok(MasterKind::Product),
            "PROCESS" | "PROCESSES" => Ok(MasterKind::Process),
            "WORKER" | "WORKERS" => Ok(MasterKind::Worker),
            other => Err(format!("未知的主数据种类: {}", other)),
        }
    }
}

// ==========================================
// 表格排序字段 / 方向
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordSortField {
    Date,
    Product,
    Process,
    PlannedQuantity,
    ActualQuantity,
    DefectCount,
    WorkMinutes,
    Worker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl Default for SortDirection {
    // 表格默认按日期倒序
    fn default() -> Self {
        SortDirection::Desc
    }
}
