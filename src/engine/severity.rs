// ==========================================
// 生产进度看板 - 指标等级判定
// ==========================================
// 职责: 指标值 → Severity (全函数, 任意输入均有等级)
// 阈值来源: config_kv (见 config_keys)
// ==========================================

use crate::domain::types::Severity;
use serde::{Deserialize, Serialize};

/// 等级阈值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityThresholds {
    pub efficiency_good: f64,    // 效率 >= 此值为 Good
    pub efficiency_warning: f64, // 效率 >= 此值为 Warning
    pub defect_rate_good: f64,   // 不良率 <= 此值为 Good
    pub defect_rate_warning: f64, // 不良率 <= 此值为 Warning
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            efficiency_good: 90.0,
            efficiency_warning: 70.0,
            defect_rate_good: 3.0,
            defect_rate_warning: 8.0,
        }
    }
}

// ==========================================
// SeverityClassifier - 等级判定器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct SeverityClassifier {
    thresholds: SeverityThresholds,
}

impl SeverityClassifier {
    pub fn new(thresholds: SeverityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> SeverityThresholds {
        self.thresholds
    }

    /// 效率等级 (越高越好); NaN 判为 Critical
    pub fn classify_efficiency(&self, efficiency: f64) -> Severity {
        if efficiency >= self.thresholds.efficiency_good {
            Severity::Good
        } else if efficiency >= self.thresholds.efficiency_warning {
            Severity::Warning
        } else {
            Severity::Critical
        }
    }

    /// 不良率等级 (越低越好); NaN 判为 Critical
    pub fn classify_defect_rate(&self, defect_rate: f64) -> Severity {
        if defect_rate <= self.thresholds.defect_rate_good {
            Severity::Good
        } else if defect_rate <= self.thresholds.defect_rate_warning {
            Severity::Warning
        } else {
            Severity::Critical
        }
    }
}
