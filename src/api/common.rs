// ==========================================
// 生产进度看板 - API 公共部件
// ==========================================
// 记录筛选条件 (检索词 + 日期区间) 与等级判定器加载
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::DATE_FORMAT;
use crate::config::config_manager::ConfigManager;
use crate::domain::record::ProductionRecord;
use crate::engine::query::{filter_by_date_range, filter_by_text};
use crate::engine::severity::SeverityClassifier;

// ==========================================
// RecordFilter - 记录筛选条件
// ==========================================
// 日期以 YYYY-MM-DD 文本接收; 空串等同未指定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl RecordFilter {
    /// 解析日期区间
    ///
    /// # 返回
    /// - Err(InvalidInput): 日期格式错误
    pub fn date_range(&self) -> ApiResult<(Option<NaiveDate>, Option<NaiveDate>)> {
        Ok((
            parse_optional_date("startDate", self.start_date.as_deref())?,
            parse_optional_date("endDate", self.end_date.as_deref())?,
        ))
    }

    /// 依次应用检索词与日期区间 (返回新集合, 保持原顺序)
    pub fn apply(&self, records: &[ProductionRecord]) -> ApiResult<Vec<ProductionRecord>> {
        let (start, end) = self.date_range()?;
        let searched = match self.search.as_deref() {
            Some(term) => filter_by_text(records, term),
            None => records.to_vec(),
        };
        Ok(filter_by_date_range(&searched, start, end))
    }
}

/// 解析可选日期参数
pub fn parse_optional_date(field: &str, raw: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Some)
            .map_err(|_| ApiError::InvalidInput(format!("{}格式错误: {}", field, text))),
    }
}

/// 按当前配置构造等级判定器
pub fn load_classifier(config: &ConfigManager) -> ApiResult<SeverityClassifier> {
    let thresholds = config
        .get_severity_thresholds()
        .map_err(|e| ApiError::ConfigError(e.to_string()))?;
    Ok(SeverityClassifier::new(thresholds))
}
