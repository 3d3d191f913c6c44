// ==========================================
// 生产进度看板 - 看板 API
// ==========================================
// 职责: KPI 汇总、趋势、图表序列、近期记录、分组汇总
// 口径:
// - 平均值/汇总: 筛选后的全部记录
// - 图表序列/近期平均: 近 N 条 (按日期倒序取 N 条, 图表按日期正序输出)
// - 趋势: (近期平均 - 整体平均) / 整体平均 * 100
// ==========================================

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::common::{load_classifier, RecordFilter};
use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::ConfigManager;
use crate::domain::record::ProductionRecord;
use crate::domain::types::Severity;
use crate::engine::metrics::{
    aggregate_by_product, aggregate_by_worker, aggregate_totals, average_defect_rate,
    average_efficiency, to_defect_rate_series, to_efficiency_series, to_output_per_worker_series,
    to_productivity_series, trend_percent, GroupTotals, ProductionTotals, SeriesPoint,
};
use crate::engine::query::recent_records;
use crate::repository::record_store::RecordStore;

// ==========================================
// DashboardSummary - 看板汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub record_count: usize,

    // ===== KPI =====
    pub average_efficiency: f64,
    pub average_defect_rate: f64,
    pub efficiency_trend: f64,
    pub defect_rate_trend: f64,
    pub efficiency_severity: Severity,
    pub defect_rate_severity: Severity,
    pub totals: ProductionTotals,

    // ===== 图表序列 (近 N 条, 日期正序) =====
    pub efficiency_series: Vec<SeriesPoint>,
    pub defect_rate_series: Vec<SeriesPoint>,
    pub output_per_worker_series: Vec<SeriesPoint>,
    pub productivity_series: Vec<SeriesPoint>,

    // ===== 近期记录 (日期倒序) =====
    pub recent_records: Vec<ProductionRecord>,
}

// ==========================================
// DashboardApi - 看板 API
// ==========================================
pub struct DashboardApi {
    store: Arc<dyn RecordStore>,
    config_manager: Arc<ConfigManager>,
}

impl DashboardApi {
    /// 创建新的DashboardApi实例
    pub fn new(store: Arc<dyn RecordStore>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            store,
            config_manager,
        }
    }

    fn filtered_records(&self, filter: &RecordFilter) -> ApiResult<Vec<ProductionRecord>> {
        let records = self.store.get_all()?;
        filter.apply(&records)
    }

    /// 看板汇总
    ///
    /// # 参数
    /// - filter: 检索词 + 日期区间
    ///
    /// # 返回
    /// - Ok(DashboardSummary): 空集合时各指标为 0, 序列为空
    pub fn get_summary(&self, filter: &RecordFilter) -> ApiResult<DashboardSummary> {
        let records = self.filtered_records(filter)?;
        let window = self
            .config_manager
            .get_recent_window()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let classifier = load_classifier(&self.config_manager)?;

        let recent = recent_records(&records, window);
        // 图表按日期正序; 同日记录保持存储顺序
        let mut chart_window = recent.clone();
        chart_window.sort_by_key(|r| r.date);

        let avg_efficiency = average_efficiency(&records);
        let avg_defect_rate = average_defect_rate(&records);
        let recent_efficiency = average_efficiency(&recent);
        let recent_defect_rate = average_defect_rate(&recent);

        debug!(
            "dashboard summary: records={}, window={}, avg_eff={:.2}, avg_defect={:.2}",
            records.len(),
            recent.len(),
            avg_efficiency,
            avg_defect_rate
        );

        Ok(DashboardSummary {
            record_count: records.len(),
            average_efficiency: avg_efficiency,
            average_defect_rate: avg_defect_rate,
            efficiency_trend: trend_percent(recent_efficiency, avg_efficiency),
            defect_rate_trend: trend_percent(recent_defect_rate, avg_defect_rate),
            efficiency_severity: classifier.classify_efficiency(avg_efficiency),
            defect_rate_severity: classifier.classify_defect_rate(avg_defect_rate),
            totals: aggregate_totals(&records),
            efficiency_series: to_efficiency_series(&chart_window),
            defect_rate_series: to_defect_rate_series(&chart_window),
            output_per_worker_series: to_output_per_worker_series(&chart_window),
            productivity_series: to_productivity_series(&chart_window),
            recent_records: recent,
        })
    }

    /// 按作业者汇总
    pub fn get_worker_breakdown(&self, filter: &RecordFilter) -> ApiResult<Vec<GroupTotals>> {
        Ok(aggregate_by_worker(&self.filtered_records(filter)?))
    }

    /// 按商品汇总
    pub fn get_product_breakdown(&self, filter: &RecordFilter) -> ApiResult<Vec<GroupTotals>> {
        Ok(aggregate_by_product(&self.filtered_records(filter)?))
    }
}
