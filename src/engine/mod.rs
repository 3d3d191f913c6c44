// ==========================================
// 生产进度看板 - 引擎层
// ==========================================
// 职责: 指标计算、记录查询、等级判定
// 红线: Engine 不拼 SQL, 不做 I/O, 不修改输入集合
// ==========================================

pub mod metrics;
pub mod query;
pub mod severity;

// 重导出核心引擎
pub use metrics::{
    aggregate_by_product, aggregate_by_worker, aggregate_totals, average_defect_rate,
    average_efficiency, defect_rate, efficiency, output_per_worker, productivity, record_metrics,
    to_defect_rate_series, to_efficiency_series, to_output_per_worker_series,
    to_productivity_series, trend_percent, GroupTotals, ProductionTotals, RecordMetrics,
    SeriesPoint,
};
pub use query::{
    filter_by_date_range, filter_by_text, recent_records, sort_records, DEFAULT_RECENT_WINDOW,
};
pub use severity::{SeverityClassifier, SeverityThresholds};
