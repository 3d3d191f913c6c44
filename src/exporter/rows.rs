// ==========================================
// 生产进度看板 - 导出行格式
// ==========================================
// CSV 与打印报告共用同一列序
// 指标列保留 2 位小数
// ==========================================

use crate::domain::record::ProductionRecord;
use crate::engine::metrics::record_metrics;
use crate::i18n::t;

/// 列的国际化键 (按输出顺序)
pub const COLUMN_KEYS: [&str; 14] = [
    "column.date",
    "column.product_code",
    "column.process_name",
    "column.planned_quantity",
    "column.actual_quantity",
    "column.defect_count",
    "column.work_hours",
    "column.worker_count",
    "column.worker_name",
    "column.efficiency",
    "column.defect_rate",
    "column.productivity",
    "column.output_per_worker",
    "column.notes",
];

/// 当前语言下的表头
pub fn column_headers() -> Vec<String> {
    COLUMN_KEYS.iter().map(|key| t(key)).collect()
}

/// 数量: 整数不带小数位
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

fn two_dp(value: f64) -> String {
    format!("{:.2}", value)
}

/// 单条记录的导出行
pub fn record_row(record: &ProductionRecord) -> Vec<String> {
    let metrics = record_metrics(record);
    vec![
        record.date.format("%Y-%m-%d").to_string(),
        record.product_label().to_string(),
        record.process_name.clone(),
        record
            .planned_quantity
            .map(format_quantity)
            .unwrap_or_default(),
        format_quantity(record.actual_quantity),
        format_quantity(record.defect_count),
        two_dp(record.work_hours()),
        record.worker_count.to_string(),
        record.worker_name.clone(),
        two_dp(metrics.efficiency),
        two_dp(metrics.defect_rate),
        two_dp(metrics.productivity),
        two_dp(metrics.output_per_worker),
        record.notes.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_record_row_metrics_two_decimals() {
        let record = ProductionRecord {
            id: "1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            product_id: "p1".to_string(),
            product_code: "A-100".to_string(),
            process_id: "c1".to_string(),
            process_name: "組立".to_string(),
            planned_quantity: Some(100.0),
            actual_quantity: 80.0,
            defect_count: 4.0,
            work_minutes: 480.0,
            worker_count: 2,
            worker_name: "田中".to_string(),
            notes: String::new(),
        };
        let row = record_row(&record);
        assert_eq!(row.len(), COLUMN_KEYS.len());
        assert_eq!(row[0], "2024-01-02");
        assert_eq!(row[3], "100");
        assert_eq!(row[6], "8.00");
        assert_eq!(row[9], "80.00");
        assert_eq!(row[10], "5.00");
        assert_eq!(row[11], "10.00");
        assert_eq!(row[12], "40.00");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(12.0), "12");
        assert_eq!(format_quantity(12.5), "12.5");
    }
}
