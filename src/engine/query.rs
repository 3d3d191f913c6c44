// ==========================================
// 生产进度看板 - 记录查询引擎
// ==========================================
// 职责: 检索 / 日期区间筛选 / 表格排序 / 近 N 条
// 红线: 纯函数, 每次返回新集合, 不修改输入
// ==========================================

use crate::domain::record::ProductionRecord;
use crate::domain::types::{RecordSortField, SortDirection};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::cmp::Ordering;

/// 近期窗口默认条数
pub const DEFAULT_RECENT_WINDOW: usize = 10;

/// 按商品检索 (大小写不敏感的子串匹配, 匹配商品ID或商品编码)
///
/// 检索词为空白时返回全部记录
pub fn filter_by_text(records: &[ProductionRecord], term: &str) -> Vec<ProductionRecord> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|r| {
            r.product_id.to_lowercase().contains(&term)
                || r.product_code.to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}

/// 结束日的当天最后时刻 (23:59:59)
fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
}

/// 按日期区间筛选
///
/// # 参数
/// - start: 起始日期 (含), None 表示不限
/// - end: 结束日期 (含, 按当天 23:59:59 处理), None 表示不限
pub fn filter_by_date_range(
    records: &[ProductionRecord],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<ProductionRecord> {
    let start_at = start.map(|d| d.and_time(NaiveTime::MIN));
    let end_at = end.map(end_of_day);

    records
        .iter()
        .filter(|r| {
            let at = r.date.and_time(NaiveTime::MIN);
            start_at.map_or(true, |s| at >= s) && end_at.map_or(true, |e| at <= e)
        })
        .cloned()
        .collect()
}

/// 近 N 条: 按日期倒序, 同日期保持原集合顺序 (稳定排序)
pub fn recent_records(records: &[ProductionRecord], n: usize) -> Vec<ProductionRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(n);
    sorted
}

fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// 表格排序 (稳定)
pub fn sort_records(
    records: &[ProductionRecord],
    field: RecordSortField,
    direction: SortDirection,
) -> Vec<ProductionRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ord = match field {
            RecordSortField::Date => a.date.cmp(&b.date),
            RecordSortField::Product => a.product_label().cmp(b.product_label()),
            RecordSortField::Process => a.process_name.cmp(&b.process_name),
            RecordSortField::PlannedQuantity => {
                compare_f64(a.planned_or_zero(), b.planned_or_zero())
            }
            RecordSortField::ActualQuantity => compare_f64(a.actual_quantity, b.actual_quantity),
            RecordSortField::DefectCount => compare_f64(a.defect_count, b.defect_count),
            RecordSortField::WorkMinutes => compare_f64(a.work_minutes, b.work_minutes),
            RecordSortField::Worker => a.worker_name.cmp(&b.worker_name),
        };
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, date: &str, product_code: &str, actual: f64) -> ProductionRecord {
        ProductionRecord {
            id: id.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            product_id: format!("pid-{}", id),
            product_code: product_code.to_string(),
            process_id: "PR1".to_string(),
            process_name: "組立".to_string(),
            planned_quantity: None,
            actual_quantity: actual,
            defect_count: 0.0,
            work_minutes: 60.0,
            worker_count: 1,
            worker_name: String::new(),
            notes: String::new(),
        }
    }

    fn ids(records: &[ProductionRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_filter_by_text_case_insensitive() {
        let records = vec![
            record("1", "2024-01-01", "ABC-100", 1.0),
            record("2", "2024-01-02", "xyz-200", 1.0),
        ];
        assert_eq!(ids(&filter_by_text(&records, "abc")), vec!["1"]);
        assert_eq!(ids(&filter_by_text(&records, "XYZ")), vec!["2"]);
        assert_eq!(ids(&filter_by_text(&records, "PID-2")), vec!["2"]);
        assert_eq!(filter_by_text(&records, "   ").len(), 2);
        assert!(filter_by_text(&records, "none").is_empty());
    }

    #[test]
    fn test_date_range_inclusive_end_of_day() {
        let records = vec![
            record("a", "2024-01-01", "P", 50.0),
            record("b", "2024-01-08", "P", 70.0),
        ];
        let filtered =
            filter_by_date_range(&records, Some(date("2024-01-02")), Some(date("2024-01-08")));
        assert_eq!(ids(&filtered), vec!["b"]);
    }

    #[test]
    fn test_date_range_open_bounds() {
        let records = vec![
            record("a", "2024-01-01", "P", 1.0),
            record("b", "2024-01-05", "P", 1.0),
            record("c", "2024-01-09", "P", 1.0),
        ];
        assert_eq!(ids(&filter_by_date_range(&records, Some(date("2024-01-05")), None)), vec!["b", "c"]);
        assert_eq!(ids(&filter_by_date_range(&records, None, Some(date("2024-01-05")))), vec!["a", "b"]);
        assert_eq!(filter_by_date_range(&records, None, None).len(), 3);
    }

    #[test]
    fn test_recent_records_stable_ties() {
        let records = vec![
            record("1", "2024-01-01", "P", 1.0),
            record("2", "2024-01-03", "P", 1.0),
            record("3", "2024-01-03", "P", 1.0),
            record("4", "2024-01-02", "P", 1.0),
        ];
        assert_eq!(ids(&recent_records(&records, 3)), vec!["2", "3", "4"]);
        assert_eq!(recent_records(&records, 10).len(), 4);
        // 输入不被修改
        assert_eq!(ids(&records), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_sort_records_by_actual() {
        let records = vec![
            record("1", "2024-01-01", "B", 30.0),
            record("2", "2024-01-02", "A", 10.0),
            record("3", "2024-01-03", "C", 20.0),
        ];
        let asc = sort_records(&records, RecordSortField::ActualQuantity, SortDirection::Asc);
        assert_eq!(ids(&asc), vec!["2", "3", "1"]);
        let desc = sort_records(&records, RecordSortField::Product, SortDirection::Desc);
        assert_eq!(ids(&desc), vec!["3", "1", "2"]);
    }
}
