// ==========================================
// 生产进度看板 - JSON 备份导出
// ==========================================
// 格式: 规范 schema 记录数组 (camelCase, 缩进 2 空格)
// 可被 importer::parse_backup_json 原样读回
// ==========================================

use crate::domain::record::ProductionRecord;
use crate::exporter::error::{ExportError, ExportResult};

/// 导出 JSON 备份
///
/// # 返回
/// - Err(NoData): 记录为空
pub fn export_backup_json(records: &[ProductionRecord]) -> ExportResult<String> {
    if records.is_empty() {
        return Err(ExportError::NoData);
    }
    Ok(serde_json::to_string_pretty(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::parse_backup_json;
    use chrono::NaiveDate;

    #[test]
    fn test_backup_is_readable_by_importer() {
        let records = vec![ProductionRecord {
            id: "r1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            product_id: "p1".to_string(),
            product_code: "A-100".to_string(),
            process_id: "c1".to_string(),
            process_name: "組立".to_string(),
            planned_quantity: Some(120.0),
            actual_quantity: 100.0,
            defect_count: 1.0,
            work_minutes: 90.0,
            worker_count: 3,
            worker_name: "鈴木".to_string(),
            notes: "line 2".to_string(),
        }];

        let json = export_backup_json(&records).unwrap();
        assert!(json.contains("\"workMinutes\": 90.0"));
        assert_eq!(parse_backup_json(&json).unwrap(), records);
    }

    #[test]
    fn test_backup_empty_is_no_data() {
        assert!(matches!(export_backup_json(&[]), Err(ExportError::NoData)));
    }
}
