// ==========================================
// 生产进度看板 - CSV 导出
// ==========================================
// 格式: 表头 (当前语言) + 每条记录一行, 逗号分隔
// 含逗号/引号/换行的字段由 csv crate 加引号并转义
// ==========================================

use crate::domain::record::ProductionRecord;
use crate::exporter::error::{ExportError, ExportResult};
use crate::exporter::rows::{column_headers, record_row};
use csv::{QuoteStyle, WriterBuilder};

// ==========================================
// CsvExporter
// ==========================================
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    /// 导出为 CSV 文本
    ///
    /// # 返回
    /// - Err(NoData): 记录为空
    pub fn export(&self, records: &[ProductionRecord]) -> ExportResult<String> {
        if records.is_empty() {
            return Err(ExportError::NoData);
        }

        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .from_writer(Vec::new());

        writer.write_record(column_headers())?;
        for record in records {
            writer.write_record(record_row(record))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::CsvWriteError(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ExportError::CsvWriteError(e.to_string()))
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{set_locale, tests::LOCALE_TEST_LOCK};
    use chrono::NaiveDate;

    fn record(notes: &str) -> ProductionRecord {
        ProductionRecord {
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
            notes: notes.to_string(),
        }
    }

    #[test]
    fn test_export_empty_is_no_data() {
        assert!(matches!(CsvExporter::new().export(&[]), Err(ExportError::NoData)));
    }

    #[test]
    fn test_export_header_and_rows() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let csv = CsvExporter::new().export(&[record("ok")]).unwrap();
        set_locale("zh-CN");

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Date,Product Code,Process"));
        assert_eq!(
            lines[1],
            "2024-01-02,A-100,組立,100,80,4,8.00,2,田中,80.00,5.00,10.00,40.00,ok"
        );
    }

    #[test]
    fn test_export_quotes_special_characters() {
        let csv = CsvExporter::new()
            .export(&[record("再検査, \"至急\"\n確認")])
            .unwrap();
        assert!(csv.contains("\"再検査, \"\"至急\"\"\n確認\""));
    }
}
