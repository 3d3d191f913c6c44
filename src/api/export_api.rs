// ==========================================
// 生产进度看板 - 导出 API
// ==========================================
// 职责: CSV / 打印报告 / JSON 备份的生成与落盘
// 说明: CSV 与报告导出筛选后的记录 (存储顺序); 备份导出全部记录
// 语言: 使用当前进程语言 (启动时与配置更新时按配置切换)
// ==========================================

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use chrono::Local;
use tracing::info;

use crate::api::common::RecordFilter;
use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::ConfigManager;
use crate::exporter::{
    backup_file_name, csv_file_name, export_backup_json, report_file_name, CsvExporter,
    PrintReportRenderer,
};
use crate::repository::record_store::{storage_keys, RecordStore};

/// 最近备份时间格式
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// ExportApi - 导出 API
// ==========================================
pub struct ExportApi {
    store: Arc<dyn RecordStore>,
    config_manager: Arc<ConfigManager>,
}

impl ExportApi {
    pub fn new(store: Arc<dyn RecordStore>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            store,
            config_manager,
        }
    }

    /// 导出 CSV 文本
    pub fn export_csv(&self, filter: &RecordFilter) -> ApiResult<String> {
        let records = filter.apply(&self.store.get_all()?)?;
        let csv = CsvExporter::new().export(&records)?;
        info!("CSV 导出完成: rows={}", records.len());
        Ok(csv)
    }

    /// 导出打印报告 (HTML)
    pub fn export_print_report(&self, filter: &RecordFilter) -> ApiResult<String> {
        let records = filter.apply(&self.store.get_all()?)?;
        let rows_per_page = self
            .config_manager
            .get_report_rows_per_page()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let html = PrintReportRenderer::new().render(&records, rows_per_page)?;
        info!("打印报告导出完成: rows={}, rows_per_page={}", records.len(), rows_per_page);
        Ok(html)
    }

    fn backup_json(&self) -> ApiResult<(String, usize)> {
        let records = self.store.get_all()?;
        Ok((export_backup_json(&records)?, records.len()))
    }

    fn record_backup_time(&self) -> ApiResult<String> {
        let now = Local::now().format(BACKUP_TIME_FORMAT).to_string();
        self.store.set_value(storage_keys::LAST_BACKUP_TIME, &now)?;
        Ok(now)
    }

    /// 导出 JSON 备份文本, 并记录最近备份时间
    ///
    /// 内容交给前端保存; 落盘请用 write_backup
    pub fn export_backup(&self) -> ApiResult<String> {
        let (json, count) = self.backup_json()?;
        let now = self.record_backup_time()?;
        info!("JSON 备份导出完成: records={}, at={}", count, now);
        Ok(json)
    }

    /// 最近备份时间 (从未备份为 None)
    pub fn last_backup_time(&self) -> ApiResult<Option<String>> {
        Ok(self.store.get_value(storage_keys::LAST_BACKUP_TIME)?)
    }

    // ==========================================
    // 落盘 (文件名带当天日期)
    // ==========================================

    fn write_file(dir: &Path, file_name: String, content: &str) -> ApiResult<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| ApiError::ExportError(e.to_string()))?;
        let path = dir.join(file_name);
        fs::write(&path, content).map_err(|e| ApiError::ExportError(e.to_string()))?;
        info!("导出文件已写入: {}", path.display());
        Ok(path)
    }

    pub fn write_csv<P: AsRef<Path>>(&self, filter: &RecordFilter, dir: P) -> ApiResult<PathBuf> {
        let content = self.export_csv(filter)?;
        Self::write_file(dir.as_ref(), csv_file_name(Local::now().date_naive()), &content)
    }

    pub fn write_print_report<P: AsRef<Path>>(&self, filter: &RecordFilter, dir: P) -> ApiResult<PathBuf> {
        let content = self.export_print_report(filter)?;
        Self::write_file(dir.as_ref(), report_file_name(Local::now().date_naive()), &content)
    }

    /// 写入 JSON 备份文件; 仅在写入成功后记录最近备份时间
    pub fn write_backup<P: AsRef<Path>>(&self, dir: P) -> ApiResult<PathBuf> {
        let (content, count) = self.backup_json()?;
        let path = Self::write_file(dir.as_ref(), backup_file_name(Local::now().date_naive()), &content)?;
        let now = self.record_backup_time()?;
        info!("JSON 备份导出完成: records={}, at={}", count, now);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_schema, open_in_memory_connection};
    use crate::domain::record::ProductionRecord;
    use crate::i18n::tests::LOCALE_TEST_LOCK;
    use crate::repository::memory_store::InMemoryRecordStore;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    fn api(records: &[ProductionRecord]) -> ExportApi {
        let conn = open_in_memory_connection().unwrap();
        init_schema(&conn).unwrap();
        let config = Arc::new(ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap());
        let store = Arc::new(InMemoryRecordStore::new());
        store.save_all(records).unwrap();
        ExportApi::new(store, config)
    }

    fn record(id: &str, day: u32) -> ProductionRecord {
        ProductionRecord {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            product_id: "p1".to_string(),
            product_code: "A-100".to_string(),
            process_id: "c1".to_string(),
            process_name: "組立".to_string(),
            planned_quantity: None,
            actual_quantity: 10.0,
            defect_count: 0.0,
            work_minutes: 60.0,
            worker_count: 1,
            worker_name: "A".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_export_csv_uses_current_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        crate::i18n::set_locale("zh-CN");
        let api = api(&[record("1", 1), record("2", 5)]);
        let csv = api.export_csv(&RecordFilter::default()).unwrap();
        assert!(csv.starts_with("日期,商品编码"));
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_export_filtered_empty_is_error() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        let api = api(&[record("1", 1)]);
        let filter = RecordFilter {
            search: Some("zzz".to_string()),
            ..Default::default()
        };
        assert!(matches!(api.export_csv(&filter), Err(ApiError::ExportError(_))));
        assert!(matches!(api.export_print_report(&filter), Err(ApiError::ExportError(_))));
    }

    #[test]
    fn test_export_backup_records_time() {
        let api = api(&[record("1", 1)]);
        assert_eq!(api.last_backup_time().unwrap(), None);
        api.export_backup().unwrap();
        assert!(api.last_backup_time().unwrap().is_some());
    }

    #[test]
    fn test_failed_backup_write_keeps_last_backup_time() {
        let api = api(&[record("1", 1)]);
        // 目标目录实为普通文件, 写入必然失败
        let not_a_dir = tempfile::NamedTempFile::new().unwrap();

        assert!(matches!(api.write_backup(not_a_dir.path()), Err(ApiError::ExportError(_))));
        assert_eq!(api.last_backup_time().unwrap(), None);

        let dir = tempfile::tempdir().unwrap();
        api.write_backup(dir.path()).unwrap();
        assert!(api.last_backup_time().unwrap().is_some());
    }

    #[test]
    fn test_write_files_use_dated_names() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        let api = api(&[record("1", 1)]);
        let dir = tempfile::tempdir().unwrap();
        let csv_path = api.write_csv(&RecordFilter::default(), dir.path()).unwrap();
        let report_path = api.write_print_report(&RecordFilter::default(), dir.path()).unwrap();
        let backup_path = api.write_backup(dir.path()).unwrap();

        let today = Local::now().date_naive();
        assert_eq!(csv_path, dir.path().join(csv_file_name(today)));
        assert_eq!(report_path, dir.path().join(report_file_name(today)));
        assert!(backup_path.exists());
        assert!(fs::read_to_string(report_path).unwrap().contains("<table>"));
    }
}
