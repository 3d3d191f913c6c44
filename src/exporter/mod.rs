// ==========================================
// 生产进度看板 - 导出层
// ==========================================
// 职责: CSV / 打印报告 (HTML) / JSON 备份
// 红线: 只生成内容, 写文件由 API 层完成
// ==========================================

pub mod backup;
pub mod csv_export;
pub mod error;
pub mod filenames;
pub mod print_report;
pub mod rows;

pub use backup::export_backup_json;
pub use csv_export::CsvExporter;
pub use error::{ExportError, ExportResult};
pub use filenames::{backup_file_name, csv_file_name, report_file_name};
pub use print_report::PrintReportRenderer;
