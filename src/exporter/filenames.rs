// ==========================================
// 生产进度看板 - 导出文件名
// ==========================================

use chrono::NaiveDate;

pub fn csv_file_name(date: NaiveDate) -> String {
    format!("production_data_{}.csv", date.format("%Y-%m-%d"))
}

pub fn report_file_name(date: NaiveDate) -> String {
    format!("production_report_{}.html", date.format("%Y-%m-%d"))
}

pub fn backup_file_name(date: NaiveDate) -> String {
    format!("production_data_backup_{}.json", date.format("%Y-%m-%d"))
}
