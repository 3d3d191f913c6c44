// ==========================================
// 生产进度看板 - 打印报告 (HTML)
// ==========================================
// 内容: 标题 + 期间 (最早日期 ~ 最晚日期) + 分页明细表
// 分页: 每页 rows_per_page 行, 每页重复表头, 页脚 "n / total"
// 所有文本经 HTML 转义
// ==========================================

use crate::domain::record::ProductionRecord;
use crate::exporter::error::{ExportError, ExportResult};
use crate::exporter::rows::{column_headers, record_row};
use crate::i18n::t;
use chrono::NaiveDate;
use std::fmt::Write;

/// 嵌入样式 (A4 横向, 分页)
const REPORT_STYLE: &str = r#"
body { font-family: sans-serif; font-size: 10px; margin: 0; }
h1 { font-size: 18px; margin: 0 0 4px 0; }
.period { font-size: 12px; margin-bottom: 8px; }
.page { page-break-after: always; padding: 12px; }
.page:last-child { page-break-after: auto; }
table { border-collapse: collapse; width: 100%; }
th { background: #428bca; color: #fff; }
th, td { border: 1px solid #ccc; padding: 2px 4px; text-align: left; }
.footer { text-align: right; margin-top: 4px; }
@page { size: A4 landscape; }
"#;

/// HTML 转义
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// 记录集合的日期范围
pub fn date_span(records: &[ProductionRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let min = records.iter().map(|r| r.date).min()?;
    let max = records.iter().map(|r| r.date).max()?;
    Some((min, max))
}

// ==========================================
// PrintReportRenderer
// ==========================================
pub struct PrintReportRenderer;

impl PrintReportRenderer {
    pub fn new() -> Self {
        Self
    }

    /// 渲染打印报告
    ///
    /// # 参数
    /// - records: 记录 (按给定顺序输出)
    /// - rows_per_page: 每页行数 (0 按 1 处理)
    ///
    /// # 返回
    /// - Ok(String): 自包含 HTML 文档
    /// - Err(NoData): 记录为空
    pub fn render(&self, records: &[ProductionRecord], rows_per_page: usize) -> ExportResult<String> {
        let (min_date, max_date) = date_span(records).ok_or(ExportError::NoData)?;
        let rows_per_page = rows_per_page.max(1);
        let headers = column_headers();
        let pages: Vec<&[ProductionRecord]> = records.chunks(rows_per_page).collect();
        let total_pages = pages.len();
        let title = escape_html(&t("report.title"));

        let mut html = String::new();
        writeln!(html, "<!DOCTYPE html>")?;
        writeln!(html, "<html>")?;
        writeln!(html, "<head>")?;
        writeln!(html, "<meta charset=\"utf-8\">")?;
        writeln!(html, "<title>{}</title>", title)?;
        writeln!(html, "<style>{}</style>", REPORT_STYLE)?;
        writeln!(html, "</head>")?;
        writeln!(html, "<body>")?;

        for (index, page) in pages.iter().enumerate() {
            writeln!(html, "<div class=\"page\">")?;
            if index == 0 {
                writeln!(html, "  <h1>{}</h1>", title)?;
                writeln!(
                    html,
                    "  <div class=\"period\">{}: {} ~ {}</div>",
                    escape_html(&t("report.period")),
                    min_date.format("%Y-%m-%d"),
                    max_date.format("%Y-%m-%d")
                )?;
            }

            writeln!(html, "  <table>")?;
            write!(html, "    <thead><tr>")?;
            for header in &headers {
                write!(html, "<th>{}</th>", escape_html(header))?;
            }
            writeln!(html, "</tr></thead>")?;

            writeln!(html, "    <tbody>")?;
            for record in page.iter() {
                write!(html, "      <tr>")?;
                for cell in record_row(record) {
                    write!(html, "<td>{}</td>", escape_html(&cell))?;
                }
                writeln!(html, "</tr>")?;
            }
            writeln!(html, "    </tbody>")?;
            writeln!(html, "  </table>")?;
            writeln!(
                html,
                "  <div class=\"footer\">{} {} / {}</div>",
                escape_html(&t("report.page")),
                index + 1,
                total_pages
            )?;
            writeln!(html, "</div>")?;
        }

        writeln!(html, "</body>")?;
        writeln!(html, "</html>")?;
        Ok(html)
    }
}

impl Default for PrintReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}
