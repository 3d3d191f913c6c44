// ==========================================
// 生产进度看板 - 主数据编码批量导入
// ==========================================
// 支持: 文本 (.txt) / CSV (.csv, 取第一列) / Excel (.xlsx, 第一个 sheet 第一列)
// 规则: 每行一个编码, 去首尾空白, 跳过空行
// 红线: 任一编码重复即整体中止, 不做部分写入
// ==========================================

use crate::domain::master::MasterEntity;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const BOM: char = '\u{feff}';

fn clean_code(raw: &str) -> Option<String> {
    let code = raw.trim_start_matches(BOM).trim();
    if code.is_empty() {
        None
    } else {
        Some(code.to_string())
    }
}

// ==========================================
// MasterCodeParser - 编码文件解析器
// ==========================================
pub struct MasterCodeParser;

impl MasterCodeParser {
    /// 按扩展名解析编码文件
    ///
    /// # 返回
    /// - Ok(Vec<String>): 文件中的编码 (文件顺序, 未去重)
    /// - Err(FileNotFound / UnsupportedFormat / *ParseError)
    pub fn parse_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<String>> {
        let path = file_path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "txt" => Ok(self.parse_text(&fs::read_to_string(path)?)),
            "csv" => self.parse_csv(&fs::read_to_string(path)?),
            "xlsx" => self.parse_xlsx(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }

    /// 纯文本: 每行一个编码 (兼容 \r\n)
    pub fn parse_text(&self, content: &str) -> Vec<String> {
        content.lines().filter_map(clean_code).collect()
    }

    /// CSV: 无表头, 取每行第一列
    pub fn parse_csv(&self, content: &str) -> ImportResult<Vec<String>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(content.as_bytes());

        let mut codes = Vec::new();
        for result in reader.records() {
            let record = result?;
            if let Some(code) = record.get(0).and_then(clean_code) {
                codes.push(code);
            }
        }
        Ok(codes)
    }

    fn parse_xlsx(&self, path: &Path) -> ImportResult<Vec<String>> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        Ok(range
            .rows()
            .filter_map(|row| row.first())
            .filter_map(|cell| clean_code(&cell.to_string()))
            .collect())
    }
}

// ==========================================
// 导入规划
// ==========================================

/// 主数据导入规划结果
#[derive(Debug, Clone)]
pub struct MasterImportPlan {
    /// 导入后的完整列表 (既有 + 新增)
    pub entities: Vec<MasterEntity>,
    /// 新增条目
    pub added: Vec<MasterEntity>,
}

/// 规划编码批量导入
///
/// # 规则
/// - 编码与既有条目或文件内前序编码重复 → DuplicateCode (整体中止)
/// - 没有任何有效编码 → NoValidCodes
pub fn plan_master_import(
    existing: &[MasterEntity],
    codes: &[String],
) -> ImportResult<MasterImportPlan> {
    let mut seen: HashSet<&str> = existing.iter().map(|e| e.label.as_str()).collect();
    let mut added = Vec::new();

    for code in codes {
        let code = code.trim();
        if code.is_empty() {
            continue;
        }
        if !seen.insert(code) {
            return Err(ImportError::DuplicateCode(code.to_string()));
        }
        added.push(MasterEntity::new(code));
    }

    if added.is_empty() {
        return Err(ImportError::NoValidCodes);
    }

    let mut entities = existing.to_vec();
    entities.extend(added.iter().cloned());
    Ok(MasterImportPlan { entities, added })
}
