// ==========================================
// 生产进度看板 - JSON 备份导入
// ==========================================
// 职责: 解析备份 JSON (含旧版 schema 迁移) + 合并/替换规划
// 旧版字段: workHours → workMinutes*60, workers → workerCount,
//           productName → productCode, 仅 workerName → workerCount=1
// 红线: 纯函数, 写入由 API 层统一完成
// ==========================================

use crate::domain::record::ProductionRecord;
use crate::domain::types::ImportMode;
use crate::importer::error::{ImportError, ImportResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use uuid::Uuid;

// ==========================================
// 解析
// ==========================================

/// 解析备份 JSON 文本
///
/// # 返回
/// - Ok(Vec<ProductionRecord>): 规范 schema 的记录 (保持文件顺序)
/// - Err(JsonParseError): 非法 JSON
/// - Err(InvalidBackupFormat): 顶层不是数组
/// - Err(InvalidRecord): 某条记录无法解析, 或 id 与前面的记录重复 (带序号)
pub fn parse_backup_json(text: &str) -> ImportResult<Vec<ProductionRecord>> {
    let value: Value = serde_json::from_str(text)?;
    let items = value
        .as_array()
        .ok_or_else(|| ImportError::InvalidBackupFormat("顶层必须是记录数组".to_string()))?;

    let records = items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_backup_record(index, item))
        .collect::<ImportResult<Vec<_>>>()?;
    ensure_unique_ids(&records)?;
    Ok(records)
}

/// 记录 id 在导入集合内必须唯一
pub fn ensure_unique_ids(records: &[ProductionRecord]) -> ImportResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        if !seen.insert(record.id.as_str()) {
            return Err(ImportError::InvalidRecord {
                index,
                message: format!("记录 id 重复: {}", record.id),
            });
        }
    }
    Ok(())
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// 数值字段: 接受数字或数字字符串, 空串/null 视为缺失
fn number_field(obj: &Map<String, Value>, key: &str, index: usize) -> ImportResult<Option<f64>> {
    let invalid = || ImportError::InvalidRecord {
        index,
        message: format!("字段 {} 不是有效数值", key),
    };
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(invalid),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse::<f64>().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

/// 日期: 取前 10 位 (兼容 ISO 日期时间)
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn parse_backup_record(index: usize, item: &Value) -> ImportResult<ProductionRecord> {
    let invalid = |message: String| ImportError::InvalidRecord { index, message };
    let obj = item
        .as_object()
        .ok_or_else(|| invalid("记录必须是对象".to_string()))?;

    let id = text_field(obj, "id").unwrap_or_else(|| Uuid::new_v4().to_string());

    let raw_date = text_field(obj, "date").ok_or_else(|| invalid("缺少日期".to_string()))?;
    let date = parse_date(&raw_date).ok_or_else(|| invalid(format!("日期格式错误: {}", raw_date)))?;

    // 商品 / 工序: 旧版只有显示名时以显示名充当 id
    let product_code = text_field(obj, "productCode")
        .or_else(|| text_field(obj, "productName"))
        .unwrap_or_default();
    let product_id = text_field(obj, "productId").unwrap_or_else(|| product_code.clone());
    let process_name = text_field(obj, "processName")
        .or_else(|| text_field(obj, "process"))
        .unwrap_or_default();
    let process_id = text_field(obj, "processId").unwrap_or_else(|| process_name.clone());

    let work_minutes = match number_field(obj, "workMinutes", index)? {
        Some(minutes) => minutes,
        None => number_field(obj, "workHours", index)?.map_or(0.0, |h| h * 60.0),
    };

    let worker_name = text_field(obj, "workerName").unwrap_or_default();
    let worker_count = match number_field(obj, "workerCount", index)?
        .or(number_field(obj, "workers", index)?)
    {
        Some(n) if n < 0.0 || n.fract() != 0.0 || n > u32::MAX as f64 => {
            return Err(invalid(format!("作业人数无效: {}", n)));
        }
        Some(n) => n as u32,
        None if !worker_name.is_empty() => 1,
        None => 0,
    };

    Ok(ProductionRecord {
        id,
        date,
        product_id,
        product_code,
        process_id,
        process_name,
        planned_quantity: number_field(obj, "plannedQuantity", index)?,
        actual_quantity: number_field(obj, "actualQuantity", index)?.unwrap_or(0.0),
        defect_count: number_field(obj, "defectCount", index)?.unwrap_or(0.0),
        work_minutes,
        worker_count,
        worker_name,
        notes: obj
            .get("notes")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

// ==========================================
// 合并 / 替换规划
// ==========================================

/// 导入摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub mode: ImportMode,
    pub imported: usize,    // 导入文件中的记录数
    pub kept: usize,        // 保留的既有记录数
    pub overwritten: usize, // 被同 id 导入记录覆盖的既有记录数 (Merge)
    pub removed: usize,     // 被整体替换掉的既有记录数 (Replace)
    pub total: usize,       // 导入后的记录总数
}

/// 导入规划结果
#[derive(Debug, Clone)]
pub struct ImportPlan {
    pub records: Vec<ProductionRecord>,
    pub summary: ImportSummary,
}

/// 规划导入后的记录集合
///
/// # 规则
/// - Merge: 保留 id 不在导入集合中的既有记录 (原顺序), 其后追加全部导入记录
/// - Replace: 导入集合整体替换既有记录
pub fn plan_import(
    existing: &[ProductionRecord],
    imported: Vec<ProductionRecord>,
    mode: ImportMode,
) -> ImportPlan {
    let imported_count = imported.len();

    let (records, summary) = match mode {
        ImportMode::Merge => {
            let incoming_ids: HashSet<&str> = imported.iter().map(|r| r.id.as_str()).collect();
            let kept: Vec<ProductionRecord> = existing
                .iter()
                .filter(|r| !incoming_ids.contains(r.id.as_str()))
                .cloned()
                .collect();
            let kept_count = kept.len();

            let mut records = kept;
            records.extend(imported);
            let summary = ImportSummary {
                mode,
                imported: imported_count,
                kept: kept_count,
                overwritten: existing.len() - kept_count,
                removed: 0,
                total: records.len(),
            };
            (records, summary)
        }
        ImportMode::Replace => {
            let summary = ImportSummary {
                mode,
                imported: imported_count,
                kept: 0,
                overwritten: 0,
                removed: existing.len(),
                total: imported_count,
            };
            (imported, summary)
        }
    };

    ImportPlan { records, summary }
}
