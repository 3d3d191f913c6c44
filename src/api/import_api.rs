// ==========================================
// 生产进度看板 - 备份导入 API
// ==========================================
// 职责: JSON 备份导入 (合并 / 替换)
// 红线: 全部记录校验通过后一次性写入, 任一失败不写入
// ==========================================

use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::RecordValidator;
use crate::domain::types::ImportMode;
use crate::importer::backup::{parse_backup_json, plan_import, ImportSummary};
use crate::importer::error::ImportError;
use crate::repository::record_store::RecordStore;

// ==========================================
// ImportApi - 备份导入 API
// ==========================================
pub struct ImportApi {
    store: Arc<dyn RecordStore>,
    validator: RecordValidator,
}

impl ImportApi {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            validator: RecordValidator::new(),
        }
    }

    /// 导入 JSON 备份文本
    ///
    /// # 参数
    /// - json_text: 备份内容 (记录数组, 兼容旧版 schema)
    /// - mode: MERGE (同 id 覆盖) / REPLACE (整体替换)
    pub fn import_backup(&self, json_text: &str, mode: ImportMode) -> ApiResult<ImportSummary> {
        let imported = parse_backup_json(json_text)?;

        for (index, record) in imported.iter().enumerate() {
            if let Err(err) = self.validator.validate_record(record) {
                warn!("备份导入中止: 第 {} 条记录校验失败: {}", index, err);
                return Err(ImportError::InvalidRecord {
                    index,
                    message: err.to_string(),
                }
                .into());
            }
        }

        // 规划与写入在同一次原子读-改-写内完成
        let mut pending = Some(imported);
        let mut summary = None;
        self.store.modify_records(&mut |records| {
            let Some(imported) = pending.take() else {
                return Ok(false);
            };
            let plan = plan_import(records, imported, mode);
            *records = plan.records;
            summary = Some(plan.summary);
            Ok(true)
        })?;
        let summary = summary
            .ok_or_else(|| ApiError::InternalError("备份导入未执行".to_string()))?;

        info!(
            "备份导入完成: mode={}, imported={}, kept={}, overwritten={}, removed={}, total={}",
            summary.mode,
            summary.imported,
            summary.kept,
            summary.overwritten,
            summary.removed,
            summary.total
        );
        Ok(summary)
    }

    /// 从文件导入 JSON 备份
    pub fn import_backup_file<P: AsRef<Path>>(&self, file_path: P, mode: ImportMode) -> ApiResult<ImportSummary> {
        let path = file_path.as_ref();
        if !path.exists() {
            return Err(ApiError::NotFound(format!("文件不存在: {}", path.display())));
        }
        let text = fs::read_to_string(path).map_err(|e| ApiError::ImportError(e.to_string()))?;
        self.import_backup(&text, mode)
    }
}
