// ==========================================
// 生产进度看板 - 主数据 API
// ==========================================
// 职责: 商品 / 工序 / 作业者的增删查, 编码文件批量导入
// 红线: 删除主数据不级联删除记录 (记录保留冗余显示名)
// ==========================================

use std::path::Path;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::master::MasterEntity;
use crate::domain::types::MasterKind;
use crate::importer::master_codes::{plan_master_import, MasterCodeParser};
use crate::repository::record_store::RecordStore;

/// 批量导入结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterImportResult {
    pub kind: MasterKind,
    pub added: Vec<MasterEntity>,
    pub total: usize,
}

// ==========================================
// MasterDataApi - 主数据 API
// ==========================================
pub struct MasterDataApi {
    store: Arc<dyn RecordStore>,
    parser: MasterCodeParser,
}

impl MasterDataApi {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            parser: MasterCodeParser,
        }
    }

    /// 查询主数据列表（登记顺序）
    pub fn list(&self, kind: MasterKind) -> ApiResult<Vec<MasterEntity>> {
        Ok(self.store.get_masters(kind)?)
    }

    /// 新增主数据
    ///
    /// # 返回
    /// - Err(InvalidInput): 名称为空
    /// - Err(DuplicateMaster): 同名条目已存在
    pub fn add(&self, kind: MasterKind, label: &str) -> ApiResult<MasterEntity> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ApiError::InvalidInput(format!("{}名称不能为空", kind)));
        }

        // 查重与追加在同一次原子读-改-写内完成
        let mut outcome: Option<ApiResult<MasterEntity>> = None;
        self.store.modify_masters(kind, &mut |entities| {
            if entities.iter().any(|e| e.label == label) {
                outcome = Some(Err(ApiError::DuplicateMaster(label.to_string())));
                return Ok(false);
            }
            let entity = MasterEntity::new(label);
            entities.push(entity.clone());
            outcome = Some(Ok(entity));
            Ok(true)
        })?;

        let entity = outcome.unwrap_or_else(|| Err(ApiError::InternalError("主数据新增未执行".to_string())))?;
        info!("主数据已新增: kind={}, id={}, label={}", kind, entity.id, entity.label);
        Ok(entity)
    }

    /// 删除主数据（不级联）
    pub fn remove(&self, kind: MasterKind, id: &str) -> ApiResult<()> {
        let mut removed = false;
        self.store.modify_masters(kind, &mut |entities| {
            let before = entities.len();
            entities.retain(|e| e.id != id);
            removed = entities.len() != before;
            Ok(removed)
        })?;
        if !removed {
            return Err(ApiError::NotFound(format!("{}(id={})不存在", kind, id)));
        }
        info!("主数据已删除: kind={}, id={}", kind, id);
        Ok(())
    }

    /// 从编码文件批量导入
    ///
    /// # 说明
    /// - 任一编码重复 → DuplicateMaster, 不写入
    /// - 无有效编码 → ImportError, 不写入
    pub fn import_codes_from_file<P: AsRef<Path>>(
        &self,
        kind: MasterKind,
        file_path: P,
    ) -> ApiResult<MasterImportResult> {
        let codes = self.parser.parse_file(file_path.as_ref())?;
        self.import_codes(kind, &codes)
    }

    /// 批量导入已解析的编码
    pub fn import_codes(&self, kind: MasterKind, codes: &[String]) -> ApiResult<MasterImportResult> {
        // 规划失败时不写入
        let mut outcome: Option<ApiResult<MasterImportResult>> = None;
        self.store.modify_masters(kind, &mut |entities| match plan_master_import(entities, codes) {
            Ok(plan) => {
                *entities = plan.entities;
                outcome = Some(Ok(MasterImportResult {
                    kind,
                    total: entities.len(),
                    added: plan.added,
                }));
                Ok(true)
            }
            Err(e) => {
                outcome = Some(Err(e.into()));
                Ok(false)
            }
        })?;

        let result = outcome.unwrap_or_else(|| Err(ApiError::InternalError("主数据导入未执行".to_string())))?;
        info!("主数据批量导入完成: kind={}, added={}", kind, result.added.len());
        Ok(result)
    }
}
