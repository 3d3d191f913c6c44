// ==========================================
// 生产进度看板 - 生产记录 API
// ==========================================
// 职责: 记录的录入、编辑、删除、查询、详情
// 红线: 校验不通过不写入; 编辑为整条替换; 删除不影响主数据
// ==========================================

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::common::{load_classifier, RecordFilter};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::RecordValidator;
use crate::config::config_manager::ConfigManager;
use crate::domain::master::resolve_label;
use crate::domain::record::{ProductionRecord, RecordInput};
use crate::domain::types::{MasterKind, RecordSortField, Severity, SortDirection};
use crate::engine::metrics::{record_metrics, RecordMetrics};
use crate::engine::query::sort_records;
use crate::repository::record_store::RecordStore;

// ==========================================
// DTO
// ==========================================

/// 记录列表查询参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordQuery {
    #[serde(flatten)]
    pub filter: RecordFilter,
    #[serde(default)]
    pub sort_field: Option<RecordSortField>,
    #[serde(default)]
    pub sort_direction: Option<SortDirection>,
}

/// 记录详情（详情弹窗用）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetail {
    pub record: ProductionRecord,
    pub product_label: String,
    pub process_label: String,
    pub work_hours: f64,
    pub metrics: RecordMetrics,
    pub efficiency_severity: Severity,
    pub defect_rate_severity: Severity,
}

// ==========================================
// RecordApi - 生产记录 API
// ==========================================
pub struct RecordApi {
    store: Arc<dyn RecordStore>,
    config_manager: Arc<ConfigManager>,
    validator: RecordValidator,
}

impl RecordApi {
    /// 创建新的RecordApi实例
    pub fn new(store: Arc<dyn RecordStore>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            store,
            config_manager,
            validator: RecordValidator::new(),
        }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 查询记录列表
    ///
    /// # 说明
    /// - 先检索/筛选, 再排序
    /// - 未指定排序字段时按日期倒序
    pub fn list_records(&self, query: &RecordQuery) -> ApiResult<Vec<ProductionRecord>> {
        let records = self.store.get_all()?;
        let filtered = query.filter.apply(&records)?;
        let field = query.sort_field.unwrap_or(RecordSortField::Date);
        let direction = query.sort_direction.unwrap_or_default();

        debug!(
            "list_records: total={}, matched={}, sort={:?}/{:?}",
            records.len(),
            filtered.len(),
            field,
            direction
        );
        Ok(sort_records(&filtered, field, direction))
    }

    /// 按 id 查询记录
    pub fn get_record(&self, id: &str) -> ApiResult<ProductionRecord> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidInput("记录ID不能为空".to_string()));
        }
        self.store
            .get_all()?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("生产记录(id={})不存在", id)))
    }

    /// 查询记录详情（指标 + 等级 + 主数据显示名）
    ///
    /// 主数据已删除时回退到记录上冗余的显示名
    pub fn get_record_detail(&self, id: &str) -> ApiResult<RecordDetail> {
        let record = self.get_record(id)?;
        let products = self.store.get_masters(MasterKind::Product)?;
        let processes = self.store.get_masters(MasterKind::Process)?;
        let classifier = load_classifier(&self.config_manager)?;
        let metrics = record_metrics(&record);

        Ok(RecordDetail {
            product_label: resolve_label(&products, &record.product_id)
                .unwrap_or_else(|| record.product_label())
                .to_string(),
            process_label: resolve_label(&processes, &record.process_id)
                .unwrap_or(&record.process_name)
                .to_string(),
            work_hours: record.work_hours(),
            efficiency_severity: classifier.classify_efficiency(metrics.efficiency),
            defect_rate_severity: classifier.classify_defect_rate(metrics.defect_rate),
            metrics,
            record,
        })
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 显示名: 主数据优先, 其次表单携带的值, 否则为空
    fn resolve_labels(&self, input: &RecordInput) -> ApiResult<(String, String)> {
        let products = self.store.get_masters(MasterKind::Product)?;
        let processes = self.store.get_masters(MasterKind::Process)?;

        let product_code = resolve_label(&products, input.product_id.trim())
            .map(str::to_string)
            .or_else(|| input.product_code.clone())
            .unwrap_or_default();
        let process_name = resolve_label(&processes, input.process_id.trim())
            .map(str::to_string)
            .or_else(|| input.process_name.clone())
            .unwrap_or_default();
        Ok((product_code, process_name))
    }

    /// 录入新记录（生成新 id）
    pub fn create_record(&self, input: &RecordInput) -> ApiResult<ProductionRecord> {
        let date = self.validator.validate(input)?;
        let (product_code, process_name) = self.resolve_labels(input)?;
        let record = ProductionRecord::create(date, input, product_code, process_name);

        self.store.add(record.clone())?;
        info!(
            "生产记录已录入: id={}, date={}, product={}",
            record.id,
            record.date,
            record.product_label()
        );
        Ok(record)
    }

    /// 编辑记录（整条替换, id 不变）
    pub fn update_record(&self, id: &str, input: &RecordInput) -> ApiResult<ProductionRecord> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidInput("记录ID不能为空".to_string()));
        }
        let date = self.validator.validate(input)?;
        let (product_code, process_name) = self.resolve_labels(input)?;
        let record = ProductionRecord::with_id(id.to_string(), date, input, product_code, process_name);

        if !self.store.update_by_id(record.clone())? {
            return Err(ApiError::NotFound(format!("生产记录(id={})不存在", id)));
        }
        info!("生产记录已更新: id={}", id);
        Ok(record)
    }

    /// 删除记录
    pub fn delete_record(&self, id: &str) -> ApiResult<()> {
        if !self.store.delete_by_id(id)? {
            return Err(ApiError::NotFound(format!("生产记录(id={})不存在", id)));
        }
        info!("生产记录已删除: id={}", id);
        Ok(())
    }

    /// 清空全部记录（主数据保留）
    ///
    /// # 返回
    /// - Ok(usize): 被删除的记录数
    pub fn clear_all_records(&self) -> ApiResult<usize> {
        let mut removed = 0;
        self.store.modify_records(&mut |records| {
            removed = records.len();
            records.clear();
            Ok(true)
        })?;
        info!("生产记录已清空: removed={}", removed);
        Ok(removed)
    }
}
