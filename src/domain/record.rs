// ==========================================
// 生产进度看板 - 生产实绩记录领域模型
// ==========================================
// 规范 schema: work_minutes + worker_count + worker_name
// JSON 字段名: camelCase (与旧版前端备份兼容)
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// ProductionRecord - 生产实绩记录
// ==========================================
// 红线: 持久化后不可变, 编辑即整条替换
// 不变量: defect_count <= actual_quantity, 数量/时间 >= 0 (由 API 层校验)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecord {
    // ===== 主键 =====
    pub id: String, // UUID v4, 创建时生成, 不复用

    // ===== 维度 =====
    pub date: NaiveDate,      // 生产日期
    pub product_id: String,   // 商品主数据ID
    #[serde(default)]
    pub product_code: String, // 商品编码 (冗余显示名)
    pub process_id: String,   // 工序主数据ID
    #[serde(default)]
    pub process_name: String, // 工序名称 (冗余显示名)

    // ===== 数量 =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_quantity: Option<f64>, // 计划数量 (可选)
    pub actual_quantity: f64,          // 实绩数量
    pub defect_count: f64,             // 不良数

    // ===== 工时 / 人员 =====
    pub work_minutes: f64, // 作业时间 (分钟)
    #[serde(default)]
    pub worker_count: u32, // 作业人数
    #[serde(default)]
    pub worker_name: String, // 作业者

    #[serde(default)]
    pub notes: String, // 备注
}

impl ProductionRecord {
    /// 由表单输入构造新记录 (生成新 id)
    ///
    /// # 参数
    /// - date: 已解析的日期
    /// - input: 表单输入
    /// - product_code / process_name: 由主数据解析出的显示名
    pub fn create(
        date: NaiveDate,
        input: &RecordInput,
        product_code: String,
        process_name: String,
    ) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), date, input, product_code, process_name)
    }

    /// 以指定 id 构造记录 (用于整条替换)
    pub fn with_id(
        id: String,
        date: NaiveDate,
        input: &RecordInput,
        product_code: String,
        process_name: String,
    ) -> Self {
        Self {
            id,
            date,
            product_id: input.product_id.trim().to_string(),
            product_code,
            process_id: input.process_id.trim().to_string(),
            process_name,
            planned_quantity: input.planned_quantity,
            actual_quantity: input.actual_quantity,
            defect_count: input.defect_count,
            work_minutes: input.work_minutes,
            worker_count: input.worker_count,
            worker_name: input.worker_name.trim().to_string(),
            notes: input.notes.clone(),
        }
    }

    /// 计划数量 (缺省视为 0)
    pub fn planned_or_zero(&self) -> f64 {
        self.planned_quantity.unwrap_or(0.0)
    }

    /// 作业时间 (小时) = 分钟 / 60
    pub fn work_hours(&self) -> f64 {
        self.work_minutes / 60.0
    }

    /// 显示用商品标签: 编码为空时回退到 id
    pub fn product_label(&self) -> &str {
        if self.product_code.is_empty() {
            &self.product_id
        } else {
            &self.product_code
        }
    }
}

// ==========================================
// RecordInput - 录入表单输入
// ==========================================
// 日期以文本接收, 由 RecordValidator 解析并校验
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInput {
    pub date: String,
    pub product_id: String,
    #[serde(default)]
    pub product_code: Option<String>,
    pub process_id: String,
    #[serde(default)]
    pub process_name: Option<String>,
    #[serde(default)]
    pub planned_quantity: Option<f64>,
    pub actual_quantity: f64,
    pub defect_count: f64,
    pub work_minutes: f64,
    #[serde(default)]
    pub worker_count: u32,
    #[serde(default)]
    pub worker_name: String,
    #[serde(default)]
    pub notes: String,
}

impl RecordInput {
    /// 从已有记录回填表单 (编辑场景)
    pub fn from_record(record: &ProductionRecord) -> Self {
        Self {
            date: record.date.format("%Y-%m-%d").to_string(),
            product_id: record.product_id.clone(),
            product_code: Some(record.product_code.clone()),
            process_id: record.process_id.clone(),
            process_name: Some(record.process_name.clone()),
            planned_quantity: record.planned_quantity,
            actual_quantity: record.actual_quantity,
            defect_count: record.defect_count,
            work_minutes: record.work_minutes,
            worker_count: record.worker_count,
            worker_name: record.worker_name.clone(),
            notes: record.notes.clone(),
        }
    }
}
