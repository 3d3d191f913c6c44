// ==========================================
// 生产进度看板 - 指标计算引擎
// ==========================================
// 职责: 单条记录 → 派生指标; 记录集合 → 序列 / 汇总
// 红线: 纯函数, 无 I/O, 不修改输入
// 红线: 除零一律返回 0 (不返回 NaN / Infinity), 保证看板在数据不全时可渲染
// ==========================================

use crate::domain::record::ProductionRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// 输出结构
// ==========================================

/// 单条记录的四项派生指标
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetrics {
    pub efficiency: f64,        // 效率 (%)
    pub defect_rate: f64,       // 不良率 (%)
    pub productivity: f64,      // 生产性 (个/小时)
    pub output_per_worker: f64, // 人均产量 (个/人)
}

/// 趋势序列中的一个点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// 集合汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionTotals {
    pub record_count: usize,
    pub total_planned: f64,
    pub total_actual: f64,
    pub total_defects: f64,
    pub total_hours: f64,
    pub achievement_rate: f64,     // 达成率 (%)
    pub overall_productivity: f64, // 整体生产性 (个/小时)
    pub overall_defect_rate: f64,  // 整体不良率 (%)
}

/// 按作业者 / 商品分组的汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTotals {
    pub key: String,
    pub totals: ProductionTotals,
}

// ==========================================
// 基础: 安全除法
// ==========================================

/// 分母 <= 0 (或结果非有限) 时返回 0
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        let value = numerator / denominator;
        if value.is_finite() {
            return value;
        }
    }
    0.0
}

// ==========================================
// 单条记录指标
// ==========================================

/// 效率 = 实绩 / 计划 * 100 (计划 <= 0 时为 0)
pub fn efficiency(record: &ProductionRecord) -> f64 {
    ratio(record.actual_quantity, record.planned_or_zero()) * 100.0
}

/// 不良率 = 不良数 / 实绩 * 100 (实绩 <= 0 时为 0)
pub fn defect_rate(record: &ProductionRecord) -> f64 {
    ratio(record.defect_count, record.actual_quantity) * 100.0
}

/// 生产性 = 实绩 / 作业小时 (分钟先换算为小时)
pub fn productivity(record: &ProductionRecord) -> f64 {
    ratio(record.actual_quantity, record.work_hours())
}

/// 人均产量 = 实绩 / 作业人数
pub fn output_per_worker(record: &ProductionRecord) -> f64 {
    ratio(record.actual_quantity, f64::from(record.worker_count))
}

/// 四项指标打包
pub fn record_metrics(record: &ProductionRecord) -> RecordMetrics {
    RecordMetrics {
        efficiency: efficiency(record),
        defect_rate: defect_rate(record),
        productivity: productivity(record),
        output_per_worker: output_per_worker(record),
    }
}

// ==========================================
// 序列 (保持输入顺序, 排序由调用方负责)
// ==========================================

fn to_series(records: &[ProductionRecord], metric: fn(&ProductionRecord) -> f64) -> Vec<SeriesPoint> {
    records
        .iter()
        .map(|r| SeriesPoint {
            date: r.date,
            value: metric(r),
        })
        .collect()
}

pub fn to_efficiency_series(records: &[ProductionRecord]) -> Vec<SeriesPoint> {
    to_series(records, efficiency)
}

pub fn to_defect_rate_series(records: &[ProductionRecord]) -> Vec<SeriesPoint> {
    to_series(records, defect_rate)
}

pub fn to_output_per_worker_series(records: &[ProductionRecord]) -> Vec<SeriesPoint> {
    to_series(records, output_per_worker)
}

pub fn to_productivity_series(records: &[ProductionRecord]) -> Vec<SeriesPoint> {
    to_series(records, productivity)
}

// ==========================================
// 平均值 (空集合为 0)
// ==========================================

fn average_of(records: &[ProductionRecord], metric: fn(&ProductionRecord) -> f64) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records.iter().map(metric).sum();
    sum / records.len() as f64
}

pub fn average_efficiency(records: &[ProductionRecord]) -> f64 {
    average_of(records, efficiency)
}

pub fn average_defect_rate(records: &[ProductionRecord]) -> f64 {
    average_of(records, defect_rate)
}

// ==========================================
// 汇总
// ==========================================

/// 汇总计划/实绩/不良/工时, 并派生达成率、整体生产性、整体不良率
pub fn aggregate_totals(records: &[ProductionRecord]) -> ProductionTotals {
    let mut totals = ProductionTotals {
        record_count: records.len(),
        ..Default::default()
    };

    for r in records {
        totals.total_planned += r.planned_or_zero();
        totals.total_actual += r.actual_quantity;
        totals.total_defects += r.defect_count;
        totals.total_hours += r.work_hours();
    }

    totals.achievement_rate = ratio(totals.total_actual, totals.total_planned) * 100.0;
    totals.overall_productivity = ratio(totals.total_actual, totals.total_hours);
    totals.overall_defect_rate = ratio(totals.total_defects, totals.total_actual) * 100.0;
    totals
}

/// 趋势 = (近期平均 - 整体平均) / 整体平均 * 100 (整体平均 <= 0 时为 0)
pub fn trend_percent(recent_avg: f64, overall_avg: f64) -> f64 {
    ratio(recent_avg - overall_avg, overall_avg) * 100.0
}

fn aggregate_by(
    records: &[ProductionRecord],
    key_of: impl Fn(&ProductionRecord) -> String,
) -> Vec<GroupTotals> {
    let mut groups: BTreeMap<String, Vec<ProductionRecord>> = BTreeMap::new();
    for r in records {
        groups.entry(key_of(r)).or_default().push(r.clone());
    }

    groups
        .into_iter()
        .map(|(key, group)| GroupTotals {
            totals: aggregate_totals(&group),
            key,
        })
        .collect()
}

/// 按作业者汇总 (作业者为空的记录归入空键)
pub fn aggregate_by_worker(records: &[ProductionRecord]) -> Vec<GroupTotals> {
    aggregate_by(records, |r| r.worker_name.clone())
}

/// 按商品汇总 (键为显示标签)
pub fn aggregate_by_product(records: &[ProductionRecord]) -> Vec<GroupTotals> {
    aggregate_by(records, |r| r.product_label().to_string())
}
