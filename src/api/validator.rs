// ==========================================
// 生产进度看板 - 记录校验器
// ==========================================
// 职责: 录入/编辑/导入记录的字段校验
// 规则: 收集全部违规项后一次性返回, 有违规则不写入
// ==========================================

use chrono::NaiveDate;

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::domain::record::{ProductionRecord, RecordInput};

/// 日期格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 数值字段的公共部分
struct Quantities {
    planned: Option<f64>,
    actual: f64,
    defects: f64,
    minutes: f64,
}

// ==========================================
// RecordValidator - 记录校验器
// ==========================================
pub struct RecordValidator;

impl RecordValidator {
    pub fn new() -> Self {
        Self
    }

    /// 校验表单输入
    ///
    /// # 返回
    /// - Ok(NaiveDate): 校验通过, 返回解析后的日期
    /// - Err(ApiError::RecordValidationError): 全部违规项
    pub fn validate(&self, input: &RecordInput) -> ApiResult<NaiveDate> {
        let mut violations = Vec::new();

        let date_text = input.date.trim();
        let date = if date_text.is_empty() {
            violations.push(ValidationViolation::new("date", "日期不能为空"));
            None
        } else {
            match NaiveDate::parse_from_str(date_text, DATE_FORMAT) {
                Ok(d) => Some(d),
                Err(_) => {
                    violations.push(ValidationViolation::new("date", "日期格式必须为 YYYY-MM-DD"));
                    None
                }
            }
        };

        Self::check_references(&input.product_id, &input.process_id, &mut violations);
        Self::check_quantities(
            &Quantities {
                planned: input.planned_quantity,
                actual: input.actual_quantity,
                defects: input.defect_count,
                minutes: input.work_minutes,
            },
            &mut violations,
        );
        Self::check_worker(&input.worker_name, input.worker_count, &mut violations);

        match date {
            Some(d) if violations.is_empty() => Ok(d),
            _ => Err(ApiError::RecordValidationError { violations }),
        }
    }

    /// 校验已成型的记录 (导入场景)
    pub fn validate_record(&self, record: &ProductionRecord) -> ApiResult<()> {
        let mut violations = Vec::new();
        if record.id.trim().is_empty() {
            violations.push(ValidationViolation::new("id", "记录ID不能为空"));
        }
        Self::check_references(&record.product_id, &record.process_id, &mut violations);
        Self::check_quantities(
            &Quantities {
                planned: record.planned_quantity,
                actual: record.actual_quantity,
                defects: record.defect_count,
                minutes: record.work_minutes,
            },
            &mut violations,
        );
        Self::check_worker(&record.worker_name, record.worker_count, &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ApiError::RecordValidationError { violations })
        }
    }

    fn check_references(product_id: &str, process_id: &str, violations: &mut Vec<ValidationViolation>) {
        if product_id.trim().is_empty() {
            violations.push(ValidationViolation::new("productId", "商品不能为空"));
        }
        if process_id.trim().is_empty() {
            violations.push(ValidationViolation::new("processId", "工序不能为空"));
        }
    }

    // NaN 不满足 >= 0, 一并视为违规
    fn check_quantities(q: &Quantities, violations: &mut Vec<ValidationViolation>) {
        if let Some(planned) = q.planned {
            if !(planned >= 0.0) || !planned.is_finite() {
                violations.push(ValidationViolation::new("plannedQuantity", "计划数量必须大于等于0"));
            }
        }
        if !(q.actual >= 0.0) || !q.actual.is_finite() {
            violations.push(ValidationViolation::new("actualQuantity", "实绩数量必须大于等于0"));
        }
        if !(q.defects >= 0.0) || !q.defects.is_finite() {
            violations.push(ValidationViolation::new("defectCount", "不良数必须大于等于0"));
        } else if q.defects > q.actual {
            violations.push(ValidationViolation::new("defectCount", "不良数不能大于实绩数量"));
        }
        if !(q.minutes >= 0.0) || !q.minutes.is_finite() {
            violations.push(ValidationViolation::new("workMinutes", "作业时间必须大于等于0"));
        }
    }

    fn check_worker(worker_name: &str, worker_count: u32, violations: &mut Vec<ValidationViolation>) {
        if worker_name.trim().is_empty() && worker_count == 0 {
            violations.push(ValidationViolation::new("workerName", "作业者不能为空"));
        }
    }
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> RecordInput {
        RecordInput {
            date: "2024-01-02".to_string(),
            product_id: "p1".to_string(),
            process_id: "c1".to_string(),
            actual_quantity: 80.0,
            defect_count: 4.0,
            work_minutes: 480.0,
            worker_name: "田中".to_string(),
            ..Default::default()
        }
    }

    fn fields(err: ApiError) -> Vec<String> {
        match err {
            ApiError::RecordValidationError { violations } => {
                violations.into_iter().map(|v| v.field).collect()
            }
            other => panic!("Expected RecordValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_input_returns_date() {
        let date = RecordValidator::new().validate(&valid_input()).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_defects_exceeding_actual_rejected() {
        let mut input = valid_input();
        input.defect_count = 81.0;
        let err = RecordValidator::new().validate(&input).unwrap_err();
        assert_eq!(fields(err), vec!["defectCount"]);
    }

    #[test]
    fn test_collects_all_violations() {
        let input = RecordInput {
            date: "2024/01/02".to_string(),
            actual_quantity: -1.0,
            defect_count: -1.0,
            work_minutes: f64::NAN,
            planned_quantity: Some(-5.0),
            ..Default::default()
        };
        let f = fields(RecordValidator::new().validate(&input).unwrap_err());
        for expected in [
            "date",
            "productId",
            "processId",
            "plannedQuantity",
            "actualQuantity",
            "defectCount",
            "workMinutes",
            "workerName",
        ] {
            assert!(f.iter().any(|x| x == expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_worker_count_satisfies_worker_rule() {
        let mut input = valid_input();
        input.worker_name.clear();
        input.worker_count = 2;
        assert!(RecordValidator::new().validate(&input).is_ok());
    }

    #[test]
    fn test_validate_record() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let mut record = ProductionRecord::create(date, &valid_input(), "A".to_string(), "B".to_string());
        assert!(RecordValidator::new().validate_record(&record).is_ok());

        record.defect_count = 100.0;
        assert_eq!(
            fields(RecordValidator::new().validate_record(&record).unwrap_err()),
            vec!["defectCount"]
        );
    }
}
