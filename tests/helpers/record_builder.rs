// ==========================================
// 录入表单构建器
// ==========================================

use production_tracker::RecordInput;

/// RecordInput 构建器 (默认值即一条合法记录)
pub struct RecordInputBuilder {
    input: RecordInput,
}

impl RecordInputBuilder {
    pub fn new(date: &str) -> Self {
        Self {
            input: RecordInput {
                date: date.to_string(),
                product_id: "P-A100".to_string(),
                product_code: Some("A-100".to_string()),
                process_id: "PR-ASSY".to_string(),
                process_name: Some("組立".to_string()),
                planned_quantity: Some(100.0),
                actual_quantity: 80.0,
                defect_count: 4.0,
                work_minutes: 480.0,
                worker_count: 2,
                worker_name: "田中".to_string(),
                notes: String::new(),
            },
        }
    }

    pub fn product(mut self, id: &str, code: &str) -> Self {
        self.input.product_id = id.to_string();
        self.input.product_code = Some(code.to_string());
        self
    }

    pub fn planned(mut self, planned: Option<f64>) -> Self {
        self.input.planned_quantity = planned;
        self
    }

    pub fn actual(mut self, actual: f64) -> Self {
        self.input.actual_quantity = actual;
        self
    }

    pub fn defects(mut self, defects: f64) -> Self {
        self.input.defect_count = defects;
        self
    }

    pub fn work_minutes(mut self, minutes: f64) -> Self {
        self.input.work_minutes = minutes;
        self
    }

    pub fn worker(mut self, name: &str, count: u32) -> Self {
        self.input.worker_name = name.to_string();
        self.input.worker_count = count;
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.input.notes = notes.to_string();
        self
    }

    pub fn build(self) -> RecordInput {
        self.input
    }
}
