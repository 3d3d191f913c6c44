// ==========================================
// 生产进度看板 - 主数据领域模型
// ==========================================
// 商品 / 工序 / 作业者: 统一为 {id, label}
// 兼容旧版: 商品使用 code, 工序/作业者使用 name
// 红线: 删除主数据不级联删除记录
// ==========================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// MasterEntity - 主数据条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterEntity {
    pub id: String,
    #[serde(alias = "code", alias = "name")]
    pub label: String,
}

impl MasterEntity {
    /// 创建新条目 (生成新 id)
    pub fn new(label: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: label.trim().to_string(),
        }
    }
}

/// 在主数据列表中按 id 查找显示名
pub fn resolve_label<'a>(entities: &'a [MasterEntity], id: &str) -> Option<&'a str> {
    entities
        .iter()
        .find(|e| e.id == id)
        .map(|e| e.label.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_aliases() {
        let product: MasterEntity = serde_json::from_str(r#"{"id":"1","code":"A-100"}"#).unwrap();
        let process: MasterEntity = serde_json::from_str(r#"{"id":"2","name":"切削"}"#).unwrap();
        assert_eq!(product.label, "A-100");
        assert_eq!(process.label, "切削");
    }

    #[test]
    fn test_resolve_label() {
        let list = vec![MasterEntity {
            id: "1".to_string(),
            label: "A-100".to_string(),
        }];
        assert_eq!(resolve_label(&list, "1"), Some("A-100"));
        assert_eq!(resolve_label(&list, "missing"), None);
    }
}
