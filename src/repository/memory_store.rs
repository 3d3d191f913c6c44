// ==========================================
// 生产进度看板 - 内存记录存储
// ==========================================
// 用途: 单元测试、无持久化的一次性运行
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_store::RecordStore;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    values: Mutex<HashMap<String, String>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn modify_value(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<&str>) -> RepositoryResult<Option<String>>,
    ) -> RepositoryResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        if let Some(next) = f(values.get(key).map(String::as_str))? {
            values.insert(key.to_string(), next);
        }
        Ok(())
    }
}
