// ==========================================
// 生产进度看板 - 记录存储接口
// ==========================================
// 模型: 键值存储, 每个键保存一个 JSON 集合
// 职责: 生产记录 CRUD + 主数据列表 + 杂项键 (最近备份时间)
// 红线: Repository 不含业务逻辑 (校验在 API 层)
// ==========================================

use crate::domain::master::MasterEntity;
use crate::domain::record::ProductionRecord;
use crate::domain::types::MasterKind;
use crate::engine::query;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

// ==========================================
// 存储键
// ==========================================
pub mod storage_keys {
    /// 生产记录集合
    pub const PRODUCTION_DATA: &str = "productionData";
    /// 最近一次 JSON 备份时间
    pub const LAST_BACKUP_TIME: &str = "lastBackupTime";
}

/// 解码某个键下的 JSON 列表 (键不存在视为空列表)
fn decode_list<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> RepositoryResult<Vec<T>> {
    match raw {
        None => Ok(Vec::new()),
        Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(raw).map_err(|e| RepositoryError::CorruptData {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

fn load_list<T, S>(store: &S, key: &str) -> RepositoryResult<Vec<T>>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    decode_list(key, store.get_value(key)?.as_deref())
}

fn encode_list<T: Serialize>(items: &[T]) -> RepositoryResult<String> {
    Ok(serde_json::to_string(items)?)
}

/// 在一次原子读-改-写中修改 JSON 列表
///
/// f 返回 Ok(false) 时不写入
fn modify_list<T, S>(
    store: &S,
    key: &str,
    f: &mut dyn FnMut(&mut Vec<T>) -> RepositoryResult<bool>,
) -> RepositoryResult<()>
where
    T: Serialize + DeserializeOwned,
    S: RecordStore + ?Sized,
{
    store.modify_value(key, &mut |raw| {
        let mut items: Vec<T> = decode_list(key, raw)?;
        if f(&mut items)? {
            Ok(Some(encode_list(&items)?))
        } else {
            Ok(None)
        }
    })
}

// ==========================================
// Trait: RecordStore
// ==========================================
// 实现方提供 get_value / set_value / modify_value,
// 其余操作由默认方法基于键值语义完成
// 凡是先读后写的操作一律经 modify_value, 并发命令之间不会互相覆盖
pub trait RecordStore: Send + Sync {
    /// 读取原始值
    fn get_value(&self, key: &str) -> RepositoryResult<Option<String>>;

    /// 写入原始值
    fn set_value(&self, key: &str, value: &str) -> RepositoryResult<()>;

    /// 原子读-改-写
    ///
    /// 读取与写入在同一把锁内完成; f 返回 Ok(None) 表示不写入, 返回 Err 时不写入。
    /// f 内不得再访问同一存储。
    fn modify_value(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<&str>) -> RepositoryResult<Option<String>>,
    ) -> RepositoryResult<()>;

    // ==========================================
    // 生产记录
    // ==========================================

    /// 读取全部记录 (按存储顺序)
    fn get_all(&self) -> RepositoryResult<Vec<ProductionRecord>> {
        load_list(self, storage_keys::PRODUCTION_DATA)
    }

    /// 整体保存记录集合
    fn save_all(&self, records: &[ProductionRecord]) -> RepositoryResult<()> {
        let encoded = encode_list(records)?;
        self.set_value(storage_keys::PRODUCTION_DATA, &encoded)?;
        tracing::debug!("生产记录已保存: count={}", records.len());
        Ok(())
    }

    /// 原子修改记录集合 (f 返回 Ok(false) 时不写入)
    fn modify_records(
        &self,
        f: &mut dyn FnMut(&mut Vec<ProductionRecord>) -> RepositoryResult<bool>,
    ) -> RepositoryResult<()> {
        modify_list(self, storage_keys::PRODUCTION_DATA, f)
    }

    /// 追加一条记录
    fn add(&self, record: ProductionRecord) -> RepositoryResult<()> {
        let mut pending = Some(record);
        self.modify_records(&mut |records| match pending.take() {
            Some(record) => {
                records.push(record);
                Ok(true)
            }
            None => Ok(false),
        })?;
        tracing::debug!("生产记录已追加");
        Ok(())
    }

    /// 按 id 整条替换
    ///
    /// # 返回
    /// - Ok(true): 已替换
    /// - Ok(false): id 不存在, 未写入
    fn update_by_id(&self, record: ProductionRecord) -> RepositoryResult<bool> {
        let mut pending = Some(record);
        let mut replaced = false;
        self.modify_records(&mut |records| {
            let Some(record) = pending.take() else {
                return Ok(false);
            };
            match records.iter_mut().find(|r| r.id == record.id) {
                Some(slot) => {
                    *slot = record;
                    replaced = true;
                    Ok(true)
                }
                None => Ok(false),
            }
        })?;
        Ok(replaced)
    }

    /// 按 id 删除
    ///
    /// # 返回
    /// - Ok(true): 已删除
    /// - Ok(false): id 不存在
    fn delete_by_id(&self, id: &str) -> RepositoryResult<bool> {
        let mut removed = false;
        self.modify_records(&mut |records| {
            let before = records.len();
            records.retain(|r| r.id != id);
            removed = records.len() != before;
            Ok(removed)
        })?;
        Ok(removed)
    }

    /// 按日期区间筛选 (含两端, 结束日按 23:59:59)
    fn filter_by_date_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<ProductionRecord>> {
        Ok(query::filter_by_date_range(&self.get_all()?, start, end))
    }

    /// 按商品检索 (大小写不敏感子串)
    fn filter_by_text(&self, term: &str) -> RepositoryResult<Vec<ProductionRecord>> {
        Ok(query::filter_by_text(&self.get_all()?, term))
    }

    // ==========================================
    // 主数据
    // ==========================================

    fn get_masters(&self, kind: MasterKind) -> RepositoryResult<Vec<MasterEntity>> {
        load_list(self, kind.storage_key())
    }

    fn save_masters(&self, kind: MasterKind, entities: &[MasterEntity]) -> RepositoryResult<()> {
        let encoded = encode_list(entities)?;
        self.set_value(kind.storage_key(), &encoded)?;
        tracing::debug!("主数据已保存: kind={}, count={}", kind, entities.len());
        Ok(())
    }

    /// 原子修改某类主数据 (f 返回 Ok(false) 时不写入)
    fn modify_masters(
        &self,
        kind: MasterKind,
        f: &mut dyn FnMut(&mut Vec<MasterEntity>) -> RepositoryResult<bool>,
    ) -> RepositoryResult<()> {
        modify_list(self, kind.storage_key(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory_store::InMemoryRecordStore;

    fn record(id: &str, date: &str) -> ProductionRecord {
        ProductionRecord {
            id: id.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            product_id: "P1".to_string(),
            product_code: "A-100".to_string(),
            process_id: "PR1".to_string(),
            process_name: "切削".to_string(),
            planned_quantity: Some(100.0),
            actual_quantity: 90.0,
            defect_count: 1.0,
            work_minutes: 60.0,
            worker_count: 1,
            worker_name: "山田".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_missing_key_reads_empty() {
        let store = InMemoryRecordStore::new();
        assert!(store.get_all().unwrap().is_empty());
        assert!(store.get_masters(MasterKind::Worker).unwrap().is_empty());
    }

    #[test]
    fn test_add_update_delete() {
        let store = InMemoryRecordStore::new();
        store.add(record("1", "2024-01-01")).unwrap();
        store.add(record("2", "2024-01-02")).unwrap();

        let mut changed = record("1", "2024-01-05");
        changed.notes = "再検査".to_string();
        assert!(store.update_by_id(changed).unwrap());
        assert!(!store.update_by_id(record("9", "2024-01-01")).unwrap());

        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].notes, "再検査");
        assert_eq!(all[0].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());

        assert!(store.delete_by_id("2").unwrap());
        assert!(!store.delete_by_id("2").unwrap());
        assert_eq!(store.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_value_is_reported() {
        let store = InMemoryRecordStore::new();
        store
            .set_value(storage_keys::PRODUCTION_DATA, "{not json")
            .unwrap();
        match store.get_all() {
            Err(RepositoryError::CorruptData { key, .. }) => assert_eq!(key, "productionData"),
            other => panic!("Expected CorruptData, got {:?}", other),
        }
    }

    #[test]
    fn test_modify_records_skips_write_on_false_or_err() {
        let store = InMemoryRecordStore::new();
        store.add(record("1", "2024-01-01")).unwrap();

        store
            .modify_records(&mut |records| {
                records.clear();
                Ok(false)
            })
            .unwrap();
        assert_eq!(store.get_all().unwrap().len(), 1);

        let result = store.modify_records(&mut |records| {
            records.clear();
            Err(RepositoryError::InternalError("中止".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(store.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_concurrent_adds_are_not_lost() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryRecordStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        store.add(record(&format!("{}-{}", t, i), "2024-01-01")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.get_all().unwrap().len(), 200);
    }

    #[test]
    fn test_store_filters_delegate_to_query() {
        let store = InMemoryRecordStore::new();
        store.add(record("1", "2024-01-01")).unwrap();
        store.add(record("2", "2024-01-08")).unwrap();

        let in_range = store
            .filter_by_date_range(
                NaiveDate::from_ymd_opt(2024, 1, 2),
                NaiveDate::from_ymd_opt(2024, 1, 8),
            )
            .unwrap();
        assert_eq!(in_range.len(), 1);
        assert_eq!(in_range[0].id, "2");

        assert_eq!(store.filter_by_text("a-1").unwrap().len(), 2);
    }
}
