// ==========================================
// 生产进度看板 - SQLite 记录存储
// ==========================================
// 存储: kv_store 表 (key TEXT PRIMARY KEY, value TEXT)
// 单键写入为一条 UPSERT; 读-改-写在持锁的 IMMEDIATE 事务内完成
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_store::RecordStore;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::sync::{Arc, Mutex};

// ==========================================
// SqliteRecordStore
// ==========================================
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// 打开数据库文件并初始化 schema
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 (调用方负责 init_schema)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 列出所有已存储的键 (诊断用)
    pub fn list_keys(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT key FROM kv_store ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

impl RecordStore for SqliteRecordStore {
    fn get_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        upsert(&conn, key, value)
    }

    fn modify_value(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<&str>) -> RepositoryResult<Option<String>>,
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let current = tx
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        // f 出错时 tx 随 drop 回滚
        if let Some(next) = f(current.as_deref())? {
            upsert(&tx, key, &next)?;
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }
}

fn upsert(conn: &Connection, key: &str, value: &str) -> RepositoryResult<()> {
    conn.execute(
        r#"
        INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        params![key, value],
    )
    .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory_connection;
    use crate::domain::master::MasterEntity;
    use crate::domain::types::MasterKind;

    fn store() -> SqliteRecordStore {
        let conn = open_in_memory_connection().unwrap();
        init_schema(&conn).unwrap();
        SqliteRecordStore::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_get_set_value() {
        let store = store();
        assert_eq!(store.get_value("lastBackupTime").unwrap(), None);

        store.set_value("lastBackupTime", "2024-01-01T00:00:00").unwrap();
        store.set_value("lastBackupTime", "2024-02-01T00:00:00").unwrap();
        assert_eq!(
            store.get_value("lastBackupTime").unwrap().as_deref(),
            Some("2024-02-01T00:00:00")
        );
        assert_eq!(store.list_keys().unwrap(), vec!["lastBackupTime".to_string()]);
    }

    #[test]
    fn test_modify_value_rolls_back_on_error() {
        let store = store();
        store.set_value("productionData", "[]").unwrap();

        let result = store.modify_value("productionData", &mut |_| {
            Err(RepositoryError::InternalError("中止".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(store.get_value("productionData").unwrap().as_deref(), Some("[]"));

        store
            .modify_value("productionData", &mut |current| {
                assert_eq!(current, Some("[]"));
                Ok(None)
            })
            .unwrap();
        assert_eq!(store.get_value("productionData").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_concurrent_adds_on_shared_file() {
        use crate::domain::record::ProductionRecord;
        use chrono::NaiveDate;
        use std::thread;

        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let store = Arc::new(SqliteRecordStore::new(temp_file.path().to_str().unwrap()).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        store
                            .add(ProductionRecord {
                                id: format!("{}-{}", t, i),
                                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                                product_id: "P1".to_string(),
                                product_code: "A-100".to_string(),
                                process_id: "PR1".to_string(),
                                process_name: "切削".to_string(),
                                planned_quantity: None,
                                actual_quantity: 10.0,
                                defect_count: 0.0,
                                work_minutes: 60.0,
                                worker_count: 1,
                                worker_name: "山田".to_string(),
                                notes: String::new(),
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = store.get_all().unwrap();
        assert_eq!(stored.len(), 200);
        let mut ids: Vec<&str> = stored.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_masters_round_trip() {
        let store = store();
        let products = vec![MasterEntity::new("A-100"), MasterEntity::new("B-200")];
        store.save_masters(MasterKind::Product, &products).unwrap();

        let loaded = store.get_masters(MasterKind::Product).unwrap();
        assert_eq!(loaded, products);
        assert!(store.get_masters(MasterKind::Process).unwrap().is_empty());
    }
}
