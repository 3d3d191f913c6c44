// ==========================================
// 生产进度看板 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope, 当前仅 global)
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::engine::query::DEFAULT_RECENT_WINDOW;
use crate::engine::severity::SeverityThresholds;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 全局作用域
pub const GLOBAL_SCOPE: &str = "global";

/// 打印报告默认每页行数
pub const DEFAULT_REPORT_ROWS_PER_PAGE: usize = 30;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global 配置 (UPSERT)
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES (?1, ?2, ?3, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        tracing::info!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 列出 global 配置: 已知键 (缺省值补齐) + 已存储的其他键, 按键排序
    pub fn list_global_configs(&self) -> Result<BTreeMap<String, String>, Box<dyn Error>> {
        let mut configs: BTreeMap<String, String> = config_keys::DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, value) = row?;
            configs.insert(key, value);
        }
        Ok(configs)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_global_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    fn get_f64_or_default(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        let raw = self.get_config_or_default(key, &default.to_string())?;
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => {
                tracing::warn!(config_key = key, raw_value = %raw, "配置值无法解析，使用默认值");
                Ok(default)
            }
        }
    }

    fn get_usize_or_default(&self, key: &str, default: usize) -> Result<usize, Box<dyn Error>> {
        let raw = self.get_config_or_default(key, &default.to_string())?;
        match raw.trim().parse::<usize>() {
            Ok(v) if v > 0 => Ok(v),
            _ => {
                tracing::warn!(config_key = key, raw_value = %raw, "配置值无法解析，使用默认值");
                Ok(default)
            }
        }
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let configs = self.list_global_configs()?;
        Ok(serde_json::to_string(&json!(configs))?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, Box<dyn Error>> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
                params![GLOBAL_SCOPE, key, value],
            )?;
        }
        tx.commit()?;

        Ok(count)
    }

    // ===== 看板配置 =====

    /// 近期窗口条数（默认 10）
    pub fn get_recent_window(&self) -> Result<usize, Box<dyn Error>> {
        self.get_usize_or_default(config_keys::RECENT_WINDOW, DEFAULT_RECENT_WINDOW)
    }

    /// 等级阈值
    pub fn get_severity_thresholds(&self) -> Result<SeverityThresholds, Box<dyn Error>> {
        let defaults = SeverityThresholds::default();
        Ok(SeverityThresholds {
            efficiency_good: self
                .get_f64_or_default(config_keys::EFFICIENCY_GOOD_THRESHOLD, defaults.efficiency_good)?,
            efficiency_warning: self.get_f64_or_default(
                config_keys::EFFICIENCY_WARNING_THRESHOLD,
                defaults.efficiency_warning,
            )?,
            defect_rate_good: self
                .get_f64_or_default(config_keys::DEFECT_RATE_GOOD_THRESHOLD, defaults.defect_rate_good)?,
            defect_rate_warning: self.get_f64_or_default(
                config_keys::DEFECT_RATE_WARNING_THRESHOLD,
                defaults.defect_rate_warning,
            )?,
        })
    }

    // ===== 导出配置 =====

    /// 打印报告每页行数（默认 30）
    pub fn get_report_rows_per_page(&self) -> Result<usize, Box<dyn Error>> {
        self.get_usize_or_default(config_keys::REPORT_ROWS_PER_PAGE, DEFAULT_REPORT_ROWS_PER_PAGE)
    }

    /// 界面/导出语言（默认 zh-CN）
    pub fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::LOCALE, "zh-CN")
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 看板
    pub const RECENT_WINDOW: &str = "recent_window";

    // 等级阈值
    pub const EFFICIENCY_GOOD_THRESHOLD: &str = "efficiency_good_threshold";
    pub const EFFICIENCY_WARNING_THRESHOLD: &str = "efficiency_warning_threshold";
    pub const DEFECT_RATE_GOOD_THRESHOLD: &str = "defect_rate_good_threshold";
    pub const DEFECT_RATE_WARNING_THRESHOLD: &str = "defect_rate_warning_threshold";

    // 导出
    pub const REPORT_ROWS_PER_PAGE: &str = "report_rows_per_page";
    pub const LOCALE: &str = "locale";

    /// 已知配置键及默认值
    pub const DEFAULTS: [(&str, &str); 7] = [
        (RECENT_WINDOW, "10"),
        (EFFICIENCY_GOOD_THRESHOLD, "90"),
        (EFFICIENCY_WARNING_THRESHOLD, "70"),
        (DEFECT_RATE_GOOD_THRESHOLD, "3"),
        (DEFECT_RATE_WARNING_THRESHOLD, "8"),
        (REPORT_ROWS_PER_PAGE, "30"),
        (LOCALE, "zh-CN"),
    ];

    pub fn is_known(key: &str) -> bool {
        DEFAULTS.iter().any(|(k, _)| *k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory_connection;

    fn manager() -> ConfigManager {
        let conn = open_in_memory_connection().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_empty() {
        let cm = manager();
        assert_eq!(cm.get_recent_window().unwrap(), 10);
        assert_eq!(cm.get_report_rows_per_page().unwrap(), 30);
        assert_eq!(cm.get_locale().unwrap(), "zh-CN");
        assert_eq!(cm.get_severity_thresholds().unwrap(), SeverityThresholds::default());
    }

    #[test]
    fn test_override_and_invalid_fallback() {
        let cm = manager();
        cm.set_global_config_value(config_keys::RECENT_WINDOW, "5").unwrap();
        cm.set_global_config_value(config_keys::EFFICIENCY_GOOD_THRESHOLD, "95").unwrap();
        cm.set_global_config_value(config_keys::REPORT_ROWS_PER_PAGE, "abc").unwrap();

        assert_eq!(cm.get_recent_window().unwrap(), 5);
        assert_eq!(cm.get_severity_thresholds().unwrap().efficiency_good, 95.0);
        assert_eq!(cm.get_report_rows_per_page().unwrap(), 30);
    }

    #[test]
    fn test_list_and_snapshot_restore() {
        let cm = manager();
        cm.set_global_config_value(config_keys::LOCALE, "en").unwrap();

        let configs = cm.list_global_configs().unwrap();
        assert_eq!(configs.len(), config_keys::DEFAULTS.len());
        assert_eq!(configs.get("locale").map(String::as_str), Some("en"));

        let snapshot = cm.get_config_snapshot().unwrap();
        let other = manager();
        assert_eq!(other.restore_config_from_snapshot(&snapshot).unwrap(), 7);
        assert_eq!(other.get_locale().unwrap(), "en");
    }
}
