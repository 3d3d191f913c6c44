// ==========================================
// 生产进度看板 - 配置管理 API
// ==========================================
// 职责: 配置查询、更新、快照
// 约束: 只接受已知配置键, 值按类型校验后写入
// ==========================================

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::{config_keys, ConfigManager, GLOBAL_SCOPE};
use crate::engine::severity::SeverityThresholds;
use crate::i18n::{self, SUPPORTED_LOCALES};

/// 配置项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigItem {
    pub scope_id: String,
    pub key: String,
    pub value: String,
}

// ==========================================
// ConfigApi - 配置管理 API
// ==========================================
pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

fn config_error(e: Box<dyn std::error::Error>) -> ApiError {
    ApiError::ConfigError(e.to_string())
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 查询所有配置（未设置的键以默认值列出）
    pub fn list_configs(&self) -> ApiResult<Vec<ConfigItem>> {
        let configs = self.config_manager.list_global_configs().map_err(config_error)?;
        Ok(configs
            .into_iter()
            .map(|(key, value)| ConfigItem {
                scope_id: GLOBAL_SCOPE.to_string(),
                key,
                value,
            })
            .collect())
    }

    /// 查询单个配置
    pub fn get_config(&self, key: &str) -> ApiResult<Option<ConfigItem>> {
        let configs = self.config_manager.list_global_configs().map_err(config_error)?;
        Ok(configs.get(key).map(|value| ConfigItem {
            scope_id: GLOBAL_SCOPE.to_string(),
            key: key.to_string(),
            value: value.clone(),
        }))
    }

    /// 更新配置
    ///
    /// # 校验
    /// - 键必须是已知配置键
    /// - 窗口/每页行数: 正整数
    /// - 阈值: 非负有限数, 且 warning 与 good 的相对顺序保持一致
    /// - 语言: zh-CN / en, 写入后立即切换进程语言
    pub fn update_config(&self, key: &str, value: &str) -> ApiResult<()> {
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() {
            return Err(ApiError::InvalidInput("配置键不能为空".to_string()));
        }
        if !config_keys::is_known(key) {
            return Err(ApiError::InvalidInput(format!("未知的配置键: {}", key)));
        }

        match key {
            config_keys::RECENT_WINDOW | config_keys::REPORT_ROWS_PER_PAGE => {
                match value.parse::<usize>() {
                    Ok(n) if n > 0 => {}
                    _ => {
                        return Err(ApiError::InvalidInput(format!("{}必须为正整数: {}", key, value)))
                    }
                }
            }
            config_keys::LOCALE => {
                if !SUPPORTED_LOCALES.contains(&value) {
                    return Err(ApiError::InvalidInput(format!("不支持的语言: {}", value)));
                }
            }
            _ => {
                let parsed = value
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .ok_or_else(|| ApiError::InvalidInput(format!("{}必须为非负数: {}", key, value)))?;
                self.check_threshold_order(key, parsed)?;
            }
        }

        self.config_manager
            .set_global_config_value(key, value)
            .map_err(config_error)?;
        info!("配置更新: key={}, value={}", key, value);

        if key == config_keys::LOCALE {
            self.apply_locale()?;
        }
        Ok(())
    }

    /// 按已存配置切换进程语言
    fn apply_locale(&self) -> ApiResult<()> {
        let locale = self.config_manager.get_locale().map_err(config_error)?;
        if !i18n::set_locale(&locale) {
            tracing::warn!("配置中的语言未生效, 保留当前语言: {}", i18n::current_locale());
        }
        Ok(())
    }

    fn check_threshold_order(&self, key: &str, value: f64) -> ApiResult<()> {
        let mut t = self.get_severity_thresholds()?;
        match key {
            config_keys::EFFICIENCY_GOOD_THRESHOLD => t.efficiency_good = value,
            config_keys::EFFICIENCY_WARNING_THRESHOLD => t.efficiency_warning = value,
            config_keys::DEFECT_RATE_GOOD_THRESHOLD => t.defect_rate_good = value,
            config_keys::DEFECT_RATE_WARNING_THRESHOLD => t.defect_rate_warning = value,
            _ => return Ok(()),
        }
        if t.efficiency_warning > t.efficiency_good {
            return Err(ApiError::InvalidInput("效率关注阈值不能高于良好阈值".to_string()));
        }
        if t.defect_rate_good > t.defect_rate_warning {
            return Err(ApiError::InvalidInput("不良率良好阈值不能高于关注阈值".to_string()));
        }
        Ok(())
    }

    /// 当前等级阈值
    pub fn get_severity_thresholds(&self) -> ApiResult<SeverityThresholds> {
        self.config_manager.get_severity_thresholds().map_err(config_error)
    }

    /// 配置快照（JSON）
    pub fn get_config_snapshot(&self) -> ApiResult<String> {
        self.config_manager.get_config_snapshot().map_err(config_error)
    }

    /// 从快照恢复配置
    pub fn restore_config_snapshot(&self, snapshot_json: &str) -> ApiResult<usize> {
        let count = self
            .config_manager
            .restore_config_from_snapshot(snapshot_json)
            .map_err(config_error)?;
        info!("配置快照已恢复: count={}", count);
        self.apply_locale()?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_schema, open_in_memory_connection};
    use std::sync::Mutex;

    fn api() -> ConfigApi {
        let conn = open_in_memory_connection().unwrap();
        init_schema(&conn).unwrap();
        ConfigApi::new(Arc::new(
            ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap(),
        ))
    }

    #[test]
    fn test_list_includes_defaults() {
        let api = api();
        let items = api.list_configs().unwrap();
        assert!(items.iter().any(|i| i.key == "recent_window" && i.value == "10"));
        assert_eq!(api.get_config("locale").unwrap().unwrap().value, "zh-CN");
        assert_eq!(api.get_config("nope").unwrap(), None);
    }

    #[test]
    fn test_update_validates_values() {
        let api = api();
        api.update_config("recent_window", "20").unwrap();
        assert_eq!(api.get_config("recent_window").unwrap().unwrap().value, "20");

        assert!(matches!(api.update_config("recent_window", "0"), Err(ApiError::InvalidInput(_))));
        assert!(matches!(api.update_config("locale", "fr"), Err(ApiError::InvalidInput(_))));
        assert!(matches!(api.update_config("unknown", "1"), Err(ApiError::InvalidInput(_))));
        assert!(matches!(
            api.update_config("efficiency_good_threshold", "-1"),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_locale_update_switches_process_locale() {
        let _guard = crate::i18n::tests::LOCALE_TEST_LOCK.lock().unwrap();
        let api = api();
        api.update_config("locale", "en").unwrap();
        assert_eq!(i18n::current_locale(), "en");

        // 被拒绝的值不改变当前语言
        assert!(api.update_config("locale", "fr").is_err());
        assert_eq!(i18n::current_locale(), "en");

        api.update_config("locale", "zh-CN").unwrap();
        assert_eq!(i18n::current_locale(), "zh-CN");
    }

    #[test]
    fn test_threshold_order_enforced() {
        let api = api();
        assert!(matches!(
            api.update_config("efficiency_warning_threshold", "95"),
            Err(ApiError::InvalidInput(_))
        ));
        api.update_config("efficiency_good_threshold", "95").unwrap();
        api.update_config("efficiency_warning_threshold", "80").unwrap();
        let t = api.get_severity_thresholds().unwrap();
        assert_eq!(t.efficiency_good, 95.0);
        assert_eq!(t.efficiency_warning, 80.0);
    }
}
