// ==========================================
// 生产进度看板 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 连接: 记录存储与配置管理共用同一个 SQLite 连接
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{ConfigApi, DashboardApi, ExportApi, ImportApi, MasterDataApi, RecordApi};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::i18n;
use crate::repository::{RecordStore, SqliteRecordStore};

/// 应用状态
///
/// 包含所有API实例和共享资源
/// 在Tauri应用中作为全局状态管理, 无界面模式下由命令行入口直接使用
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 记录存储
    pub store: Arc<dyn RecordStore>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 生产记录API
    pub record_api: Arc<RecordApi>,

    /// 看板API
    pub dashboard_api: Arc<DashboardApi>,

    /// 主数据API
    pub master_api: Arc<MasterDataApi>,

    /// 备份导入API
    pub import_api: Arc<ImportApi>,

    /// 导出API
    pub export_api: Arc<ExportApi>,

    /// 配置API
    pub config_api: Arc<ConfigApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 成功创建的实例
    /// - Err(String): 初始化失败的错误信息
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("无法初始化数据库结构: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 仓储 / 配置
        // ==========================================
        let store: Arc<dyn RecordStore> = Arc::new(SqliteRecordStore::from_connection(conn.clone()));
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // 界面/导出语言以配置为准; 读取失败时保留默认语言
        match config_manager.get_locale() {
            Ok(locale) => {
                if !i18n::set_locale(&locale) {
                    tracing::warn!("配置中的语言不受支持, 保留默认: {}", locale);
                }
            }
            Err(e) => tracing::warn!("读取语言配置失败: {}", e),
        }

        // ==========================================
        // API
        // ==========================================
        let record_api = Arc::new(RecordApi::new(store.clone(), config_manager.clone()));
        let dashboard_api = Arc::new(DashboardApi::new(store.clone(), config_manager.clone()));
        let master_api = Arc::new(MasterDataApi::new(store.clone()));
        let import_api = Arc::new(ImportApi::new(store.clone()));
        let export_api = Arc::new(ExportApi::new(store.clone(), config_manager.clone()));
        let config_api = Arc::new(ConfigApi::new(config_manager.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            store,
            config_manager,
            record_api,
            dashboard_api,
            master_api,
            import_api,
            export_api,
            config_api,
        })
    }
}

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "PRODUCTION_TRACKER_DB_PATH";

/// 获取默认数据库路径
///
/// 优先级: 环境变量 > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./production_tracker.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        let dir = data_dir.join("production-tracker-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("production-tracker");

        match std::fs::create_dir_all(&dir) {
            Ok(()) => path = dir.join("production_tracker.db"),
            Err(e) => tracing::warn!("无法创建数据目录 {}: {}", dir.display(), e),
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::RecordInput;
    use tempfile::NamedTempFile;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_app_state_shares_connection() {
        let _guard = crate::i18n::tests::LOCALE_TEST_LOCK
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap().to_string();

        let state = AppState::new(db_path.clone()).unwrap();
        assert_eq!(state.db_path, db_path);

        let input = RecordInput {
            date: "2024-01-02".to_string(),
            product_id: "P1".to_string(),
            product_code: Some("A-100".to_string()),
            process_id: "PR1".to_string(),
            process_name: Some("組立".to_string()),
            planned_quantity: Some(100.0),
            actual_quantity: 80.0,
            defect_count: 4.0,
            work_minutes: 480.0,
            worker_count: 2,
            worker_name: "田中".to_string(),
            notes: String::new(),
        };
        let created = state.record_api.create_record(&input).unwrap();

        // 同一连接上的存储可立即读到
        let stored = state.store.get_all().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, created.id);

        state.config_api.update_config("recent_window", "5").unwrap();
        assert_eq!(state.config_manager.get_recent_window().unwrap(), 5);
    }
}
