// ==========================================
// 集成测试环境
// ==========================================
// 职责: 基于临时 SQLite 文件装配完整 AppState
// ==========================================

use std::sync::Mutex;
use tempfile::NamedTempFile;

use production_tracker::app::AppState;

#[path = "../test_helpers.rs"]
mod test_helpers;

pub use test_helpers::fixture_path;

/// rust-i18n 的语言为进程级全局状态; 同一测试文件内依赖语言的用例共用此锁
pub static LOCALE_LOCK: Mutex<()> = Mutex::new(());

/// 测试环境
///
/// 持有临时数据库文件, Drop 时自动删除
pub struct TestEnv {
    _temp_file: NamedTempFile,
    pub db_path: String,
    pub state: AppState,
}

impl TestEnv {
    pub fn new() -> Result<Self, String> {
        production_tracker::logging::init_test();
        let (temp_file, db_path) = test_helpers::create_test_db().map_err(|e| e.to_string())?;
        let state = AppState::new(db_path.clone())?;
        Ok(Self {
            _temp_file: temp_file,
            db_path,
            state,
        })
    }

    /// 以同一数据库文件重新装配 AppState (模拟重启)
    pub fn reopen(&self) -> Result<AppState, String> {
        AppState::new(self.db_path.clone())
    }
}
