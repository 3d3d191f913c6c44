use crate::api::error::ApiError;
use crate::api::RecordFilter;
use serde::{Deserialize, Serialize};

// ==========================================
// 公共工具：错误映射、筛选条件组装
// ==========================================

/// 错误响应（返回给前端）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

/// 错误代码 (前端按此分支提示)
pub(super) fn error_code(err: &ApiError) -> &'static str {
    match err {
        ApiError::InvalidInput(_) => "INVALID_INPUT",
        ApiError::NotFound(_) => "NOT_FOUND",
        ApiError::RecordValidationError { .. } => "RECORD_VALIDATION_ERROR",
        ApiError::DuplicateMaster(_) => "DUPLICATE_MASTER",
        ApiError::ImportError(_) => "IMPORT_ERROR",
        ApiError::ExportError(_) => "EXPORT_ERROR",
        ApiError::DatabaseError(_) => "DATABASE_ERROR",
        ApiError::DatabaseConnectionError(_) => "DATABASE_CONNECTION_ERROR",
        ApiError::DatabaseTransactionError(_) => "DATABASE_TRANSACTION_ERROR",
        ApiError::ConfigError(_) => "CONFIG_ERROR",
        ApiError::InternalError(_) => "INTERNAL_ERROR",
        ApiError::Other(_) => "OTHER_ERROR",
    }
}

/// 将ApiError转换为JSON字符串（Tauri要求）
pub(super) fn map_api_error(err: ApiError) -> String {
    let error_response = ErrorResponse {
        code: error_code(&err).to_string(),
        message: err.to_string(),
        details: match &err {
            ApiError::RecordValidationError { violations } => {
                Some(serde_json::json!({ "violations": violations }))
            }
            _ => None,
        },
    };

    serde_json::to_string(&error_response).unwrap_or_else(|_| err.to_string())
}

/// 序列化命令结果
pub(super) fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("序列化失败: {}", e))
}

/// 由命令参数组装筛选条件
pub(super) fn build_filter(
    search: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
) -> RecordFilter {
    RecordFilter {
        search,
        start_date,
        end_date,
    }
}

/// 解析前端传入的 JSON 参数
pub(super) fn parse_json_arg<T: serde::de::DeserializeOwned>(
    name: &str,
    raw: &str,
) -> Result<T, String> {
    serde_json::from_str(raw).map_err(|e| {
        map_api_error(ApiError::InvalidInput(format!("参数 {} 解析失败: {}", name, e)))
    })
}

/// 解析主数据种类 / 导入模式等枚举文本参数
pub(super) fn parse_enum_arg<T>(raw: &str) -> Result<T, String>
where
    T: std::str::FromStr<Err = String>,
{
    raw.parse::<T>()
        .map_err(|e| map_api_error(ApiError::InvalidInput(e)))
}
