// ==========================================
// 生产进度看板 - 导出模块错误类型
// ==========================================

use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("没有可导出的数据")]
    NoData,

    #[error("CSV 写入失败: {0}")]
    CsvWriteError(String),

    #[error("序列化失败: {0}")]
    SerializationError(String),

    #[error("文件写入失败: {0}")]
    FileWriteError(String),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvWriteError(err.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::SerializationError(err.to_string())
    }
}

impl From<std::fmt::Error> for ExportError {
    fn from(err: std::fmt::Error) -> Self {
        ExportError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::FileWriteError(err.to_string())
    }
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
