// ==========================================
// 农产品贸易后台 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换仓储/引擎错误为用户可理解的错误消息
// 约定: 矩阵生成失败对外只呈现一个聚合错误（DataAccessError），由用户决定是否重试
// ==========================================

use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    /// 矩阵生成的聚合失败
    #[error("无法生成贸易潜力矩阵: {0}")]
    DataAccessError(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateRecord(msg) => {
                ApiError::ValidationError(format!("记录已存在: {}", msg))
            }
            RepositoryError::MissingReference(msg) => {
                ApiError::ValidationError(format!("引用的供应商/规格/枢纽不存在: {}", msg))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::Sqlite(msg) => ApiError::DatabaseError(msg),
            RepositoryError::ReadTaskAborted(msg) => ApiError::InternalError(msg),
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::DataAccess(inner) => ApiError::DataAccessError(inner.to_string()),
            EngineError::Config(msg) => ApiError::DataAccessError(format!("配置读取失败: {}", msg)),
        }
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failures_collapse_to_data_access_error() {
        let err: ApiError =
            EngineError::DataAccess(RepositoryError::LockError("poisoned".to_string())).into();
        assert!(matches!(err, ApiError::DataAccessError(_)));
        assert!(err.to_string().starts_with("无法生成贸易潜力矩阵"));
    }

    #[test]
    fn test_missing_reference_is_validation_error() {
        let err: ApiError = RepositoryError::MissingReference("FOREIGN KEY".to_string()).into();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }
}
