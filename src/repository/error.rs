// ==========================================
// 农产品贸易后台 - 仓储层错误类型
// ==========================================
// 约定: 任何读取失败都会中止整次矩阵生成，不返回部分结果
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 写入的主键/唯一键已存在（如重复报价 ID）
    #[error("记录已存在: {0}")]
    DuplicateRecord(String),

    /// 报价引用的供应商/规格/枢纽不存在
    #[error("引用的主数据不存在: {0}")]
    MissingReference(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库错误: {0}")]
    Sqlite(String),

    /// spawn_blocking 中的读取任务 panic 或被取消
    #[error("读取任务异常终止: {0}")]
    ReadTaskAborted(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("UNIQUE") => {
                RepositoryError::DuplicateRecord(msg)
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("FOREIGN KEY") => {
                RepositoryError::MissingReference(msg)
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::Sqlite(msg),
            other => RepositoryError::Sqlite(other.to_string()),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
