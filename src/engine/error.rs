// ==========================================
// 农产品贸易后台 - 引擎层错误类型
// ==========================================
// 约定: 读取或配置失败即中止整次生成，不返回部分矩阵，不在内部重试
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("参考数据读取失败: {0}")]
    DataAccess(#[from] RepositoryError),

    #[error("矩阵配置读取失败: {0}")]
    Config(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
