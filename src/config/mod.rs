// ==========================================
// 农产品贸易后台 - 配置层
// ==========================================
// 职责: 矩阵生成参数的读取与覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod matrix_config;
pub mod matrix_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use matrix_config::MatrixConfig;
pub use matrix_config_trait::MatrixConfigReader;
