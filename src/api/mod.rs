// ==========================================
// 农产品贸易后台 - API 层
// ==========================================
// 职责: 提供矩阵生成、报价录入、导出接口，供 CLI / 上层服务调用
// ==========================================

pub mod error;
pub mod export;
pub mod potential_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use export::export_potentials_csv;
pub use potential_api::{AddSupplierPriceRequest, TradePotentialApi, TradePotentialResponse};
