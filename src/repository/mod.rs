// ==========================================
// 农产品贸易后台 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供参考数据读取接口,屏蔽数据库细节,联表结果归一为单一嵌套对象
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod capability_repo;
pub mod certification_repo;
pub mod error;
pub mod logistics_capability_repo;
pub mod opportunity_repo;
pub mod requirement_repo;
pub mod row_utils;
pub mod supplier_price_repo;
pub mod transport_repo;

// 重导出核心仓储
pub use capability_repo::SupplierCapabilityRepository;
pub use certification_repo::CertificationRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use logistics_capability_repo::{CapabilityOwner, LogisticsCapabilityRepository};
pub use opportunity_repo::OpportunityRepository;
pub use requirement_repo::RequirementRepository;
pub use supplier_price_repo::SupplierPriceRepository;
pub use transport_repo::TransportRepository;
