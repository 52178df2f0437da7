// ==========================================
// 农产品贸易后台 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、派生输出
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod compliance;
pub mod logistics;
pub mod opportunity;
pub mod party;
pub mod potential;
pub mod pricing;
pub mod product;
pub mod types;

// 重导出核心类型
pub use compliance::{CertificationRequirement, ExcludedTradePotential, SupplierCertification};
pub use logistics::{Hub, LogisticsCapability, PriceBand, TransportRoute};
pub use opportunity::Opportunity;
pub use party::{Customer, StaffMember, Supplier};
pub use potential::{
    OpportunitySummary, PotentialProduct, RouteCandidate, RouteLeg, TradePotential,
    TradePotentialSummary,
};
pub use pricing::SupplierPrice;
pub use product::{CustomerRequirement, Product, ProductPackagingSpec, SupplierCapability};
pub use types::{DeliveryMode, LogisticsSolution, PotentialStatus, SoldBy};
