// ==========================================
// 农产品贸易后台 - 引擎层
// ==========================================
// 职责: 贸易潜力矩阵生成（线路解析 → 物流匹配 → 矩阵展开 → 统计）
// 红线: 引擎只读快照，不直接访问数据库（读取经 ReferenceDataSource）
// ==========================================

pub mod error;
pub mod logistics_matcher;
pub mod orchestrator;
pub mod potential_builder;
pub mod repositories;
pub mod route_resolver;
pub mod snapshot;
pub mod summary;

// 重导出核心引擎
pub use error::{EngineError, EngineResult};
pub use logistics_matcher::{
    CustomerHubs, LogisticsMatch, LogisticsMatcher, LogisticsRule, MatchContext, SupplierHubs,
};
pub use orchestrator::{MatrixRun, TradePotentialService};
pub use potential_builder::{MatrixBuildResult, MatrixBuildStats, PotentialMatrixBuilder};
pub use repositories::TradeRepositories;
pub use route_resolver::{
    select_default, RouteGraph, RouteResolver, RouteResolverConfig, RouteSearchResult,
};
pub use snapshot::{ReferenceDataSource, ReferenceSnapshot};
pub use summary::PotentialSummaryEngine;
