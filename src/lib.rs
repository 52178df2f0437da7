// ==========================================
// 农产品贸易后台 - 贸易潜力矩阵核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 批处理式报表计算（非实时交互）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DeliveryMode, LogisticsSolution, PotentialStatus, SoldBy};

// 领域实体
pub use domain::{
    Customer, CustomerRequirement, Hub, ProductPackagingSpec, RouteCandidate, Supplier,
    SupplierPrice, TradePotential, TradePotentialSummary, TransportRoute,
};

// 引擎
pub use engine::{
    LogisticsMatcher, PotentialMatrixBuilder, PotentialSummaryEngine, ReferenceDataSource,
    ReferenceSnapshot, RouteResolver, TradePotentialService, TradeRepositories,
};

// API
pub use api::{ApiError, ApiResult, TradePotentialApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "农产品贸易潜力矩阵";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";
