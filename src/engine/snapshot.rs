// ==========================================
// 农产品贸易后台 - 参考数据快照
// ==========================================
// 职责: 一次生成所需的全部参考数据（一次性批量读取后只读）
// 红线: 匹配阶段只读快照，不再触发任何 I/O
// ==========================================

use crate::domain::compliance::{
    CertificationRequirement, ExcludedTradePotential, SupplierCertification,
};
use crate::domain::logistics::{Hub, LogisticsCapability, TransportRoute};
use crate::domain::opportunity::Opportunity;
use crate::domain::pricing::SupplierPrice;
use crate::domain::product::{CustomerRequirement, SupplierCapability};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ReferenceSnapshot - 参考数据快照
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceSnapshot {
    // ===== 供需 =====
    pub requirements: Vec<CustomerRequirement>,
    pub supplier_capabilities: Vec<SupplierCapability>,
    pub supplier_prices: Vec<SupplierPrice>,

    // ===== 运输网络 =====
    pub transport_routes: Vec<TransportRoute>,
    pub hubs: Vec<Hub>,
    pub customer_logistics: Vec<LogisticsCapability>,
    pub supplier_logistics: Vec<LogisticsCapability>,

    // ===== 认证 =====
    pub certification_requirements: Vec<CertificationRequirement>,
    pub supplier_certifications: Vec<SupplierCertification>,

    // ===== 商机与排除 =====
    pub opportunities: Vec<Opportunity>,
    pub exclusions: Vec<ExcludedTradePotential>,
}

impl ReferenceSnapshot {
    /// 各集合行数，用于日志
    pub fn row_counts(&self) -> [(&'static str, usize); 11] {
        [
            ("requirements", self.requirements.len()),
            ("supplier_capabilities", self.supplier_capabilities.len()),
            ("supplier_prices", self.supplier_prices.len()),
            ("transport_routes", self.transport_routes.len()),
            ("hubs", self.hubs.len()),
            ("customer_logistics", self.customer_logistics.len()),
            ("supplier_logistics", self.supplier_logistics.len()),
            ("certification_requirements", self.certification_requirements.len()),
            ("supplier_certifications", self.supplier_certifications.len()),
            ("opportunities", self.opportunities.len()),
            ("exclusions", self.exclusions.len()),
        ]
    }
}

// ==========================================
// ReferenceDataSource Trait
// ==========================================
// 实现者: TradeRepositories（SQLite 并发读取）、ReferenceSnapshot（内存快照）
#[async_trait]
pub trait ReferenceDataSource: Send + Sync {
    /// 读取 as_of 时刻的参考数据快照
    ///
    /// 任一读取失败即整体失败，不返回部分数据
    async fn load_snapshot(&self, as_of: DateTime<Utc>) -> RepositoryResult<ReferenceSnapshot>;
}

#[async_trait]
impl ReferenceDataSource for ReferenceSnapshot {
    async fn load_snapshot(&self, _as_of: DateTime<Utc>) -> RepositoryResult<ReferenceSnapshot> {
        Ok(self.clone())
    }
}
