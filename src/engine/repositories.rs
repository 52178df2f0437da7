// ==========================================
// 农产品贸易后台 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合矩阵生成所需的所有 Repository
// 读取: 各查询相互独立，并发执行（spawn_blocking），全部完成后才进入匹配
// ==========================================

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::debug;

use crate::engine::snapshot::{ReferenceDataSource, ReferenceSnapshot};
use crate::perf::PerfGuard;
use crate::repository::{
    CertificationRepository, LogisticsCapabilityRepository, OpportunityRepository,
    RepositoryError, RepositoryResult, RequirementRepository, SupplierCapabilityRepository,
    SupplierPriceRepository, TransportRepository,
};

/// 矩阵生成仓储集合
///
/// # 包含的仓储
/// - `requirement_repo`: 客户需求
/// - `capability_repo`: 供应商供货能力
/// - `price_repo`: 供应商报价
/// - `transport_repo`: 枢纽与线路
/// - `logistics_repo`: 客户/供应商物流能力
/// - `certification_repo`: 认证要求与持有
/// - `opportunity_repo`: 商机与排除名单
#[derive(Clone)]
pub struct TradeRepositories {
    pub requirement_repo: Arc<RequirementRepository>,
    pub capability_repo: Arc<SupplierCapabilityRepository>,
    pub price_repo: Arc<SupplierPriceRepository>,
    pub transport_repo: Arc<TransportRepository>,
    pub logistics_repo: Arc<LogisticsCapabilityRepository>,
    pub certification_repo: Arc<CertificationRepository>,
    pub opportunity_repo: Arc<OpportunityRepository>,
}

impl TradeRepositories {
    /// 基于同一连接构建全部仓储
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            requirement_repo: Arc::new(RequirementRepository::from_connection(conn.clone())),
            capability_repo: Arc::new(SupplierCapabilityRepository::from_connection(conn.clone())),
            price_repo: Arc::new(SupplierPriceRepository::from_connection(conn.clone())),
            transport_repo: Arc::new(TransportRepository::from_connection(conn.clone())),
            logistics_repo: Arc::new(LogisticsCapabilityRepository::from_connection(conn.clone())),
            certification_repo: Arc::new(CertificationRepository::from_connection(conn.clone())),
            opportunity_repo: Arc::new(OpportunityRepository::from_connection(conn)),
        }
    }

    /// 打开数据库文件并构建全部仓储
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }
}

/// 在阻塞线程池中执行一次同步读取
async fn blocking_read<R, T, F>(repo: &Arc<R>, read: F) -> RepositoryResult<T>
where
    R: Send + Sync + 'static,
    T: Send + 'static,
    F: FnOnce(&R) -> RepositoryResult<T> + Send + 'static,
{
    let repo = Arc::clone(repo);
    tokio::task::spawn_blocking(move || read(&repo))
        .await
        .map_err(|e| RepositoryError::ReadTaskAborted(e.to_string()))?
}

#[async_trait]
impl ReferenceDataSource for TradeRepositories {
    async fn load_snapshot(&self, as_of: DateTime<Utc>) -> RepositoryResult<ReferenceSnapshot> {
        let _perf = PerfGuard::new("load_reference_snapshot");

        let (
            requirements,
            supplier_capabilities,
            supplier_prices,
            hubs,
            transport_routes,
            customer_logistics,
            supplier_logistics,
            certification_requirements,
            supplier_certifications,
            opportunities,
            exclusions,
        ) = futures::try_join!(
            blocking_read(&self.requirement_repo, |r| r.find_all()),
            blocking_read(&self.capability_repo, |r| r.find_all_active()),
            blocking_read(&self.price_repo, move |r| r.find_current(as_of)),
            blocking_read(&self.transport_repo, |r| r.find_hubs()),
            blocking_read(&self.transport_repo, |r| r.find_active_routes()),
            blocking_read(&self.logistics_repo, |r| r.find_customer_capabilities()),
            blocking_read(&self.logistics_repo, |r| r.find_supplier_capabilities()),
            blocking_read(&self.certification_repo, |r| r.find_required()),
            blocking_read(&self.certification_repo, move |r| {
                r.find_valid_supplier_certifications(as_of)
            }),
            blocking_read(&self.opportunity_repo, |r| r.find_active()),
            blocking_read(&self.opportunity_repo, |r| r.find_exclusions()),
        )?;

        let snapshot = ReferenceSnapshot {
            requirements,
            supplier_capabilities,
            supplier_prices,
            transport_routes,
            hubs,
            customer_logistics,
            supplier_logistics,
            certification_requirements,
            supplier_certifications,
            opportunities,
            exclusions,
        };

        for (collection, rows) in snapshot.row_counts() {
            debug!(collection, rows, "参考数据已读取");
        }

        Ok(snapshot)
    }
}
