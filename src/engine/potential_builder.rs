// ==========================================
// 农产品贸易后台 - 贸易潜力矩阵生成引擎
// ==========================================
// 职责: 客户需求 × 可供货供应商 × 报价行 展开，产出全部 TradePotential
// 输入: ReferenceSnapshot（已一次性读取） + as_of
// 输出: Vec<TradePotential>（不落库） + 生成统计
// ==========================================
// 红线: 纯函数，不修改输入，不触发 I/O
// 红线: 排除名单优先于一切计算；认证不满足时不产出该组合
// 红线: 每个报价行单独产出一条潜力（同一供应商 N 个枢纽报价 → N 条）
// 红线: id 唯一，重复时保留首条
// ==========================================

use crate::config::MatrixConfig;
use crate::domain::logistics::LogisticsCapability;
use crate::domain::opportunity::Opportunity;
use crate::domain::potential::{OpportunitySummary, PotentialProduct, TradePotential};
use crate::domain::pricing::SupplierPrice;
use crate::domain::product::SupplierCapability;
use crate::domain::types::PotentialStatus;
use crate::engine::logistics_matcher::{CustomerHubs, LogisticsMatcher, MatchContext, SupplierHubs};
use crate::engine::route_resolver::{RouteGraph, RouteResolver, RouteResolverConfig};
use crate::engine::snapshot::ReferenceSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

type Triple<'a> = (&'a str, &'a str, &'a str);

// ==========================================
// MatrixBuildStats - 生成统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixBuildStats {
    pub requirements: usize,
    /// 客户需求 × 可供货供应商 的组合数
    pub candidate_pairs: usize,
    pub excluded: usize,
    pub certification_blocked: usize,
    pub duplicates: usize,
    pub potentials: usize,
}

#[derive(Debug, Clone)]
pub struct MatrixBuildResult {
    pub potentials: Vec<TradePotential>,
    pub stats: MatrixBuildStats,
}

// ==========================================
// MatrixIndex - 一次生成内的查找索引
// ==========================================
struct MatrixIndex<'a> {
    capabilities_by_spec: HashMap<&'a str, Vec<&'a SupplierCapability>>,
    prices_by_supplier_spec: HashMap<(&'a str, &'a str), Vec<&'a SupplierPrice>>,
    customer_hubs: HashMap<&'a str, CustomerHubs>,
    supplier_hubs: HashMap<&'a str, SupplierHubs>,
    required_certs: HashMap<&'a str, Vec<&'a str>>,
    held_certs: HashMap<&'a str, HashSet<&'a str>>,
    exclusions: HashSet<Triple<'a>>,
    opportunities: HashMap<Triple<'a>, &'a Opportunity>,
    no_customer_hubs: CustomerHubs,
    no_supplier_hubs: SupplierHubs,
}

impl<'a> MatrixIndex<'a> {
    fn new(snapshot: &'a ReferenceSnapshot, as_of: DateTime<Utc>) -> Self {
        let mut capabilities_by_spec: HashMap<&str, Vec<&SupplierCapability>> = HashMap::new();
        for cap in &snapshot.supplier_capabilities {
            capabilities_by_spec
                .entry(cap.spec_id.as_str())
                .or_default()
                .push(cap);
        }

        let mut prices_by_supplier_spec: HashMap<(&str, &str), Vec<&SupplierPrice>> =
            HashMap::new();
        for price in &snapshot.supplier_prices {
            prices_by_supplier_spec
                .entry((price.supplier_id.as_str(), price.spec_id.as_str()))
                .or_default()
                .push(price);
        }

        let mut required_certs: HashMap<&str, Vec<&str>> = HashMap::new();
        for req in snapshot
            .certification_requirements
            .iter()
            .filter(|r| r.is_required)
        {
            required_certs
                .entry(req.customer_id.as_str())
                .or_default()
                .push(req.certification_id.as_str());
        }

        let mut held_certs: HashMap<&str, HashSet<&str>> = HashMap::new();
        for cert in snapshot
            .supplier_certifications
            .iter()
            .filter(|c| c.is_valid_at(as_of))
        {
            held_certs
                .entry(cert.supplier_id.as_str())
                .or_default()
                .insert(cert.certification_id.as_str());
        }

        let exclusions = snapshot
            .exclusions
            .iter()
            .map(|e| {
                (
                    e.customer_id.as_str(),
                    e.supplier_id.as_str(),
                    e.spec_id.as_str(),
                )
            })
            .collect();

        let mut opportunities: HashMap<Triple, &Opportunity> = HashMap::new();
        for opp in snapshot.opportunities.iter().filter(|o| o.is_active) {
            opportunities
                .entry((
                    opp.customer_id.as_str(),
                    opp.supplier_id.as_str(),
                    opp.spec_id.as_str(),
                ))
                .or_insert(opp);
        }

        Self {
            capabilities_by_spec,
            prices_by_supplier_spec,
            customer_hubs: hub_sets_by_owner(&snapshot.customer_logistics, |caps| {
                CustomerHubs::from_capabilities(caps)
            }),
            supplier_hubs: hub_sets_by_owner(&snapshot.supplier_logistics, |caps| {
                SupplierHubs::from_capabilities(caps)
            }),
            required_certs,
            held_certs,
            exclusions,
            opportunities,
            no_customer_hubs: CustomerHubs::default(),
            no_supplier_hubs: SupplierHubs::default(),
        }
    }

    fn capabilities_for(&self, spec_id: &str) -> &[&'a SupplierCapability] {
        self.capabilities_by_spec
            .get(spec_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn prices_for(&self, supplier_id: &'a str, spec_id: &'a str) -> &[&'a SupplierPrice] {
        self.prices_by_supplier_spec
            .get(&(supplier_id, spec_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn customer_hubs(&self, customer_id: &str) -> &CustomerHubs {
        self.customer_hubs
            .get(customer_id)
            .unwrap_or(&self.no_customer_hubs)
    }

    fn supplier_hubs(&self, supplier_id: &str) -> &SupplierHubs {
        self.supplier_hubs
            .get(supplier_id)
            .unwrap_or(&self.no_supplier_hubs)
    }

    fn is_excluded(&self, customer_id: &str, supplier_id: &str, spec_id: &str) -> bool {
        self.exclusions.contains(&(customer_id, supplier_id, spec_id))
    }

    /// 客户的每一项必需认证，供应商都持有未过期记录
    fn is_certified(&self, customer_id: &str, supplier_id: &str) -> bool {
        let Some(required) = self.required_certs.get(customer_id) else {
            return true;
        };
        let held = self.held_certs.get(supplier_id);
        required
            .iter()
            .all(|cert| held.map_or(false, |h| h.contains(cert)))
    }

    fn opportunity_for(
        &self,
        customer_id: &str,
        supplier_id: &str,
        spec_id: &str,
    ) -> Option<&'a Opportunity> {
        self.opportunities
            .get(&(customer_id, supplier_id, spec_id))
            .copied()
    }
}

fn hub_sets_by_owner<'a, T, F>(capabilities: &'a [LogisticsCapability], build: F) -> HashMap<&'a str, T>
where
    F: Fn(Vec<&'a LogisticsCapability>) -> T,
{
    let mut grouped: HashMap<&str, Vec<&LogisticsCapability>> = HashMap::new();
    for cap in capabilities {
        grouped.entry(cap.owner_id.as_str()).or_default().push(cap);
    }
    grouped
        .into_iter()
        .map(|(owner, caps)| (owner, build(caps)))
        .collect()
}

// ==========================================
// PotentialMatrixBuilder - 矩阵生成引擎
// ==========================================
pub struct PotentialMatrixBuilder {
    config: MatrixConfig,
    resolver: RouteResolver,
    matcher: LogisticsMatcher,
}

impl Default for PotentialMatrixBuilder {
    fn default() -> Self {
        Self::new(MatrixConfig::default())
    }
}

impl PotentialMatrixBuilder {
    pub fn new(config: MatrixConfig) -> Self {
        Self::with_matcher(config, LogisticsMatcher::new())
    }

    /// 使用自定义物流规则表
    pub fn with_matcher(config: MatrixConfig, matcher: LogisticsMatcher) -> Self {
        Self {
            resolver: RouteResolver::new(RouteResolverConfig::from(&config)),
            config,
            matcher,
        }
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    /// 生成完整的贸易潜力矩阵
    ///
    /// 输出顺序与快照顺序一致（需求 → 供应商能力 → 报价），结果确定
    #[instrument(skip_all, fields(requirements = snapshot.requirements.len()))]
    pub fn build(&self, snapshot: &ReferenceSnapshot, as_of: DateTime<Utc>) -> MatrixBuildResult {
        let index = MatrixIndex::new(snapshot, as_of);
        let graph = RouteGraph::new(&snapshot.transport_routes, &snapshot.hubs);

        let mut stats = MatrixBuildStats::default();
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut potentials = Vec::new();

        for requirement in &snapshot.requirements {
            stats.requirements += 1;

            let customer = &requirement.customer;
            let spec = &requirement.spec;
            let units_per_pallet = spec.units_per_pallet();
            let product = PotentialProduct::from_spec(spec);
            let customer_hubs = index.customer_hubs(&customer.id);

            for capability in index.capabilities_for(&spec.id) {
                let supplier = &capability.supplier;
                stats.candidate_pairs += 1;

                // 1. 排除名单
                if index.is_excluded(&customer.id, &supplier.id, &spec.id) {
                    stats.excluded += 1;
                    debug!(
                        customer_id = %customer.id,
                        supplier_id = %supplier.id,
                        spec_id = %spec.id,
                        "组合在排除名单中，跳过"
                    );
                    continue;
                }

                // 2. 认证门槛
                if !index.is_certified(&customer.id, &supplier.id) {
                    stats.certification_blocked += 1;
                    debug!(
                        customer_id = %customer.id,
                        supplier_id = %supplier.id,
                        "供应商缺少客户要求的有效认证，跳过"
                    );
                    continue;
                }

                // 3. 报价展开: 无报价时仍产出一条无价潜力
                let prices: Vec<Option<&SupplierPrice>> =
                    match index.prices_for(&supplier.id, &spec.id) {
                        [] => vec![None],
                        list => list.iter().copied().map(Some).collect(),
                    };

                let supplier_hubs = index.supplier_hubs(&supplier.id);
                let opportunity = index
                    .opportunity_for(&customer.id, &supplier.id, &spec.id)
                    .map(OpportunitySummary::from);

                for price in prices {
                    let id_suffix = price.map(|p| p.hub_id.as_deref().unwrap_or(p.id.as_str()));
                    let id = TradePotential::build_id(&customer.id, &supplier.id, &spec.id, id_suffix);
                    if !seen_ids.insert(id.clone()) {
                        stats.duplicates += 1;
                        continue;
                    }

                    // 4. 物流匹配（每个报价单独求值）
                    let ctx = MatchContext {
                        customer,
                        supplier,
                        price,
                        customer_hubs,
                        supplier_hubs,
                        graph: &graph,
                        resolver: &self.resolver,
                        units_per_pallet,
                        supplier_delivery_days: self.config.supplier_delivery_days,
                    };
                    let logistics = self.matcher.resolve(&ctx);

                    // 5. 状态与评分
                    let has_price = price.is_some();
                    let has_transport = logistics.has_transport;

                    potentials.push(TradePotential {
                        id,
                        customer: customer.clone(),
                        supplier: supplier.clone(),
                        product: product.clone(),
                        status: PotentialStatus::derive(has_price, has_transport),
                        has_price,
                        has_transport,
                        completion_score: TradePotential::score(has_price, has_transport),
                        supplier_price: price.cloned(),
                        logistics_solution: logistics.solution,
                        matched_rule: logistics.matched_rule.map(str::to_string),
                        transport_route: logistics.transport_route,
                        available_transport_routes: logistics.available_routes,
                        opportunity: opportunity.clone(),
                    });
                }
            }
        }

        stats.potentials = potentials.len();
        MatrixBuildResult { potentials, stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compliance::{
        CertificationRequirement, ExcludedTradePotential, SupplierCertification,
    };
    use crate::domain::party::{Customer, Supplier};
    use crate::domain::product::{CustomerRequirement, Product, ProductPackagingSpec};
    use crate::domain::types::{DeliveryMode, SoldBy};
    use chrono::{Duration, TimeZone};

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn snapshot() -> ReferenceSnapshot {
        let spec = ProductPackagingSpec {
            id: "SP1".to_string(),
            product: Product {
                id: "PR1".to_string(),
                name: "Tomatoes".to_string(),
                category: Some("Vegetables".to_string()),
                sold_by: Some(SoldBy::Box),
            },
            packaging_label: "Box".to_string(),
            size_label: "Large".to_string(),
            pallet_label: "EUR".to_string(),
            pallet_dimensions: None,
            boxes_per_pallet: 80,
            pieces_per_box: None,
            weight_per_box: None,
            weight_per_pallet: None,
            weight_unit: "kg".to_string(),
        };
        ReferenceSnapshot {
            requirements: vec![CustomerRequirement {
                customer: Customer {
                    id: "C1".to_string(),
                    name: "Roma Foods".to_string(),
                    city: Some("Rome".to_string()),
                    country: Some("Italy".to_string()),
                    agent: None,
                },
                spec,
            }],
            supplier_capabilities: vec![SupplierCapability {
                supplier: Supplier {
                    id: "S1".to_string(),
                    name: "GrowCo".to_string(),
                    city: Some("Almeria".to_string()),
                    country: Some("Spain".to_string()),
                },
                spec_id: "SP1".to_string(),
            }],
            ..ReferenceSnapshot::default()
        }
    }

    fn price(id: &str, hub: Option<&str>) -> SupplierPrice {
        SupplierPrice {
            id: id.to_string(),
            supplier_id: "S1".to_string(),
            spec_id: "SP1".to_string(),
            hub_id: hub.map(str::to_string),
            hub_name: None,
            price_per_unit: 2.0,
            currency: "EUR".to_string(),
            delivery_mode: DeliveryMode::ExWorks,
            valid_from: None,
            valid_until: None,
            created_at: None,
        }
    }

    #[test]
    fn test_unpriced_supplier_yields_single_potential() {
        let result = PotentialMatrixBuilder::default().build(&snapshot(), as_of());
        assert_eq!(result.potentials.len(), 1);

        let p = &result.potentials[0];
        assert_eq!(p.id, "C1-S1-SP1");
        assert_eq!(p.status, PotentialStatus::MissingBoth);
        assert_eq!(p.completion_score, 0);
        assert_eq!(p.product.units_per_pallet, 80.0);
    }

    #[test]
    fn test_each_price_row_fans_out() {
        let mut snap = snapshot();
        snap.supplier_prices = vec![
            price("P1", Some("H1")),
            price("P2", Some("H2")),
            price("P3", Some("H3")),
        ];

        let result = PotentialMatrixBuilder::default().build(&snap, as_of());
        let ids: Vec<&str> = result.potentials.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["C1-S1-SP1-H1", "C1-S1-SP1-H2", "C1-S1-SP1-H3"]);
        assert!(result
            .potentials
            .iter()
            .all(|p| p.status == PotentialStatus::MissingTransport && p.completion_score == 50));
    }

    #[test]
    fn test_duplicate_hub_prices_keep_first() {
        let mut snap = snapshot();
        snap.supplier_prices = vec![price("P1", Some("H1")), price("P2", Some("H1"))];

        let result = PotentialMatrixBuilder::default().build(&snap, as_of());
        assert_eq!(result.potentials.len(), 1);
        assert_eq!(result.stats.duplicates, 1);
        assert_eq!(
            result.potentials[0].supplier_price.as_ref().map(|p| p.id.as_str()),
            Some("P1")
        );
    }

    #[test]
    fn test_price_without_hub_uses_price_id_suffix() {
        let mut snap = snapshot();
        snap.supplier_prices = vec![price("P9", None)];

        let result = PotentialMatrixBuilder::default().build(&snap, as_of());
        assert_eq!(result.potentials[0].id, "C1-S1-SP1-P9");
    }

    #[test]
    fn test_exclusion_removes_triple() {
        let mut snap = snapshot();
        snap.exclusions = vec![ExcludedTradePotential {
            customer_id: "C1".to_string(),
            supplier_id: "S1".to_string(),
            spec_id: "SP1".to_string(),
            reason: "quality".to_string(),
            notes: None,
        }];

        let result = PotentialMatrixBuilder::default().build(&snap, as_of());
        assert!(result.potentials.is_empty());
        assert_eq!(result.stats.excluded, 1);
    }

    #[test]
    fn test_expired_certification_blocks_pairing() {
        let mut snap = snapshot();
        snap.supplier_prices = vec![price("P1", Some("H1"))];
        snap.certification_requirements = vec![CertificationRequirement {
            customer_id: "C1".to_string(),
            certification_id: "GLOBALGAP".to_string(),
            is_required: true,
        }];
        snap.supplier_certifications = vec![SupplierCertification {
            supplier_id: "S1".to_string(),
            certification_id: "GLOBALGAP".to_string(),
            expires_at: Some(as_of() - Duration::days(1)),
        }];

        let builder = PotentialMatrixBuilder::default();
        let blocked = builder.build(&snap, as_of());
        assert!(blocked.potentials.is_empty());
        assert_eq!(blocked.stats.certification_blocked, 1);

        snap.supplier_certifications[0].expires_at = Some(as_of() + Duration::days(30));
        assert_eq!(builder.build(&snap, as_of()).potentials.len(), 1);
    }

    #[test]
    fn test_optional_certification_does_not_gate() {
        let mut snap = snapshot();
        snap.certification_requirements = vec![CertificationRequirement {
            customer_id: "C1".to_string(),
            certification_id: "ORGANIC".to_string(),
            is_required: false,
        }];

        let result = PotentialMatrixBuilder::default().build(&snap, as_of());
        assert_eq!(result.potentials.len(), 1);
    }

    #[test]
    fn test_active_opportunity_is_linked() {
        let mut snap = snapshot();
        let mk = |id: &str, active: bool| Opportunity {
            id: id.to_string(),
            customer_id: "C1".to_string(),
            supplier_id: "S1".to_string(),
            spec_id: "SP1".to_string(),
            status: "negotiating".to_string(),
            is_active: active,
            offer_price_per_unit: Some(2.4),
            offer_currency: Some("EUR".to_string()),
            assigned_agent: None,
            valid_till: None,
            customer_feedback: None,
        };
        snap.opportunities = vec![mk("O-closed", false), mk("O-new", true), mk("O-old", true)];

        let result = PotentialMatrixBuilder::default().build(&snap, as_of());
        let opp = result.potentials[0].opportunity.as_ref().unwrap();
        assert_eq!(opp.id, "O-new");
        assert_eq!(opp.offer_price_per_unit, Some(2.4));
    }
}
