// ==========================================
// 农产品贸易后台 - 物流匹配引擎
// ==========================================
// 职责: 对一个 (客户, 供应商, 报价) 判定适用的物流解决方式
// 实现: 有序规则表，依次求值，首个命中即返回（后续规则不再求值）
// 红线: 每个报价独立求值，不复用上一报价的匹配结果
// ==========================================
// 默认顺序:
//   1. same_city                    同城同国 → 供应商送达
//   2. hub_overlap                  供应商送达枢纽 ∩ 客户收货枢纽 → 供应商送达
//   3. price_hub_same_location      报价枢纽 = 客户 Ex Works 提货 / DELIVERY 收货枢纽
//   4. price_hub_supplier_delivery  DELIVERY 报价且报价枢纽在客户收货枢纽内
//   5. price_hub_ex_works_pickup    Ex Works 报价且客户可在报价枢纽提货
//   6. price_hub_route              报价枢纽 → 客户收货枢纽 线路搜索
//   7. supplier_hub_pickup          （无报价）客户可在供应商枢纽提货/收货
//   8. supplier_hub_route           （无报价）全部供应商枢纽 → 客户收货枢纽 线路搜索
// ==========================================

use crate::domain::logistics::LogisticsCapability;
use crate::domain::party::{Customer, Supplier};
use crate::domain::potential::RouteCandidate;
use crate::domain::pricing::SupplierPrice;
use crate::domain::types::{DeliveryMode, LogisticsSolution};
use crate::engine::route_resolver::{select_default, RouteGraph, RouteResolver};
use std::collections::BTreeSet;

// ==========================================
// CustomerHubs - 客户侧枢纽集合
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerHubs {
    /// Ex Works 能力的起点枢纽（客户自提）
    pub ex_works: BTreeSet<String>,
    /// DELIVERY 能力的终点枢纽（送达客户）
    pub delivery: BTreeSet<String>,
    /// TRANSIT 能力的起点枢纽（第三方运到后客户自提）
    pub transit: BTreeSet<String>,
}

impl CustomerHubs {
    pub fn from_capabilities<'a, I>(capabilities: I) -> Self
    where
        I: IntoIterator<Item = &'a LogisticsCapability>,
    {
        let mut hubs = Self::default();
        for cap in capabilities {
            match cap.mode {
                DeliveryMode::ExWorks => insert_hub(&mut hubs.ex_works, &cap.origin_hub_id),
                DeliveryMode::Delivery => insert_hub(&mut hubs.delivery, &cap.destination_hub_id),
                DeliveryMode::Transit => insert_hub(&mut hubs.transit, &cap.origin_hub_id),
            }
        }
        hubs
    }

    /// 收货枢纽 = DELIVERY 终点 ∪ TRANSIT 起点（线路搜索的终点集合）
    pub fn receiving(&self) -> BTreeSet<String> {
        self.delivery.union(&self.transit).cloned().collect()
    }

    /// 客户可自提的枢纽 = Ex Works 起点 ∪ TRANSIT 起点
    pub fn can_pick_up_at(&self, hub_id: &str) -> bool {
        self.ex_works.contains(hub_id) || self.transit.contains(hub_id)
    }
}

// ==========================================
// SupplierHubs - 供应商侧枢纽集合
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplierHubs {
    /// 物流能力的终点枢纽（供应商可送达）
    pub destination: BTreeSet<String>,
    /// 起点 ∪ 终点
    pub all: BTreeSet<String>,
}

impl SupplierHubs {
    pub fn from_capabilities<'a, I>(capabilities: I) -> Self
    where
        I: IntoIterator<Item = &'a LogisticsCapability>,
    {
        let mut hubs = Self::default();
        for cap in capabilities {
            insert_hub(&mut hubs.destination, &cap.destination_hub_id);
            insert_hub(&mut hubs.all, &cap.origin_hub_id);
            insert_hub(&mut hubs.all, &cap.destination_hub_id);
        }
        hubs
    }
}

fn insert_hub(set: &mut BTreeSet<String>, hub_id: &Option<String>) {
    if let Some(id) = hub_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        set.insert(id.to_string());
    }
}

// ==========================================
// MatchContext - 单次匹配输入
// ==========================================
pub struct MatchContext<'a> {
    pub customer: &'a Customer,
    pub supplier: &'a Supplier,
    pub price: Option<&'a SupplierPrice>,
    pub customer_hubs: &'a CustomerHubs,
    pub supplier_hubs: &'a SupplierHubs,
    pub graph: &'a RouteGraph<'a>,
    pub resolver: &'a RouteResolver,
    pub units_per_pallet: f64,
    pub supplier_delivery_days: u32,
}

impl<'a> MatchContext<'a> {
    /// 报价枢纽（无报价或报价未指定枢纽时为 None）
    fn price_hub(&self) -> Option<&'a str> {
        self.price
            .and_then(|p| p.hub_id.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn placeholder(&self, label: &str, hub_id: Option<&str>, days: u32) -> RouteCandidate {
        let hub_name = hub_id.map(|id| self.graph.hub_name(id));
        RouteCandidate::placeholder(
            &format!("{}:{}", label, hub_id.unwrap_or("-")),
            label,
            hub_id,
            hub_name.as_deref(),
            days,
        )
    }
}

// ==========================================
// LogisticsMatch - 匹配结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticsMatch {
    pub has_transport: bool,
    pub solution: Option<LogisticsSolution>,
    pub matched_rule: Option<&'static str>,
    pub transport_route: Option<RouteCandidate>,
    /// 第三方/两段运输时的全部候选，供人工改选
    pub available_routes: Vec<RouteCandidate>,
}

impl LogisticsMatch {
    /// 无运输方案
    pub fn none() -> Self {
        Self {
            has_transport: false,
            solution: None,
            matched_rule: None,
            transport_route: None,
            available_routes: Vec::new(),
        }
    }

    fn zero_cost(solution: LogisticsSolution, route: RouteCandidate) -> Self {
        Self {
            has_transport: true,
            solution: Some(solution),
            matched_rule: None,
            transport_route: Some(route),
            available_routes: Vec::new(),
        }
    }

    /// 由线路搜索候选构造；有直达即第三方运输，否则两段运输
    fn routed(has_direct: bool, candidates: Vec<RouteCandidate>) -> Option<Self> {
        let default = select_default(&candidates)?.clone();
        let solution = if has_direct {
            LogisticsSolution::ThirdPartyTransport
        } else {
            LogisticsSolution::MultiLegTransport
        };
        Some(Self {
            has_transport: true,
            solution: Some(solution),
            matched_rule: None,
            transport_route: Some(default),
            available_routes: candidates,
        })
    }
}

// ==========================================
// LogisticsRule Trait
// ==========================================
pub trait LogisticsRule: Send + Sync {
    /// 稳定的规则名（用于审计与日志）
    fn name(&self) -> &'static str;

    /// 命中返回匹配结果，否则 None（继续下一条规则）
    fn apply(&self, ctx: &MatchContext<'_>) -> Option<LogisticsMatch>;
}

// ===== 1. 同城同国 =====
pub struct SameCityRule;

impl LogisticsRule for SameCityRule {
    fn name(&self) -> &'static str {
        "same_city"
    }

    fn apply(&self, ctx: &MatchContext<'_>) -> Option<LogisticsMatch> {
        if !ctx.supplier.is_colocated_with(ctx.customer) {
            return None;
        }
        let route = ctx.placeholder("SAME_CITY", None, 0);
        Some(LogisticsMatch::zero_cost(
            LogisticsSolution::SupplierDelivery,
            route,
        ))
    }
}

// ===== 2. 供应商送达枢纽与客户收货枢纽重合 =====
pub struct HubOverlapRule;

impl LogisticsRule for HubOverlapRule {
    fn name(&self) -> &'static str {
        "hub_overlap"
    }

    fn apply(&self, ctx: &MatchContext<'_>) -> Option<LogisticsMatch> {
        let receiving = ctx.customer_hubs.receiving();
        let hub = ctx
            .supplier_hubs
            .destination
            .iter()
            .find(|h| receiving.contains(*h))?;
        let route = ctx.placeholder(
            "SUPPLIER_DELIVERY",
            Some(hub.as_str()),
            ctx.supplier_delivery_days,
        );
        Some(LogisticsMatch::zero_cost(
            LogisticsSolution::SupplierDelivery,
            route,
        ))
    }
}

// ===== 3a. 报价枢纽即客户交接地 =====
pub struct PriceHubSameLocationRule;

impl LogisticsRule for PriceHubSameLocationRule {
    fn name(&self) -> &'static str {
        "price_hub_same_location"
    }

    fn apply(&self, ctx: &MatchContext<'_>) -> Option<LogisticsMatch> {
        let hub = ctx.price_hub()?;
        if !(ctx.customer_hubs.ex_works.contains(hub) || ctx.customer_hubs.delivery.contains(hub)) {
            return None;
        }
        let route = ctx.placeholder("SAME_LOCATION", Some(hub), 0);
        Some(LogisticsMatch::zero_cost(LogisticsSolution::SameLocation, route))
    }
}

// ===== 3b. DELIVERY 报价送达客户收货枢纽 =====
pub struct PriceHubSupplierDeliveryRule;

impl LogisticsRule for PriceHubSupplierDeliveryRule {
    fn name(&self) -> &'static str {
        "price_hub_supplier_delivery"
    }

    fn apply(&self, ctx: &MatchContext<'_>) -> Option<LogisticsMatch> {
        let price = ctx.price?;
        let hub = ctx.price_hub()?;
        if price.delivery_mode != DeliveryMode::Delivery
            || !ctx.customer_hubs.receiving().contains(hub)
        {
            return None;
        }
        let route = ctx.placeholder("SUPPLIER_DELIVERY", Some(hub), ctx.supplier_delivery_days);
        Some(LogisticsMatch::zero_cost(
            LogisticsSolution::SupplierDelivery,
            route,
        ))
    }
}

// ===== 3c. Ex Works 报价，客户到报价枢纽自提 =====
pub struct PriceHubExWorksPickupRule;

impl LogisticsRule for PriceHubExWorksPickupRule {
    fn name(&self) -> &'static str {
        "price_hub_ex_works_pickup"
    }

    fn apply(&self, ctx: &MatchContext<'_>) -> Option<LogisticsMatch> {
        let price = ctx.price?;
        let hub = ctx.price_hub()?;
        if price.delivery_mode != DeliveryMode::ExWorks || !ctx.customer_hubs.can_pick_up_at(hub) {
            return None;
        }
        let route = ctx.placeholder("SAME_LOCATION", Some(hub), 0);
        Some(LogisticsMatch::zero_cost(LogisticsSolution::SameLocation, route))
    }
}

// ===== 3d. 报价枢纽 → 客户收货枢纽 线路搜索 =====
pub struct PriceHubRouteRule;

impl LogisticsRule for PriceHubRouteRule {
    fn name(&self) -> &'static str {
        "price_hub_route"
    }

    fn apply(&self, ctx: &MatchContext<'_>) -> Option<LogisticsMatch> {
        let hub = ctx.price_hub()?;
        let destinations = ctx.customer_hubs.receiving();
        let result = ctx
            .resolver
            .resolve(hub, &destinations, ctx.graph, ctx.units_per_pallet);
        let has_direct = !result.direct.is_empty();
        LogisticsMatch::routed(has_direct, result.into_candidates())
    }
}

// ===== 4a. 无报价: 客户可在供应商枢纽提货/收货 =====
pub struct SupplierHubPickupRule;

impl LogisticsRule for SupplierHubPickupRule {
    fn name(&self) -> &'static str {
        "supplier_hub_pickup"
    }

    fn apply(&self, ctx: &MatchContext<'_>) -> Option<LogisticsMatch> {
        if ctx.price.is_some() {
            return None;
        }
        let hub = ctx.supplier_hubs.all.iter().find(|h| {
            ctx.customer_hubs.can_pick_up_at(h.as_str()) || ctx.customer_hubs.delivery.contains(*h)
        })?;
        let route = ctx.placeholder("SAME_LOCATION", Some(hub.as_str()), 0);
        Some(LogisticsMatch::zero_cost(LogisticsSolution::SameLocation, route))
    }
}

// ===== 4d. 无报价: 全部供应商枢纽 → 客户收货枢纽（结果合并后选默认） =====
pub struct SupplierHubRouteRule;

impl LogisticsRule for SupplierHubRouteRule {
    fn name(&self) -> &'static str {
        "supplier_hub_route"
    }

    fn apply(&self, ctx: &MatchContext<'_>) -> Option<LogisticsMatch> {
        if ctx.price.is_some() {
            return None;
        }
        let destinations = ctx.customer_hubs.receiving();

        let mut has_direct = false;
        let mut pooled = Vec::new();
        for origin in &ctx.supplier_hubs.all {
            let result = ctx
                .resolver
                .resolve(origin, &destinations, ctx.graph, ctx.units_per_pallet);
            has_direct |= !result.direct.is_empty();
            pooled.extend(result.into_candidates());
        }

        LogisticsMatch::routed(has_direct, pooled)
    }
}

// ==========================================
// LogisticsMatcher - 物流匹配引擎
// ==========================================
pub struct LogisticsMatcher {
    rules: Vec<Box<dyn LogisticsRule>>,
}

impl Default for LogisticsMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticsMatcher {
    /// 使用默认规则顺序
    pub fn new() -> Self {
        Self::with_rules(vec![
            Box::new(SameCityRule),
            Box::new(HubOverlapRule),
            Box::new(PriceHubSameLocationRule),
            Box::new(PriceHubSupplierDeliveryRule),
            Box::new(PriceHubExWorksPickupRule),
            Box::new(PriceHubRouteRule),
            Box::new(SupplierHubPickupRule),
            Box::new(SupplierHubRouteRule),
        ])
    }

    /// 使用自定义规则表
    pub fn with_rules(rules: Vec<Box<dyn LogisticsRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// 按顺序求值，首个命中的规则胜出
    pub fn resolve(&self, ctx: &MatchContext<'_>) -> LogisticsMatch {
        for rule in &self.rules {
            if let Some(mut matched) = rule.apply(ctx) {
                matched.matched_rule = Some(rule.name());
                return matched;
            }
        }
        LogisticsMatch::none()
    }
}
