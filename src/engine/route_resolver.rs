// ==========================================
// 农产品贸易后台 - 运输线路解析引擎
// ==========================================
// 职责: 给定起点枢纽与可接受终点集合，查找直达线路；
//       直达为空时，经可中转枢纽查找两段线路
// 红线: 只要存在任一直达，绝不返回两段方案（无论价格）
// 红线: 深度固定两段，不做三段及以上串联
// ==========================================

use crate::config::MatrixConfig;
use crate::domain::logistics::{Hub, TransportRoute};
use crate::domain::potential::{RouteCandidate, RouteLeg};
use crate::domain::product::per_unit;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use tracing::trace;

// ==========================================
// RouteResolverConfig - 线路解析参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteResolverConfig {
    pub multi_leg_enabled: bool,
    pub include_transship_cost: bool,
}

impl Default for RouteResolverConfig {
    fn default() -> Self {
        Self {
            multi_leg_enabled: true,
            include_transship_cost: false,
        }
    }
}

impl From<&MatrixConfig> for RouteResolverConfig {
    fn from(config: &MatrixConfig) -> Self {
        Self {
            multi_leg_enabled: config.multi_leg_enabled,
            include_transship_cost: config.include_transship_cost,
        }
    }
}

// ==========================================
// RouteGraph - 线路图（按起点索引）
// ==========================================
// 只收录 is_active 线路；一次生成内构建一次，多次查询复用
pub struct RouteGraph<'a> {
    routes_by_origin: HashMap<&'a str, Vec<&'a TransportRoute>>,
    hubs: HashMap<&'a str, &'a Hub>,
}

impl<'a> RouteGraph<'a> {
    pub fn new(routes: &'a [TransportRoute], hubs: &'a [Hub]) -> Self {
        let mut routes_by_origin: HashMap<&'a str, Vec<&'a TransportRoute>> = HashMap::new();
        for route in routes.iter().filter(|r| r.is_active) {
            routes_by_origin
                .entry(route.origin_hub_id.as_str())
                .or_default()
                .push(route);
        }

        let hubs = hubs.iter().map(|h| (h.id.as_str(), h)).collect();

        Self {
            routes_by_origin,
            hubs,
        }
    }

    /// 从某枢纽出发的全部线路
    pub fn routes_from(&self, origin_hub_id: &str) -> &[&'a TransportRoute] {
        self.routes_by_origin
            .get(origin_hub_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn hub(&self, hub_id: &str) -> Option<&'a Hub> {
        self.hubs.get(hub_id).copied()
    }

    /// 枢纽名称（未知枢纽回落为 ID）
    pub fn hub_name(&self, hub_id: &str) -> String {
        self.hub(hub_id)
            .map(|h| h.name.clone())
            .unwrap_or_else(|| hub_id.to_string())
    }

    pub fn route_count(&self) -> usize {
        self.routes_by_origin.values().map(Vec::len).sum()
    }
}

// ==========================================
// RouteSearchResult - 线路搜索结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteSearchResult {
    pub direct: Vec<RouteCandidate>,
    pub multi_leg: Vec<RouteCandidate>, // 仅当 direct 为空时才可能非空
}

impl RouteSearchResult {
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.multi_leg.is_empty()
    }

    /// 合并为单一候选列表（直达在前）
    pub fn into_candidates(self) -> Vec<RouteCandidate> {
        let mut all = self.direct;
        all.extend(self.multi_leg);
        all
    }
}

// ==========================================
// RouteResolver - 线路解析引擎
// ==========================================
pub struct RouteResolver {
    config: RouteResolverConfig,
}

impl Default for RouteResolver {
    fn default() -> Self {
        Self::new(RouteResolverConfig::default())
    }
}

impl RouteResolver {
    pub fn new(config: RouteResolverConfig) -> Self {
        Self { config }
    }

    /// 查找 origin → destinations 的运输方案
    ///
    /// # 参数
    /// - origin_hub_id: 起点枢纽
    /// - destinations: 可接受的终点枢纽集合
    /// - graph: 线路图
    /// - units_per_pallet: 每托单位数（用于折算单位运费）
    ///
    /// # 返回
    /// - 终点为空或无线路: 空结果（不是错误）
    pub fn resolve(
        &self,
        origin_hub_id: &str,
        destinations: &BTreeSet<String>,
        graph: &RouteGraph<'_>,
        units_per_pallet: f64,
    ) -> RouteSearchResult {
        if destinations.is_empty() {
            return RouteSearchResult::default();
        }

        let direct: Vec<RouteCandidate> = graph
            .routes_from(origin_hub_id)
            .iter()
            .filter(|r| destinations.contains(&r.destination_hub_id))
            .map(|r| direct_candidate(r, graph, units_per_pallet))
            .collect();

        if !direct.is_empty() || !self.config.multi_leg_enabled {
            return RouteSearchResult {
                direct,
                multi_leg: Vec::new(),
            };
        }

        let multi_leg = self.search_two_legs(origin_hub_id, destinations, graph, units_per_pallet);
        trace!(
            origin = origin_hub_id,
            candidates = multi_leg.len(),
            "直达为空，两段搜索完成"
        );

        RouteSearchResult {
            direct: Vec::new(),
            multi_leg,
        }
    }

    /// 两段搜索: origin → 可中转枢纽 → destinations
    fn search_two_legs(
        &self,
        origin_hub_id: &str,
        destinations: &BTreeSet<String>,
        graph: &RouteGraph<'_>,
        units_per_pallet: f64,
    ) -> Vec<RouteCandidate> {
        let mut candidates = Vec::new();

        for first in graph.routes_from(origin_hub_id) {
            // 回到起点的首段没有意义
            if first.destination_hub_id == origin_hub_id {
                continue;
            }
            let via = match graph.hub(&first.destination_hub_id) {
                Some(hub) if hub.can_transship => hub,
                _ => continue,
            };

            for second in graph.routes_from(&first.destination_hub_id) {
                if !destinations.contains(&second.destination_hub_id) {
                    continue;
                }
                candidates.push(self.multi_leg_candidate(
                    first,
                    second,
                    via,
                    graph,
                    units_per_pallet,
                ));
            }
        }

        candidates
    }

    fn multi_leg_candidate(
        &self,
        first: &TransportRoute,
        second: &TransportRoute,
        via: &Hub,
        graph: &RouteGraph<'_>,
        units_per_pallet: f64,
    ) -> RouteCandidate {
        let first_leg = to_leg(first, graph);
        let second_leg = to_leg(second, graph);

        let mut price_per_pallet = first_leg.price_per_pallet + second_leg.price_per_pallet;
        let mut total_duration_days = first_leg.duration_days + second_leg.duration_days;
        if self.config.include_transship_cost {
            price_per_pallet += via.transship_cost_per_pallet.unwrap_or(0.0);
            total_duration_days += handling_days(via.transship_handling_time_hours);
        }

        let transporter_id = if first.transporter_id == second.transporter_id {
            Some(first.transporter_id.clone())
        } else {
            None
        };
        let transporter_name = if first.transporter_id == second.transporter_id {
            first.transporter_name.clone()
        } else {
            format!("{} + {}", first.transporter_name, second.transporter_name)
        };

        let pallet_dimensions = first
            .cheapest_band()
            .and_then(|b| b.pallet_dimensions.clone())
            .or_else(|| second.cheapest_band().and_then(|b| b.pallet_dimensions.clone()));

        let legs = vec![first_leg, second_leg];
        RouteCandidate {
            id: format!("{}+{}", first.id, second.id),
            transporter_id,
            transporter_name,
            origin_hub_id: Some(first.origin_hub_id.clone()),
            origin_hub_name: Some(legs[0].origin_hub_name.clone()),
            destination_hub_id: Some(second.destination_hub_id.clone()),
            destination_hub_name: Some(legs[1].destination_hub_name.clone()),
            via_hub_id: Some(via.id.clone()),
            via_hub_name: Some(via.name.clone()),
            pallet_dimensions,
            price_per_pallet,
            price_per_unit: per_unit(price_per_pallet, units_per_pallet),
            total_duration_days,
            total_customs_cost: first.customs_cost_per_shipment + second.customs_cost_per_shipment,
            is_multi_leg: true,
            total_legs: legs.len(),
            legs,
        }
    }
}

/// 默认方案: 每托价格升序，其次时效，再按 ID，保证相同价格时结果确定
pub fn select_default(candidates: &[RouteCandidate]) -> Option<&RouteCandidate> {
    candidates.iter().min_by(|a, b| compare_candidates(a, b))
}

fn compare_candidates(a: &RouteCandidate, b: &RouteCandidate) -> Ordering {
    a.price_per_pallet
        .total_cmp(&b.price_per_pallet)
        .then(a.total_duration_days.cmp(&b.total_duration_days))
        .then_with(|| a.id.cmp(&b.id))
}

fn direct_candidate(
    route: &TransportRoute,
    graph: &RouteGraph<'_>,
    units_per_pallet: f64,
) -> RouteCandidate {
    let leg = to_leg(route, graph);
    let price_per_pallet = leg.price_per_pallet;

    RouteCandidate {
        id: route.id.clone(),
        transporter_id: Some(route.transporter_id.clone()),
        transporter_name: route.transporter_name.clone(),
        origin_hub_id: Some(route.origin_hub_id.clone()),
        origin_hub_name: Some(leg.origin_hub_name.clone()),
        destination_hub_id: Some(route.destination_hub_id.clone()),
        destination_hub_name: Some(leg.destination_hub_name.clone()),
        via_hub_id: None,
        via_hub_name: None,
        pallet_dimensions: route.cheapest_band().and_then(|b| b.pallet_dimensions.clone()),
        price_per_pallet,
        price_per_unit: per_unit(price_per_pallet, units_per_pallet),
        total_duration_days: route.transport_duration_days,
        total_customs_cost: route.customs_cost_per_shipment,
        is_multi_leg: false,
        total_legs: 1,
        legs: vec![leg],
    }
}

fn to_leg(route: &TransportRoute, graph: &RouteGraph<'_>) -> RouteLeg {
    RouteLeg {
        route_id: route.id.clone(),
        transporter_id: route.transporter_id.clone(),
        transporter_name: route.transporter_name.clone(),
        origin_hub_id: route.origin_hub_id.clone(),
        origin_hub_name: graph.hub_name(&route.origin_hub_id),
        destination_hub_id: route.destination_hub_id.clone(),
        destination_hub_name: graph.hub_name(&route.destination_hub_id),
        price_per_pallet: route.headline_price_per_pallet(),
        duration_days: route.transport_duration_days,
        customs_cost: route.customs_cost_per_shipment,
    }
}

/// 中转操作时长折算为整天（向上取整）
fn handling_days(hours: Option<f64>) -> u32 {
    match hours {
        Some(h) if h.is_finite() && h > 0.0 => (h / 24.0).ceil() as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::logistics::PriceBand;

    fn hub(id: &str, can_transship: bool) -> Hub {
        Hub {
            id: id.to_string(),
            name: format!("{} Hub", id),
            code: None,
            city: None,
            country: None,
            can_transship,
            transship_cost_per_pallet: Some(15.0),
            transship_handling_time_hours: Some(30.0),
        }
    }

    fn route(id: &str, transporter: &str, from: &str, to: &str, price: f64, days: u32) -> TransportRoute {
        TransportRoute {
            id: id.to_string(),
            transporter_id: transporter.to_string(),
            transporter_name: format!("{} Logistics", transporter),
            origin_hub_id: from.to_string(),
            destination_hub_id: to.to_string(),
            transport_duration_days: days,
            customs_cost_per_shipment: 10.0,
            is_active: true,
            price_bands: vec![PriceBand {
                id: format!("{}-band", id),
                pallet_dimensions: Some("120x80".to_string()),
                min_pallets: 1,
                max_pallets: None,
                price_per_pallet: price,
            }],
        }
    }

    fn dests(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_direct_routes_priced_from_cheapest_band() {
        let hubs = vec![hub("H1", false), hub("H2", false)];
        let mut r1 = route("R1", "T1", "H1", "H2", 100.0, 2);
        r1.price_bands.push(PriceBand {
            id: "R1-cheap".to_string(),
            pallet_dimensions: None,
            min_pallets: 10,
            max_pallets: None,
            price_per_pallet: 90.0,
        });
        let routes = vec![r1, route("R2", "T2", "H1", "H2", 80.0, 3)];
        let graph = RouteGraph::new(&routes, &hubs);

        let result = RouteResolver::default().resolve("H1", &dests(&["H2"]), &graph, 40.0);
        assert_eq!(result.direct.len(), 2);
        assert!(result.multi_leg.is_empty());

        let r1 = result.direct.iter().find(|c| c.id == "R1").unwrap();
        assert_eq!(r1.price_per_pallet, 90.0);
        assert_eq!(r1.total_legs, 1);

        let default = select_default(&result.direct).unwrap();
        assert_eq!(default.id, "R2");
        assert_eq!(default.price_per_unit, 2.0);
    }

    #[test]
    fn test_direct_route_suppresses_multi_leg() {
        let hubs = vec![hub("H1", false), hub("H2", true), hub("H3", false)];
        let routes = vec![
            route("R13", "T1", "H1", "H3", 500.0, 5),
            route("R12", "T1", "H1", "H2", 10.0, 1),
            route("R23", "T1", "H2", "H3", 10.0, 1),
        ];
        let graph = RouteGraph::new(&routes, &hubs);

        let result = RouteResolver::default().resolve("H1", &dests(&["H3"]), &graph, 10.0);
        assert_eq!(result.direct.len(), 1);
        assert!(result.multi_leg.is_empty());
    }

    #[test]
    fn test_two_leg_route_through_transship_hub() {
        let hubs = vec![hub("H1", false), hub("H2", true), hub("H3", false)];
        let routes = vec![
            route("R12", "T1", "H1", "H2", 60.0, 2),
            route("R23", "T2", "H2", "H3", 40.0, 3),
        ];
        let graph = RouteGraph::new(&routes, &hubs);

        let result = RouteResolver::default().resolve("H1", &dests(&["H3"]), &graph, 0.0);
        assert!(result.direct.is_empty());
        assert_eq!(result.multi_leg.len(), 1);

        let c = &result.multi_leg[0];
        assert_eq!(c.id, "R12+R23");
        assert!(c.is_multi_leg);
        assert_eq!(c.total_legs, 2);
        assert_eq!(c.price_per_pallet, 100.0);
        assert_eq!(c.price_per_unit, 0.0);
        assert_eq!(c.total_duration_days, 5);
        assert_eq!(c.total_customs_cost, 20.0);
        assert_eq!(c.via_hub_id.as_deref(), Some("H2"));
        assert_eq!(c.transporter_id, None);
        assert_eq!(c.transporter_name, "T1 Logistics + T2 Logistics");
        assert_eq!(c.legs[0].destination_hub_name, "H2 Hub");
    }

    #[test]
    fn test_non_transship_hub_is_not_an_intermediate() {
        let hubs = vec![hub("H1", false), hub("H2", false), hub("H3", false)];
        let routes = vec![
            route("R12", "T1", "H1", "H2", 60.0, 2),
            route("R23", "T1", "H2", "H3", 40.0, 3),
        ];
        let graph = RouteGraph::new(&routes, &hubs);

        let result = RouteResolver::default().resolve("H1", &dests(&["H3"]), &graph, 10.0);
        assert!(result.is_empty());
    }

    #[test]
    fn test_transship_cost_is_opt_in() {
        let hubs = vec![hub("H1", false), hub("H2", true), hub("H3", false)];
        let routes = vec![
            route("R12", "T1", "H1", "H2", 60.0, 2),
            route("R23", "T1", "H2", "H3", 40.0, 3),
        ];
        let graph = RouteGraph::new(&routes, &hubs);

        let resolver = RouteResolver::new(RouteResolverConfig {
            multi_leg_enabled: true,
            include_transship_cost: true,
        });
        let result = resolver.resolve("H1", &dests(&["H3"]), &graph, 10.0);
        let c = &result.multi_leg[0];
        assert_eq!(c.price_per_pallet, 115.0);
        assert_eq!(c.total_duration_days, 7); // 30 小时 → 2 天
        assert_eq!(c.transporter_id.as_deref(), Some("T1"));
    }

    #[test]
    fn test_multi_leg_can_be_disabled() {
        let hubs = vec![hub("H1", false), hub("H2", true), hub("H3", false)];
        let routes = vec![
            route("R12", "T1", "H1", "H2", 60.0, 2),
            route("R23", "T1", "H2", "H3", 40.0, 3),
        ];
        let graph = RouteGraph::new(&routes, &hubs);

        let resolver = RouteResolver::new(RouteResolverConfig {
            multi_leg_enabled: false,
            include_transship_cost: false,
        });
        assert!(resolver.resolve("H1", &dests(&["H3"]), &graph, 10.0).is_empty());
    }

    #[test]
    fn test_empty_inputs_yield_empty_result() {
        let hubs = vec![hub("H1", false)];
        let routes: Vec<TransportRoute> = Vec::new();
        let graph = RouteGraph::new(&routes, &hubs);
        let resolver = RouteResolver::default();

        assert!(resolver.resolve("H1", &dests(&["H2"]), &graph, 10.0).is_empty());
        assert!(resolver.resolve("H1", &BTreeSet::new(), &graph, 10.0).is_empty());
        assert_eq!(graph.route_count(), 0);
    }

    #[test]
    fn test_inactive_routes_are_ignored() {
        let hubs = vec![hub("H1", false), hub("H2", false)];
        let mut r = route("R1", "T1", "H1", "H2", 100.0, 2);
        r.is_active = false;
        let routes = vec![r];
        let graph = RouteGraph::new(&routes, &hubs);

        assert!(RouteResolver::default()
            .resolve("H1", &dests(&["H2"]), &graph, 10.0)
            .is_empty());
    }

    #[test]
    fn test_select_default_breaks_ties_by_duration_then_id() {
        let hubs = vec![hub("H1", false), hub("H2", false)];
        let routes = vec![
            route("RB", "T1", "H1", "H2", 80.0, 2),
            route("RA", "T1", "H1", "H2", 80.0, 2),
            route("RC", "T1", "H1", "H2", 80.0, 1),
        ];
        let graph = RouteGraph::new(&routes, &hubs);
        let result = RouteResolver::default().resolve("H1", &dests(&["H2"]), &graph, 10.0);

        assert_eq!(select_default(&result.direct).unwrap().id, "RC");
        assert!(select_default(&[]).is_none());
    }
}
