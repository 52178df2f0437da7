// ==========================================
// 农产品贸易后台 - 贸易潜力 CSV 导出
// ==========================================
// 每条潜力一行；缺失字段留空
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::potential::TradePotential;
use serde::Serialize;
use std::io::Write;

/// CSV 行（扁平化）
#[derive(Debug, Serialize)]
struct PotentialCsvRow<'a> {
    id: &'a str,
    status: &'static str,
    completion_score: u8,
    customer_id: &'a str,
    customer_name: &'a str,
    supplier_id: &'a str,
    supplier_name: &'a str,
    spec_id: &'a str,
    product_name: &'a str,
    packaging: &'a str,
    size: &'a str,
    units_per_pallet: f64,
    price_per_unit: Option<f64>,
    currency: Option<&'a str>,
    price_hub: Option<&'a str>,
    delivery_mode: Option<&'static str>,
    logistics_solution: Option<String>,
    route_id: Option<&'a str>,
    transporter: Option<&'a str>,
    transport_price_per_pallet: Option<f64>,
    transport_price_per_unit: Option<f64>,
    transport_days: Option<u32>,
    alternative_routes: usize,
    landed_cost_per_unit: Option<f64>,
    opportunity_id: Option<&'a str>,
    opportunity_status: Option<&'a str>,
}

impl<'a> From<&'a TradePotential> for PotentialCsvRow<'a> {
    fn from(p: &'a TradePotential) -> Self {
        let price = p.supplier_price.as_ref();
        let route = p.transport_route.as_ref();
        let opportunity = p.opportunity.as_ref();

        Self {
            id: &p.id,
            status: p.status.as_str(),
            completion_score: p.completion_score,
            customer_id: &p.customer.id,
            customer_name: &p.customer.name,
            supplier_id: &p.supplier.id,
            supplier_name: &p.supplier.name,
            spec_id: &p.product.spec_id,
            product_name: &p.product.product_name,
            packaging: &p.product.packaging_label,
            size: &p.product.size_label,
            units_per_pallet: p.product.units_per_pallet,
            price_per_unit: price.map(|x| x.price_per_unit),
            currency: price.map(|x| x.currency.as_str()),
            price_hub: price.and_then(|x| x.hub_name.as_deref().or(x.hub_id.as_deref())),
            delivery_mode: price.map(|x| x.delivery_mode.to_db_str()),
            logistics_solution: p.logistics_solution.map(|s| s.to_string()),
            route_id: route.map(|r| r.id.as_str()),
            transporter: route.map(|r| r.transporter_name.as_str()),
            transport_price_per_pallet: route.map(|r| r.price_per_pallet),
            transport_price_per_unit: route.map(|r| r.price_per_unit),
            transport_days: route.map(|r| r.total_duration_days),
            alternative_routes: p.available_transport_routes.len(),
            landed_cost_per_unit: p.landed_cost_per_unit(),
            opportunity_id: opportunity.map(|o| o.id.as_str()),
            opportunity_status: opportunity.map(|o| o.status.as_str()),
        }
    }
}

/// 将潜力列表写为 CSV（含表头）
///
/// # 返回
/// - 写入的数据行数
pub fn export_potentials_csv<W: Write>(potentials: &[TradePotential], writer: W) -> ApiResult<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for potential in potentials {
        csv_writer.serialize(PotentialCsvRow::from(potential))?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(potentials.len())
}
