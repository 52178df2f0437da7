// ==========================================
// 农产品贸易后台 - 贸易潜力领域模型
// ==========================================
// 职责: 矩阵生成的派生输出（不落库）
// - TradePotential: 一个 (客户, 供应商, 规格[, 报价枢纽]) 组合
// - RouteCandidate / RouteLeg: 运输方案及分段明细
// - TradePotentialSummary: 驾驶舱完成度统计
// ==========================================

use crate::domain::opportunity::Opportunity;
use crate::domain::party::{Customer, StaffMember, Supplier};
use crate::domain::pricing::SupplierPrice;
use crate::domain::product::ProductPackagingSpec;
use crate::domain::types::{LogisticsSolution, PotentialStatus, SoldBy};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// RouteLeg - 运输分段
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub route_id: String,
    pub transporter_id: String,
    pub transporter_name: String,
    pub origin_hub_id: String,
    pub origin_hub_name: String,
    pub destination_hub_id: String,
    pub destination_hub_name: String,
    pub price_per_pallet: f64,
    pub duration_days: u32,
    pub customs_cost: f64,
}

// ==========================================
// RouteCandidate - 运输候选方案
// ==========================================
// 直达: legs.len() == 1；两段: legs.len() == 2
// 零成本方案（同地点/供应商送达）使用占位方案，legs 为空
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCandidate {
    pub id: String,
    pub transporter_id: Option<String>,
    pub transporter_name: String,

    // ===== 起止 =====
    pub origin_hub_id: Option<String>,
    pub origin_hub_name: Option<String>,
    pub destination_hub_id: Option<String>,
    pub destination_hub_name: Option<String>,
    pub via_hub_id: Option<String>,
    pub via_hub_name: Option<String>,

    // ===== 成本与时效 =====
    pub pallet_dimensions: Option<String>,
    pub price_per_pallet: f64,
    pub price_per_unit: f64,
    pub total_duration_days: u32,
    pub total_customs_cost: f64,

    // ===== 分段 =====
    pub is_multi_leg: bool,
    pub total_legs: usize,
    pub legs: Vec<RouteLeg>,
}

impl RouteCandidate {
    /// 零成本占位方案
    pub fn placeholder(
        id: &str,
        label: &str,
        hub_id: Option<&str>,
        hub_name: Option<&str>,
        duration_days: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            transporter_id: None,
            transporter_name: label.to_string(),
            origin_hub_id: hub_id.map(str::to_string),
            origin_hub_name: hub_name.map(str::to_string),
            destination_hub_id: hub_id.map(str::to_string),
            destination_hub_name: hub_name.map(str::to_string),
            via_hub_id: None,
            via_hub_name: None,
            pallet_dimensions: None,
            price_per_pallet: 0.0,
            price_per_unit: 0.0,
            total_duration_days: duration_days,
            total_customs_cost: 0.0,
            is_multi_leg: false,
            total_legs: 0,
            legs: Vec::new(),
        }
    }
}

// ==========================================
// PotentialProduct - 潜力中的产品摘要
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentialProduct {
    pub spec_id: String,
    pub product_id: String,
    pub product_name: String,
    pub category: Option<String>,
    pub packaging_label: String,
    pub size_label: String,
    pub pallet_label: String,
    pub sold_by: Option<SoldBy>,
    pub units_per_pallet: f64,
}

impl PotentialProduct {
    pub fn from_spec(spec: &ProductPackagingSpec) -> Self {
        Self {
            spec_id: spec.id.clone(),
            product_id: spec.product.id.clone(),
            product_name: spec.product.name.clone(),
            category: spec.product.category.clone(),
            packaging_label: spec.packaging_label.clone(),
            size_label: spec.size_label.clone(),
            pallet_label: spec.pallet_label.clone(),
            sold_by: spec.product.sold_by,
            units_per_pallet: spec.units_per_pallet(),
        }
    }
}

// ==========================================
// OpportunitySummary - 已有商机摘要
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunitySummary {
    pub id: String,
    pub status: String,
    pub is_active: bool,
    pub offer_price_per_unit: Option<f64>,
    pub offer_currency: Option<String>,
    pub assigned_agent: Option<StaffMember>,
    pub valid_till: Option<NaiveDate>,
    pub customer_feedback: Option<String>,
}

impl From<&Opportunity> for OpportunitySummary {
    fn from(o: &Opportunity) -> Self {
        Self {
            id: o.id.clone(),
            status: o.status.clone(),
            is_active: o.is_active,
            offer_price_per_unit: o.offer_price_per_unit,
            offer_currency: o.offer_currency.clone(),
            assigned_agent: o.assigned_agent.clone(),
            valid_till: o.valid_till,
            customer_feedback: o.customer_feedback.clone(),
        }
    }
}

// ==========================================
// TradePotential - 贸易潜力
// ==========================================
// 红线: id 在 (customer, supplier, spec[, hub]) 上唯一
// 红线: status / completion_score 完全由 has_price、has_transport 决定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePotential {
    pub id: String,
    pub customer: Customer,
    pub supplier: Supplier,
    pub product: PotentialProduct,

    // ===== 状态 =====
    pub status: PotentialStatus,
    pub has_price: bool,
    pub has_transport: bool,
    pub completion_score: u8,

    // ===== 价格 =====
    pub supplier_price: Option<SupplierPrice>,

    // ===== 物流 =====
    pub logistics_solution: Option<LogisticsSolution>,
    pub matched_rule: Option<String>, // 命中的物流规则名，便于审计
    pub transport_route: Option<RouteCandidate>,
    pub available_transport_routes: Vec<RouteCandidate>,

    // ===== 商机关联 =====
    pub opportunity: Option<OpportunitySummary>,
}

impl TradePotential {
    /// 构造稳定 ID: customerId-supplierId-specId[-hubId]
    ///
    /// 只有存在报价时才带枢纽后缀，作为跨次生成的去重键
    pub fn build_id(
        customer_id: &str,
        supplier_id: &str,
        spec_id: &str,
        price_hub_id: Option<&str>,
    ) -> String {
        match price_hub_id {
            Some(hub) => format!("{}-{}-{}-{}", customer_id, supplier_id, spec_id, hub),
            None => format!("{}-{}-{}", customer_id, supplier_id, spec_id),
        }
    }

    /// 完成度评分: 50×有价格 + 50×有运输
    pub fn score(has_price: bool, has_transport: bool) -> u8 {
        (if has_price { 50 } else { 0 }) + (if has_transport { 50 } else { 0 })
    }

    /// 到岸单价 = 供应商单价 + 默认运输方案的单位运费
    ///
    /// 缺少价格或运输时返回 None
    pub fn landed_cost_per_unit(&self) -> Option<f64> {
        let price = self.supplier_price.as_ref()?;
        let route = self.transport_route.as_ref()?;
        Some(price.price_per_unit + route.price_per_unit)
    }
}

// ==========================================
// TradePotentialSummary - 完成度统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradePotentialSummary {
    pub total: usize,
    pub complete: usize,
    pub missing_price: usize,
    pub missing_transport: usize,
    pub missing_both: usize,
    pub completion_rate: f64, // 百分比，保留一位小数；total 为 0 时为 0
}
