// ==========================================
// 农产品贸易后台 - 物流领域模型
// ==========================================
// 职责: 枢纽、运输线路、运价档、客户/供应商物流能力
// 运输线路是枢纽图上的有向边
// ==========================================

use crate::domain::types::DeliveryMode;
use serde::{Deserialize, Serialize};

// ==========================================
// Hub - 物流枢纽
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hub {
    pub id: String,
    pub name: String,
    pub code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,

    // ===== 中转属性 =====
    pub can_transship: bool,                           // 可作为两段运输的中转点
    pub transship_cost_per_pallet: Option<f64>,        // 中转费用 (每托)
    pub transship_handling_time_hours: Option<f64>,    // 中转操作时长 (小时)
}

// ==========================================
// PriceBand - 运价档
// ==========================================
// 按托数区间 + 托盘尺寸给出每托运价
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub id: String,
    pub pallet_dimensions: Option<String>,
    pub min_pallets: u32,
    pub max_pallets: Option<u32>,
    pub price_per_pallet: f64,
}

// ==========================================
// TransportRoute - 运输线路
// ==========================================
// 只有启用的线路（且承运商启用）会被数据访问层返回
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportRoute {
    pub id: String,
    pub transporter_id: String,
    pub transporter_name: String,
    pub origin_hub_id: String,
    pub destination_hub_id: String,
    pub transport_duration_days: u32,
    pub customs_cost_per_shipment: f64,
    pub is_active: bool,
    pub price_bands: Vec<PriceBand>,
}

impl TransportRoute {
    /// 线路最便宜的运价档（无运价档返回 None）
    pub fn cheapest_band(&self) -> Option<&PriceBand> {
        self.price_bands.iter().min_by(|a, b| {
            a.price_per_pallet
                .partial_cmp(&b.price_per_pallet)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// 线路标价（最便宜运价档的每托价格，无运价档按 0 计）
    pub fn headline_price_per_pallet(&self) -> f64 {
        self.cheapest_band().map(|b| b.price_per_pallet).unwrap_or(0.0)
    }
}

// ==========================================
// LogisticsCapability - 物流能力
// ==========================================
// 客户与供应商共用同一结构，owner_id 指向对应主体
// - Ex Works: origin_hub 为提货/发货地
// - DELIVERY: destination_hub 为送达地
// - TRANSIT: origin_hub 为客户的中转提货枢纽
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticsCapability {
    pub id: String,
    pub owner_id: String,
    pub mode: DeliveryMode,
    pub origin_hub_id: Option<String>,
    pub origin_hub_name: Option<String>,
    pub destination_hub_id: Option<String>,
    pub destination_hub_name: Option<String>,
}
