// ==========================================
// 农产品贸易后台 - 供应商报价领域模型
// ==========================================
// 同一供应商同一规格可在多个枢纽分别报价
// 每条报价在矩阵中单独生成一条潜力
// ==========================================

use crate::domain::types::DeliveryMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierPrice {
    pub id: String,
    pub supplier_id: String,
    pub spec_id: String,

    // ===== 报价地点 =====
    pub hub_id: Option<String>,
    pub hub_name: Option<String>,

    // ===== 价格 =====
    pub price_per_unit: f64,
    pub currency: String,
    pub delivery_mode: DeliveryMode,

    // ===== 有效期 =====
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl SupplierPrice {
    /// 报价在 as_of 时刻是否仍有效（无截止时间视为长期有效）
    pub fn is_current(&self, as_of: DateTime<Utc>) -> bool {
        self.valid_until.map_or(true, |until| until >= as_of)
    }
}
