// ==========================================
// 农产品贸易后台 - 认证与排除名单领域模型
// ==========================================
// 认证门槛: 客户要求的每一项认证，供应商都必须持有且未过期
// 排除名单: 人工标记为永久不可行的 (客户, 供应商, 规格) 三元组
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificationRequirement {
    pub customer_id: String,
    pub certification_id: String,
    pub is_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierCertification {
    pub supplier_id: String,
    pub certification_id: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl SupplierCertification {
    /// 无过期时间或过期时间晚于 as_of 视为有效
    pub fn is_valid_at(&self, as_of: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expires| expires > as_of)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedTradePotential {
    pub customer_id: String,
    pub supplier_id: String,
    pub spec_id: String,
    pub reason: String,
    pub notes: Option<String>,
}
