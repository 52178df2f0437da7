// ==========================================
// 农产品贸易后台 - 商机领域模型
// ==========================================
// 矩阵生成只读取商机用于标注潜力，从不创建或修改商机
// ==========================================

use crate::domain::party::StaffMember;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: String,
    pub customer_id: String,
    pub supplier_id: String,
    pub spec_id: String,
    pub status: String,
    pub is_active: bool,

    // ===== 报价 =====
    pub offer_price_per_unit: Option<f64>,
    pub offer_currency: Option<String>,

    pub assigned_agent: Option<StaffMember>,
    pub valid_till: Option<NaiveDate>,
    pub customer_feedback: Option<String>,
}
