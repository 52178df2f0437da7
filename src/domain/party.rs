// ==========================================
// 农产品贸易后台 - 交易主体领域模型
// ==========================================
// 职责: 客户、供应商、业务员
// 红线: 数据访问层负责把联表结果归一为单一嵌套对象
// ==========================================

use serde::{Deserialize, Serialize};

/// 业务员 / 内部员工
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
}

// ==========================================
// Customer - 客户
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub agent: Option<StaffMember>, // 负责该客户的业务员
}

// ==========================================
// Supplier - 供应商
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// 地点比较: 城市与国家均非空且忽略大小写相等
pub fn same_city(
    a_city: Option<&str>,
    a_country: Option<&str>,
    b_city: Option<&str>,
    b_country: Option<&str>,
) -> bool {
    fn eq(a: Option<&str>, b: Option<&str>) -> bool {
        match (a.map(str::trim), b.map(str::trim)) {
            (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }
    eq(a_city, b_city) && eq(a_country, b_country)
}

impl Supplier {
    /// 供应商与客户是否位于同一城市同一国家
    pub fn is_colocated_with(&self, customer: &Customer) -> bool {
        same_city(
            self.city.as_deref(),
            self.country.as_deref(),
            customer.city.as_deref(),
            customer.country.as_deref(),
        )
    }
}
