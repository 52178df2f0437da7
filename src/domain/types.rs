// ==========================================
// 农产品贸易后台 - 领域类型定义
// ==========================================
// 职责: 交付方式、计量方式、潜力状态、物流方案等枚举
// 序列化格式: 与数据库存储字符串保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 交付方式 (Delivery Mode)
// ==========================================
// 供应商报价只会出现 ExWorks / Delivery
// 物流能力 (客户/供应商) 额外出现 Transit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryMode {
    #[serde(rename = "Ex Works")]
    ExWorks, // 买方自提
    #[serde(rename = "DELIVERY")]
    Delivery, // 卖方送达
    #[serde(rename = "TRANSIT")]
    Transit, // 客户在中转枢纽提货
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl DeliveryMode {
    /// 从字符串解析交付方式
    ///
    /// 兼容 "Ex Works" / "EX_WORKS" / "exw" 等历史写法
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_uppercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "EXWORKS" | "EXW" => Some(DeliveryMode::ExWorks),
            "DELIVERY" => Some(DeliveryMode::Delivery),
            "TRANSIT" => Some(DeliveryMode::Transit),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            DeliveryMode::ExWorks => "Ex Works",
            DeliveryMode::Delivery => "DELIVERY",
            DeliveryMode::Transit => "TRANSIT",
        }
    }
}

// ==========================================
// 计量方式 (Sold By)
// ==========================================
// 决定"每托单位数"的计算口径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoldBy {
    Kg,
    Piece,
    Punnet,
    Box,
    Bag,
}

impl fmt::Display for SoldBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl SoldBy {
    /// 从字符串解析计量方式（未知值返回 None，由调用方按箱兜底）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilogram" => Some(SoldBy::Kg),
            "piece" | "pieces" | "pcs" => Some(SoldBy::Piece),
            "punnet" | "punnets" => Some(SoldBy::Punnet),
            "box" | "boxes" => Some(SoldBy::Box),
            "bag" | "bags" => Some(SoldBy::Bag),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            SoldBy::Kg => "kg",
            SoldBy::Piece => "piece",
            SoldBy::Punnet => "punnet",
            SoldBy::Box => "box",
            SoldBy::Bag => "bag",
        }
    }
}

// ==========================================
// 贸易潜力状态 (Potential Status)
// ==========================================
// 红线: 状态完全由 (has_price, has_transport) 决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotentialStatus {
    Complete,         // 有价格 + 有运输
    MissingTransport, // 有价格 + 无运输
    MissingPrice,     // 无价格 + 有运输
    MissingBoth,      // 无价格 + 无运输
}

impl fmt::Display for PotentialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PotentialStatus {
    /// 由价格/运输两个独立布尔值推导状态
    pub fn derive(has_price: bool, has_transport: bool) -> Self {
        match (has_price, has_transport) {
            (true, true) => PotentialStatus::Complete,
            (true, false) => PotentialStatus::MissingTransport,
            (false, true) => PotentialStatus::MissingPrice,
            (false, false) => PotentialStatus::MissingBoth,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PotentialStatus::Complete => "complete",
            PotentialStatus::MissingTransport => "missing_transport",
            PotentialStatus::MissingPrice => "missing_price",
            PotentialStatus::MissingBoth => "missing_both",
        }
    }
}

impl std::str::FromStr for PotentialStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "complete" => Ok(PotentialStatus::Complete),
            "missing_transport" => Ok(PotentialStatus::MissingTransport),
            "missing_price" => Ok(PotentialStatus::MissingPrice),
            "missing_both" => Ok(PotentialStatus::MissingBoth),
            other => Err(format!("未知潜力状态: {}", other)),
        }
    }
}

// ==========================================
// 物流方案 (Logistics Solution)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogisticsSolution {
    SameLocation,        // 同一地点交接
    SupplierDelivery,    // 供应商送达
    ThirdPartyTransport, // 第三方直达运输
    MultiLegTransport,   // 经中转枢纽的两段运输
}

impl fmt::Display for LogisticsSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogisticsSolution::SameLocation => write!(f, "SAME_LOCATION"),
            LogisticsSolution::SupplierDelivery => write!(f, "SUPPLIER_DELIVERY"),
            LogisticsSolution::ThirdPartyTransport => write!(f, "THIRD_PARTY_TRANSPORT"),
            LogisticsSolution::MultiLegTransport => write!(f, "MULTI_LEG_TRANSPORT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_derivation_table() {
        assert_eq!(PotentialStatus::derive(true, true), PotentialStatus::Complete);
        assert_eq!(PotentialStatus::derive(true, false), PotentialStatus::MissingTransport);
        assert_eq!(PotentialStatus::derive(false, true), PotentialStatus::MissingPrice);
        assert_eq!(PotentialStatus::derive(false, false), PotentialStatus::MissingBoth);
    }

    #[test]
    fn test_delivery_mode_accepts_legacy_spellings() {
        assert_eq!(DeliveryMode::from_str("Ex Works"), Some(DeliveryMode::ExWorks));
        assert_eq!(DeliveryMode::from_str("EX_WORKS"), Some(DeliveryMode::ExWorks));
        assert_eq!(DeliveryMode::from_str("delivery"), Some(DeliveryMode::Delivery));
        assert_eq!(DeliveryMode::from_str(" TRANSIT "), Some(DeliveryMode::Transit));
        assert_eq!(DeliveryMode::from_str("courier"), None);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("missing-price".parse::<PotentialStatus>(), Ok(PotentialStatus::MissingPrice));
        assert!("unknown".parse::<PotentialStatus>().is_err());
    }

    #[test]
    fn test_delivery_mode_serde_uses_db_strings() {
        let json = serde_json::to_string(&DeliveryMode::ExWorks).unwrap();
        assert_eq!(json, "\"Ex Works\"");
        assert_eq!(
            serde_json::to_string(&LogisticsSolution::MultiLegTransport).unwrap(),
            "\"MULTI_LEG_TRANSPORT\""
        );
    }
}
