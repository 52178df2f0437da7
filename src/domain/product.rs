// ==========================================
// 农产品贸易后台 - 产品与包装规格领域模型
// ==========================================
// 职责: 产品、包装规格、客户需求、供应商供货能力
// 红线: 规格在一次矩阵生成过程中不可变
// ==========================================

use crate::domain::party::{Customer, Supplier};
use crate::domain::types::SoldBy;
use serde::{Deserialize, Serialize};

// ==========================================
// Product - 产品
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub sold_by: Option<SoldBy>, // 缺失时按箱计
}

// ==========================================
// ProductPackagingSpec - 产品包装规格
// ==========================================
// 产品 + 包装 + 尺码 + 托盘 的组合，供需匹配的最小单位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPackagingSpec {
    pub id: String,
    pub product: Product,

    // ===== 包装配置 =====
    pub packaging_label: String,
    pub size_label: String,
    pub pallet_label: String,
    pub pallet_dimensions: Option<String>,

    // ===== 装载参数 =====
    pub boxes_per_pallet: u32,
    pub pieces_per_box: Option<u32>,
    pub weight_per_box: Option<f64>,
    pub weight_per_pallet: Option<f64>,
    pub weight_unit: String,
}

impl ProductPackagingSpec {
    /// 计算每托单位数
    ///
    /// # 规则
    /// - kg → weight_per_pallet
    /// - piece / punnet → pieces_per_box × boxes_per_pallet
    /// - box / bag / 未知 → boxes_per_pallet
    ///
    /// 字段缺失时退回 boxes_per_pallet，不报错；字段为 0 时保留 0（单位成本按 0 计）
    pub fn units_per_pallet(&self) -> f64 {
        let boxes = self.boxes_per_pallet as f64;
        match self.product.sold_by {
            Some(SoldBy::Kg) => match self.weight_per_pallet {
                Some(weight) if weight.is_finite() => weight.max(0.0),
                _ => boxes,
            },
            Some(SoldBy::Piece) | Some(SoldBy::Punnet) => match self.pieces_per_box {
                Some(pieces) => pieces as f64 * boxes,
                None => boxes,
            },
            Some(SoldBy::Box) | Some(SoldBy::Bag) | None => boxes,
        }
    }
}

/// 按单位数折算每单位成本，单位数为 0 时返回 0
pub fn per_unit(amount: f64, units_per_pallet: f64) -> f64 {
    if units_per_pallet > 0.0 {
        amount / units_per_pallet
    } else {
        0.0
    }
}

// ==========================================
// CustomerRequirement - 客户需求
// ==========================================
// 客户需要某个具体规格（只读参考数据）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRequirement {
    pub customer: Customer,
    pub spec: ProductPackagingSpec,
}

// ==========================================
// SupplierCapability - 供应商供货能力
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierCapability {
    pub supplier: Supplier,
    pub spec_id: String,
}
