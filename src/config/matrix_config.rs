// ==========================================
// 农产品贸易后台 - 矩阵生成参数
// ==========================================
// 职责: 引擎使用的纯数据配置（不含读取逻辑）
// 来源: config_kv 表，经 MatrixConfigReader 读取；缺失时取默认值
// ==========================================

use serde::{Deserialize, Serialize};

/// 默认供应商送达占位时效（天）
pub const DEFAULT_SUPPLIER_DELIVERY_DAYS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatrixConfig {
    /// 直达为空时是否搜索两段运输
    pub multi_leg_enabled: bool,
    /// 两段运输是否计入中转枢纽的中转费与操作时长
    pub include_transship_cost: bool,
    /// 供应商送达类占位方案的时效
    pub supplier_delivery_days: u32,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            multi_leg_enabled: true,
            include_transship_cost: false,
            supplier_delivery_days: DEFAULT_SUPPLIER_DELIVERY_DAYS,
        }
    }
}
