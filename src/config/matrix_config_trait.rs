// ==========================================
// 农产品贸易后台 - 矩阵配置读取 Trait
// ==========================================
// 职责: 定义矩阵生成所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::matrix_config::MatrixConfig;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// MatrixConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）、MatrixConfig（固定值，测试用）
#[async_trait]
pub trait MatrixConfigReader: Send + Sync {
    /// 是否启用两段运输搜索
    ///
    /// # 默认值
    /// - true
    async fn get_multi_leg_enabled(&self) -> Result<bool, Box<dyn Error + Send + Sync>>;

    /// 两段运输是否计入中转成本
    ///
    /// # 默认值
    /// - false（中转费与操作时长只读取、不计入总价）
    async fn get_include_transship_cost(&self) -> Result<bool, Box<dyn Error + Send + Sync>>;

    /// 供应商送达占位时效（天）
    ///
    /// # 默认值
    /// - 1
    async fn get_supplier_delivery_days(&self) -> Result<u32, Box<dyn Error + Send + Sync>>;

    /// 一次性读取完整矩阵配置
    async fn load_matrix_config(&self) -> Result<MatrixConfig, Box<dyn Error + Send + Sync>> {
        Ok(MatrixConfig {
            multi_leg_enabled: self.get_multi_leg_enabled().await?,
            include_transship_cost: self.get_include_transship_cost().await?,
            supplier_delivery_days: self.get_supplier_delivery_days().await?,
        })
    }
}

#[async_trait]
impl MatrixConfigReader for MatrixConfig {
    async fn get_multi_leg_enabled(&self) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Ok(self.multi_leg_enabled)
    }

    async fn get_include_transship_cost(&self) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Ok(self.include_transship_cost)
    }

    async fn get_supplier_delivery_days(&self) -> Result<u32, Box<dyn Error + Send + Sync>> {
        Ok(self.supplier_delivery_days)
    }
}
