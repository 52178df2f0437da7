// ==========================================
// 农产品贸易后台 - 矩阵生成编排器
// ==========================================
// 主流程:
//   1. 一次性并发读取参考数据快照（唯一的挂起点）
//   2. 读取矩阵配置
//   3. 纯内存生成矩阵（无 I/O）
//   4. 归约完成度统计
// 红线: 任一步骤失败即整体失败，不返回部分结果
// ==========================================

use crate::config::{MatrixConfig, MatrixConfigReader};
use crate::domain::potential::{TradePotential, TradePotentialSummary};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::potential_builder::{MatrixBuildStats, PotentialMatrixBuilder};
use crate::engine::snapshot::ReferenceDataSource;
use crate::engine::summary::PotentialSummaryEngine;
use crate::perf::PerfGuard;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

// ==========================================
// MatrixRun - 一次生成的结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixRun {
    pub run_id: String,
    pub as_of: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub config: MatrixConfig,
    pub potentials: Vec<TradePotential>,
    pub summary: TradePotentialSummary,
    pub stats: MatrixBuildStats,
}

// ==========================================
// TradePotentialService - 矩阵生成编排器
// ==========================================
pub struct TradePotentialService<S, C>
where
    S: ReferenceDataSource,
    C: MatrixConfigReader,
{
    source: Arc<S>,
    config: Arc<C>,
}

impl<S, C> TradePotentialService<S, C>
where
    S: ReferenceDataSource,
    C: MatrixConfigReader,
{
    /// 创建编排器
    ///
    /// # 参数
    /// - source: 参考数据来源
    /// - config: 矩阵配置读取器
    pub fn new(source: Arc<S>, config: Arc<C>) -> Self {
        Self { source, config }
    }

    /// 生成 as_of 时刻的完整贸易潜力矩阵
    pub async fn generate(&self, as_of: DateTime<Utc>) -> EngineResult<MatrixRun> {
        let perf = PerfGuard::new("generate_trade_potential");
        let run_id = Uuid::new_v4().to_string();

        info!(run_id = %run_id, as_of = %as_of, "开始生成贸易潜力矩阵");

        // ==========================================
        // 步骤1: 参考数据快照
        // ==========================================
        let snapshot = self.source.load_snapshot(as_of).await?;
        debug!(
            run_id = %run_id,
            requirements = snapshot.requirements.len(),
            prices = snapshot.supplier_prices.len(),
            routes = snapshot.transport_routes.len(),
            "参考数据快照就绪"
        );

        // ==========================================
        // 步骤2: 矩阵配置
        // ==========================================
        let config = self
            .config
            .load_matrix_config()
            .await
            .map_err(|e| EngineError::Config(e.to_string()))?;
        debug!(
            run_id = %run_id,
            multi_leg_enabled = config.multi_leg_enabled,
            include_transship_cost = config.include_transship_cost,
            supplier_delivery_days = config.supplier_delivery_days,
            "矩阵配置已加载"
        );

        // ==========================================
        // 步骤3: 生成矩阵（纯内存）
        // ==========================================
        let result = PotentialMatrixBuilder::new(config).build(&snapshot, as_of);

        // ==========================================
        // 步骤4: 完成度统计
        // ==========================================
        let summary = PotentialSummaryEngine::summarize(&result.potentials);

        info!(
            run_id = %run_id,
            total = summary.total,
            complete = summary.complete,
            missing_price = summary.missing_price,
            missing_transport = summary.missing_transport,
            missing_both = summary.missing_both,
            excluded = result.stats.excluded,
            certification_blocked = result.stats.certification_blocked,
            elapsed_ms = perf.elapsed_ms(),
            "贸易潜力矩阵生成完成"
        );

        Ok(MatrixRun {
            run_id,
            as_of,
            generated_at: Utc::now(),
            config,
            potentials: result.potentials,
            summary,
            stats: result.stats,
        })
    }
}
