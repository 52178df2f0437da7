// ==========================================
// 农产品贸易后台 - 完成度统计引擎
// ==========================================
// 职责: 将潜力列表归约为驾驶舱统计
// 规则: completion_rate = complete / total × 100，保留一位小数；total 为 0 时为 0
// ==========================================

use crate::domain::potential::{TradePotential, TradePotentialSummary};
use crate::domain::types::PotentialStatus;

pub struct PotentialSummaryEngine;

impl PotentialSummaryEngine {
    pub fn summarize(potentials: &[TradePotential]) -> TradePotentialSummary {
        let mut summary = TradePotentialSummary {
            total: potentials.len(),
            ..TradePotentialSummary::default()
        };

        for p in potentials {
            match p.status {
                PotentialStatus::Complete => summary.complete += 1,
                PotentialStatus::MissingPrice => summary.missing_price += 1,
                PotentialStatus::MissingTransport => summary.missing_transport += 1,
                PotentialStatus::MissingBoth => summary.missing_both += 1,
            }
        }

        if summary.total > 0 {
            let rate = summary.complete as f64 / summary.total as f64 * 100.0;
            summary.completion_rate = (rate * 10.0).round() / 10.0;
        }

        summary
    }

    /// 按状态过滤（事后过滤，不重新计算）
    pub fn filter_by_status(
        potentials: Vec<TradePotential>,
        status: Option<PotentialStatus>,
    ) -> Vec<TradePotential> {
        match status {
            Some(status) => potentials.into_iter().filter(|p| p.status == status).collect(),
            None => potentials,
        }
    }
}
