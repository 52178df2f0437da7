// ==========================================
// 农产品贸易后台 - 贸易潜力 API
// ==========================================
// 职责: 矩阵生成（可按状态事后过滤）、新增供应商报价
// 约定: 统计总是基于完整矩阵；过滤只作用于返回列表
// 约定: 新增报价后需重新生成矩阵才能反映变化
// ==========================================

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::potential::{TradePotential, TradePotentialSummary};
use crate::domain::pricing::SupplierPrice;
use crate::domain::types::{DeliveryMode, PotentialStatus};
use crate::engine::potential_builder::MatrixBuildStats;
use crate::engine::{PotentialSummaryEngine, TradePotentialService, TradeRepositories};
use crate::repository::SupplierPriceRepository;

// ==========================================
// 请求 / 响应
// ==========================================

/// 矩阵生成响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradePotentialResponse {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub status_filter: Option<PotentialStatus>,
    pub potentials: Vec<TradePotential>,
    /// 基于完整矩阵（过滤前）
    pub summary: TradePotentialSummary,
    pub stats: MatrixBuildStats,
}

/// 新增供应商报价请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSupplierPriceRequest {
    pub supplier_id: String,
    pub spec_id: String,
    pub hub_id: Option<String>,
    pub price_per_unit: f64,
    pub currency: String,
    pub delivery_mode: String,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
}

// ==========================================
// TradePotentialApi - 贸易潜力 API
// ==========================================
pub struct TradePotentialApi {
    service: TradePotentialService<TradeRepositories, ConfigManager>,
    price_repo: Arc<SupplierPriceRepository>,
}

impl TradePotentialApi {
    /// 创建新的 TradePotentialApi 实例
    ///
    /// # 参数
    /// - repositories: 参考数据仓储集合
    /// - config: 配置管理器
    pub fn new(repositories: TradeRepositories, config: Arc<ConfigManager>) -> Self {
        let price_repo = repositories.price_repo.clone();
        Self {
            service: TradePotentialService::new(Arc::new(repositories), config),
            price_repo,
        }
    }

    /// 打开数据库文件（不存在则建表）并构建 API
    pub fn open(db_path: &str) -> ApiResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseError(format!("打开数据库失败: {}", e)))?;
        crate::db::ensure_schema(&conn)
            .map_err(|e| ApiError::DatabaseError(format!("初始化表结构失败: {}", e)))?;

        let conn = Arc::new(Mutex::new(conn));
        let config = ConfigManager::from_connection(conn.clone())
            .map_err(|e| ApiError::InternalError(e.to_string()))?;

        Ok(Self::new(
            TradeRepositories::from_connection(conn),
            Arc::new(config),
        ))
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 生成贸易潜力矩阵
    ///
    /// # 参数
    /// - status_filter: 可选状态过滤（complete / missing_price / missing_transport / missing_both / all）
    ///
    /// # 返回
    /// - Err(ApiError::DataAccessError): 任一参考数据读取失败（不返回部分结果）
    pub async fn generate_trade_potential(
        &self,
        status_filter: Option<&str>,
    ) -> ApiResult<TradePotentialResponse> {
        let status = parse_status_filter(status_filter)?;

        let run = self.service.generate(Utc::now()).await.map_err(|e| {
            warn!(error = %e, "贸易潜力矩阵生成失败");
            ApiError::from(e)
        })?;

        let potentials = PotentialSummaryEngine::filter_by_status(run.potentials, status);

        Ok(TradePotentialResponse {
            run_id: run.run_id,
            generated_at: run.generated_at,
            status_filter: status,
            potentials,
            summary: run.summary,
            stats: run.stats,
        })
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 新增供应商报价
    ///
    /// # 校验
    /// - supplier_id / spec_id 非空
    /// - price_per_unit > 0
    /// - currency 为 3 位字母（统一大写）
    /// - delivery_mode 为 Ex Works 或 DELIVERY
    /// - valid_until 不早于 valid_from
    pub fn add_supplier_price(&self, request: AddSupplierPriceRequest) -> ApiResult<SupplierPrice> {
        let price = validate_price_request(&request)?;

        self.price_repo
            .insert(&price, request.created_by.as_deref())?;

        info!(
            price_id = %price.id,
            supplier_id = %price.supplier_id,
            spec_id = %price.spec_id,
            hub_id = ?price.hub_id,
            "新增供应商报价"
        );

        self.price_repo
            .find_by_id(&price.id)?
            .ok_or_else(|| ApiError::NotFound(format!("报价(id={})不存在", price.id)))
    }
}

fn parse_status_filter(raw: Option<&str>) -> ApiResult<Option<PotentialStatus>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s.parse::<PotentialStatus>().map(Some).map_err(ApiError::InvalidInput),
    }
}

fn validate_price_request(request: &AddSupplierPriceRequest) -> ApiResult<SupplierPrice> {
    let supplier_id = request.supplier_id.trim();
    if supplier_id.is_empty() {
        return Err(ApiError::InvalidInput("供应商ID不能为空".to_string()));
    }
    let spec_id = request.spec_id.trim();
    if spec_id.is_empty() {
        return Err(ApiError::InvalidInput("规格ID不能为空".to_string()));
    }

    if !request.price_per_unit.is_finite() || request.price_per_unit <= 0.0 {
        return Err(ApiError::ValidationError(format!(
            "单价必须大于0: {}",
            request.price_per_unit
        )));
    }

    let currency = request.currency.trim().to_ascii_uppercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ApiError::ValidationError(format!(
            "币种必须为3位字母代码: {}",
            request.currency
        )));
    }

    let delivery_mode = match DeliveryMode::from_str(&request.delivery_mode) {
        Some(mode @ (DeliveryMode::ExWorks | DeliveryMode::Delivery)) => mode,
        _ => {
            return Err(ApiError::ValidationError(format!(
                "报价交付方式只能是 Ex Works 或 DELIVERY: {}",
                request.delivery_mode
            )))
        }
    };

    if let (Some(from), Some(until)) = (request.valid_from, request.valid_until) {
        if until < from {
            return Err(ApiError::ValidationError(
                "有效期结束时间早于开始时间".to_string(),
            ));
        }
    }

    Ok(SupplierPrice {
        id: Uuid::new_v4().to_string(),
        supplier_id: supplier_id.to_string(),
        spec_id: spec_id.to_string(),
        hub_id: request
            .hub_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        hub_name: None,
        price_per_unit: request.price_per_unit,
        currency,
        delivery_mode,
        valid_from: request.valid_from,
        valid_until: request.valid_until,
        created_at: None,
    })
}
