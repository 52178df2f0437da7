// ==========================================
// 农产品贸易后台 - 供应商报价数据仓储
// ==========================================
// 读取: 当前有效报价（is_active = 1 且在有效期内）
// 写入: 新增报价（潜力矩阵唯一直接触发的写操作）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::pricing::SupplierPrice;
use crate::domain::types::DeliveryMode;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{format_timestamp, non_blank, parse_cutoff, parse_timestamp};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};
use tracing::warn;

const PRICE_SELECT: &str = r#"
    SELECT
        sp.id, sp.supplier_id, sp.spec_id, sp.hub_id, h.name,
        sp.price_per_unit, sp.currency, sp.delivery_mode,
        sp.valid_from, sp.valid_until, sp.created_at
    FROM supplier_prices sp
    JOIN suppliers s ON s.id = sp.supplier_id
    LEFT JOIN hubs h ON h.id = sp.hub_id
"#;

/// 报价原始行（交付方式尚未解析）
struct RawPriceRow {
    price: SupplierPrice,
    delivery_mode_raw: String,
}

pub struct SupplierPriceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SupplierPriceRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询 as_of 时刻有效的全部报价
    ///
    /// # 规则
    /// - is_active = 1 且供应商启用
    /// - valid_from 为空或 <= as_of
    /// - valid_until 为空或 >= as_of（仅日期的截止日当天全天有效）
    ///
    /// 同一 (供应商, 规格) 内按单价升序
    pub fn find_current(&self, as_of: DateTime<Utc>) -> RepositoryResult<Vec<SupplierPrice>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE sp.is_active = 1 AND s.is_active = 1 \
             ORDER BY sp.supplier_id, sp.spec_id, sp.price_per_unit, sp.id",
            PRICE_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;

        let raw_rows = stmt
            .query_map([], map_price_row)?
            .collect::<SqliteResult<Vec<RawPriceRow>>>()?;

        let prices = raw_rows
            .into_iter()
            .filter_map(resolve_delivery_mode)
            .filter(|p| p.valid_from.map_or(true, |from| from <= as_of))
            .filter(|p| p.is_current(as_of))
            .collect();

        Ok(prices)
    }

    /// 按 ID 查询报价（不过滤有效期）
    pub fn find_by_id(&self, price_id: &str) -> RepositoryResult<Option<SupplierPrice>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE sp.id = ?1", PRICE_SELECT);
        let mut stmt = conn.prepare(&sql)?;

        let raw = stmt.query_row(params![price_id], map_price_row).optional()?;
        Ok(raw.and_then(resolve_delivery_mode))
    }

    /// 新增报价
    ///
    /// # 参数
    /// - price: 报价（hub_name / created_at 忽略，由数据库维护）
    /// - created_by: 操作人
    pub fn insert(&self, price: &SupplierPrice, created_by: Option<&str>) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO supplier_prices (
                id, supplier_id, spec_id, hub_id, price_per_unit, currency,
                delivery_mode, valid_from, valid_until, is_active, created_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, ?10)
            "#,
            params![
                price.id,
                price.supplier_id,
                price.spec_id,
                price.hub_id,
                price.price_per_unit,
                price.currency,
                price.delivery_mode.to_db_str(),
                price.valid_from.as_ref().map(format_timestamp),
                price.valid_until.as_ref().map(format_timestamp),
                created_by,
            ],
        )?;

        Ok(())
    }
}

fn map_price_row(row: &Row<'_>) -> SqliteResult<RawPriceRow> {
    let valid_from: Option<String> = row.get(8)?;
    let valid_until: Option<String> = row.get(9)?;
    let created_at: Option<String> = row.get(10)?;

    Ok(RawPriceRow {
        delivery_mode_raw: row.get(7)?,
        price: SupplierPrice {
            id: row.get(0)?,
            supplier_id: row.get(1)?,
            spec_id: row.get(2)?,
            hub_id: non_blank(row.get(3)?),
            hub_name: non_blank(row.get(4)?),
            price_per_unit: row.get(5)?,
            currency: row.get(6)?,
            delivery_mode: DeliveryMode::ExWorks,
            valid_from: parse_timestamp(valid_from.as_deref()),
            valid_until: parse_cutoff(valid_until.as_deref()),
            created_at: parse_timestamp(created_at.as_deref()),
        },
    })
}

fn resolve_delivery_mode(raw: RawPriceRow) -> Option<SupplierPrice> {
    match DeliveryMode::from_str(&raw.delivery_mode_raw) {
        Some(mode) => Some(SupplierPrice {
            delivery_mode: mode,
            ..raw.price
        }),
        None => {
            warn!(
                price_id = %raw.price.id,
                delivery_mode = %raw.delivery_mode_raw,
                "未知报价交付方式，已跳过"
            );
            None
        }
    }
}
