// ==========================================
// 农产品贸易后台 - 商机与排除名单数据仓储
// ==========================================
// 读取: 启用商机（+ 负责人）、人工排除名单
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::compliance::ExcludedTradePotential;
use crate::domain::opportunity::Opportunity;
use crate::domain::party::StaffMember;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{non_blank, parse_date};
use rusqlite::{Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

pub struct OpportunityRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OpportunityRepository {
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

    /// 查询全部启用商机（最新的在前）
    pub fn find_active(&self) -> RepositoryResult<Vec<Opportunity>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                o.id, o.customer_id, o.supplier_id, o.spec_id, o.status, o.is_active,
                o.offer_price_per_unit, o.offer_currency,
                st.id, st.name,
                o.valid_till, o.customer_feedback
            FROM opportunities o
            LEFT JOIN staff st ON st.id = o.assigned_to
            WHERE o.is_active = 1
            ORDER BY o.created_at DESC, o.id
            "#,
        )?;

        let opportunities = stmt
            .query_map([], |row| {
                let assigned_agent =
                    match (row.get::<_, Option<String>>(8)?, row.get::<_, Option<String>>(9)?) {
                        (Some(id), Some(name)) => Some(StaffMember { id, name }),
                        _ => None,
                    };
                let valid_till: Option<String> = row.get(10)?;

                Ok(Opportunity {
                    id: row.get(0)?,
                    customer_id: row.get(1)?,
                    supplier_id: row.get(2)?,
                    spec_id: row.get(3)?,
                    status: row.get(4)?,
                    is_active: row.get::<_, i64>(5)? != 0,
                    offer_price_per_unit: row.get(6)?,
                    offer_currency: non_blank(row.get(7)?),
                    assigned_agent,
                    valid_till: parse_date(valid_till.as_deref()),
                    customer_feedback: non_blank(row.get(11)?),
                })
            })?
            .collect::<SqliteResult<Vec<Opportunity>>>()?;

        Ok(opportunities)
    }

    /// 查询排除名单
    pub fn find_exclusions(&self) -> RepositoryResult<Vec<ExcludedTradePotential>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT customer_id, supplier_id, spec_id, reason, notes
            FROM excluded_trade_potentials
            ORDER BY created_at, id
            "#,
        )?;

        let exclusions = stmt
            .query_map([], |row| {
                Ok(ExcludedTradePotential {
                    customer_id: row.get(0)?,
                    supplier_id: row.get(1)?,
                    spec_id: row.get(2)?,
                    reason: row.get(3)?,
                    notes: non_blank(row.get(4)?),
                })
            })?
            .collect::<SqliteResult<Vec<ExcludedTradePotential>>>()?;

        Ok(exclusions)
    }
}
