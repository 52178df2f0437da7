// ==========================================
// 农产品贸易后台 - 物流能力数据仓储
// ==========================================
// 读取: 客户 / 供应商物流能力 + 枢纽名称
// 归一: 两张表映射为同一个 LogisticsCapability 结构
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::logistics::LogisticsCapability;
use crate::domain::types::DeliveryMode;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::non_blank;
use rusqlite::{Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// 能力归属方（决定读取哪张表，表名不来自外部输入）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityOwner {
    Customer,
    Supplier,
}

impl CapabilityOwner {
    fn table_and_owner_column(&self) -> (&'static str, &'static str) {
        match self {
            CapabilityOwner::Customer => ("customer_logistics_capabilities", "customer_id"),
            CapabilityOwner::Supplier => ("supplier_logistics_capabilities", "supplier_id"),
        }
    }
}

pub struct LogisticsCapabilityRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LogisticsCapabilityRepository {
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

    /// 查询全部客户物流能力
    pub fn find_customer_capabilities(&self) -> RepositoryResult<Vec<LogisticsCapability>> {
        self.find_all(CapabilityOwner::Customer)
    }

    /// 查询全部供应商物流能力
    pub fn find_supplier_capabilities(&self) -> RepositoryResult<Vec<LogisticsCapability>> {
        self.find_all(CapabilityOwner::Supplier)
    }

    /// 查询指定归属方的全部物流能力
    ///
    /// 无法识别的交付方式会被跳过并记录告警
    pub fn find_all(&self, owner: CapabilityOwner) -> RepositoryResult<Vec<LogisticsCapability>> {
        let (table, owner_column) = owner.table_and_owner_column();
        let conn = self.get_conn()?;

        let sql = format!(
            r#"
            SELECT
                lc.id, lc.{owner_column}, lc.mode,
                lc.origin_hub_id, oh.name,
                lc.destination_hub_id, dh.name
            FROM {table} lc
            LEFT JOIN hubs oh ON oh.id = lc.origin_hub_id
            LEFT JOIN hubs dh ON dh.id = lc.destination_hub_id
            ORDER BY lc.{owner_column}, lc.id
            "#,
            owner_column = owner_column,
            table = table,
        );
        let mut stmt = conn.prepare(&sql)?;

        let raw_rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    non_blank(row.get(3)?),
                    non_blank(row.get(4)?),
                    non_blank(row.get(5)?),
                    non_blank(row.get(6)?),
                ))
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        let capabilities = raw_rows
            .into_iter()
            .filter_map(
                |(id, owner_id, mode_raw, origin_id, origin_name, dest_id, dest_name)| {
                    match DeliveryMode::from_str(&mode_raw) {
                        Some(mode) => Some(LogisticsCapability {
                            id,
                            owner_id,
                            mode,
                            origin_hub_id: origin_id,
                            origin_hub_name: origin_name,
                            destination_hub_id: dest_id,
                            destination_hub_name: dest_name,
                        }),
                        None => {
                            warn!(
                                table,
                                capability_id = %id,
                                mode = %mode_raw,
                                "未知物流模式，已跳过"
                            );
                            None
                        }
                    }
                },
            )
            .collect();

        Ok(capabilities)
    }
}
