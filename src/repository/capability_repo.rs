// ==========================================
// 农产品贸易后台 - 供应商供货能力数据仓储
// ==========================================
// 读取: 供应商可供规格 + 供应商（仅启用供应商）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::party::Supplier;
use crate::domain::product::SupplierCapability;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::non_blank;
use rusqlite::{Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

pub struct SupplierCapabilityRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SupplierCapabilityRepository {
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

    /// 查询全部启用供应商的供货能力
    ///
    /// 按规格、供应商名排序，保证矩阵输出顺序稳定
    pub fn find_all_active(&self) -> RepositoryResult<Vec<SupplierCapability>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT cap.spec_id, s.id, s.name, s.city, s.country
            FROM supplier_product_capabilities cap
            JOIN suppliers s ON s.id = cap.supplier_id
            WHERE s.is_active = 1
            ORDER BY cap.spec_id, s.name, s.id
            "#,
        )?;

        let capabilities = stmt
            .query_map([], |row| {
                Ok(SupplierCapability {
                    spec_id: row.get(0)?,
                    supplier: Supplier {
                        id: row.get(1)?,
                        name: row.get(2)?,
                        city: non_blank(row.get(3)?),
                        country: non_blank(row.get(4)?),
                    },
                })
            })?
            .collect::<SqliteResult<Vec<SupplierCapability>>>()?;

        Ok(capabilities)
    }
}
