// ==========================================
// 农产品贸易后台 - 认证数据仓储
// ==========================================
// 读取: 客户认证要求（仅必需项）、供应商认证（仅未过期）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::compliance::{CertificationRequirement, SupplierCertification};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{non_blank, parse_timestamp};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};
use tracing::warn;

pub struct CertificationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CertificationRepository {
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

    /// 查询全部客户的必需认证要求
    pub fn find_required(&self) -> RepositoryResult<Vec<CertificationRequirement>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT customer_id, certification_id, is_required
            FROM customer_certification_requirements
            WHERE is_required = 1
            ORDER BY customer_id, certification_id
            "#,
        )?;

        let requirements = stmt
            .query_map([], |row| {
                Ok(CertificationRequirement {
                    customer_id: row.get(0)?,
                    certification_id: row.get(1)?,
                    is_required: row.get::<_, i64>(2)? != 0,
                })
            })?
            .collect::<SqliteResult<Vec<CertificationRequirement>>>()?;

        Ok(requirements)
    }

    /// 查询 as_of 时刻仍有效的供应商认证
    ///
    /// 有效: expires_at 为空，或 expires_at > as_of
    /// expires_at 有值但无法解析的行丢弃并告警
    pub fn find_valid_supplier_certifications(
        &self,
        as_of: DateTime<Utc>,
    ) -> RepositoryResult<Vec<SupplierCertification>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT supplier_id, certification_id, expires_at
            FROM supplier_certifications
            ORDER BY supplier_id, certification_id
            "#,
        )?;

        let raw_rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    non_blank(row.get(2)?),
                ))
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        // expires_at 非空但无法解析时不能当作永久有效
        let certifications = raw_rows
            .into_iter()
            .filter_map(|(supplier_id, certification_id, expires_raw)| {
                let expires_at = match expires_raw {
                    None => None,
                    Some(raw) => match parse_timestamp(Some(&raw)) {
                        Some(ts) => Some(ts),
                        None => {
                            warn!(
                                supplier_id = %supplier_id,
                                certification_id = %certification_id,
                                expires_at = %raw,
                                "认证到期时间无法解析，已跳过"
                            );
                            return None;
                        }
                    },
                };
                Some(SupplierCertification {
                    supplier_id,
                    certification_id,
                    expires_at,
                })
            })
            .filter(|c| c.is_valid_at(as_of))
            .collect();

        Ok(certifications)
    }
}
