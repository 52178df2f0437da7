// ==========================================
// 农产品贸易后台 - 客户需求数据仓储
// ==========================================
// 读取: 客户需求 + 客户 + 业务员 + 规格 + 产品（联表，单一嵌套对象）
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::party::{Customer, StaffMember};
use crate::domain::product::{CustomerRequirement, Product, ProductPackagingSpec};
use crate::domain::types::SoldBy;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{non_blank, non_negative_u32};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const REQUIREMENT_SELECT: &str = r#"
    SELECT
        c.id, c.name, c.city, c.country,
        st.id, st.name,
        s.id, s.packaging_label, s.size_label, s.pallet_label, s.pallet_dimensions,
        s.boxes_per_pallet, s.pieces_per_box, s.weight_per_box, s.weight_per_pallet, s.weight_unit,
        p.id, p.name, p.category, p.sold_by
    FROM customer_product_requirements r
    JOIN customers c ON c.id = r.customer_id
    LEFT JOIN staff st ON st.id = c.agent_id
    JOIN product_packaging_specs s ON s.id = r.spec_id
    JOIN products p ON p.id = s.product_id
    WHERE c.is_active = 1
"#;

// ==========================================
// RequirementRepository - 客户需求仓储
// ==========================================
pub struct RequirementRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RequirementRepository {
    /// 创建新的客户需求仓储实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部有效客户的产品需求
    ///
    /// # 返回
    /// - Ok(Vec<CustomerRequirement>): 按客户名、产品名排序
    /// - Err: 数据库错误
    pub fn find_all(&self) -> RepositoryResult<Vec<CustomerRequirement>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY c.name, c.id, p.name, s.id", REQUIREMENT_SELECT);
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt
            .query_map([], map_requirement_row)?
            .collect::<SqliteResult<Vec<CustomerRequirement>>>()?;

        Ok(rows)
    }

    /// 查询单个客户的产品需求
    pub fn find_by_customer(&self, customer_id: &str) -> RepositoryResult<Vec<CustomerRequirement>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} AND c.id = ?1 ORDER BY p.name, s.id",
            REQUIREMENT_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt
            .query_map(params![customer_id], map_requirement_row)?
            .collect::<SqliteResult<Vec<CustomerRequirement>>>()?;

        Ok(rows)
    }
}

fn map_requirement_row(row: &Row<'_>) -> SqliteResult<CustomerRequirement> {
    let agent = match (row.get::<_, Option<String>>(4)?, row.get::<_, Option<String>>(5)?) {
        (Some(id), Some(name)) => Some(StaffMember { id, name }),
        _ => None,
    };

    let sold_by = row
        .get::<_, Option<String>>(19)?
        .as_deref()
        .and_then(SoldBy::from_str);

    Ok(CustomerRequirement {
        customer: Customer {
            id: row.get(0)?,
            name: row.get(1)?,
            city: non_blank(row.get(2)?),
            country: non_blank(row.get(3)?),
            agent,
        },
        spec: ProductPackagingSpec {
            id: row.get(6)?,
            packaging_label: row.get(7)?,
            size_label: row.get(8)?,
            pallet_label: row.get(9)?,
            pallet_dimensions: non_blank(row.get(10)?),
            boxes_per_pallet: non_negative_u32(row.get(11)?),
            pieces_per_box: row.get::<_, Option<i64>>(12)?.map(|v| non_negative_u32(Some(v))),
            weight_per_box: row.get(13)?,
            weight_per_pallet: row.get(14)?,
            weight_unit: row.get(15)?,
            product: Product {
                id: row.get(16)?,
                name: row.get(17)?,
                category: non_blank(row.get(18)?),
                sold_by,
            },
        },
    })
}
