// ==========================================
// 农产品贸易后台 - 运输网络数据仓储
// ==========================================
// 读取: 枢纽（含中转属性）、启用线路（承运商启用）+ 运价档
// 归一: 运价档挂到所属线路上，线路始终携带 Vec<PriceBand>
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::logistics::{Hub, PriceBand, TransportRoute};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{non_blank, non_negative_u32};
use rusqlite::{Connection, Result as SqliteResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct TransportRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TransportRepository {
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

    /// 查询全部启用枢纽
    pub fn find_hubs(&self) -> RepositoryResult<Vec<Hub>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                id, name, code, city, country,
                can_transship, transship_cost_per_pallet, transship_handling_time_hours
            FROM hubs
            WHERE is_active = 1
            ORDER BY name, id
            "#,
        )?;

        let hubs = stmt
            .query_map([], |row| {
                Ok(Hub {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    code: non_blank(row.get(2)?),
                    city: non_blank(row.get(3)?),
                    country: non_blank(row.get(4)?),
                    can_transship: row.get::<_, i64>(5)? != 0,
                    transship_cost_per_pallet: row.get(6)?,
                    transship_handling_time_hours: row.get(7)?,
                })
            })?
            .collect::<SqliteResult<Vec<Hub>>>()?;

        Ok(hubs)
    }

    /// 查询全部启用线路（承运商同样需启用），并挂载运价档
    pub fn find_active_routes(&self) -> RepositoryResult<Vec<TransportRoute>> {
        let conn = self.get_conn()?;

        // 1. 线路
        let mut route_stmt = conn.prepare(
            r#"
            SELECT
                r.id, r.transporter_id, t.name,
                r.origin_hub_id, r.destination_hub_id,
                r.transport_duration_days, r.customs_cost_per_shipment, r.is_active
            FROM transport_routes r
            JOIN transporters t ON t.id = r.transporter_id
            WHERE r.is_active = 1 AND t.is_active = 1
            ORDER BY r.id
            "#,
        )?;

        let mut routes = route_stmt
            .query_map([], |row| {
                Ok(TransportRoute {
                    id: row.get(0)?,
                    transporter_id: row.get(1)?,
                    transporter_name: row.get(2)?,
                    origin_hub_id: row.get(3)?,
                    destination_hub_id: row.get(4)?,
                    transport_duration_days: non_negative_u32(row.get(5)?),
                    customs_cost_per_shipment: row.get::<_, Option<f64>>(6)?.unwrap_or(0.0),
                    is_active: row.get::<_, i64>(7)? != 0,
                    price_bands: Vec::new(),
                })
            })?
            .collect::<SqliteResult<Vec<TransportRoute>>>()?;

        // 2. 运价档
        let mut band_stmt = conn.prepare(
            r#"
            SELECT b.route_id, b.id, b.pallet_dimensions, b.min_pallets, b.max_pallets, b.price_per_pallet
            FROM transport_route_price_bands b
            JOIN transport_routes r ON r.id = b.route_id
            WHERE r.is_active = 1
            ORDER BY b.route_id, b.min_pallets, b.id
            "#,
        )?;

        let bands = band_stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    PriceBand {
                        id: row.get(1)?,
                        pallet_dimensions: non_blank(row.get(2)?),
                        min_pallets: non_negative_u32(row.get(3)?),
                        max_pallets: row.get::<_, Option<i64>>(4)?.map(|v| non_negative_u32(Some(v))),
                        price_per_pallet: row.get(5)?,
                    },
                ))
            })?
            .collect::<SqliteResult<Vec<(String, PriceBand)>>>()?;

        let mut bands_by_route: HashMap<String, Vec<PriceBand>> = HashMap::new();
        for (route_id, band) in bands {
            bands_by_route.entry(route_id).or_default().push(band);
        }

        // 3. 挂载
        for route in &mut routes {
            if let Some(route_bands) = bands_by_route.remove(&route.id) {
                route.price_bands = route_bands;
            }
        }

        Ok(routes)
    }
}
