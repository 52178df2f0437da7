// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库初始化 + 参考数据写入（客户/供应商/规格/枢纽/线路/报价 ...）
// ==========================================

#![allow(dead_code)]

use produce_trade_potential::db::{ensure_schema, open_sqlite_connection};
use rusqlite::{params, Connection};
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

// ==========================================
// Seed - 参考数据写入
// ==========================================
pub struct Seed {
    conn: Connection,
}

impl Seed {
    pub fn open(db_path: &str) -> Self {
        let conn = open_sqlite_connection(db_path).expect("打开测试数据库失败");
        Self { conn }
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // ===== 主体 =====

    pub fn staff(&self, id: &str, name: &str) -> &Self {
        self.conn
            .execute("INSERT INTO staff (id, name) VALUES (?1, ?2)", params![id, name])
            .expect("写入 staff 失败");
        self
    }

    pub fn customer(&self, id: &str, name: &str, city: Option<&str>, country: Option<&str>) -> &Self {
        self.conn
            .execute(
                "INSERT INTO customers (id, name, city, country) VALUES (?1, ?2, ?3, ?4)",
                params![id, name, city, country],
            )
            .expect("写入 customers 失败");
        self
    }

    pub fn supplier(&self, id: &str, name: &str, city: Option<&str>, country: Option<&str>) -> &Self {
        self.conn
            .execute(
                "INSERT INTO suppliers (id, name, city, country) VALUES (?1, ?2, ?3, ?4)",
                params![id, name, city, country],
            )
            .expect("写入 suppliers 失败");
        self
    }

    pub fn deactivate_supplier(&self, id: &str) -> &Self {
        self.conn
            .execute("UPDATE suppliers SET is_active = 0 WHERE id = ?1", params![id])
            .expect("停用供应商失败");
        self
    }

    // ===== 产品与规格 =====

    /// 写入产品 + 一个包装规格（按箱计，每托 80 箱）
    pub fn spec(&self, spec_id: &str, product_id: &str, product_name: &str) -> &Self {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO products (id, name, category, sold_by) VALUES (?1, ?2, 'Vegetables', 'box')",
                params![product_id, product_name],
            )
            .expect("写入 products 失败");
        self.conn
            .execute(
                r#"
                INSERT INTO product_packaging_specs (
                    id, product_id, packaging_label, size_label, pallet_label,
                    pallet_dimensions, boxes_per_pallet, pieces_per_box, weight_per_box, weight_per_pallet
                ) VALUES (?1, ?2, 'Box', 'Large', 'EUR', '120x80', 80, NULL, 5.0, 400.0)
                "#,
                params![spec_id, product_id],
            )
            .expect("写入 product_packaging_specs 失败");
        self
    }

    pub fn requires(&self, customer_id: &str, spec_id: &str) -> &Self {
        self.conn
            .execute(
                "INSERT INTO customer_product_requirements (customer_id, spec_id) VALUES (?1, ?2)",
                params![customer_id, spec_id],
            )
            .expect("写入 customer_product_requirements 失败");
        self
    }

    pub fn supplies(&self, supplier_id: &str, spec_id: &str) -> &Self {
        self.conn
            .execute(
                "INSERT INTO supplier_product_capabilities (supplier_id, spec_id) VALUES (?1, ?2)",
                params![supplier_id, spec_id],
            )
            .expect("写入 supplier_product_capabilities 失败");
        self
    }

    // ===== 物流 =====

    pub fn hub(&self, id: &str, name: &str, can_transship: bool) -> &Self {
        self.conn
            .execute(
                "INSERT INTO hubs (id, name, code, can_transship) VALUES (?1, ?2, ?1, ?3)",
                params![id, name, can_transship as i64],
            )
            .expect("写入 hubs 失败");
        self
    }

    pub fn transporter(&self, id: &str, name: &str) -> &Self {
        self.conn
            .execute(
                "INSERT INTO transporters (id, name) VALUES (?1, ?2)",
                params![id, name],
            )
            .expect("写入 transporters 失败");
        self
    }

    /// 写入线路 + 一个运价档（1 托起）
    pub fn route(
        &self,
        id: &str,
        transporter_id: &str,
        origin: &str,
        destination: &str,
        days: u32,
        price_per_pallet: f64,
    ) -> &Self {
        self.conn
            .execute(
                r#"
                INSERT INTO transport_routes (
                    id, transporter_id, origin_hub_id, destination_hub_id,
                    transport_duration_days, customs_cost_per_shipment
                ) VALUES (?1, ?2, ?3, ?4, ?5, 0)
                "#,
                params![id, transporter_id, origin, destination, days],
            )
            .expect("写入 transport_routes 失败");
        self.band(&format!("{}-B1", id), id, 1, price_per_pallet)
    }

    pub fn band(&self, id: &str, route_id: &str, min_pallets: u32, price_per_pallet: f64) -> &Self {
        self.conn
            .execute(
                r#"
                INSERT INTO transport_route_price_bands (
                    id, route_id, pallet_dimensions, min_pallets, price_per_pallet
                ) VALUES (?1, ?2, '120x80', ?3, ?4)
                "#,
                params![id, route_id, min_pallets, price_per_pallet],
            )
            .expect("写入 transport_route_price_bands 失败");
        self
    }

    pub fn customer_logistics(
        &self,
        id: &str,
        customer_id: &str,
        mode: &str,
        origin: Option<&str>,
        destination: Option<&str>,
    ) -> &Self {
        self.conn
            .execute(
                r#"
                INSERT INTO customer_logistics_capabilities (
                    id, customer_id, mode, origin_hub_id, destination_hub_id
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![id, customer_id, mode, origin, destination],
            )
            .expect("写入 customer_logistics_capabilities 失败");
        self
    }

    pub fn supplier_logistics(
        &self,
        id: &str,
        supplier_id: &str,
        mode: &str,
        origin: Option<&str>,
        destination: Option<&str>,
    ) -> &Self {
        self.conn
            .execute(
                r#"
                INSERT INTO supplier_logistics_capabilities (
                    id, supplier_id, mode, origin_hub_id, destination_hub_id
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![id, supplier_id, mode, origin, destination],
            )
            .expect("写入 supplier_logistics_capabilities 失败");
        self
    }

    // ===== 价格 =====

    pub fn price(
        &self,
        id: &str,
        supplier_id: &str,
        spec_id: &str,
        hub_id: Option<&str>,
        price_per_unit: f64,
        delivery_mode: &str,
    ) -> &Self {
        self.conn
            .execute(
                r#"
                INSERT INTO supplier_prices (
                    id, supplier_id, spec_id, hub_id, price_per_unit, currency, delivery_mode
                ) VALUES (?1, ?2, ?3, ?4, ?5, 'EUR', ?6)
                "#,
                params![id, supplier_id, spec_id, hub_id, price_per_unit, delivery_mode],
            )
            .expect("写入 supplier_prices 失败");
        self
    }

    pub fn price_valid_until(&self, price_id: &str, valid_until: &str) -> &Self {
        self.conn
            .execute(
                "UPDATE supplier_prices SET valid_until = ?2 WHERE id = ?1",
                params![price_id, valid_until],
            )
            .expect("更新报价有效期失败");
        self
    }

    // ===== 认证 =====

    pub fn requires_certification(&self, customer_id: &str, certification_id: &str, required: bool) -> &Self {
        self.conn
            .execute(
                r#"
                INSERT INTO customer_certification_requirements (customer_id, certification_id, is_required)
                VALUES (?1, ?2, ?3)
                "#,
                params![customer_id, certification_id, required as i64],
            )
            .expect("写入 customer_certification_requirements 失败");
        self
    }

    pub fn certification(&self, supplier_id: &str, certification_id: &str, expires_at: Option<&str>) -> &Self {
        self.conn
            .execute(
                r#"
                INSERT INTO supplier_certifications (supplier_id, certification_id, expires_at)
                VALUES (?1, ?2, ?3)
                "#,
                params![supplier_id, certification_id, expires_at],
            )
            .expect("写入 supplier_certifications 失败");
        self
    }

    // ===== 商机与排除 =====

    pub fn opportunity(
        &self,
        id: &str,
        customer_id: &str,
        supplier_id: &str,
        spec_id: &str,
        assigned_to: Option<&str>,
    ) -> &Self {
        self.conn
            .execute(
                r#"
                INSERT INTO opportunities (
                    id, customer_id, supplier_id, spec_id, status,
                    offer_price_per_unit, offer_currency, assigned_to, valid_till
                ) VALUES (?1, ?2, ?3, ?4, 'negotiating', 1.9, 'EUR', ?5, '2099-12-31')
                "#,
                params![id, customer_id, supplier_id, spec_id, assigned_to],
            )
            .expect("写入 opportunities 失败");
        self
    }

    pub fn exclusion(&self, id: &str, customer_id: &str, supplier_id: &str, spec_id: &str) -> &Self {
        self.conn
            .execute(
                r#"
                INSERT INTO excluded_trade_potentials (id, customer_id, supplier_id, spec_id, reason)
                VALUES (?1, ?2, ?3, ?4, 'quality complaint')
                "#,
                params![id, customer_id, supplier_id, spec_id],
            )
            .expect("写入 excluded_trade_potentials 失败");
        self
    }
}

/// 基础数据: 一个规格 SP1 (Tomatoes) + 枢纽 H1/H2(可中转)/H3 + 承运商 T1/T2
pub fn seed_base(seed: &Seed) {
    seed.spec("SP1", "PR1", "Tomatoes")
        .hub("H1", "Valencia Hub", false)
        .hub("H2", "Perpignan Cross-Dock", true)
        .hub("H3", "Milan Market", false)
        .transporter("T1", "FastFreight")
        .transporter("T2", "RoadLink");
}
