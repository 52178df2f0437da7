// ==========================================
// 农产品贸易后台 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::matrix_config::DEFAULT_SUPPLIER_DELIVERY_DAYS;
use crate::config::matrix_config_trait::MatrixConfigReader;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式）
    ///
    /// 用于在生成结果中记录当次使用的配置
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取布尔配置；无法识别的取值回落到默认值并告警
    fn get_bool_or_default(&self, key: &str, default: bool) -> ConfigResult<bool> {
        let value = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match parse_flag(&value) {
            Some(flag) => Ok(flag),
            None => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %value,
                    "布尔配置格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ==========================================
// MatrixConfigReader Trait 实现
// ==========================================
#[async_trait]
impl MatrixConfigReader for ConfigManager {
    async fn get_multi_leg_enabled(&self) -> ConfigResult<bool> {
        self.get_bool_or_default(config_keys::MULTI_LEG_ENABLED, true)
    }

    async fn get_include_transship_cost(&self) -> ConfigResult<bool> {
        self.get_bool_or_default(config_keys::INCLUDE_TRANSSHIP_COST, false)
    }

    async fn get_supplier_delivery_days(&self) -> ConfigResult<u32> {
        let default = DEFAULT_SUPPLIER_DELIVERY_DAYS.to_string();
        let value = self.get_config_or_default(config_keys::SUPPLIER_DELIVERY_DAYS, &default)?;
        Ok(value
            .trim()
            .parse::<u32>()
            .unwrap_or(DEFAULT_SUPPLIER_DELIVERY_DAYS))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 运输搜索
    pub const MULTI_LEG_ENABLED: &str = "matrix.multi_leg_enabled";
    pub const INCLUDE_TRANSSHIP_COST: &str = "matrix.include_transship_cost";

    // 占位方案
    pub const SUPPLIER_DELIVERY_DAYS: &str = "matrix.supplier_delivery_days";
}
