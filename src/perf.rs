// ==========================================
// 农产品贸易后台 - 性能埋点
// ==========================================
// 矩阵生成的诊断信息走结构化日志（target = "perf" / "slow_sql"），
// 不写入任何返回值，也不属于 API 契约
// 快照读取分散在多个 spawn_blocking 线程，SQL 计数因此是进程级的
// ==========================================

use rusqlite::Connection;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

static SQL_PROFILE_ENABLED: AtomicBool = AtomicBool::new(false);
static SLOW_SQL_MS: AtomicU64 = AtomicU64::new(0);
static SQL_STATEMENTS: AtomicU64 = AtomicU64::new(0);
static SLOW_SQL_STATEMENTS: AtomicU64 = AtomicU64::new(0);

const SQL_LOG_MAX_CHARS: usize = 300;

// ==========================================
// SqlProfileSettings - 埋点开关
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlProfileSettings {
    pub enabled: bool,
    pub slow_ms: u64,
}

impl SqlProfileSettings {
    /// 读取环境变量
    ///
    /// - `TRADE_POTENTIAL_PERF_SQL=1|0`: 缺省时 Debug 构建开启、Release 关闭
    /// - `TRADE_POTENTIAL_SLOW_SQL_MS`: 慢查询阈值，缺省 Debug 50ms / Release 200ms
    pub fn from_env() -> Self {
        Self::parse(
            std::env::var("TRADE_POTENTIAL_PERF_SQL").ok().as_deref(),
            std::env::var("TRADE_POTENTIAL_SLOW_SQL_MS").ok().as_deref(),
        )
    }

    fn parse(enabled: Option<&str>, slow_ms: Option<&str>) -> Self {
        let enabled = enabled
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(cfg!(debug_assertions));
        let slow_ms = slow_ms
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 });
        Self { enabled, slow_ms }
    }
}

/// 为连接安装 SQLite profile 回调（语句计数 + 慢查询告警）
pub fn install_sqlite_tracing(conn: &mut Connection) {
    let settings = SqlProfileSettings::from_env();
    SQL_PROFILE_ENABLED.store(settings.enabled, Ordering::Relaxed);
    SLOW_SQL_MS.store(settings.slow_ms, Ordering::Relaxed);

    if settings.enabled {
        conn.profile(Some(on_statement_profiled));
    } else {
        conn.profile(None);
    }
}

fn on_statement_profiled(sql: &str, duration: Duration) {
    if !SQL_PROFILE_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    SQL_STATEMENTS.fetch_add(1, Ordering::Relaxed);

    let ms = duration.as_millis() as u64;
    let threshold = SLOW_SQL_MS.load(Ordering::Relaxed);
    if threshold > 0 && ms >= threshold {
        SLOW_SQL_STATEMENTS.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
            target: "slow_sql",
            duration_ms = ms,
            sql = %one_line(sql, SQL_LOG_MAX_CHARS),
            "慢查询"
        );
    }
}

/// 压成单行并按字符截断
fn one_line(sql: &str, max_chars: usize) -> String {
    let flat = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &flat[..idx]),
        None => flat,
    }
}

// ==========================================
// PerfGuard - 阶段耗时
// ==========================================
/// 作用域结束时输出 elapsed_ms 与期间执行的 SQL 语句数
///
/// ```ignore
/// let _perf = produce_trade_potential::perf::PerfGuard::new("load_reference_snapshot");
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    statements_at_start: u64,
    slow_at_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
            statements_at_start: SQL_STATEMENTS.load(Ordering::Relaxed),
            slow_at_start: SLOW_SQL_STATEMENTS.load(Ordering::Relaxed),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let sql_count = SQL_STATEMENTS
            .load(Ordering::Relaxed)
            .saturating_sub(self.statements_at_start);
        let slow_sql_count = SLOW_SQL_STATEMENTS
            .load(Ordering::Relaxed)
            .saturating_sub(self.slow_at_start);

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms = self.elapsed_ms(),
            sql_count,
            slow_sql_count,
            "阶段完成"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_line_respects_char_boundaries() {
        assert_eq!(one_line("SELECT\n  *\tFROM hubs", 300), "SELECT * FROM hubs");
        assert_eq!(one_line("SELECT * FROM hubs", 6), "SELECT…");
        assert_eq!(one_line("枢纽枢纽", 2), "枢纽…");
    }

    #[test]
    fn test_settings_parsing() {
        let s = SqlProfileSettings::parse(Some(" YES "), Some("15"));
        assert_eq!(s, SqlProfileSettings { enabled: true, slow_ms: 15 });

        let s = SqlProfileSettings::parse(Some("0"), Some("abc"));
        assert!(!s.enabled);
        assert_eq!(s.slow_ms, if cfg!(debug_assertions) { 50 } else { 200 });
    }
}
