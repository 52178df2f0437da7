// ==========================================
// 农产品贸易后台 - 行解析工具
// ==========================================
// 职责: 把 SQLite TEXT/INTEGER 列归一为领域类型
// 约定: 无法解析的时间视为缺失（尽力降级，不报错）
//       认证到期时间例外，由认证仓储丢弃整行
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// 解析时间戳
///
/// 支持格式:
/// - RFC 3339 ("2026-05-01T08:00:00Z" / "+02:00")
/// - "YYYY-MM-DD HH:MM:SS"（视为 UTC，SQLite datetime('now') 的输出格式）
/// - "YYYY-MM-DD"（当天 00:00 UTC）
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// 解析截止时间（含当天）
///
/// 仅有日期时取当天 23:59:59 UTC，其余格式同 [`parse_timestamp`]
pub fn parse_cutoff(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let s = raw?.trim();
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(date) => date
            .and_hms_opt(23, 59, 59)
            .map(|naive| Utc.from_utc_datetime(&naive)),
        Err(_) => parse_timestamp(Some(s)),
    }
}

/// 解析日期（兼容带时间部分的写法）
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(Some(s)).map(|dt| dt.date_naive()))
}

/// 时间戳转存储格式
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// 非负整数列（负数或缺失按 0）
pub fn non_negative_u32(raw: Option<i64>) -> u32 {
    raw.unwrap_or(0).clamp(0, u32::MAX as i64) as u32
}

/// 空白字符串视为缺失
pub fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap();
        assert_eq!(parse_timestamp(Some("2026-05-01T08:00:00Z")), Some(expected));
        assert_eq!(parse_timestamp(Some("2026-05-01T10:00:00+02:00")), Some(expected));
        assert_eq!(parse_timestamp(Some("2026-05-01 08:00:00")), Some(expected));
        assert_eq!(
            parse_timestamp(Some("2026-05-01")),
            Some(Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp(Some("soon")), None);
        assert_eq!(parse_timestamp(Some("  ")), None);
        assert_eq!(parse_timestamp(None), None);
    }

    #[test]
    fn test_parse_cutoff_covers_whole_day() {
        assert_eq!(
            parse_cutoff(Some("2026-10-16")),
            Some(Utc.with_ymd_and_hms(2026, 10, 16, 23, 59, 59).unwrap())
        );
        assert_eq!(
            parse_cutoff(Some("2026-10-16T08:00:00Z")),
            Some(Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap())
        );
        assert_eq!(parse_cutoff(Some("16/10/2026")), None);
    }

    #[test]
    fn test_parse_date() {
        let d = NaiveDate::from_ymd_opt(2026, 7, 31).unwrap();
        assert_eq!(parse_date(Some("2026-07-31")), Some(d));
        assert_eq!(parse_date(Some("2026-07-31T12:00:00Z")), Some(d));
        assert_eq!(parse_date(Some("31/07/2026")), None);
    }

    #[test]
    fn test_non_negative_u32() {
        assert_eq!(non_negative_u32(Some(-3)), 0);
        assert_eq!(non_negative_u32(None), 0);
        assert_eq!(non_negative_u32(Some(80)), 80);
    }
}
