// ==========================================
// 机队维修适航跟踪系统 - 日期解析工具
// ==========================================
// 红线: 日期格式错误不得中断计算，一律视为"无基线"
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// 宽松解析日期字符串
///
/// 支持:
/// - `YYYY-MM-DD`
/// - `YYYY/MM/DD`
/// - `YYYYMMDD`
/// - RFC 3339 / ISO 8601 日期时间（取日期部分）
///
/// 空字符串或无法解析时返回 None
pub fn parse_date_lenient(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }

    None
}

/// 解析可选日期字段，格式错误时记录告警
pub fn parse_optional_date(raw: Option<&str>, field: &str, item_id: &str) -> Option<NaiveDate> {
    let value = raw?;
    if value.trim().is_empty() {
        return None;
    }
    let parsed = parse_date_lenient(value);
    if parsed.is_none() {
        tracing::warn!(
            item_id = %item_id,
            field = field,
            raw_value = %value,
            "日期格式无法识别，按无基线处理"
        );
    }
    parsed
}
