//! 时间类型模块
//!
//! 统一前端记录时间的格式：ISO 8601 (UTC, 毫秒精度, `Z` 结尾)，
//! 与浏览器 `Date.prototype.toISOString()` 的输出一致。

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// UTC 时间点，序列化为 ISO 8601 字符串
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// 获取当前时间
    #[inline]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// 从 ISO 8601 / RFC 3339 字符串解析
    ///
    /// 返回 None 如果解析失败
    pub fn parse(s: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    /// 获取毫秒时间戳
    #[inline]
    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// 形如 `2024-03-15T19:30:00.000Z`
    pub fn to_iso_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_string_matches_browser_format() {
        let ts = Timestamp::parse("2024-03-15T19:30:00+08:00").unwrap();
        assert_eq!(ts.to_iso_string(), "2024-03-15T11:30:00.000Z");
    }

    #[test]
    fn test_now_round_trips_through_iso() {
        let now = Timestamp::now();
        let parsed = Timestamp::parse(&now.to_iso_string()).unwrap();
        assert_eq!(parsed.as_millis(), now.as_millis());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Timestamp::parse("not a date").is_none());
    }
}
