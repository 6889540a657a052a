//! 注册局公共工具

/// 日期时间序列化/反序列化工具
///
/// 提供自定义 Serde 序列化/反序列化支持：
/// - 序列化: `DateTime<Utc>` -> RFC3339 字符串
/// - 反序列化: RFC3339 字符串 或 Unix 时间戳（秒/毫秒自动识别）
///
/// 旧工具链产生的数据因此可以继续加载。
pub mod datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// 序列化 `DateTime<Utc>` 为 RFC3339 字符串
    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.to_rfc3339())
    }

    /// 反序列化：支持 RFC3339 字符串或 Unix 时间戳
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        match Raw::deserialize(deserializer)? {
            Raw::String(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp: {e}"))),
            Raw::Number(ts) => {
                parse_unix_timestamp(ts).ok_or_else(|| Error::custom("Invalid Unix timestamp"))
            }
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        String(String),
        Number(i64),
    }

    /// `Option<DateTime<Utc>>` 的序列化/反序列化工具
    pub mod option {
        use super::{parse_unix_timestamp, DateTime, Deserialize, Deserializer, Serializer, Utc};

        /// 序列化 `Option<DateTime<Utc>>` 为 RFC3339 字符串或 `null`
        pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match dt {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        /// 反序列化：支持 RFC3339 字符串、Unix 时间戳或 `null`
        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            use serde::de::Error;

            match Option::<super::Raw>::deserialize(deserializer)? {
                Some(super::Raw::String(s)) => DateTime::parse_from_rfc3339(&s)
                    .map(|dt| Some(dt.with_timezone(&Utc)))
                    .map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp: {e}"))),
                Some(super::Raw::Number(ts)) => parse_unix_timestamp(ts)
                    .map(Some)
                    .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
                None => Ok(None),
            }
        }
    }

    /// 解析 Unix 时间戳（自动判断秒/毫秒）
    fn parse_unix_timestamp(ts: i64) -> Option<DateTime<Utc>> {
        // 时间戳 > 10^11 时认为是毫秒
        if ts > 100_000_000_000 {
            DateTime::from_timestamp_millis(ts)
        } else {
            DateTime::from_timestamp(ts, 0)
        }
    }

    #[cfg(test)]
    mod tests {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Serialize};

        #[derive(Serialize, Deserialize)]
        struct Stamped {
            #[serde(with = "super")]
            at: DateTime<Utc>,
        }

        #[test]
        fn round_trips_rfc3339() {
            let json = r#"{"at":"2023-01-15T10:30:00+00:00"}"#;
            let parsed: Stamped = serde_json::from_str(json).unwrap();
            let back = serde_json::to_string(&parsed).unwrap();
            assert!(back.contains("2023-01-15T10:30:00"));
        }

        #[test]
        fn accepts_unix_seconds_and_millis() {
            let secs: Stamped = serde_json::from_str(r#"{"at":1673778600}"#).unwrap();
            let millis: Stamped = serde_json::from_str(r#"{"at":1673778600000}"#).unwrap();
            assert_eq!(secs.at, millis.at);
        }
    }
}
