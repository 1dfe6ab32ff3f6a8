//! 宽松的反序列化辅助函数
//!
//! 服务端的用户数据里可选字段常以 `null` 下发，主键也可能是数字。

use serde::{Deserialize, Deserializer};

/// `null` 视为默认值
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Int(i64),
    Uint(u64),
    Float(f64),
}

/// 字符串或数字统一转成字符串，`null` 视为空字符串
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<StringOrNumber>::deserialize(deserializer)? {
            Some(StringOrNumber::Text(s)) => s,
            Some(StringOrNumber::Int(n)) => n.to_string(),
            Some(StringOrNumber::Uint(n)) => n.to_string(),
            Some(StringOrNumber::Float(n)) => n.to_string(),
            None => String::new(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "string_or_number")]
        id: String,
        #[serde(deserialize_with = "null_as_default")]
        label: String,
        #[serde(deserialize_with = "null_as_default")]
        flag: bool,
    }

    #[test]
    fn test_numeric_id_becomes_text() {
        let s: Sample = serde_json::from_value(json!({ "id": 42 })).unwrap();
        assert_eq!(s.id, "42");
        let s: Sample = serde_json::from_value(json!({ "id": "a1" })).unwrap();
        assert_eq!(s.id, "a1");
    }

    #[test]
    fn test_nulls_fall_back_to_default() {
        let s: Sample =
            serde_json::from_value(json!({ "id": null, "label": null, "flag": null })).unwrap();
        assert_eq!(s.id, "");
        assert_eq!(s.label, "");
        assert!(!s.flag);
    }
}
