//! 实时通知
//!
//! - `Notification`: 服务端推送的任意 JSON 对象，附加本地 id 与已读标记
//! - `ConnectionState` / `ReconnectPolicy`: 连接状态机与重连策略

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// 默认重连间隔（毫秒）
pub const DEFAULT_RECONNECT_DELAY_MS: u32 = 3_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub read: bool,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Notification {
    /// 解析一帧文本消息
    ///
    /// 消息体必须是 JSON 对象；其中的 `id` / `read` 会被本地值覆盖。
    pub fn from_frame(text: &str) -> Result<Self, serde_json::Error> {
        let mut payload: Map<String, Value> = serde_json::from_str(text)?;
        payload.remove("id");
        payload.remove("read");
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            read: false,
            payload,
        })
    }

    fn text_field(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .find_map(|k| self.payload.get(*k).and_then(Value::as_str))
    }

    pub fn title(&self) -> Option<&str> {
        self.text_field(&["title", "type", "event"])
    }

    pub fn message(&self) -> Option<&str> {
        self.text_field(&["message", "body", "description"])
    }
}

pub fn unread_count(items: &[Notification]) -> usize {
    items.iter().filter(|n| !n.read).count()
}

// =========================================================
// 连接状态机
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "Desconectado",
            ConnectionState::Connecting => "Conectando",
            ConnectionState::Connected => "Conectado",
        }
    }
}

/// 重连策略
///
/// 默认：固定 3 秒间隔、不限次数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub delay_ms: u32,
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_RECONNECT_DELAY_MS,
            max_attempts: None,
        }
    }
}

impl ReconnectPolicy {
    /// 第 `attempt` 次重连（从 1 开始）前的等待时间；返回 None 表示放弃
    pub fn delay_for(&self, attempt: u32) -> Option<u32> {
        match self.max_attempts {
            Some(max) if attempt > max => None,
            _ => Some(self.delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_gets_fresh_id_and_unread() {
        let n = Notification::from_frame(r#"{"id": 5, "read": true, "title": "Hola"}"#).unwrap();
        assert!(!n.read);
        assert_ne!(n.id, "5");
        assert_eq!(n.title(), Some("Hola"));
        assert!(!n.payload.contains_key("id"));
    }

    #[test]
    fn test_distinct_ids() {
        let a = Notification::from_frame("{}").unwrap();
        let b = Notification::from_frame("{}").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_malformed_frames_are_errors() {
        assert!(Notification::from_frame("not json").is_err());
        assert!(Notification::from_frame("[1, 2]").is_err());
    }

    #[test]
    fn test_message_fallback_keys() {
        let n = Notification::from_frame(r#"{"body": "Importación lista"}"#).unwrap();
        assert_eq!(n.message(), Some("Importación lista"));
        assert_eq!(n.title(), None);
    }

    #[test]
    fn test_unread_count() {
        let mut items = vec![
            Notification::from_frame("{}").unwrap(),
            Notification::from_frame("{}").unwrap(),
        ];
        items[0].read = true;
        assert_eq!(unread_count(&items), 1);
    }

    #[test]
    fn test_default_policy_retries_forever_at_fixed_delay() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay_for(1), Some(3_000));
        assert_eq!(policy.delay_for(10_000), Some(3_000));
    }

    #[test]
    fn test_capped_policy_gives_up() {
        let policy = ReconnectPolicy {
            delay_ms: 500,
            max_attempts: Some(2),
        };
        assert_eq!(policy.delay_for(2), Some(500));
        assert_eq!(policy.delay_for(3), None);
    }
}
