//! 编译期配置
//!
//! 通过 `option_env!` 读取，`build.rs` 会把 `.env` 中的 `MAESTRO_*` 变量转发进来。
//! 未配置时 API 使用同源地址。

use maestro_shared::WS_NOTIFICATIONS_PATH;

/// 本地开发时后端所在端口
const LOCAL_BACKEND_HOST: &str = "localhost:8080";

/// 提示消息的显示时长（毫秒）
pub const TOAST_LIFETIME_MS: u64 = 3_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// API 根地址，不带结尾斜杠；空字符串表示同源
    pub api_base: String,
    /// 显式指定的 WebSocket 地址
    pub ws_url_override: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_base: option_env!("MAESTRO_API_BASE")
                .unwrap_or_default()
                .trim_end_matches('/')
                .to_string(),
            ws_url_override: option_env!("MAESTRO_WS_URL")
                .filter(|v| !v.is_empty())
                .map(str::to_string),
        }
    }

    /// 通知通道地址：优先使用配置，否则根据当前页面推导
    pub fn notifications_url(&self) -> Option<String> {
        if let Some(url) = &self.ws_url_override {
            return Some(url.clone());
        }
        let location = web_sys::window()?.location();
        let protocol = location.protocol().ok()?;
        let hostname = location.hostname().ok()?;
        let host = location.host().ok()?;
        Some(notifications_url_for(&protocol, &hostname, &host))
    }
}

/// 根据页面协议与主机推导通知地址
///
/// `localhost` 下前端由开发服务器提供，后端固定在 8080 端口。
pub fn notifications_url_for(page_protocol: &str, hostname: &str, host: &str) -> String {
    let scheme = if page_protocol == "https:" { "wss:" } else { "ws:" };
    let host = if hostname == "localhost" {
        LOCAL_BACKEND_HOST
    } else {
        host
    };
    format!("{}//{}{}", scheme, host, WS_NOTIFICATIONS_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localhost_targets_backend_port() {
        assert_eq!(
            notifications_url_for("http:", "localhost", "localhost:5173"),
            "ws://localhost:8080/ws/notifications/"
        );
    }

    #[test]
    fn test_secure_page_uses_wss() {
        assert_eq!(
            notifications_url_for("https:", "admin.example.com", "admin.example.com"),
            "wss://admin.example.com/ws/notifications/"
        );
    }

    #[test]
    fn test_override_wins() {
        let config = AppConfig {
            api_base: String::new(),
            ws_url_override: Some("wss://push.example.com/ws/".into()),
        };
        assert_eq!(
            config.notifications_url().as_deref(),
            Some("wss://push.example.com/ws/")
        );
    }
}
