use std::fmt;

use wasm_bindgen::JsValue;

// =========================================================
// 错误类型枚举
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// 浏览器 API 不可用或调用失败（window、storage、DOM 等）
    Browser,
    /// 网络请求失败，未拿到响应
    Network,
    /// 服务端拒绝：非 2xx 状态或信封 `status != "success"`
    Rejected,
    /// JSON 解析或序列化错误
    Serialization,
}

impl ClientErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientErrorKind::Browser => "BROWSER_API_ERROR",
            ClientErrorKind::Network => "NETWORK_ERROR",
            ClientErrorKind::Rejected => "REQUEST_REJECTED",
            ClientErrorKind::Serialization => "JSON_PARSE_ERROR",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 错误发生时的操作，如 "auth.check_session"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    pub operation: String,
    pub detail: Option<String>,
}

// =========================================================
// 核心错误类型
// =========================================================

#[derive(Debug, Clone)]
pub struct ClientError {
    pub kind: ClientErrorKind,
    pub message: String,
    /// 服务端信封中的 message，可直接展示给用户
    server_message: Option<String>,
    /// HTTP 状态码（仅当拿到了响应）
    status: Option<u16>,
    spans: Vec<ErrorSpan>,
}

impl ClientError {
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            server_message: None,
            status: None,
            spans: Vec::new(),
        }
    }

    pub fn browser(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Browser, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Network, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Serialization, message)
    }

    /// 服务端拒绝了请求
    pub fn rejected(status: u16, server_message: Option<String>) -> Self {
        let message = match &server_message {
            Some(m) => format!("HTTP {}: {}", status, m),
            None => format!("HTTP {}", status),
        };
        Self {
            kind: ClientErrorKind::Rejected,
            message,
            server_message,
            status: Some(status),
            spans: Vec::new(),
        }
    }

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan {
            operation: operation.into(),
            detail: None,
        });
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan {
            operation: operation.into(),
            detail: Some(detail.into()),
        });
        self
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn server_message(&self) -> Option<&str> {
        self.server_message.as_deref()
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    pub fn is_rejected(&self) -> bool {
        self.kind == ClientErrorKind::Rejected
    }

    /// 给用户看的文字：服务端消息优先，否则使用调用方提供的默认文案
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ClientError {}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::serialization(e.to_string())
    }
}

impl From<JsValue> for ClientError {
    fn from(e: JsValue) -> Self {
        let msg = e.as_string().unwrap_or_else(|| format!("{:?}", e));
        ClientError::browser(msg)
    }
}
