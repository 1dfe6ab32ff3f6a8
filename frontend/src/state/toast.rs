//! 提示消息
//!
//! 只负责列表的增删，定时关闭由 `ToastHost` 组件在渲染时安排。

use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastLevel {
    /// daisyUI alert 样式
    pub fn alert_class(&self) -> &'static str {
        match self {
            ToastLevel::Success => "alert alert-success",
            ToastLevel::Error => "alert alert-error",
            ToastLevel::Warning => "alert alert-warning",
            ToastLevel::Info => "alert alert-info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
}

#[derive(Clone, Copy)]
pub struct ToastContext {
    pub toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl Default for ToastContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastContext {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn push(&self, level: ToastLevel, message: impl Into<String>) -> u64 {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        let toast = Toast {
            id,
            level,
            message: message.into(),
        };
        self.toasts.update(|list| list.push(toast));
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Error, message)
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|list| list.retain(|t| t.id != id));
    }
}

pub fn use_toast() -> ToastContext {
    use_context::<ToastContext>().expect("ToastContext should be provided")
}
