//! 实时通知
//!
//! `NotificationContext` 保存收到的消息与连接状态；
//! `connect_notifications` 把一条自动重连的 WebSocket 绑定到当前组件的生命周期。

use leptos::prelude::*;
use maestro_shared::notification::unread_count;
use maestro_shared::{ConnectionState, Notification, ReconnectPolicy};

use crate::web::ReconnectingSocket;

#[derive(Clone, Copy)]
pub struct NotificationContext {
    pub items: RwSignal<Vec<Notification>>,
    pub state: RwSignal<ConnectionState>,
}

impl Default for NotificationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationContext {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            state: RwSignal::new(ConnectionState::Disconnected),
        }
    }

    /// 解析一帧消息并追加；格式错误的帧记录后丢弃
    pub fn push_frame(&self, text: &str) -> bool {
        match Notification::from_frame(text) {
            Ok(notification) => {
                let _ = self.items.try_update(|items| items.push(notification));
                true
            }
            Err(e) => {
                log::warn!("[Notifications] Dropping malformed frame: {}", e);
                false
            }
        }
    }

    pub fn mark_read(&self, id: &str) {
        self.items.update(|items| {
            if let Some(item) = items.iter_mut().find(|n| n.id == id) {
                item.read = true;
            }
        });
    }

    pub fn mark_all_read(&self) {
        self.items.update(|items| items.iter_mut().for_each(|n| n.read = true));
    }

    pub fn unread(&self) -> usize {
        self.items.with(|items| unread_count(items))
    }
}

pub fn use_notifications() -> NotificationContext {
    use_context::<NotificationContext>().expect("NotificationContext should be provided")
}

/// 在当前组件挂载期间保持通知连接，卸载时关闭并取消重连
pub fn connect_notifications(ctx: NotificationContext, url: String, policy: ReconnectPolicy) {
    let socket = ReconnectingSocket::open(
        url,
        policy,
        move |text| {
            ctx.push_frame(&text);
        },
        move |state| {
            let _ = ctx.state.try_set(state);
        },
    );

    let handle = StoredValue::new_local(Some(socket));
    on_cleanup(move || {
        let _ = handle.try_update_value(|socket| {
            if let Some(socket) = socket.take() {
                socket.stop();
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_append_unread() {
        let owner = Owner::new();
        owner.set();
        let ctx = NotificationContext::new();

        assert!(ctx.push_frame(r#"{"title": "Importación", "message": "Listo"}"#));
        assert!(ctx.push_frame(r#"{"type": "alert"}"#));
        assert_eq!(ctx.unread(), 2);

        let items = ctx.items.get_untracked();
        assert_ne!(items[0].id, items[1].id);
        assert_eq!(items[0].title(), Some("Importación"));
    }

    #[test]
    fn test_malformed_frame_is_dropped() {
        let owner = Owner::new();
        owner.set();
        let ctx = NotificationContext::new();

        assert!(!ctx.push_frame("not json"));
        assert!(!ctx.push_frame("[1, 2, 3]"));
        assert!(ctx.items.get_untracked().is_empty());
    }

    #[test]
    fn test_mark_read() {
        let owner = Owner::new();
        owner.set();
        let ctx = NotificationContext::new();
        ctx.push_frame(r#"{"title": "a"}"#);
        ctx.push_frame(r#"{"title": "b"}"#);

        let first = ctx.items.get_untracked()[0].id.clone();
        ctx.mark_read(&first);
        assert_eq!(ctx.unread(), 1);

        ctx.mark_all_read();
        assert_eq!(ctx.unread(), 0);
    }
}
