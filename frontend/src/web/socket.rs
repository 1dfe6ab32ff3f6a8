//! WebSocket 封装模块
//!
//! 单连接、断线按 `ReconnectPolicy` 定时重连。`stop()` 之后不再重连。

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use maestro_shared::{ConnectionState, ReconnectPolicy};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use super::timer::Timeout;

/// 当前连接上注册的回调，随连接一起替换
struct Handlers {
    _open: Closure<dyn FnMut(Event)>,
    _message: Closure<dyn FnMut(MessageEvent)>,
    _close: Closure<dyn FnMut(CloseEvent)>,
    _error: Closure<dyn FnMut(Event)>,
}

struct SocketInner {
    url: String,
    policy: ReconnectPolicy,
    ws: RefCell<Option<WebSocket>>,
    handlers: RefCell<Option<Handlers>>,
    retry: RefCell<Option<Timeout>>,
    attempts: Cell<u32>,
    stopped: Cell<bool>,
    on_text: Box<dyn Fn(String)>,
    on_state: Box<dyn Fn(ConnectionState)>,
}

/// 自动重连的 WebSocket
pub struct ReconnectingSocket {
    inner: Rc<SocketInner>,
}

impl ReconnectingSocket {
    /// 创建并立即发起连接
    pub fn open<T, S>(url: String, policy: ReconnectPolicy, on_text: T, on_state: S) -> Self
    where
        T: Fn(String) + 'static,
        S: Fn(ConnectionState) + 'static,
    {
        let inner = Rc::new(SocketInner {
            url,
            policy,
            ws: RefCell::new(None),
            handlers: RefCell::new(None),
            retry: RefCell::new(None),
            attempts: Cell::new(0),
            stopped: Cell::new(false),
            on_text: Box::new(on_text),
            on_state: Box::new(on_state),
        });
        connect(&inner);
        Self { inner }
    }

    /// 关闭连接并取消所有待执行的重连
    pub fn stop(&self) {
        let inner = &self.inner;
        if inner.stopped.replace(true) {
            return;
        }
        inner.retry.borrow_mut().take();
        if let Some(ws) = inner.ws.borrow_mut().take() {
            detach(&ws);
            let _ = ws.close();
        }
        inner.handlers.borrow_mut().take();
        (inner.on_state)(ConnectionState::Disconnected);
        log::info!("[Socket] Stopped {}", inner.url);
    }
}

impl Drop for ReconnectingSocket {
    fn drop(&mut self) {
        self.stop();
    }
}

fn detach(ws: &WebSocket) {
    ws.set_onopen(None);
    ws.set_onmessage(None);
    ws.set_onclose(None);
    ws.set_onerror(None);
}

fn connect(inner: &Rc<SocketInner>) {
    if inner.stopped.get() {
        return;
    }

    // 旧连接已关闭，先解除回调再替换
    if let Some(old) = inner.ws.borrow_mut().take() {
        detach(&old);
    }

    log::info!(
        "[Socket] Connecting to {} (attempt {})",
        inner.url,
        inner.attempts.get() + 1
    );
    (inner.on_state)(ConnectionState::Connecting);

    let ws = match WebSocket::new(&inner.url) {
        Ok(ws) => ws,
        Err(e) => {
            log::error!("[Socket] Failed to create WebSocket: {:?}", e);
            schedule_reconnect(inner);
            return;
        }
    };

    let weak = Rc::downgrade(inner);

    let on_open = {
        let weak = weak.clone();
        Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            if let Some(inner) = weak.upgrade() {
                log::info!("[Socket] Connected");
                inner.attempts.set(0);
                (inner.on_state)(ConnectionState::Connected);
            }
        })
    };

    let on_message = {
        let weak = weak.clone();
        Closure::<dyn FnMut(MessageEvent)>::new(move |e: MessageEvent| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            match e.data().as_string() {
                Some(text) => (inner.on_text)(text),
                None => log::warn!("[Socket] Ignoring non-text frame"),
            }
        })
    };

    let on_close = {
        let weak = weak.clone();
        Closure::<dyn FnMut(CloseEvent)>::new(move |e: CloseEvent| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            log::info!(
                "[Socket] Closed: code={}, reason={}",
                e.code(),
                e.reason()
            );
            (inner.on_state)(ConnectionState::Disconnected);
            schedule_reconnect(&inner);
        })
    };

    // 出错时主动关闭，交给 onclose 处理重连
    let on_error = {
        let weak = weak.clone();
        Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            log::error!("[Socket] Error on {}", inner.url);
            if let Some(ws) = inner.ws.borrow().as_ref() {
                let _ = ws.close();
            }
        })
    };

    ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
    ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

    *inner.handlers.borrow_mut() = Some(Handlers {
        _open: on_open,
        _message: on_message,
        _close: on_close,
        _error: on_error,
    });
    *inner.ws.borrow_mut() = Some(ws);
}

fn schedule_reconnect(inner: &Rc<SocketInner>) {
    if inner.stopped.get() {
        return;
    }

    let attempt = inner.attempts.get() + 1;
    inner.attempts.set(attempt);

    let Some(delay) = inner.policy.delay_for(attempt) else {
        log::warn!("[Socket] Giving up after {} attempts", attempt - 1);
        return;
    };

    log::info!("[Socket] Reconnecting in {}ms...", delay);
    let weak: Weak<SocketInner> = Rc::downgrade(inner);
    match Timeout::new(delay, move || {
        if let Some(inner) = weak.upgrade() {
            connect(&inner);
        }
    }) {
        Ok(timer) => *inner.retry.borrow_mut() = Some(timer),
        Err(e) => log::error!("[Socket] Failed to schedule reconnect: {}", e),
    }
}
