//! 定时器封装模块
//!
//! 使用 `web_sys` 的原生 `setTimeout`。

use wasm_bindgen::prelude::*;

use crate::error::{ClientError, ClientResult};

/// 一次性定时器
///
/// 封装 `setTimeout` API。当 `Timeout` 被 drop 时，尚未触发的回调会被取消。
pub struct Timeout {
    handle: i32,
    #[allow(dead_code)]
    closure: Closure<dyn FnMut()>,
}

impl Timeout {
    /// 在 `millis` 毫秒后执行 `callback`
    pub fn new<F>(millis: u32, callback: F) -> ClientResult<Self>
    where
        F: FnOnce() + 'static,
    {
        let closure: Closure<dyn FnMut()> = Closure::once(callback);
        let window = web_sys::window().ok_or_else(|| ClientError::browser("无法获取 window 对象"))?;

        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis as i32,
            )
            .map_err(|e| ClientError::from(e).in_op("timer.set_timeout"))?;

        Ok(Self { handle, closure })
    }

    /// 取消定时器
    pub fn cancel(&self) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(self.handle);
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}
