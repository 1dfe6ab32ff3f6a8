use std::time::Duration;

use leptos::prelude::*;

use crate::config::TOAST_LIFETIME_MS;
use crate::state::toast::use_toast;

/// 右上角的提示消息区域，每条消息在显示后定时关闭
#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = use_toast();

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || toasts.toasts.get()
                key=|t| t.id
                children=move |toast| {
                    let id = toast.id;
                    set_timeout(
                        move || toasts.dismiss(id),
                        Duration::from_millis(TOAST_LIFETIME_MS),
                    );
                    view! {
                        <div
                            class=format!("{} shadow-lg cursor-pointer", toast.level.alert_class())
                            on:click=move |_| toasts.dismiss(id)
                        >
                            <span>{toast.message}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}
