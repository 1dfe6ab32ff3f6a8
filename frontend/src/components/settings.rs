use leptos::prelude::*;

use crate::components::icons::{Bell, Moon, Settings as SettingsIcon, Sun};
use crate::state::auth::use_auth;
use crate::state::notifications::use_notifications;
use crate::state::theme::use_theme;
use crate::web::router::Link;
use crate::web::{DocumentRoot, LocalStorage};

#[component]
fn SettingsTabs(active: &'static str) -> impl IntoView {
    let tab = move |path: &'static str, label: &'static str| {
        let class = if path == active { "tab tab-active" } else { "tab" };
        view! { <Link to=path class=class>{label}</Link> }
    };

    view! {
        <div role="tablist" class="tabs tabs-bordered">
            {tab("/settings", "General")}
            {tab("/settings/notifications", "Notificaciones")}
        </div>
    }
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    let auth = use_auth();
    let theme = use_theme();

    let field = move |label: &'static str, value: fn(&maestro_shared::UserInfo) -> String| {
        let text = move || {
            auth.session
                .with(|s| s.as_ref().map(|s| value(&s.user_info)))
                .unwrap_or_default()
        };
        view! {
            <div>
                <div class="text-xs uppercase text-base-content/50">{label}</div>
                <div class="font-medium">{text}</div>
            </div>
        }
    };

    view! {
        <div class="space-y-6">
            <h2 class="text-2xl font-bold flex items-center gap-2">
                <SettingsIcon attr:class="h-6 w-6" /> "Configuración"
            </h2>
            <SettingsTabs active="/settings" />

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Perfil"</h3>
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        {field("Usuario", |u| u.username.clone())}
                        {field("Nombre", |u| u.full_name())}
                        {field("Correo", |u| u.email.clone())}
                        {field("DNI", |u| u.dni.clone())}
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body flex-row items-center justify-between">
                    <div>
                        <h3 class="card-title">"Apariencia"</h3>
                        <p class="text-base-content/70 text-sm">
                            {move || if theme.is_dark() { "Tema oscuro" } else { "Tema claro" }}
                        </p>
                    </div>
                    <label class="swap swap-rotate btn btn-ghost btn-circle">
                        <input
                            type="checkbox"
                            prop:checked=move || theme.is_dark()
                            on:change=move |_| theme.toggle(&LocalStorage, &DocumentRoot)
                        />
                        <Sun attr:class="swap-off h-6 w-6" />
                        <Moon attr:class="swap-on h-6 w-6" />
                    </label>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn NotificationSettingsPage() -> impl IntoView {
    let notifications = use_notifications();

    view! {
        <div class="space-y-6">
            <h2 class="text-2xl font-bold flex items-center gap-2">
                <Bell attr:class="h-6 w-6" /> "Notificaciones"
            </h2>
            <SettingsTabs active="/settings/notifications" />

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex items-center justify-between p-6 pb-2">
                        <div>
                            <h3 class="card-title">"Recibidas"</h3>
                            <p class="text-base-content/70 text-sm">
                                "Estado: " {move || notifications.state.get().label()}
                            </p>
                        </div>
                        <button
                            class="btn btn-ghost btn-sm"
                            disabled=move || notifications.unread() == 0
                            on:click=move |_| notifications.mark_all_read()
                        >
                            "Marcar todas como leídas"
                        </button>
                    </div>

                    <ul class="divide-y divide-base-200">
                        <Show when=move || notifications.items.with(|i| i.is_empty())>
                            <li class="text-center py-8 text-base-content/50">"Sin notificaciones"</li>
                        </Show>
                        <For
                            each=move || notifications.items.get().into_iter().rev()
                            key=|n| (n.id.clone(), n.read)
                            children=move |item| {
                                let id = item.id.clone();
                                let read = item.read;
                                let title = item.title().unwrap_or("Notificación").to_string();
                                let message = item.message().map(str::to_string);
                                view! {
                                    <li class=if read { "p-4 opacity-60" } else { "p-4" }>
                                        <div class="flex items-start justify-between gap-4">
                                            <div>
                                                <div class="font-semibold">{title}</div>
                                                {message.map(|m| view! { <p class="text-sm">{m}</p> })}
                                            </div>
                                            <Show when=move || !read>
                                                <button
                                                    class="btn btn-ghost btn-xs"
                                                    on:click={
                                                        let id = id.clone();
                                                        move |_| notifications.mark_read(&id)
                                                    }
                                                >
                                                    "Marcar como leída"
                                                </button>
                                            </Show>
                                        </div>
                                    </li>
                                }
                            }
                        />
                    </ul>
                </div>
            </div>
        </div>
    }
}
