//! 登录后的外壳：顶栏、侧边菜单与内容区
//!
//! 外壳只在已认证时挂载，因此通知连接随登录建立、随注销关闭。

use leptos::prelude::*;
use leptos::task::spawn_local;
use maestro_shared::master::{COUNTRY_RESOURCE, DEPARTMENT_RESOURCE};
use maestro_shared::{MenuItem, ReconnectPolicy};

use crate::api::use_api;
use crate::components::icons::*;
use crate::config::AppConfig;
use crate::state::auth::use_auth;
use crate::state::notifications::{connect_notifications, use_notifications};
use crate::state::status::use_status;
use crate::state::theme::use_theme;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use crate::web::{DocumentRoot, LocalStorage};

/// 菜单为空时使用的固定入口
fn fallback_menu(can: impl Fn(&str) -> bool) -> Vec<MenuItem> {
    [COUNTRY_RESOURCE, DEPARTMENT_RESOURCE]
        .into_iter()
        .filter(|r| can(r.permissions.get))
        .map(|r| MenuItem {
            label: r.title.to_string(),
            path: Some(r.route.to_string()),
            icon: None,
            children: Vec::new(),
        })
        .collect()
}

#[component]
fn MenuEntry(item: MenuItem) -> AnyView {
    let MenuItem {
        label,
        path,
        children,
        ..
    } = item;

    if children.is_empty() {
        let path = path.unwrap_or_else(|| AppRoute::Home.to_path().to_string());
        view! {
            <li>
                <Link to=path>{label}</Link>
            </li>
        }
        .into_any()
    } else {
        view! {
            <li>
                <details open>
                    <summary>{label}</summary>
                    <ul>
                        {children
                            .into_iter()
                            .map(|child| view! { <MenuEntry item=child /> })
                            .collect_view()}
                    </ul>
                </details>
            </li>
        }
        .into_any()
    }
}

#[component]
fn Sidebar() -> impl IntoView {
    let auth = use_auth();

    let entries = move || {
        let menu = auth
            .session
            .with(|s| s.as_ref().map(|s| s.menu.clone()).unwrap_or_default());
        if menu.is_empty() {
            fallback_menu(|p| auth.can(p))
        } else {
            menu
        }
    };

    view! {
        <aside class="w-64 shrink-0 hidden lg:block">
            <ul class="menu bg-base-100 rounded-box shadow-xl w-full">
                <li>
                    <Link to="/">
                        <House attr:class="h-4 w-4" /> "Inicio"
                    </Link>
                </li>
                {move || {
                    entries()
                        .into_iter()
                        .map(|item| view! { <MenuEntry item=item /> })
                        .collect_view()
                }}
                <li>
                    <Link to="/settings">
                        <Settings attr:class="h-4 w-4" /> "Configuración"
                    </Link>
                </li>
            </ul>
        </aside>
    }
}

#[component]
fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let theme = use_theme();
    let notifications = use_notifications();

    let on_logout = move |_| {
        let api = api.clone();
        // 导航由路由服务监听认证状态自动处理
        spawn_local(async move {
            auth.logout(&api, &LocalStorage).await;
        });
    };

    let on_toggle_theme = move |_| theme.toggle(&LocalStorage, &DocumentRoot);

    view! {
        <div class="navbar bg-base-100 rounded-box shadow-xl">
            <div class="flex-1 gap-2">
                <Link to="/" class="btn btn-ghost text-xl">"Maestro"</Link>
            </div>
            <div class="flex-none gap-2">
                <Link to="/settings/notifications" class="btn btn-ghost btn-circle">
                    <div class="indicator">
                        <Bell attr:class="h-5 w-5" />
                        <Show when=move || { notifications.unread() > 0 }>
                            <span class="badge badge-sm badge-primary indicator-item">
                                {move || notifications.unread()}
                            </span>
                        </Show>
                    </div>
                </Link>
                <button class="btn btn-ghost btn-circle" on:click=on_toggle_theme>
                    {move || if theme.is_dark() {
                        view! { <Sun attr:class="h-5 w-5" /> }.into_any()
                    } else {
                        view! { <Moon attr:class="h-5 w-5" /> }.into_any()
                    }}
                </button>
                <span class="badge badge-neutral hidden md:inline-flex">
                    {move || auth.display_name()}
                </span>
                <button on:click=on_logout class="btn btn-outline btn-error gap-2">
                    <LogOut attr:class="h-4 w-4" /> "Salir"
                </button>
            </div>
        </div>
    }
}

#[component]
pub fn Shell(children: Children) -> impl IntoView {
    let api = use_api();
    let statuses = use_status();
    let notifications = use_notifications();

    // 状态字典全局共享，首次进入时加载
    spawn_local(async move {
        statuses.fetch_statuses(&api, false).await;
    });

    match use_context::<AppConfig>().and_then(|c| c.notifications_url()) {
        Some(url) => connect_notifications(notifications, url, ReconnectPolicy::default()),
        None => log::warn!("[Shell] No notifications endpoint available"),
    }

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <Navbar />
                <div class="flex gap-8">
                    <Sidebar />
                    <main class="flex-1 min-w-0">{children()}</main>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maestro_shared::permissions::COUNTRY_PERMISSIONS;

    #[test]
    fn test_fallback_menu_is_permission_gated() {
        let menu = fallback_menu(|p| p == COUNTRY_PERMISSIONS.get);
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].path.as_deref(), Some("/config/master/country"));

        assert!(fallback_menu(|_| false).is_empty());
        assert_eq!(fallback_menu(|_| true).len(), 2);
    }
}
