//! Maestro 管理端前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `state`: 会话、状态字典、通知、主题等全局状态
//! - `components`: UI 组件层

mod api;
mod config;
mod error;

mod state {
    pub mod auth;
    pub mod excel;
    mod loading;
    pub mod master;
    pub mod notifications;
    pub mod status;
    pub mod theme;
    pub mod toast;
}

mod components {
    pub mod home;
    mod icons;
    pub mod login;
    pub mod master_data;
    pub mod register;
    pub mod settings;
    pub mod shell;
    mod status_badge;
    pub mod toast_host;
    pub mod verify;
}

use leptos::prelude::*;
use leptos::task::spawn_local;
use maestro_shared::{Country, Department};

use crate::api::ApiClient;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::master_data::master_page;
use crate::components::register::RegisterPage;
use crate::components::settings::{NotificationSettingsPage, SettingsPage};
use crate::components::shell::Shell;
use crate::components::toast_host::ToastHost;
use crate::components::verify::VerifyPage;
use crate::config::AppConfig;
use crate::state::auth::AuthContext;
use crate::state::excel::ExcelContext;
use crate::state::notifications::NotificationContext;
use crate::state::status::StatusContext;
use crate::state::theme::ThemeContext;
use crate::state::toast::ToastContext;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    mod cookie;
    mod dom;
    mod file;
    mod http;
    pub mod route;
    pub mod router;
    mod socket;
    mod storage;
    mod timer;

    pub use dom::{DocumentRoot, ThemeTarget};
    pub use file::{BrowserDownload, FileSink, read_file};
    pub use http::{
        FetchHttpClient, FileUpload, FormValue, HttpClient, HttpRequest, HttpResponse, RequestBody,
    };
    pub use socket::ReconnectingSocket;
    pub use storage::{KeyValueStore, LocalStorage};

    #[cfg(test)]
    pub use dom::tests::MockThemeTarget;
    #[cfg(test)]
    pub use file::tests::MockFileSink;
    #[cfg(test)]
    pub use http::MockHttpClient;
    #[cfg(test)]
    pub use storage::tests::MockStorage;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};
use web::{DocumentRoot, FetchHttpClient, LocalStorage};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Verify => view! { <VerifyPage /> }.into_any(),
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Country => master_page::<Country>().into_any(),
        AppRoute::Department => master_page::<Department>().into_any(),
        AppRoute::Settings => view! { <SettingsPage /> }.into_any(),
        AppRoute::SettingsNotifications => view! { <NotificationSettingsPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-[50vh]">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Página no encontrada"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 配置与 API 客户端
    let config = AppConfig::from_env();
    let api = ApiClient::new(config.api_base.clone(), FetchHttpClient);
    provide_context(config);
    provide_context(api.clone());

    // 2. 全局状态
    let auth_ctx = AuthContext::new();
    let theme = ThemeContext::new();
    provide_context(auth_ctx);
    provide_context(theme);
    provide_context(StatusContext::new());
    provide_context(NotificationContext::new());
    provide_context(ToastContext::new());
    provide_context(ExcelContext::new());

    // 3. 先用本地缓存恢复会话，再向后端确认
    auth_ctx.hydrate(&LocalStorage);
    theme.init(&LocalStorage, &DocumentRoot);
    spawn_local(async move {
        auth_ctx.check_session(&api, &LocalStorage).await;
    });

    // 4. 获取认证状态信号，用于注入路由服务
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        // 5. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated>
            <Show
                when=move || is_authenticated.get()
                fallback=|| view! { <RouterOutlet matcher=route_matcher /> }
            >
                <Shell>
                    <RouterOutlet matcher=route_matcher />
                </Shell>
            </Show>
        </Router>
        <ToastHost />
    }
}
