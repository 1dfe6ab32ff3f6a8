//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑，不依赖 DOM 或 web_sys。
//! 定义了应用的所有路由、公开/受保护属性以及守卫规则。

use std::fmt::Display;

use maestro_shared::master::{COUNTRY_RESOURCE, DEPARTMENT_RESOURCE};

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页 (需要认证)
    #[default]
    Home,
    Login,
    Register,
    /// 邮箱验证码页面
    Verify,
    /// 国家主数据
    Country,
    /// 部门主数据
    Department,
    Settings,
    SettingsNotifications,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举，末尾的 `/` 不影响匹配
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/verify" => Self::Verify,
            "/settings" => Self::Settings,
            "/settings/notifications" => Self::SettingsNotifications,
            p if p == COUNTRY_RESOURCE.route => Self::Country,
            p if p == DEPARTMENT_RESOURCE.route => Self::Department,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Verify => "/verify",
            Self::Country => COUNTRY_RESOURCE.route,
            Self::Department => DEPARTMENT_RESOURCE.route,
            Self::Settings => "/settings",
            Self::SettingsNotifications => "/settings/notifications",
            Self::NotFound => "/404",
        }
    }

    /// 无需登录即可访问的页面
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login | Self::Register | Self::Verify)
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !self.is_public()
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从公开页面）
    pub fn auth_success_redirect() -> Self {
        Self::Home
    }

    /// 守卫：返回需要重定向到的路由，`None` 表示放行
    pub fn guard(&self, is_authenticated: bool) -> Option<Self> {
        if self.requires_auth() && !is_authenticated {
            Some(Self::auth_failure_redirect())
        } else if self.is_public() && is_authenticated {
            Some(Self::auth_success_redirect())
        } else {
            None
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Home);
        assert_eq!(AppRoute::from_path(""), AppRoute::Home);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/login/"), AppRoute::Login);
        assert_eq!(
            AppRoute::from_path("/config/master/country"),
            AppRoute::Country
        );
        assert_eq!(
            AppRoute::from_path("/config/master/department/"),
            AppRoute::Department
        );
        assert_eq!(
            AppRoute::from_path("/settings/notifications"),
            AppRoute::SettingsNotifications
        );
        assert_eq!(AppRoute::from_path("/settings/members"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn test_paths_resolve_back() {
        let routes = [
            AppRoute::Home,
            AppRoute::Login,
            AppRoute::Register,
            AppRoute::Verify,
            AppRoute::Country,
            AppRoute::Department,
            AppRoute::Settings,
            AppRoute::SettingsNotifications,
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
    }

    #[test]
    fn test_guard_unauthenticated() {
        assert_eq!(AppRoute::Home.guard(false), Some(AppRoute::Login));
        assert_eq!(AppRoute::Country.guard(false), Some(AppRoute::Login));
        assert_eq!(AppRoute::NotFound.guard(false), Some(AppRoute::Login));
        assert_eq!(AppRoute::Login.guard(false), None);
        assert_eq!(AppRoute::Register.guard(false), None);
        assert_eq!(AppRoute::Verify.guard(false), None);
    }

    #[test]
    fn test_guard_authenticated() {
        assert_eq!(AppRoute::Login.guard(true), Some(AppRoute::Home));
        assert_eq!(AppRoute::Verify.guard(true), Some(AppRoute::Home));
        assert_eq!(AppRoute::Home.guard(true), None);
        assert_eq!(AppRoute::Settings.guard(true), None);
        assert_eq!(AppRoute::NotFound.guard(true), None);
    }
}
