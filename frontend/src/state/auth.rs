//! 认证模块
//!
//! 管理会话状态，与路由系统解耦：
//! 路由服务通过注入的 `is_authenticated_signal()` 检查认证状态。
//!
//! 会话整体替换，从不局部修改；持久化在 LocalStorage 的 `auth-session` 键中。

use leptos::prelude::*;
use maestro_shared::protocol::{
    LoginRequest, LogoutRequest, RegisterRequest, SessionCheckRequest, VerifyEmailRequest,
};
use maestro_shared::session::{self, display_name};
use maestro_shared::{
    STORAGE_LEGACY_USER_KEY, STORAGE_SESSION_KEY, STORAGE_VERIFY_EMAIL_KEY, Session,
    SessionPayload,
};

use crate::api::ApiClient;
use crate::web::{HttpClient, KeyValueStore};

const LOGIN_FAILED: &str = "Usuario o contraseña incorrectos";
const REGISTER_FAILED: &str = "No se pudo completar el registro";
const VERIFY_FAILED: &str = "Código de verificación inválido";
const VERIFY_MISSING_EMAIL: &str = "No hay un correo pendiente de verificación";

/// 认证上下文
///
/// 在 `App` 中创建一次，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub session: RwSignal<Option<Session>>,
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthContext {
    pub fn new() -> Self {
        Self {
            session: RwSignal::new(None),
        }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let session = self.session;
        Signal::derive(move || session.with(|s| session::is_logged_in(s.as_ref())))
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.with(|s| session::is_logged_in(s.as_ref()))
    }

    /// 权限判断，在组件中调用时会订阅会话变化
    pub fn can(&self, permission: &str) -> bool {
        self.session.with(|s| session::can(s.as_ref(), permission))
    }

    pub fn display_name(&self) -> String {
        self.session.with(|s| display_name(s.as_ref()))
    }

    /// 启动时从 LocalStorage 恢复会话
    pub fn hydrate<S: KeyValueStore>(&self, storage: &S) {
        let stored: Option<Session> = storage.get_json(STORAGE_SESSION_KEY);
        if stored.is_some() {
            log::debug!("[Auth] Session restored from storage");
        }
        self.session.set(stored);
    }

    /// 用登录或会话校验返回的数据覆盖当前会话并持久化
    pub fn set_user<S: KeyValueStore>(&self, storage: &S, payload: SessionPayload) {
        let session = Session::from_payload(payload);
        storage.set_json(STORAGE_SESSION_KEY, &session);
        self.session.set(Some(session));
    }

    /// 只清理本地状态
    fn clear<S: KeyValueStore>(&self, storage: &S) {
        self.session.set(None);
        storage.delete(STORAGE_SESSION_KEY);
        storage.delete(STORAGE_LEGACY_USER_KEY);
    }

    /// 注销：先清理本地状态，再通知后端
    ///
    /// 后端失败只记录日志，不会恢复会话。导航由路由服务监听认证状态自动处理。
    pub async fn logout<C: HttpClient, S: KeyValueStore>(&self, api: &ApiClient<C>, storage: &S) {
        self.clear(storage);
        if let Err(e) = api.call(&LogoutRequest).await {
            log::error!("[Auth] Error during backend logout: {}", e);
        }
    }

    /// 向后端校验 cookie 会话
    pub async fn check_session<C: HttpClient, S: KeyValueStore>(
        &self,
        api: &ApiClient<C>,
        storage: &S,
    ) {
        match api.call(&SessionCheckRequest).await {
            Ok(payload) => self.set_user(storage, payload),
            Err(e) if e.is_rejected() => {
                log::info!("[Auth] Session rejected: {}", e);
                self.logout(api, storage).await;
            }
            Err(e) => {
                log::error!("[Auth] Error verifying session: {}", e);
                self.clear(storage);
            }
        }
    }

    /// 登录，失败时返回可展示的错误文字
    pub async fn login<C: HttpClient, S: KeyValueStore>(
        &self,
        api: &ApiClient<C>,
        storage: &S,
        username: String,
        password: String,
    ) -> Result<(), String> {
        let request = LoginRequest { username, password };
        match api.call(&request).await {
            Ok(payload) => {
                self.set_user(storage, payload);
                log::info!("[Auth] Logged in as {}", self.display_name());
                Ok(())
            }
            Err(e) => {
                log::warn!("[Auth] Login failed: {}", e);
                Err(e.user_message(LOGIN_FAILED))
            }
        }
    }
}

/// 注册成功后记住待验证的邮箱，由调用方跳转到 `/verify`
pub async fn register<C: HttpClient, S: KeyValueStore>(
    api: &ApiClient<C>,
    storage: &S,
    form: RegisterRequest,
) -> Result<(), String> {
    match api.call(&form).await {
        Ok(_) => {
            storage.set(STORAGE_VERIFY_EMAIL_KEY, &form.email);
            Ok(())
        }
        Err(e) => {
            log::warn!("[Auth] Registration failed: {}", e);
            Err(e.user_message(REGISTER_FAILED))
        }
    }
}

/// 提交邮箱验证码，成功后清除待验证邮箱，由调用方跳转到 `/login`
pub async fn verify_email<C: HttpClient, S: KeyValueStore>(
    api: &ApiClient<C>,
    storage: &S,
    code: String,
) -> Result<(), String> {
    let Some(email) = pending_verification(storage) else {
        return Err(VERIFY_MISSING_EMAIL.to_string());
    };

    match api.call(&VerifyEmailRequest { email, code }).await {
        Ok(_) => {
            storage.delete(STORAGE_VERIFY_EMAIL_KEY);
            Ok(())
        }
        Err(e) => {
            log::warn!("[Auth] Verification failed: {}", e);
            Err(e.user_message(VERIFY_FAILED))
        }
    }
}

pub fn pending_verification<S: KeyValueStore>(storage: &S) -> Option<String> {
    storage
        .get(STORAGE_VERIFY_EMAIL_KEY)
        .filter(|email| !email.is_empty())
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::{MockHttpClient, MockStorage};
    use maestro_shared::{ALL_PERMISSIONS, HttpMethod};
    use serde_json::json;

    const BASE: &str = "http://api.test";

    fn api(client: MockHttpClient) -> ApiClient<MockHttpClient> {
        ApiClient::new(BASE, client)
    }

    fn session_json(perms: &[&str]) -> serde_json::Value {
        json!({
            "user_info": {
                "id": "1",
                "username": "jdoe",
                "email": "jane@example.com",
                "menu": [],
                "permisos_back": perms,
            }
        })
    }

    fn logged_in(storage: &MockStorage, perms: &[&str]) -> AuthContext {
        let ctx = AuthContext::new();
        let payload: SessionPayload = serde_json::from_value(session_json(perms)).unwrap();
        ctx.set_user(storage, payload);
        ctx
    }

    #[test]
    fn test_can_wildcard_and_exact() {
        let owner = Owner::new();
        owner.set();
        let storage = MockStorage::new();

        let admin = logged_in(&storage, &[ALL_PERMISSIONS]);
        assert!(admin.can("general_master_country_create"));

        let limited = logged_in(&storage, &["x"]);
        assert!(limited.can("x"));
        assert!(!limited.can("y"));

        let anonymous = AuthContext::new();
        assert!(!anonymous.can("x"));
        assert!(!anonymous.is_logged_in());
        assert_eq!(anonymous.display_name(), "Acceso");
    }

    #[test]
    fn test_set_user_persists_and_hydrate_restores() {
        let owner = Owner::new();
        owner.set();
        let storage = MockStorage::new();

        let ctx = logged_in(&storage, &["x"]);
        assert!(ctx.is_logged_in());
        assert!(storage.contains(STORAGE_SESSION_KEY));

        let restored = AuthContext::new();
        restored.hydrate(&storage);
        assert_eq!(restored.session.get_untracked(), ctx.session.get_untracked());
        assert!(restored.can("x"));
    }

    #[test]
    fn test_hydrate_discards_malformed_session() {
        let owner = Owner::new();
        owner.set();
        let storage = MockStorage::new().with(STORAGE_SESSION_KEY, "{broken");

        let ctx = AuthContext::new();
        ctx.hydrate(&storage);
        assert!(!ctx.is_logged_in());
        assert!(!storage.contains(STORAGE_SESSION_KEY));
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_backend_fails() {
        let owner = Owner::new();
        owner.set();
        let storage = MockStorage::new().with(STORAGE_LEGACY_USER_KEY, "{}");
        let client = MockHttpClient::new();
        client.mock_network_error("http://api.test/auth/logout/");
        let api = api(client);

        let ctx = logged_in(&storage, &["x"]);
        ctx.logout(&api, &storage).await;

        assert!(!ctx.is_logged_in());
        assert!(!storage.contains(STORAGE_SESSION_KEY));
        assert!(!storage.contains(STORAGE_LEGACY_USER_KEY));
        assert_eq!(api.client().request_count("http://api.test/auth/logout/"), 1);
    }

    #[tokio::test]
    async fn test_check_session_success_sets_user() {
        let owner = Owner::new();
        owner.set();
        let storage = MockStorage::new();
        let client = MockHttpClient::new();
        client.mock_response(
            HttpMethod::Get,
            "http://api.test/auth/session/",
            200,
            json!({"status": "success", "data": session_json(&["x"])}),
        );
        let api = api(client);

        let ctx = AuthContext::new();
        ctx.check_session(&api, &storage).await;
        assert!(ctx.is_logged_in());
        assert!(ctx.can("x"));
    }

    #[tokio::test]
    async fn test_check_session_keeps_user_with_null_fields() {
        let owner = Owner::new();
        owner.set();
        let storage = MockStorage::new();
        let client = MockHttpClient::new();
        client.mock_response(
            HttpMethod::Get,
            "http://api.test/auth/session/",
            200,
            json!({"status": "success", "data": {
                "user_info": {
                    "id": 7,
                    "username": "jdoe",
                    "last_name": null,
                    "dni": null,
                    "permisos_back": ["x"],
                }
            }}),
        );
        let api = api(client);

        let ctx = AuthContext::new();
        ctx.check_session(&api, &storage).await;
        assert!(ctx.is_logged_in());
        assert!(ctx.can("x"));
        assert!(storage.contains(STORAGE_SESSION_KEY));
    }

    #[tokio::test]
    async fn test_check_session_non_success_logs_out() {
        let owner = Owner::new();
        owner.set();
        let storage = MockStorage::new();
        let client = MockHttpClient::new();
        client.mock_response(
            HttpMethod::Get,
            "http://api.test/auth/session/",
            200,
            json!({"status": "error", "message": "No autenticado"}),
        );
        let api = api(client);

        let ctx = logged_in(&storage, &["x"]);
        ctx.check_session(&api, &storage).await;

        assert!(!ctx.is_logged_in());
        assert!(!storage.contains(STORAGE_SESSION_KEY));
        // 被拒绝时同样通知后端注销
        assert_eq!(api.client().request_count("http://api.test/auth/logout/"), 1);
    }

    #[tokio::test]
    async fn test_check_session_network_error_clears_locally() {
        let owner = Owner::new();
        owner.set();
        let storage = MockStorage::new();
        let client = MockHttpClient::new();
        client.mock_network_error("http://api.test/auth/session/");
        let api = api(client);

        let ctx = logged_in(&storage, &["x"]);
        ctx.check_session(&api, &storage).await;

        assert!(!ctx.is_logged_in());
        assert_eq!(api.client().request_count("http://api.test/auth/logout/"), 0);
    }

    #[tokio::test]
    async fn test_login_returns_server_message() {
        let owner = Owner::new();
        owner.set();
        let storage = MockStorage::new();
        let client = MockHttpClient::new();
        client.mock_response(
            HttpMethod::Post,
            "http://api.test/auth/login/",
            401,
            json!({"status": "error", "message": "Cuenta bloqueada"}),
        );
        let api = api(client);

        let ctx = AuthContext::new();
        let result = ctx
            .login(&api, &storage, "jdoe".into(), "bad".into())
            .await;
        assert_eq!(result, Err("Cuenta bloqueada".to_string()));
        assert!(!ctx.is_logged_in());
    }

    #[tokio::test]
    async fn test_login_success() {
        let owner = Owner::new();
        owner.set();
        let storage = MockStorage::new();
        let client = MockHttpClient::new();
        client.mock_response(
            HttpMethod::Post,
            "http://api.test/auth/login/",
            200,
            json!({"status": "success", "data": session_json(&[ALL_PERMISSIONS])}),
        );
        let api = api(client);

        let ctx = AuthContext::new();
        ctx.login(&api, &storage, "jdoe".into(), "pw".into())
            .await
            .unwrap();
        assert_eq!(ctx.display_name(), "jdoe");
        assert!(storage.contains(STORAGE_SESSION_KEY));
    }

    #[tokio::test]
    async fn test_register_then_verify() {
        let storage = MockStorage::new();
        let client = MockHttpClient::new();
        client.mock_response(
            HttpMethod::Post,
            "http://api.test/auth/register/",
            201,
            json!({"status": "success", "message": "Revise su correo"}),
        );
        client.mock_response(
            HttpMethod::Post,
            "http://api.test/auth/verify/",
            200,
            json!({"status": "success"}),
        );
        let api = api(client);

        let form = RegisterRequest {
            username: "jdoe".into(),
            email: "jane@example.com".into(),
            password: "pw".into(),
            ..Default::default()
        };
        register(&api, &storage, form).await.unwrap();
        assert_eq!(
            pending_verification(&storage).as_deref(),
            Some("jane@example.com")
        );

        verify_email(&api, &storage, "123456".into()).await.unwrap();
        assert!(pending_verification(&storage).is_none());
    }

    #[tokio::test]
    async fn test_verify_without_pending_email() {
        let storage = MockStorage::new();
        let api = api(MockHttpClient::new());

        let result = verify_email(&api, &storage, "123456".into()).await;
        assert_eq!(result, Err(VERIFY_MISSING_EMAIL.to_string()));
        assert!(api.client().last_request().is_none());
    }
}
