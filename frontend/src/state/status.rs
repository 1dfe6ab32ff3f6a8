//! 状态字典缓存
//!
//! 整个应用共享一份，首次需要时加载，之后除非强制刷新都复用缓存。

use leptos::prelude::*;
use maestro_shared::Status;
use maestro_shared::protocol::ListStatusesRequest;
use maestro_shared::status::find_status;

use super::loading::LoadingGuard;
use crate::api::ApiClient;
use crate::web::HttpClient;

const FETCH_FAILED: &str = "Error al obtener los estados";
const FETCH_UNREACHABLE: &str = "Error de conexión al obtener los estados";

#[derive(Clone, Copy)]
pub struct StatusContext {
    pub statuses: RwSignal<Vec<Status>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
}

impl Default for StatusContext {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusContext {
    pub fn new() -> Self {
        Self {
            statuses: RwSignal::new(Vec::new()),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
        }
    }

    /// 加载状态列表；已有数据且未强制刷新时直接返回
    pub async fn fetch_statuses<C: HttpClient>(&self, api: &ApiClient<C>, force: bool) {
        if !force && self.statuses.with_untracked(|s| !s.is_empty()) {
            return;
        }

        let _guard = LoadingGuard::start(self.loading);
        let _ = self.error.try_set(None);

        match api.call(&ListStatusesRequest).await {
            Ok(list) => {
                log::debug!("[Status] Loaded {} statuses", list.len());
                let _ = self.statuses.try_set(list);
            }
            Err(e) if e.is_rejected() => {
                log::warn!("[Status] Fetch rejected: {}", e);
                let _ = self.error.try_set(Some(e.user_message(FETCH_FAILED)));
            }
            Err(e) => {
                log::error!("[Status] Error fetching statuses: {}", e);
                let _ = self.error.try_set(Some(FETCH_UNREACHABLE.to_string()));
            }
        }
    }

    pub fn get_status(&self, id: &str) -> Option<Status> {
        self.statuses.with(|list| find_status(list, id).cloned())
    }
}

pub fn use_status() -> StatusContext {
    use_context::<StatusContext>().expect("StatusContext should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::MockHttpClient;
    use maestro_shared::HttpMethod;
    use serde_json::json;

    const URL: &str = "http://api.test/config/status/all/";

    fn statuses_body() -> serde_json::Value {
        json!({
            "status": "success",
            "data": [
                {"id": "1", "name": "Activo", "color_code": "#16A34A", "type_status": "general"},
                {"id": "2", "name": "Inactivo", "color_code": "#DC2626", "type_status": "general"}
            ]
        })
    }

    #[tokio::test]
    async fn test_second_fetch_uses_cache() {
        let owner = Owner::new();
        owner.set();
        let client = MockHttpClient::new();
        client.mock_response(HttpMethod::Get, URL, 200, statuses_body());
        let api = ApiClient::new("http://api.test", client);

        let ctx = StatusContext::new();
        ctx.fetch_statuses(&api, false).await;
        ctx.fetch_statuses(&api, false).await;

        assert_eq!(api.client().request_count(URL), 1);
        assert_eq!(
            ctx.get_status("2").map(|s| s.name),
            Some("Inactivo".to_string())
        );
        assert!(ctx.get_status("9").is_none());
        assert!(!ctx.loading.get_untracked());
    }

    #[tokio::test]
    async fn test_force_refetches() {
        let owner = Owner::new();
        owner.set();
        let client = MockHttpClient::new();
        client.mock_response(HttpMethod::Get, URL, 200, statuses_body());
        let api = ApiClient::new("http://api.test", client);

        let ctx = StatusContext::new();
        ctx.fetch_statuses(&api, false).await;
        ctx.fetch_statuses(&api, true).await;
        assert_eq!(api.client().request_count(URL), 2);
    }

    #[tokio::test]
    async fn test_rejected_fetch_sets_error() {
        let owner = Owner::new();
        owner.set();
        let client = MockHttpClient::new();
        client.mock_response(HttpMethod::Get, URL, 500, json!({"status": "error"}));
        let api = ApiClient::new("http://api.test", client);

        let ctx = StatusContext::new();
        ctx.fetch_statuses(&api, false).await;
        assert_eq!(ctx.error.get_untracked().as_deref(), Some(FETCH_FAILED));
        assert!(!ctx.loading.get_untracked());
    }

    #[tokio::test]
    async fn test_network_failure_sets_connection_error() {
        let owner = Owner::new();
        owner.set();
        let client = MockHttpClient::new();
        client.mock_network_error(URL);
        let api = ApiClient::new("http://api.test", client);

        let ctx = StatusContext::new();
        ctx.fetch_statuses(&api, false).await;
        assert_eq!(ctx.error.get_untracked().as_deref(), Some(FETCH_UNREACHABLE));
        assert!(ctx.statuses.get_untracked().is_empty());
        assert!(!ctx.loading.get_untracked());
    }
}
