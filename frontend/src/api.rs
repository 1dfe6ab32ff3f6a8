//! REST API 客户端
//!
//! 负责拼接地址、附加 CSRF 令牌以及解析 `{status, data, message}` 信封。
//! 具体的发送由注入的 `HttpClient` 完成。

use leptos::prelude::use_context;
use maestro_shared::{ApiEnvelope, ApiRequest, HEADER_CSRF_TOKEN, HttpMethod};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};
use crate::web::{FetchHttpClient, FormValue, HttpClient, HttpRequest, HttpResponse};

#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient<C = FetchHttpClient> {
    base_url: String,
    client: C,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    /// 拼接完整地址；已经是绝对地址的保持不变
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    #[cfg(test)]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// 为会修改状态的请求附加 CSRF 头，cookie 缺失时发送空字符串
    fn prepare(&self, path: &str, method: HttpMethod) -> HttpRequest {
        let req = HttpRequest::new(&self.url(path), method);
        if method.is_state_changing() {
            let token = self.client.csrf_token().unwrap_or_default();
            req.with_header(HEADER_CSRF_TOKEN, &token)
        } else {
            req
        }
    }

    /// 发送类型化请求并返回信封中的 `data`
    pub async fn call<R: ApiRequest>(&self, request: &R) -> ClientResult<R::Response> {
        let path = request.path();
        let mut req = self.prepare(&path, R::METHOD);

        let body = serde_json::to_value(request)?;
        if !body.is_null() {
            req = req.with_json(body.to_string());
        }

        let resp = self
            .client
            .send(req)
            .await
            .map_err(|e| e.in_op_with("api.call", path.to_string()))?;

        let envelope = decode_envelope::<Value>(&resp)
            .map_err(|e| e.in_op_with("api.call", path.to_string()))?;

        serde_json::from_value(envelope.data.unwrap_or(Value::Null))
            .map_err(|e| ClientError::from(e).in_op_with("api.decode", path.to_string()))
    }

    /// 下载二进制内容，非 2xx 视为失败
    pub async fn download(&self, path: &str) -> ClientResult<Vec<u8>> {
        let req = self.prepare(path, HttpMethod::Get);
        let resp = self
            .client
            .send(req)
            .await
            .map_err(|e| e.in_op_with("api.download", path))?;

        if !resp.ok() {
            return Err(ClientError::rejected(resp.status, None).in_op_with("api.download", path));
        }
        Ok(resp.body)
    }

    /// 以 multipart/form-data 提交，返回成功的信封（保留服务端 message）
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: Vec<(String, FormValue)>,
    ) -> ClientResult<ApiEnvelope<T>> {
        let req = self.prepare(path, HttpMethod::Post).with_multipart(fields);
        let resp = self
            .client
            .send(req)
            .await
            .map_err(|e| e.in_op_with("api.multipart", path))?;

        decode_envelope(&resp).map_err(|e| e.in_op_with("api.multipart", path))
    }
}

/// 从 Context 获取浏览器端的 API 客户端
pub fn use_api() -> ApiClient {
    use_context::<ApiClient>().expect("ApiClient should be provided")
}

/// 解析信封；HTTP 失败或 `status != "success"` 时返回 `Rejected`
fn decode_envelope<T: DeserializeOwned>(resp: &HttpResponse) -> ClientResult<ApiEnvelope<T>> {
    let envelope = match resp.json::<ApiEnvelope<T>>() {
        Ok(envelope) => envelope,
        // 错误页通常不是 JSON
        Err(_) if !resp.ok() => {
            log::debug!("[Api] Non-JSON error body: {}", resp.text());
            return Err(ClientError::rejected(resp.status, None));
        }
        Err(e) => return Err(e),
    };

    if !resp.ok() || !envelope.is_success() {
        return Err(ClientError::rejected(resp.status, envelope.message));
    }
    Ok(envelope)
}
