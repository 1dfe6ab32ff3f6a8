//! HTTP 请求封装模块
//!
//! `HttpClient` 是与浏览器解耦的发送接口：
//! - `FetchHttpClient` 基于 `web_sys::fetch`，总是携带 cookie（credentials: include）
//! - 测试中使用 `MockHttpClient`

use async_trait::async_trait;
use maestro_shared::{CSRF_COOKIE_NAME, HttpMethod};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Headers, Request, RequestCredentials, RequestInit, Response};

use super::file::bytes_to_blob;

use crate::error::{ClientError, ClientResult};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

// =========================================================
// 请求 / 响应
// =========================================================

/// 待上传的文件，内容已读入内存
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File(FileUpload),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(String),
    Multipart(Vec<(String, FormValue)>),
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_json(mut self, body: String) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn with_multipart(mut self, fields: Vec<(String, FormValue)>) -> Self {
        self.body = Some(RequestBody::Multipart(fields));
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_slice(&self.body).map_err(ClientError::from)
    }
}

#[async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse>;

    /// 当前的 CSRF 令牌
    fn csrf_token(&self) -> Option<String> {
        None
    }
}

// =========================================================
// 实现层: fetch 客户端
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

fn build_form(fields: &[(String, FormValue)]) -> ClientResult<FormData> {
    let form = FormData::new().map_err(|e| ClientError::from(e).in_op("http.form"))?;
    for (name, value) in fields {
        match value {
            FormValue::Text(text) => form.append_with_str(name, text),
            FormValue::File(file) => {
                let blob = bytes_to_blob(&file.bytes, &file.mime)?;
                form.append_with_blob_and_filename(name, &blob, &file.name)
            }
        }
        .map_err(|e| ClientError::from(e).in_op_with("http.form", name.clone()))?;
    }
    Ok(form)
}

#[async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let headers = Headers::new().map_err(|e| ClientError::from(e).in_op("http.headers"))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| ClientError::from(e).in_op_with("http.headers", key.clone()))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_credentials(RequestCredentials::Include);

        match &req.body {
            Some(RequestBody::Json(body)) => {
                headers
                    .set("Content-Type", "application/json")
                    .map_err(|e| ClientError::from(e).in_op("http.headers"))?;
                opts.set_body(&JsValue::from_str(body));
            }
            // multipart 的 Content-Type（含 boundary）由浏览器生成
            Some(RequestBody::Multipart(fields)) => {
                opts.set_body(&build_form(fields)?.into());
            }
            None => {}
        }
        opts.set_headers(&headers.into());

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| ClientError::from(e).in_op_with("http.request", req.url.clone()))?;

        let window = web_sys::window().ok_or_else(|| ClientError::browser("无法获取 window 对象"))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ClientError::network(format!("{:?}", e)).in_op_with("http.fetch", req.url.clone()))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ClientError::browser(format!("Response 类型转换失败: {:?}", e)))?;

        let buffer = response
            .array_buffer()
            .map_err(|e| ClientError::from(e).in_op("http.body"))?;
        let buffer = JsFuture::from(buffer)
            .await
            .map_err(|e| ClientError::network(format!("{:?}", e)).in_op("http.body"))?;

        Ok(HttpResponse {
            status: response.status(),
            body: js_sys::Uint8Array::new(&buffer).to_vec(),
        })
    }

    fn csrf_token(&self) -> Option<String> {
        super::cookie::get_cookie(CSRF_COOKIE_NAME)
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

/// 记录下来的请求
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

#[cfg(test)]
impl RecordedRequest {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
pub struct MockHttpClient {
    // (URL, Method) -> (Status, Response Body)
    responses: RefCell<HashMap<(String, HttpMethod), (u16, Vec<u8>)>>,
    // 无响应（模拟网络故障）的 URL
    unreachable: RefCell<Vec<String>>,
    csrf: Option<String>,
    pub requests: RefCell<Vec<RecordedRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            unreachable: RefCell::new(Vec::new()),
            csrf: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_csrf(mut self, token: &str) -> Self {
        self.csrf = Some(token.to_string());
        self
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.mock_bytes(method, url, status, body.to_string().into_bytes());
    }

    pub fn mock_bytes(&self, method: HttpMethod, url: &str, status: u16, body: Vec<u8>) {
        self.responses
            .borrow_mut()
            .insert((url.to_string(), method), (status, body));
    }

    pub fn mock_network_error(&self, url: &str) {
        self.unreachable.borrow_mut().push(url.to_string());
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|r| r.url == url).count()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        self.requests.borrow_mut().push(RecordedRequest {
            url: req.url.clone(),
            method: req.method,
            headers: req.headers.clone(),
            body: req.body.clone(),
        });

        if self.unreachable.borrow().iter().any(|u| *u == req.url) {
            return Err(ClientError::network("connection refused"));
        }

        let responses = self.responses.borrow();
        match responses.get(&(req.url.clone(), req.method)) {
            Some((status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(HttpResponse {
                status: 404,
                body: b"Not Found".to_vec(),
            }),
        }
    }

    fn csrf_token(&self) -> Option<String> {
        self.csrf.clone()
    }
}
