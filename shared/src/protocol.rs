use std::borrow::Cow;
use std::marker::PhantomData;

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::master::{MasterDraft, MasterEntity};
use crate::session::SessionPayload;
use crate::status::Status;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// 会修改服务端状态的方法需要携带 CSRF 令牌
    pub fn is_state_changing(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// The request value itself is the JSON body; unit requests serialize to
/// `null` and are sent without a body.
pub trait ApiRequest: Serialize {
    /// The type found in the envelope's `data` field.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path, relative to the API base.
    fn path(&self) -> Cow<'static, str>;
}

/// Standard response envelope: `{status, data, message}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub status: String,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub const SUCCESS: &'static str = "success";

    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }
}

// =========================================================
// Auth
// =========================================================

/// Verify the cookie session
#[derive(Debug, Serialize)]
pub struct SessionCheckRequest;

impl ApiRequest for SessionCheckRequest {
    type Response = SessionPayload;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/auth/session/")
    }
}

#[derive(Debug, Serialize)]
pub struct LogoutRequest;

impl ApiRequest for LogoutRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/auth/logout/")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = SessionPayload;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/auth/login/")
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl ApiRequest for RegisterRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/auth/register/")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub code: String,
}

impl ApiRequest for VerifyEmailRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/auth/verify/")
    }
}

// =========================================================
// Config
// =========================================================

#[derive(Debug, Serialize)]
pub struct ListStatusesRequest;

impl ApiRequest for ListStatusesRequest {
    type Response = Vec<Status>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/config/status/all/")
    }
}

// =========================================================
// Master data
// =========================================================

/// List every record of a master resource
#[derive(Debug, Serialize)]
#[serde(bound = "")]
pub struct ListRecordsRequest<E> {
    #[serde(skip)]
    _entity: PhantomData<E>,
}

impl<E> ListRecordsRequest<E> {
    pub fn new() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

impl<E> Default for ListRecordsRequest<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: MasterEntity> ApiRequest for ListRecordsRequest<E> {
    type Response = Vec<E>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> Cow<'static, str> {
        Cow::Owned(E::RESOURCE.collection_path())
    }
}

#[derive(Debug, Serialize)]
#[serde(bound = "")]
pub struct CreateRecordRequest<E> {
    #[serde(flatten)]
    pub draft: MasterDraft,
    #[serde(skip)]
    _entity: PhantomData<E>,
}

impl<E> CreateRecordRequest<E> {
    pub fn new(draft: MasterDraft) -> Self {
        Self {
            draft,
            _entity: PhantomData,
        }
    }
}

impl<E: MasterEntity> ApiRequest for CreateRecordRequest<E> {
    // 修改后会重新拉取列表，不依赖返回体
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> Cow<'static, str> {
        Cow::Owned(E::RESOURCE.collection_path())
    }
}

#[derive(Debug, Serialize)]
#[serde(bound = "")]
pub struct UpdateRecordRequest<E> {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub draft: MasterDraft,
    #[serde(skip)]
    _entity: PhantomData<E>,
}

impl<E> UpdateRecordRequest<E> {
    pub fn new(id: impl Into<String>, draft: MasterDraft) -> Self {
        Self {
            id: id.into(),
            draft,
            _entity: PhantomData,
        }
    }
}

impl<E: MasterEntity> ApiRequest for UpdateRecordRequest<E> {
    // 修改后会重新拉取列表，不依赖返回体
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> Cow<'static, str> {
        Cow::Owned(E::RESOURCE.record_path(&self.id))
    }
}

/// 记录状态流转动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAction {
    Inactivate,
    Restore,
    Annul,
}

impl RecordAction {
    pub fn as_segment(&self) -> &'static str {
        match self {
            RecordAction::Inactivate => "inactivate",
            RecordAction::Restore => "restore",
            RecordAction::Annul => "annul",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(bound = "")]
pub struct RecordActionRequest<E> {
    #[serde(skip)]
    pub id: String,
    #[serde(skip)]
    pub action: RecordAction,
    #[serde(skip)]
    _entity: PhantomData<E>,
}

impl<E> RecordActionRequest<E> {
    pub fn new(id: impl Into<String>, action: RecordAction) -> Self {
        Self {
            id: id.into(),
            action,
            _entity: PhantomData,
        }
    }
}

impl<E: MasterEntity> ApiRequest for RecordActionRequest<E> {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> Cow<'static, str> {
        Cow::Owned(format!(
            "{}{}/",
            E::RESOURCE.record_path(&self.id),
            self.action.as_segment()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::master::{Country, Department};
    use serde_json::json;

    #[test]
    fn test_envelope_success_flag() {
        let ok: ApiEnvelope<Vec<Status>> =
            serde_json::from_value(json!({ "status": "success", "data": [] })).unwrap();
        assert!(ok.is_success());

        let failed: ApiEnvelope<Vec<Status>> =
            serde_json::from_value(json!({ "status": "error", "message": "boom" })).unwrap();
        assert!(!failed.is_success());
        assert!(failed.data.is_none());
        assert_eq!(failed.message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_master_paths() {
        assert_eq!(
            ListRecordsRequest::<Country>::new().path(),
            "/config/master/country/"
        );
        assert_eq!(
            UpdateRecordRequest::<Department>::new("42", MasterDraft::default()).path(),
            "/config/master/department/42/"
        );
        assert_eq!(
            RecordActionRequest::<Country>::new("9", RecordAction::Annul).path(),
            "/config/master/country/9/annul/"
        );
    }

    #[test]
    fn test_unit_requests_serialize_to_null() {
        assert_eq!(serde_json::to_value(LogoutRequest).unwrap(), json!(null));
        assert_eq!(
            serde_json::to_value(RecordActionRequest::<Country>::new("1", RecordAction::Restore))
                .unwrap(),
            json!({})
        );
    }

    #[test]
    fn test_update_body_excludes_id() {
        let draft = MasterDraft {
            code: "PE".into(),
            name: "Perú".into(),
            country_id: None,
        };
        let body = serde_json::to_value(UpdateRecordRequest::<Country>::new("3", draft)).unwrap();
        assert_eq!(body, json!({ "code": "PE", "name": "Perú" }));
    }

    #[test]
    fn test_only_get_is_safe() {
        assert!(!HttpMethod::Get.is_state_changing());
        assert!(HttpMethod::Post.is_state_changing());
        assert!(HttpMethod::Put.is_state_changing());
        assert!(HttpMethod::Delete.is_state_changing());
    }
}
