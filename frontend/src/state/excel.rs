//! Excel 导入导出
//!
//! 三个操作共用一个 `loading` 标记，任何退出路径都会复位。
//! 结果通过提示消息反馈给用户。

use leptos::prelude::*;
use maestro_shared::ValidationSummary;
use maestro_shared::excel::{FIELD_DRY_RUN, FIELD_FILE, ImportMode, XLSX_MIME};
use serde::de::IgnoredAny;

use super::loading::LoadingGuard;
use super::toast::ToastContext;
use crate::api::ApiClient;
use crate::web::{FileSink, FileUpload, FormValue, HttpClient};

const DOWNLOAD_FAILED: &str = "No se pudo descargar el archivo Excel";
const VALIDATION_FAILED: &str = "Error en la validación";
const VALIDATION_CRASHED: &str = "Error crítico al validar el archivo";
const IMPORT_DONE: &str = "Importación completada";
const IMPORT_FAILED: &str = "Error en la importación";
const IMPORT_CRASHED: &str = "Error crítico al subir el archivo";

fn import_fields(file: FileUpload, mode: ImportMode) -> Vec<(String, FormValue)> {
    vec![
        (FIELD_FILE.to_string(), FormValue::File(file)),
        (
            FIELD_DRY_RUN.to_string(),
            FormValue::Text(mode.dry_run_value().to_string()),
        ),
    ]
}

#[derive(Clone, Copy)]
pub struct ExcelContext {
    pub loading: RwSignal<bool>,
}

impl Default for ExcelContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExcelContext {
    pub fn new() -> Self {
        Self {
            loading: RwSignal::new(false),
        }
    }

    /// 下载文件并交给 `sink` 保存
    pub async fn download_excel<C: HttpClient, F: FileSink>(
        &self,
        api: &ApiClient<C>,
        toasts: &ToastContext,
        sink: &F,
        url: &str,
        filename: &str,
    ) -> bool {
        let _guard = LoadingGuard::start(self.loading);

        let result = match api.download(url).await {
            Ok(bytes) => sink.save(&bytes, filename, XLSX_MIME),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                log::error!("[Excel] Download error: {}", e);
                toasts.error(DOWNLOAD_FAILED);
                false
            }
        }
    }

    /// 试运行：只校验不导入
    pub async fn validate_excel<C: HttpClient>(
        &self,
        api: &ApiClient<C>,
        toasts: &ToastContext,
        url: &str,
        file: FileUpload,
    ) -> Option<ValidationSummary> {
        let _guard = LoadingGuard::start(self.loading);

        let fields = import_fields(file, ImportMode::DryRun);
        match api.post_multipart::<ValidationSummary>(url, fields).await {
            Ok(envelope) => Some(envelope.data.unwrap_or_default()),
            Err(e) if e.is_rejected() => {
                log::warn!("[Excel] Validation rejected: {}", e);
                toasts.error(e.user_message(VALIDATION_FAILED));
                None
            }
            Err(e) => {
                log::error!("[Excel] Validation error: {}", e);
                toasts.error(VALIDATION_CRASHED);
                None
            }
        }
    }

    /// 正式导入
    pub async fn upload_excel<C: HttpClient>(
        &self,
        api: &ApiClient<C>,
        toasts: &ToastContext,
        url: &str,
        file: FileUpload,
    ) -> bool {
        let _guard = LoadingGuard::start(self.loading);

        let fields = import_fields(file, ImportMode::Commit);
        match api.post_multipart::<IgnoredAny>(url, fields).await {
            Ok(envelope) => {
                let message = envelope
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| IMPORT_DONE.to_string());
                toasts.success(message);
                true
            }
            Err(e) if e.is_rejected() => {
                log::warn!("[Excel] Import rejected: {}", e);
                toasts.error(e.user_message(IMPORT_FAILED));
                false
            }
            Err(e) => {
                log::error!("[Excel] Upload error: {}", e);
                toasts.error(IMPORT_CRASHED);
                false
            }
        }
    }
}

pub fn use_excel() -> ExcelContext {
    use_context::<ExcelContext>().expect("ExcelContext should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::toast::ToastLevel;
    use crate::web::{MockFileSink, MockHttpClient, RequestBody};
    use maestro_shared::{HEADER_CSRF_TOKEN, HttpMethod};
    use serde_json::json;

    const IMPORT_URL: &str = "http://api.test/config/master/country/import/";

    fn sample_file() -> FileUpload {
        FileUpload {
            name: "paises.xlsx".into(),
            mime: XLSX_MIME.into(),
            bytes: vec![0x50, 0x4b, 0x03, 0x04],
        }
    }

    fn setup(client: MockHttpClient) -> (ApiClient<MockHttpClient>, ExcelContext, ToastContext) {
        (
            ApiClient::new("http://api.test", client),
            ExcelContext::new(),
            ToastContext::new(),
        )
    }

    fn dry_run_flag(body: &Option<RequestBody>) -> Option<String> {
        match body {
            Some(RequestBody::Multipart(fields)) => fields.iter().find_map(|(k, v)| match v {
                FormValue::Text(t) if k == FIELD_DRY_RUN => Some(t.clone()),
                _ => None,
            }),
            _ => None,
        }
    }

    fn last_toast(toasts: &ToastContext) -> (ToastLevel, String) {
        let list = toasts.toasts.get_untracked();
        let toast = list.last().unwrap();
        (toast.level, toast.message.clone())
    }

    #[tokio::test]
    async fn test_validate_sends_dry_run_and_csrf() {
        let owner = Owner::new();
        owner.set();
        let client = MockHttpClient::new().with_csrf("tok");
        client.mock_response(
            HttpMethod::Post,
            IMPORT_URL,
            200,
            json!({
                "status": "success",
                "data": {
                    "rows": [{"row": 2, "data": {"code": "PE"}, "errors": ["Duplicado"]}],
                    "total": 1,
                    "has_errors": true
                }
            }),
        );
        let (api, excel, toasts) = setup(client);

        let summary = excel
            .validate_excel(&api, &toasts, IMPORT_URL, sample_file())
            .await
            .unwrap();
        assert!(summary.has_errors);
        assert_eq!(summary.error_count(), 1);
        assert!(!excel.loading.get_untracked());

        let req = api.client().last_request().unwrap();
        assert_eq!(dry_run_flag(&req.body).as_deref(), Some("true"));
        assert_eq!(req.header(HEADER_CSRF_TOKEN), Some("tok"));
        match &req.body {
            Some(RequestBody::Multipart(fields)) => {
                assert!(matches!(&fields[0], (k, FormValue::File(f)) if k == FIELD_FILE && f.name == "paises.xlsx"));
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_validate_rejection_uses_server_message() {
        let owner = Owner::new();
        owner.set();
        let client = MockHttpClient::new();
        client.mock_response(
            HttpMethod::Post,
            IMPORT_URL,
            400,
            json!({"status": "error", "message": "Formato inválido"}),
        );
        let (api, excel, toasts) = setup(client);

        let summary = excel
            .validate_excel(&api, &toasts, IMPORT_URL, sample_file())
            .await;
        assert!(summary.is_none());
        assert_eq!(
            last_toast(&toasts),
            (ToastLevel::Error, "Formato inválido".to_string())
        );
        assert!(!excel.loading.get_untracked());
    }

    #[tokio::test]
    async fn test_upload_commits_and_reports_success() {
        let owner = Owner::new();
        owner.set();
        let client = MockHttpClient::new();
        client.mock_response(HttpMethod::Post, IMPORT_URL, 200, json!({"status": "success"}));
        let (api, excel, toasts) = setup(client);

        assert!(excel.upload_excel(&api, &toasts, IMPORT_URL, sample_file()).await);
        assert_eq!(
            last_toast(&toasts),
            (ToastLevel::Success, IMPORT_DONE.to_string())
        );

        let req = api.client().last_request().unwrap();
        assert_eq!(dry_run_flag(&req.body).as_deref(), Some("false"));
        assert_eq!(req.header(HEADER_CSRF_TOKEN), Some(""));
    }

    #[tokio::test]
    async fn test_upload_network_failure() {
        let owner = Owner::new();
        owner.set();
        let client = MockHttpClient::new();
        client.mock_network_error(IMPORT_URL);
        let (api, excel, toasts) = setup(client);

        assert!(!excel.upload_excel(&api, &toasts, IMPORT_URL, sample_file()).await);
        assert_eq!(
            last_toast(&toasts),
            (ToastLevel::Error, IMPORT_CRASHED.to_string())
        );
        assert!(!excel.loading.get_untracked());
    }

    #[tokio::test]
    async fn test_download_saves_or_reports() {
        let owner = Owner::new();
        owner.set();
        let client = MockHttpClient::new();
        client.mock_bytes(
            HttpMethod::Get,
            "http://api.test/config/master/country/export/",
            200,
            vec![1, 2, 3],
        );
        let (api, excel, toasts) = setup(client);
        let sink = MockFileSink::default();

        assert!(
            excel
                .download_excel(&api, &toasts, &sink, "/config/master/country/export/", "country.xlsx")
                .await
        );
        assert_eq!(*sink.saved.borrow(), vec![("country.xlsx".to_string(), 3)]);

        assert!(
            !excel
                .download_excel(&api, &toasts, &sink, "/config/master/country/template/", "plantilla_country.xlsx")
                .await
        );
        assert_eq!(
            last_toast(&toasts),
            (ToastLevel::Error, DOWNLOAD_FAILED.to_string())
        );
        assert_eq!(sink.saved.borrow().len(), 1);
        assert!(!excel.loading.get_untracked());
    }
}
