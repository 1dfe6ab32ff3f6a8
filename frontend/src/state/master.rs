//! 主数据列表与增改、状态流转
//!
//! 国家与部门共用，差异由 `MasterEntity::RESOURCE` 决定。

use leptos::prelude::*;
use maestro_shared::protocol::{
    CreateRecordRequest, ListRecordsRequest, RecordAction, RecordActionRequest,
    UpdateRecordRequest,
};
use maestro_shared::{MasterDraft, MasterEntity};

use super::loading::LoadingGuard;
use super::toast::ToastContext;
use crate::api::ApiClient;
use crate::web::HttpClient;

const LOAD_FAILED: &str = "No se pudieron cargar los registros";
const SAVE_FAILED: &str = "No se pudo guardar el registro";
const ACTION_FAILED: &str = "No se pudo completar la acción";

fn action_done(action: RecordAction) -> &'static str {
    match action {
        RecordAction::Inactivate => "Registro inactivado",
        RecordAction::Restore => "Registro restaurado",
        RecordAction::Annul => "Registro anulado",
    }
}

pub struct MasterState<E: MasterEntity> {
    pub records: RwSignal<Vec<E>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
}

impl<E: MasterEntity> Clone for MasterState<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: MasterEntity> Copy for MasterState<E> {}

impl<E: MasterEntity> Default for MasterState<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: MasterEntity> MasterState<E> {
    pub fn new() -> Self {
        Self {
            records: RwSignal::new(Vec::new()),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
        }
    }

    pub async fn load<C: HttpClient>(&self, api: &ApiClient<C>) {
        let _guard = LoadingGuard::start(self.loading);
        match api.call(&ListRecordsRequest::<E>::new()).await {
            Ok(records) => {
                let _ = self.error.try_set(None);
                let _ = self.records.try_set(records);
            }
            Err(e) => {
                log::error!("[Master:{}] Load failed: {}", E::RESOURCE.key, e);
                let _ = self.error.try_set(Some(e.user_message(LOAD_FAILED)));
            }
        }
    }

    /// 新建（`id` 为 None）或更新；本地校验失败时不发请求
    pub async fn save<C: HttpClient>(
        &self,
        api: &ApiClient<C>,
        toasts: &ToastContext,
        id: Option<String>,
        draft: MasterDraft,
    ) -> bool {
        if let Err(message) = draft.validate(E::RESOURCE.requires_parent) {
            toasts.error(message);
            return false;
        }

        let result = match &id {
            Some(id) => api
                .call(&UpdateRecordRequest::<E>::new(id.clone(), draft))
                .await
                .map(|_| "Registro actualizado"),
            None => api
                .call(&CreateRecordRequest::<E>::new(draft))
                .await
                .map(|_| "Registro creado"),
        };

        match result {
            Ok(message) => {
                toasts.success(message);
                self.load(api).await;
                true
            }
            Err(e) => {
                log::error!("[Master:{}] Save failed: {}", E::RESOURCE.key, e);
                toasts.error(e.user_message(SAVE_FAILED));
                false
            }
        }
    }

    pub async fn apply<C: HttpClient>(
        &self,
        api: &ApiClient<C>,
        toasts: &ToastContext,
        id: &str,
        action: RecordAction,
    ) -> bool {
        match api.call(&RecordActionRequest::<E>::new(id, action)).await {
            Ok(_) => {
                toasts.success(action_done(action));
                self.load(api).await;
                true
            }
            Err(e) => {
                log::error!(
                    "[Master:{}] {} failed for {}: {}",
                    E::RESOURCE.key,
                    action.as_segment(),
                    id,
                    e
                );
                toasts.error(e.user_message(ACTION_FAILED));
                false
            }
        }
    }
}
