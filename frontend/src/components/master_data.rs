//! 主数据页面（国家、部门共用）
//!
//! 页面按 `MasterEntity::RESOURCE` 生成：列表、新建/编辑表单、状态流转按钮、
//! Excel 导出/模板下载/导入。所有按钮都按权限显示。

use chrono::{DateTime, Utc};
use leptos::prelude::*;
use leptos::task::spawn_local;
use maestro_shared::protocol::RecordAction;
use maestro_shared::{Country, MasterDraft, MasterEntity, MasterResource, ValidationSummary};

use crate::api::{ApiClient, use_api};
use crate::components::icons::*;
use crate::components::status_badge::StatusBadge;
use crate::state::auth::{AuthContext, use_auth};
use crate::state::excel::use_excel;
use crate::state::master::MasterState;
use crate::state::toast::use_toast;
use crate::web::{BrowserDownload, FileUpload, read_file};

fn format_timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|dt| dt.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// 打开/关闭原生 `<dialog>`
fn bind_dialog(dialog_ref: NodeRef<leptos::html::Dialog>, open: RwSignal<bool>) {
    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });
}

// =========================================================
// 新建 / 编辑表单
// =========================================================

#[derive(Clone, Copy)]
struct FormState {
    open: RwSignal<bool>,
    editing: RwSignal<Option<String>>,
    code: RwSignal<String>,
    name: RwSignal<String>,
    country_id: RwSignal<String>,
}

impl FormState {
    fn new() -> Self {
        Self {
            open: RwSignal::new(false),
            editing: RwSignal::new(None),
            code: RwSignal::new(String::new()),
            name: RwSignal::new(String::new()),
            country_id: RwSignal::new(String::new()),
        }
    }

    fn open_with(&self, id: Option<String>, draft: MasterDraft) {
        self.editing.set(id);
        self.code.set(draft.code);
        self.name.set(draft.name);
        self.country_id.set(draft.country_id.unwrap_or_default());
        self.open.set(true);
    }

    fn draft(&self) -> MasterDraft {
        let country_id = self.country_id.get_untracked();
        MasterDraft {
            code: self.code.get_untracked().trim().to_string(),
            name: self.name.get_untracked().trim().to_string(),
            country_id: (!country_id.is_empty()).then_some(country_id),
        }
    }
}

fn record_form<E: MasterEntity>(
    form: FormState,
    state: MasterState<E>,
    api: StoredValue<ApiClient>,
) -> impl IntoView {
    let resource = E::RESOURCE;
    let toasts = use_toast();
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();
    bind_dialog(dialog_ref, form.open);

    let requires_country = resource.requires_parent;
    let countries = MasterState::<Country>::new();
    if requires_country {
        spawn_local(async move {
            countries.load(&api.get_value()).await;
        });
    }

    let (saving, set_saving) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_saving.set(true);
        let id = form.editing.get_untracked();
        let draft = form.draft();
        spawn_local(async move {
            if state.save(&api.get_value(), &toasts, id, draft).await {
                let _ = form.open.try_set(false);
            }
            let _ = set_saving.try_set(false);
        });
    };

    let title = move || {
        let verb = if form.editing.get().is_some() { "Editar" } else { "Nuevo" };
        format!("{} {}", verb, resource.singular)
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| form.open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">{title}</h3>
                <form on:submit=on_submit class="space-y-4 mt-4">
                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label for="code" class="label">
                                <span class="label-text">"Código"</span>
                            </label>
                            <input
                                id="code"
                                class="input input-bordered font-mono"
                                prop:value=form.code
                                on:input=move |ev| form.code.set(event_target_value(&ev))
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label for="name" class="label">
                                <span class="label-text">"Nombre"</span>
                            </label>
                            <input
                                id="name"
                                class="input input-bordered"
                                prop:value=form.name
                                on:input=move |ev| form.name.set(event_target_value(&ev))
                                required
                            />
                        </div>
                    </div>

                    <Show when=move || requires_country>
                        <div class="form-control">
                            <label for="country" class="label">
                                <span class="label-text">"País"</span>
                            </label>
                            <select
                                id="country"
                                class="select select-bordered"
                                prop:value=form.country_id
                                on:change=move |ev| form.country_id.set(event_target_value(&ev))
                            >
                                <option value="">"Seleccione un país"</option>
                                <For
                                    each=move || countries.records.get()
                                    key=|c| c.id.clone()
                                    children=move |country| {
                                        let selected = form.country_id.get_untracked() == country.id;
                                        view! {
                                            <option value=country.id.clone() selected=selected>
                                                {country.name.clone()}
                                            </option>
                                        }
                                    }
                                />
                            </select>
                        </div>
                    </Show>

                    <div class="modal-action">
                        <button type="button" class="btn" on:click=move |_| form.open.set(false)>
                            "Cancelar"
                        </button>
                        <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                            <Show when=move || saving.get()>
                                <span class="loading loading-spinner"></span>
                            </Show>
                            "Guardar"
                        </button>
                    </div>
                </form>
            </div>
        </dialog>
    }
}

// =========================================================
// Excel 导入
// =========================================================

fn import_dialog<E: MasterEntity>(
    open: RwSignal<bool>,
    state: MasterState<E>,
    api: StoredValue<ApiClient>,
) -> impl IntoView {
    let resource: MasterResource = E::RESOURCE;
    let toasts = use_toast();
    let excel = use_excel();
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();
    bind_dialog(dialog_ref, open);

    let selected = RwSignal::new(Option::<FileUpload>::None);
    let summary = RwSignal::new(Option::<ValidationSummary>::None);

    let reset = move || {
        selected.set(None);
        summary.set(None);
    };

    let on_file = move |ev: leptos::ev::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        input.set_value("");
        reset();

        spawn_local(async move {
            let upload = match read_file(&file).await {
                Ok(upload) => upload,
                Err(e) => {
                    log::error!("[Import] {}", e);
                    toasts.error("No se pudo leer el archivo");
                    return;
                }
            };
            let result = excel
                .validate_excel(&api.get_value(), &toasts, &resource.import_path(), upload.clone())
                .await;
            if let Some(result) = result {
                let _ = selected.try_set(Some(upload));
                let _ = summary.try_set(Some(result));
            }
        });
    };

    let on_confirm = move |_| {
        let Some(upload) = selected.get_untracked() else {
            return;
        };
        spawn_local(async move {
            let api = api.get_value();
            if excel
                .upload_excel(&api, &toasts, &resource.import_path(), upload)
                .await
            {
                let _ = open.try_set(false);
                state.load(&api).await;
            }
        });
    };

    let can_commit = move || {
        summary.with(|s| s.as_ref().is_some_and(|s| !s.has_errors && s.total > 0))
            && !excel.loading.get()
    };

    view! {
        <dialog
            class="modal"
            node_ref=dialog_ref
            on:close=move |_| {
                open.set(false);
                reset();
            }
        >
            <div class="modal-box w-11/12 max-w-5xl">
                <h3 class="font-bold text-lg">"Importar " {resource.title}</h3>
                <p class="py-2 text-base-content/70">
                    "El archivo se valida antes de importar. Solo se importa si no hay errores."
                </p>

                <input
                    type="file"
                    accept=".xlsx"
                    class="file-input file-input-bordered w-full"
                    disabled=move || excel.loading.get()
                    on:change=on_file
                />

                <Show when=move || excel.loading.get()>
                    <div class="flex items-center gap-2 py-4">
                        <span class="loading loading-spinner loading-md"></span>
                        "Procesando..."
                    </div>
                </Show>

                {move || summary.get().map(validation_table)}

                <div class="modal-action">
                    <button type="button" class="btn" on:click=move |_| open.set(false)>
                        "Cerrar"
                    </button>
                    <button type="button" class="btn btn-primary gap-2" disabled=move || !can_commit() on:click=on_confirm>
                        <Upload attr:class="h-4 w-4" /> "Importar"
                    </button>
                </div>
            </div>
        </dialog>
    }
}

fn validation_table(summary: ValidationSummary) -> impl IntoView {
    let columns = summary.columns();
    let header = columns.clone();
    let errors = summary.error_count();
    let total = summary.total;
    let rows = summary.rows;

    view! {
        <div class="space-y-2 mt-4">
            <div class="flex gap-2">
                <span class="badge badge-neutral">{format!("{} filas", total)}</span>
                {(errors > 0).then(|| view! {
                    <span class="badge badge-error">{format!("{} con errores", errors)}</span>
                })}
            </div>
            <div class="overflow-x-auto max-h-96">
                <table class="table table-zebra table-xs w-full">
                    <thead>
                        <tr>
                            <th>"Fila"</th>
                            {header.into_iter().map(|c| view! { <th>{c}</th> }).collect_view()}
                            <th>"Errores"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {rows
                            .into_iter()
                            .map(|row| {
                                let cells = columns
                                    .iter()
                                    .map(|c| {
                                        let text = match row.data.get(c) {
                                            Some(serde_json::Value::String(s)) => s.clone(),
                                            Some(serde_json::Value::Null) | None => String::new(),
                                            Some(other) => other.to_string(),
                                        };
                                        view! { <td>{text}</td> }
                                    })
                                    .collect_view();
                                let class = if row.is_valid() { "" } else { "text-error" };
                                view! {
                                    <tr class=class>
                                        <td>{row.row}</td>
                                        {cells}
                                        <td>{row.errors.join("; ")}</td>
                                    </tr>
                                }
                            })
                            .collect_view()}
                    </tbody>
                </table>
            </div>
        </div>
    }
}

// =========================================================
// 页面
// =========================================================

fn row_actions<E: MasterEntity>(
    record: &E,
    auth: AuthContext,
    form: FormState,
    run: impl Fn(String, RecordAction) + Copy + Send + Sync + 'static,
) -> AnyView {
    let perms = E::RESOURCE.permissions;
    let id = record.id().to_string();
    let draft = record.to_draft();

    let item = move |action: RecordAction, label: &'static str, class: &'static str, icon: AnyView| {
        let id = id.clone();
        view! {
            <li>
                <a class=class on:click=move |_| run(id.clone(), action)>
                    {icon} {label}
                </a>
            </li>
        }
    };

    let edit_id = record.id().to_string();
    view! {
        <div class="dropdown dropdown-end">
            <div tabindex="0" role="button" class="btn btn-ghost btn-sm btn-square">
                <Pencil attr:class="h-4 w-4" />
            </div>
            <ul tabindex="0" class="dropdown-content z-[1] menu p-2 shadow bg-base-200 rounded-box w-52">
                {auth.can(perms.update).then(|| view! {
                    <li>
                        <a on:click=move |_| form.open_with(Some(edit_id.clone()), draft.clone())>
                            <Pencil attr:class="mr-2 h-4 w-4" /> "Editar"
                        </a>
                    </li>
                })}
                {auth.can(perms.inactivate).then(|| item(
                    RecordAction::Inactivate,
                    "Inactivar",
                    "text-warning",
                    view! { <Ban attr:class="mr-2 h-4 w-4" /> }.into_any(),
                ))}
                {auth.can(perms.restore).then(|| item(
                    RecordAction::Restore,
                    "Restaurar",
                    "",
                    view! { <RotateCcw attr:class="mr-2 h-4 w-4" /> }.into_any(),
                ))}
                {auth.can(perms.annul).then(|| item(
                    RecordAction::Annul,
                    "Anular",
                    "text-error hover:bg-error/10",
                    view! { <XCircle attr:class="mr-2 h-4 w-4" /> }.into_any(),
                ))}
            </ul>
        </div>
    }
    .into_any()
}

/// 主数据页面
pub fn master_page<E: MasterEntity>() -> impl IntoView {
    let resource = E::RESOURCE;
    let perms = resource.permissions;
    let auth = use_auth();
    let toasts = use_toast();
    let excel = use_excel();
    let api = StoredValue::new(use_api());

    let state = MasterState::<E>::new();
    let form = FormState::new();
    let import_open = RwSignal::new(false);

    let load = move || {
        spawn_local(async move {
            state.load(&api.get_value()).await;
        });
    };
    load();

    let run_action = move |id: String, action: RecordAction| {
        spawn_local(async move {
            state.apply(&api.get_value(), &toasts, &id, action).await;
        });
    };

    let download = move |path: String, filename: String| {
        spawn_local(async move {
            excel
                .download_excel(&api.get_value(), &toasts, &BrowserDownload, &path, &filename)
                .await;
        });
    };

    let has_parent = resource.requires_parent;
    let columns = if has_parent { 6 } else { 5 };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="flex flex-wrap items-center justify-between gap-2 p-6 pb-2">
                    <div>
                        <h3 class="card-title">{resource.title}</h3>
                        <p class="text-base-content/70 text-sm">
                            {move || format!("{} registros", state.records.with(|r| r.len()))}
                        </p>
                    </div>
                    <div class="flex flex-wrap gap-2">
                        <button
                            on:click=move |_| load()
                            disabled=move || state.loading.get()
                            class="btn btn-ghost btn-circle"
                        >
                            <RefreshCw attr:class=move || if state.loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                        </button>
                        <Show when=move || auth.can(perms.template)>
                            <button
                                class="btn btn-outline gap-2"
                                disabled=move || excel.loading.get()
                                on:click=move |_| download(resource.template_path(), resource.template_filename())
                            >
                                <FileSpreadsheet attr:class="h-4 w-4" /> "Plantilla"
                            </button>
                        </Show>
                        <Show when=move || auth.can(perms.export)>
                            <button
                                class="btn btn-outline gap-2"
                                disabled=move || excel.loading.get()
                                on:click=move |_| download(resource.export_path(), resource.export_filename())
                            >
                                <Download attr:class="h-4 w-4" /> "Exportar"
                            </button>
                        </Show>
                        <Show when=move || auth.can(perms.import)>
                            <button class="btn btn-outline gap-2" on:click=move |_| import_open.set(true)>
                                <Upload attr:class="h-4 w-4" /> "Importar"
                            </button>
                        </Show>
                        <Show when=move || auth.can(perms.create)>
                            <button
                                class="btn btn-primary gap-2"
                                on:click=move |_| form.open_with(None, MasterDraft::default())
                            >
                                <Plus attr:class="h-4 w-4" /> "Nuevo"
                            </button>
                        </Show>
                    </div>
                </div>

                <Show when=move || state.error.get().is_some()>
                    <div role="alert" class="alert alert-error mx-6">
                        <span>{move || state.error.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Código"</th>
                                <th>"Nombre"</th>
                                {has_parent.then(|| view! { <th>"País"</th> })}
                                <th class="text-center">"Estado"</th>
                                <th class="hidden md:table-cell">"Actualizado"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || state.records.with(|r| r.is_empty()) && !state.loading.get()>
                                <tr>
                                    <td colspan=columns.to_string() class="text-center py-8 text-base-content/50">
                                        "No hay registros."
                                    </td>
                                </tr>
                            </Show>
                            <Show when=move || state.loading.get() && state.records.with(|r| r.is_empty())>
                                <tr>
                                    <td colspan=columns.to_string() class="text-center py-8 text-base-content/50">
                                        <span class="loading loading-spinner loading-md"></span> " Cargando..."
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=move || state.records.get()
                                key=|r| (r.id().to_string(), r.updated_at(), r.status_id().map(str::to_string))
                                children=move |record| {
                                    let actions = row_actions(&record, auth, form, run_action);
                                    view! {
                                        <tr>
                                            <td class="font-mono text-sm font-bold">{record.code().to_string()}</td>
                                            <td>{record.name().to_string()}</td>
                                            {has_parent.then(|| view! {
                                                <td>{record.parent_label().unwrap_or("-").to_string()}</td>
                                            })}
                                            <td class="text-center">
                                                <StatusBadge status_id=record.status_id().map(str::to_string) />
                                            </td>
                                            <td class="hidden md:table-cell text-xs opacity-70">
                                                {format_timestamp(record.updated_at())}
                                            </td>
                                            <td>{actions}</td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>

        {record_form::<E>(form, state, api)}
        {import_dialog::<E>(import_open, state, api)}
    }
}
