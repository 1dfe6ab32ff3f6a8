use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::components::icons::MailCheck;
use crate::components::login::FormError;
use crate::state::auth::{pending_verification, verify_email};
use crate::state::toast::use_toast;
use crate::web::LocalStorage;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
pub fn VerifyPage() -> impl IntoView {
    let api = use_api();
    let router = use_router();
    let toasts = use_toast();

    let email = pending_verification(&LocalStorage);
    let (code, set_code) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let value = code.get().trim().to_string();
        if value.is_empty() {
            set_error_msg.set(Some("Ingrese el código recibido".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            match verify_email(&api, &LocalStorage, value).await {
                Ok(()) => {
                    toasts.success("Correo verificado, ya puede ingresar");
                    router.navigate(AppRoute::Login.to_path());
                }
                Err(message) => {
                    let _ = set_error_msg.try_set(Some(message));
                }
            }
            let _ = set_is_submitting.try_set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="flex flex-col items-center gap-2 mb-4 text-center">
                    <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                        <MailCheck attr:class="h-8 w-8" />
                    </div>
                    <h1 class="text-3xl font-bold">"Verificar correo"</h1>
                    {match email {
                        Some(address) => view! {
                            <p class="text-base-content/70">
                                "Enviamos un código a " <span class="font-semibold">{address}</span>
                            </p>
                        }.into_any(),
                        None => view! {
                            <p class="text-warning">"No hay un registro pendiente de verificación"</p>
                        }.into_any(),
                    }}
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <FormError message=error_msg />
                        <div class="form-control">
                            <label class="label" for="code">
                                <span class="label-text">"Código de verificación"</span>
                            </label>
                            <input
                                id="code"
                                type="text"
                                inputmode="numeric"
                                autocomplete="one-time-code"
                                on:input=move |ev| set_code.set(event_target_value(&ev))
                                prop:value=code
                                class="input input-bordered font-mono tracking-widest text-center"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Verificando..." }.into_any()
                                } else {
                                    "Verificar".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center">
                            <Link to="/register" class="link">"Volver al registro"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
