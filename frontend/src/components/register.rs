use leptos::prelude::*;
use leptos::task::spawn_local;
use maestro_shared::protocol::RegisterRequest;

use crate::api::use_api;
use crate::components::icons::UserPlus;
use crate::components::login::FormError;
use crate::state::auth::register;
use crate::web::LocalStorage;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
fn TextField(
    id: &'static str,
    label: &'static str,
    #[prop(default = "text")] kind: &'static str,
    value: RwSignal<String>,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=kind
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=value
                class="input input-bordered"
                required
            />
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let api = use_api();
    let router = use_router();

    let username = RwSignal::new(String::new());
    let name = RwSignal::new(String::new());
    let last_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());

    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if password.get() != confirm.get() {
            set_error_msg.set(Some("Las contraseñas no coinciden".to_string()));
            return;
        }

        let form = RegisterRequest {
            username: username.get().trim().to_string(),
            name: name.get().trim().to_string(),
            last_name: last_name.get().trim().to_string(),
            email: email.get().trim().to_string(),
            password: password.get(),
        };

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            match register(&api, &LocalStorage, form).await {
                Ok(()) => router.navigate(AppRoute::Verify.to_path()),
                Err(message) => {
                    let _ = set_error_msg.try_set(Some(message));
                }
            }
            let _ = set_is_submitting.try_set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-lg">
                <div class="flex flex-col items-center gap-2 mb-4">
                    <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                        <UserPlus attr:class="h-8 w-8" />
                    </div>
                    <h1 class="text-3xl font-bold">"Crear cuenta"</h1>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <FormError message=error_msg />

                        <TextField id="username" label="Usuario" value=username />
                        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                            <TextField id="name" label="Nombres" value=name />
                            <TextField id="last_name" label="Apellidos" value=last_name />
                        </div>
                        <TextField id="email" label="Correo electrónico" kind="email" value=email />
                        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                            <TextField id="password" label="Contraseña" kind="password" value=password />
                            <TextField id="confirm" label="Confirmar contraseña" kind="password" value=confirm />
                        </div>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Registrando..." }.into_any()
                                } else {
                                    "Registrarse".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center text-base-content/70">
                            "¿Ya tiene cuenta? "
                            <Link to="/login" class="link link-primary">"Ingrese"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
