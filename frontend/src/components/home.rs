use leptos::prelude::*;
use maestro_shared::MasterResource;
use maestro_shared::master::{COUNTRY_RESOURCE, DEPARTMENT_RESOURCE};

use crate::components::icons::{Building, Globe};
use crate::state::auth::use_auth;
use crate::state::notifications::use_notifications;
use crate::state::status::use_status;
use crate::web::router::Link;

#[component]
fn ResourceCard(resource: MasterResource, children: Children) -> impl IntoView {
    view! {
        <Link to=resource.route class="card bg-base-100 shadow-xl hover:shadow-2xl transition-shadow">
            <div class="card-body flex-row items-center gap-4">
                <div class="p-3 bg-primary/10 rounded-2xl text-primary">{children()}</div>
                <div>
                    <h3 class="card-title">{resource.title}</h3>
                    <p class="text-base-content/70 text-sm">"Datos maestros"</p>
                </div>
            </div>
        </Link>
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let notifications = use_notifications();
    let statuses = use_status();

    let full_name = move || {
        auth.session.with(|s| {
            s.as_ref()
                .map(|s| s.user_info.full_name())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| auth.display_name())
        })
    };

    view! {
        <div class="space-y-8">
            <div>
                <h2 class="text-2xl font-bold">"Bienvenido, " {full_name}</h2>
                <p class="text-base-content/70">"Panel de administración"</p>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-title">"Notificaciones sin leer"</div>
                    <div class="stat-value text-primary">{move || notifications.unread()}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Conexión en tiempo real"</div>
                    <div class="stat-value text-2xl">
                        {move || notifications.state.get().label()}
                    </div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Estados registrados"</div>
                    <div class="stat-value text-secondary">
                        {move || statuses.statuses.with(|s| s.len())}
                    </div>
                    <Show when=move || statuses.error.get().is_some()>
                        <div class="stat-desc text-error">
                            {move || statuses.error.get().unwrap_or_default()}
                        </div>
                    </Show>
                </div>
            </div>

            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                <Show when=move || auth.can(COUNTRY_RESOURCE.permissions.get)>
                    <ResourceCard resource=COUNTRY_RESOURCE>
                        <Globe attr:class="h-6 w-6" />
                    </ResourceCard>
                </Show>
                <Show when=move || auth.can(DEPARTMENT_RESOURCE.permissions.get)>
                    <ResourceCard resource=DEPARTMENT_RESOURCE>
                        <Building attr:class="h-6 w-6" />
                    </ResourceCard>
                </Show>
            </div>
        </div>
    }
}
