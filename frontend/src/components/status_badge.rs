use leptos::prelude::*;
use maestro_shared::status::badge_for;

use crate::state::status::use_status;

/// 状态徽标：按状态字典显示名称与颜色，未知时显示占位
#[component]
pub fn StatusBadge(status_id: Option<String>) -> impl IntoView {
    let statuses = use_status();

    status_id.map(|id| {
        let badge = Signal::derive(move || badge_for(statuses.get_status(&id).as_ref()));
        view! {
            <span
                class="inline-flex items-center px-1 py-1 text-[11px] font-bold uppercase tracking-widest transition-colors duration-300"
                style=move || badge.with(|(_, color)| format!("color: {}", color))
            >
                {move || badge.with(|(label, _)| label.clone())}
            </span>
        }
    })
}
