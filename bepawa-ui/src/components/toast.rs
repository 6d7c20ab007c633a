//! Toast Component
//!
//! Renders the notifier's stack in the bottom-right corner.

use leptos::*;

use crate::state::{use_notifier, Notice, NoticeKind};

/// Toast stack
#[component]
pub fn Toast() -> impl IntoView {
    let notifier = use_notifier();

    view! {
        <div class="fixed bottom-6 right-4 z-50 space-y-2 w-80">
            <For
                each=move || notifier.notices().get()
                key=|notice| notice.id
                children=move |notice: Notice| {
                    let id = notice.id;
                    let (icon, bg_class) = match notice.kind {
                        NoticeKind::Success => ("✓", "bg-green-600"),
                        NoticeKind::Error => ("✕", "bg-red-600"),
                    };

                    view! {
                        <div class=format!(
                            "flex items-start space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg animate-slide-in",
                            bg_class
                        )>
                            <span class="text-lg leading-none">{icon}</span>
                            <span class="flex-1 text-sm font-medium">{notice.message}</span>
                            <button
                                class="text-white/70 hover:text-white text-sm"
                                on:click=move |_| notifier.dismiss(id)
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
