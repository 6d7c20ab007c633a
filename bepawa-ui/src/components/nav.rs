//! Navigation Component
//!
//! Header bar: brand, the links the current role may use, and the
//! logged-in user with a logout button.

use bepawa::access::{navigation, LOGIN_PATH};
use leptos::*;
use leptos_router::*;

use crate::state::{use_auth, use_notifier};

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let auth = use_auth();

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href="/" class="flex items-center space-x-3">
                        <span class="text-2xl">"💊"</span>
                        <span class="text-xl font-bold text-white">"Bepawa"</span>
                    </A>

                    {move || match auth.identity.get() {
                        Some(identity) => {
                            let links = navigation(identity.role)
                                .into_iter()
                                .map(|(label, href)| view! { <NavLink href=href label=label /> })
                                .collect_view();

                            view! {
                                <div class="flex items-center space-x-1">
                                    {links}
                                    <UserMenu
                                        name=identity.display_name().to_string()
                                        role=identity.role.label()
                                    />
                                </div>
                            }
                            .into_view()
                        }
                        None => view! {
                            <div class="flex items-center space-x-1">
                                <NavLink href=LOGIN_PATH.to_string() label="Login" />
                                <NavLink href="/register".to_string() label="Register" />
                            </div>
                        }
                        .into_view(),
                    }}
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(
    href: String,
    label: &'static str,
) -> impl IntoView {
    view! {
        <A
            href=href
            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
            active_class="bg-gray-700 text-white"
        >
            {label}
        </A>
    }
}

/// Current user and logout
#[component]
fn UserMenu(name: String, role: &'static str) -> impl IntoView {
    let auth = use_auth();
    let notify = use_notifier();
    let navigate = use_navigate();

    let on_logout = move |_| {
        auth.logout();
        notify.success("Logged out");
        navigate(LOGIN_PATH, Default::default());
    };

    view! {
        <div class="flex items-center space-x-3 pl-4 ml-2 border-l border-gray-700">
            <div class="text-right leading-tight">
                <div class="text-sm font-medium text-white">{name}</div>
                <div class="text-xs text-gray-400">{role}</div>
            </div>
            <button
                on:click=on_logout
                class="px-3 py-2 rounded-lg text-sm bg-gray-700 hover:bg-red-600 text-gray-200 transition-colors"
            >
                "Logout"
            </button>
        </div>
    }
}
