//! Account Directory Page
//!
//! Admin listing of every registered account. Credentials are never shown;
//! the rows are `Identity` values, which carry no password hash.

use bepawa::access::Page;
use bepawa::auth::{Identity, Role};
use leptos::*;

use crate::components::Protected;
use crate::state::{use_auth, use_notifier};

/// Directory route component
#[component]
pub fn Directory() -> impl IntoView {
    view! {
        <Protected page=Page::Directory>
            <DirectoryView />
        </Protected>
    }
}

#[component]
fn DirectoryView() -> impl IntoView {
    let auth = use_auth();
    let notify = use_notifier();
    let filter = create_rw_signal(None::<Role>);

    let accounts = auth.accounts().unwrap_or_else(|e| {
        notify.error(e.to_string());
        Vec::new()
    });
    let accounts = store_value(accounts);

    let visible = move || -> Vec<Identity> {
        accounts.with_value(|all| {
            all.iter()
                .filter(|a| filter.get().map_or(true, |role| a.role == role))
                .cloned()
                .collect()
        })
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Accounts"</h1>
                    <p class="text-gray-400 mt-1">
                        {move || accounts.with_value(|all| format!("{} registered", all.len()))}
                    </p>
                </div>

                <select
                    class="bg-gray-700 rounded-lg px-4 py-2 text-sm"
                    on:change=move |ev| filter.set(event_target_value(&ev).parse::<Role>().ok())
                >
                    <option value="all">"All roles"</option>
                    {Role::all().iter().map(|role| view! {
                        <option value=role.as_str()>{role.label()}</option>
                    }).collect_view()}
                </select>
            </div>

            <section class="bg-gray-800 rounded-xl p-6 overflow-x-auto">
                <table class="w-full text-sm">
                    <thead class="text-gray-400 text-left">
                        <tr>
                            <th class="pb-2">"Name"</th>
                            <th class="pb-2">"Email"</th>
                            <th class="pb-2">"Role"</th>
                            <th class="pb-2">"Status"</th>
                            <th class="pb-2">"Joined"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || visible().into_iter().map(|account| view! {
                            <AccountRow account=account />
                        }).collect_view()}
                    </tbody>
                </table>
            </section>
        </div>
    }
}

#[component]
fn AccountRow(account: Identity) -> impl IntoView {
    let status = if account.is_approved {
        view! { <span class="px-2 py-1 rounded-full bg-green-900 text-green-300 text-xs">"Approved"</span> }
    } else {
        view! { <span class="px-2 py-1 rounded-full bg-yellow-900 text-yellow-300 text-xs">"Pending"</span> }
    };
    let name = account.display_name().to_string();
    let joined = account.created_at.format("%Y-%m-%d").to_string();

    view! {
        <tr class="border-t border-gray-700">
            <td class="py-2">{name}</td>
            <td class="py-2 text-gray-300">{account.email}</td>
            <td class="py-2">{account.role.label()}</td>
            <td class="py-2">{status}</td>
            <td class="py-2 text-gray-400">{joined}</td>
        </tr>
    }
}
