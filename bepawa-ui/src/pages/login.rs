//! Login Page

use bepawa::access::{home_page, Page};
use bepawa::auth::DEMO_ACCOUNTS;
use leptos::*;
use leptos_router::*;

use crate::components::Protected;
use crate::state::{use_auth, use_notifier};

/// Login form with the demo accounts listed underneath
#[component]
pub fn Login() -> impl IntoView {
    let auth = use_auth();
    let notify = use_notifier();
    let navigate = use_navigate();

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());

    let busy = auth.busy;
    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        match auth.login(&email.get_untracked(), &password.get_untracked()) {
            Ok(identity) => {
                notify.success(format!("Welcome back, {}", identity.display_name()));
                navigate(&home_page(identity.role).path(), Default::default());
            }
            Err(e) => notify.error(e.to_string()),
        }
    };

    view! {
        <Protected page=Page::Login>
            <div class="max-w-md mx-auto space-y-8">
                <div class="text-center">
                    <h1 class="text-3xl font-bold">"Sign in"</h1>
                    <p class="text-gray-400 mt-1">"Access your Bepawa account"</p>
                </div>

                <form on:submit=on_submit.clone() class="bg-gray-800 rounded-xl p-6 space-y-4">
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">"Email"</label>
                        <input
                            type="email"
                            required
                            class="w-full bg-gray-700 rounded-lg px-4 py-2 text-white focus:outline-none focus:ring-2 focus:ring-primary-500"
                            prop:value=email
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                        />
                    </div>
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">"Password"</label>
                        <input
                            type="password"
                            required
                            class="w-full bg-gray-700 rounded-lg px-4 py-2 text-white focus:outline-none focus:ring-2 focus:ring-primary-500"
                            prop:value=password
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />
                    </div>
                    <button
                        type="submit"
                        disabled=move || busy.get()
                        class="w-full py-3 bg-primary-600 hover:bg-primary-700 disabled:opacity-50 rounded-lg font-medium transition-colors"
                    >
                        {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                    <p class="text-sm text-gray-400 text-center">
                        "No account yet? "
                        <A href="/register" class="text-primary-400 hover:underline">"Register"</A>
                    </p>
                </form>

                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-sm font-semibold text-gray-300 mb-3">"Demo accounts"</h2>
                    <div class="space-y-2">
                        {DEMO_ACCOUNTS.into_iter().map(|account| {
                            let fill = move |_| {
                                set_email.set(account.email.to_string());
                                set_password.set(account.password.to_string());
                            };
                            view! {
                                <button
                                    type="button"
                                    on:click=fill
                                    class="w-full flex justify-between px-3 py-2 rounded-lg bg-gray-700 hover:bg-gray-600 text-sm"
                                >
                                    <span>{account.role.label()}</span>
                                    <span class="text-gray-400">{account.email}</span>
                                </button>
                            }
                        }).collect_view()}
                    </div>
                </section>
            </div>
        </Protected>
    }
}
