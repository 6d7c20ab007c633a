//! App Root Component
//!
//! Main application component with routing and global providers.

use bepawa::access::{home_page, LOGIN_PATH};
use leptos::*;
use leptos_router::*;

use crate::components::{Nav, Toast};
use crate::pages::{Analytics, Dashboard, Directory, Login, Register};
use crate::state::{provide_auth_state, provide_notifier, use_auth};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_notifier();
    // Seeds the demo accounts on first visit and restores a saved session
    provide_auth_state();

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                <Nav />

                <main class="flex-1 container mx-auto px-4 py-8 pb-24">
                    <Routes>
                        <Route path="/" view=Home />
                        <Route path="/login" view=Login />
                        <Route path="/register" view=Register />
                        <Route path="/dashboard/:role" view=Dashboard />
                        <Route path="/analytics" view=Analytics />
                        <Route path="/admin/users" view=Directory />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                <Toast />
            </div>
        </Router>
    }
}

/// `/` sends the visitor to their dashboard, or to login
#[component]
fn Home() -> impl IntoView {
    let auth = use_auth();

    move || {
        let path = auth
            .identity
            .get()
            .map(|identity| home_page(identity.role).path())
            .unwrap_or_else(|| LOGIN_PATH.to_string());

        view! { <Redirect path=path /> }
    }
}

/// 404 Not Found page
#[component]
pub fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🔍"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                "Go to Dashboard"
            </A>
        </div>
    }
}
