//! Route Guard
//!
//! Renders a page only when the access rules grant it to the current
//! identity; otherwise redirects.

use bepawa::access::{authorize, Access, Page};
use leptos::*;
use leptos_router::*;

use crate::state::use_auth;

/// Render `children` if the logged-in identity may view `page`
#[component]
pub fn Protected(page: Page, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();

    move || match authorize(auth.identity.get().as_ref(), page) {
        Access::Granted => children().into_view(),
        Access::Redirect(path) => view! { <Redirect path=path /> }.into_view(),
    }
}
