//! Bepawa Web
//!
//! Marketplace front end built with Leptos (WASM).
//!
//! # Features
//!
//! - Login and registration against browser-local accounts
//! - One dashboard per role, gated by the shared access rules
//! - Sales analytics with canvas charts
//! - Admin account directory
//!
//! # Architecture
//!
//! Client-side rendered (CSR) Leptos application compiled to WebAssembly.
//! There is no server: the core `SessionStore` runs in the page and keeps
//! its state in `localStorage`.

use leptos::*;

mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
