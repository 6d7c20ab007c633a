//! State Management
//!
//! The session store with its `localStorage` backend, and toast
//! notifications.

pub mod auth;
pub mod notify;
pub mod storage;

pub use auth::{provide_auth_state, use_auth};
pub use notify::{provide_notifier, use_notifier, Notice, NoticeKind};
