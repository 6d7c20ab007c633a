//! Pages
//!
//! Top-level page components for each route.

pub mod analytics;
pub mod dashboard;
pub mod directory;
pub mod login;
pub mod register;

pub use analytics::Analytics;
pub use dashboard::Dashboard;
pub use directory::Directory;
pub use login::Login;
pub use register::Register;
