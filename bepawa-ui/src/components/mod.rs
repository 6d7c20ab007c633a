//! UI Components
//!
//! Reusable Leptos components shared by the pages.

pub mod chart;
pub mod guard;
pub mod metric_card;
pub mod nav;
pub mod toast;

pub use chart::{BarChart, LineChart, Series};
pub use guard::Protected;
pub use metric_card::StatCard;
pub use nav::Nav;
pub use toast::Toast;
