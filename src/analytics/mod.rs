//! Marketplace Analytics
//!
//! The dashboards render a fixed sample dataset; nothing is fetched.
//!
//! - **types**: Dataset and summary records
//! - **sample**: The embedded wholesale sales dataset
//! - **summary**: Sum/average aggregations
//! - **export**: CSV export

pub mod export;
pub mod sample;
pub mod summary;
pub mod types;

pub use export::{export_csv, ExportTable};
pub use sample::wholesale_sales;
pub use summary::{
    average_monthly_revenue, average_order_value, best_month, category_shares, format_currency,
    month_over_month_growth, peak_day, summarize, top_products_by_revenue, total_orders,
    total_revenue, weekly_average_orders,
};
pub use types::{
    CategoryCount, CategoryShare, DailyOrders, MonthlySales, ProductSales, SalesDataset,
    SalesSummary,
};
