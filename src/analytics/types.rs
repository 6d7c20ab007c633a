//! Analytics record types

use serde::{Deserialize, Serialize};

/// Revenue and order count for one month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlySales {
    /// Short month label ("Jan", "Feb", ...)
    pub month: String,
    /// Revenue in TZS
    pub revenue: f64,
    pub orders: u32,
}

/// A best-selling product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSales {
    pub name: String,
    pub units_sold: u32,
    pub revenue: f64,
}

/// Orders placed on one weekday
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyOrders {
    pub day: String,
    pub orders: u32,
}

/// Number of retailers buying in a product category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryCount {
    pub category: String,
    pub retailers: u32,
}

/// A category with its share of the total
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub retailers: u32,
    /// Percentage of all retailers, 0..=100
    pub percent: f64,
}

/// Everything a dashboard renders from one dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesDataset {
    pub monthly: Vec<MonthlySales>,
    pub top_products: Vec<ProductSales>,
    pub weekly_orders: Vec<DailyOrders>,
    pub retailer_categories: Vec<CategoryCount>,
}

/// Headline numbers derived from a dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesSummary {
    pub total_revenue: f64,
    pub total_orders: u32,
    pub average_order_value: f64,
    pub average_monthly_revenue: f64,
    /// Last month against the one before, in percent
    pub month_over_month_growth: Option<f64>,
    pub best_month: Option<String>,
    pub weekly_average_orders: f64,
    pub total_retailers: u32,
}
