//! Aggregations over sales datasets
//!
//! Sums and averages only. Empty inputs give zero or `None`, never NaN.

use super::types::{CategoryCount, CategoryShare, DailyOrders, MonthlySales, ProductSales, SalesDataset, SalesSummary};

pub fn total_revenue(monthly: &[MonthlySales]) -> f64 {
    monthly.iter().map(|m| m.revenue).sum()
}

pub fn total_orders(monthly: &[MonthlySales]) -> u32 {
    monthly.iter().map(|m| m.orders).sum()
}

/// Revenue per order across all months
pub fn average_order_value(monthly: &[MonthlySales]) -> f64 {
    let orders = total_orders(monthly);
    if orders == 0 {
        return 0.0;
    }
    total_revenue(monthly) / orders as f64
}

pub fn average_monthly_revenue(monthly: &[MonthlySales]) -> f64 {
    if monthly.is_empty() {
        return 0.0;
    }
    total_revenue(monthly) / monthly.len() as f64
}

/// Percentage change of the last month's revenue against the previous month
pub fn month_over_month_growth(monthly: &[MonthlySales]) -> Option<f64> {
    let [.., previous, last] = monthly else {
        return None;
    };
    if previous.revenue == 0.0 {
        return None;
    }
    Some((last.revenue - previous.revenue) / previous.revenue * 100.0)
}

/// Month with the highest revenue; the earliest wins a tie
pub fn best_month(monthly: &[MonthlySales]) -> Option<&MonthlySales> {
    monthly
        .iter()
        .fold(None, |best: Option<&MonthlySales>, m| match best {
            Some(b) if b.revenue >= m.revenue => Some(b),
            _ => Some(m),
        })
}

pub fn weekly_average_orders(weekly: &[DailyOrders]) -> f64 {
    if weekly.is_empty() {
        return 0.0;
    }
    weekly.iter().map(|d| d.orders as f64).sum::<f64>() / weekly.len() as f64
}

/// Busiest weekday
pub fn peak_day(weekly: &[DailyOrders]) -> Option<&DailyOrders> {
    weekly
        .iter()
        .fold(None, |best: Option<&DailyOrders>, d| match best {
            Some(b) if b.orders >= d.orders => Some(b),
            _ => Some(d),
        })
}

/// Each category's percentage of all retailers
pub fn category_shares(categories: &[CategoryCount]) -> Vec<CategoryShare> {
    let total: u32 = categories.iter().map(|c| c.retailers).sum();

    categories
        .iter()
        .map(|c| CategoryShare {
            category: c.category.clone(),
            retailers: c.retailers,
            percent: if total == 0 {
                0.0
            } else {
                c.retailers as f64 / total as f64 * 100.0
            },
        })
        .collect()
}

/// Products ordered by revenue, highest first
pub fn top_products_by_revenue(products: &[ProductSales], limit: usize) -> Vec<ProductSales> {
    let mut sorted = products.to_vec();
    sorted.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    sorted.truncate(limit);
    sorted
}

/// All headline numbers for a dataset
pub fn summarize(data: &SalesDataset) -> SalesSummary {
    SalesSummary {
        total_revenue: total_revenue(&data.monthly),
        total_orders: total_orders(&data.monthly),
        average_order_value: average_order_value(&data.monthly),
        average_monthly_revenue: average_monthly_revenue(&data.monthly),
        month_over_month_growth: month_over_month_growth(&data.monthly),
        best_month: best_month(&data.monthly).map(|m| m.month.clone()),
        weekly_average_orders: weekly_average_orders(&data.weekly_orders),
        total_retailers: data.retailer_categories.iter().map(|c| c.retailers).sum(),
    }
}

/// Format an amount as "TZS 1,234,567"
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("TZS -{}", grouped)
    } else {
        format!("TZS {}", grouped)
    }
}
