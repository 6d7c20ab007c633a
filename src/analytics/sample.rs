//! Built-in sample dataset shown on the dashboards

use super::types::{CategoryCount, DailyOrders, MonthlySales, ProductSales, SalesDataset};

const MONTHLY: [(&str, f64, u32); 6] = [
    ("Jan", 4_500_000.0, 120),
    ("Feb", 5_200_000.0, 145),
    ("Mar", 4_800_000.0, 132),
    ("Apr", 6_100_000.0, 168),
    ("May", 5_900_000.0, 155),
    ("Jun", 7_200_000.0, 190),
];

const TOP_PRODUCTS: [(&str, u32, f64); 5] = [
    ("Paracetamol 500mg", 2_450, 1_225_000.0),
    ("Amoxicillin 250mg", 1_820, 2_184_000.0),
    ("Metformin 500mg", 1_340, 1_608_000.0),
    ("Ibuprofen 400mg", 1_210, 726_000.0),
    ("Omeprazole 20mg", 980, 1_470_000.0),
];

const WEEKLY: [(&str, u32); 7] = [
    ("Mon", 28),
    ("Tue", 35),
    ("Wed", 32),
    ("Thu", 40),
    ("Fri", 45),
    ("Sat", 22),
    ("Sun", 15),
];

const RETAILER_CATEGORIES: [(&str, u32); 4] = [
    ("Pharmacies", 45),
    ("Hospitals", 25),
    ("Clinics", 20),
    ("Others", 10),
];

/// The wholesale sales dataset embedded in the dashboards
pub fn wholesale_sales() -> SalesDataset {
    SalesDataset {
        monthly: MONTHLY
            .iter()
            .map(|&(month, revenue, orders)| MonthlySales {
                month: month.to_string(),
                revenue,
                orders,
            })
            .collect(),
        top_products: TOP_PRODUCTS
            .iter()
            .map(|&(name, units_sold, revenue)| ProductSales {
                name: name.to_string(),
                units_sold,
                revenue,
            })
            .collect(),
        weekly_orders: WEEKLY
            .iter()
            .map(|&(day, orders)| DailyOrders {
                day: day.to_string(),
                orders,
            })
            .collect(),
        retailer_categories: RETAILER_CATEGORIES
            .iter()
            .map(|&(category, retailers)| CategoryCount {
                category: category.to_string(),
                retailers,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_shape() {
        let data = wholesale_sales();
        assert_eq!(data.monthly.len(), 6);
        assert_eq!(data.top_products.len(), 5);
        assert_eq!(data.weekly_orders.len(), 7);
        assert_eq!(data.retailer_categories.len(), 4);
    }

    #[test]
    fn test_sample_is_deterministic() {
        assert_eq!(wholesale_sales(), wholesale_sales());
    }
}
