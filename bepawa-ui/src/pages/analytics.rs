//! Analytics Page
//!
//! Sales analytics for the wholesale business: headline numbers, monthly
//! revenue, weekly orders, best sellers and the retailer mix.

use bepawa::access::Page;
use bepawa::analytics::{
    category_shares, format_currency, peak_day, summarize, top_products_by_revenue,
    wholesale_sales, SalesDataset,
};
use leptos::*;

use crate::components::{BarChart, LineChart, Protected, Series, StatCard};

/// Analytics route component
#[component]
pub fn Analytics() -> impl IntoView {
    view! {
        <Protected page=Page::Analytics>
            <AnalyticsView data=wholesale_sales() />
        </Protected>
    }
}

#[component]
fn AnalyticsView(data: SalesDataset) -> impl IntoView {
    let summary = summarize(&data);

    let revenue = Series::new(data.monthly.iter().map(|m| (m.month.clone(), m.revenue)));
    let orders = Series::new(
        data.weekly_orders
            .iter()
            .map(|d| (d.day.clone(), d.orders as f64)),
    );
    let busiest = peak_day(&data.weekly_orders)
        .map(|d| format!("Peak: {} ({} orders)", d.day, d.orders))
        .unwrap_or_default();

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Sales Analytics"</h1>
                <p class="text-gray-400 mt-1">"January to June performance"</p>
            </div>

            <section class="grid grid-cols-2 md:grid-cols-4 gap-4">
                <StatCard
                    label="Total revenue"
                    value=format_currency(summary.total_revenue)
                    change=summary.month_over_month_growth
                    caption="Last month vs. previous"
                    icon="💰"
                />
                <StatCard label="Total orders" value=summary.total_orders.to_string() icon="📦" />
                <StatCard
                    label="Average order value"
                    value=format_currency(summary.average_order_value)
                    icon="🧾"
                />
                <StatCard
                    label="Monthly average"
                    value=format_currency(summary.average_monthly_revenue)
                    caption=summary.best_month.map(|m| format!("Best month: {}", m)).unwrap_or_default()
                    icon="📅"
                />
            </section>

            <div class="grid md:grid-cols-2 gap-8">
                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">"Monthly revenue"</h2>
                    <BarChart series=revenue />
                </section>

                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">"Orders by weekday"</h2>
                    <LineChart series=orders />
                    <p class="text-sm text-gray-400 mt-3">
                        {format!("Average {:.1} orders per day. {}", summary.weekly_average_orders, busiest)}
                    </p>
                </section>
            </div>

            <div class="grid md:grid-cols-2 gap-8">
                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">"Top products"</h2>
                    <table class="w-full text-sm">
                        <thead class="text-gray-400 text-left">
                            <tr>
                                <th class="pb-2">"Product"</th>
                                <th class="pb-2 text-right">"Units"</th>
                                <th class="pb-2 text-right">"Revenue"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {top_products_by_revenue(&data.top_products, 5).into_iter().map(|p| view! {
                                <tr class="border-t border-gray-700">
                                    <td class="py-2">{p.name}</td>
                                    <td class="py-2 text-right">{p.units_sold}</td>
                                    <td class="py-2 text-right">{format_currency(p.revenue)}</td>
                                </tr>
                            }).collect_view()}
                        </tbody>
                    </table>
                </section>

                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">"Retailer categories"</h2>
                    <div class="space-y-3">
                        {category_shares(&data.retailer_categories).into_iter().map(|share| view! {
                            <div>
                                <div class="flex justify-between text-sm mb-1">
                                    <span>{share.category}</span>
                                    <span class="text-gray-400">
                                        {format!("{} ({:.0}%)", share.retailers, share.percent)}
                                    </span>
                                </div>
                                <div class="h-2 bg-gray-700 rounded">
                                    <div
                                        class="h-2 bg-primary-500 rounded"
                                        style=format!("width: {:.1}%", share.percent)
                                    />
                                </div>
                            </div>
                        }).collect_view()}
                    </div>
                    <p class="text-sm text-gray-400 mt-4">
                        {format!("{} retail partners in total", summary.total_retailers)}
                    </p>
                </section>
            </div>
        </div>
    }
}
