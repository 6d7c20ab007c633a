//! Dashboard Page
//!
//! One dashboard per role at `/dashboard/:role`, personalised with the
//! logged-in identity. Admins may open any of them.

use bepawa::access::Page;
use bepawa::analytics::{format_currency, peak_day, summarize, wholesale_sales};
use bepawa::auth::{Identity, Role};
use leptos::*;
use leptos_router::*;

use crate::app::NotFound;
use crate::components::{LineChart, Protected, Series, StatCard};
use crate::state::use_auth;

/// Dashboard route component
#[component]
pub fn Dashboard() -> impl IntoView {
    let params = use_params_map();
    let role = move || params.with(|p| p.get("role").and_then(|r| r.parse::<Role>().ok()));

    move || match role() {
        Some(role) => view! {
            <Protected page=Page::Dashboard(role)>
                <RoleDashboard role=role />
            </Protected>
        }
        .into_view(),
        None => view! { <NotFound /> }.into_view(),
    }
}

#[component]
fn RoleDashboard(role: Role) -> impl IntoView {
    let auth = use_auth();

    move || {
        auth.identity.get().map(|identity| {
            let body = match role {
                Role::Admin => view! { <AdminPanel /> }.into_view(),
                Role::Individual => view! { <IndividualPanel identity=identity.clone() /> }.into_view(),
                Role::Retail => view! { <RetailPanel identity=identity.clone() /> }.into_view(),
                Role::Wholesale => view! { <WholesalePanel /> }.into_view(),
                Role::Lab => view! { <LabPanel identity=identity.clone() /> }.into_view(),
            };

            view! {
                <div class="space-y-8">
                    <div class="flex items-center justify-between">
                        <div>
                            <h1 class="text-3xl font-bold">
                                {format!("Welcome, {}", identity.display_name())}
                            </h1>
                            <p class="text-gray-400 mt-1">{format!("{} dashboard", role.label())}</p>
                        </div>
                        <div class="text-sm text-gray-400">
                            {format!("Member since {}", identity.created_at.format("%b %Y"))}
                        </div>
                    </div>

                    {body}

                    <ProfileCard identity=identity.clone() />
                </div>
            }
        })
    }
}

/// Contact and business details on file
#[component]
fn ProfileCard(identity: Identity) -> impl IntoView {
    let profile = &identity.profile;
    let rows: Vec<(&'static str, String)> = [
        ("Email", Some(identity.email.clone())),
        ("Phone", profile.phone.clone()),
        ("Address", profile.address.clone()),
        ("Date of birth", profile.date_of_birth.clone()),
        ("License number", profile.license_number.clone()),
        ("Business registration", profile.business_registration.clone()),
        ("Tax ID", profile.tax_id.clone()),
        ("Pharmacist in charge", profile.pharmacist_in_charge.clone()),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| (label, v)))
    .collect();

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">"Profile"</h2>
            <dl class="grid md:grid-cols-2 gap-x-8 gap-y-3">
                {rows.into_iter().map(|(label, value)| view! {
                    <div class="flex justify-between border-b border-gray-700 pb-2">
                        <dt class="text-gray-400 text-sm">{label}</dt>
                        <dd class="text-sm">{value}</dd>
                    </div>
                }).collect_view()}
            </dl>
        </section>
    }
}

#[component]
fn AdminPanel() -> impl IntoView {
    let auth = use_auth();

    let accounts = match auth.accounts() {
        Ok(accounts) => accounts,
        Err(e) => {
            web_sys::console::error_1(&format!("Failed to read accounts: {}", e).into());
            Vec::new()
        }
    };

    let pending = accounts.iter().filter(|a| !a.is_approved).count();
    let per_role = Role::all()
        .iter()
        .map(|role| (*role, accounts.iter().filter(|a| a.role == *role).count()))
        .collect::<Vec<_>>();

    view! {
        <section class="space-y-4">
            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                <StatCard label="Accounts" value=accounts.len().to_string() icon="👥" />
                <StatCard label="Pending approval" value=pending.to_string() icon="⏳" />
                {per_role.into_iter()
                    .filter(|(role, _)| matches!(role, Role::Retail | Role::Wholesale))
                    .map(|(role, count)| view! {
                        <StatCard label=role.label() value=count.to_string() icon="🏪" />
                    })
                    .collect_view()}
            </div>
            <div class="flex space-x-3">
                <A href=Page::Directory.path() class="px-4 py-2 bg-primary-600 hover:bg-primary-700 rounded-lg text-sm">
                    "Manage accounts"
                </A>
                <A href=Page::Analytics.path() class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg text-sm">
                    "Sales analytics"
                </A>
            </div>
        </section>
    }
}

#[component]
fn IndividualPanel(identity: Identity) -> impl IntoView {
    let services = [
        ("💊", "Order medicines", "Browse verified pharmacies near you"),
        ("🧪", "Book a lab test", "Choose a laboratory and a time slot"),
        ("📍", "Find a pharmacy", "Open pharmacies in your area"),
    ];

    view! {
        <section class="grid md:grid-cols-3 gap-4">
            {services.into_iter().map(|(icon, title, text)| view! {
                <div class="bg-gray-800 rounded-lg p-5 border border-gray-700">
                    <div class="text-3xl mb-2">{icon}</div>
                    <div class="font-semibold">{title}</div>
                    <div class="text-sm text-gray-400 mt-1">{text}</div>
                </div>
            }).collect_view()}
        </section>
        {identity.profile.address.map(|address| view! {
            <p class="text-sm text-gray-400">{format!("Deliveries go to {}", address)}</p>
        })}
    }
}

#[component]
fn RetailPanel(identity: Identity) -> impl IntoView {
    let data = wholesale_sales();
    let week_total: u32 = data.weekly_orders.iter().map(|d| d.orders).sum();
    let busiest = peak_day(&data.weekly_orders)
        .map(|d| d.day.clone())
        .unwrap_or_default();
    let series = Series::new(
        data.weekly_orders
            .iter()
            .map(|d| (d.day.clone(), d.orders as f64)),
    );

    view! {
        <section class="space-y-4">
            <div class="grid grid-cols-2 md:grid-cols-3 gap-4">
                <StatCard label="Orders this week" value=week_total.to_string() icon="🧾" />
                <StatCard label="Busiest day" value=busiest icon="📅" />
                <StatCard
                    label="Pharmacist in charge"
                    value=identity.profile.pharmacist_in_charge.unwrap_or_else(|| "Not set".to_string())
                    icon="👩‍⚕️"
                />
            </div>
            <div class="bg-gray-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-4">"Weekly orders"</h2>
                <LineChart series=series />
            </div>
        </section>
    }
}

#[component]
fn WholesalePanel() -> impl IntoView {
    let summary = summarize(&wholesale_sales());

    view! {
        <section class="space-y-4">
            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                <StatCard label="Revenue (6 months)" value=format_currency(summary.total_revenue) icon="💰" />
                <StatCard label="Orders" value=summary.total_orders.to_string() icon="📦" />
                <StatCard label="Retail partners" value=summary.total_retailers.to_string() icon="🏪" />
                <StatCard
                    label="Best month"
                    value=summary.best_month.unwrap_or_else(|| "-".to_string())
                    icon="🏆"
                />
            </div>
            <A href=Page::Analytics.path() class="inline-block px-4 py-2 bg-primary-600 hover:bg-primary-700 rounded-lg text-sm">
                "Open sales analytics"
            </A>
        </section>
    }
}

#[component]
fn LabPanel(identity: Identity) -> impl IntoView {
    let specializations = identity.profile.specializations;

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">"Test categories offered"</h2>
            {if specializations.is_empty() {
                view! { <p class="text-gray-400 text-sm">"No specializations listed yet"</p> }.into_view()
            } else {
                view! {
                    <div class="flex flex-wrap gap-2">
                        {specializations.into_iter().map(|s| view! {
                            <span class="px-3 py-1 rounded-full bg-gray-700 text-sm">{s}</span>
                        }).collect_view()}
                    </div>
                }
                .into_view()
            }}
        </section>
    }
}
