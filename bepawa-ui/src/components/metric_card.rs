//! Stat Card Component
//!
//! A labelled headline number, optionally with a trend line underneath.

use leptos::*;

/// Direction of a change, for colouring
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    /// Classify a percentage change; anything within ±0.1 is flat
    pub fn of(change: f64) -> Self {
        if change > 0.1 {
            Trend::Up
        } else if change < -0.1 {
            Trend::Down
        } else {
            Trend::Flat
        }
    }

    fn arrow_and_color(self) -> (&'static str, &'static str) {
        match self {
            Trend::Up => ("↑", "text-green-400"),
            Trend::Down => ("↓", "text-red-400"),
            Trend::Flat => ("→", "text-gray-400"),
        }
    }
}

/// Arrow, colour class and label for a percentage change; nothing when the
/// change is undefined
fn trend_line(change: Option<f64>) -> Option<(&'static str, &'static str, String)> {
    let change = change.filter(|c| c.is_finite())?;
    let (arrow, color) = Trend::of(change).arrow_and_color();
    Some((arrow, color, format!("{:+.1}%", change)))
}

/// Summary card
#[component]
pub fn StatCard(
    #[prop(into)]
    label: String,
    #[prop(into)]
    value: String,
    /// Small print under the value
    #[prop(optional, into)]
    caption: Option<String>,
    /// Percentage change shown with an arrow, hidden when `None`
    #[prop(optional_no_strip)]
    change: Option<f64>,
    #[prop(default = "📈")]
    icon: &'static str,
) -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-lg p-4 border border-gray-700 hover:border-gray-600 transition">
            <div class="flex items-center justify-between">
                <span class="text-gray-400 text-sm">{label}</span>
                <span class="text-xl">{icon}</span>
            </div>

            <div class="text-2xl font-bold mt-2">{value}</div>

            {trend_line(change).map(|(arrow, color, label)| view! {
                <div class=format!("mt-2 text-sm {}", color)>
                    {arrow} " " {label}
                </div>
            })}

            {caption.map(|caption| view! {
                <div class="mt-1 text-xs text-gray-500">{caption}</div>
            })}
        </div>
    }
}
