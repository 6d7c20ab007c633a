//! Chart Components
//!
//! Category bar and line charts drawn on an HTML5 canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const BACKGROUND: &str = "#1f2937"; // gray-800
const GRID: &str = "#374151"; // gray-700
const LABEL: &str = "#9ca3af"; // gray-400

const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 40.0;
const GRID_LINES: usize = 5;

/// One labelled series
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(points: impl IntoIterator<Item = (String, f64)>) -> Self {
        let (labels, values) = points.into_iter().unzip();
        Self { labels, values }
    }
}

#[derive(Clone, Copy)]
enum Style {
    Bars,
    Line,
}

/// Vertical bar chart
#[component]
pub fn BarChart(
    series: Series,
    #[prop(default = "#2196F3")]
    color: &'static str,
) -> impl IntoView {
    view! { <ChartCanvas series=series color=color style=Style::Bars /> }
}

/// Line chart with point markers
#[component]
pub fn LineChart(
    series: Series,
    #[prop(default = "#FF9800")]
    color: &'static str,
) -> impl IntoView {
    view! { <ChartCanvas series=series color=color style=Style::Line /> }
}

#[component]
fn ChartCanvas(series: Series, color: &'static str, style: Style) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    // Draw once the canvas is mounted
    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            draw_chart(&canvas, &series, color, style);
        }
    });

    view! {
        <canvas
            node_ref=canvas_ref
            width="800"
            height="360"
            class="w-full h-64 md:h-80 rounded-lg"
        />
    }
}

/// Y-axis bounds. Bars start at zero; lines get 10% padding around the data.
fn y_bounds(values: &[f64], from_zero: bool) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }

    let range = max - min;
    let padding = if range > 0.0 { range * 0.1 } else { 1.0 };

    if from_zero {
        (0.0_f64.min(min), max + padding)
    } else {
        (min - padding, max + padding)
    }
}

/// Compact axis label: 7200000 → "7.2M", 1500 → "1.5K"
fn axis_label(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}

fn draw_chart(canvas: &HtmlCanvasElement, series: &Series, color: &str, style: Style) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let chart_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let chart_height = height - MARGIN_TOP - MARGIN_BOTTOM;

    ctx.set_fill_style(&BACKGROUND.into());
    ctx.fill_rect(0.0, 0.0, width, height);

    if series.values.is_empty() {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No data", width / 2.0 - 30.0, height / 2.0);
        return;
    }

    let (y_min, y_max) = y_bounds(&series.values, matches!(style, Style::Bars));
    let scale_y = |value: f64| MARGIN_TOP + ((y_max - value) / (y_max - y_min)) * chart_height;

    // Horizontal grid with y-axis labels
    ctx.set_stroke_style(&GRID.into());
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");
    for i in 0..=GRID_LINES {
        let y = MARGIN_TOP + (i as f64 / GRID_LINES as f64) * chart_height;
        ctx.begin_path();
        ctx.move_to(MARGIN_LEFT, y);
        ctx.line_to(width - MARGIN_RIGHT, y);
        ctx.stroke();

        let value = y_max - (i as f64 / GRID_LINES as f64) * (y_max - y_min);
        ctx.set_fill_style(&LABEL.into());
        let _ = ctx.fill_text(&axis_label(value), 5.0, y + 4.0);
    }

    // One slot per category; marks sit in the slot centre
    let slot = chart_width / series.values.len() as f64;
    let center = |i: usize| MARGIN_LEFT + slot * (i as f64 + 0.5);

    match style {
        Style::Bars => {
            ctx.set_fill_style(&color.into());
            let bar_width = slot * 0.6;
            let base = scale_y(y_min.max(0.0));
            for (i, value) in series.values.iter().enumerate() {
                let top = scale_y(*value);
                ctx.fill_rect(center(i) - bar_width / 2.0, top, bar_width, base - top);
            }
        }
        Style::Line => {
            ctx.set_stroke_style(&color.into());
            ctx.set_line_width(2.0);
            ctx.begin_path();
            for (i, value) in series.values.iter().enumerate() {
                if i == 0 {
                    ctx.move_to(center(i), scale_y(*value));
                } else {
                    ctx.line_to(center(i), scale_y(*value));
                }
            }
            ctx.stroke();

            ctx.set_fill_style(&color.into());
            for (i, value) in series.values.iter().enumerate() {
                ctx.begin_path();
                let _ = ctx.arc(center(i), scale_y(*value), 4.0, 0.0, std::f64::consts::PI * 2.0);
                ctx.fill();
            }
        }
    }

    // Category labels
    ctx.set_fill_style(&LABEL.into());
    ctx.set_font("12px sans-serif");
    for (i, label) in series.labels.iter().enumerate() {
        let _ = ctx.fill_text(label, center(i) - 12.0, height - 12.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_bounds_start_at_zero() {
        let (min, max) = y_bounds(&[4.5, 7.2, 5.0], true);
        assert_eq!(min, 0.0);
        assert!(max > 7.2);
    }

    #[test]
    fn test_line_bounds_are_padded() {
        let (min, max) = y_bounds(&[10.0, 20.0], false);
        assert!((min - 9.0).abs() < 1e-9);
        assert!((max - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_and_empty_series() {
        assert_eq!(y_bounds(&[], false), (0.0, 1.0));
        assert_eq!(y_bounds(&[5.0, 5.0], false), (4.0, 6.0));
    }

    #[test]
    fn test_axis_label() {
        assert_eq!(axis_label(7_200_000.0), "7.2M");
        assert_eq!(axis_label(1_500.0), "1.5K");
        assert_eq!(axis_label(45.0), "45");
    }

    #[test]
    fn test_series_from_pairs() {
        let series = Series::new(vec![("Mon".to_string(), 28.0), ("Tue".to_string(), 35.0)]);
        assert_eq!(series.labels, vec!["Mon", "Tue"]);
        assert_eq!(series.values, vec![28.0, 35.0]);
    }
}
