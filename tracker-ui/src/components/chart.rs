//! Chart Component
//!
//! Weight and waist trend chart using HTML5 Canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::state::global::{chart_series, entry_views, ChartPoint, GlobalState};

const WEIGHT_COLOR: &str = "#2563eb";
const WAIST_COLOR: &str = "#16a34a";

/// Trend chart component
#[component]
pub fn Chart() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let canvas_ref = create_node_ref::<html::Canvas>();

    // Redraw whenever the entries change
    create_effect(move |_| {
        let series = state.entries.with(|records| chart_series(&entry_views(records)));

        if let Some(canvas) = canvas_ref.get() {
            draw_chart(&canvas, &series);
        }
    });

    view! {
        <div>
            <canvas node_ref=canvas_ref width="720" height="300" style="width: 100%" />
            <div style="display: flex; gap: 1rem; justify-content: center; font-size: 0.875rem">
                <LegendItem label="Weight" color=WEIGHT_COLOR />
                <LegendItem label="Waist" color=WAIST_COLOR />
            </div>
        </div>
    }
}

#[component]
fn LegendItem(label: &'static str, color: &'static str) -> impl IntoView {
    view! {
        <span>
            <span style=format!(
                "display: inline-block; width: 0.75rem; height: 0.75rem; border-radius: 50%; background-color: {}; margin-right: 0.25rem",
                color
            ) />
            {label}
        </span>
    }
}

/// Draw the chart on canvas
fn draw_chart(canvas: &HtmlCanvasElement, series: &[ChartPoint]) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    // Margins
    let margin_left = 50.0;
    let margin_right = 20.0;
    let margin_top = 20.0;
    let margin_bottom = 40.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;

    // Clear canvas
    ctx.set_fill_style(&"#ffffff".into());
    ctx.fill_rect(0.0, 0.0, width, height);

    if series.is_empty() {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No entries yet", width / 2.0 - 50.0, height / 2.0);
        return;
    }

    // Shared y range for both series
    let (mut y_min, mut y_max) = value_range(series);
    let y_padding = if y_max > y_min { (y_max - y_min) * 0.1 } else { 1.0 };
    y_min -= y_padding;
    y_max += y_padding;

    // Horizontal grid lines with y-axis labels
    ctx.set_stroke_style(&"#e5e7eb".into());
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");
    for i in 0..=5 {
        let y = margin_top + (i as f64 / 5.0) * chart_height;
        ctx.begin_path();
        ctx.move_to(margin_left, y);
        ctx.line_to(width - margin_right, y);
        ctx.stroke();

        let value = y_max - (i as f64 / 5.0) * (y_max - y_min);
        ctx.set_fill_style(&"#6b7280".into());
        let _ = ctx.fill_text(&format!("{:.1}", value), 5.0, y + 4.0);
    }

    // Entries are spaced evenly in document order
    let x_at = |idx: usize| {
        if series.len() == 1 {
            margin_left + chart_width / 2.0
        } else {
            margin_left + (idx as f64 / (series.len() - 1) as f64) * chart_width
        }
    };
    let y_at = |value: f64| margin_top + ((y_max - value) / (y_max - y_min)) * chart_height;

    draw_series(&ctx, series, |p| p.weight, WEIGHT_COLOR, &x_at, &y_at);
    draw_series(&ctx, series, |p| p.waist, WAIST_COLOR, &x_at, &y_at);

    // X-axis labels, at most six
    ctx.set_fill_style(&"#6b7280".into());
    let step = (series.len() / 6).max(1);
    for (idx, point) in series.iter().enumerate().step_by(step) {
        let _ = ctx.fill_text(&point.label, x_at(idx) - 30.0, height - 10.0);
    }
}

fn draw_series(
    ctx: &CanvasRenderingContext2d,
    series: &[ChartPoint],
    value: impl Fn(&ChartPoint) -> Option<f64>,
    color: &str,
    x_at: &impl Fn(usize) -> f64,
    y_at: &impl Fn(f64) -> f64,
) {
    let points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .filter_map(|(idx, p)| value(p).map(|v| (x_at(idx), y_at(v))))
        .collect();

    if points.is_empty() {
        return;
    }

    ctx.set_stroke_style(&color.into());
    ctx.set_line_width(2.0);
    ctx.begin_path();
    for (i, (x, y)) in points.iter().enumerate() {
        if i == 0 {
            ctx.move_to(*x, *y);
        } else {
            ctx.line_to(*x, *y);
        }
    }
    ctx.stroke();

    ctx.set_fill_style(&color.into());
    for (x, y) in &points {
        ctx.begin_path();
        let _ = ctx.arc(*x, *y, 3.0, 0.0, std::f64::consts::PI * 2.0);
        ctx.fill();
    }
}

/// Min and max over every plotted value
fn value_range(series: &[ChartPoint]) -> (f64, f64) {
    series
        .iter()
        .flat_map(|p| p.weight.into_iter().chain(p.waist))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range() {
        let series = vec![
            ChartPoint { label: "a".into(), weight: Some(70.0), waist: Some(82.0) },
            ChartPoint { label: "b".into(), weight: Some(68.5), waist: None },
        ];

        assert_eq!(value_range(&series), (68.5, 82.0));
    }
}
