//! Human-friendly output: current conditions, daily cards and error lines.
//!
//! Every function returns a `String`; printing is left to the caller.

use chrono::{Local, NaiveDate};
use console::{Alignment, pad_str};
use std::fmt::Write;
use weather_core::{DailySummary, WeatherError, WeatherSnapshot};

use crate::{chart, session::Dashboard, theme::RenderContext};

const CARD_WIDTH: usize = 18;
const CARD_GAP: usize = 2;
const BAR_WIDTH: usize = 10;

pub fn icon_url(icon: &str, scale: u8) -> String {
    format!("https://openweathermap.org/img/wn/{icon}@{scale}x.png")
}

/// `"Mon, Jan 02"`
pub fn day_label(date: NaiveDate) -> String {
    date.format("%a, %b %d").to_string()
}

/// `"light rain"` -> `"Light Rain"`
pub fn title_case(text: &str) -> String {
    text.split_whitespace().map(capitalize).collect::<Vec<_>>().join(" ")
}

/// `"light rain"` -> `"Light rain"`
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn humidity_bar(pct: f64, width: usize) -> String {
    let filled = ((pct.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn current(ctx: &RenderContext, snapshot: &WeatherSnapshot) -> String {
    let p = &ctx.palette;
    let mut out = String::new();

    let _ = writeln!(out, "{}", p.title.apply_to(format!("{}, {}", snapshot.location_name, snapshot.country)));
    let _ = writeln!(out, "{}", p.value.apply_to(title_case(&snapshot.condition)));
    let _ = writeln!(out);

    let metric = |label: &str, value: String| {
        format!(
            "{} {}",
            p.label.apply_to(pad_str(label, 12, Alignment::Left, None)),
            p.value.apply_to(pad_str(&value, 12, Alignment::Left, None))
        )
    };
    let _ = writeln!(
        out,
        "  {}  {}",
        metric("Temperature", ctx.temp(snapshot.temperature)),
        metric("Feels Like", ctx.temp(snapshot.feels_like))
    );
    let _ = writeln!(
        out,
        "  {}  {}",
        metric("Humidity", format!("{}%", snapshot.humidity_pct)),
        metric("Wind Speed", ctx.wind(snapshot.wind_speed))
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {} {}",
        p.muted.apply_to("Updated"),
        p.muted.apply_to(snapshot.observation_time.with_timezone(&Local).format("%Y-%m-%d %H:%M"))
    );
    let _ = writeln!(out, "  {} {}", p.muted.apply_to("Icon"), p.muted.apply_to(icon_url(&snapshot.icon, 4)));

    out
}

fn card(ctx: &RenderContext, day: &DailySummary) -> Vec<String> {
    let p = &ctx.palette;
    let humidity = day.avg_humidity.round();
    vec![
        p.title.apply_to(day_label(day.date)).to_string(),
        p.value.apply_to(capitalize(&day.condition)).to_string(),
        format!("{} {}", p.label.apply_to("High"), p.high.apply_to(ctx.temp(day.max_temp))),
        format!("{} {}", p.label.apply_to("Low "), p.low.apply_to(ctx.temp(day.min_temp))),
        format!("{} {humidity:.0}%", p.muted.apply_to(humidity_bar(humidity, BAR_WIDTH))),
        format!("{} {}", p.label.apply_to("Wind"), ctx.wind(day.avg_wind)),
    ]
}

/// Lay out blocks of lines next to each other in fixed-width columns.
fn side_by_side(columns: &[Vec<String>], width: usize, gap: usize) -> String {
    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
    let spacer = " ".repeat(gap);
    let mut out = String::new();
    for row in 0..rows {
        let line = columns
            .iter()
            .map(|col| {
                let cell = col.get(row).map(String::as_str).unwrap_or("");
                pad_str(cell, width, Alignment::Left, Some("…")).into_owned()
            })
            .collect::<Vec<_>>()
            .join(&spacer);
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

pub fn daily_cards(ctx: &RenderContext, days: &[DailySummary]) -> String {
    let p = &ctx.palette;
    if days.is_empty() {
        return format!("{}\n", p.muted.apply_to("No forecast data available."));
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", p.title.apply_to("Detailed Daily Forecast"));
    let cards: Vec<Vec<String>> = days.iter().map(|d| card(ctx, d)).collect();
    out.push_str(&side_by_side(&cards, CARD_WIDTH, CARD_GAP));
    let _ = writeln!(out);
    for day in days {
        let _ = writeln!(
            out,
            "  {} {}",
            p.muted.apply_to(pad_str(&day_label(day.date), 12, Alignment::Left, None)),
            p.muted.apply_to(icon_url(&day.icon, 2))
        );
    }
    out
}

pub fn dashboard(ctx: &RenderContext, dashboard: &Dashboard) -> String {
    let mut out = current(ctx, &dashboard.current);
    out.push('\n');
    out.push_str(&chart::temperature_chart(ctx, &dashboard.days));
    out.push('\n');
    out.push_str(&daily_cards(ctx, &dashboard.days));
    out
}

pub fn error(ctx: &RenderContext, err: &WeatherError) -> String {
    format!("{} {}", ctx.palette.error.apply_to("Error:"), err.user_message())
}
