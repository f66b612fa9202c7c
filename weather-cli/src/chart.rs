//! Text line chart of daily high/low temperatures.

use console::{Alignment, pad_str};
use std::fmt::Write;
use weather_core::DailySummary;

use crate::{render::day_label, theme::RenderContext};

const HEIGHT: usize = 10;
/// Wide enough for a `Mon, Jan 02` label plus a gap.
const COL_WIDTH: usize = 13;
const AXIS_WIDTH: usize = 7;

const HIGH_POINT: char = '●';
const LOW_POINT: char = '○';
const BOTH_POINT: char = '◉';
const LINE: char = '·';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    High,
    Low,
    Both,
    HighLine,
    LowLine,
}

/// Vertical scale mapping temperatures onto chart rows (row 0 is the top).
#[derive(Debug, Clone, Copy)]
struct Scale {
    top: f64,
    bottom: f64,
}

impl Scale {
    fn fit(days: &[DailySummary]) -> Self {
        let hi = days.iter().map(|d| d.max_temp).fold(f64::NEG_INFINITY, f64::max);
        let lo = days.iter().map(|d| d.min_temp).fold(f64::INFINITY, f64::min);
        if hi - lo < 1.0 {
            let mid = (hi + lo) / 2.0;
            return Self { top: mid + 1.0, bottom: mid - 1.0 };
        }
        Self { top: hi, bottom: lo }
    }

    fn row(&self, temp: f64) -> usize {
        let frac = (self.top - temp) / (self.top - self.bottom);
        ((frac * (HEIGHT - 1) as f64).round() as usize).min(HEIGHT - 1)
    }

    fn value_at(&self, row: usize) -> f64 {
        self.top - row as f64 * (self.top - self.bottom) / (HEIGHT - 1) as f64
    }
}

fn center(day_idx: usize) -> usize {
    day_idx * COL_WIDTH + COL_WIDTH / 2
}

fn plot_series(grid: &mut [Vec<Cell>], rows: &[usize], point: Cell, line: Cell) {
    for (idx, pair) in rows.windows(2).enumerate() {
        let (x0, x1) = (center(idx), center(idx + 1));
        for x in x0 + 1..x1 {
            let t = (x - x0) as f64 / (x1 - x0) as f64;
            let y = (pair[0] as f64 + t * (pair[1] as f64 - pair[0] as f64)).round() as usize;
            if grid[y][x] == Cell::Empty {
                grid[y][x] = line;
            }
        }
    }
    for (idx, &y) in rows.iter().enumerate() {
        let x = center(idx);
        grid[y][x] = match grid[y][x] {
            Cell::High | Cell::Low | Cell::Both if grid[y][x] != point => Cell::Both,
            _ => point,
        };
    }
}

pub fn temperature_chart(ctx: &RenderContext, days: &[DailySummary]) -> String {
    let p = &ctx.palette;
    let unit = ctx.units.temperature_suffix();
    let mut out = String::new();

    let _ = writeln!(out, "{}", p.title.apply_to(format!("{}-Day Temperature Forecast ({unit})", days.len())));
    if days.is_empty() {
        let _ = writeln!(out, "{}", p.muted.apply_to("No forecast data available."));
        return out;
    }

    let scale = Scale::fit(days);
    let width = days.len() * COL_WIDTH;
    let mut grid = vec![vec![Cell::Empty; width]; HEIGHT];

    let highs: Vec<usize> = days.iter().map(|d| scale.row(d.max_temp)).collect();
    let lows: Vec<usize> = days.iter().map(|d| scale.row(d.min_temp)).collect();
    plot_series(&mut grid, &highs, Cell::High, Cell::HighLine);
    plot_series(&mut grid, &lows, Cell::Low, Cell::LowLine);

    for (row, cells) in grid.iter().enumerate() {
        let mut line = String::new();
        for cell in cells {
            let glyph = match cell {
                Cell::Empty => " ".to_string(),
                Cell::High => p.high.apply_to(HIGH_POINT).to_string(),
                Cell::Low => p.low.apply_to(LOW_POINT).to_string(),
                Cell::Both => p.high.apply_to(BOTH_POINT).to_string(),
                Cell::HighLine => p.high.apply_to(LINE).to_string(),
                Cell::LowLine => p.low.apply_to(LINE).to_string(),
            };
            line.push_str(&glyph);
        }
        let axis = format!("{:>w$.1} ┤", scale.value_at(row), w = AXIS_WIDTH - 2);
        let _ = writeln!(out, "{}{}", p.muted.apply_to(axis), line.trim_end());
    }

    let _ = writeln!(out, "{}{}", " ".repeat(AXIS_WIDTH - 1), p.muted.apply_to(format!("└{}", "─".repeat(width))));
    let labels: String = days
        .iter()
        .map(|d| pad_str(&day_label(d.date), COL_WIDTH, Alignment::Center, None).into_owned())
        .collect();
    let _ = writeln!(out, "{}{}", " ".repeat(AXIS_WIDTH), labels.trim_end());
    let _ = writeln!(
        out,
        "{}{} High  {} Low",
        " ".repeat(AXIS_WIDTH),
        p.high.apply_to(HIGH_POINT),
        p.low.apply_to(LOW_POINT)
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use console::strip_ansi_codes;
    use weather_core::{Theme, UnitSystem};

    fn day(d: u32, min: f64, max: f64) -> DailySummary {
        DailySummary {
            date: NaiveDate::from_ymd_opt(2024, 3, d).unwrap(),
            max_temp: max,
            min_temp: min,
            avg_humidity: 50.0,
            avg_wind: 2.0,
            condition: "clear sky".into(),
            icon: "01d".into(),
        }
    }

    fn plain(days: &[DailySummary], units: UnitSystem) -> String {
        let ctx = RenderContext::new(units, Theme::Dark);
        strip_ansi_codes(&temperature_chart(&ctx, days)).into_owned()
    }

    #[test]
    fn chart_title_and_axis_use_unit() {
        let out = plain(&[day(1, 10.0, 15.0), day(2, 8.0, 20.0)], UnitSystem::Imperial);
        assert!(out.starts_with("2-Day Temperature Forecast (°F)"));
        assert!(out.contains("20.0 ┤"));
        assert!(out.contains(" 8.0 ┤"));
        assert!(out.contains("Fri, Mar 01"));
        assert!(out.contains("Sat, Mar 02"));
    }

    #[test]
    fn one_high_and_one_low_marker_per_day() {
        let out = plain(&[day(1, 10.0, 15.0), day(2, 8.0, 20.0), day(3, 9.0, 12.0)], UnitSystem::Metric);
        // Legend contributes one of each.
        assert_eq!(out.matches(HIGH_POINT).count(), 3 + 1);
        assert_eq!(out.matches(LOW_POINT).count(), 3 + 1);
    }

    #[test]
    fn highest_value_sits_on_top_row() {
        let out = plain(&[day(1, 0.0, 9.0), day(2, 1.0, 5.0)], UnitSystem::Metric);
        let top_row = out.lines().nth(1).unwrap();
        assert!(top_row.contains(HIGH_POINT));
        assert!(top_row.starts_with("  9.0 ┤"));
    }

    #[test]
    fn flat_day_collapses_to_single_marker() {
        let out = plain(&[day(1, 4.0, 4.0)], UnitSystem::Metric);
        assert_eq!(out.matches(BOTH_POINT).count(), 1);
    }

    #[test]
    fn empty_forecast() {
        assert!(plain(&[], UnitSystem::Metric).contains("No forecast data"));
    }
}
