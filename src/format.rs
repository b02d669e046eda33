//! Small formatting helpers shared by the screens.

use std::time::Duration;

use ratatui::style::Color;

/// `72.456` -> `"72.5%"`; whole numbers drop the decimal.
pub fn percentage(value: f64) -> String {
    let value = value.clamp(0.0, 100.0);
    if (value - value.round()).abs() < 0.05 {
        format!("{:.0}%", value.round())
    } else {
        format!("{value:.1}%")
    }
}

/// Share of `part` in `whole`, in percent.
pub fn ratio(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) * 100.0 / f64::from(whole)
    }
}

/// Color for a score in percent.
pub fn grade_color(percent: f64) -> Color {
    match percent {
        p if p >= 90.0 => Color::Green,
        p if p >= 70.0 => Color::Cyan,
        p if p >= 50.0 => Color::Yellow,
        _ => Color::Red,
    }
}

/// `mm:ss`, or `h:mm:ss` past an hour.
pub fn countdown(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Color of the countdown: red in the last minute, yellow in the last five.
pub fn countdown_color(remaining: Duration) -> Color {
    match remaining.as_secs() {
        0..=59 => Color::Red,
        60..=299 => Color::Yellow,
        _ => Color::Green,
    }
}

/// Cut `text` to `max` characters, ending with an ellipsis when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// `"1 quiz"` / `"3 quizzes"`.
pub fn plural(count: usize, one: &str, many: &str) -> String {
    let noun = if count == 1 { one } else { many };
    format!("{count} {noun}")
}
