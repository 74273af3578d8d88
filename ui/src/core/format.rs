//! Formatting helpers for presenting trade values.

use serde::{Deserialize, Serialize};

/// How a numeric axis or tooltip value is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueFormat {
    #[default]
    Currency,
    Number,
    Year,
}

impl ValueFormat {
    pub fn format(self, value: f64) -> String {
        match self {
            ValueFormat::Currency => format_currency(value),
            ValueFormat::Number => format_compact(value),
            ValueFormat::Year => format!("{value:.0}"),
        }
    }
}

/// Compact dollar notation: `$1.2B`, `$350.0M`, `$12.5K`, `$900`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "—".into();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${}", format_compact(value.abs()))
}

/// Compact number with a magnitude suffix.
pub fn format_compact(value: f64) -> String {
    if !value.is_finite() {
        return "—".into();
    }
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    if abs >= 1e12 {
        format!("{sign}{:.1}T", abs / 1e12)
    } else if abs >= 1e9 {
        format!("{sign}{:.1}B", abs / 1e9)
    } else if abs >= 1e6 {
        format!("{sign}{:.1}M", abs / 1e6)
    } else if abs >= 1e3 {
        format!("{sign}{:.1}K", abs / 1e3)
    } else {
        format!("{sign}{abs:.0}")
    }
}

pub fn format_percent(value: f64) -> String {
    if value.is_finite() {
        format!("{:.1}%", value * 100.0)
    } else {
        "—".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_currency_picks_magnitude() {
        assert_eq!(format_currency(1_240_000_000.0), "$1.2B");
        assert_eq!(format_currency(350_000_000.0), "$350.0M");
        assert_eq!(format_currency(12_500.0), "$12.5K");
        assert_eq!(format_currency(900.0), "$900");
        assert_eq!(format_currency(-2_000.0), "-$2.0K");
    }

    #[test]
    fn non_finite_values_render_dash() {
        assert_eq!(format_currency(f64::NAN), "—");
        assert_eq!(format_percent(f64::INFINITY), "—");
    }
}
