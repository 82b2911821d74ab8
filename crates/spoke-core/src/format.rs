//! Number formatting for grid ring labels.
//!
//! Supports the subset of d3-format specifiers that make sense for ring values: `.Nf` (fixed),
//! `.N%` (percent of the value) and `d` (rounded integer).

use crate::{Error, Result};
use std::fmt;
use std::sync::Arc;

type FormatFn = dyn Fn(f64) -> String + Send + Sync;

#[derive(Clone)]
pub enum LevelFormat {
    Fixed { precision: usize },
    Percent { precision: usize },
    Integer,
    Custom(Arc<FormatFn>),
}

impl LevelFormat {
    pub fn custom(f: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    pub fn parse(spec: &str) -> Result<Self> {
        let s = spec.trim();
        if s == "d" {
            return Ok(Self::Integer);
        }
        let invalid = || Error::config("format", format!("unsupported format specifier `{s}`"));
        let (body, kind) = match s.char_indices().last() {
            Some((idx, 'f')) => (&s[..idx], 'f'),
            Some((idx, '%')) => (&s[..idx], '%'),
            _ => return Err(invalid()),
        };
        let precision = match body {
            "" => 6,
            digits => digits
                .strip_prefix('.')
                .and_then(|d| d.parse::<usize>().ok())
                .ok_or_else(invalid)?,
        };
        Ok(match kind {
            'f' => Self::Fixed { precision },
            _ => Self::Percent { precision },
        })
    }

    pub fn format(&self, value: f64) -> String {
        let out = match self {
            LevelFormat::Fixed { precision } => to_fixed(value, *precision),
            LevelFormat::Percent { precision } => {
                format!("{}%", to_fixed(value * 100.0, *precision))
            }
            LevelFormat::Integer => format!("{}", value.round() as i64),
            LevelFormat::Custom(f) => return f(value),
        };
        // `format!` keeps the sign of negative zero ("-0"); d3 does not.
        match out.strip_prefix('-') {
            Some(rest) if rest.trim_end_matches('%').chars().all(|c| c == '0' || c == '.') => {
                rest.to_string()
            }
            _ => out,
        }
    }
}

/// Fixed-point formatting with halves rounded away from zero, like JavaScript `toFixed`.
fn to_fixed(value: f64, precision: usize) -> String {
    let factor = 10f64.powi(i32::try_from(precision).unwrap_or(i32::MAX));
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        format!("{rounded:.precision$}")
    } else {
        format!("{value:.precision$}")
    }
}

impl Default for LevelFormat {
    fn default() -> Self {
        Self::Fixed { precision: 0 }
    }
}

impl fmt::Debug for LevelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelFormat::Fixed { precision } => write!(f, "Fixed(.{precision}f)"),
            LevelFormat::Percent { precision } => write!(f, "Percent(.{precision}%)"),
            LevelFormat::Integer => f.write_str("Integer"),
            LevelFormat::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero_decimal_fixed() {
        let f = LevelFormat::default();
        assert_eq!(f.format(1.6), "2");
        assert_eq!(f.format(8.0), "8");
    }

    #[test]
    fn parses_d3_subset() {
        assert_eq!(LevelFormat::parse(".1f").unwrap().format(1.25), "1.3");
        assert_eq!(LevelFormat::parse(".0%").unwrap().format(0.25), "25%");
        assert_eq!(LevelFormat::parse("d").unwrap().format(2.6), "3");
        assert!(LevelFormat::parse(".x").is_err());
        assert!(LevelFormat::parse("e").is_err());
    }

    #[test]
    fn halves_round_away_from_zero() {
        let f = LevelFormat::default();
        assert_eq!(f.format(2.5), "3");
        assert_eq!(f.format(0.5), "1");
        assert_eq!(f.format(-2.5), "-3");
        assert_eq!(LevelFormat::parse(".0%").unwrap().format(0.125), "13%");
    }

    #[test]
    fn negative_zero_is_unsigned() {
        assert_eq!(LevelFormat::default().format(-0.2), "0");
    }

    #[test]
    fn custom_formatter_is_used_verbatim() {
        let f = LevelFormat::custom(|v| format!("{v} pts"));
        assert_eq!(f.format(4.0), "4 pts");
    }
}
