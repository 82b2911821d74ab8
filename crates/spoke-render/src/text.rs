use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 14.0,
            font_weight: None,
        }
    }
}

impl TextStyle {
    pub fn sized(font_size: f64) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Font-independent measurer: every terminal column is `char_width_factor` em wide.
///
/// Wide (East Asian) characters count as two columns.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };

        let font_size = style.font_size.max(1.0);
        let lines: Vec<&str> = text.split('\n').collect();
        let max_cols = lines.iter().map(|l| l.width()).max().unwrap_or(0);

        TextMetrics {
            width: max_cols as f64 * font_size * char_width_factor,
            height: lines.len() as f64 * font_size * line_height_factor,
            line_count: lines.len(),
        }
    }
}

/// Greedy word wrap: words accumulate on a line until the measured width would exceed
/// `max_width_px`, then a new line starts. A single word wider than the budget keeps its own line.
pub fn wrap_words(
    text: &str,
    max_width_px: f64,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut line: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        line.push(word);
        if line.len() > 1 && measurer.measure(&line.join(" "), style).width > max_width_px {
            line.pop();
            out.push(line.join(" "));
            line.clear();
            line.push(word);
        }
    }
    if !line.is_empty() {
        out.push(line.join(" "));
    }

    if out.is_empty() {
        vec![String::new()]
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m() -> DeterministicTextMeasurer {
        DeterministicTextMeasurer::default()
    }

    #[test]
    fn deterministic_width_counts_columns() {
        let style = TextStyle::sized(10.0);
        assert_eq!(m().measure("abcd", &style).width, 24.0);
        assert_eq!(m().measure("ab\nabcdef", &style).line_count, 2);
        // Two wide characters occupy four columns.
        assert_eq!(m().measure("漢字", &style).width, 24.0);
    }

    #[test]
    fn wraps_greedily_at_budget() {
        // 14px * 0.6 = 8.4px per column; 100px fits 11 columns.
        let style = TextStyle::sized(14.0);
        let lines = wrap_words("Evidence-Backed Strategies", 100.0, &style, &m());
        assert_eq!(lines, ["Evidence-Backed", "Strategies"]);

        let lines = wrap_words("Data Collection", 200.0, &style, &m());
        assert_eq!(lines, ["Data Collection"]);
    }

    #[test]
    fn collapses_whitespace_and_handles_empty_labels() {
        let style = TextStyle::sized(14.0);
        assert_eq!(wrap_words("  a   b ", 500.0, &style, &m()), ["a b"]);
        assert_eq!(wrap_words("   ", 500.0, &style, &m()), [""]);
    }

    #[test]
    fn rewrapping_is_idempotent() {
        let style = TextStyle::sized(14.0);
        let text = "School Collaboration and Community Impact across the district";
        for width in [40.0, 90.0, 150.0, 400.0] {
            let once = wrap_words(text, width, &style, &m());
            let twice = wrap_words(&once.join(" "), width, &style, &m());
            assert_eq!(once, twice, "width {width}");
            for line in &once {
                assert_eq!(&wrap_words(line, width, &style, &m()), &[line.clone()]);
            }
        }
    }
}
