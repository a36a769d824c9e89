//! Built-in text measurement

use restime_core::{FontStyle, TextMetrics};

/// Fixed-advance approximation: every character is `size * advance_ratio` wide
///
/// Good enough for terminals, tests and headless layout; hosts with real font
/// metrics implement [`TextMetrics`] themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMetrics {
    pub advance_ratio: f64,
}

impl MonospaceMetrics {
    pub fn new(advance_ratio: f64) -> Self {
        Self { advance_ratio }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl TextMetrics for MonospaceMetrics {
    fn measure(&self, text: &str, style: &FontStyle) -> f64 {
        text.chars().count() as f64 * style.size * self.advance_ratio
    }
}
