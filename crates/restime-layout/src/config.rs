//! Layout configuration
//!
//! Every field has a documented default; documents may override any subset
//! (`#[serde(default)]`).

use restime_core::{FontStyle, LayoutError, LayoutResult};
use serde::{Deserialize, Serialize};

use crate::axis::DEFAULT_STEP_HOURS;

/// Geometry and typography settings for one layout pass
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Canvas width in pixels (default: 800)
    pub width: f64,
    /// Canvas height in pixels (default: 600)
    pub height: f64,
    /// Padding around the calendar (default: 5)
    pub padding: f64,
    /// Smallest accepted canvas width (default: 80)
    pub min_width: f64,
    /// Smallest accepted canvas height (default: 60)
    pub min_height: f64,
    /// Height of each of the two header bands (default: 30)
    pub header_height: f64,
    /// Extra horizontal room required beside each axis label (default: 0)
    pub label_min_margin: f64,
    /// Candidate step sizes in hours, tried smallest first
    pub step_candidates: Vec<u32>,
    /// Pixels removed from every side of an allocation block (default: 1)
    pub block_inset: f64,
    /// Rounded-corner radius handed to the renderer (default: 5)
    pub corner_radius: f64,
    /// Perpendicular distance between hatch lines (default: 5)
    pub hatch_spacing: f64,
    /// Font for axis and resource labels
    pub calendar_font: FontStyle,
    /// Font for allocation names
    pub allocation_font: FontStyle,
    /// Owner labels use the allocation font shrunk by this many pixels
    pub owner_font_delta: f64,
    /// Font size of the single header title (default: 25)
    pub title_font_size: f64,
    /// Minimum label the axis must fit, even with short resource names
    pub placeholder_label: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            padding: 5.0,
            min_width: 80.0,
            min_height: 60.0,
            header_height: 30.0,
            label_min_margin: 0.0,
            step_candidates: DEFAULT_STEP_HOURS.to_vec(),
            block_inset: 1.0,
            corner_radius: 5.0,
            hatch_spacing: 5.0,
            calendar_font: FontStyle::new("Calibri", 12.0),
            allocation_font: FontStyle::new("Calibri", 15.0),
            owner_font_delta: 3.0,
            title_font_size: 25.0,
            placeholder_label: "XXAM".into(),
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure canvas width
    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Configure canvas height
    pub fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Configure padding around the calendar
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Configure header band height
    pub fn header_height(mut self, height: f64) -> Self {
        self.header_height = height;
        self
    }

    /// Configure the margin required beside axis labels
    pub fn label_min_margin(mut self, margin: f64) -> Self {
        self.label_min_margin = margin;
        self
    }

    /// Replace the step-size candidates
    pub fn step_candidates(mut self, candidates: Vec<u32>) -> Self {
        self.step_candidates = candidates;
        self
    }

    /// Configure the block inset
    pub fn block_inset(mut self, inset: f64) -> Self {
        self.block_inset = inset;
        self
    }

    /// Configure hatch line spacing
    pub fn hatch_spacing(mut self, spacing: f64) -> Self {
        self.hatch_spacing = spacing;
        self
    }

    /// Copy with the canvas clamped to its minimums and padding clamped to
    /// half the shorter side
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        if out.width.is_nan() || out.width < out.min_width {
            out.width = out.min_width;
        }
        if out.height.is_nan() || out.height < out.min_height {
            out.height = out.min_height;
        }
        let max_padding = out.width.min(out.height) / 2.0;
        if out.padding > max_padding {
            out.padding = max_padding;
        }
        out
    }

    /// Reject values no layout can be built from
    pub fn validate(&self) -> LayoutResult<()> {
        let non_negative = [
            ("min_width", self.min_width),
            ("min_height", self.min_height),
            ("padding", self.padding),
            ("header_height", self.header_height),
            ("label_min_margin", self.label_min_margin),
            ("block_inset", self.block_inset),
            ("corner_radius", self.corner_radius),
            ("owner_font_delta", self.owner_font_delta),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::DegenerateLayout(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !(self.hatch_spacing.is_finite() && self.hatch_spacing > 0.0) {
            return Err(LayoutError::DegenerateLayout(format!(
                "hatch_spacing must be positive, got {}",
                self.hatch_spacing
            )));
        }
        for font in [&self.calendar_font, &self.allocation_font] {
            if !(font.size.is_finite() && font.size > 0.0) {
                return Err(LayoutError::DegenerateLayout(format!(
                    "font '{}' has invalid size {}",
                    font.family, font.size
                )));
            }
        }
        if self.step_candidates.is_empty() || self.step_candidates.contains(&0) {
            return Err(LayoutError::DegenerateLayout(
                "step_candidates must be non-empty and positive".into(),
            ));
        }
        Ok(())
    }
}
