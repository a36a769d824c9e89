//! Time axis planning
//!
//! Picks the step granularity for the horizontal axis so that every step label
//! fits in its column. Small ranges step in hours; once no candidate fits, the
//! planner falls back to whole days, which always succeeds.
//!
//! Key invariants:
//! - `step_count >= 1` and `step_pixel_length > 0` for every plan
//! - One extra column is reserved so the first and last labels are never
//!   clipped at the plot edges

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use restime_core::{hours_between, LayoutError, LayoutResult, TimeRange};
use serde::Serialize;
use tracing::debug;

/// Step sizes in hours, tried smallest first
pub const DEFAULT_STEP_HOURS: [u32; 8] = [1, 2, 4, 6, 8, 12, 24, 48];

/// Spans longer than this many days label each step with its month
const MONTH_LABEL_THRESHOLD_DAYS: u64 = 30;

/// How a time value is rendered as an axis label
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelFormat {
    /// "3pm"
    HourOfDay,
    /// "5th"
    DayOfMonth,
    /// "Mar 5th"
    MonthDay,
    /// "Mar 5th, 2024"
    FullDate,
    /// "Mar 2024"
    MonthYear,
    /// "2024"
    Year,
}

impl LabelFormat {
    pub fn format(self, t: NaiveDateTime) -> String {
        match self {
            LabelFormat::HourOfDay => t.format("%-I%P").to_string(),
            LabelFormat::DayOfMonth => ordinal(t.day()),
            LabelFormat::MonthDay => format!("{} {}", t.format("%b"), ordinal(t.day())),
            LabelFormat::FullDate => {
                format!("{} {}, {}", t.format("%b"), ordinal(t.day()), t.year())
            }
            LabelFormat::MonthYear => t.format("%b %Y").to_string(),
            LabelFormat::Year => t.format("%Y").to_string(),
        }
    }
}

/// English ordinal: 1st, 2nd, 3rd, 4th, 11th, 21st
fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// One labelled step on the axis
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AxisTick {
    pub index: u32,
    pub time: NaiveDateTime,
    pub label: String,
}

/// The chosen granularity and pixel scale for one draw pass
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AxisPlan {
    /// Hours covered by one step
    pub step_hours: u32,
    /// Number of labelled steps
    pub step_count: u32,
    /// Pixel width of one step
    pub step_pixel_length: f64,
    /// Range start truncated to the hour, or to the day for day steps
    pub start_aligned: NaiveDateTime,
    /// Format of each step label
    pub label_format: LabelFormat,
    /// Format of the single header label
    pub header_label_format: LabelFormat,
}

impl AxisPlan {
    /// Whether steps are whole days
    pub fn is_day_granular(&self) -> bool {
        self.step_hours % 24 == 0
    }

    pub fn pixels_per_hour(&self) -> f64 {
        self.step_pixel_length / f64::from(self.step_hours)
    }

    /// Horizontal position of `t`, with `col_origin` at `start_aligned`
    pub fn time_to_x(&self, t: NaiveDateTime, col_origin: f64) -> f64 {
        col_origin + self.pixels_per_hour() * hours_between(self.start_aligned, t)
    }

    /// Inverse of [`AxisPlan::time_to_x`], rounded to the millisecond
    pub fn x_to_time(&self, x: f64, col_origin: f64) -> NaiveDateTime {
        let hours = (x - col_origin) / self.pixels_per_hour();
        self.start_aligned + Duration::milliseconds((hours * 3_600_000.0).round() as i64)
    }

    /// Time at the start of step `index`
    pub fn tick_time(&self, index: u32) -> NaiveDateTime {
        self.start_aligned + Duration::hours(i64::from(index) * i64::from(self.step_hours))
    }

    /// Every step with its formatted label
    pub fn ticks(&self) -> Vec<AxisTick> {
        (0..self.step_count)
            .map(|index| {
                let time = self.tick_time(index);
                AxisTick {
                    index,
                    time,
                    label: self.label_format.format(time),
                }
            })
            .collect()
    }

    /// The header label describing the whole visible range
    pub fn header_label(&self, range: &TimeRange) -> String {
        self.header_label_format.format(range.midpoint())
    }
}

/// Chooses step granularity under a label-width constraint
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeAxisPlanner {
    candidates: Vec<u32>,
}

impl Default for TimeAxisPlanner {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_STEP_HOURS.to_vec(),
        }
    }
}

impl TimeAxisPlanner {
    /// Planner over custom step candidates (hours, any order)
    pub fn new(candidates: impl IntoIterator<Item = u32>) -> LayoutResult<Self> {
        let mut candidates: Vec<u32> = candidates.into_iter().collect();
        candidates.sort_unstable();
        candidates.dedup();
        if candidates.is_empty() || candidates[0] == 0 {
            return Err(LayoutError::DegenerateLayout(
                "step candidates must be non-empty and positive".into(),
            ));
        }
        Ok(Self { candidates })
    }

    pub fn candidates(&self) -> &[u32] {
        &self.candidates
    }

    /// Plan the axis for `range` drawn across `available_width` pixels
    pub fn plan(
        &self,
        range: &TimeRange,
        available_width: f64,
        longest_label_width: f64,
        label_min_margin: f64,
    ) -> LayoutResult<AxisPlan> {
        if !(available_width.is_finite() && available_width > 0.0) {
            return Err(LayoutError::DegenerateLayout(format!(
                "available width must be positive, got {available_width}"
            )));
        }
        if !(longest_label_width.is_finite() && longest_label_width >= 0.0) {
            return Err(LayoutError::DegenerateLayout(format!(
                "label width must be non-negative, got {longest_label_width}"
            )));
        }
        if !(label_min_margin.is_finite() && label_min_margin >= 0.0) {
            return Err(LayoutError::DegenerateLayout(format!(
                "label margin must be non-negative, got {label_min_margin}"
            )));
        }

        let total_hours = range.hours();
        let one_step_min_width = longest_label_width.ceil() + label_min_margin;
        // Zero-width labels put no limit on the number of steps
        let max_steps = if one_step_min_width > 0.0 {
            ((available_width / one_step_min_width).floor() - 1.0).max(1.0)
        } else {
            f64::INFINITY
        };

        let step_hours = match self
            .candidates
            .iter()
            .copied()
            .find(|&step| (total_hours / f64::from(step)).ceil() < max_steps)
        {
            Some(step) => step,
            None => {
                let days = ((total_hours / max_steps) / 24.0).ceil().max(1.0);
                debug!(total_hours, max_steps, days, "axis falling back to day steps");
                let hours = 24.0 * days;
                if hours > f64::from(u32::MAX) {
                    return Err(LayoutError::DegenerateLayout(format!(
                        "a {days}-day step does not fit the axis"
                    )));
                }
                hours as u32
            }
        };

        let steps = (total_hours / f64::from(step_hours)).ceil().max(1.0);
        if steps >= f64::from(u32::MAX) {
            return Err(LayoutError::DegenerateLayout(format!(
                "{steps} steps of {step_hours}h do not fit the axis"
            )));
        }
        let step_count = steps as u32;
        let step_pixel_length = available_width / f64::from(step_count + 1);

        let (start_aligned, label_format, header_label_format) = if step_hours % 24 == 0 {
            let midnight = range.start().date().and_time(chrono::NaiveTime::MIN);
            let span_days = u64::from(step_hours) * u64::from(step_count) / 24;
            if span_days > MONTH_LABEL_THRESHOLD_DAYS {
                (midnight, LabelFormat::MonthDay, LabelFormat::Year)
            } else {
                (midnight, LabelFormat::DayOfMonth, LabelFormat::MonthYear)
            }
        } else {
            (
                truncate_to_hour(range.start()),
                LabelFormat::HourOfDay,
                LabelFormat::FullDate,
            )
        };

        debug!(
            step_hours,
            step_count, step_pixel_length, "planned time axis"
        );

        Ok(AxisPlan {
            step_hours,
            step_count,
            step_pixel_length,
            start_aligned,
            label_format,
            header_label_format,
        })
    }
}

fn truncate_to_hour(t: NaiveDateTime) -> NaiveDateTime {
    t - Duration::seconds(i64::from(t.minute() * 60 + t.second()))
        - Duration::nanoseconds(i64::from(t.nanosecond()))
}
