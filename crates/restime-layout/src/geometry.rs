//! Allocation geometry
//!
//! Maps an allocation's time range and row spans onto pixel rectangles, one
//! per span, clipped horizontally to the visible window and then inset.

use restime_core::{hours_between, Allocation, LayoutError, LayoutResult, Rect, RowSpan};
use serde::Serialize;
use tracing::trace;

use crate::axis::AxisPlan;

/// Pixel origins and row pitch of the calendar grid
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GridFrame {
    /// Height of one resource row
    pub row_height: f64,
    /// Top of row 0
    pub row_origin_y: f64,
    /// Horizontal position of `AxisPlan::start_aligned`
    pub col_origin_x: f64,
}

/// Horizontal pixel range in which blocks may be drawn
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VisibleWindow {
    pub x_min: f64,
    pub x_max: f64,
}

impl VisibleWindow {
    pub fn new(x_min: f64, x_max: f64) -> Self {
        Self { x_min, x_max }
    }

    /// Clip the horizontal extent `[x, x + width]`; `None` when nothing is visible
    pub fn clip(&self, x: f64, width: f64) -> Option<(f64, f64)> {
        let right = x + width;
        if right <= self.x_min || x >= self.x_max {
            return None;
        }
        let left = x.max(self.x_min);
        let right = right.min(self.x_max);
        Some((left, right - left))
    }
}

/// One rectangle per row span of `allocation`
///
/// Spans that fall entirely outside `window` produce nothing. `inset` is
/// removed from every side after clipping; width and height clamp at zero.
pub fn map_allocation(
    allocation: &Allocation,
    spans: &[RowSpan],
    plan: &AxisPlan,
    frame: &GridFrame,
    window: &VisibleWindow,
    inset: f64,
) -> LayoutResult<Vec<Rect>> {
    allocation.time_range()?;
    if !(frame.row_height.is_finite() && frame.row_height > 0.0) {
        return Err(LayoutError::DegenerateLayout(format!(
            "row height must be positive, got {}",
            frame.row_height
        )));
    }
    if window.x_min.is_nan() || window.x_max.is_nan() || window.x_min > window.x_max {
        return Err(LayoutError::DegenerateLayout(format!(
            "visible window [{}, {}] is inverted",
            window.x_min, window.x_max
        )));
    }
    if !(inset.is_finite() && inset >= 0.0) {
        return Err(LayoutError::DegenerateLayout(format!(
            "inset must be non-negative, got {inset}"
        )));
    }

    let x = plan.time_to_x(allocation.begin, frame.col_origin_x);
    let width = plan.pixels_per_hour() * hours_between(allocation.begin, allocation.end);

    let Some((x, width)) = window.clip(x, width) else {
        trace!(name = %allocation.name, "allocation outside visible window");
        return Ok(Vec::new());
    };

    Ok(spans
        .iter()
        .map(|span| {
            let y = frame.row_origin_y + span.first_row as f64 * frame.row_height;
            let height = span.row_count as f64 * frame.row_height;
            Rect::new(x, y, width, height).inset(inset)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::TimeAxisPlanner;
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;
    use restime_core::TimeRange;

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    // One day over 800px with 30px labels: 1h steps of 32px
    fn hourly_plan() -> AxisPlan {
        let range = TimeRange::new(at(0, 0), at(23, 59)).unwrap();
        TimeAxisPlanner::default()
            .plan(&range, 800.0, 30.0, 0.0)
            .unwrap()
    }

    fn frame() -> GridFrame {
        GridFrame {
            row_height: 20.0,
            row_origin_y: 65.0,
            col_origin_x: 0.0,
        }
    }

    #[test]
    fn maps_one_rect_per_span() {
        let plan = hourly_plan();
        assert_eq!(plan.step_pixel_length, 32.0);
        let alloc = Allocation::new("job", at(2, 0), at(5, 30)).resource("R1");
        let spans = [RowSpan::new(0, 2), RowSpan::new(3, 1)];
        let window = VisibleWindow::new(0.0, 800.0);

        let rects = map_allocation(&alloc, &spans, &plan, &frame(), &window, 0.0).unwrap();

        assert_eq!(
            rects,
            vec![
                Rect::new(64.0, 65.0, 112.0, 40.0),
                Rect::new(64.0, 125.0, 112.0, 20.0),
            ]
        );
    }

    #[test]
    fn allocation_outside_window_yields_nothing() {
        let plan = hourly_plan();
        let alloc = Allocation::new("late", at(20, 0), at(22, 0)).resource("R1");
        let window = VisibleWindow::new(0.0, 600.0);
        let rects = map_allocation(
            &alloc,
            &[RowSpan::new(0, 1)],
            &plan,
            &frame(),
            &window,
            1.0,
        )
        .unwrap();
        assert!(rects.is_empty());
    }

    #[test]
    fn left_overhang_is_truncated() {
        let plan = hourly_plan();
        let alloc = Allocation::new("early", at(1, 0), at(4, 0)).resource("R1");
        // Starts at x=32, window opens at x=50: 18px overhang
        let window = VisibleWindow::new(50.0, 800.0);
        let rects = map_allocation(
            &alloc,
            &[RowSpan::new(0, 1)],
            &plan,
            &frame(),
            &window,
            0.0,
        )
        .unwrap();

        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].x, 50.0);
        assert_eq!(rects[0].width, 96.0 - 18.0);
    }

    #[test]
    fn right_overhang_is_truncated() {
        let plan = hourly_plan();
        let alloc = Allocation::new("late", at(20, 0), at(23, 0)).resource("R1");
        let window = VisibleWindow::new(0.0, 700.0);
        let rects = map_allocation(
            &alloc,
            &[RowSpan::new(0, 1)],
            &plan,
            &frame(),
            &window,
            0.0,
        )
        .unwrap();
        assert_eq!(rects[0].x, 640.0);
        assert_eq!(rects[0].right(), 700.0);
    }

    #[test]
    fn inset_shrinks_and_clamps() {
        let plan = hourly_plan();
        // 3 minutes is 1.6px wide, narrower than a 1px inset on both sides
        let alloc = Allocation::new("blip", at(3, 0), at(3, 3)).resource("R1");
        let window = VisibleWindow::new(0.0, 800.0);
        let rects = map_allocation(
            &alloc,
            &[RowSpan::new(1, 1)],
            &plan,
            &frame(),
            &window,
            1.0,
        )
        .unwrap();
        assert_eq!(rects[0].width, 0.0);
        assert_eq!(rects[0].height, 18.0);
        assert_eq!(rects[0].y, 86.0);
    }

    #[test]
    fn x_maps_back_to_begin_and_end() {
        let plan = hourly_plan();
        let window = VisibleWindow::new(0.0, 800.0);
        // One pixel is 1/32 of an hour
        let tolerance_ms = 3_600_000 / 32;
        for (b, e) in [((0, 0), (1, 0)), ((3, 17), (9, 44)), ((12, 5), (23, 59))] {
            let alloc = Allocation::new("rt", at(b.0, b.1), at(e.0, e.1)).resource("R1");
            let rects = map_allocation(
                &alloc,
                &[RowSpan::new(0, 1)],
                &plan,
                &frame(),
                &window,
                0.0,
            )
            .unwrap();
            let begin = plan.x_to_time(rects[0].x, 0.0);
            let end = plan.x_to_time(rects[0].right(), 0.0);
            assert!((begin - alloc.begin).num_milliseconds().abs() <= tolerance_ms);
            assert!((end - alloc.end).num_milliseconds().abs() <= tolerance_ms);
        }
    }

    #[test]
    fn rejects_bad_inputs() {
        let plan = hourly_plan();
        let window = VisibleWindow::new(0.0, 800.0);
        let spans = [RowSpan::new(0, 1)];

        let backwards = Allocation::new("b", at(5, 0), at(4, 0)).resource("R1");
        assert!(matches!(
            map_allocation(&backwards, &spans, &plan, &frame(), &window, 0.0),
            Err(LayoutError::InvalidTimeRange { .. })
        ));

        let ok = Allocation::new("ok", at(1, 0), at(2, 0)).resource("R1");
        let flat = GridFrame {
            row_height: 0.0,
            ..frame()
        };
        assert!(map_allocation(&ok, &spans, &plan, &flat, &window, 0.0).is_err());

        let inverted = VisibleWindow::new(10.0, 5.0);
        assert!(map_allocation(&ok, &spans, &plan, &frame(), &inverted, 0.0).is_err());
    }

    #[test]
    fn clip_handles_edges() {
        let window = VisibleWindow::new(10.0, 20.0);
        assert_eq!(window.clip(0.0, 10.0), None);
        assert_eq!(window.clip(20.0, 5.0), None);
        assert_eq!(window.clip(5.0, 30.0), Some((10.0, 10.0)));
        assert_eq!(window.clip(12.0, 3.0), Some((12.0, 3.0)));
    }
}
