//! Full layout pass
//!
//! Turns a [`Timeline`] into everything a renderer needs: header lines and
//! labels, row bands, grid lines, and allocation blocks in draw order. The
//! engine only computes geometry; drawing is left to the caller.
//!
//! ```text
//!  padding
//!  ┌────────────────────────────────────────────┐
//!  │                 Mar 5th, 2024              │  header band 1 (title)
//!  ├────────────────────────────────────────────┤
//!  │      12am    4am    8am    12pm   4pm  8pm │  header band 2 (ticks)
//!  ├──────┬──────┬──────┬──────┬──────┬─────┬───┤
//!  │ gpu-0│      │ ▓▓▓▓▓▓▓▓▓▓▓ │      │     │   │  one row per resource
//!  ├──────┼──────┼──────┼──────┼──────┼─────┼───┤
//!  │ gpu-1│      │ ▓▓▓▓▓▓▓▓▓▓▓ │ ╲╲╲╲╲╲╲╲╲  │   │
//!  └──────┴──────┴──────┴──────┴──────┴─────┴───┘
//!   first column holds the resource labels
//! ```

use rand::Rng;
use restime_core::{
    LayoutError, LayoutResult, Point, Rect, ResourceList, Segment, ShareType,
    TextMetrics, Timeline,
};
use serde::Serialize;
use tracing::debug;

use crate::axis::{AxisPlan, TimeAxisPlanner};
use crate::config::LayoutConfig;
use crate::geometry::{map_allocation, GridFrame, VisibleWindow};
use crate::grouping::group_rows;
use crate::hatch::hatch;
use crate::sequence::draw_order;

/// Baseline offset of tick labels above the header's bottom line
const TICK_BASELINE_OFFSET: f64 = 5.0;

/// A piece of text anchored at its centre baseline
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub anchor: Point,
    pub font_size: f64,
    /// Rotated -90 degrees around the anchor
    pub rotated: bool,
}

impl Label {
    fn new(text: impl Into<String>, anchor: Point, font_size: f64) -> Self {
        Self {
            text: text.into(),
            anchor,
            font_size,
            rotated: false,
        }
    }
}

/// One resource row
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RowLayout {
    pub resource: String,
    pub band: Rect,
    pub label: Label,
    /// Horizontal line under the row
    pub separator: Segment,
}

/// One rectangle of one allocation
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BlockLayout {
    /// Index into `Timeline::allocations`
    pub allocation: usize,
    pub share_type: ShareType,
    pub rect: Rect,
    pub corner_radius: f64,
    pub name: Label,
    pub owner: Label,
    /// Diagonal fill lines; empty for exclusive allocations
    pub hatch: Vec<Segment>,
}

/// Everything computed for one draw pass
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineLayout {
    /// Canvas width after sanitizing
    pub width: f64,
    /// Canvas height, grown when the rows do not fit
    pub height: f64,
    pub padding: f64,
    pub axis: AxisPlan,
    pub frame: GridFrame,
    pub window: VisibleWindow,
    pub header_lines: Vec<Segment>,
    pub title: Label,
    pub ticks: Vec<Label>,
    pub rows: Vec<RowLayout>,
    /// Column lines and the left and right borders
    pub grid_lines: Vec<Segment>,
    /// Blocks in draw order; later blocks are drawn on top
    pub blocks: Vec<BlockLayout>,
}

/// Runs the complete layout for a timeline
#[derive(Clone, Debug)]
pub struct LayoutEngine<M> {
    config: LayoutConfig,
    metrics: M,
}

impl<M: TextMetrics> LayoutEngine<M> {
    pub fn new(config: LayoutConfig, metrics: M) -> Self {
        Self { config, metrics }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `timeline`, breaking stacking ties with the thread RNG
    pub fn layout(&self, timeline: &Timeline) -> LayoutResult<TimelineLayout> {
        self.layout_with_rng(timeline, &mut rand::thread_rng())
    }

    /// Lay out `timeline` with a caller-supplied RNG for stacking ties
    pub fn layout_with_rng<R>(&self, timeline: &Timeline, rng: &mut R) -> LayoutResult<TimelineLayout>
    where
        R: Rng + ?Sized,
    {
        self.config.validate()?;
        timeline.validate()?;

        let cfg = self.config.sanitized();
        let font = &cfg.calendar_font;
        let padding = cfg.padding;
        let calendar_width = cfg.width - 2.0 * padding;
        if calendar_width <= 0.0 {
            return Err(LayoutError::DegenerateLayout(format!(
                "no room for the calendar: width {} with padding {}",
                cfg.width, padding
            )));
        }
        let calendar_right = padding + calendar_width;

        let longest = longest_label(&cfg.placeholder_label, &timeline.resources);
        let label_width = self.metrics.measure(longest, font);
        let planner = TimeAxisPlanner::new(cfg.step_candidates.iter().copied())?;
        let axis = planner.plan(
            &timeline.range,
            calendar_width,
            label_width,
            cfg.label_min_margin,
        )?;
        let step = axis.step_pixel_length;

        // Header
        let header_bottom = padding + 2.0 * cfg.header_height;
        let header_lines = [padding, padding + cfg.header_height, header_bottom]
            .into_iter()
            .map(|y| horizontal(padding, calendar_right, y))
            .collect();
        let tick_y = header_bottom - TICK_BASELINE_OFFSET;
        let ticks = axis
            .ticks()
            .into_iter()
            .map(|tick| {
                let x = padding + step * f64::from(tick.index + 1);
                Label::new(tick.label, Point::new(x, tick_y), font.size)
            })
            .collect();
        let title = Label::new(
            axis.header_label(&timeline.range),
            Point::new(padding + calendar_width / 2.0, tick_y - cfg.header_height),
            cfg.title_font_size,
        );

        let frame = GridFrame {
            row_height: 0.0,
            row_origin_y: header_bottom,
            col_origin_x: padding + step,
        };
        let window = VisibleWindow::new(
            axis.time_to_x(timeline.range.start(), frame.col_origin_x)
                .clamp(padding, calendar_right),
            axis.time_to_x(timeline.range.end(), frame.col_origin_x)
                .clamp(padding, calendar_right),
        );

        let mut layout = TimelineLayout {
            width: cfg.width,
            height: cfg.height,
            padding,
            axis,
            frame,
            window,
            header_lines,
            title,
            ticks,
            rows: Vec::new(),
            grid_lines: Vec::new(),
            blocks: Vec::new(),
        };
        if timeline.resources.is_empty() {
            return Ok(layout);
        }

        // Rows
        let row_count = timeline.resources.len() as f64;
        let min_row_height = font.size + 2.0;
        let row_height = ((cfg.height - 2.0 * padding - 2.0 * cfg.header_height) / row_count)
            .max(min_row_height);
        layout.frame.row_height = row_height;

        let name_width = timeline
            .resources
            .longest()
            .map_or(0.0, |name| self.metrics.measure(name, font));
        let needed = name_width + cfg.label_min_margin;
        let rotated = needed > step && needed < row_height;

        for (i, resource) in timeline.resources.iter().enumerate() {
            let top = header_bottom + i as f64 * row_height;
            let mut label = Label::new(
                resource,
                Point::new(padding + step / 2.0, top + row_height / 2.0 + font.size / 2.0),
                font.size,
            );
            label.rotated = rotated;
            layout.rows.push(RowLayout {
                resource: resource.to_string(),
                band: Rect::new(padding, top, calendar_width, row_height),
                label,
                separator: horizontal(padding, calendar_right, top + row_height),
            });
        }

        let rows_bottom = header_bottom + row_count * row_height;
        let needed_height = rows_bottom + padding;
        if needed_height > layout.height {
            debug!(from = layout.height, to = needed_height, "growing canvas to fit rows");
            layout.height = needed_height;
        }

        // Grid
        for i in 0..layout.axis.step_count {
            let x = padding + step * f64::from(i + 1);
            layout.grid_lines.push(vertical(x, header_bottom, rows_bottom));
        }
        layout.grid_lines.push(vertical(padding, padding, rows_bottom));
        layout.grid_lines.push(vertical(calendar_right, padding, rows_bottom));

        // Blocks
        let order = draw_order(&timeline.allocations, rng)?;
        let name_size = cfg.allocation_font.size;
        let owner_size = (name_size - cfg.owner_font_delta).max(0.0);
        for index in order {
            let allocation = &timeline.allocations[index];
            let spans = group_rows(
                allocation.resources.iter().map(String::as_str),
                &timeline.resources,
            )?;
            if spans.is_empty() {
                continue;
            }
            let rects = map_allocation(
                allocation,
                &spans,
                &layout.axis,
                &layout.frame,
                &layout.window,
                cfg.block_inset,
            )?;
            for rect in rects {
                let hatch = if allocation.share_type.is_hatched() {
                    hatch(&rect, cfg.hatch_spacing)?
                } else {
                    Vec::new()
                };
                let center = rect.center();
                layout.blocks.push(BlockLayout {
                    allocation: index,
                    share_type: allocation.share_type,
                    rect,
                    corner_radius: cfg.corner_radius,
                    name: Label::new(allocation.name.clone(), center, name_size),
                    owner: Label::new(
                        allocation.owner.clone(),
                        Point::new(center.x, center.y + owner_size),
                        owner_size,
                    ),
                    hatch,
                });
            }
        }

        debug!(
            rows = layout.rows.len(),
            blocks = layout.blocks.len(),
            "timeline layout complete"
        );
        Ok(layout)
    }
}

/// The label the axis must make room for: the longest resource name, or the
/// placeholder when every name is shorter
pub fn longest_label<'a>(placeholder: &'a str, resources: &'a ResourceList) -> &'a str {
    match resources.longest() {
        Some(name) if name.chars().count() > placeholder.chars().count() => name,
        _ => placeholder,
    }
}

fn horizontal(x1: f64, x2: f64, y: f64) -> Segment {
    Segment::new(Point::new(x1, y), Point::new(x2, y))
}

fn vertical(x: f64, y1: f64, y2: f64) -> Segment {
    Segment::new(Point::new(x, y1), Point::new(x, y2))
}
