//! # restime-layout
//!
//! Layout engine for resource timelines.
//!
//! This crate provides:
//! - Time axis planning under a label-width constraint ([`axis`])
//! - Contiguous row grouping of an allocation's resources ([`grouping`])
//! - Overlap-aware draw ordering ([`sequence`])
//! - Time/row to pixel mapping with clipping ([`geometry`])
//! - Diagonal hatch fills ([`hatch`])
//! - A full layout pass producing everything a renderer needs ([`engine`])
//!
//! All functions are pure: inputs are borrowed, results are returned, and no
//! drawing surface is ever touched.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use restime_core::{Allocation, ResourceList, TimeRange, Timeline};
//! use restime_layout::{LayoutConfig, LayoutEngine, MonospaceMetrics};
//!
//! let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
//! let range = TimeRange::new(
//!     day.and_hms_opt(0, 0, 0).unwrap(),
//!     day.and_hms_opt(23, 0, 0).unwrap(),
//! )
//! .unwrap();
//! let mut timeline = Timeline::new(range, ResourceList::new(["r1", "r2"]).unwrap());
//! timeline.allocations.push(
//!     Allocation::new(
//!         "backup",
//!         day.and_hms_opt(1, 0, 0).unwrap(),
//!         day.and_hms_opt(3, 0, 0).unwrap(),
//!     )
//!     .resource("r1")
//!     .resource("r2"),
//! );
//!
//! let engine = LayoutEngine::new(LayoutConfig::default(), MonospaceMetrics::default());
//! let layout = engine.layout(&timeline).unwrap();
//! assert_eq!(layout.blocks.len(), 1);
//! ```

pub mod axis;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod grouping;
pub mod hatch;
pub mod metrics;
pub mod sequence;

pub use axis::{AxisPlan, AxisTick, LabelFormat, TimeAxisPlanner, DEFAULT_STEP_HOURS};
pub use config::LayoutConfig;
pub use engine::{longest_label, BlockLayout, Label, LayoutEngine, RowLayout, TimelineLayout};
pub use geometry::{map_allocation, GridFrame, VisibleWindow};
pub use grouping::group_rows;
pub use hatch::hatch;
pub use metrics::MonospaceMetrics;
pub use sequence::{conflicts, draw_order, is_duplicate, overlaps_in_time, stacking_order};
