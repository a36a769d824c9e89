//! # restime-core
//!
//! Core domain model and traits for the restime resource timeline.
//!
//! This crate provides:
//! - Domain types: `TimeRange`, `ResourceList`, `Allocation`, `Timeline`
//! - Pixel-space primitives: `Rect`, `Point`, `Segment`, `RowSpan`
//! - Core traits: `TextMetrics`
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use restime_core::{Allocation, ResourceList, ShareType, TimeRange, Timeline};
//!
//! let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
//! let range = TimeRange::new(
//!     day.and_hms_opt(0, 0, 0).unwrap(),
//!     day.and_hms_opt(23, 59, 0).unwrap(),
//! )
//! .unwrap();
//! let resources = ResourceList::new(["gpu-0", "gpu-1", "gpu-2"]).unwrap();
//!
//! let mut timeline = Timeline::new(range, resources);
//! timeline.allocations.push(
//!     Allocation::new(
//!         "training",
//!         day.and_hms_opt(8, 0, 0).unwrap(),
//!         day.and_hms_opt(12, 0, 0).unwrap(),
//!     )
//!     .owner("alice")
//!     .resource("gpu-0")
//!     .resource("gpu-1")
//!     .share_type(ShareType::Exclusive),
//! );
//! assert!(timeline.validate().is_ok());
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a resource (one row of the timeline)
pub type ResourceId = String;

/// Result alias used throughout the layout engine
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Fractional hours from `from` to `to` (negative when `to` is earlier)
pub fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 3_600_000.0
}

// ============================================================================
// Time
// ============================================================================

/// A closed time interval with `start <= end`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Deserialize)]
struct RawTimeRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = LayoutError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        TimeRange::new(raw.start, raw.end)
    }
}

impl TimeRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> LayoutResult<Self> {
        if start > end {
            return Err(LayoutError::InvalidTimeRange {
                context: "time window".into(),
                start,
                end,
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Length of the range in fractional hours
    pub fn hours(&self) -> f64 {
        hours_between(self.start, self.end)
    }

    /// Length of the range in whole minutes
    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Open-interval intersection: ranges that merely touch do not overlap
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Midpoint of the range
    pub fn midpoint(&self) -> NaiveDateTime {
        self.start + (self.end - self.start) / 2
    }
}

// ============================================================================
// Resources
// ============================================================================

/// Ordered, unique resource identifiers; position defines the row index
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceList {
    ids: Vec<ResourceId>,
    index: HashMap<ResourceId, usize>,
}

impl ResourceList {
    /// Build a list from ids in row order, rejecting duplicates
    pub fn new<I, S>(ids: I) -> LayoutResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<ResourceId>,
    {
        let mut list = Self::default();
        for id in ids {
            let id = id.into();
            if list.index.contains_key(&id) {
                return Err(LayoutError::DuplicateResource(id));
            }
            list.index.insert(id.clone(), list.ids.len());
            list.ids.push(id);
        }
        Ok(list)
    }

    /// Row index of a resource, if present
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Row index of a resource, or `UnknownResource`
    pub fn require(&self, id: &str) -> LayoutResult<usize> {
        self.index_of(id)
            .ok_or_else(|| LayoutError::UnknownResource(id.to_string()))
    }

    pub fn get(&self, row: usize) -> Option<&str> {
        self.ids.get(row).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Longest identifier by character count (first one wins on ties)
    pub fn longest(&self) -> Option<&str> {
        self.ids
            .iter()
            .map(String::as_str)
            .fold(None, |best: Option<&str>, id| match best {
                Some(b) if b.chars().count() >= id.chars().count() => Some(b),
                _ => Some(id),
            })
    }
}

impl Serialize for ResourceList {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.ids.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ResourceList {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ids = Vec::<ResourceId>::deserialize(deserializer)?;
        ResourceList::new(ids).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Allocations
// ============================================================================

/// How an allocation holds its resources
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareType {
    /// Sole use of the resources; drawn solid
    #[default]
    Exclusive,
    /// Resources shared with other users; drawn hatched
    Shared,
    /// Tentative reservation; drawn hatched
    Planned,
}

impl ShareType {
    /// Whether blocks of this type get a diagonal hatch fill
    pub fn is_hatched(self) -> bool {
        !matches!(self, ShareType::Exclusive)
    }
}

/// A named, owned, time-bounded claim on one or more resources
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub name: String,
    #[serde(default)]
    pub owner: String,
    pub resources: BTreeSet<ResourceId>,
    pub begin: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub share_type: ShareType,
}

impl Allocation {
    pub fn new(name: impl Into<String>, begin: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            owner: String::new(),
            resources: BTreeSet::new(),
            begin,
            end,
            share_type: ShareType::Exclusive,
        }
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn resource(mut self, id: impl Into<ResourceId>) -> Self {
        self.resources.insert(id.into());
        self
    }

    pub fn share_type(mut self, share_type: ShareType) -> Self {
        self.share_type = share_type;
        self
    }

    /// The allocation's time range; requires `begin < end`
    pub fn time_range(&self) -> LayoutResult<TimeRange> {
        if self.begin >= self.end {
            return Err(LayoutError::InvalidTimeRange {
                context: format!("allocation '{}'", self.name),
                start: self.begin,
                end: self.end,
            });
        }
        TimeRange::new(self.begin, self.end)
    }

    /// Check the time range, that at least one resource is claimed, and that
    /// every resource exists in `resources`
    pub fn validate(&self, resources: &ResourceList) -> LayoutResult<()> {
        self.time_range()?;
        if self.resources.is_empty() {
            return Err(LayoutError::EmptyAllocation(self.name.clone()));
        }
        for id in &self.resources {
            resources.require(id)?;
        }
        Ok(())
    }

    /// Stacking area: resource count times duration in nanoseconds
    ///
    /// Exact to the nanosecond, so a nested allocation always compares
    /// smaller than its container.
    pub fn area(&self) -> i128 {
        let duration = self.end - self.begin;
        // Spans beyond ~292 years overflow i64 nanoseconds
        let nanos = duration.num_nanoseconds().map_or_else(
            || i128::from(duration.num_milliseconds()) * 1_000_000,
            i128::from,
        );
        self.resources.len() as i128 * nanos
    }

    /// Whether the two allocations claim at least one common resource
    pub fn shares_resource_with(&self, other: &Allocation) -> bool {
        self.resources
            .iter()
            .any(|id| other.resources.contains(id))
    }
}

/// A complete timeline: visible window, rows, and allocations
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub range: TimeRange,
    pub resources: ResourceList,
    #[serde(default)]
    pub allocations: Vec<Allocation>,
}

impl Timeline {
    pub fn new(range: TimeRange, resources: ResourceList) -> Self {
        Self {
            range,
            resources,
            allocations: Vec::new(),
        }
    }

    /// Validate every allocation against the resource list
    pub fn validate(&self) -> LayoutResult<()> {
        for allocation in &self.allocations {
            allocation.validate(&self.resources)?;
        }
        Ok(())
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// A contiguous run of resource rows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowSpan {
    pub first_row: usize,
    pub row_count: usize,
}

impl RowSpan {
    pub fn new(first_row: usize, row_count: usize) -> Self {
        Self {
            first_row,
            row_count,
        }
    }

    /// Index of the last row covered by the span
    pub fn last_row(&self) -> usize {
        self.first_row + self.row_count.saturating_sub(1)
    }
}

/// A point in pixel space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A straight line between two points
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    pub fn length(&self) -> f64 {
        (self.to.x - self.from.x).hypot(self.to.y - self.from.y)
    }
}

/// An axis-aligned rectangle in pixel space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True when the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether `p` lies on or inside the boundary
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Shrink by `pad` on every side, clamping width and height at zero
    pub fn inset(&self, pad: f64) -> Rect {
        let width = (self.width - 2.0 * pad).max(0.0);
        let height = (self.height - 2.0 * pad).max(0.0);
        // A collapsed axis stays centred on the unpadded rectangle
        let x = if width > 0.0 { self.x + pad } else { self.x + self.width / 2.0 };
        let y = if height > 0.0 { self.y + pad } else { self.y + self.height / 2.0 };
        Rect::new(x, y, width, height)
    }
}

// ============================================================================
// Text Metrics
// ============================================================================

/// Font selection used when measuring labels
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    pub family: String,
    /// Font size in pixels
    pub size: f64,
}

impl FontStyle {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

impl Default for FontStyle {
    fn default() -> Self {
        Self::new("Calibri", 12.0)
    }
}

/// Measures the rendered pixel width of text
///
/// Supplied by the host; the layout engine never touches a drawing surface.
pub trait TextMetrics {
    fn measure(&self, text: &str, style: &FontStyle) -> f64;
}

impl<T: TextMetrics + ?Sized> TextMetrics for &T {
    fn measure(&self, text: &str, style: &FontStyle) -> f64 {
        (**self).measure(text, style)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Layout error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Invalid time range for {context}: start {start} is not before end {end}")]
    InvalidTimeRange {
        context: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Unknown resource: {0}")]
    UnknownResource(ResourceId),

    #[error("Duplicate resource: {0}")]
    DuplicateResource(ResourceId),

    #[error("Allocation '{0}' claims no resources")]
    EmptyAllocation(String),

    #[error("Degenerate layout: {0}")]
    DegenerateLayout(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    #[test]
    fn time_range_rejects_reversed_bounds() {
        let err = TimeRange::new(at(10, 0), at(9, 0)).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidTimeRange { .. }));
        assert!(TimeRange::new(at(9, 0), at(9, 0)).is_ok());
    }

    #[test]
    fn time_range_hours_are_fractional() {
        let range = TimeRange::new(at(9, 0), at(10, 30)).unwrap();
        assert_eq!(range.hours(), 1.5);
        assert_eq!(range.minutes(), 90);
        assert_eq!(range.midpoint(), at(9, 45));
    }

    #[test]
    fn touching_ranges_do_not_overlap() {
        let a = TimeRange::new(at(0, 0), at(4, 0)).unwrap();
        let b = TimeRange::new(at(4, 0), at(6, 0)).unwrap();
        let c = TimeRange::new(at(3, 59), at(6, 0)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn resource_list_indexes_in_order() {
        let list = ResourceList::new(["r1", "r2", "r3"]).unwrap();
        assert_eq!(list.index_of("r2"), Some(1));
        assert_eq!(list.index_of("r9"), None);
        assert_eq!(list.get(2), Some("r3"));
        assert_eq!(
            list.require("r9"),
            Err(LayoutError::UnknownResource("r9".into()))
        );
    }

    #[test]
    fn resource_list_rejects_duplicates() {
        let err = ResourceList::new(["a", "b", "a"]).unwrap_err();
        assert_eq!(err, LayoutError::DuplicateResource("a".into()));
    }

    #[test]
    fn resource_list_longest_prefers_first_on_ties() {
        let list = ResourceList::new(["ab", "xyz", "pqr", "c"]).unwrap();
        assert_eq!(list.longest(), Some("xyz"));
        assert_eq!(ResourceList::default().longest(), None);
    }

    #[test]
    fn allocation_builder_and_area() {
        let alloc = Allocation::new("job", at(0, 0), at(4, 0))
            .owner("ops")
            .resource("r1")
            .resource("r2")
            .resource("r1")
            .share_type(ShareType::Planned);

        assert_eq!(alloc.owner, "ops");
        assert_eq!(alloc.resources.len(), 2);
        assert_eq!(alloc.area(), 2 * 4 * 3_600 * 1_000_000_000);
        assert!(alloc.share_type.is_hatched());
    }

    #[test]
    fn area_keeps_sub_minute_precision() {
        let base = at(10, 0);
        let outer = Allocation::new("outer", base, base + chrono::Duration::seconds(59))
            .resource("r1");
        let inner = Allocation::new(
            "inner",
            base + chrono::Duration::seconds(10),
            base + chrono::Duration::seconds(20),
        )
        .resource("r1");
        let blip = Allocation::new("blip", base, base + chrono::Duration::milliseconds(1))
            .resource("r1");

        assert_eq!(outer.area(), 59_000_000_000);
        assert_eq!(inner.area(), 10_000_000_000);
        assert!(blip.area() > 0);
        assert!(inner.area() < outer.area());
    }

    #[test]
    fn allocation_without_resources_is_rejected() {
        let list = ResourceList::new(["r1"]).unwrap();
        let alloc = Allocation::new("idle", at(1, 0), at(2, 0));
        assert_eq!(
            alloc.validate(&list).unwrap_err(),
            LayoutError::EmptyAllocation("idle".into())
        );
    }

    #[test]
    fn allocation_requires_begin_before_end() {
        let alloc = Allocation::new("zero", at(4, 0), at(4, 0)).resource("r1");
        let list = ResourceList::new(["r1"]).unwrap();
        assert!(matches!(
            alloc.validate(&list),
            Err(LayoutError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn allocation_rejects_unknown_resource() {
        let alloc = Allocation::new("job", at(0, 0), at(1, 0)).resource("ghost");
        let list = ResourceList::new(["r1"]).unwrap();
        assert_eq!(
            alloc.validate(&list),
            Err(LayoutError::UnknownResource("ghost".into()))
        );
    }

    #[test]
    fn rect_inset_never_goes_negative() {
        let r = Rect::new(10.0, 10.0, 1.5, 20.0).inset(1.0);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.x, 10.75);
        assert_eq!(r.height, 18.0);
        assert_eq!(r.y, 11.0);
    }

    #[test]
    fn deserialize_enforces_invariants() {
        let dup: Result<ResourceList, _> = serde_json::from_str(r#"["a", "a"]"#);
        assert!(dup.is_err());

        let reversed: Result<TimeRange, _> = serde_json::from_str(
            r#"{"start": "2024-03-05T10:00:00", "end": "2024-03-05T09:00:00"}"#,
        );
        assert!(reversed.is_err());

        let alloc: Allocation = serde_json::from_str(
            r#"{"name": "job", "resources": ["r1"],
                "begin": "2024-03-05T00:00:00", "end": "2024-03-05T02:00:00",
                "share_type": "shared"}"#,
        )
        .unwrap();
        assert_eq!(alloc.share_type, ShareType::Shared);
        assert_eq!(alloc.owner, "");
    }
}
