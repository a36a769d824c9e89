//! Draw ordering for overlapping allocations
//!
//! Two allocations *conflict* when they share a resource and their time ranges
//! overlap. A conflicting pair must be drawn larger-area first so the smaller
//! block stays visible on top.
//!
//! Pairs that do not conflict carry no constraint. Their relative order is
//! deliberately randomized and must not be relied upon; pass a seeded RNG when
//! a reproducible order is needed.

use rand::seq::SliceRandom;
use rand::Rng;
use restime_core::{Allocation, LayoutResult};
use std::cmp::Ordering;
use tracing::trace;

/// The pair claims at least one common resource
pub fn is_duplicate(a: &Allocation, b: &Allocation) -> bool {
    a.shares_resource_with(b)
}

/// The pair's time ranges intersect; touching endpoints do not count
pub fn overlaps_in_time(a: &Allocation, b: &Allocation) -> bool {
    a.begin < b.end && b.begin < a.end
}

/// Duplicate and temporally overlapping
pub fn conflicts(a: &Allocation, b: &Allocation) -> bool {
    is_duplicate(a, b) && overlaps_in_time(a, b)
}

/// Required relative order of a conflicting pair
///
/// `Some(Less)` means `a` is drawn before `b`. Returns `None` when the pair
/// does not conflict or their areas are equal.
pub fn stacking_order(a: &Allocation, b: &Allocation) -> Option<Ordering> {
    if !conflicts(a, b) {
        return None;
    }
    match b.area().cmp(&a.area()) {
        Ordering::Equal => None,
        ord => Some(ord),
    }
}

/// Draw order for `allocations` as indices into the slice; first is bottom
///
/// The result is a shuffle followed by a stable sort on descending area. That
/// is a total order, so it respects every conflicting pair, while equal areas
/// and unrelated pairs keep their random relative order.
pub fn draw_order<R>(allocations: &[Allocation], rng: &mut R) -> LayoutResult<Vec<usize>>
where
    R: Rng + ?Sized,
{
    for allocation in allocations {
        allocation.time_range()?;
    }

    let mut order: Vec<usize> = (0..allocations.len()).collect();
    order.shuffle(rng);
    order.sort_by(|&a, &b| allocations[b].area().cmp(&allocations[a].area()));

    trace!(?order, "allocation draw order");
    Ok(order)
}
