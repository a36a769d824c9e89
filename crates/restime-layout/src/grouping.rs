//! Row grouping
//!
//! Collapses an allocation's resources into the fewest contiguous row spans,
//! so a block over rows {1, 2, 4} is drawn as `[1-2]` and `[4]`.

use restime_core::{LayoutResult, ResourceList, RowSpan};

/// Group `requested` resource ids into contiguous spans of `canonical` rows
///
/// Spans come back in ascending row order. Duplicated ids count once; an id
/// missing from `canonical` is an `UnknownResource` error.
pub fn group_rows<'a, I>(requested: I, canonical: &ResourceList) -> LayoutResult<Vec<RowSpan>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut rows = requested
        .into_iter()
        .map(|id| canonical.require(id))
        .collect::<LayoutResult<Vec<usize>>>()?;
    rows.sort_unstable();
    rows.dedup();

    let mut spans: Vec<RowSpan> = Vec::new();
    for row in rows {
        match spans.last_mut() {
            Some(span) if span.last_row() + 1 == row => span.row_count += 1,
            _ => spans.push(RowSpan::new(row, 1)),
        }
    }
    Ok(spans)
}
