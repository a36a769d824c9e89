//! Plain-text layout report

use restime_core::Timeline;
use restime_layout::TimelineLayout;
use std::fmt::Write;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Human-readable summary: window, axis, rows, then blocks in draw order
pub fn text_report(timeline: &Timeline, layout: &TimelineLayout) -> String {
    let mut out = String::new();
    let axis = &layout.axis;

    let _ = writeln!(
        out,
        "Timeline: {} -> {} ({:.1}h)",
        timeline.range.start().format(TIME_FORMAT),
        timeline.range.end().format(TIME_FORMAT),
        timeline.range.hours()
    );
    let _ = writeln!(out, "Canvas:   {:.0}x{:.0}", layout.width, layout.height);
    let _ = writeln!(
        out,
        "Axis:     {} step(s) of {}h at {:.2}px, from {}",
        axis.step_count,
        axis.step_hours,
        axis.step_pixel_length,
        axis.start_aligned.format(TIME_FORMAT)
    );
    let labels: Vec<&str> = layout.ticks.iter().map(|t| t.text.as_str()).collect();
    let _ = writeln!(out, "Header:   {}", layout.title.text);
    let _ = writeln!(out, "Labels:   {}", labels.join(" "));
    let _ = writeln!(
        out,
        "Rows:     {} x {:.2}px",
        layout.rows.len(),
        layout.frame.row_height
    );

    if layout.blocks.is_empty() {
        let _ = writeln!(out, "Blocks:   none visible");
        return out;
    }
    let _ = writeln!(out, "Blocks (bottom to top):");
    for block in &layout.blocks {
        let allocation = &timeline.allocations[block.allocation];
        let owner = if allocation.owner.is_empty() {
            String::new()
        } else {
            format!(" [{}]", allocation.owner)
        };
        let _ = writeln!(
            out,
            "  {}{} {:?} x={:.1} y={:.1} w={:.1} h={:.1} hatch={}",
            allocation.name,
            owner,
            block.share_type,
            block.rect.x,
            block.rect.y,
            block.rect.width,
            block.rect.height,
            block.hatch.len()
        );
    }
    out
}
