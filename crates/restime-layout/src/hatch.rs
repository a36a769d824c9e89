//! Diagonal hatch fill
//!
//! Tiles a rectangle with the line family `y = x + b`, clipped to the
//! rectangle. In screen coordinates (y down) the lines run from top-left to
//! bottom-right.

use restime_core::{LayoutError, LayoutResult, Point, Rect, Segment};
use std::f64::consts::SQRT_2;

/// Points closer than this to an edge count as on it
const EPSILON: f64 = 1e-9;

/// Upper bound on the lines a single rectangle may produce
const MAX_LINES: f64 = 1_000_000.0;

/// Hatch segments filling `rect`, `spacing` pixels apart perpendicular to
/// the lines
///
/// Every endpoint lies on or inside the rectangle. A line that only grazes a
/// corner yields no segment.
pub fn hatch(rect: &Rect, spacing: f64) -> LayoutResult<Vec<Segment>> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(LayoutError::DegenerateLayout(format!(
            "hatch spacing must be positive, got {spacing}"
        )));
    }
    if rect.is_empty() {
        return Ok(Vec::new());
    }

    let Rect {
        x,
        y,
        width,
        height,
    } = *rect;
    // From the bottom-left corner to the top-right corner
    let b_start = y + height - x;
    let b_end = y - x - width;
    let step = spacing * SQRT_2;
    let lines = ((width + height) / step).ceil();
    if lines.is_nan() || lines > MAX_LINES {
        return Err(LayoutError::DegenerateLayout(format!(
            "hatching a {width}x{height} rectangle every {spacing}px needs too many lines"
        )));
    }

    let mut segments = Vec::new();
    for i in 0..lines as usize {
        let b = b_start - i as f64 * step;
        if b <= b_end {
            break;
        }
        let candidates = [
            Point::new(x, x + b),
            Point::new(x + width, x + width + b),
            Point::new(y - b, y),
            Point::new(y + height - b, y + height),
        ];

        let mut hits: Vec<Point> = Vec::with_capacity(2);
        for p in candidates {
            if !within(rect, p) {
                continue;
            }
            let p = clamp(rect, p);
            if hits.iter().all(|h| !same_point(*h, p)) {
                hits.push(p);
            }
            if hits.len() == 2 {
                break;
            }
        }

        if let [from, to] = hits[..] {
            segments.push(Segment::new(from, to));
        }
    }
    Ok(segments)
}

fn within(rect: &Rect, p: Point) -> bool {
    p.x >= rect.x - EPSILON
        && p.x <= rect.right() + EPSILON
        && p.y >= rect.y - EPSILON
        && p.y <= rect.bottom() + EPSILON
}

fn clamp(rect: &Rect, p: Point) -> Point {
    Point::new(
        p.x.clamp(rect.x, rect.right()),
        p.y.clamp(rect.y, rect.bottom()),
    )
}

fn same_point(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() <= EPSILON && (a.y - b.y).abs() <= EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_inside(rect: &Rect, segments: &[Segment]) {
        for s in segments {
            for p in [s.from, s.to] {
                assert!(rect.contains(p), "{p:?} escapes {rect:?}");
            }
        }
    }

    #[test]
    fn square_at_origin_is_hatched_inside_bounds() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let segments = hatch(&rect, 5.0).unwrap();

        assert!(!segments.is_empty());
        for s in &segments {
            for p in [s.from, s.to] {
                assert!((0.0..=10.0).contains(&p.x));
                assert!((0.0..=10.0).contains(&p.y));
            }
        }
    }

    #[test]
    fn segments_follow_the_diagonal() {
        let rect = Rect::new(3.0, 7.0, 40.0, 12.0);
        let segments = hatch(&rect, 4.0).unwrap();
        assert!(!segments.is_empty());
        for s in &segments {
            let slope = (s.to.y - s.from.y) / (s.to.x - s.from.x);
            assert!((slope - 1.0).abs() < 1e-9);
            assert!(s.length() > 0.0);
        }
        assert_inside(&rect, &segments);
    }

    #[test]
    fn consecutive_lines_are_spacing_apart() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let segments = hatch(&rect, 5.0).unwrap();
        // Perpendicular distance between y = x + b1 and y = x + b2 is |b1 - b2| / sqrt(2)
        let intercepts: Vec<f64> = segments.iter().map(|s| s.from.y - s.from.x).collect();
        for pair in intercepts.windows(2) {
            assert!(((pair[0] - pair[1]) / SQRT_2 - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn offset_and_thin_rectangles_stay_inside() {
        for rect in [
            Rect::new(120.5, 33.25, 7.0, 90.0),
            Rect::new(-20.0, -5.0, 300.0, 2.0),
            Rect::new(64.0, 65.0, 111.0, 38.0),
        ] {
            let segments = hatch(&rect, 5.0).unwrap();
            assert!(!segments.is_empty());
            assert_inside(&rect, &segments);
        }
    }

    #[test]
    fn far_offset_rectangle_terminates() {
        let rect = Rect::new(1e17, 0.0, 10.0, 10.0);
        let segments = hatch(&rect, 1.0).unwrap();
        assert!(segments.len() <= 15);
        assert_inside(&rect, &segments);
    }

    #[test]
    fn rejects_unbounded_line_count() {
        let rect = Rect::new(0.0, 0.0, 1e12, 10.0);
        assert!(matches!(
            hatch(&rect, 1.0),
            Err(LayoutError::DegenerateLayout(_))
        ));
    }

    #[test]
    fn empty_rectangle_has_no_hatch() {
        let rect = Rect::new(5.0, 5.0, 0.0, 10.0);
        assert!(hatch(&rect, 5.0).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_positive_spacing() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(hatch(&rect, 0.0).is_err());
        assert!(hatch(&rect, -1.0).is_err());
        assert!(hatch(&rect, f64::NAN).is_err());
    }
}
