use crate::types::{Rect, Vec2};

#[derive(Debug)]
struct SnapCandidate {
    offset: f32,
    distance: f32,
}

/// Find the best snap position for a dragged HUD element box.
/// Returns the snapped top-left if any edge is within `threshold`, None otherwise
pub fn find_snap_position(dragged: Rect, others: &[Rect], threshold: f32) -> Option<Vec2> {
    if threshold <= 0.0 {
        return None; // Snapping disabled
    }

    let mut best_x: Option<SnapCandidate> = None;
    let mut best_y: Option<SnapCandidate> = None;

    for other in others {
        // Left edge to right edge of other, right to left, then edge alignment
        check_snap(&mut best_x, dragged.left(), other.right(), threshold);
        check_snap(&mut best_x, dragged.right(), other.left(), threshold);
        check_snap(&mut best_x, dragged.left(), other.left(), threshold);
        check_snap(&mut best_x, dragged.right(), other.right(), threshold);

        check_snap(&mut best_y, dragged.top(), other.bottom(), threshold);
        check_snap(&mut best_y, dragged.bottom(), other.top(), threshold);
        check_snap(&mut best_y, dragged.top(), other.top(), threshold);
        check_snap(&mut best_y, dragged.bottom(), other.bottom(), threshold);
    }

    let snap_x = best_x.map(|s| dragged.min.x + s.offset);
    let snap_y = best_y.map(|s| dragged.min.y + s.offset);

    match (snap_x, snap_y) {
        (Some(x), Some(y)) => Some(Vec2::new(x, y)),
        (Some(x), None) => Some(Vec2::new(x, dragged.min.y)),
        (None, Some(y)) => Some(Vec2::new(dragged.min.x, y)),
        (None, None) => None,
    }
}

fn check_snap(best: &mut Option<SnapCandidate>, edge: f32, target: f32, threshold: f32) {
    let distance = (edge - target).abs();
    if distance <= threshold {
        let candidate = SnapCandidate {
            offset: target - edge,
            distance,
        };

        // Keep this candidate if it's closer than the current best
        if best.as_ref().is_none_or(|b| candidate.distance < b.distance) {
            *best = Some(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_snap_disabled_with_zero_threshold() {
        let dragged = rect(101.0, 0.0, 50.0, 50.0);
        let others = [rect(0.0, 0.0, 100.0, 50.0)];
        assert_eq!(find_snap_position(dragged, &others, 0.0), None);
    }

    #[test]
    fn test_snap_left_edge_to_right_edge() {
        let dragged = rect(104.0, 300.0, 50.0, 50.0);
        let others = [rect(0.0, 0.0, 100.0, 50.0)];
        assert_eq!(find_snap_position(dragged, &others, 10.0), Some(Vec2::new(100.0, 300.0)));
    }

    #[test]
    fn test_snap_both_axes_picks_closest() {
        let dragged = rect(103.0, 52.0, 50.0, 50.0);
        let others = [rect(0.0, 0.0, 100.0, 50.0), rect(101.0, 200.0, 10.0, 10.0)];
        // x: right edge of first at 100 (3 away) vs left edge of second at 101 (2 away)
        // y: bottom of first at 50 (2 away)
        assert_eq!(find_snap_position(dragged, &others, 5.0), Some(Vec2::new(101.0, 50.0)));
    }

    #[test]
    fn test_no_snap_outside_threshold() {
        let dragged = rect(500.0, 500.0, 10.0, 10.0);
        let others = [rect(0.0, 0.0, 100.0, 100.0)];
        assert_eq!(find_snap_position(dragged, &others, 15.0), None);
    }
}
