use eframe::egui::{pos2, vec2, Pos2, Rect, Vec2};

/// Margin added around the target's bounds to form the highlight rectangle.
pub const HIGHLIGHT_PADDING: f32 = 10.0;

/// Gap between the highlight rectangle and the message bubble.
pub const BUBBLE_GAP: f32 = 18.0;

/// Nominal bubble size used for placement and for the gate's coachmark
/// bounds. The rendered bubble wraps its text within this width.
pub const BUBBLE_SIZE: Vec2 = vec2(240.0, 96.0);

/// Target bounds expanded by the fixed padding on all sides.
pub fn highlight_rect(target: Rect) -> Rect {
    target.expand(HIGHLIGHT_PADDING)
}

/// Bubble placement: to the right of the highlight, vertically centered,
/// clamped so it stays on screen.
pub fn bubble_rect(highlight: Rect, size: Vec2, screen: Rect) -> Rect {
    let mut min = pos2(
        highlight.right() + BUBBLE_GAP,
        highlight.center().y - size.y * 0.5,
    );
    if min.x + size.x > screen.right() {
        // not enough room on the right; flip to the left side
        min.x = (highlight.left() - BUBBLE_GAP - size.x).max(screen.left());
    }
    min.y = min.y.clamp(screen.top(), (screen.bottom() - size.y).max(screen.top()));
    Rect::from_min_size(min, size)
}

/// Triangle connecting the bubble to the highlight edge it points at.
pub fn arrow_points(bubble: Rect, highlight: Rect) -> [Pos2; 3] {
    let half = 7.0;
    if bubble.left() >= highlight.right() {
        let tip = pos2(highlight.right(), highlight.center().y);
        let base_x = bubble.left();
        [
            tip,
            pos2(base_x, tip.y - half),
            pos2(base_x, tip.y + half),
        ]
    } else {
        let tip = pos2(highlight.left(), highlight.center().y);
        let base_x = bubble.right();
        [
            tip,
            pos2(base_x, tip.y - half),
            pos2(base_x, tip.y + half),
        ]
    }
}

/// Anchor for the pointer glyph shown when a step carries no message.
pub fn glyph_pos(highlight: Rect) -> Pos2 {
    pos2(highlight.right() - 4.0, highlight.bottom() - 4.0)
}

/// Rectangle subtraction by horizontal band sweep: the returned disjoint
/// rectangles cover `outer` minus every hole. Holes are clipped to `outer`;
/// degenerate holes are ignored.
pub fn subtract(outer: Rect, holes: &[Rect]) -> Vec<Rect> {
    let holes: Vec<Rect> = holes
        .iter()
        .map(|h| h.intersect(outer))
        .filter(|h| h.width() > 0.0 && h.height() > 0.0)
        .collect();
    if holes.is_empty() {
        return vec![outer];
    }

    let mut ys: Vec<f32> = Vec::with_capacity(2 + holes.len() * 2);
    ys.push(outer.top());
    ys.push(outer.bottom());
    for h in &holes {
        ys.push(h.top());
        ys.push(h.bottom());
    }
    ys.sort_by(f32::total_cmp);
    ys.dedup();

    let mut out = Vec::new();
    for band in ys.windows(2) {
        let (top, bottom) = (band[0], band[1]);
        if bottom <= top {
            continue;
        }
        let mid = (top + bottom) * 0.5;
        let mut spans: Vec<(f32, f32)> = holes
            .iter()
            .filter(|h| h.top() <= mid && mid < h.bottom())
            .map(|h| (h.left(), h.right()))
            .collect();
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut cursor = outer.left();
        for (left, right) in spans {
            if left > cursor {
                out.push(Rect::from_min_max(pos2(cursor, top), pos2(left, bottom)));
            }
            cursor = cursor.max(right);
        }
        if cursor < outer.right() {
            out.push(Rect::from_min_max(
                pos2(cursor, top),
                pos2(outer.right(), bottom),
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0))
    }

    #[test]
    fn highlight_adds_fixed_padding_on_all_sides() {
        let target = Rect::from_min_size(pos2(100.0, 50.0), vec2(80.0, 24.0));
        let hl = highlight_rect(target);
        assert_eq!(hl.left(), 90.0);
        assert_eq!(hl.top(), 40.0);
        assert_eq!(hl.right(), 190.0);
        assert_eq!(hl.bottom(), 84.0);
    }

    #[test]
    fn bubble_sits_right_of_highlight_when_room_allows() {
        let hl = Rect::from_min_size(pos2(100.0, 100.0), vec2(100.0, 40.0));
        let bubble = bubble_rect(hl, BUBBLE_SIZE, screen());
        assert!(bubble.left() > hl.right());
        assert_eq!(bubble.center().y, hl.center().y);
    }

    #[test]
    fn bubble_flips_left_near_the_screen_edge() {
        let hl = Rect::from_min_size(pos2(700.0, 100.0), vec2(90.0, 40.0));
        let bubble = bubble_rect(hl, BUBBLE_SIZE, screen());
        assert!(bubble.right() <= hl.left());
    }

    #[test]
    fn subtract_without_holes_returns_outer() {
        assert_eq!(subtract(screen(), &[]), vec![screen()]);
    }

    #[test]
    fn subtract_single_hole_covers_everything_but_the_hole() {
        let hole = Rect::from_min_size(pos2(200.0, 200.0), vec2(100.0, 50.0));
        let parts = subtract(screen(), &[hole]);
        let area: f32 = parts.iter().map(|r| r.area()).sum();
        assert!((area - (screen().area() - hole.area())).abs() < 0.01);
        for r in &parts {
            assert!(r.intersect(hole).area() < f32::EPSILON);
        }
        // the hole's center must not be covered, its surroundings must be
        assert!(!parts.iter().any(|r| r.contains(hole.center())));
        assert!(parts.iter().any(|r| r.contains(pos2(10.0, 10.0))));
        assert!(parts.iter().any(|r| r.contains(pos2(790.0, 590.0))));
    }

    #[test]
    fn subtract_two_overlapping_holes() {
        let a = Rect::from_min_size(pos2(100.0, 100.0), vec2(120.0, 60.0));
        let b = Rect::from_min_size(pos2(180.0, 120.0), vec2(120.0, 60.0));
        let parts = subtract(screen(), &[a, b]);
        for r in &parts {
            assert!(r.intersect(a).area() < f32::EPSILON);
            assert!(r.intersect(b).area() < f32::EPSILON);
        }
        assert!(!parts.iter().any(|r| r.contains(a.center())));
        assert!(!parts.iter().any(|r| r.contains(b.center())));
        assert!(parts.iter().any(|r| r.contains(pos2(400.0, 400.0))));
    }

    #[test]
    fn subtract_ignores_holes_outside_the_outer_rect() {
        let hole = Rect::from_min_size(pos2(-500.0, -500.0), vec2(100.0, 100.0));
        assert_eq!(subtract(screen(), &[hole]), vec![screen()]);
    }

    #[test]
    fn subtract_hole_spanning_full_width_splits_vertically() {
        let hole = Rect::from_min_max(pos2(0.0, 200.0), pos2(800.0, 300.0));
        let parts = subtract(screen(), &[hole]);
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().any(|r| r.bottom() == 200.0));
        assert!(parts.iter().any(|r| r.top() == 300.0));
    }
}
