//! Axis-aligned rectangles and the overlap test used by the placement engine.

/// Bounding box with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle of the given size centred on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn corners(&self) -> [(f32, f32); 4] {
        [
            (self.x, self.y),
            (self.right(), self.y),
            (self.x, self.bottom()),
            (self.right(), self.bottom()),
        ]
    }
}

/// Separating-axis overlap test.
///
/// The rectangles are considered apart only when one lies entirely beyond the
/// other by more than `buffer` on some axis, so `buffer` acts as the minimum
/// gap required between them. Touching edges count as overlapping.
pub fn overlaps(a: &Rect, b: &Rect, buffer: f32) -> bool {
    !(a.right() + buffer < b.x
        || a.x > b.right() + buffer
        || a.bottom() + buffer < b.y
        || a.y > b.bottom() + buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn separated_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &b, 0.0));
        assert!(!overlaps(&a, &b, 9.0));
    }

    #[test]
    fn buffer_demands_a_gap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(15.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &b, 4.0));
        assert!(overlaps(&a, &b, 5.0));
        assert!(overlaps(&a, &b, 6.0));
    }

    #[test]
    fn touching_edges_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(overlaps(&a, &b, 0.0));
    }

    #[test]
    fn contained_rect_overlaps() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::centered(50.0, 50.0, 10.0, 10.0);
        assert!(overlaps(&outer, &inner, 0.0));
        assert_eq!(inner.center(), (50.0, 50.0));
    }

    fn rect() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..200.0, 0.0f32..200.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in rect(), b in rect(), buffer in 0.0f32..20.0) {
            prop_assert_eq!(overlaps(&a, &b, buffer), overlaps(&b, &a, buffer));
        }

        #[test]
        fn prop_larger_buffer_never_separates(a in rect(), b in rect(), buffer in 0.0f32..20.0) {
            if overlaps(&a, &b, 0.0) {
                prop_assert!(overlaps(&a, &b, buffer));
            }
        }
    }
}
