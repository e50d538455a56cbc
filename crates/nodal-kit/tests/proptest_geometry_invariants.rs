//! Property-based invariant tests for `nodal_kit::geometry`.
//!
//! 1. A rectangle's union with another always contains both original
//!    rectangles' corners.
//! 2. An intersection, when it exists, is contained by both inputs.
//! 3. `normalize`/`to_hex` round-trip for `Rgb` lives in `color.rs`'s own
//!    unit tests; this file is scoped to geometry.

use nodal_kit::geometry::Rect;
use proptest::prelude::*;

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-1000i32..1000, -1000i32..1000, 0u32..500, 0u32..500)
        .prop_map(|(x, y, w, h)| Rect::from_coords(x, y, w, h))
}

proptest! {
    #[test]
    fn union_contains_every_corner_of_both_rects(a in rect_strategy(), b in rect_strategy()) {
        let u = a.union(b);
        for r in [a, b] {
            prop_assert!(u.left() <= r.left());
            prop_assert!(u.top() <= r.top());
            prop_assert!(u.right() >= r.right());
            prop_assert!(u.bottom() >= r.bottom());
        }
    }

    #[test]
    fn intersection_is_contained_by_both_inputs(a in rect_strategy(), b in rect_strategy()) {
        if let Some(i) = a.intersection(b) {
            for r in [a, b] {
                prop_assert!(i.left() >= r.left());
                prop_assert!(i.top() >= r.top());
                prop_assert!(i.right() <= r.right());
                prop_assert!(i.bottom() <= r.bottom());
            }
        }
    }

    #[test]
    fn intersects_agrees_with_intersection_being_some(a in rect_strategy(), b in rect_strategy()) {
        prop_assert_eq!(a.intersects(b), a.intersection(b).is_some());
    }
}
