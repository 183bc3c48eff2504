//! Property-based invariant tests for the type hierarchy and geometry.
//!
//! 1. Every ancestor walk terminates at `OBJECT`.
//! 2. A walk never visits the same type twice.
//! 3. `is_a` agrees with membership in the ancestor walk.
//! 4. Rect containment agrees with its half-open edges.

use proptest::prelude::*;
use spyglass_core::geometry::{Point, Rect};
use spyglass_core::types::{self, TypeHierarchy, TypeKey};

const POOL: [TypeKey; 8] = [
    TypeKey::new("t.A"),
    TypeKey::new("t.B"),
    TypeKey::new("t.C"),
    TypeKey::new("t.D"),
    TypeKey::new("t.E"),
    TypeKey::new("t.F"),
    TypeKey::new("t.G"),
    TypeKey::new("t.H"),
];

fn hierarchy_strategy() -> impl Strategy<Value = TypeHierarchy> {
    prop::collection::vec((0usize..POOL.len(), 0usize..POOL.len() + 1), 0..24).prop_map(
        |decls| {
            let mut h = TypeHierarchy::with_builtin();
            for (child, parent) in decls {
                let parent = POOL.get(parent).copied().unwrap_or(types::WIDGET);
                h.declare(POOL[child], parent);
            }
            h
        },
    )
}

proptest! {
    #[test]
    fn walks_end_at_object(h in hierarchy_strategy(), start in 0usize..POOL.len()) {
        let chain: Vec<_> = h.ancestors(POOL[start]).collect();
        prop_assert_eq!(chain.first().copied(), Some(POOL[start]));
        prop_assert_eq!(chain.last().copied(), Some(types::OBJECT));
    }

    #[test]
    fn walks_never_repeat(h in hierarchy_strategy(), start in 0usize..POOL.len()) {
        let chain: Vec<_> = h.ancestors(POOL[start]).collect();
        let mut dedup = chain.clone();
        dedup.sort();
        dedup.dedup();
        prop_assert_eq!(dedup.len(), chain.len());
    }

    #[test]
    fn is_a_matches_walk(
        h in hierarchy_strategy(),
        a in 0usize..POOL.len(),
        b in 0usize..POOL.len(),
    ) {
        let in_walk = h.ancestors(POOL[a]).any(|t| t == POOL[b]);
        prop_assert_eq!(h.is_a(POOL[a], POOL[b]), in_walk);
    }

    #[test]
    fn rect_contains_matches_edges(
        x in -500i32..500, y in -500i32..500,
        w in 0i32..500, h in 0i32..500,
        px in -1000i32..1000, py in -1000i32..1000,
    ) {
        let r = Rect::new(x, y, w, h);
        let expected = px >= x && px < x + w && py >= y && py < y + h;
        prop_assert_eq!(r.contains(Point::new(px, py)), expected);
    }
}
