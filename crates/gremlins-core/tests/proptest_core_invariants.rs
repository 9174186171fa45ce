//! Property-based invariant tests for the core primitives.
//!
//! ## Invariants
//!
//! 1. `natural(max)` stays inside `0..=max` for every non-negative bound
//! 2. `natural(max)` rejects every negative bound
//! 3. Seeded randomizers are reproducible
//! 4. Scroll ranges are never negative for extents read from one element
//! 5. Deferred tasks run in (due, submission) order

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gremlins_core::{
    Environment, Extent, GremlinError, MemoryDocument, Randomizer, SeededRandomizer, Size, Stage,
};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

fn arb_size() -> impl Strategy<Value = Size> {
    (0u32..20_000, 0u32..20_000).prop_map(|(width, height)| Size::new(width, height))
}

fn arb_extent() -> impl Strategy<Value = Extent> {
    (
        0u32..20_000,
        0u32..20_000,
        0u32..20_000,
        0u32..20_000,
        0u32..20_000,
        0u32..20_000,
    )
        .prop_map(
            |(
                scroll_width,
                scroll_height,
                offset_width,
                offset_height,
                client_width,
                client_height,
            )| Extent {
                scroll_width,
                scroll_height,
                offset_width,
                offset_height,
                client_width,
                client_height,
            },
        )
}

// ── 1-3. Randomizer contract ──────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn natural_stays_within_bound(seed in any::<u64>(), max in 0i64..=i64::MAX) {
        let mut rng = SeededRandomizer::new(seed);
        let value = rng.natural(max).unwrap();
        prop_assert!(value <= max as u64, "value={value} max={max}");
    }

    #[test]
    fn natural_rejects_negative_bound(seed in any::<u64>(), max in i64::MIN..0i64) {
        let mut rng = SeededRandomizer::new(seed);
        let is_invalid_range = matches!(
            rng.natural(max),
            Err(GremlinError::InvalidRange { min: 0, .. })
        );
        prop_assert!(is_invalid_range);
    }

    #[test]
    fn seeded_sequences_are_reproducible(
        seed in any::<u64>(),
        maxima in prop::collection::vec(0i64..1_000_000, 1..64),
    ) {
        let mut a = SeededRandomizer::new(seed);
        let mut b = SeededRandomizer::new(seed);
        for max in maxima {
            prop_assert_eq!(a.natural(max).unwrap(), b.natural(max).unwrap());
        }
    }
}

// ── 4. Scroll range ───────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn scroll_range_is_non_negative(element in arb_extent(), body in arb_extent()) {
        let (max_x, max_y) = element.scroll_range(&body);
        prop_assert!(max_x >= 0);
        prop_assert!(max_y >= 0);
    }

    #[test]
    fn memory_document_root_range_matches_content(viewport in arb_size(), content in arb_size()) {
        let doc = MemoryDocument::new(viewport, content);
        let root = doc.extent(doc.root_scrolling_element()).unwrap();
        let body = doc.extent(doc.body()).unwrap();
        let (max_x, max_y) = root.scroll_range(&body);
        let expected_x =
            i64::from(content.width.max(viewport.width)) - i64::from(viewport.width);
        let expected_y =
            i64::from(content.height.max(viewport.height)) - i64::from(viewport.height);
        prop_assert_eq!(max_x, expected_x);
        prop_assert_eq!(max_y, expected_y);
    }
}

// ── 5. Timer ordering ─────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn tasks_run_in_due_then_submission_order(delays in prop::collection::vec(0u64..2_000, 1..40)) {
        let (stage, _doc) = Stage::from_environment(MemoryDocument::new(
            Size::new(10, 10),
            Size::new(10, 10),
        ));
        let order = Rc::new(RefCell::new(Vec::new()));
        for (idx, delay) in delays.iter().enumerate() {
            let order = Rc::clone(&order);
            stage.timers().borrow_mut().submit(
                Duration::from_millis(*delay),
                "record",
                Box::new(move |_env: &mut dyn Environment| order.borrow_mut().push(idx)),
            );
        }

        prop_assert_eq!(stage.run_until_idle(), delays.len());

        let mut expected: Vec<usize> = (0..delays.len()).collect();
        expected.sort_by_key(|&idx| (delays[idx], idx));
        prop_assert_eq!(order.borrow().clone(), expected);
    }
}
