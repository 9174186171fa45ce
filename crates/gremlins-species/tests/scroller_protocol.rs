//! End-to-end checks of the scroller's select → act → show → log protocol
//! against an in-memory document.
//!
//! Run:
//!   cargo test -p gremlins-species --test scroller_protocol

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gremlins_core::{
    Environment, Extent, Gremlin, MemoryDocument, Position, RecordingLogger,
    SeededRandomizer, SequenceRandomizer, Size, Stage,
};
use gremlins_species::{ScrollerGremlin, default_position_selector};

// ============================================================================
// Fixtures
// ============================================================================

const VIEWPORT: Size = Size::new(800, 600);
const CONTENT: Size = Size::new(800, 5000);

fn document() -> (Stage, Rc<RefCell<MemoryDocument>>) {
    Stage::from_environment(MemoryDocument::new(VIEWPORT, CONTENT))
}

fn scroll_of(doc: &Rc<RefCell<MemoryDocument>>, element: gremlins_core::ElementId) -> Position {
    doc.borrow().scroll_offset(element).unwrap()
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn every_invocation_appends_root_without_dedup() {
    let (stage, doc) = document();
    let root = doc.borrow().root_scrolling_element();
    let mut scroller = ScrollerGremlin::new(stage)
        .with_randomizer(SeededRandomizer::new(1))
        .without_show_action();

    for n in 1..=25 {
        scroller.invoke().unwrap();
        assert_eq!(scroller.scrollable_elements().len(), n + 1);
    }
    assert!(scroller.scrollable_elements().iter().all(|&el| el == root));
    assert_eq!(scroller.invocations(), 25);
}

#[test]
fn registered_containers_are_selectable() {
    let (stage, doc) = document();
    let (root, list) = {
        let mut doc = doc.borrow_mut();
        let list = doc.add_scrollable(Extent::new(Size::new(300, 200), Size::new(300, 900)));
        (doc.root_scrolling_element(), list)
    };
    let mut scroller = ScrollerGremlin::new(stage)
        .with_randomizer(SeededRandomizer::new(99))
        // duplicates weight the selection, exactly like the root's own growth
        .with_scrollable_elements([root, list, list, list, list])
        .without_show_action();

    let mut list_scrolled = false;
    for _ in 0..200 {
        scroller.invoke().unwrap();
        list_scrolled |= scroll_of(&doc, list) != Position::ORIGIN;
    }
    assert!(list_scrolled, "a registered container should eventually be scrolled");
}

// ============================================================================
// Act
// ============================================================================

#[test]
fn target_offsets_equal_selected_position() {
    let (stage, doc) = document();
    let root = doc.borrow().root_scrolling_element();
    let chosen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&chosen);

    let mut scroller = ScrollerGremlin::new(stage)
        .with_randomizer(SeededRandomizer::new(5))
        .with_position_selector(move |ctx| {
            let position = default_position_selector(ctx)?;
            sink.borrow_mut().push(position);
            Ok(position)
        })
        .without_show_action();

    for _ in 0..50 {
        scroller.invoke().unwrap();
        let expected = *chosen.borrow().last().unwrap();
        assert_eq!(scroll_of(&doc, root), expected);
        // re-reading is stable
        assert_eq!(scroll_of(&doc, root), expected);
    }
}

#[test]
fn constant_selector_pins_every_scroll() {
    let (stage, doc) = document();
    let root = doc.borrow().root_scrolling_element();
    let mut scroller = ScrollerGremlin::new(stage)
        .with_randomizer(SeededRandomizer::new(11))
        .with_position_selector(|_ctx| Ok(Position::new(5, 7)))
        .without_show_action();

    for _ in 0..10 {
        scroller.invoke().unwrap();
        assert_eq!(scroll_of(&doc, root), Position::new(5, 7));
    }
}

// ============================================================================
// Log
// ============================================================================

#[test]
fn capturing_logger_records_one_call_per_invocation() {
    let (stage, doc) = document();
    let root = doc.borrow().root_scrolling_element();
    let logger = RecordingLogger::new();
    let mut scroller = ScrollerGremlin::new(stage)
        .with_randomizer(SeededRandomizer::new(3))
        .with_logger(logger.clone());

    scroller.invoke().unwrap();

    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.category, "gremlin");
    assert_eq!(entry.source, "scroller");
    assert_eq!(entry.message, "scroll to");

    let applied = scroll_of(&doc, root);
    assert_eq!(
        entry.values,
        vec![applied.x, applied.y]
    );
}

#[test]
fn missing_logger_is_silently_skipped() {
    let (stage, _doc) = document();
    let mut scroller = ScrollerGremlin::new(stage).with_randomizer(SeededRandomizer::new(3));
    assert!(scroller.logger().is_none());
    scroller.invoke().unwrap();
}

// ============================================================================
// Show
// ============================================================================

#[test]
fn cleared_show_action_leaves_no_overlay() {
    let (stage, doc) = document();
    let mut scroller = ScrollerGremlin::new(stage.clone())
        .with_randomizer(SeededRandomizer::new(8))
        .without_show_action();

    scroller.invoke().unwrap();
    assert_eq!(doc.borrow().overlay_count(), 0);
    assert_eq!(doc.borrow().overlays_created(), 0);
    assert_eq!(stage.timers().borrow().pending(), 0);
}

#[test]
fn overlays_from_overlapping_invocations_are_independent() {
    let (stage, doc) = document();
    let mut scroller =
        ScrollerGremlin::new(stage.clone()).with_randomizer(SeededRandomizer::new(21));

    scroller.invoke().unwrap();
    stage.advance(Duration::from_millis(500));
    scroller.invoke().unwrap();
    assert_eq!(doc.borrow().overlay_count(), 2);

    // first overlay expires, second is still alive
    stage.advance(Duration::from_millis(500));
    assert_eq!(doc.borrow().overlay_count(), 1);

    stage.run_until_idle();
    assert_eq!(doc.borrow().overlay_count(), 0);
    assert_eq!(doc.borrow().overlays_created(), 2);
}

#[test]
fn every_overlay_is_eventually_removed() {
    let (stage, doc) = document();
    let mut scroller =
        ScrollerGremlin::new(stage.clone()).with_randomizer(SeededRandomizer::new(4));
    for _ in 0..30 {
        scroller.invoke().unwrap();
        stage.advance(Duration::from_millis(17));
    }
    stage.run_until_idle();
    assert_eq!(doc.borrow().overlay_count(), 0);
    assert_eq!(doc.borrow().overlays_created(), 30);
}

// ============================================================================
// End-to-end with a scripted randomizer
// ============================================================================

#[test]
fn scripted_randomizer_determines_index_and_offsets() {
    let (stage, doc) = document();
    let (root, panel) = {
        let mut doc = doc.borrow_mut();
        let panel = doc.add_scrollable(Extent::new(Size::new(300, 200), Size::new(300, 900)));
        (doc.root_scrolling_element(), panel)
    };
    let rng = SequenceRandomizer::new([1, 120, 340]);
    let logger = RecordingLogger::new();
    let mut scroller = ScrollerGremlin::new(stage)
        .with_randomizer(rng.clone())
        .with_logger(logger.clone())
        .with_scrollable_elements([root, panel])
        .without_show_action();

    scroller.invoke().unwrap();

    // registry [root, panel, root]; index 1 is the panel. The body (800x5000)
    // dominates the document size, so the axes are 800-300 and 5000-200.
    assert_eq!(rng.requested(), vec![2, 500, 4800]);
    assert_eq!(scroll_of(&doc, panel), Position::new(120, 340));
    assert_eq!(scroll_of(&doc, root), Position::ORIGIN);
    assert_eq!(
        logger.entries()[0].values,
        vec![120, 340]
    );
}

#[test]
fn failed_invocation_leaves_gremlin_usable() {
    let (stage, doc) = document();
    let root = doc.borrow().root_scrolling_element();
    // first draw is out of range, the next three are a valid invocation
    let mut scroller = ScrollerGremlin::new(stage)
        .with_randomizer(SequenceRandomizer::new([9, 0, 10, 20]))
        .without_show_action();

    assert!(scroller.invoke().is_err());
    scroller.invoke().unwrap();
    assert_eq!(scroll_of(&doc, root), Position::new(10, 20));
    assert_eq!(scroller.invocations(), 1);
}
