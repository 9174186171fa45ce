#![forbid(unsafe_code)]

//! Gremlin species.
//!
//! Every species follows the same protocol: pick a target and parameters
//! through an injected [`Randomizer`](gremlins_core::Randomizer), act on the
//! stage, optionally show what it did, optionally log it. Strategies are
//! plain closures held in a per-species configuration struct and replaced
//! through chaining accessors.
//!
//! # Example
//!
//! ```
//! use gremlins_core::{Gremlin, MemoryDocument, Position, RecordingLogger, Size, Stage};
//! use gremlins_species::ScrollerGremlin;
//!
//! let (stage, document) =
//!     Stage::from_environment(MemoryDocument::new(Size::new(800, 600), Size::new(800, 5000)));
//! let logger = RecordingLogger::new();
//!
//! let mut scroller = ScrollerGremlin::new(stage);
//! scroller
//!     .set_position_selector(|_ctx| Ok(Position::new(0, 1200)))
//!     .clear_show_action()
//!     .set_logger(logger.clone());
//!
//! scroller.invoke().unwrap();
//! assert_eq!(logger.len(), 1);
//! assert_eq!(document.borrow().overlay_count(), 0);
//! ```

pub mod scroller;

pub use scroller::{
    PositionSelector, SCROLLER_NAME, ScrollerGremlin, SelectionContext, ShowAction,
    default_position_selector, default_show_action, scroll_indicator,
};
