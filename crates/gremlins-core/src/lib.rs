#![forbid(unsafe_code)]

//! Core: the seams every gremlin is wired through.
//!
//! # Role in Gremlins
//! `gremlins-core` owns the collaborator interfaces a gremlin consumes and
//! nothing species-specific. A gremlin never touches global state: it is
//! handed a [`Stage`] (the live [`Environment`] plus a [`TimerQueue`] for
//! deferred work), a [`Randomizer`], and optionally a [`GremlinLogger`].
//!
//! # Primary responsibilities
//! - **Environment**: elements with scroll offsets, geometric extents, and
//!   overlay mutation primitives. [`MemoryDocument`] is the in-memory
//!   implementation used by tests and the harness.
//! - **Randomness**: the "natural number up to max" draw contract.
//! - **Logging**: the `log(category, source, message, values)` capability.
//! - **Deferred tasks**: fire-and-forget tasks on a virtual clock.
//!
//! # How it fits in the system
//! Species crates (`gremlins-species`) implement [`Gremlin`] on top of these
//! types; the harness (`gremlins-harness`) assembles a stage and drives them.

pub mod environment;
pub mod error;
pub mod geometry;
pub mod gremlin;
pub mod logger;
pub mod memory_document;
pub mod randomizer;
pub mod stage;
pub mod timers;

pub use environment::{Border, ElementId, Environment, Overlay, Rgb, SharedEnvironment};
pub use error::{GremlinError, Result};
pub use geometry::{Extent, Position, Rect, Size};
pub use gremlin::Gremlin;
pub use logger::{
    GremlinLogger, JsonlLogger, LogEntry, RecordingLogger, TracingLogger,
};
pub use memory_document::{ContainerFixture, DocumentFixture, MemoryDocument};
pub use randomizer::{Randomizer, SeededRandomizer, SequenceRandomizer};
pub use stage::Stage;
pub use timers::{DueTask, SharedTimers, Task, TimerQueue};
