#![forbid(unsafe_code)]

//! Command-line harness for gremlins.
//!
//! Builds an in-memory document, lets a scroller loose on it under a virtual
//! clock, and reports every action as text or JSON lines. Runs are
//! reproducible from their seed (`--seed` or `GREMLINS_SEED`); set
//! `GREMLINS_DETERMINISTIC=1` for stable run ids and timestamps too.

pub mod cli;
pub mod determinism;
pub mod error;
pub mod run;

pub use cli::{Cli, Commands, run};
pub use error::{HarnessError, Result};
