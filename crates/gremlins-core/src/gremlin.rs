#![forbid(unsafe_code)]

use crate::error::Result;

/// A randomized action unit a harness can invoke repeatedly.
///
/// Each invocation picks its own target and parameters, acts on the stage it
/// was built with, and returns. An `Err` aborts only that invocation; the
/// gremlin stays usable.
pub trait Gremlin {
    /// Species name, as used in log lines.
    fn name(&self) -> &'static str;

    /// Perform one randomized action.
    fn invoke(&mut self) -> Result<()>;
}
