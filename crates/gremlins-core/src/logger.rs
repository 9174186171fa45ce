#![forbid(unsafe_code)]

//! The logging capability gremlins report their actions through.
//!
//! A gremlin's logger slot is optional; when it is empty nothing is reported.
//! The call shape is fixed: a category (always `"gremlin"` for species), a
//! source naming the species, a short message, and trailing values.
//!
//! # JSONL Schema
//!
//! [`JsonlLogger`] writes one object per call:
//!
//! ```json
//! {"seq":0,"category":"gremlin","source":"scroller","message":"scroll to","values":[120,480]}
//! ```

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use serde::Serialize;

/// Receives one call per gremlin action.
pub trait GremlinLogger {
    fn log(&mut self, category: &str, source: &str, message: &str, values: &[u64]);
}

impl<L: GremlinLogger + ?Sized> GremlinLogger for Box<L> {
    fn log(&mut self, category: &str, source: &str, message: &str, values: &[u64]) {
        (**self).log(category, source, message, values);
    }
}

/// One captured log call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub category: String,
    pub source: String,
    pub message: String,
    pub values: Vec<u64>,
}

/// Forwards every call to `tracing` as an `info` event on `gremlins.log`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl GremlinLogger for TracingLogger {
    fn log(&mut self, category: &str, source: &str, message: &str, values: &[u64]) {
        let joined = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(
            target: "gremlins.log",
            category = %category,
            source = %source,
            values = %joined,
            "{message}"
        );
    }
}

/// Writes one JSON object per call to any writer.
///
/// Write failures are reported through `tracing` and otherwise ignored: losing
/// a log line must never abort the action that produced it.
#[derive(Debug)]
pub struct JsonlLogger<W: Write> {
    writer: W,
    seq: u64,
}

impl<W: Write> JsonlLogger<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, seq: 0 }
    }

    /// Number of lines emitted so far.
    pub fn emitted_count(&self) -> u64 {
        self.seq
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[derive(Serialize)]
struct JsonlLine<'a> {
    seq: u64,
    category: &'a str,
    source: &'a str,
    message: &'a str,
    values: &'a [u64],
}

impl<W: Write> GremlinLogger for JsonlLogger<W> {
    fn log(&mut self, category: &str, source: &str, message: &str, values: &[u64]) {
        let line = JsonlLine {
            seq: self.seq,
            category,
            source,
            message,
            values,
        };
        let written = serde_json::to_writer(&mut self.writer, &line)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        match written {
            Ok(()) => self.seq += 1,
            Err(error) => {
                tracing::warn!(target: "gremlins.log", %error, "failed to write JSONL log line");
            }
        }
    }
}

/// Keeps every call in memory.
///
/// Clones share the same buffer, so a test can keep a handle after handing
/// the logger to a gremlin.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    entries: Rc<RefCell<Vec<LogEntry>>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl GremlinLogger for RecordingLogger {
    fn log(&mut self, category: &str, source: &str, message: &str, values: &[u64]) {
        self.entries.borrow_mut().push(LogEntry {
            category: category.to_string(),
            source: source.to_string(),
            message: message.to_string(),
            values: values.to_vec(),
        });
    }
}
