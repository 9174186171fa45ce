#![forbid(unsafe_code)]

//! `gremlins-harness run`: unleash a scroller on an in-memory document.
//!
//! Output is line oriented. A `run_start` record, one record per scroll (from
//! the gremlin's logger), then a `run_complete` summary. With `--jsonl` every
//! line is a JSON object; otherwise lines are plain text.
//!
//! A failed invocation is reported as a warning and counted in the summary;
//! the run carries on with the next one.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Args;
use gremlins_core::{
    DocumentFixture, Environment, Gremlin, GremlinLogger, JsonlLogger, MemoryDocument,
    SeededRandomizer, Size, Stage,
};
use gremlins_species::ScrollerGremlin;
use serde::Serialize;

use crate::determinism::DeterminismFixture;
use crate::error::{HarnessError, Result};

pub const DEFAULT_VIEWPORT: Size = Size::new(1024, 768);
pub const DEFAULT_CONTENT: Size = Size::new(1024, 4000);

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Randomizer seed (falls back to GREMLINS_SEED).
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 10)]
    pub invocations: u64,

    /// Virtual milliseconds between invocations.
    #[arg(long = "tick-ms", default_value_t = 100)]
    pub tick_ms: u64,

    /// Viewport size as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_size, conflicts_with = "document")]
    pub viewport: Option<Size>,

    /// Content size as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_size, conflicts_with = "document")]
    pub content: Option<Size>,

    /// JSON document fixture (viewport, content, nested containers).
    #[arg(long)]
    pub document: Option<PathBuf>,

    /// Disable the scroll indicator.
    #[arg(long = "no-show")]
    pub no_show: bool,

    /// Emit JSON lines instead of plain text.
    #[arg(long)]
    pub jsonl: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            seed: None,
            invocations: 10,
            tick_ms: 100,
            viewport: None,
            content: None,
            document: None,
            no_show: false,
            jsonl: false,
        }
    }
}

/// Parse `WIDTHxHEIGHT` (either `x` or `X`).
pub fn parse_size(raw: &str) -> std::result::Result<Size, String> {
    let (width, height) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {raw:?}"))?;
    let width = width
        .trim()
        .parse()
        .map_err(|error| format!("bad width {width:?}: {error}"))?;
    let height = height
        .trim()
        .parse()
        .map_err(|error| format!("bad height {height:?}: {error}"))?;
    Ok(Size::new(width, height))
}

/// Totals reported in the `run_complete` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub seed: u64,
    pub invocations: u64,
    /// Invocations that returned an error.
    pub failed: u64,
    pub overlays_created: u64,
    pub overlays_present: usize,
    pub registry_len: usize,
    pub virtual_ms: u64,
}

#[derive(Serialize)]
struct RunStart<'a> {
    event: &'static str,
    run_id: &'a str,
    ts: String,
    seed: u64,
    invocations: u64,
    tick_ms: u64,
    viewport: Size,
    content: Size,
    containers: usize,
    show: bool,
}

#[derive(Serialize)]
struct RunComplete<'a> {
    event: &'static str,
    ts: String,
    #[serde(flatten)]
    summary: &'a RunSummary,
}

/// Run with output on stdout.
pub fn run_scroller(args: RunArgs) -> Result<()> {
    let fixture = DeterminismFixture::new("scroller", args.seed);
    let out = Rc::new(RefCell::new(io::stdout()));
    execute(&args, &fixture, out)?;
    Ok(())
}

/// Run against `out`. The caller keeps its own handle to read what was
/// written.
pub fn execute<W: Write + 'static>(
    args: &RunArgs,
    fixture: &DeterminismFixture,
    out: Rc<RefCell<W>>,
) -> Result<RunSummary> {
    let document = load_document(args)?;
    let root = document.root_scrolling_element();
    let containers = document.containers().to_vec();
    let root_extent = document.extent(root)?;
    let viewport = root_extent.client_size();
    let content = Size::new(root_extent.scroll_width, root_extent.scroll_height);

    let sink = SharedSink(out);
    write_record(
        &sink,
        args.jsonl,
        &RunStart {
            event: "run_start",
            run_id: fixture.run_id(),
            ts: fixture.timestamp(),
            seed: fixture.seed(),
            invocations: args.invocations,
            tick_ms: args.tick_ms,
            viewport,
            content,
            containers: containers.len(),
            show: !args.no_show,
        },
        || {
            format!(
                "run {} seed={} invocations={} viewport={}x{} content={}x{} containers={}",
                fixture.run_id(),
                fixture.seed(),
                args.invocations,
                viewport.width,
                viewport.height,
                content.width,
                content.height,
                containers.len()
            )
        },
    )?;

    let (stage, document) = Stage::from_environment(document);
    let logger: Box<dyn GremlinLogger> = if args.jsonl {
        Box::new(JsonlLogger::new(sink.clone()))
    } else {
        Box::new(TextLogger::new(sink.clone()))
    };
    let mut scroller = ScrollerGremlin::new(stage.clone())
        .with_randomizer(SeededRandomizer::new(fixture.seed()))
        .with_logger(logger)
        .with_scrollable_elements(std::iter::once(root).chain(containers));
    if args.no_show {
        scroller.clear_show_action();
    }

    let failed = drive(
        &mut scroller,
        &stage,
        args.invocations,
        Duration::from_millis(args.tick_ms),
    );
    let drained = stage.run_until_idle();
    tracing::debug!(target: "gremlins.harness", drained, "timers drained");

    let summary = {
        let document = document.borrow();
        RunSummary {
            run_id: fixture.run_id().to_string(),
            seed: fixture.seed(),
            invocations: scroller.invocations(),
            failed,
            overlays_created: document.overlays_created(),
            overlays_present: document.overlay_count(),
            registry_len: scroller.scrollable_elements().len(),
            virtual_ms: stage.now().as_millis() as u64,
        }
    };

    write_record(
        &sink,
        args.jsonl,
        &RunComplete {
            event: "run_complete",
            ts: fixture.timestamp(),
            summary: &summary,
        },
        || {
            format!(
                "complete invocations={} failed={} overlays_created={} overlays_present={} \
                 registry_len={} virtual_ms={}",
                summary.invocations,
                summary.failed,
                summary.overlays_created,
                summary.overlays_present,
                summary.registry_len,
                summary.virtual_ms
            )
        },
    )?;
    sink.0.borrow_mut().flush()?;
    tracing::info!(
        target: "gremlins.harness",
        run_id = %summary.run_id,
        invocations = summary.invocations,
        "run complete"
    );
    Ok(summary)
}

/// Invoke `gremlin` `invocations` times, advancing the clock by `tick` after
/// each attempt. Returns the number of failed invocations.
fn drive(gremlin: &mut dyn Gremlin, stage: &Stage, invocations: u64, tick: Duration) -> u64 {
    let mut failed = 0;
    for attempt in 0..invocations {
        if let Err(error) = gremlin.invoke() {
            failed += 1;
            tracing::warn!(
                target: "gremlins.harness",
                gremlin = gremlin.name(),
                attempt,
                %error,
                "invocation failed"
            );
        }
        stage.advance(tick);
    }
    failed
}

fn load_document(args: &RunArgs) -> Result<MemoryDocument> {
    let Some(path) = &args.document else {
        return Ok(MemoryDocument::new(
            args.viewport.unwrap_or(DEFAULT_VIEWPORT),
            args.content.unwrap_or(DEFAULT_CONTENT),
        ));
    };
    if !path.exists() {
        return Err(HarnessError::MissingPath { path: path.clone() });
    }
    let fixture: DocumentFixture = serde_json::from_str(&fs::read_to_string(path)?)?;
    Ok(MemoryDocument::from_fixture(&fixture))
}

fn write_record<W: Write, T: Serialize>(
    sink: &SharedSink<W>,
    jsonl: bool,
    record: &T,
    text: impl FnOnce() -> String,
) -> Result<()> {
    let mut out = sink.0.borrow_mut();
    if jsonl {
        serde_json::to_writer(&mut *out, record)?;
        out.write_all(b"\n")?;
    } else {
        writeln!(out, "{}", text())?;
    }
    Ok(())
}

/// Writer handle shared between the run records and the gremlin's logger.
struct SharedSink<W>(Rc<RefCell<W>>);

impl<W> Clone for SharedSink<W> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<W: Write> Write for SharedSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.borrow_mut().flush()
    }
}

/// Plain-text logger: `gremlin scroller: scroll to 0 1200`.
struct TextLogger<W: Write> {
    writer: W,
}

impl<W: Write> TextLogger<W> {
    fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> GremlinLogger for TextLogger<W> {
    fn log(&mut self, category: &str, source: &str, message: &str, values: &[u64]) {
        let mut line = format!("{category} {source}: {message}");
        for value in values {
            line.push(' ');
            line.push_str(&value.to_string());
        }
        if let Err(error) = writeln!(self.writer, "{line}") {
            tracing::warn!(target: "gremlins.harness", %error, "failed to write log line");
        }
    }
}
