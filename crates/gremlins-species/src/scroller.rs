#![forbid(unsafe_code)]

//! The scroller gremlin.
//!
//! Scrolls a randomly chosen registered container to a random offset inside
//! its scrollable range, flashes an outline where the viewport landed, and
//! reports `("gremlin", "scroller", "scroll to", x, y)`.
//!
//! # Protocol
//!
//! | Step | Action |
//! |------|--------|
//! | register | append the root scrolling element to the registry |
//! | select target | `natural(len - 1)` picks a registry index |
//! | select position | the position selector maps the target to `(x, y)` |
//! | act | write both scroll offsets of the target |
//! | show | run the show action, if any; a failure is only logged |
//! | log | call the logger, if any |
//!
//! The registry is never deduplicated: the root element is appended on every
//! invocation, so its share of the selection weight grows over the gremlin's
//! lifetime.
//!
//! # Customization
//!
//! ```
//! # use gremlins_core::{MemoryDocument, Position, SeededRandomizer, Size, Stage, TracingLogger};
//! # use gremlins_species::ScrollerGremlin;
//! # let document = MemoryDocument::new(Size::new(10, 10), Size::new(10, 10));
//! # let (stage, _doc) = Stage::from_environment(document);
//! let mut scroller = ScrollerGremlin::new(stage);
//! scroller
//!     .set_randomizer(SeededRandomizer::new(7))
//!     .set_logger(TracingLogger)
//!     .set_position_selector(|ctx| {
//!         // only ever scroll vertically
//!         let max_y = ctx.environment.extent(ctx.element)?.scroll_height as i64;
//!         Ok(Position::new(0, ctx.randomizer.natural(max_y)?))
//!     });
//! ```

use std::fmt;
use std::time::Duration;

use gremlins_core::{
    Border, ElementId, Environment, Gremlin, GremlinError, GremlinLogger, Overlay,
    Position, Randomizer, Rect, Result, Rgb, SeededRandomizer, Size, Stage,
};

/// Species name, also the `source` of every log call.
pub const SCROLLER_NAME: &str = "scroller";

const LOG_CATEGORY: &str = "gremlin";
const LOG_MESSAGE: &str = "scroll to";

const INDICATOR_OFFSET: u64 = 10;
const INDICATOR_MARGIN: u32 = 25;
const INDICATOR_BORDER: Border = Border {
    width: 3,
    color: Rgb::RED,
};
const INDICATOR_TRANSITION: Duration = Duration::from_secs(1);
const INDICATOR_FADE_DELAY: Duration = Duration::from_millis(50);
const INDICATOR_REMOVE_DELAY: Duration = Duration::from_millis(1000);

/// Everything a position selector may consult for one invocation.
pub struct SelectionContext<'a> {
    /// The container chosen from the registry.
    pub element: ElementId,
    /// Read-only view of the document, for measuring the element.
    pub environment: &'a dyn Environment,
    /// The randomizer configured at the moment of the invocation.
    pub randomizer: &'a mut dyn Randomizer,
}

/// Maps the chosen container to the offsets it will be scrolled to.
pub type PositionSelector = Box<dyn FnMut(SelectionContext<'_>) -> Result<Position>>;

/// Renders feedback for an applied scroll.
pub type ShowAction = Box<dyn FnMut(&Stage, Position) -> Result<()>>;

/// Default selector: a uniform draw over the container's scrollable range.
///
/// The document size is the largest width/height reported by the container
/// or the body, which smooths over layouts where the measurements disagree.
pub fn default_position_selector(ctx: SelectionContext<'_>) -> Result<Position> {
    let SelectionContext {
        element,
        environment,
        randomizer,
    } = ctx;
    let extent = environment.extent(element)?;
    let body = environment.extent(environment.body())?;
    let (max_x, max_y) = extent.scroll_range(&body);
    let x = randomizer.natural(max_x)?;
    let y = randomizer.natural(max_y)?;
    Ok(Position::new(x, y))
}

/// The outline the default show action draws for a scroll to `position`.
pub fn scroll_indicator(position: Position, viewport: Size) -> Overlay {
    Overlay {
        bounds: Rect::at(
            position.offset(INDICATOR_OFFSET),
            viewport.shrink(INDICATOR_MARGIN),
        ),
        border: INDICATOR_BORDER,
        fade: INDICATOR_TRANSITION,
        opacity: 1.0,
    }
}

/// Default show action: append a viewport-sized outline, fade it after 50ms,
/// remove it after one second.
///
/// Both follow-ups are fire-and-forget. If the overlay is already gone when
/// one of them fires, it does nothing.
pub fn default_show_action(stage: &Stage, position: Position) -> Result<()> {
    let overlay = {
        let mut env = stage.env().borrow_mut();
        let root = env.root_scrolling_element();
        let viewport = env.extent(root)?.client_size();
        env.append_overlay(scroll_indicator(position, viewport))?
    };
    tracing::trace!(
        target: "gremlins.overlay",
        overlay = %overlay,
        x = position.x,
        y = position.y,
        "scroll indicator shown"
    );

    let mut timers = stage.timers().borrow_mut();
    timers.submit(
        INDICATOR_FADE_DELAY,
        "scroller.indicator.fade",
        Box::new(move |env: &mut dyn Environment| {
            if let Err(error) = env.set_opacity(overlay, 0.0) {
                tracing::trace!(
                    target: "gremlins.overlay",
                    overlay = %overlay,
                    %error,
                    "indicator gone before fade"
                );
            }
        }),
    );
    timers.submit(
        INDICATOR_REMOVE_DELAY,
        "scroller.indicator.remove",
        Box::new(move |env: &mut dyn Environment| {
            if let Err(error) = env.remove_element(overlay) {
                tracing::trace!(
                    target: "gremlins.overlay",
                    overlay = %overlay,
                    %error,
                    "indicator gone before removal"
                );
            }
        }),
    );
    Ok(())
}

struct ScrollerConfig {
    position_selector: PositionSelector,
    show_action: Option<ShowAction>,
    logger: Option<Box<dyn GremlinLogger>>,
    randomizer: Box<dyn Randomizer>,
    scrollable_elements: Vec<ElementId>,
}

impl ScrollerConfig {
    fn with_defaults(root: ElementId) -> Self {
        Self {
            position_selector: Box::new(default_position_selector),
            show_action: Some(Box::new(default_show_action)),
            logger: None,
            randomizer: Box::new(SeededRandomizer::from_entropy()),
            scrollable_elements: vec![root],
        }
    }
}

/// Scrolls random containers of the stage's document.
pub struct ScrollerGremlin {
    stage: Stage,
    config: ScrollerConfig,
    invocations: u64,
}

impl ScrollerGremlin {
    /// A scroller with default strategies, an entropy-seeded randomizer, no
    /// logger, and a registry holding only the root scrolling element.
    pub fn new(stage: Stage) -> Self {
        let root = stage.env().borrow().root_scrolling_element();
        Self {
            stage,
            config: ScrollerConfig::with_defaults(root),
            invocations: 0,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Completed invocations (failed ones excluded).
    pub fn invocations(&self) -> u64 {
        self.invocations
    }

    // ── Configuration ─────────────────────────────────────────────────────

    pub fn position_selector(&self) -> &PositionSelector {
        &self.config.position_selector
    }

    /// The configured selector, callable outside an invocation.
    pub fn position_selector_mut(&mut self) -> &mut PositionSelector {
        &mut self.config.position_selector
    }

    pub fn set_position_selector<F>(&mut self, selector: F) -> &mut Self
    where
        F: FnMut(SelectionContext<'_>) -> Result<Position> + 'static,
    {
        self.config.position_selector = Box::new(selector);
        self
    }

    #[must_use]
    pub fn with_position_selector<F>(mut self, selector: F) -> Self
    where
        F: FnMut(SelectionContext<'_>) -> Result<Position> + 'static,
    {
        self.set_position_selector(selector);
        self
    }

    pub fn show_action(&self) -> Option<&ShowAction> {
        self.config.show_action.as_ref()
    }

    pub fn set_show_action<F>(&mut self, action: F) -> &mut Self
    where
        F: FnMut(&Stage, Position) -> Result<()> + 'static,
    {
        self.config.show_action = Some(Box::new(action));
        self
    }

    /// Disable visual feedback.
    pub fn clear_show_action(&mut self) -> &mut Self {
        self.config.show_action = None;
        self
    }

    #[must_use]
    pub fn without_show_action(mut self) -> Self {
        self.clear_show_action();
        self
    }

    pub fn logger(&self) -> Option<&dyn GremlinLogger> {
        self.config.logger.as_deref()
    }

    pub fn set_logger<L: GremlinLogger + 'static>(&mut self, logger: L) -> &mut Self {
        self.config.logger = Some(Box::new(logger));
        self
    }

    pub fn clear_logger(&mut self) -> &mut Self {
        self.config.logger = None;
        self
    }

    #[must_use]
    pub fn with_logger<L: GremlinLogger + 'static>(mut self, logger: L) -> Self {
        self.set_logger(logger);
        self
    }

    pub fn randomizer(&self) -> &dyn Randomizer {
        &*self.config.randomizer
    }

    /// The configured randomizer, for drawing values outside an invocation.
    pub fn randomizer_mut(&mut self) -> &mut dyn Randomizer {
        &mut *self.config.randomizer
    }

    pub fn set_randomizer<R: Randomizer + 'static>(&mut self, randomizer: R) -> &mut Self {
        self.config.randomizer = Box::new(randomizer);
        self
    }

    #[must_use]
    pub fn with_randomizer<R: Randomizer + 'static>(mut self, randomizer: R) -> Self {
        self.set_randomizer(randomizer);
        self
    }

    /// Registered containers, duplicates included.
    pub fn scrollable_elements(&self) -> &[ElementId] {
        &self.config.scrollable_elements
    }

    pub fn set_scrollable_elements(
        &mut self,
        elements: impl IntoIterator<Item = ElementId>,
    ) -> &mut Self {
        self.config.scrollable_elements = elements.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_scrollable_elements(
        mut self,
        elements: impl IntoIterator<Item = ElementId>,
    ) -> Self {
        self.set_scrollable_elements(elements);
        self
    }

    // ── Protocol ──────────────────────────────────────────────────────────

    fn select_target(&mut self) -> Result<ElementId> {
        let registry = &self.config.scrollable_elements;
        let max_index = i64::try_from(registry.len()).unwrap_or(i64::MAX) - 1;
        let drawn = self.config.randomizer.natural(max_index)?;
        usize::try_from(drawn)
            .ok()
            .and_then(|index| registry.get(index))
            .copied()
            .ok_or(GremlinError::IndexOutOfRange {
                index: drawn,
                len: registry.len(),
            })
    }

    fn select_position(&mut self, target: ElementId) -> Result<Position> {
        let env = self.stage.env().borrow();
        (self.config.position_selector)(SelectionContext {
            element: target,
            environment: &*env,
            randomizer: &mut *self.config.randomizer,
        })
    }

    fn show(&mut self, position: Position) {
        let Some(show) = self.config.show_action.as_mut() else {
            return;
        };
        if let Err(error) = show(&self.stage, position) {
            tracing::warn!(
                target: "gremlins.scroller",
                %error,
                x = position.x,
                y = position.y,
                "show action failed"
            );
        }
    }

    fn log(&mut self, position: Position) {
        if let Some(logger) = self.config.logger.as_mut() {
            logger.log(
                LOG_CATEGORY,
                SCROLLER_NAME,
                LOG_MESSAGE,
                &[position.x, position.y],
            );
        }
    }
}

impl Gremlin for ScrollerGremlin {
    fn name(&self) -> &'static str {
        SCROLLER_NAME
    }

    fn invoke(&mut self) -> Result<()> {
        let root = self.stage.env().borrow().root_scrolling_element();
        self.config.scrollable_elements.push(root);

        let _span = tracing::debug_span!(
            "gremlin.invoke",
            gremlin = SCROLLER_NAME,
            registry_len = self.config.scrollable_elements.len() as u64,
        )
        .entered();

        let target = self.select_target()?;
        let position = self.select_position(target)?;
        self.stage
            .env()
            .borrow_mut()
            .set_scroll_offset(target, position)?;
        tracing::debug!(
            target: "gremlins.scroller",
            element = %target,
            x = position.x,
            y = position.y,
            "scrolled"
        );

        self.show(position);
        self.log(position);
        self.invocations += 1;
        Ok(())
    }
}

impl fmt::Debug for ScrollerGremlin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollerGremlin")
            .field("scrollable_elements", &self.config.scrollable_elements)
            .field("show_action", &self.config.show_action.is_some())
            .field("logger", &self.config.logger.is_some())
            .field("invocations", &self.invocations)
            .finish_non_exhaustive()
    }
}
