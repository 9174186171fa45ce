#![forbid(unsafe_code)]

//! The live document a gremlin acts on.
//!
//! A gremlin never reaches for a global window or document. It is handed a
//! [`SharedEnvironment`] at construction and only sees the capabilities this
//! trait exposes: scroll offsets, geometric extents, and the ability to append
//! and remove its own transient overlays.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::error::Result;
use crate::geometry::{Extent, Position, Rect};

/// Opaque reference to an element of the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
}

/// Solid border around an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Border {
    pub width: u32,
    pub color: Rgb,
}

impl fmt::Display for Border {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb(r, g, b) = self.color;
        write!(f, "{}px solid #{r:02x}{g:02x}{b:02x}", self.width)
    }
}

/// A transient, absolutely positioned outline appended to the document body.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// Placement in document coordinates.
    pub bounds: Rect,
    pub border: Border,
    /// Duration of the ease-out transition applied when opacity changes.
    pub fade: Duration,
    /// Current opacity in `0.0..=1.0`.
    pub opacity: f32,
}

/// Capabilities a gremlin needs from the document under test.
///
/// Implementations report unknown elements with
/// [`GremlinError::UnknownElement`](crate::GremlinError::UnknownElement).
pub trait Environment {
    /// The element that scrolls the whole document.
    fn root_scrolling_element(&self) -> ElementId;

    /// The document body, whose extents take part in document-size math.
    fn body(&self) -> ElementId;

    /// Geometric measurements of `element`.
    fn extent(&self, element: ElementId) -> Result<Extent>;

    /// Current horizontal and vertical scroll offsets of `element`.
    fn scroll_offset(&self, element: ElementId) -> Result<Position>;

    /// Overwrite both scroll offsets of `element`.
    fn set_scroll_offset(&mut self, element: ElementId, position: Position) -> Result<()>;

    /// Append `overlay` to the body and return its id.
    fn append_overlay(&mut self, overlay: Overlay) -> Result<ElementId>;

    /// Change the opacity of a previously appended overlay.
    fn set_opacity(&mut self, element: ElementId, opacity: f32) -> Result<()>;

    /// Remove a previously appended overlay from the document.
    fn remove_element(&mut self, element: ElementId) -> Result<()>;
}

/// Single-threaded shared handle to the environment.
pub type SharedEnvironment = Rc<RefCell<dyn Environment>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_renders_like_a_css_declaration() {
        let border = Border {
            width: 3,
            color: Rgb::RED,
        };
        assert_eq!(border.to_string(), "3px solid #ff0000");
    }

    #[test]
    fn element_ids_order_by_raw_value() {
        assert!(ElementId::new(1) < ElementId::new(2));
        assert_eq!(ElementId::new(9).raw(), 9);
    }
}
