#![forbid(unsafe_code)]

//! Geometric primitives in document pixels.

use serde::{Deserialize, Serialize};

/// A scroll offset (or any document point), origin at top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Horizontal offset.
    pub x: u64,
    /// Vertical offset.
    pub y: u64,
}

impl Position {
    /// Create a new position.
    #[inline]
    pub const fn new(x: u64, y: u64) -> Self {
        Self { x, y }
    }

    /// The document origin.
    pub const ORIGIN: Position = Position::new(0, 0);

    /// Shift both coordinates by the same amount.
    #[inline]
    pub const fn offset(&self, by: u64) -> Self {
        Self::new(self.x.saturating_add(by), self.y.saturating_add(by))
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Shrink both dimensions by `margin`, stopping at zero.
    #[inline]
    pub const fn shrink(&self, margin: u32) -> Self {
        Self::new(
            self.width.saturating_sub(margin),
            self.height.saturating_sub(margin),
        )
    }
}

/// The geometric measurements an element exposes.
///
/// The three pairs mirror what layout engines report and frequently disagree
/// with each other: `scroll` is the full content size, `offset` includes
/// borders and scrollbars, `client` is the visible inner area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent {
    pub scroll_width: u32,
    pub scroll_height: u32,
    pub offset_width: u32,
    pub offset_height: u32,
    pub client_width: u32,
    pub client_height: u32,
}

impl Extent {
    /// An element whose visible area is `client` and whose content is `content`.
    pub const fn new(client: Size, content: Size) -> Self {
        Self {
            scroll_width: content.width,
            scroll_height: content.height,
            offset_width: client.width,
            offset_height: client.height,
            client_width: client.width,
            client_height: client.height,
        }
    }

    /// An element where every measurement agrees on `size`.
    pub const fn uniform(size: Size) -> Self {
        Self::new(size, size)
    }

    /// Visible inner area.
    #[inline]
    pub const fn client_size(&self) -> Size {
        Size::new(self.client_width, self.client_height)
    }

    /// Largest width any measurement of `self` or `body` reports.
    pub fn document_width(&self, body: &Extent) -> u32 {
        [
            body.scroll_width,
            body.offset_width,
            self.scroll_width,
            self.offset_width,
            self.client_width,
        ]
        .into_iter()
        .max()
        .unwrap_or_default()
    }

    /// Largest height any measurement of `self` or `body` reports.
    pub fn document_height(&self, body: &Extent) -> u32 {
        [
            body.scroll_height,
            body.offset_height,
            self.scroll_height,
            self.offset_height,
            self.client_height,
        ]
        .into_iter()
        .max()
        .unwrap_or_default()
    }

    /// Upper bounds (inclusive) of the scroll offsets reachable in `self`.
    ///
    /// Signed because callers feed these straight into a randomizer whose
    /// contract decides what a negative bound means.
    pub fn scroll_range(&self, body: &Extent) -> (i64, i64) {
        (
            i64::from(self.document_width(body)) - i64::from(self.client_width),
            i64::from(self.document_height(body)) - i64::from(self.client_height),
        )
    }
}

/// An axis-aligned rectangle in document pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u64,
    /// Top edge (inclusive).
    pub y: u64,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[inline]
    pub const fn new(x: u64, y: u64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of `size` anchored at `origin`.
    #[inline]
    pub const fn at(origin: Position, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }
}
