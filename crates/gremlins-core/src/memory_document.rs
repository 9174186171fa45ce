#![forbid(unsafe_code)]

//! In-memory [`Environment`] for tests and the harness.
//!
//! Scroll offsets are stored exactly as written; no clamping is applied, so a
//! reader can verify what a gremlin asked for rather than what a layout engine
//! would have allowed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::environment::{ElementId, Environment, Overlay};
use crate::error::{GremlinError, Result};
use crate::geometry::{Extent, Position, Size};

const ROOT_ID: ElementId = ElementId::new(1);
const BODY_ID: ElementId = ElementId::new(2);

/// Serializable description of a document's geometry.
///
/// ```json
/// {"viewport":{"width":1024,"height":768},"content":{"width":1024,"height":4000},
///  "containers":[{"client":{"width":300,"height":200},"content":{"width":300,"height":900}}]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentFixture {
    pub viewport: Size,
    pub content: Size,
    #[serde(default)]
    pub containers: Vec<ContainerFixture>,
}

/// A nested scrollable container inside a [`DocumentFixture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerFixture {
    pub client: Size,
    pub content: Size,
}

#[derive(Debug, Clone)]
struct ElementState {
    extent: Extent,
    scroll: Position,
}

/// A document held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    elements: BTreeMap<ElementId, ElementState>,
    containers: Vec<ElementId>,
    overlays: BTreeMap<ElementId, Overlay>,
    overlays_created: u64,
    next_id: u32,
}

impl MemoryDocument {
    /// A document whose viewport shows `viewport` of `content`.
    pub fn new(viewport: Size, content: Size) -> Self {
        let mut elements = BTreeMap::new();
        elements.insert(
            ROOT_ID,
            ElementState {
                extent: Extent::new(viewport, content),
                scroll: Position::ORIGIN,
            },
        );
        // The body is as wide as the viewport and as tall as its content.
        let body_box = Size::new(viewport.width, content.height);
        elements.insert(
            BODY_ID,
            ElementState {
                extent: Extent {
                    scroll_width: content.width,
                    scroll_height: content.height,
                    offset_width: body_box.width,
                    offset_height: body_box.height,
                    client_width: body_box.width,
                    client_height: body_box.height,
                },
                scroll: Position::ORIGIN,
            },
        );
        Self {
            elements,
            containers: Vec::new(),
            overlays: BTreeMap::new(),
            overlays_created: 0,
            next_id: BODY_ID.raw() + 1,
        }
    }

    /// Build a document (including nested containers) from a fixture.
    pub fn from_fixture(fixture: &DocumentFixture) -> Self {
        let mut document = Self::new(fixture.viewport, fixture.content);
        for container in &fixture.containers {
            document.add_scrollable(Extent::new(container.client, container.content));
        }
        document
    }

    /// Parse a JSON fixture and build the document it describes.
    pub fn from_json(json: &str) -> Result<Self> {
        let fixture: DocumentFixture = serde_json::from_str(json)?;
        Ok(Self::from_fixture(&fixture))
    }

    /// Add a nested scrollable container.
    pub fn add_scrollable(&mut self, extent: Extent) -> ElementId {
        let id = self.allocate_id();
        self.elements.insert(
            id,
            ElementState {
                extent,
                scroll: Position::ORIGIN,
            },
        );
        self.containers.push(id);
        id
    }

    /// Nested containers in insertion order (root and body excluded).
    pub fn containers(&self) -> &[ElementId] {
        &self.containers
    }

    pub fn overlay(&self, element: ElementId) -> Option<&Overlay> {
        self.overlays.get(&element)
    }

    /// Overlays currently attached, in insertion order.
    pub fn overlays(&self) -> impl Iterator<Item = (ElementId, &Overlay)> {
        self.overlays.iter().map(|(id, overlay)| (*id, overlay))
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Total overlays ever appended, including removed ones.
    pub fn overlays_created(&self) -> u64 {
        self.overlays_created
    }

    /// Detach every overlay, as a page teardown would.
    pub fn clear_overlays(&mut self) {
        self.overlays.clear();
    }

    fn allocate_id(&mut self) -> ElementId {
        let id = ElementId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn state(&self, element: ElementId) -> Result<&ElementState> {
        self.elements
            .get(&element)
            .ok_or(GremlinError::UnknownElement(element))
    }

    fn state_mut(&mut self, element: ElementId) -> Result<&mut ElementState> {
        self.elements
            .get_mut(&element)
            .ok_or(GremlinError::UnknownElement(element))
    }
}

impl Environment for MemoryDocument {
    fn root_scrolling_element(&self) -> ElementId {
        ROOT_ID
    }

    fn body(&self) -> ElementId {
        BODY_ID
    }

    fn extent(&self, element: ElementId) -> Result<Extent> {
        Ok(self.state(element)?.extent)
    }

    fn scroll_offset(&self, element: ElementId) -> Result<Position> {
        Ok(self.state(element)?.scroll)
    }

    fn set_scroll_offset(&mut self, element: ElementId, position: Position) -> Result<()> {
        self.state_mut(element)?.scroll = position;
        Ok(())
    }

    fn append_overlay(&mut self, overlay: Overlay) -> Result<ElementId> {
        let id = self.allocate_id();
        self.overlays.insert(id, overlay);
        self.overlays_created += 1;
        Ok(id)
    }

    fn set_opacity(&mut self, element: ElementId, opacity: f32) -> Result<()> {
        let overlay = self
            .overlays
            .get_mut(&element)
            .ok_or(GremlinError::UnknownElement(element))?;
        overlay.opacity = opacity.clamp(0.0, 1.0);
        Ok(())
    }

    fn remove_element(&mut self, element: ElementId) -> Result<()> {
        self.overlays
            .remove(&element)
            .map(|_| ())
            .ok_or(GremlinError::UnknownElement(element))
    }
}
