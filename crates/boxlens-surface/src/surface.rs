//! The render surface handle.
//!
//! One [`RenderSurface`] owns one installed document: the parsed DOM, the
//! host engine's layout snapshot for it, and the listener table. Annotation
//! layers read geometry and write overlay nodes exclusively through this
//! handle — never through ambient globals — so independent previews can
//! coexist without cross-talk.
//!
//! A surface is immutable in identity: a new markup document or a new
//! annotation config means a whole new surface, and every [`NodeId`] from
//! the old one is invalid. That wholesale-replacement rule is what keeps
//! overlay bookkeeping trivial.

use std::rc::Rc;

use boxlens_common::Rect;
use boxlens_dom::{DomTree, ElementData, NodeId, NodeType};
use boxlens_markup::parse_markup;

use crate::events::{EventKind, LayerKind, ListenerBinding, ListenerRegistry, SurfaceEvent};
use crate::layout::{HostLayout, LayoutSnapshot, ScrollMetrics, Size};

/// The id of the container wrapping the user's markup in the injected
/// document. Stable contract between the injector and the query API.
pub const CONTENT_CONTAINER_ID: &str = "content";

/// An isolated document plus the host's layout results for it.
pub struct RenderSurface {
    dom: DomTree,
    layout: LayoutSnapshot,
    host: Rc<dyn HostLayout>,
    viewport: Size,
    listeners: ListenerRegistry,
    loaded: bool,
}

impl RenderSurface {
    /// Install `document_html` into a fresh surface: parse it with the
    /// surface's own lenient parser, then ask the host engine for layout.
    #[must_use]
    pub fn new(document_html: &str, host: Rc<dyn HostLayout>, viewport: Size) -> Self {
        let dom = parse_markup(document_html);
        let layout = host.layout(&dom, viewport);
        RenderSurface {
            dom,
            layout,
            host,
            viewport,
            listeners: ListenerRegistry::default(),
            loaded: false,
        }
    }

    /// The parsed document.
    #[must_use]
    pub fn dom(&self) -> &DomTree {
        &self.dom
    }

    /// Current viewport size.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Whether the load-complete signal (or its fallback) has been seen.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Record that the document finished loading.
    pub fn mark_loaded(&mut self) {
        self.loaded = true;
    }

    /// Apply a viewport resize: the host engine re-reports layout for the
    /// new size. Geometry queries reflect the fresh snapshot afterwards.
    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.layout = self.host.layout(&self.dom, viewport);
    }

    // ------------------------------------------------------------------
    // Queries (CSSOM-View shaped, read-only)
    // ------------------------------------------------------------------

    /// The `#content` container wrapping the user's markup, if present.
    #[must_use]
    pub fn content_root(&self) -> Option<NodeId> {
        self.dom.element_by_id(CONTENT_CONTAINER_ID)
    }

    /// Every element under the content container, in document order —
    /// the `#content *` query both annotation layers iterate. Empty when
    /// the container is missing or empty (a no-op scan, not an error).
    #[must_use]
    pub fn content_elements(&self) -> Vec<NodeId> {
        let Some(root) = self.content_root() else {
            return Vec::new();
        };
        self.dom
            .descendants(root)
            .into_iter()
            .filter(|&node| self.dom.as_element(node).is_some())
            .collect()
    }

    /// [CSSOM View § 7.1](https://drafts.csswg.org/cssom-view/#dom-element-getboundingclientrect)
    ///
    /// The element's border box in page coordinates. Elements the host
    /// reported no layout for read as a zero rect.
    #[must_use]
    pub fn bounding_client_rect(&self, node: NodeId) -> Rect {
        self.layout
            .get(node)
            .map_or_else(Rect::default, |layout| layout.border_box)
    }

    /// [CSSOM § 6.6.1](https://drafts.csswg.org/cssom/#dom-window-getcomputedstyle)
    ///
    /// One resolved style value. Inline style set through
    /// [`set_inline_style`](Self::set_inline_style) shadows the host's
    /// reported value, mirroring how a live engine folds inline style into
    /// the computed value. Missing everywhere reads as `""` (which the
    /// metric parser coerces to zero).
    #[must_use]
    pub fn computed_value(&self, node: NodeId, prop: &str) -> String {
        if let Some(inline) = self.dom.style_get(node, prop) {
            return inline;
        }
        self.layout
            .get(node)
            .and_then(|layout| layout.computed.get(prop).cloned())
            .unwrap_or_default()
    }

    /// Scroll/client extents for overflow classification; zeros when the
    /// host reported nothing (annotation nodes, for instance).
    #[must_use]
    pub fn scroll_metrics(&self, node: NodeId) -> ScrollMetrics {
        self.layout
            .get(node)
            .map_or_else(ScrollMetrics::default, |layout| layout.scroll)
    }

    // ------------------------------------------------------------------
    // Mutations (the annotation layers' only write path)
    // ------------------------------------------------------------------

    /// Create a detached annotation element: a `<div>` carrying the given
    /// space-separated classes and optional text content.
    pub fn create_annotation(&mut self, classes: &str, text: Option<&str>) -> NodeId {
        let mut data = ElementData::new("div");
        let _ = data.attrs.insert("class".to_string(), classes.to_string());
        let node = self.dom.alloc(NodeType::Element(data));
        if let Some(text) = text {
            let text_node = self.dom.alloc(NodeType::Text(text.to_string()));
            self.dom.append_child(node, text_node);
        }
        node
    }

    /// Append an annotation node to `<body>` (overlay boxes and floating
    /// labels live there, above all content). Falls back to the document
    /// root for body-less fragments.
    pub fn append_to_body(&mut self, node: NodeId) {
        let parent = self.dom.body().unwrap_or(NodeId::ROOT);
        self.dom.append_child(parent, node);
    }

    /// Append an annotation node inside an existing element (overflow
    /// badges anchor inside the element they flag).
    pub fn append_to(&mut self, parent: NodeId, node: NodeId) {
        self.dom.append_child(parent, node);
    }

    /// Merge one inline style declaration onto an element.
    pub fn set_inline_style(&mut self, node: NodeId, prop: &str, value: &str) {
        self.dom.style_set(node, prop, value);
    }

    /// Add a class token to an element (idempotent).
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        self.dom.add_class(node, class);
    }

    /// Detach every element matching `pred`, anywhere in the document.
    /// Returns how many were removed. This is the indiscriminate
    /// "remove all overlays" the visualizer performs on every hover edge.
    pub fn remove_elements_where(&mut self, pred: impl Fn(&ElementData) -> bool) -> usize {
        let doomed: Vec<NodeId> = self
            .dom
            .iter_all()
            .into_iter()
            .filter(|&node| self.dom.as_element(node).is_some_and(&pred))
            .collect();
        for node in &doomed {
            self.dom.detach(*node);
        }
        doomed.len()
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// Attach a listener: `layer` will be offered every event of `kind`.
    /// The returned binding is the only way to detach it short of dropping
    /// the whole surface.
    pub fn add_listener(&mut self, kind: EventKind, layer: LayerKind) -> ListenerBinding {
        self.listeners.add(kind, layer)
    }

    /// Detach one listener.
    pub fn dispose(&mut self, binding: ListenerBinding) {
        self.listeners.remove(&binding);
    }

    /// Layers subscribed to events of this event's kind, in attach order.
    #[must_use]
    pub fn layers_for(&self, event: &SurfaceEvent) -> Vec<LayerKind> {
        self.listeners.layers_for(event.kind())
    }

    /// Number of attached listeners (rebuild paths assert this is zero
    /// after disposing).
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
