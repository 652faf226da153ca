//! Surface events and disposer-based listener registration.
//!
//! Attaching a listener returns a [`ListenerBinding`] disposer, and the
//! surface-replacement path must dispose every outstanding binding before
//! the next surface is constructed — a stale listener firing against a
//! torn-down surface is the failure mode this design guards against.

use boxlens_dom::NodeId;

use crate::layout::Size;

/// Events delivered to the surface by its host embedding.
///
/// Single-threaded, no queuing: each event is handled to completion before
/// the next is processed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// The installed document finished loading
    /// ([§ 4.2.3 readiness](https://html.spec.whatwg.org/multipage/dom.html#current-document-readiness)
    /// reached "interactive" or "complete").
    Loaded,
    /// The pointer entered an element.
    HoverEnter(NodeId),
    /// The pointer left the hovered element.
    HoverLeave,
    /// The surface viewport changed size.
    Resized(Size),
}

impl SurfaceEvent {
    /// The kind bucket this event dispatches under.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            SurfaceEvent::Loaded => EventKind::Load,
            SurfaceEvent::HoverEnter(_) => EventKind::HoverEnter,
            SurfaceEvent::HoverLeave => EventKind::HoverLeave,
            SurfaceEvent::Resized(_) => EventKind::Resize,
        }
    }
}

/// Listener registration buckets, one per event variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Document load completion.
    Load,
    /// Pointer entering an element.
    HoverEnter,
    /// Pointer leaving an element.
    HoverLeave,
    /// Viewport resize.
    Resize,
}

/// The annotation layers that can subscribe to surface events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// The box-model hover visualizer.
    BoxModel,
    /// The overflow detector.
    Overflow,
}

/// Unique identity of one listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingId(pub(crate) u64);

/// Disposer for one attached listener.
///
/// Returned by [`RenderSurface::add_listener`](crate::RenderSurface::add_listener);
/// pass it back to [`RenderSurface::dispose`](crate::RenderSurface::dispose)
/// to detach. Deliberately not `Drop`-based: disposal needs `&mut` access
/// to the surface, and the rebuild path wants to dispose explicitly and
/// observably.
#[derive(Debug)]
#[must_use = "an undisposed listener keeps firing until the surface is torn down"]
pub struct ListenerBinding {
    pub(crate) id: BindingId,
    pub(crate) kind: EventKind,
    pub(crate) layer: LayerKind,
}

impl ListenerBinding {
    /// Which event bucket this binding listens on.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// Which layer receives the events.
    #[must_use]
    pub const fn layer(&self) -> LayerKind {
        self.layer
    }
}

/// The listener table held by a surface.
#[derive(Debug, Default)]
pub(crate) struct ListenerRegistry {
    rows: Vec<(BindingId, EventKind, LayerKind)>,
    next_id: u64,
}

impl ListenerRegistry {
    pub(crate) fn add(&mut self, kind: EventKind, layer: LayerKind) -> ListenerBinding {
        let id = BindingId(self.next_id);
        self.next_id += 1;
        self.rows.push((id, kind, layer));
        ListenerBinding { id, kind, layer }
    }

    pub(crate) fn remove(&mut self, binding: &ListenerBinding) {
        self.rows.retain(|(id, _, _)| *id != binding.id);
    }

    pub(crate) fn layers_for(&self, kind: EventKind) -> Vec<LayerKind> {
        self.rows
            .iter()
            .filter(|(_, row_kind, _)| *row_kind == kind)
            .map(|&(_, _, layer)| layer)
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }
}
