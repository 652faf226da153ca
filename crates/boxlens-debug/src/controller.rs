//! Render-surface lifecycle glue.
//!
//! Binds (markup, config) → [`inject`] → surface replacement, and
//! guarantees annotation layers attach only after the replaced document
//! has actually finished loading — document replacement is asynchronous
//! relative to layout completion, so attachment waits for the surface's
//! readiness signal, with a bounded fallback that force-attaches if the
//! signal is dropped.
//!
//! Teardown discipline: a rebuild unconditionally discards the prior
//! surface, disposing every outstanding listener binding and cancelling
//! the fallback deadline first, so no stale callback can fire against a
//! torn-down surface.

use std::rc::Rc;
use std::time::{Duration, Instant};

use boxlens_common::warning::clear_warnings;
use boxlens_dom::NodeId;
use boxlens_surface::{HostLayout, LayerKind, ListenerBinding, RenderSurface, Size, SurfaceEvent};

use crate::config::AnnotationConfig;
use crate::detector::OverflowDetector;
use crate::inject::{LayerSet, inject};
use crate::visualizer::BoxModelVisualizer;

/// How long to wait for the surface's load signal before force-attaching
/// the annotation layers.
pub const FALLBACK_DEADLINE: Duration = Duration::from_millis(100);

/// Owns the preview lifecycle for one host panel.
///
/// The host feeds it markup/config changes and surface events; everything
/// else — injection, surface replacement, listener wiring, readiness and
/// fallback handling — happens in here.
pub struct PreviewController {
    host: Rc<dyn HostLayout>,
    viewport: Size,
    markup: String,
    config: AnnotationConfig,
    surface: Option<RenderSurface>,
    pending_layers: LayerSet,
    bindings: Vec<ListenerBinding>,
    attached: bool,
    fallback_deadline: Option<Instant>,
    visualizer: BoxModelVisualizer,
    detector: OverflowDetector,
}

impl PreviewController {
    /// Create a controller with no document installed yet.
    #[must_use]
    pub fn new(host: Rc<dyn HostLayout>, viewport: Size) -> Self {
        PreviewController {
            host,
            viewport,
            markup: String::new(),
            config: AnnotationConfig::default(),
            surface: None,
            pending_layers: LayerSet::default(),
            bindings: Vec::new(),
            attached: false,
            fallback_deadline: None,
            visualizer: BoxModelVisualizer::new(),
            detector: OverflowDetector::new(),
        }
    }

    /// Replace the markup document. Always triggers a full rebuild.
    pub fn set_markup(&mut self, markup: impl Into<String>, now: Instant) {
        self.markup = markup.into();
        self.rebuild(now);
    }

    /// Replace the annotation config. Always triggers a full rebuild.
    pub fn set_config(&mut self, config: AnnotationConfig, now: Instant) {
        self.config = config;
        self.rebuild(now);
    }

    /// The live surface, if a document is installed.
    #[must_use]
    pub fn surface(&self) -> Option<&RenderSurface> {
        self.surface.as_ref()
    }

    /// Mutable access to the live surface (hosts drive extra scans or
    /// queries through this).
    pub fn surface_mut(&mut self) -> Option<&mut RenderSurface> {
        self.surface.as_mut()
    }

    /// Whether the annotation layers are attached to the current surface.
    #[must_use]
    pub fn annotations_attached(&self) -> bool {
        self.attached
    }

    /// Outstanding listener bindings on the current surface.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Tear down the previous surface (disposing all listeners and the
    /// fallback timer) and install a freshly injected document.
    fn rebuild(&mut self, now: Instant) {
        if let Some(surface) = self.surface.as_mut() {
            for binding in self.bindings.drain(..) {
                surface.dispose(binding);
            }
        } else {
            self.bindings.clear();
        }
        self.fallback_deadline = None;
        self.attached = false;
        clear_warnings();

        let document = inject(&self.markup, &self.config);
        self.pending_layers = document.layers;
        self.surface = Some(RenderSurface::new(
            &document.html,
            Rc::clone(&self.host),
            self.viewport,
        ));
        self.fallback_deadline = Some(now + FALLBACK_DEADLINE);
    }

    /// Deliver one surface event.
    ///
    /// `Loaded` attaches the annotation layers (once); a late `Loaded`
    /// after the fallback already attached them is ignored. Hover and
    /// resize events are routed to whichever layers hold listeners for
    /// them; with no surface installed, every event is a silent no-op.
    pub fn handle_event(&mut self, event: SurfaceEvent) {
        if self.surface.is_none() {
            return;
        }

        match event {
            SurfaceEvent::Loaded => {
                if !self.attached {
                    self.attach_annotations();
                }
            }
            SurfaceEvent::Resized(size) => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.resize(size);
                }
                self.viewport = size;
                self.dispatch(&event);
            }
            SurfaceEvent::HoverEnter(_) | SurfaceEvent::HoverLeave => {
                self.dispatch(&event);
            }
        }
    }

    /// Advance the fallback timer. When the load signal has not been seen
    /// by the deadline, the annotation layers are force-attached; calling
    /// again later is a no-op.
    pub fn tick(&mut self, now: Instant) {
        let Some(deadline) = self.fallback_deadline else {
            return;
        };
        if now >= deadline && !self.attached {
            self.attach_annotations();
        }
    }

    /// Wire the enabled layers to the surface and run their load work
    /// (initial overflow scan). Guarded: requires an installed surface,
    /// runs at most once per surface.
    fn attach_annotations(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            // Surface not ready; the fallback timer retries.
            return;
        };
        surface.mark_loaded();
        self.fallback_deadline = None;
        self.attached = true;

        if self.pending_layers.box_model {
            self.bindings.extend(BoxModelVisualizer::attach(surface));
        }
        if self.pending_layers.overflows {
            self.bindings.extend(OverflowDetector::attach(surface));
        }

        self.dispatch(&SurfaceEvent::Loaded);
    }

    /// Offer `event` to every layer holding a listener for its kind.
    fn dispatch(&mut self, event: &SurfaceEvent) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        for layer in surface.layers_for(event) {
            match (layer, event) {
                (LayerKind::BoxModel, SurfaceEvent::HoverEnter(node)) => {
                    self.visualizer.hover_enter(surface, *node);
                }
                (LayerKind::BoxModel, SurfaceEvent::HoverLeave) => {
                    self.visualizer.hover_leave(surface);
                }
                (LayerKind::Overflow, SurfaceEvent::Loaded | SurfaceEvent::Resized(_)) => {
                    let _ = self.detector.scan(surface);
                }
                _ => {}
            }
        }
    }

    /// Count elements currently carrying a class, for host-side status
    /// display ("3 overflows on this page").
    #[must_use]
    pub fn count_elements_with_class(&self, class: &str) -> usize {
        let Some(surface) = self.surface.as_ref() else {
            return 0;
        };
        surface
            .dom()
            .iter_all()
            .into_iter()
            .filter(|&node: &NodeId| {
                surface
                    .dom()
                    .as_element(node)
                    .is_some_and(|e| e.has_class(class))
            })
            .count()
    }
}
