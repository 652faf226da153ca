//! Isolated render surface for the boxlens debug-annotation engine.
//!
//! # Scope
//!
//! This crate provides:
//! - **Layout Handoff** - the [`HostLayout`] seam through which the host
//!   rendering engine reports box geometry and scroll metrics
//! - **Render Surface** - [`RenderSurface`], the handle every annotation
//!   layer reads and writes through (never ambient globals, so multiple
//!   independent previews can coexist)
//! - **Events** - hover/resize/load dispatch with disposer-based listener
//!   registration
//!
//! # Not in this crate
//!
//! Layout computation itself. The surface only *reads* the host engine's
//! layout results; it never lays anything out (see [`HostLayout`]).

pub mod events;
pub mod layout;
pub mod surface;

pub use events::{EventKind, LayerKind, ListenerBinding, SurfaceEvent};
pub use layout::{
    HostLayout, LayoutSnapshot, NodeLayout, ScrollMetrics, Size, SnapshotError, SnapshotLayout,
};
pub use surface::{CONTENT_CONTAINER_ID, RenderSurface};
