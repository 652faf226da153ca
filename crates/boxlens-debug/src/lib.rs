//! Debug-annotation engine for live HTML/CSS previews.
//!
//! # Scope
//!
//! Given arbitrary markup rendered inside an isolated surface, this crate
//! computes and overlays:
//! - a **box-model breakdown** of the hovered element — four nested
//!   margin/border/padding/content rectangles plus metric labels
//! - persistent **overflow badges** on every element whose content extent
//!   exceeds its visible extent, with a measurement label
//!
//! Components:
//! - [`inject`] - pure generator of the standalone preview document
//! - [`BoxModelVisualizer`] - hover-driven overlay drawing
//! - [`OverflowDetector`] - load/resize-driven overflow scanning
//! - [`PreviewController`] - rebuild lifecycle, readiness signal, fallback
//!   timer
//!
//! # Not in this crate
//!
//! CSS parsing and layout. Geometry comes from the host engine through
//! [`boxlens_surface::HostLayout`]; the engine here only reads and
//! annotates it.

mod config;
mod controller;
mod detector;
mod inject;
mod visualizer;

pub use config::AnnotationConfig;
pub use controller::{FALLBACK_DEADLINE, PreviewController};
pub use detector::{OverflowDetector, OverflowRecord};
pub use inject::{LayerSet, RenderableDocument, inject};
pub use visualizer::BoxModelVisualizer;
