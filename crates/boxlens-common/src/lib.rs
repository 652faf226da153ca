//! Common utilities for the boxlens debug-annotation engine.
//!
//! This crate provides shared infrastructure used by all components:
//! - **Warning System** - colored terminal output for parse/annotation issues
//! - **Geometry** - box-model rectangles and edge sizes
//! - **Pixel Parsing** - lenient `parseInt`-style length parsing

pub mod geometry;
pub mod px;
pub mod warning;

pub use geometry::{BoxGeometry, EdgeSizes, Rect};
pub use px::parse_px;
