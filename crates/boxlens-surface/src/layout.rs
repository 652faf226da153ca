//! Layout handoff from the host rendering engine.
//!
//! The annotation engine never computes layout. Whatever engine actually
//! renders the preview owns geometry; it reports its results per element —
//! border box, scroll/client extents, resolved style strings — and the
//! surface only reads them. [`HostLayout`] is that seam, and
//! [`LayoutSnapshot`] is the interchange type (serde-serializable so an
//! out-of-process host can hand its layout over as JSON).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use boxlens_common::Rect;
use boxlens_dom::{DomTree, NodeId};

/// Viewport dimensions of the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Viewport width in CSS pixels.
    pub width: f32,
    /// Viewport height in CSS pixels.
    pub height: f32,
}

impl Size {
    /// Convenience constructor.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }
}

/// The four scroll/client extents of one element.
///
/// [CSSOM View § 7.1 Extensions to the Element Interface](https://drafts.csswg.org/cssom-view/#extension-to-the-element-interface)
///
/// - "The scrollWidth attribute must return the width of the element's
///   scrolling area" — the full content extent.
/// - "The clientWidth attribute must return the width of the padding edge"
///   — the visible extent.
///
/// An element overflows when either content extent exceeds the
/// corresponding client extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    /// Full content width (`scrollWidth`).
    pub scroll_width: i32,
    /// Full content height (`scrollHeight`).
    pub scroll_height: i32,
    /// Visible width (`clientWidth`).
    pub client_width: i32,
    /// Visible height (`clientHeight`).
    pub client_height: i32,
}

impl ScrollMetrics {
    /// True when content exceeds the visible area in either axis.
    #[must_use]
    pub const fn overflows(&self) -> bool {
        self.scroll_width > self.client_width || self.scroll_height > self.client_height
    }
}

/// One element's layout result, as reported by the host engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeLayout {
    /// [CSSOM View § 7.1](https://drafts.csswg.org/cssom-view/#dom-element-getboundingclientrect)
    /// The element's border box in page coordinates
    /// (`getBoundingClientRect()`).
    pub border_box: Rect,
    /// Scroll/client extents for overflow classification.
    #[serde(default)]
    pub scroll: ScrollMetrics,
    /// [CSSOM § 6.6.1](https://drafts.csswg.org/cssom/#dom-window-getcomputedstyle)
    /// Resolved style strings keyed by property name (`"margin-top"` →
    /// `"4px"`). Absent properties read as the empty string, which the
    /// metric parser coerces to zero.
    #[serde(default)]
    pub computed: BTreeMap<String, String>,
}

impl NodeLayout {
    /// Insert one resolved style value, builder-style.
    #[must_use]
    pub fn with_computed(mut self, prop: &str, value: &str) -> Self {
        let _ = self.computed.insert(prop.to_string(), value.to_string());
        self
    }
}

/// Per-element layout results for one laid-out document.
///
/// Keys are raw [`NodeId`] indices into the DOM tree the host laid out,
/// so a snapshot is only meaningful against the tree it was produced for
/// (both sides parse the same injected document). Elements missing from
/// the snapshot read as all-zero geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Layout entries by node index.
    pub entries: BTreeMap<usize, NodeLayout>,
}

/// Failure to load a snapshot handed over by the host.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The JSON payload did not match the snapshot schema.
    #[error("invalid layout snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

impl LayoutSnapshot {
    /// Empty snapshot (every element reads as zero geometry).
    #[must_use]
    pub fn new() -> Self {
        LayoutSnapshot::default()
    }

    /// Record one element's layout.
    pub fn insert(&mut self, node: NodeId, layout: NodeLayout) {
        let _ = self.entries.insert(node.0, layout);
    }

    /// Look up one element's layout.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&NodeLayout> {
        self.entries.get(&node.0)
    }

    /// Parse a snapshot from the host's JSON handoff.
    ///
    /// # Errors
    /// Returns [`SnapshotError::Json`] when the payload does not parse.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize for handoff or dumping.
    ///
    /// # Errors
    /// Returns [`SnapshotError::Json`] when serialization fails (it does
    /// not, for well-formed snapshots).
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The host engine's layout computation, seen from the surface.
///
/// Implementations belong to whatever actually renders the preview. The
/// surface calls this once when a document is installed and again on every
/// viewport resize; it treats the result as opaque truth.
pub trait HostLayout {
    /// Lay out `dom` for `viewport` and report per-element results.
    fn layout(&self, dom: &DomTree, viewport: Size) -> LayoutSnapshot;
}

/// A [`HostLayout`] backed by a precomputed snapshot.
///
/// For hosts that run layout elsewhere (or ahead of time) and hand the
/// results over wholesale — and for tests, which script geometry directly.
/// Returns the same snapshot for every viewport; a live host would
/// recompute instead.
#[derive(Debug, Clone, Default)]
pub struct SnapshotLayout {
    snapshot: LayoutSnapshot,
}

impl SnapshotLayout {
    /// Wrap a precomputed snapshot.
    #[must_use]
    pub fn new(snapshot: LayoutSnapshot) -> Self {
        SnapshotLayout { snapshot }
    }
}

impl HostLayout for SnapshotLayout {
    fn layout(&self, _dom: &DomTree, _viewport: Size) -> LayoutSnapshot {
        self.snapshot.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut snapshot = LayoutSnapshot::new();
        snapshot.insert(
            NodeId(3),
            NodeLayout {
                border_box: Rect {
                    x: 10.0,
                    y: 20.0,
                    width: 200.0,
                    height: 50.0,
                },
                scroll: ScrollMetrics {
                    scroll_width: 200,
                    scroll_height: 50,
                    client_width: 50,
                    client_height: 50,
                },
                ..NodeLayout::default()
            }
            .with_computed("margin-top", "4px"),
        );

        let json = snapshot.to_json().unwrap();
        let reparsed = LayoutSnapshot::from_json(&json).unwrap();
        assert_eq!(reparsed, snapshot);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(LayoutSnapshot::from_json("{not json").is_err());
    }

    #[test]
    fn overflow_predicate() {
        let wide = ScrollMetrics {
            scroll_width: 200,
            scroll_height: 40,
            client_width: 50,
            client_height: 40,
        };
        assert!(wide.overflows());

        let fits = ScrollMetrics {
            scroll_width: 50,
            scroll_height: 40,
            client_width: 50,
            client_height: 40,
        };
        assert!(!fits.overflows());
    }
}
