//! The overflow detector.
//!
//! Scan-driven: on document load and on every viewport resize, every
//! element under the content container is tested against the CSSOM-View
//! overflow predicate (`scrollWidth > clientWidth || scrollHeight >
//! clientHeight`). Newly flagged elements get a shadow-ring class, an
//! `OVERFLOW` badge in their top-right corner, and a measurement label.
//!
//! # Known limitation
//!
//! Badges are additive within one surface lifetime: an element with a
//! badge anywhere in its subtree is skipped wholesale on later scans, so
//! its metric text is never refreshed and the badge outlives the condition
//! if the element later stops overflowing. Only a full surface rebuild
//! clears them. Callers that need fresh numbers re-run
//! [`OverflowDetector::scan`] and read the returned records, which are
//! recomputed on every scan regardless of badge state.

use serde::Serialize;

use boxlens_dom::NodeId;
use boxlens_surface::{EventKind, LayerKind, ListenerBinding, RenderSurface, ScrollMetrics};

/// Marker class on the badge element.
const INDICATOR_CLASS: &str = "overflow-indicator";
/// Marker class on the measurement label element.
const DETAILS_CLASS: &str = "overflow-details";
/// Shadow-ring class applied to the flagged element itself.
const DETECTED_CLASS: &str = "overflow-detected";

/// One overflowing element found by a scan.
///
/// Carries the raw metrics so hosts can report them (the CLI's overflow
/// report serializes these directly).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverflowRecord {
    /// Arena index of the overflowing element.
    pub node: usize,
    /// `tagname.class1.class2` identity for human-readable reports.
    pub identity: String,
    /// The four raw extents behind the classification.
    pub metrics: ScrollMetrics,
}

impl OverflowRecord {
    /// The measurement text rendered under the badge:
    /// `content: SWxSH, container: CWxCH`.
    #[must_use]
    pub fn details_text(&self) -> String {
        format!(
            "content: {}\u{d7}{}, container: {}\u{d7}{}",
            self.metrics.scroll_width,
            self.metrics.scroll_height,
            self.metrics.client_width,
            self.metrics.client_height
        )
    }
}

/// Load/resize-driven overflow scanner.
#[derive(Debug, Default, Clone, Copy)]
pub struct OverflowDetector;

impl OverflowDetector {
    /// Create a detector.
    #[must_use]
    pub fn new() -> Self {
        OverflowDetector
    }

    /// Attach load and resize listeners to the surface. The returned
    /// bindings must be disposed before the surface is replaced.
    pub fn attach(surface: &mut RenderSurface) -> Vec<ListenerBinding> {
        vec![
            surface.add_listener(EventKind::Load, LayerKind::Overflow),
            surface.add_listener(EventKind::Resize, LayerKind::Overflow),
        ]
    }

    /// Scan every element under the content container and badge the newly
    /// overflowing ones. Returns a record for *every* currently overflowing
    /// element, badged or not. An empty or missing container scans as
    /// nothing — a no-op, not an error.
    pub fn scan(&self, surface: &mut RenderSurface) -> Vec<OverflowRecord> {
        let mut records = Vec::new();

        for element in surface.content_elements() {
            let metrics = surface.scroll_metrics(element);
            if !metrics.overflows() {
                continue;
            }

            let record = OverflowRecord {
                node: element.0,
                identity: surface
                    .dom()
                    .as_element(element)
                    .map_or_else(String::new, |e| {
                        let mut id = e.tag_name.clone();
                        for class in e.classes() {
                            id.push('.');
                            id.push_str(class);
                        }
                        id
                    }),
                metrics,
            };
            let details_text = record.details_text();
            records.push(record);

            surface.add_class(element, DETECTED_CLASS);

            // Idempotence: an element already badged is skipped entirely.
            // Its metric text goes stale; see the module-level limitation.
            if has_badge(surface, element) {
                continue;
            }

            // Anchor absolutely-positioned badge children to the element.
            if surface.computed_value(element, "position") == "static" {
                surface.set_inline_style(element, "position", "relative");
            }

            let badge =
                surface.create_annotation(&format!("debug-label {INDICATOR_CLASS}"), Some("OVERFLOW"));
            surface.set_inline_style(badge, "position", "absolute");
            surface.set_inline_style(badge, "right", "0");
            surface.set_inline_style(badge, "top", "0");
            surface.set_inline_style(badge, "background-color", "rgba(255,0,0,0.7)");
            surface.set_inline_style(badge, "color", "white");
            surface.set_inline_style(badge, "font-size", "10px");
            surface.set_inline_style(badge, "padding", "2px 4px");
            surface.set_inline_style(badge, "z-index", "9999");
            surface.append_to(element, badge);

            let details = surface
                .create_annotation(&format!("debug-label {DETAILS_CLASS}"), Some(&details_text));
            surface.set_inline_style(details, "position", "absolute");
            surface.set_inline_style(details, "right", "0");
            surface.set_inline_style(details, "top", "18px");
            surface.set_inline_style(details, "background-color", "rgba(0,0,0,0.7)");
            surface.set_inline_style(details, "color", "white");
            surface.set_inline_style(details, "font-size", "10px");
            surface.set_inline_style(details, "padding", "2px 4px");
            surface.set_inline_style(details, "z-index", "9999");
            surface.append_to(element, details);
        }

        records
    }
}

/// True when `element` already carries an overflow badge anywhere in its
/// subtree. Descendant scope matters: a container whose badged child also
/// pushes the container itself into overflow must not gain a second badge.
fn has_badge(surface: &RenderSurface, element: NodeId) -> bool {
    surface
        .dom()
        .descendants(element)
        .into_iter()
        .any(|node| {
            surface
                .dom()
                .as_element(node)
                .is_some_and(|e| e.has_class(INDICATOR_CLASS))
        })
}
