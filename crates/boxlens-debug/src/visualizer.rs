//! The box-model visualizer.
//!
//! Hover-driven: entering any element under the content container draws
//! four nested translucent rectangles (margin, border, padding, content)
//! plus metric labels; leaving removes them. Geometry is recomputed from
//! live layout on every hover — never cached — because layout can change
//! between renders (scroll, dynamic content).
//!
//! At most one overlay set exists at any time: both hover edges clear
//! every overlay node indiscriminately rather than tracking them
//! per-element. That is intentional; a single pointer can only hover one
//! element.

use boxlens_common::{BoxGeometry, EdgeSizes, Rect, parse_px};
use boxlens_dom::{ElementData, NodeId};
use boxlens_surface::{EventKind, LayerKind, ListenerBinding, RenderSurface};

/// Hover-driven box-model overlay renderer.
///
/// Stateless by design: everything it draws is re-derived from the surface
/// on each hover, and everything it drew is discoverable (and removable)
/// by class name.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoxModelVisualizer;

/// Vertical offset of the margin label above the margin box edge.
const MARGIN_LABEL_RISE: f32 = 20.0;
/// Vertical offset of the tag-identity label above the element.
const TAG_LABEL_RISE: f32 = 25.0;
/// Labels are shifted left so their midpoint roughly sits on the anchor.
const LABEL_CENTER_SHIFT: f32 = 50.0;

impl BoxModelVisualizer {
    /// Create a visualizer.
    #[must_use]
    pub fn new() -> Self {
        BoxModelVisualizer
    }

    /// Attach hover listeners to the surface. The returned bindings must be
    /// disposed before the surface is replaced.
    pub fn attach(surface: &mut RenderSurface) -> Vec<ListenerBinding> {
        vec![
            surface.add_listener(EventKind::HoverEnter, LayerKind::BoxModel),
            surface.add_listener(EventKind::HoverLeave, LayerKind::BoxModel),
        ]
    }

    /// Handle the pointer entering `element`: clear any prior overlay, then
    /// draw this element's boxes and labels. Elements outside the content
    /// container are ignored.
    #[allow(clippy::cast_precision_loss)]
    pub fn hover_enter(&self, surface: &mut RenderSurface, element: NodeId) {
        let Some(content) = surface.content_root() else {
            return;
        };
        if !surface.dom().is_descendant_of(element, content) {
            return;
        }

        clear_overlays(surface);

        let rect = surface.bounding_client_rect(element);
        let margin = read_edges(surface, element, ["margin-top", "margin-right", "margin-bottom", "margin-left"]);
        let border = read_edges(
            surface,
            element,
            [
                "border-top-width",
                "border-right-width",
                "border-bottom-width",
                "border-left-width",
            ],
        );
        let padding = read_edges(
            surface,
            element,
            ["padding-top", "padding-right", "padding-bottom", "padding-left"],
        );

        let geometry = BoxGeometry::from_border_box(rect, margin, border, padding);
        draw_box(surface, "margin", geometry.margin);
        draw_box(surface, "border", geometry.border);
        draw_box(surface, "padding", geometry.padding);
        draw_box(surface, "content", geometry.content);

        let center_x = rect.x + rect.width / 2.0;
        draw_label(
            surface,
            &format_edges("margin", margin),
            center_x,
            rect.y - margin.top as f32 - MARGIN_LABEL_RISE,
        );
        draw_label(surface, &format_edges("border", border), center_x, rect.y - 5.0);
        draw_label(
            surface,
            &format_edges("padding", padding),
            center_x,
            rect.y + rect.height + 10.0,
        );

        let identity = surface
            .dom()
            .as_element(element)
            .map_or_else(String::new, tag_identity);
        draw_label(surface, &identity, rect.x, rect.y - TAG_LABEL_RISE);
    }

    /// Handle the pointer leaving the hovered element: remove every overlay
    /// and label. Idempotent; the overlay only exists while the pointer is
    /// over some element.
    pub fn hover_leave(&self, surface: &mut RenderSurface) {
        clear_overlays(surface);
    }
}

/// Remove every overlay box and every label that is not an overflow badge.
/// Overflow indicators are persistent and survive hover churn.
fn clear_overlays(surface: &mut RenderSurface) {
    let _ = surface.remove_elements_where(|e| {
        e.has_class("debug-box")
            || (e.has_class("debug-label")
                && !e.has_class("overflow-indicator")
                && !e.has_class("overflow-details"))
    });
}

/// Read four computed edge metrics, coercing each through `parse_px`
/// (unparseable values read as zero, per the engine's error policy).
fn read_edges(surface: &RenderSurface, element: NodeId, props: [&str; 4]) -> EdgeSizes {
    EdgeSizes {
        top: parse_px(&surface.computed_value(element, props[0])),
        right: parse_px(&surface.computed_value(element, props[1])),
        bottom: parse_px(&surface.computed_value(element, props[2])),
        left: parse_px(&surface.computed_value(element, props[3])),
    }
}

/// `margin: 4px 4px 4px 4px` style label text, top/right/bottom/left order.
fn format_edges(name: &str, edges: EdgeSizes) -> String {
    format!(
        "{name}: {}px {}px {}px {}px",
        edges.top, edges.right, edges.bottom, edges.left
    )
}

/// `tagname.class1.class2` identity of an element.
fn tag_identity(element: &ElementData) -> String {
    let mut identity = element.tag_name.clone();
    for class in element.classes() {
        identity.push('.');
        identity.push_str(class);
    }
    identity
}

/// Append one absolutely positioned, pointer-transparent overlay rectangle
/// to the document body.
fn draw_box(surface: &mut RenderSurface, kind: &str, rect: Rect) {
    let node = surface.create_annotation(&format!("debug-box debug-{kind}"), None);
    surface.set_inline_style(node, "left", &format!("{}px", rect.x));
    surface.set_inline_style(node, "top", &format!("{}px", rect.y));
    surface.set_inline_style(node, "width", &format!("{}px", rect.width));
    surface.set_inline_style(node, "height", &format!("{}px", rect.height));
    surface.append_to_body(node);
}

/// Append one floating text label near page position (`x`, `y`).
fn draw_label(surface: &mut RenderSurface, text: &str, x: f32, y: f32) {
    let node = surface.create_annotation("debug-label", Some(text));
    surface.set_inline_style(node, "left", &format!("{}px", x - LABEL_CENTER_SHIFT));
    surface.set_inline_style(node, "top", &format!("{y}px"));
    surface.append_to_body(node);
}
