//! Integration tests for the box-model visualizer.
//!
//! Geometry comes from a scripted `SnapshotLayout`: a probe parse of the
//! injected document yields the node indices (deterministic for identical
//! input), then the surface under test is built with the scripted snapshot.

use std::rc::Rc;

use boxlens_common::Rect;
use boxlens_debug::{AnnotationConfig, BoxModelVisualizer, inject};
use boxlens_dom::NodeId;
use boxlens_surface::{LayoutSnapshot, NodeLayout, RenderSurface, Size, SnapshotLayout};

const VIEWPORT: Size = Size::new(800.0, 600.0);

const BUTTON_MARKUP: &str =
    "<button class=\"cta\" style=\"margin:4px;border:2px solid;padding:6px\">Go</button>";

/// The scripted border box of the fixture button.
const BUTTON_RECT: Rect = Rect {
    x: 100.0,
    y: 80.0,
    width: 120.0,
    height: 40.0,
};

fn find_tag(surface: &RenderSurface, tag: &str) -> NodeId {
    surface
        .dom()
        .iter_all()
        .into_iter()
        .find(|&node| surface.dom().as_element(node).is_some_and(|e| e.tag_name == tag))
        .expect("tag present in fixture")
}

/// Find the first `tag` element *under the content container* — document
/// order over the whole tree would resolve `"div"` to the container itself,
/// which the visualizer deliberately ignores.
fn find_content_tag(surface: &RenderSurface, tag: &str) -> NodeId {
    surface
        .content_elements()
        .into_iter()
        .find(|&node| surface.dom().as_element(node).is_some_and(|e| e.tag_name == tag))
        .expect("tag present in content")
}

fn elements_with_class(surface: &RenderSurface, class: &str) -> Vec<NodeId> {
    surface
        .dom()
        .iter_all()
        .into_iter()
        .filter(|&node| {
            surface
                .dom()
                .as_element(node)
                .is_some_and(|e| e.has_class(class))
        })
        .collect()
}

/// Build the hover fixture: one button with uniform margin 4 / border 2 /
/// padding 6, at a known position.
fn button_surface() -> (RenderSurface, NodeId) {
    let config = AnnotationConfig {
        show_box_model: true,
        ..AnnotationConfig::default()
    };
    let html = inject(BUTTON_MARKUP, &config).html;

    let probe = RenderSurface::new(&html, Rc::new(SnapshotLayout::default()), VIEWPORT);
    let button = find_tag(&probe, "button");

    let mut layout = NodeLayout {
        border_box: BUTTON_RECT,
        ..NodeLayout::default()
    };
    for edge in ["top", "right", "bottom", "left"] {
        layout = layout
            .with_computed(&format!("margin-{edge}"), "4px")
            .with_computed(&format!("border-{edge}-width"), "2px")
            .with_computed(&format!("padding-{edge}"), "6px");
    }

    let mut snapshot = LayoutSnapshot::new();
    snapshot.insert(button, layout);

    let surface = RenderSurface::new(&html, Rc::new(SnapshotLayout::new(snapshot)), VIEWPORT);
    (surface, button)
}

fn inline_px(surface: &RenderSurface, node: NodeId, prop: &str) -> String {
    surface
        .dom()
        .style_get(node, prop)
        .unwrap_or_else(|| panic!("{prop} set on overlay"))
}

#[test]
fn hover_draws_four_nested_boxes_at_derived_positions() {
    let (mut surface, button) = button_surface();
    BoxModelVisualizer::new().hover_enter(&mut surface, button);

    // margin box: border box expanded by 4 on each side
    let margin = elements_with_class(&surface, "debug-margin");
    assert_eq!(margin.len(), 1);
    assert_eq!(inline_px(&surface, margin[0], "left"), "96px");
    assert_eq!(inline_px(&surface, margin[0], "top"), "76px");
    assert_eq!(inline_px(&surface, margin[0], "width"), "128px");
    assert_eq!(inline_px(&surface, margin[0], "height"), "48px");

    // border box: the bounding rect itself
    let border = elements_with_class(&surface, "debug-border");
    assert_eq!(inline_px(&surface, border[0], "left"), "100px");
    assert_eq!(inline_px(&surface, border[0], "width"), "120px");

    // padding box: shrunk by the 2px border
    let padding = elements_with_class(&surface, "debug-padding");
    assert_eq!(inline_px(&surface, padding[0], "left"), "102px");
    assert_eq!(inline_px(&surface, padding[0], "top"), "82px");
    assert_eq!(inline_px(&surface, padding[0], "width"), "116px");

    // content box: shrunk further by the 6px padding
    let content = elements_with_class(&surface, "debug-content");
    assert_eq!(inline_px(&surface, content[0], "left"), "108px");
    assert_eq!(inline_px(&surface, content[0], "top"), "88px");
    assert_eq!(inline_px(&surface, content[0], "width"), "104px");
    assert_eq!(inline_px(&surface, content[0], "height"), "24px");

    assert_eq!(elements_with_class(&surface, "debug-box").len(), 4);
}

#[test]
fn hover_labels_carry_metric_text_and_identity() {
    let (mut surface, button) = button_surface();
    BoxModelVisualizer::new().hover_enter(&mut surface, button);

    let labels = elements_with_class(&surface, "debug-label");
    let texts: Vec<String> = labels
        .iter()
        .map(|&l| surface.dom().text_content(l))
        .collect();

    assert!(texts.contains(&"margin: 4px 4px 4px 4px".to_string()));
    assert!(texts.contains(&"border: 2px 2px 2px 2px".to_string()));
    assert!(texts.contains(&"padding: 6px 6px 6px 6px".to_string()));
    assert!(texts.contains(&"button.cta".to_string()));
    assert_eq!(labels.len(), 4);
}

#[test]
fn hover_labels_sit_at_source_coordinates() {
    let (mut surface, button) = button_surface();
    BoxModelVisualizer::new().hover_enter(&mut surface, button);

    let labels = elements_with_class(&surface, "debug-label");
    let position_of = |text: &str| -> (String, String) {
        let node = labels
            .iter()
            .copied()
            .find(|&l| surface.dom().text_content(l) == text)
            .expect("label present");
        (
            inline_px(&surface, node, "left"),
            inline_px(&surface, node, "top"),
        )
    };

    // Metric labels anchor on the horizontal center (160), shifted -50;
    // margin rises 20px above the margin edge, border sits 5px above the
    // rect, padding hangs 10px below it.
    assert_eq!(position_of("margin: 4px 4px 4px 4px"), ("110px".into(), "56px".into()));
    assert_eq!(position_of("border: 2px 2px 2px 2px"), ("110px".into(), "75px".into()));
    assert_eq!(position_of("padding: 6px 6px 6px 6px"), ("110px".into(), "130px".into()));
    // The identity label anchors on the left edge, 25px up.
    assert_eq!(position_of("button.cta"), ("50px".into(), "55px".into()));
}

#[test]
fn hover_leave_removes_every_overlay() {
    let (mut surface, button) = button_surface();
    let visualizer = BoxModelVisualizer::new();

    visualizer.hover_enter(&mut surface, button);
    assert!(!elements_with_class(&surface, "debug-box").is_empty());

    visualizer.hover_leave(&mut surface);
    assert!(elements_with_class(&surface, "debug-box").is_empty());
    assert!(elements_with_class(&surface, "debug-label").is_empty());

    // Idempotent when nothing is drawn.
    visualizer.hover_leave(&mut surface);
    assert!(elements_with_class(&surface, "debug-box").is_empty());
}

#[test]
fn second_hover_replaces_the_first_overlay_set() {
    let config = AnnotationConfig {
        show_box_model: true,
        ..AnnotationConfig::default()
    };
    let html = inject("<div>a</div><p>b</p>", &config).html;
    let mut surface = RenderSurface::new(&html, Rc::new(SnapshotLayout::default()), VIEWPORT);
    let div = find_content_tag(&surface, "div");
    let p = find_content_tag(&surface, "p");
    let visualizer = BoxModelVisualizer::new();

    visualizer.hover_enter(&mut surface, div);
    assert_eq!(elements_with_class(&surface, "debug-box").len(), 4);

    visualizer.hover_enter(&mut surface, p);

    // One overlay set at a time, regardless of hover churn.
    assert_eq!(elements_with_class(&surface, "debug-box").len(), 4);
    let labels = elements_with_class(&surface, "debug-label");
    assert_eq!(labels.len(), 4);
    let texts: Vec<String> = labels
        .iter()
        .map(|&l| surface.dom().text_content(l))
        .collect();
    assert!(texts.contains(&"p".to_string()));
    assert!(!texts.contains(&"div".to_string()));
}

#[test]
fn hovering_the_content_container_itself_draws_nothing() {
    let config = AnnotationConfig {
        show_box_model: true,
        ..AnnotationConfig::default()
    };
    let html = inject("<div>a</div>", &config).html;
    let mut surface = RenderSurface::new(&html, Rc::new(SnapshotLayout::default()), VIEWPORT);
    // The first div in document order is the injected container, not markup.
    let container = find_tag(&surface, "div");
    assert_eq!(Some(container), surface.content_root());

    BoxModelVisualizer::new().hover_enter(&mut surface, container);
    assert!(elements_with_class(&surface, "debug-box").is_empty());
}

#[test]
fn elements_outside_the_content_container_are_ignored() {
    let (mut surface, _) = button_surface();
    // The injected <style> block lives in <head>, outside #content.
    let style = find_tag(&surface, "style");

    BoxModelVisualizer::new().hover_enter(&mut surface, style);
    assert!(elements_with_class(&surface, "debug-box").is_empty());
}

#[test]
fn unreported_metrics_label_as_zero() {
    let config = AnnotationConfig {
        show_box_model: true,
        ..AnnotationConfig::default()
    };
    let html = inject("<span>bare</span>", &config).html;
    let mut surface = RenderSurface::new(&html, Rc::new(SnapshotLayout::default()), VIEWPORT);
    let span = find_tag(&surface, "span");

    BoxModelVisualizer::new().hover_enter(&mut surface, span);

    let labels = elements_with_class(&surface, "debug-label");
    let texts: Vec<String> = labels
        .iter()
        .map(|&l| surface.dom().text_content(l))
        .collect();
    assert!(texts.contains(&"margin: 0px 0px 0px 0px".to_string()));
}

#[test]
fn hover_churn_preserves_overflow_badges() {
    let (mut surface, button) = button_surface();

    // Persistent badge nodes, as the overflow layer leaves them.
    let badge = surface.create_annotation("debug-label overflow-indicator", Some("OVERFLOW"));
    surface.append_to(button, badge);
    let details =
        surface.create_annotation("debug-label overflow-details", Some("content: 10\u{d7}10, container: 5\u{d7}5"));
    surface.append_to(button, details);

    let visualizer = BoxModelVisualizer::new();
    visualizer.hover_enter(&mut surface, button);
    visualizer.hover_leave(&mut surface);

    assert_eq!(elements_with_class(&surface, "overflow-indicator").len(), 1);
    assert_eq!(elements_with_class(&surface, "overflow-details").len(), 1);
    assert!(elements_with_class(&surface, "debug-box").is_empty());
}
