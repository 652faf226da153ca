//! The style/script injector.
//!
//! [`inject`] is a pure function of (markup, config): it produces the
//! complete standalone document the render surface installs. Identical
//! inputs always yield a byte-identical document, so a rebuild with
//! unchanged state replaces the surface with an equivalent one.
//!
//! The generated head references a CSS utility framework and script
//! runtime by CDN URL so user markup written against them previews
//! correctly; their unavailability is the host environment's concern and
//! degrades to unstyled (but still annotated) output.

use crate::config::AnnotationConfig;

/// Which native annotation layers the host must wire after the document
/// loads. Mirrors the two debug toggles; the "executable annotation logic"
/// of the generated document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerSet {
    /// Attach the box-model hover visualizer.
    pub box_model: bool,
    /// Attach the overflow detector.
    pub overflows: bool,
}

/// A complete document ready for surface installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableDocument {
    /// The full standalone HTML document.
    pub html: String,
    /// Annotation layers to activate once the document has loaded.
    pub layers: LayerSet,
}

/// Third-party utility resources referenced from the generated head.
const CDN_TAGS: &str = concat!(
    "    <link href=\"https://cdn.jsdelivr.net/npm/bootstrap@5.3.5/dist/css/bootstrap.min.css\" rel=\"stylesheet\" crossorigin=\"anonymous\">\n",
    "    <script src=\"https://cdn.jsdelivr.net/npm/bootstrap@5.3.5/dist/js/bootstrap.bundle.min.js\" crossorigin=\"anonymous\"></script>\n",
    "    <script src=\"https://code.jquery.com/jquery-3.7.1.min.js\" crossorigin=\"anonymous\"></script>\n",
);

/// Debug CSS shared by both layers: faint outlines on everything, a hard
/// outline on the hovered element, and the shadow ring for flagged
/// elements.
const DEBUG_BASE_CSS: &str = "\
      * {
        outline: 1px solid rgba(0,0,0,0.2) !important;
      }

      *:hover {
        outline: 1px solid #ff0000 !important;
      }

      .overflow-detected {
        box-shadow: 0 0 0 2px rgba(255, 0, 0, 0.3) !important;
        position: relative;
      }
";

/// Overlay-box and label classes, only needed when the box-model
/// visualizer is enabled.
const DEBUG_BOX_MODEL_CSS: &str = "\
      .debug-box {
        position: absolute;
        pointer-events: none;
        z-index: 9999;
      }
      .debug-margin { background: rgba(255, 0, 0, 0.1); }
      .debug-border { background: rgba(0, 0, 255, 0.1); }
      .debug-padding { background: rgba(0, 255, 0, 0.1); }
      .debug-content { background: rgba(128, 128, 128, 0.1); }
      .debug-label {
        position: absolute;
        font-size: 10px;
        background: #333;
        color: white;
        padding: 2px 4px;
        border-radius: 2px;
        white-space: nowrap;
        z-index: 10000;
      }
";

/// Produce the standalone preview document for `markup` under `config`.
///
/// The user's markup is wrapped verbatim — no validation, no
/// sanitization — in a container with the stable id `content`; the render
/// surface's own lenient parser is the error-tolerance layer. When both
/// debug toggles are off the output contains no debug fragment at all.
#[must_use]
pub fn inject(markup: &str, config: &AnnotationConfig) -> RenderableDocument {
    let mut debug_styles = String::new();
    if config.any_debug() {
        debug_styles.push_str("    <style>\n");
        debug_styles.push_str(DEBUG_BASE_CSS);
        if config.show_box_model {
            debug_styles.push('\n');
            debug_styles.push_str(DEBUG_BOX_MODEL_CSS);
        }
        debug_styles.push_str("    </style>\n");
    }

    let html_class = if config.dark_mode {
        " class=\"dark\""
    } else {
        ""
    };

    let html = format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\"{html_class}>\n\
         \x20\x20<head>\n\
         \x20\x20\x20\x20<meta charset=\"UTF-8\" />\n\
         \x20\x20\x20\x20<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n\
         {CDN_TAGS}\
         {debug_styles}\
         \x20\x20</head>\n\
         \x20\x20<body>\n\
         \x20\x20\x20\x20<div id=\"content\">{markup}</div>\n\
         \x20\x20</body>\n\
         </html>\n"
    );

    RenderableDocument {
        html,
        layers: LayerSet {
            box_model: config.show_box_model,
            overflows: config.show_overflows,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_config_emits_no_debug_fragments() {
        let config = AnnotationConfig::default();
        let doc = inject("<p>hello</p>", &config);
        assert!(!doc.html.contains("<style>"));
        assert!(!doc.html.contains("debug"));
        assert!(!doc.html.contains("outline"));
        assert_eq!(doc.layers, LayerSet::default());
    }

    #[test]
    fn markup_is_wrapped_verbatim_in_the_content_container() {
        let markup = "<div style=\"width:50px\"><p>unclosed";
        let doc = inject(markup, &AnnotationConfig::default());
        assert!(
            doc.html
                .contains("<div id=\"content\"><div style=\"width:50px\"><p>unclosed</div>")
        );
    }

    #[test]
    fn overflow_only_config_skips_box_model_classes() {
        let config = AnnotationConfig {
            show_overflows: true,
            ..AnnotationConfig::default()
        };
        let doc = inject("<p>x</p>", &config);
        assert!(doc.html.contains(".overflow-detected"));
        assert!(doc.html.contains("outline: 1px solid rgba(0,0,0,0.2)"));
        assert!(!doc.html.contains(".debug-box"));
        assert!(doc.layers.overflows);
        assert!(!doc.layers.box_model);
    }

    #[test]
    fn box_model_config_includes_overlay_classes() {
        let config = AnnotationConfig {
            show_box_model: true,
            ..AnnotationConfig::default()
        };
        let doc = inject("<p>x</p>", &config);
        assert!(doc.html.contains(".debug-margin"));
        assert!(doc.html.contains(".debug-label"));
    }

    #[test]
    fn injection_is_pure() {
        let config = AnnotationConfig {
            show_box_model: true,
            show_overflows: true,
            dark_mode: true,
        };
        let first = inject("<p>same</p>", &config);
        let second = inject("<p>same</p>", &config);
        assert_eq!(first, second);
    }

    #[test]
    fn dark_mode_sets_the_document_class() {
        let dark = AnnotationConfig {
            dark_mode: true,
            ..AnnotationConfig::default()
        };
        let doc = inject("<p>x</p>", &dark);
        assert!(doc.html.contains("<html lang=\"en\" class=\"dark\">"));

        let light = inject("<p>x</p>", &AnnotationConfig::default());
        assert!(light.html.contains("<html lang=\"en\">"));
    }

    #[test]
    fn cdn_resources_are_referenced_from_the_head() {
        let doc = inject("", &AnnotationConfig::default());
        assert!(doc.html.contains("bootstrap.min.css"));
        assert!(doc.html.contains("jquery-3.7.1.min.js"));
    }
}
