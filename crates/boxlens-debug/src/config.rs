//! Annotation configuration.

/// The host controller's three debug toggles.
///
/// An immutable snapshot passed into each injector invocation. Any change
/// to any field triggers a full surface rebuild — never a partial patch —
/// which is what keeps annotation state trivially consistent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationConfig {
    /// Draw the four-box margin/border/padding/content overlay on hover.
    pub show_box_model: bool,
    /// Badge every element whose content overflows its container.
    pub show_overflows: bool,
    /// Dark host theme; sets `class="dark"` on the generated document so
    /// user markup styled with dark-mode selectors responds to the toggle.
    pub dark_mode: bool,
}

impl AnnotationConfig {
    /// True when any debug layer is enabled. When false, the injector
    /// emits a completely clean document — zero debug overhead.
    #[must_use]
    pub const fn any_debug(&self) -> bool {
        self.show_box_model || self.show_overflows
    }
}
