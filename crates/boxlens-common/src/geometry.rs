//! CSS box-model geometry.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)

use serde::{Deserialize, Serialize};

/// A rectangle positioned in 2D page coordinates.
///
/// Matches the shape of a [§ 9 DOMRect](https://drafts.fxtf.org/geometry/#DOMRect)
/// as returned by `getBoundingClientRect()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f32,
    /// Vertical position of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// True when `other` lies entirely inside (or on the edge of) `self`.
    #[must_use]
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }
}

/// Edge sizes for padding, border, or margin, in integer CSS pixels.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// Integer because each edge is read through a `parseInt`-style conversion
/// of the computed style value (fractional remainder truncated).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSizes {
    /// Top edge size.
    pub top: i32,
    /// Right edge size.
    pub right: i32,
    /// Bottom edge size.
    pub bottom: i32,
    /// Left edge size.
    pub left: i32,
}

impl EdgeSizes {
    /// Uniform edges, handy in tests and fixtures.
    #[must_use]
    pub const fn uniform(size: i32) -> Self {
        EdgeSizes {
            top: size,
            right: size,
            bottom: size,
            left: size,
        }
    }

    /// Left + right, as a float for rect arithmetic.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn horizontal(&self) -> f32 {
        (self.left + self.right) as f32
    }

    /// Top + bottom, as a float for rect arithmetic.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn vertical(&self) -> f32 {
        (self.top + self.bottom) as f32
    }
}

/// [§ 3. The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// "Each box has a content area and optional surrounding padding, border,
/// and margin areas."
///
/// The four nested rectangles drawn by the box-model visualizer, derived
/// from one element's border-box rect plus its computed edge metrics:
///
/// ```text
/// ┌───────────────────────────────┐  margin box
/// │  ┌─────────────────────────┐  │  border box (= bounding rect)
/// │  │  ┌───────────────────┐  │  │  padding box
/// │  │  │  ┌─────────────┐  │  │  │  content box
/// │  │  │  │   CONTENT   │  │  │  │
/// │  │  │  └─────────────┘  │  │  │
/// │  │  └───────────────────┘  │  │
/// │  └─────────────────────────┘  │
/// └───────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxGeometry {
    /// [§ 3.1 Margins](https://www.w3.org/TR/css-box-3/#margins)
    /// "The margin box is the outermost box, and contains all four areas."
    pub margin: Rect,
    /// [§ 3.3 Borders](https://www.w3.org/TR/css-box-3/#borders)
    /// "The border box contains content, padding, and border areas."
    pub border: Rect,
    /// [§ 3.2 Padding](https://www.w3.org/TR/css-box-3/#paddings)
    /// "The padding box contains both the content and padding areas."
    pub padding: Rect,
    /// "The content box contains the actual content of the element."
    pub content: Rect,
}

impl BoxGeometry {
    /// Derive all four boxes from a border-box rect (the element's bounding
    /// rectangle) and the computed margin/border/padding edge metrics.
    ///
    /// # Formulas
    ///
    /// ```text
    /// margin box  = border box expanded outward by margin on each side
    /// border box  = the bounding rect, unmodified
    /// padding box = border box shrunk inward by border widths
    /// content box = padding box shrunk inward by padding widths
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_border_box(
        rect: Rect,
        margin: EdgeSizes,
        border: EdgeSizes,
        padding: EdgeSizes,
    ) -> Self {
        let margin_box = Rect {
            x: rect.x - margin.left as f32,
            y: rect.y - margin.top as f32,
            width: rect.width + margin.horizontal(),
            height: rect.height + margin.vertical(),
        };

        let padding_box = Rect {
            x: rect.x + border.left as f32,
            y: rect.y + border.top as f32,
            width: rect.width - border.horizontal(),
            height: rect.height - border.vertical(),
        };

        let content_box = Rect {
            x: padding_box.x + padding.left as f32,
            y: padding_box.y + padding.top as f32,
            width: padding_box.width - padding.horizontal(),
            height: padding_box.height - padding.vertical(),
        };

        BoxGeometry {
            margin: margin_box,
            border: rect,
            padding: padding_box,
            content: content_box,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nesting_invariant_holds() {
        let rect = Rect {
            x: 100.0,
            y: 50.0,
            width: 200.0,
            height: 80.0,
        };
        let geometry = BoxGeometry::from_border_box(
            rect,
            EdgeSizes::uniform(4),
            EdgeSizes::uniform(2),
            EdgeSizes::uniform(6),
        );

        assert!(geometry.margin.contains(&geometry.border));
        assert!(geometry.border.contains(&geometry.padding));
        assert!(geometry.padding.contains(&geometry.content));
    }

    #[test]
    fn containment_gaps_equal_edge_metrics() {
        let rect = Rect {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 40.0,
        };
        let margin = EdgeSizes {
            top: 1,
            right: 2,
            bottom: 3,
            left: 4,
        };
        let border = EdgeSizes {
            top: 5,
            right: 6,
            bottom: 7,
            left: 8,
        };
        let padding = EdgeSizes {
            top: 9,
            right: 10,
            bottom: 11,
            left: 12,
        };
        let geometry = BoxGeometry::from_border_box(rect, margin, border, padding);

        // Margin box expands outward from the border box.
        assert_eq!(geometry.border.x - geometry.margin.x, 4.0);
        assert_eq!(geometry.border.y - geometry.margin.y, 1.0);
        assert_eq!(geometry.margin.width, 100.0 + 4.0 + 2.0);
        assert_eq!(geometry.margin.height, 40.0 + 1.0 + 3.0);

        // Padding box shrinks inward by border widths.
        assert_eq!(geometry.padding.x - geometry.border.x, 8.0);
        assert_eq!(geometry.padding.y - geometry.border.y, 5.0);
        assert_eq!(geometry.padding.width, 100.0 - 8.0 - 6.0);

        // Content box shrinks further by paddings.
        assert_eq!(geometry.content.x - geometry.padding.x, 12.0);
        assert_eq!(geometry.content.y - geometry.padding.y, 9.0);
        assert_eq!(geometry.content.width, 100.0 - 8.0 - 6.0 - 12.0 - 10.0);
        assert_eq!(geometry.content.height, 40.0 - 5.0 - 7.0 - 9.0 - 11.0);
    }

    #[test]
    fn zero_edges_collapse_to_the_bounding_rect() {
        let rect = Rect {
            x: 0.0,
            y: 0.0,
            width: 50.0,
            height: 50.0,
        };
        let geometry = BoxGeometry::from_border_box(
            rect,
            EdgeSizes::default(),
            EdgeSizes::default(),
            EdgeSizes::default(),
        );
        assert_eq!(geometry.margin, rect);
        assert_eq!(geometry.content, rect);
    }
}
