//! Positioned text fragments and their typography.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::text::clean_text;

/// An axis-aligned box in page space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Top-left corner.
    pub fn top_left(&self) -> Point {
        Point::new(self.x0, self.y0)
    }

    fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }
}

/// A point in page space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A span of text with known font, size and position.
///
/// Fragments are produced once by a [`FragmentSource`](crate::extract::FragmentSource)
/// and only read afterwards. A document's fragments are kept in extraction
/// order (page-major), which is not necessarily positional order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Zero-based page index
    pub page: u32,
    /// Raw text, possibly with surrounding whitespace
    pub text: String,
    /// Font size in points (or pixel line height for OCR input)
    pub font_size: f32,
    /// Font family and style identifier (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Bounding box
    pub bbox: BoundingBox,
    /// Top-left anchor used for ordering
    pub origin: Point,
}

impl Fragment {
    /// Create a fragment anchored at the top-left corner of its box.
    pub fn new(
        page: u32,
        text: impl Into<String>,
        font_size: f32,
        font_name: impl Into<String>,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            page,
            text: text.into(),
            font_size,
            font_name: font_name.into(),
            origin: bbox.top_left(),
            bbox,
        }
    }

    /// Override the ordering anchor.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// The (size, font) pair used as a clustering key.
    pub fn signature(&self) -> TypographySignature {
        TypographySignature::new(self.font_size, self.font_name.clone())
    }

    /// Text with internal whitespace collapsed and ends trimmed.
    pub fn cleaned_text(&self) -> String {
        clean_text(&self.text)
    }

    /// Check that the fragment carries usable typography and geometry.
    ///
    /// Collaborators call this at the boundary; the analysis itself assumes
    /// well-formed fragments.
    pub fn validate(&self) -> Result<()> {
        let reason = if !self.font_size.is_finite() || self.font_size <= 0.0 {
            Some(format!("font size {} is not positive", self.font_size))
        } else if self.font_name.is_empty() {
            Some("missing font name".to_string())
        } else if !self.bbox.is_finite() {
            Some("bounding box is not finite".to_string())
        } else if !self.origin.x.is_finite() || !self.origin.y.is_finite() {
            Some("origin is not finite".to_string())
        } else {
            None
        };

        match reason {
            Some(reason) => Err(Error::MalformedFragment {
                page: self.page,
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// A (font size, font name) pair.
///
/// Equality and hashing are exact on both members. Use
/// [`matches`](Self::matches) for tolerant size comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypographySignature {
    pub font_size: f32,
    pub font_name: String,
}

impl TypographySignature {
    pub fn new(font_size: f32, font_name: impl Into<String>) -> Self {
        Self {
            font_size,
            font_name: font_name.into(),
        }
    }

    /// Exact font name and a size within `tolerance` (strictly less).
    pub fn matches(&self, fragment: &Fragment, tolerance: f32) -> bool {
        (fragment.font_size - self.font_size).abs() < tolerance && fragment.font_name == self.font_name
    }
}

impl PartialEq for TypographySignature {
    fn eq(&self, other: &Self) -> bool {
        self.font_size.to_bits() == other.font_size.to_bits() && self.font_name == other.font_name
    }
}

impl Eq for TypographySignature {}

impl Hash for TypographySignature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.font_size.to_bits().hash(state);
        self.font_name.hash(state);
    }
}

impl std::fmt::Display for TypographySignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}pt {}", self.font_size, self.font_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(size: f32, font: &str) -> Fragment {
        Fragment::new(1, " Heading  text ", size, font, BoundingBox::new(10.0, 20.0, 110.0, 34.0))
    }

    #[test]
    fn test_origin_defaults_to_top_left() {
        let f = fragment(12.0, "Helvetica");
        assert_eq!(f.origin, Point::new(10.0, 20.0));

        let f = f.with_origin(Point::new(0.0, 5.0));
        assert_eq!(f.origin, Point::new(0.0, 5.0));
    }

    #[test]
    fn test_cleaned_text() {
        assert_eq!(fragment(12.0, "Helvetica").cleaned_text(), "Heading text");
    }

    #[test]
    fn test_bbox_union() {
        let a = BoundingBox::new(10.0, 20.0, 50.0, 30.0);
        let b = BoundingBox::new(5.0, 25.0, 40.0, 60.0);
        assert_eq!(a.union(&b), BoundingBox::new(5.0, 20.0, 50.0, 60.0));
        assert_eq!(a.width(), 40.0);
        assert_eq!(b.height(), 35.0);
    }

    #[test]
    fn test_signature_matching() {
        let sig = TypographySignature::new(24.0, "Bold");
        assert!(sig.matches(&fragment(24.05, "Bold"), 0.1));
        assert!(!sig.matches(&fragment(24.2, "Bold"), 0.1));
        assert!(!sig.matches(&fragment(24.0, "Regular"), 0.1));
        assert_eq!(sig, fragment(24.0, "Bold").signature());
        assert_ne!(sig, fragment(24.05, "Bold").signature());
    }

    #[test]
    fn test_signature_equality() {
        let a = TypographySignature::new(11.0, "Regular");
        let b = fragment(11.0, "Regular").signature();
        assert_eq!(a, b);
        assert_ne!(a, TypographySignature::new(11.0, "Bold"));
        assert_eq!(a.to_string(), "11pt Regular");
    }

    #[test]
    fn test_validate() {
        assert!(fragment(12.0, "Helvetica").validate().is_ok());
        assert!(matches!(
            fragment(0.0, "Helvetica").validate(),
            Err(Error::MalformedFragment { page: 1, .. })
        ));
        assert!(fragment(f32::NAN, "Helvetica").validate().is_err());
        assert!(fragment(12.0, "").validate().is_err());

        let mut f = fragment(12.0, "Helvetica");
        f.bbox.x1 = f32::INFINITY;
        assert!(f.validate().is_err());
    }
}
