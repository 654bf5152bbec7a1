//! Domain types for detected text elements.
//!
//! These are the read-only inputs of the layout engine. They deserialize from
//! the detection service's camelCase JSON and tolerate unknown enum values.

use serde::{Deserialize, Serialize};

/// Upper bound of the detector's normalized coordinate scale.
pub const REGION_SCALE: f64 = 1000.0;

/// Smallest extent a region is clamped to, in normalized units.
pub const MIN_REGION_EXTENT: f64 = 1.0;

/// A bounding region on the 0–1000 normalized scale, top-left origin.
///
/// Serialized as `[top, left, bottom, right]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Region {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Region {
    /// Create a region from its four edges.
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Horizontal extent in normalized units.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Vertical extent in normalized units.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// True when the region has no positive width or height.
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Return a region guaranteed to span at least one normalized unit on
    /// each axis. Non-degenerate regions are returned unchanged.
    pub fn clamped(&self) -> Self {
        let top = finite_or_zero(self.top);
        let left = finite_or_zero(self.left);
        let mut bottom = finite_or_zero(self.bottom);
        let mut right = finite_or_zero(self.right);

        if bottom - top < MIN_REGION_EXTENT {
            bottom = top + MIN_REGION_EXTENT;
        }
        if right - left < MIN_REGION_EXTENT {
            right = left + MIN_REGION_EXTENT;
        }

        Self {
            top,
            left,
            bottom,
            right,
        }
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

impl From<[f64; 4]> for Region {
    fn from([top, left, bottom, right]: [f64; 4]) -> Self {
        Self::new(top, left, bottom, right)
    }
}

impl From<Region> for [f64; 4] {
    fn from(r: Region) -> Self {
        [r.top, r.left, r.bottom, r.right]
    }
}

/// Generic font family reported by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum FontFamily {
    Serif,
    #[default]
    SansSerif,
    Monospace,
    Handwriting,
}

impl FontFamily {
    /// Concrete typeface used when rendering this family.
    pub fn typeface(&self) -> &'static str {
        match self {
            Self::Serif => "Georgia",
            Self::SansSerif => "Arial",
            Self::Monospace => "Courier New",
            Self::Handwriting => "Comic Sans MS",
        }
    }
}

impl From<String> for FontFamily {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "serif" => Self::Serif,
            "monospace" | "mono" | "monospaced" => Self::Monospace,
            "handwriting" | "cursive" | "script" => Self::Handwriting,
            _ => Self::SansSerif,
        }
    }
}

/// Font weight as reported by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum FontWeight {
    Bold,
    #[default]
    Normal,
}

impl From<String> for FontWeight {
    fn from(s: String) -> Self {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "bold" | "bolder" | "semibold" | "heavy" | "black" => Self::Bold,
            _ => match s.parse::<u32>() {
                Ok(weight) if weight >= 600 => Self::Bold,
                _ => Self::Normal,
            },
        }
    }
}

/// Font style as reported by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum FontStyle {
    Italic,
    #[default]
    Normal,
}

impl From<String> for FontStyle {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "italic" | "oblique" => Self::Italic,
            _ => Self::Normal,
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl From<String> for Alignment {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "center" | "centre" | "middle" => Self::Center,
            "right" | "end" => Self::Right,
            _ => Self::Left,
        }
    }
}

/// One detected text region with its style attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    /// Text content; may contain embedded line breaks.
    pub text: String,

    /// Bounding region on the 0–1000 scale.
    #[serde(alias = "box_2d", alias = "box2d")]
    pub region: Region,

    /// Glyph color, possibly malformed.
    #[serde(default)]
    pub text_color: String,

    /// Whether a visible container shape sits behind the text.
    #[serde(default)]
    pub has_container: bool,

    /// Container fill color, only meaningful with a container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_color: Option<String>,

    /// Container opacity, 1.0 is fully solid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_opacity: Option<f64>,

    /// Optional glyph outline color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,

    /// Relative size estimate on the 0–1000 scale. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size_hint: Option<f64>,

    #[serde(default)]
    pub font_family: FontFamily,

    #[serde(default)]
    pub font_weight: FontWeight,

    #[serde(default)]
    pub font_style: FontStyle,

    #[serde(default)]
    pub alignment: Alignment,
}

impl TextElement {
    /// Create a plain black, left-aligned, sans-serif element.
    pub fn new(text: impl Into<String>, region: Region) -> Self {
        Self {
            text: text.into(),
            region,
            text_color: "000000".to_string(),
            has_container: false,
            container_color: None,
            container_opacity: None,
            stroke_color: None,
            font_size_hint: None,
            font_family: FontFamily::default(),
            font_weight: FontWeight::default(),
            font_style: FontStyle::default(),
            alignment: Alignment::default(),
        }
    }

    /// Set the glyph color.
    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = color.into();
        self
    }

    /// Place the text on a container with the given color and opacity.
    pub fn with_container(mut self, color: Option<&str>, opacity: Option<f64>) -> Self {
        self.has_container = true;
        self.container_color = color.map(str::to_string);
        self.container_opacity = opacity;
        self
    }

    /// Set the glyph outline color.
    pub fn with_stroke(mut self, color: impl Into<String>) -> Self {
        self.stroke_color = Some(color.into());
        self
    }

    pub fn with_font_family(mut self, family: FontFamily) -> Self {
        self.font_family = family;
        self
    }

    pub fn with_font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = weight;
        self
    }

    pub fn with_font_style(mut self, style: FontStyle) -> Self {
        self.font_style = style;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Number of text lines: embedded line breaks plus one.
    pub fn line_count(&self) -> usize {
        self.text.matches('\n').count() + 1
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight == FontWeight::Bold
    }

    pub fn is_italic(&self) -> bool {
        self.font_style == FontStyle::Italic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_extents() {
        let r = Region::new(100.0, 100.0, 300.0, 400.0);
        assert_eq!(r.width(), 300.0);
        assert_eq!(r.height(), 200.0);
        assert!(!r.is_degenerate());
    }

    #[test]
    fn test_degenerate_region_is_clamped() {
        let r = Region::new(200.0, 50.0, 200.0, 40.0);
        assert!(r.is_degenerate());

        let c = r.clamped();
        assert!(!c.is_degenerate());
        assert_eq!(c.height(), MIN_REGION_EXTENT);
        assert_eq!(c.width(), MIN_REGION_EXTENT);
        assert_eq!(c.top, 200.0);
        assert_eq!(c.left, 50.0);
    }

    #[test]
    fn test_valid_region_clamp_is_identity() {
        let r = Region::new(1.0, 2.0, 30.0, 40.0);
        assert_eq!(r.clamped(), r);
    }

    #[test]
    fn test_line_count() {
        let e = TextElement::new("Hello\nWorld", Region::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(e.line_count(), 2);

        let e = TextElement::new("One line", Region::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(e.line_count(), 1);
    }

    #[test]
    fn test_lenient_enum_values() {
        assert_eq!(FontFamily::from("Serif".to_string()), FontFamily::Serif);
        assert_eq!(FontFamily::from("cursive".to_string()), FontFamily::Handwriting);
        assert_eq!(FontFamily::from("fantasy".to_string()), FontFamily::SansSerif);
        assert_eq!(FontWeight::from("700".to_string()), FontWeight::Bold);
        assert_eq!(FontWeight::from("400".to_string()), FontWeight::Normal);
        assert_eq!(FontStyle::from("Italic".to_string()), FontStyle::Italic);
        assert_eq!(Alignment::from("centre".to_string()), Alignment::Center);
        assert_eq!(Alignment::from("justify".to_string()), Alignment::Left);
    }

    #[test]
    fn test_deserialize_detector_json() {
        let json = r##"{
            "text": "Hello\nWorld",
            "box_2d": [100, 100, 300, 400],
            "textColor": "#333",
            "hasContainer": true,
            "containerColor": "#FFF",
            "containerOpacity": 1.0,
            "fontFamily": "serif",
            "fontWeight": "bold",
            "fontStyle": "normal",
            "alignment": "center"
        }"##;

        let e: TextElement = serde_json::from_str(json).unwrap();
        assert_eq!(e.region, Region::new(100.0, 100.0, 300.0, 400.0));
        assert!(e.has_container);
        assert_eq!(e.container_color.as_deref(), Some("#FFF"));
        assert_eq!(e.container_opacity, Some(1.0));
        assert_eq!(e.font_family, FontFamily::Serif);
        assert!(e.is_bold());
        assert!(!e.is_italic());
        assert_eq!(e.alignment, Alignment::Center);
        assert_eq!(e.stroke_color, None);
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let json = r#"{ "text": "Hi", "region": [0, 0, 10, 10] }"#;
        let e: TextElement = serde_json::from_str(json).unwrap();
        assert_eq!(e.text_color, "");
        assert!(!e.has_container);
        assert_eq!(e.font_family, FontFamily::SansSerif);
        assert_eq!(e.font_weight, FontWeight::Normal);
        assert_eq!(e.alignment, Alignment::Left);
    }

    #[test]
    fn test_typeface_mapping() {
        assert_eq!(FontFamily::Serif.typeface(), "Georgia");
        assert_eq!(FontFamily::SansSerif.typeface(), "Arial");
        assert_eq!(FontFamily::Monospace.typeface(), "Courier New");
        assert_eq!(FontFamily::Handwriting.typeface(), "Comic Sans MS");
    }
}
