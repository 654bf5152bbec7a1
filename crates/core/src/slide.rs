//! Renderable slide objects produced by the layout engine.

use serde::Serialize;
use std::sync::Arc;

use crate::color::HexColor;
use crate::geometry::{CanvasSpec, Rect};
use crate::types::Alignment;

/// Where the background image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundOrigin {
    /// Text-free image returned by the background-cleaning service.
    Cleaned,
    /// The untouched source image.
    Source,
}

/// Encoded image bytes plus their provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRef {
    #[serde(skip)]
    pub data: Arc<Vec<u8>>,
    pub origin: BackgroundOrigin,
}

impl ImageRef {
    pub fn new(data: impl Into<Arc<Vec<u8>>>, origin: BackgroundOrigin) -> Self {
        Self {
            data: data.into(),
            origin,
        }
    }
}

/// Full-canvas background picture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Background {
    pub frame: Rect,
    pub image: ImageRef,
}

/// Font resolved to a concrete face, size and color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedFont {
    pub face: String,
    /// Size in points.
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub color: HexColor,
}

/// Glyph outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Outline {
    pub color: HexColor,
    /// Width in points.
    pub width: f64,
}

/// Text and its typographic styling, shared by both text variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    pub text: String,
    pub font: ResolvedFont,
    pub alignment: Alignment,
    pub outline: Option<Outline>,
}

/// Solid fill with transparency percentage (0 = opaque, 100 = invisible).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fill {
    pub color: HexColor,
    pub transparency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Border {
    pub color: HexColor,
    /// Width in points.
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shadow {
    pub color: HexColor,
    pub transparency: f64,
    /// Blur radius in points.
    pub blur: f64,
    /// Offset in points.
    pub offset: f64,
    /// Direction in degrees.
    pub angle: f64,
}

/// Text drawn directly over the background.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlainText {
    pub frame: Rect,
    pub content: TextContent,
}

/// Text drawn on a filled rounded rectangle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerBox {
    pub frame: Rect,
    pub content: TextContent,
    pub fill: Fill,
    pub border: Border,
    pub shadow: Shadow,
    /// Corner radius in canvas units.
    pub corner_radius: f64,
}

/// One renderable unit of a reconstructed slide.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlideObject {
    Background(Background),
    PlainText(PlainText),
    ContainerBox(ContainerBox),
}

impl SlideObject {
    /// Absolute placement on the canvas.
    pub fn frame(&self) -> &Rect {
        match self {
            Self::Background(b) => &b.frame,
            Self::PlainText(t) => &t.frame,
            Self::ContainerBox(c) => &c.frame,
        }
    }

    /// Text content, or `None` for the background.
    pub fn content(&self) -> Option<&TextContent> {
        match self {
            Self::Background(_) => None,
            Self::PlainText(t) => Some(&t.content),
            Self::ContainerBox(c) => Some(&c.content),
        }
    }

    pub fn is_background(&self) -> bool {
        matches!(self, Self::Background(_))
    }
}

/// A complete reconstructed slide: its canvas and objects in paint order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideLayout {
    pub canvas: CanvasSpec,
    pub objects: Vec<SlideObject>,
}

impl SlideLayout {
    /// The background object, always first.
    pub fn background(&self) -> Option<&Background> {
        match self.objects.first() {
            Some(SlideObject::Background(b)) => Some(b),
            _ => None,
        }
    }

    /// Text objects in paint order.
    pub fn text_objects(&self) -> impl Iterator<Item = &SlideObject> {
        self.objects.iter().filter(|o| !o.is_background())
    }
}
