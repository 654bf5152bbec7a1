//! WASM-compatible wrapper for slide layout reconstruction.
//!
//! This crate exposes the layout engine and the PPTX writer to JavaScript
//! for use in Cloudflare Workers, where the vision calls happen in the host.

use serde::Serialize;
use slide_core::{
    parse_detections, BackgroundOrigin, Detector, Error, ImageRef, LayoutEngine, Pipeline,
    PipelineConfig, SlideLayout, SourceImage, TextElement, TextNormalizer,
};
use slide_pptx::PptxWriter;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of resolving a color string.
#[derive(Debug, Serialize)]
pub struct ColorResult {
    /// Uppercase `RRGGBB`.
    pub hex: String,
    /// Whether the input was understood; black is used otherwise.
    pub recognized: bool,
}

/// Reconstruct a slide layout from detected text elements.
///
/// # Arguments
/// * `elements` - Array of detected elements (camelCase fields)
/// * `width` - Source image width in pixels
/// * `height` - Source image height in pixels
///
/// # Returns
/// The serialized layout. The background object carries no image bytes.
#[wasm_bindgen]
pub fn reconstruct_layout(elements: JsValue, width: f64, height: f64) -> Result<JsValue, JsValue> {
    let elements: Vec<TextElement> = serde_wasm_bindgen::from_value(elements)
        .map_err(|e| JsValue::from_str(&format!("Invalid elements array: {}", e)))?;

    let layout = reconstruct_layout_impl(elements, width, height).map_err(|e| JsValue::from_str(&e))?;

    serde_wasm_bindgen::to_value(&layout)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn reconstruct_layout_impl(
    elements: Vec<TextElement>,
    width: f64,
    height: f64,
) -> Result<SlideLayout, String> {
    let normalizer = TextNormalizer::new();
    let elements: Vec<TextElement> = elements
        .into_iter()
        .filter_map(|mut element| {
            element.text = normalizer.normalize(&element.text);
            (!element.text.is_empty()).then_some(element)
        })
        .collect();

    LayoutEngine::default()
        .reconstruct(
            &elements,
            width,
            height,
            ImageRef::new(Vec::new(), BackgroundOrigin::Source),
        )
        .map_err(|e| format!("Layout error: {}", e))
}

/// Build a one-slide PPTX deck.
///
/// # Arguments
/// * `image` - The raw bytes of the source slide image
/// * `elements_json` - Detection response (array or `{ "elements": [...] }`)
/// * `background` - Cleaned background bytes, if the host produced one
///
/// # Returns
/// The bytes of the `.pptx` file, or throws on error.
#[wasm_bindgen]
pub fn build_deck(
    image: &[u8],
    elements_json: &str,
    background: Option<Vec<u8>>,
) -> Result<Vec<u8>, JsValue> {
    build_deck_impl(image, elements_json, background).map_err(|e| JsValue::from_str(&e))
}

/// Detector over results the host already has.
struct HostResults {
    elements: Vec<TextElement>,
    background: Option<Vec<u8>>,
}

impl Detector for HostResults {
    fn detect(&self, _image: &SourceImage) -> slide_core::Result<Vec<TextElement>> {
        Ok(self.elements.clone())
    }

    fn clean_background(&self, _image: &SourceImage) -> slide_core::Result<Vec<u8>> {
        self.background
            .clone()
            .ok_or_else(|| Error::Background("No cleaned background supplied".to_string()))
    }
}

fn build_deck_impl(
    image: &[u8],
    elements_json: &str,
    background: Option<Vec<u8>>,
) -> Result<Vec<u8>, String> {
    let elements = parse_detections(elements_json, &TextNormalizer::new())
        .map_err(|e| format!("Detection parsing error: {}", e))?;

    let detector = HostResults {
        elements,
        background,
    };
    let pipeline = Pipeline::new(
        LayoutEngine::default(),
        PipelineConfig::new().with_detect_attempts(1),
    );
    let layout = pipeline
        .process_image(&detector, &SourceImage::from_bytes("slide", image.to_vec()))
        .map_err(|e| format!("Layout error: {}", e))?;

    PptxWriter::new()
        .write_to_vec(&[layout])
        .map_err(|e| format!("PPTX writing error: {}", e))
}

/// Resolve a color string to `RRGGBB`, falling back to black.
#[wasm_bindgen]
pub fn resolve_color(input: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&resolve_color_impl(input))
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn resolve_color_impl(input: &str) -> ColorResult {
    ColorResult {
        hex: slide_core::resolve_color(input).to_string(),
        recognized: slide_core::HexColor::parse(input).is_some(),
    }
}
