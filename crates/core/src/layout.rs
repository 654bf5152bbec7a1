//! Slide assembly.
//!
//! [`LayoutEngine`] ties canvas sizing, projection and styling together. It
//! holds only an immutable [`LayoutConfig`], so one engine can be shared by
//! any number of worker threads.

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::geometry::{project_region, CanvasSpec, Rect};
use crate::slide::{Background, ImageRef, SlideLayout, SlideObject};
use crate::style::style_element;
use crate::types::{Region, TextElement};

/// Size a canvas with the default width to a source image.
pub fn compute_canvas(width_px: f64, height_px: f64) -> Result<CanvasSpec> {
    CanvasSpec::for_source(LayoutConfig::default().canvas_width, width_px, height_px)
}

/// Deterministic layout reconstruction for one image at a time.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Size the canvas to the source image's aspect ratio.
    pub fn compute_canvas(&self, width_px: f64, height_px: f64) -> Result<CanvasSpec> {
        CanvasSpec::for_source(self.config.canvas_width, width_px, height_px)
    }

    /// Project an element's region, clamping degenerate regions to a minimal
    /// box so every element still yields an object.
    pub fn project(&self, region: &Region, canvas: &CanvasSpec) -> Rect {
        if region.is_degenerate() {
            log::warn!(
                "Degenerate region [{}, {}, {}, {}], clamping to minimum size",
                region.top,
                region.left,
                region.bottom,
                region.right
            );
            return project_region(&region.clamped(), canvas);
        }
        project_region(region, canvas)
    }

    /// Build the ordered object list: background first, then one object per
    /// element in input order.
    pub fn build_slide(
        &self,
        elements: &[TextElement],
        canvas: &CanvasSpec,
        background: ImageRef,
    ) -> Vec<SlideObject> {
        let mut objects = Vec::with_capacity(elements.len() + 1);
        objects.push(SlideObject::Background(Background {
            frame: canvas.full_frame(),
            image: background,
        }));

        for (idx, element) in elements.iter().enumerate() {
            let projected = self.project(&element.region, canvas);
            let object = style_element(element, &projected, &self.config);
            log::debug!(
                "Element {}: container={} frame=({:.3}, {:.3}, {:.3}, {:.3}) size={:.1}pt",
                idx,
                element.has_container,
                object.frame().x,
                object.frame().y,
                object.frame().w,
                object.frame().h,
                object.content().map(|c| c.font.size).unwrap_or_default()
            );
            objects.push(object);
        }

        objects
    }

    /// Reconstruct a full slide for a source image of the given pixel size.
    pub fn reconstruct(
        &self,
        elements: &[TextElement],
        width_px: f64,
        height_px: f64,
        background: ImageRef,
    ) -> Result<SlideLayout> {
        let canvas = self.compute_canvas(width_px, height_px)?;
        let objects = self.build_slide(elements, &canvas, background);
        Ok(SlideLayout { canvas, objects })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HexColor;
    use crate::slide::BackgroundOrigin;
    use crate::types::{Alignment, FontWeight};
    use crate::Error;

    fn background() -> ImageRef {
        ImageRef::new(vec![1u8, 2, 3], BackgroundOrigin::Source)
    }

    #[test]
    fn test_default_canvas() {
        let canvas = compute_canvas(1920.0, 1080.0).unwrap();
        assert_eq!(canvas.width, 10.0);
        assert!((canvas.height - 5.625).abs() < 1e-9);
        assert!(matches!(
            compute_canvas(0.0, 100.0),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_end_to_end_container_scenario() {
        let engine = LayoutEngine::default();
        let element = TextElement::new("Hello\nWorld", Region::new(100.0, 100.0, 300.0, 400.0))
            .with_container(Some("#FFF"), Some(1.0))
            .with_font_weight(FontWeight::Bold)
            .with_alignment(Alignment::Center);

        let layout = engine
            .reconstruct(&[element], 1600.0, 900.0, background())
            .unwrap();

        assert!((layout.canvas.height - 5.625).abs() < 1e-9);
        assert_eq!(layout.objects.len(), 2);

        let bg = layout.background().unwrap();
        assert_eq!(bg.frame, Rect::new(0.0, 0.0, 10.0, layout.canvas.height));

        match &layout.objects[1] {
            SlideObject::ContainerBox(boxed) => {
                assert!(boxed.frame.w > 3.0);
                assert!(boxed.frame.h > 1.125);
                assert!(boxed.frame.x < 1.0);
                assert!(boxed.frame.y < 0.5625);
                assert_eq!(boxed.fill.color, HexColor::WHITE);
                assert_eq!(boxed.fill.color.to_string(), "FFFFFF");
                assert_eq!(boxed.fill.transparency, 0.0);
                assert_eq!(boxed.content.alignment, Alignment::Center);
                assert!(boxed.content.font.bold);

                // 1.125in * 72 = 81pt over 2 lines, * 0.70, * 0.95 for bold
                let expected = 81.0 / 2.0 * 0.70 * 0.95;
                assert!((boxed.content.font.size - expected).abs() < 1e-9);
                assert!(boxed.content.font.size >= 9.0);
            }
            other => panic!("expected container box, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_elements_yield_background_only() {
        let engine = LayoutEngine::default();
        let layout = engine.reconstruct(&[], 800.0, 600.0, background()).unwrap();
        assert_eq!(layout.objects.len(), 1);
        assert!(layout.objects[0].is_background());
        assert_eq!(layout.text_objects().count(), 0);
    }

    #[test]
    fn test_input_order_is_paint_order() {
        let engine = LayoutEngine::default();
        let canvas = engine.compute_canvas(1000.0, 1000.0).unwrap();
        let elements = vec![
            TextElement::new("bottom", Region::new(800.0, 0.0, 900.0, 100.0)),
            TextElement::new("top", Region::new(0.0, 0.0, 100.0, 100.0)).with_container(None, None),
            TextElement::new("middle", Region::new(400.0, 0.0, 500.0, 100.0)),
        ];

        let objects = engine.build_slide(&elements, &canvas, background());
        let texts: Vec<&str> = objects
            .iter()
            .filter_map(|o| o.content().map(|c| c.text.as_str()))
            .collect();
        assert_eq!(texts, vec!["bottom", "top", "middle"]);
        assert!(objects[0].is_background());
    }

    #[test]
    fn test_degenerate_region_keeps_output_count() {
        let engine = LayoutEngine::default();
        let canvas = engine.compute_canvas(1000.0, 500.0).unwrap();
        let elements = vec![
            TextElement::new("ok", Region::new(0.0, 0.0, 100.0, 100.0)),
            TextElement::new("flat", Region::new(300.0, 300.0, 300.0, 200.0)),
        ];

        let objects = engine.build_slide(&elements, &canvas, background());
        assert_eq!(objects.len(), 3);
        let frame = objects[2].frame();
        assert!(frame.w > 0.0 && frame.h > 0.0);
    }

    #[test]
    fn test_invalid_dimensions_abort_reconstruction() {
        let engine = LayoutEngine::default();
        let elements = vec![TextElement::new("x", Region::new(0.0, 0.0, 10.0, 10.0))];
        assert!(matches!(
            engine.reconstruct(&elements, 100.0, -1.0, background()),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_reconstruction_is_deterministic() {
        let engine = LayoutEngine::new(LayoutConfig::default().with_container_padding(0.15));
        let elements = vec![
            TextElement::new("A\nB", Region::new(10.0, 20.0, 200.0, 500.0)).with_container(
                Some("#336699"),
                Some(0.8),
            ),
            TextElement::new("C", Region::new(600.0, 100.0, 700.0, 900.0)).with_stroke("#000"),
        ];
        let a = engine.reconstruct(&elements, 1280.0, 720.0, background()).unwrap();
        let b = engine.reconstruct(&elements, 1280.0, 720.0, background()).unwrap();
        assert_eq!(a, b);
    }
}
