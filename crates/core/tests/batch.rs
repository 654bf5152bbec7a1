//! Batch reconstruction across independent images.

use slide_core::{
    BackgroundOrigin, Detector, Error, LayoutEngine, Pipeline, PipelineConfig, Region, Result,
    SlideObject, SourceImage, TextElement,
};
use std::io::Cursor;

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// Scripted detector keyed by image name.
struct ScriptedDetector;

impl Detector for ScriptedDetector {
    fn detect(&self, image: &SourceImage) -> Result<Vec<TextElement>> {
        match image.name.as_str() {
            "empty.png" => Ok(Vec::new()),
            "text.png" => Ok(vec![
                TextElement::new("Headline", Region::new(50.0, 100.0, 150.0, 900.0)),
                TextElement::new("Boxed\nnote", Region::new(600.0, 600.0, 800.0, 950.0))
                    .with_container(Some("#ffeeaa"), Some(0.9)),
            ]),
            "offline.png" => Err(Error::Detection("service unavailable".to_string())),
            other => Err(Error::Detection(format!("unexpected image {other}"))),
        }
    }

    fn clean_background(&self, image: &SourceImage) -> Result<Vec<u8>> {
        match image.name.as_str() {
            "empty.png" => Ok(png(32, 18)),
            _ => Err(Error::Background("generation failed".to_string())),
        }
    }
}

fn pipeline() -> Pipeline {
    Pipeline::new(
        LayoutEngine::default(),
        PipelineConfig::new()
            .with_window(2)
            .with_detect_attempts(1)
            .with_retry_backoff_ms(0),
    )
}

#[test]
fn test_batch_isolates_each_image() {
    let text_source = png(64, 36);
    let images = vec![
        SourceImage::from_bytes("empty.png", png(32, 18)),
        SourceImage::from_bytes("text.png", text_source.clone()),
        SourceImage::from_bytes("offline.png", png(10, 10)),
    ];

    let outcomes = pipeline().run(&ScriptedDetector, &images).unwrap();
    let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["empty.png", "text.png", "offline.png"]);

    // No detected elements: background-only slide from the cleaned image.
    let empty = outcomes[0].result.as_ref().unwrap();
    assert_eq!(empty.objects.len(), 1);
    assert_eq!(
        empty.background().unwrap().image.origin,
        BackgroundOrigin::Cleaned
    );

    // Background cleaning failed: source bytes used, text still produced.
    let text = outcomes[1].result.as_ref().unwrap();
    let bg = text.background().unwrap();
    assert_eq!(bg.image.origin, BackgroundOrigin::Source);
    assert_eq!(bg.image.data.as_slice(), text_source.as_slice());
    assert_eq!(text.objects.len(), 3);
    assert!(matches!(text.objects[1], SlideObject::PlainText(_)));
    assert!(matches!(text.objects[2], SlideObject::ContainerBox(_)));

    // Detection failure is confined to its own image.
    assert!(matches!(outcomes[2].result, Err(Error::Detection(_))));
}

#[test]
fn test_dyn_detector() {
    let detector: Box<dyn Detector> = Box::new(ScriptedDetector);
    let images = vec![SourceImage::from_bytes("empty.png", png(20, 10))];
    let outcomes = pipeline().run(detector.as_ref(), &images).unwrap();
    let layout = outcomes[0].result.as_ref().unwrap();
    assert!((layout.canvas.height - 5.0).abs() < 1e-9);
}

#[test]
fn test_layout_serializes_for_downstream_sinks() {
    let images = vec![SourceImage::from_bytes("text.png", png(64, 36))];
    let outcomes = pipeline().run(&ScriptedDetector, &images).unwrap();
    let layout = outcomes[0].result.as_ref().unwrap();

    let json = serde_json::to_value(layout).unwrap();
    let objects = json["objects"].as_array().unwrap();
    assert_eq!(objects[0]["kind"], "background");
    assert_eq!(objects[0]["image"]["origin"], "source");
    assert_eq!(objects[1]["kind"], "plain_text");
    assert_eq!(objects[2]["kind"], "container_box");
    assert_eq!(objects[2]["fill"]["color"], "FFEEAA");
    assert_eq!(objects[2]["content"]["alignment"], "left");
}
