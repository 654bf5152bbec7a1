//! Write decks and read them back with the inspector.

use slide_core::{
    BackgroundOrigin, Detector, ImageRef, LayoutEngine, Pipeline, PipelineConfig, Region, Result,
    SlideLayout, SourceImage, TextElement,
};
use slide_pptx::{PptxInspector, PptxWriter, ShapeKind};
use std::io::{Cursor, Read};

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([240, 240, 240]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn assert_emu(actual: i64, inches: f64) {
    let expected = (inches * 914_400.0).round() as i64;
    assert!(
        (actual - expected).abs() <= 1,
        "expected {expected} EMU, got {actual}"
    );
}

fn sample_deck() -> Vec<u8> {
    let engine = LayoutEngine::default();
    let elements = vec![
        TextElement::new("Fish & Chips\nToday", Region::new(100.0, 100.0, 300.0, 400.0))
            .with_container(Some("#FFF"), Some(1.0)),
        TextElement::new("Footer", Region::new(600.0, 600.0, 800.0, 950.0)),
    ];
    let layout = engine
        .reconstruct(
            &elements,
            1600.0,
            900.0,
            ImageRef::new(png(16, 9), BackgroundOrigin::Cleaned),
        )
        .unwrap();

    PptxWriter::new()
        .with_title("Menu")
        .write_to_vec(&[layout])
        .unwrap()
}

#[test]
fn test_package_has_expected_parts() {
    let bytes = sample_deck();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

    for name in [
        "[Content_Types].xml",
        "_rels/.rels",
        "docProps/core.xml",
        "ppt/presentation.xml",
        "ppt/_rels/presentation.xml.rels",
        "ppt/slideMasters/slideMaster1.xml",
        "ppt/slideLayouts/slideLayout1.xml",
        "ppt/theme/theme1.xml",
        "ppt/slides/slide1.xml",
        "ppt/slides/_rels/slide1.xml.rels",
        "ppt/media/image1.png",
    ] {
        assert!(archive.by_name(name).is_ok(), "missing part {name}");
    }

    let mut core = String::new();
    archive
        .by_name("docProps/core.xml")
        .unwrap()
        .read_to_string(&mut core)
        .unwrap();
    assert!(core.contains("<dc:title>Menu</dc:title>"));

    let mut media = Vec::new();
    archive
        .by_name("ppt/media/image1.png")
        .unwrap()
        .read_to_end(&mut media)
        .unwrap();
    assert_eq!(media, png(16, 9));
}

#[test]
fn test_inspect_reads_back_geometry_and_text() {
    let summary = PptxInspector::new()
        .inspect(Cursor::new(sample_deck()))
        .unwrap();

    assert_eq!(summary.width, 9_144_000);
    assert_eq!(summary.height, 5_143_500);
    assert_eq!(summary.slides.len(), 1);

    let shapes = &summary.slides[0].shapes;
    assert_eq!(shapes.len(), 3);

    let background = &shapes[0];
    assert_eq!(background.kind, Some(ShapeKind::Picture));
    assert_eq!((background.x, background.y), (0, 0));
    assert_eq!((background.cx, background.cy), (9_144_000, 5_143_500));

    let container = &shapes[1];
    assert_eq!(container.kind, Some(ShapeKind::Shape));
    assert_eq!(container.geometry.as_deref(), Some("roundRect"));
    assert_eq!(container.fill.as_deref(), Some("FFFFFF"));
    assert_eq!(container.text, "Fish & Chips\nToday");
    assert_emu(container.x, 0.7);
    assert_emu(container.y, 0.45);
    assert_emu(container.cx, 3.6);
    assert_emu(container.cy, 1.35);

    let plain = &shapes[2];
    assert_eq!(plain.geometry.as_deref(), Some("rect"));
    assert_eq!(plain.fill, None);
    assert_eq!(plain.text, "Footer");
    assert_emu(plain.x, 5.9125);
    assert_emu(plain.cx, 3.675);
    assert_emu(plain.cy, 1.18125);
}

#[test]
fn test_slides_keep_input_order() {
    let engine = LayoutEngine::default();
    let layouts: Vec<_> = ["One", "Two", "Three"]
        .iter()
        .map(|text| {
            engine
                .reconstruct(
                    &[TextElement::new(*text, Region::new(400.0, 100.0, 600.0, 900.0))],
                    1920.0,
                    1080.0,
                    ImageRef::new(png(8, 8), BackgroundOrigin::Source),
                )
                .unwrap()
        })
        .collect();

    let bytes = PptxWriter::new().write_to_vec(&layouts).unwrap();
    let summary = PptxInspector::new().inspect(Cursor::new(bytes)).unwrap();

    let texts: Vec<_> = summary
        .slides
        .iter()
        .map(|s| s.shapes[1].text.as_str())
        .collect();
    assert_eq!(texts, ["One", "Two", "Three"]);
    assert_eq!(summary.slides[2].number, 3);
}

/// Cleans every background into a PNG cut off inside its pixel data.
struct TruncatingCleaner;

impl Detector for TruncatingCleaner {
    fn detect(&self, image: &SourceImage) -> Result<Vec<TextElement>> {
        Ok(vec![TextElement::new(
            image.name.clone(),
            Region::new(100.0, 100.0, 300.0, 900.0),
        )])
    }

    fn clean_background(&self, _image: &SourceImage) -> Result<Vec<u8>> {
        let img = image::RgbImage::from_fn(64, 36, |x, y| {
            image::Rgb([(x * 37 + y * 11) as u8, (x * y) as u8, (x ^ y) as u8])
        });
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        let mut data = out.into_inner();
        data.truncate(data.len() * 3 / 5);
        Ok(data)
    }
}

#[test]
fn test_corrupt_cleaned_backgrounds_still_make_a_deck() {
    let images = vec![
        SourceImage::from_bytes("first.png", png(64, 36)),
        SourceImage::from_bytes("second.png", png(64, 36)),
    ];
    let outcomes = Pipeline::new(
        LayoutEngine::default(),
        PipelineConfig::new().with_detect_attempts(1),
    )
    .run(&TruncatingCleaner, &images)
    .unwrap();
    let layouts: Vec<SlideLayout> = outcomes.into_iter().map(|o| o.result.unwrap()).collect();

    let bytes = PptxWriter::new().write_to_vec(&layouts).unwrap();
    let summary = PptxInspector::new().inspect(Cursor::new(bytes)).unwrap();
    assert_eq!(summary.slides.len(), 2);
    assert_eq!(summary.slides[1].shapes[1].text, "second.png");
}
