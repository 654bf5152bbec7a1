//! Read a deck back into a shape-level summary.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use slide_core::{Error, Result};
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Summary of a whole deck.
#[derive(Debug, Clone, Serialize)]
pub struct DeckSummary {
    /// Slide width in EMU.
    pub width: i64,
    /// Slide height in EMU.
    pub height: i64,
    /// Slides in presentation order.
    pub slides: Vec<SlideSummary>,
}

/// Shapes of one slide in paint order.
#[derive(Debug, Clone, Serialize)]
pub struct SlideSummary {
    /// 1-based slide number.
    pub number: usize,
    pub shapes: Vec<ShapeSummary>,
}

/// Kind of drawing element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Picture,
    Shape,
}

/// One drawing element with its placement in EMU.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShapeSummary {
    pub name: String,
    pub kind: Option<ShapeKind>,
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
    /// Preset geometry, e.g. `rect` or `roundRect`.
    pub geometry: Option<String>,
    /// Shape fill color, if solid.
    pub fill: Option<String>,
    /// Paragraphs joined by `\n`.
    pub text: String,
}

/// Reader for decks produced by [`crate::PptxWriter`] (or any PPTX).
pub struct PptxInspector;

impl PptxInspector {
    /// Create a new PPTX inspector.
    pub fn new() -> Self {
        Self
    }

    /// Summarize a PPTX file from a reader.
    pub fn inspect<R: Read + Seek>(&self, reader: R) -> Result<DeckSummary> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let presentation = self.read_file_from_archive(&mut archive, "ppt/presentation.xml")?;
        let (width, height) = slide_size(&presentation)?;

        let slide_order = self.get_slide_order(&mut archive)?;
        let mut slides = Vec::with_capacity(slide_order.len());
        for (idx, slide_path) in slide_order.iter().enumerate() {
            let content = self.read_file_from_archive(&mut archive, slide_path)?;
            slides.push(SlideSummary {
                number: idx + 1,
                shapes: extract_shapes(&content)?,
            });
        }

        Ok(DeckSummary {
            width,
            height,
            slides,
        })
    }

    /// Get the ordered list of slide paths from the presentation relationships.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content =
            self.read_file_from_archive(archive, "ppt/_rels/presentation.xml.rels")?;
        let mut slides: Vec<(String, Option<usize>)> = Vec::new();

        let mut reader = Reader::from_str(&rels_content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let rel_type = attr(e, b"Type").unwrap_or_default();
                    let target = attr(e, b"Target").unwrap_or_default();
                    let id = attr(e, b"Id").unwrap_or_default();

                    if rel_type.ends_with("/slide") {
                        let order = extract_slide_number(&target).or_else(|| extract_slide_number(&id));
                        let full_path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("ppt/{}", target),
                        };
                        slides.push((full_path, order));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxInspector {
    fn default() -> Self {
        Self::new()
    }
}

/// Read `<p:sldSz cx cy>` from `presentation.xml`.
fn slide_size(xml: &str) -> Result<(i64, i64)> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldSz" =>
            {
                let cx = attr(e, b"cx").and_then(|v| v.parse().ok());
                let cy = attr(e, b"cy").and_then(|v| v.parse().ok());
                return match (cx, cy) {
                    (Some(cx), Some(cy)) => Ok((cx, cy)),
                    _ => Err(Error::XmlError("Malformed slide size".to_string())),
                };
            }
            Ok(Event::Eof) => {
                return Err(Error::XmlError("Presentation has no slide size".to_string()))
            }
            Err(e) => return Err(Error::XmlError(format!("Error parsing presentation: {}", e))),
            _ => {}
        }
    }
}

/// Extract shapes with placement, fill and text from slide XML.
fn extract_shapes(xml: &str) -> Result<Vec<ShapeSummary>> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut current: Option<ShapeSummary> = None;
    let mut in_sp_pr = false;
    let mut in_text_body = false;
    let mut in_run_text = false;
    let mut paragraphs: Vec<String> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::XmlError(format!("Error parsing slide: {}", e)))?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"sp" | b"pic" if !is_empty => {
                        let kind = if local_name(name.as_ref()) == b"pic" {
                            ShapeKind::Picture
                        } else {
                            ShapeKind::Shape
                        };
                        current = Some(ShapeSummary {
                            kind: Some(kind),
                            ..ShapeSummary::default()
                        });
                        paragraphs.clear();
                    }
                    b"cNvPr" => {
                        if let Some(shape) = current.as_mut() {
                            shape.name = attr(e, b"name").unwrap_or_default();
                        }
                    }
                    b"spPr" if !is_empty => in_sp_pr = true,
                    b"off" if in_sp_pr => {
                        if let Some(shape) = current.as_mut() {
                            shape.x = attr_i64(e, b"x");
                            shape.y = attr_i64(e, b"y");
                        }
                    }
                    b"ext" if in_sp_pr => {
                        if let Some(shape) = current.as_mut() {
                            shape.cx = attr_i64(e, b"cx");
                            shape.cy = attr_i64(e, b"cy");
                        }
                    }
                    b"prstGeom" if in_sp_pr => {
                        if let Some(shape) = current.as_mut() {
                            shape.geometry = attr(e, b"prst");
                        }
                    }
                    // The first solid color in the shape properties is the
                    // fill; line and shadow colors come after it.
                    b"srgbClr" if in_sp_pr => {
                        if let Some(shape) = current.as_mut() {
                            if shape.fill.is_none() {
                                shape.fill = attr(e, b"val");
                            }
                        }
                    }
                    b"ln" | b"effectLst" if in_sp_pr && !is_empty => {
                        // Stop looking for the fill once line or effects start.
                        if let Some(shape) = current.as_mut() {
                            if shape.fill.is_none() {
                                shape.fill = Some(String::new());
                            }
                        }
                    }
                    b"txBody" if !is_empty => in_text_body = true,
                    b"p" if in_text_body => paragraphs.push(String::new()),
                    b"t" if in_text_body && !is_empty => in_run_text = true,
                    _ => {}
                }
            }
            Event::Text(ref e) if in_run_text => {
                let text = e
                    .unescape()
                    .map_err(|e| Error::XmlError(format!("Bad text content: {}", e)))?;
                if let Some(last) = paragraphs.last_mut() {
                    last.push_str(&text);
                }
            }
            Event::End(ref e) => match local_name(e.name().as_ref()) {
                b"sp" | b"pic" => {
                    if let Some(mut shape) = current.take() {
                        if shape.fill.as_deref() == Some("") {
                            shape.fill = None;
                        }
                        shape.text = paragraphs.join("\n");
                        shapes.push(shape);
                    }
                    paragraphs.clear();
                    in_sp_pr = false;
                    in_text_body = false;
                    in_run_text = false;
                }
                b"spPr" => in_sp_pr = false,
                b"txBody" => in_text_body = false,
                b"t" => in_run_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(shapes)
}

/// Value of an attribute by its (unprefixed or prefixed) key.
fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

fn attr_i64(e: &BytesStart<'_>, key: &[u8]) -> i64 {
    attr(e, key).and_then(|v| v.parse().ok()).unwrap_or_default()
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slides/slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
