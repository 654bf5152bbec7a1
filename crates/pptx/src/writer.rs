//! PPTX file writer implementation.

use slide_core::source::to_embeddable;
use slide_core::{CanvasSpec, Error, Result, SlideLayout};
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::parts;
use crate::shapes::{slide_xml, Placement};
use crate::units::{emu, EMU_PER_UNIT, MAX_SLIDE_EMU, MIN_SLIDE_EMU};

/// Writer for PPTX (Office Open XML) decks, one slide per layout.
///
/// The deck's slide size is taken from the first layout's canvas. Layouts
/// with a different aspect ratio are scaled uniformly and centred.
#[derive(Debug, Clone)]
pub struct PptxWriter {
    title: String,
}

impl PptxWriter {
    /// Create a new PPTX writer.
    pub fn new() -> Self {
        Self {
            title: "Reconstructed slides".to_string(),
        }
    }

    /// Set the document title stored in the core properties.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Write a deck to any seekable sink and return the sink.
    pub fn write<W: Write + Seek>(&self, layouts: &[SlideLayout], sink: W) -> Result<W> {
        let first = layouts
            .first()
            .map(|l| l.canvas)
            .ok_or_else(|| Error::InvalidInput("A deck needs at least one slide".to_string()))?;
        let (cx, cy) = slide_size(&first);
        let deck = CanvasSpec {
            width: cx as f64 / EMU_PER_UNIT,
            height: cy as f64 / EMU_PER_UNIT,
        };

        let mut zip = ZipWriter::new(sink);
        let xml_opts = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let media_opts = FileOptions::default().compression_method(CompressionMethod::Stored);

        let count = layouts.len();
        add_part(&mut zip, "[Content_Types].xml", &parts::content_types(count)?, xml_opts)?;
        add_part(&mut zip, "_rels/.rels", &parts::package_rels()?, xml_opts)?;
        add_part(&mut zip, "docProps/core.xml", &parts::core_properties(&self.title)?, xml_opts)?;
        add_part(&mut zip, "docProps/app.xml", &parts::app_properties(count)?, xml_opts)?;
        add_part(&mut zip, "ppt/presentation.xml", &parts::presentation(count, cx, cy)?, xml_opts)?;
        add_part(
            &mut zip,
            "ppt/_rels/presentation.xml.rels",
            &parts::presentation_rels(count)?,
            xml_opts,
        )?;
        add_part(&mut zip, "ppt/presProps.xml", parts::PRES_PROPS.as_bytes(), xml_opts)?;
        add_part(&mut zip, "ppt/viewProps.xml", parts::VIEW_PROPS.as_bytes(), xml_opts)?;
        add_part(&mut zip, "ppt/tableStyles.xml", parts::TABLE_STYLES.as_bytes(), xml_opts)?;
        add_part(&mut zip, "ppt/theme/theme1.xml", parts::THEME.as_bytes(), xml_opts)?;
        add_part(
            &mut zip,
            "ppt/slideMasters/slideMaster1.xml",
            parts::SLIDE_MASTER.as_bytes(),
            xml_opts,
        )?;
        add_part(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &parts::master_rels()?,
            xml_opts,
        )?;
        add_part(
            &mut zip,
            "ppt/slideLayouts/slideLayout1.xml",
            parts::SLIDE_LAYOUT.as_bytes(),
            xml_opts,
        )?;
        add_part(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &parts::layout_rels()?,
            xml_opts,
        )?;

        for (idx, layout) in layouts.iter().enumerate() {
            let number = idx + 1;
            let placement = Placement::fit(&layout.canvas, &deck);
            if !placement.is_identity() {
                log::warn!(
                    "Slide {} aspect {:.3} differs from deck aspect {:.3}, fitting",
                    number,
                    layout.canvas.aspect_ratio(),
                    deck.aspect_ratio()
                );
            }

            let background = layout.background().ok_or_else(|| {
                Error::InvalidInput(format!("Slide {} has no background object", number))
            })?;
            let (format, media) = to_embeddable(&background.image.data)?;
            let media_name = format!("image{}.{}", number, format.extension());

            add_part(&mut zip, &format!("ppt/media/{}", media_name), &media, media_opts)?;
            add_part(
                &mut zip,
                &format!("ppt/slides/slide{}.xml", number),
                &slide_xml(layout, placement)?,
                xml_opts,
            )?;
            add_part(
                &mut zip,
                &format!("ppt/slides/_rels/slide{}.xml.rels", number),
                &parts::slide_rels(&format!("../media/{}", media_name))?,
                xml_opts,
            )?;

            log::debug!(
                "Wrote slide {} ({} objects, {} background)",
                number,
                layout.objects.len(),
                format.extension()
            );
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))
    }

    /// Write a deck into memory.
    pub fn write_to_vec(&self, layouts: &[SlideLayout]) -> Result<Vec<u8>> {
        Ok(self.write(layouts, Cursor::new(Vec::new()))?.into_inner())
    }

    /// Write a deck to a file, replacing it if present.
    pub fn write_to_path(&self, layouts: &[SlideLayout], path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut out = self.write(layouts, BufWriter::new(file))?;
        out.flush()?;
        Ok(())
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Slide size in EMU, clamped to the range PowerPoint accepts.
fn slide_size(canvas: &CanvasSpec) -> (i64, i64) {
    (
        emu(canvas.width).clamp(MIN_SLIDE_EMU, MAX_SLIDE_EMU),
        emu(canvas.height).clamp(MIN_SLIDE_EMU, MAX_SLIDE_EMU),
    )
}

/// Add one part to the archive.
fn add_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &str,
    content: &[u8],
    options: FileOptions,
) -> Result<()> {
    zip.start_file(path, options)
        .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", path, e)))?;
    zip.write_all(content)
        .map_err(|e| Error::ZipError(format!("Failed to write '{}': {}", path, e)))?;
    Ok(())
}
