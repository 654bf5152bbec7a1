//! Source images and image probing.

use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};

/// One input image of a batch.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Display name, usually the file name.
    pub name: String,
    /// Where the image was read from, if it came from disk.
    pub path: Option<PathBuf>,
    /// Encoded image bytes.
    pub data: Arc<Vec<u8>>,
}

impl SourceImage {
    /// Wrap in-memory image bytes.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            path: None,
            data: Arc::new(data),
        }
    }

    /// Read an image from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        Ok(Self {
            name,
            path: Some(path.to_path_buf()),
            data: Arc::new(data),
        })
    }

    /// Pixel width and height, read from the image header.
    pub fn dimensions(&self) -> Result<(u32, u32)> {
        image_dimensions(&self.data)
    }
}

/// Read pixel dimensions from encoded image bytes without decoding pixels.
pub fn image_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| Error::Image(format!("Failed to sniff image format: {}", e)))?;
    Ok(reader.into_dimensions()?)
}

/// Encoded format of an image as far as a presentation package cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    Png,
    Jpeg,
}

impl MediaFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Return image bytes in a format every presentation reader accepts,
/// transcoding to PNG when the input is anything but PNG or JPEG.
///
/// The image is always fully decoded, so bytes with a readable header but a
/// corrupt body are rejected here.
pub fn to_embeddable(data: &[u8]) -> Result<(MediaFormat, Vec<u8>)> {
    let format = image::guess_format(data)?;
    let decoded = image::load_from_memory_with_format(data, format)?;
    match format {
        ImageFormat::Png => Ok((MediaFormat::Png, data.to_vec())),
        ImageFormat::Jpeg => Ok((MediaFormat::Jpeg, data.to_vec())),
        other => {
            log::debug!("Transcoding {:?} background to PNG", other);
            let mut out = Cursor::new(Vec::new());
            decoded.write_to(&mut out, ImageFormat::Png)?;
            Ok((MediaFormat::Png, out.into_inner()))
        }
    }
}

#[cfg(test)]
pub(crate) fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// A noisy PNG cut off inside its pixel data: the header still parses, the
/// pixels do not.
#[cfg(test)]
pub(crate) fn truncated_png_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 37 + y * 11) as u8, (x * y) as u8, (x ^ y) as u8])
    });
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    let mut data = out.into_inner();
    data.truncate(data.len() * 3 / 5);
    data
}
