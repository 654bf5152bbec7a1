//! Detection adapter.
//!
//! The vision service that finds text regions and paints a text-free
//! background is an external collaborator. It is modelled as the [`Detector`]
//! trait; this module also owns the service's JSON wire format and a
//! file-backed implementation that reads pre-computed results from disk.

use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::normalize::TextNormalizer;
use crate::source::SourceImage;
use crate::types::TextElement;

/// Image extensions tried when looking for a cleaned background.
const BACKGROUND_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Source of text detections and cleaned backgrounds.
///
/// Implementations must be shareable across worker threads; each image is
/// handled by exactly one call of each method per attempt.
pub trait Detector: Send + Sync {
    /// Detect text elements in reading/paint order.
    fn detect(&self, image: &SourceImage) -> Result<Vec<TextElement>>;

    /// Produce the image with all text removed.
    fn clean_background(&self, image: &SourceImage) -> Result<Vec<u8>>;
}

/// Parse a detection service response into validated text elements.
///
/// Accepts a bare array or an object with an `elements` array, optionally
/// wrapped in a Markdown code fence. Entries that fail to deserialize or
/// whose text is blank after normalization are skipped with a warning.
pub fn parse_detections(payload: &str, normalizer: &TextNormalizer) -> Result<Vec<TextElement>> {
    let value: Value = serde_json::from_str(strip_code_fence(payload))?;

    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("elements") {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(Error::Detection(
                    "Detection response has no `elements` array".to_string(),
                ))
            }
        },
        _ => {
            return Err(Error::Detection(
                "Detection response is neither an array nor an object".to_string(),
            ))
        }
    };

    let mut elements = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.into_iter().enumerate() {
        let mut element: TextElement = match serde_json::from_value(entry) {
            Ok(element) => element,
            Err(e) => {
                log::warn!("Skipping detection entry {}: {}", idx, e);
                continue;
            }
        };

        element.text = normalizer.normalize(&element.text);
        if element.text.is_empty() {
            log::debug!("Skipping detection entry {}: blank text", idx);
            continue;
        }
        if let Some(opacity) = element.container_opacity {
            element.container_opacity = opacity.is_finite().then(|| opacity.clamp(0.0, 1.0));
        }

        elements.push(element);
    }

    Ok(elements)
}

/// Remove a surrounding ```` ``` ```` / ```` ```json ```` fence, if present.
fn strip_code_fence(payload: &str) -> &str {
    let trimmed = payload.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// Detector backed by files produced ahead of time.
///
/// For `photo.png` it reads detections from `photo.json` and the cleaned
/// background from `photo.clean.png` (or `.jpg`, `.jpeg`, `.webp`), either next
/// to the image or inside a dedicated directory.
#[derive(Debug, Clone, Default)]
pub struct SidecarDetector {
    directory: Option<PathBuf>,
    normalizer: TextNormalizer,
}

impl SidecarDetector {
    /// Look for sidecar files next to each image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look for sidecar files in `directory` instead.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Path of a sidecar for `image` with the given suffix, e.g. `json`.
    fn sidecar_path(&self, image: &SourceImage, suffix: &str) -> Result<PathBuf> {
        let stem = match &image.path {
            Some(path) => path.file_stem().and_then(|s| s.to_str()),
            None => Path::new(&image.name).file_stem().and_then(|s| s.to_str()),
        }
        .ok_or_else(|| Error::InvalidInput(format!("No file stem for {}", image.name)))?;

        let dir = match (&self.directory, &image.path) {
            (Some(dir), _) => dir.clone(),
            (None, Some(path)) => path.parent().map(Path::to_path_buf).unwrap_or_default(),
            (None, None) => PathBuf::new(),
        };

        Ok(dir.join(format!("{}.{}", stem, suffix)))
    }
}

impl Detector for SidecarDetector {
    fn detect(&self, image: &SourceImage) -> Result<Vec<TextElement>> {
        let path = self.sidecar_path(image, "json")?;
        let payload = std::fs::read_to_string(&path).map_err(|e| {
            Error::Detection(format!("Failed to read {}: {}", path.display(), e))
        })?;
        parse_detections(&payload, &self.normalizer)
    }

    fn clean_background(&self, image: &SourceImage) -> Result<Vec<u8>> {
        for ext in BACKGROUND_EXTENSIONS {
            let path = self.sidecar_path(image, &format!("clean.{}", ext))?;
            if path.is_file() {
                return std::fs::read(&path).map_err(|e| {
                    Error::Background(format!("Failed to read {}: {}", path.display(), e))
                });
            }
        }
        Err(Error::Background(format!(
            "No cleaned background found for {}",
            image.name
        )))
    }
}
