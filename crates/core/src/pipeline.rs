//! Batch reconstruction.
//!
//! Each image is an independent unit of work: probe, detect (with retries),
//! clean the background (falling back to the source image), reconstruct.
//! Units run on a bounded rayon pool and one image's failure never affects
//! its siblings.

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::time::Duration;

use crate::config::PipelineConfig;
use crate::detect::Detector;
use crate::error::{Error, Result};
use crate::layout::LayoutEngine;
use crate::slide::{BackgroundOrigin, ImageRef, SlideLayout};
use crate::source::{to_embeddable, SourceImage};
use crate::types::TextElement;

/// Result of reconstructing one image of a batch.
#[derive(Debug)]
pub struct ImageOutcome {
    /// Name of the source image.
    pub name: String,
    /// The reconstructed slide, or why this image failed.
    pub result: Result<SlideLayout>,
}

impl ImageOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs the per-image pipeline over a batch of images.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    engine: LayoutEngine,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(engine: LayoutEngine, config: PipelineConfig) -> Self {
        Self { engine, config }
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    /// Process every image, at most `window` at a time.
    ///
    /// Outcomes are returned in input order. The only error is failing to
    /// start the worker pool; per-image failures are inside the outcomes.
    pub fn run<D>(&self, detector: &D, images: &[SourceImage]) -> Result<Vec<ImageOutcome>>
    where
        D: Detector + ?Sized,
    {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.window.max(1))
            .build()
            .map_err(|e| Error::WorkerPool(e.to_string()))?;

        let outcomes: Vec<ImageOutcome> = pool.install(|| {
            images
                .par_iter()
                .map(|image| ImageOutcome {
                    name: image.name.clone(),
                    result: self.process_image(detector, image),
                })
                .collect()
        });

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        log::info!(
            "Processed {} images ({} failed)",
            outcomes.len(),
            failed
        );

        Ok(outcomes)
    }

    /// Run the full pipeline for a single image.
    pub fn process_image<D>(&self, detector: &D, image: &SourceImage) -> Result<SlideLayout>
    where
        D: Detector + ?Sized,
    {
        let (width, height) = image.dimensions()?;
        log::debug!("{}: {}x{} px", image.name, width, height);

        let elements = self.detect_with_retry(detector, image)?;
        let background = self.resolve_background(detector, image)?;

        let layout = self.engine.reconstruct(
            &elements,
            f64::from(width),
            f64::from(height),
            background,
        )?;

        log::debug!(
            "{}: {} text objects on {:.3}x{:.3} canvas",
            image.name,
            elements.len(),
            layout.canvas.width,
            layout.canvas.height
        );
        Ok(layout)
    }

    fn detect_with_retry<D>(&self, detector: &D, image: &SourceImage) -> Result<Vec<TextElement>>
    where
        D: Detector + ?Sized,
    {
        let attempts = self.config.detect_attempts.max(1);
        let mut attempt = 1;
        loop {
            match detector.detect(image) {
                Ok(elements) => return Ok(elements),
                Err(e) if attempt < attempts => {
                    log::warn!(
                        "{}: detection attempt {}/{} failed: {}",
                        image.name,
                        attempt,
                        attempts,
                        e
                    );
                    if self.config.retry_backoff_ms > 0 {
                        std::thread::sleep(Duration::from_millis(
                            self.config.retry_backoff_ms * attempt as u64,
                        ));
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Cleaned background when available and fully decodable, else the
    /// source. Either way the stored bytes are ready to embed in a deck.
    fn resolve_background<D>(&self, detector: &D, image: &SourceImage) -> Result<ImageRef>
    where
        D: Detector + ?Sized,
    {
        match detector.clean_background(image) {
            Ok(bytes) => match to_embeddable(&bytes) {
                Ok((_, embeddable)) => {
                    return Ok(ImageRef::new(embeddable, BackgroundOrigin::Cleaned))
                }
                Err(e) => log::warn!(
                    "{}: cleaned background unreadable ({}), using source image",
                    image.name,
                    e
                ),
            },
            Err(e) => log::warn!("{}: {}, using source image", image.name, e),
        }

        let (_, embeddable) = to_embeddable(&image.data)?;
        Ok(ImageRef::new(embeddable, BackgroundOrigin::Source))
    }
}
