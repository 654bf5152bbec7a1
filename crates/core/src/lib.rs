//! Layout reconstruction for slide images.
//!
//! Takes the text regions a vision service detected in a slide image and
//! rebuilds them as absolutely positioned, styled objects on a canvas that
//! matches the image's aspect ratio.

pub mod color;
pub mod config;
pub mod detect;
pub mod error;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod normalize;
pub mod pipeline;
pub mod slide;
pub mod source;
pub mod style;
pub mod types;

pub use color::{resolve_color, HexColor};
pub use config::{LayoutConfig, PipelineConfig};
pub use detect::{parse_detections, Detector, SidecarDetector};
pub use error::{Error, Result};
pub use font::estimate_font_size;
pub use geometry::{project_region, CanvasSpec, Rect};
pub use layout::{compute_canvas, LayoutEngine};
pub use normalize::TextNormalizer;
pub use pipeline::{ImageOutcome, Pipeline};
pub use slide::{
    Background, BackgroundOrigin, ContainerBox, ImageRef, PlainText, SlideLayout, SlideObject,
    TextContent,
};
pub use source::SourceImage;
pub use types::{Alignment, FontFamily, FontStyle, FontWeight, Region, TextElement};
