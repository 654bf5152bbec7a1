//! PPTX (Office Open XML) backend for reconstructed slide layouts.
//!
//! Writes one slide per [`slide_core::SlideLayout`] into a ZIP package of
//! PresentationML parts, and reads decks back into a shape summary.

pub mod inspect;
pub mod parts;
pub mod shapes;
pub mod units;
pub mod writer;
mod xml;

pub use inspect::{DeckSummary, PptxInspector, ShapeKind, ShapeSummary, SlideSummary};
pub use writer::PptxWriter;
