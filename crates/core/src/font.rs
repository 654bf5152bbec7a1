//! Font size estimation from box geometry.
//!
//! The detector's own size hint is not trusted; the bounding box height is the
//! most reliable physical signal, so the size is derived from it directly.

use crate::config::LayoutConfig;
use crate::types::TextElement;

/// Estimate a font size in points for `element` laid out in a box of
/// `box_height` canvas units.
///
/// Monotonically increasing in box height, decreasing in line count, never
/// larger for bold text and never below `config.min_font_size`.
pub fn estimate_font_size(element: &TextElement, box_height: f64, config: &LayoutConfig) -> f64 {
    let box_points = box_height * config.points_per_unit;
    let height_per_line = box_points / element.line_count() as f64;

    let fill_ratio = if element.has_container {
        config.container_fill_ratio
    } else {
        config.plain_fill_ratio
    };

    let mut size = height_per_line * fill_ratio;
    if element.is_bold() {
        size *= 1.0 - config.bold_shrink;
    }

    if let Some(hint) = element.font_size_hint {
        log::trace!("Font size hint {} ignored, estimated {:.2}pt", hint, size);
    }

    if size.is_nan() {
        return config.min_font_size;
    }
    size.max(config.min_font_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FontWeight, Region};

    fn element(text: &str) -> TextElement {
        TextElement::new(text, Region::new(0.0, 0.0, 100.0, 100.0))
    }

    #[test]
    fn test_single_line_plain() {
        let config = LayoutConfig::default();
        // 1 inch = 72pt, * 0.85
        let size = estimate_font_size(&element("Hi"), 1.0, &config);
        assert!((size - 61.2).abs() < 1e-9);
    }

    #[test]
    fn test_container_uses_lower_fill_ratio() {
        let config = LayoutConfig::default();
        let plain = element("Hi");
        let boxed = element("Hi").with_container(None, None);
        let a = estimate_font_size(&plain, 1.0, &config);
        let b = estimate_font_size(&boxed, 1.0, &config);
        assert!(b < a);
        assert!((b - 72.0 * 0.70).abs() < 1e-9);
    }

    #[test]
    fn test_monotonic_in_height() {
        let config = LayoutConfig::default();
        let e = element("A\nB");
        let mut previous = 0.0;
        for h in [0.5, 0.8, 1.0, 1.5, 3.0] {
            let size = estimate_font_size(&e, h, &config);
            assert!(size >= previous);
            previous = size;
        }
        assert!(estimate_font_size(&e, 3.0, &config) > estimate_font_size(&e, 1.5, &config));
    }

    #[test]
    fn test_decreasing_in_line_count() {
        let config = LayoutConfig::default();
        let one = estimate_font_size(&element("A"), 2.0, &config);
        let two = estimate_font_size(&element("A\nB"), 2.0, &config);
        let three = estimate_font_size(&element("A\nB\nC"), 2.0, &config);
        assert!(one > two);
        assert!(two > three);
    }

    #[test]
    fn test_bold_never_larger() {
        let config = LayoutConfig::default();
        for h in [0.05, 0.3, 1.0, 4.0] {
            let normal = estimate_font_size(&element("Hello"), h, &config);
            let bold = estimate_font_size(
                &element("Hello").with_font_weight(FontWeight::Bold),
                h,
                &config,
            );
            assert!(bold <= normal);
        }
        let normal = estimate_font_size(&element("Hello"), 1.0, &config);
        let bold = estimate_font_size(
            &element("Hello").with_font_weight(FontWeight::Bold),
            1.0,
            &config,
        );
        assert!((bold - normal * 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_minimum_size_clamp() {
        let config = LayoutConfig::default();
        let size = estimate_font_size(&element("A\nB\nC\nD"), 0.01, &config);
        assert_eq!(size, 9.0);

        let config = LayoutConfig::default().with_min_font_size(14.0);
        assert_eq!(estimate_font_size(&element("A"), 0.01, &config), 14.0);
    }

    #[test]
    fn test_hint_is_not_authoritative() {
        let config = LayoutConfig::default();
        let mut hinted = element("Hi");
        hinted.font_size_hint = Some(900.0);
        assert_eq!(
            estimate_font_size(&hinted, 1.0, &config),
            estimate_font_size(&element("Hi"), 1.0, &config)
        );
    }
}
