//! Container geometry and styling.
//!
//! Elements with a container become rounded, filled boxes with generous
//! padding; elements without one become bare text boxes grown just enough to
//! avoid clipping glyphs.

use crate::color::{resolve_color, resolve_color_or, HexColor};
use crate::config::LayoutConfig;
use crate::font::estimate_font_size;
use crate::geometry::Rect;
use crate::slide::{
    Border, ContainerBox, Fill, Outline, PlainText, ResolvedFont, Shadow, SlideObject, TextContent,
};
use crate::types::TextElement;

/// Inflate a projected box for a container: each side grows by a fraction of
/// the box dimension, floored at the configured minimum padding.
pub fn container_frame(projected: &Rect, config: &LayoutConfig) -> Rect {
    let dx = (projected.w * config.container_padding).max(config.min_padding);
    let dy = (projected.h * config.container_padding).max(config.min_padding);
    projected.padded(dx, dy)
}

/// Inflate a projected box without a container by a fixed factor.
pub fn plain_frame(projected: &Rect, config: &LayoutConfig) -> Rect {
    projected.scaled_about_center(1.0 + config.plain_inflation)
}

/// Transparency percentage for a container opacity. Absent opacity is solid.
pub fn container_transparency(opacity: Option<f64>) -> f64 {
    match opacity {
        Some(o) if o.is_finite() => (1.0 - o.clamp(0.0, 1.0)) * 100.0,
        _ => 0.0,
    }
}

/// Resolve the text run styling shared by both variants.
pub fn text_content(element: &TextElement, font_size: f64, config: &LayoutConfig) -> TextContent {
    let color = resolve_color(&element.text_color).snapped(&config.color_snap);
    let outline = element.stroke_color.as_deref().map(|stroke| Outline {
        color: resolve_color(stroke).snapped(&config.color_snap),
        width: config.outline_width,
    });

    TextContent {
        text: element.text.clone(),
        font: ResolvedFont {
            face: element.font_family.typeface().to_string(),
            size: font_size,
            bold: element.is_bold(),
            italic: element.is_italic(),
            color,
        },
        alignment: element.alignment,
        outline,
    }
}

/// Turn one element and its projected box into a styled slide object.
pub fn style_element(element: &TextElement, projected: &Rect, config: &LayoutConfig) -> SlideObject {
    let font_size = estimate_font_size(element, projected.h, config);
    let content = text_content(element, font_size, config);

    if !element.has_container {
        return SlideObject::PlainText(PlainText {
            frame: plain_frame(projected, config),
            content,
        });
    }

    let fill_color = resolve_color_or(element.container_color.as_deref(), HexColor::WHITE)
        .snapped(&config.color_snap);

    SlideObject::ContainerBox(ContainerBox {
        frame: container_frame(projected, config),
        content,
        fill: Fill {
            color: fill_color,
            transparency: container_transparency(element.container_opacity),
        },
        border: Border {
            color: config.border.color,
            width: config.border.width,
        },
        shadow: Shadow {
            color: config.shadow.color,
            transparency: config.shadow.transparency,
            blur: config.shadow.blur,
            offset: config.shadow.offset,
            angle: config.shadow.angle,
        },
        corner_radius: config.corner_radius,
    })
}
