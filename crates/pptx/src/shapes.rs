//! Slide part generation: one `<p:pic>` for the background and one `<p:sp>`
//! per text object, in paint order.

use slide_core::normalize::sanitize_xml_text;
use slide_core::slide::{Background, ContainerBox, PlainText, TextContent};
use slide_core::types::Alignment;
use slide_core::{CanvasSpec, Rect, Result, SlideLayout, SlideObject};

use crate::units::{alpha, angle, emu, font_hundredths, pt_emu, round_rect_adjust};
use crate::xml::{XmlPart, NS_A, NS_P, NS_R};

/// Relationship id of the background image inside every slide part.
pub const BACKGROUND_REL_ID: &str = "rId2";

/// Uniform scale and offset that fits a layout's canvas inside the deck's
/// slide size, centred.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Placement {
    pub const IDENTITY: Placement = Placement {
        scale: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    /// Fit `canvas` into `deck` without distorting it.
    pub fn fit(canvas: &CanvasSpec, deck: &CanvasSpec) -> Self {
        let scale = (deck.width / canvas.width).min(deck.height / canvas.height);
        Self {
            scale,
            dx: (deck.width - canvas.width * scale) / 2.0,
            dy: (deck.height - canvas.height * scale) / 2.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        (self.scale - 1.0).abs() < 1e-6 && self.dx.abs() < 1e-6 && self.dy.abs() < 1e-6
    }

    pub fn rect(&self, r: &Rect) -> Rect {
        Rect::new(
            r.x * self.scale + self.dx,
            r.y * self.scale + self.dy,
            r.w * self.scale,
            r.h * self.scale,
        )
    }
}

/// Serialize one slide part.
pub fn slide_xml(layout: &SlideLayout, placement: Placement) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.open(
        "p:sld",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    part.open("p:cSld", &[])?;
    part.open("p:spTree", &[])?;
    group_header(&mut part)?;

    let mut text_index = 0;
    for (idx, object) in layout.objects.iter().enumerate() {
        let id = (idx + 2).to_string();
        match object {
            SlideObject::Background(bg) => background(&mut part, &id, bg, placement)?,
            SlideObject::PlainText(text) => {
                text_index += 1;
                plain_text(&mut part, &id, text_index, text, placement)?
            }
            SlideObject::ContainerBox(boxed) => {
                text_index += 1;
                container_box(&mut part, &id, text_index, boxed, placement)?
            }
        }
    }

    part.close("p:spTree")?;
    part.close("p:cSld")?;
    part.open("p:clrMapOvr", &[])?;
    part.empty("a:masterClrMapping", &[])?;
    part.close("p:clrMapOvr")?;
    part.close("p:sld")?;
    Ok(part.finish())
}

fn group_header(part: &mut XmlPart) -> Result<()> {
    part.open("p:nvGrpSpPr", &[])?;
    part.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    part.empty("p:cNvGrpSpPr", &[])?;
    part.empty("p:nvPr", &[])?;
    part.close("p:nvGrpSpPr")?;
    part.open("p:grpSpPr", &[])?;
    part.open("a:xfrm", &[])?;
    part.empty("a:off", &[("x", "0"), ("y", "0")])?;
    part.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    part.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    part.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    part.close("a:xfrm")?;
    part.close("p:grpSpPr")
}

fn xfrm(part: &mut XmlPart, frame: &Rect) -> Result<()> {
    let (x, y) = (emu(frame.x).to_string(), emu(frame.y).to_string());
    let (cx, cy) = (emu(frame.w).max(1).to_string(), emu(frame.h).max(1).to_string());
    part.open("a:xfrm", &[])?;
    part.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
    part.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    part.close("a:xfrm")
}

fn solid_fill(part: &mut XmlPart, color: &str, alpha_val: Option<u32>) -> Result<()> {
    part.open("a:solidFill", &[])?;
    match alpha_val {
        Some(a) if a < 100_000 => {
            part.open("a:srgbClr", &[("val", color)])?;
            part.empty("a:alpha", &[("val", a.to_string().as_str())])?;
            part.close("a:srgbClr")?;
        }
        _ => part.empty("a:srgbClr", &[("val", color)])?,
    }
    part.close("a:solidFill")
}

fn background(part: &mut XmlPart, id: &str, bg: &Background, placement: Placement) -> Result<()> {
    part.open("p:pic", &[])?;
    part.open("p:nvPicPr", &[])?;
    part.empty("p:cNvPr", &[("id", id), ("name", "Background")])?;
    part.open("p:cNvPicPr", &[])?;
    part.empty(
        "a:picLocks",
        &[
            ("noGrp", "1"),
            ("noSelect", "1"),
            ("noMove", "1"),
            ("noResize", "1"),
            ("noChangeAspect", "1"),
        ],
    )?;
    part.close("p:cNvPicPr")?;
    part.empty("p:nvPr", &[])?;
    part.close("p:nvPicPr")?;

    part.open("p:blipFill", &[])?;
    part.empty("a:blip", &[("r:embed", BACKGROUND_REL_ID)])?;
    part.open("a:stretch", &[])?;
    part.empty("a:fillRect", &[])?;
    part.close("a:stretch")?;
    part.close("p:blipFill")?;

    part.open("p:spPr", &[])?;
    xfrm(part, &placement.rect(&bg.frame))?;
    part.open("a:prstGeom", &[("prst", "rect")])?;
    part.empty("a:avLst", &[])?;
    part.close("a:prstGeom")?;
    part.close("p:spPr")?;
    part.close("p:pic")
}

fn shape_header(part: &mut XmlPart, id: &str, name: &str, text_box: bool) -> Result<()> {
    part.open("p:nvSpPr", &[])?;
    part.empty("p:cNvPr", &[("id", id), ("name", name)])?;
    if text_box {
        part.empty("p:cNvSpPr", &[("txBox", "1")])?;
    } else {
        part.empty("p:cNvSpPr", &[])?;
    }
    part.empty("p:nvPr", &[])?;
    part.close("p:nvSpPr")
}

fn plain_text(
    part: &mut XmlPart,
    id: &str,
    index: usize,
    text: &PlainText,
    placement: Placement,
) -> Result<()> {
    part.open("p:sp", &[])?;
    shape_header(part, id, &format!("Text {}", index), true)?;

    part.open("p:spPr", &[])?;
    xfrm(part, &placement.rect(&text.frame))?;
    part.open("a:prstGeom", &[("prst", "rect")])?;
    part.empty("a:avLst", &[])?;
    part.close("a:prstGeom")?;
    part.empty("a:noFill", &[])?;
    part.close("p:spPr")?;

    text_body(part, &text.content, placement.scale)?;
    part.close("p:sp")
}

fn container_box(
    part: &mut XmlPart,
    id: &str,
    index: usize,
    boxed: &ContainerBox,
    placement: Placement,
) -> Result<()> {
    let frame = placement.rect(&boxed.frame);

    part.open("p:sp", &[])?;
    shape_header(part, id, &format!("Container {}", index), false)?;

    part.open("p:spPr", &[])?;
    xfrm(part, &frame)?;
    part.open("a:prstGeom", &[("prst", "roundRect")])?;
    part.open("a:avLst", &[])?;
    let adj = format!(
        "val {}",
        round_rect_adjust(boxed.corner_radius * placement.scale, frame.w, frame.h)
    );
    part.empty("a:gd", &[("name", "adj"), ("fmla", adj.as_str())])?;
    part.close("a:avLst")?;
    part.close("a:prstGeom")?;

    solid_fill(
        part,
        &boxed.fill.color.to_string(),
        Some(alpha(boxed.fill.transparency)),
    )?;

    let border_w = pt_emu(boxed.border.width).to_string();
    part.open("a:ln", &[("w", border_w.as_str())])?;
    solid_fill(part, &boxed.border.color.to_string(), None)?;
    part.close("a:ln")?;

    let blur = pt_emu(boxed.shadow.blur).to_string();
    let dist = pt_emu(boxed.shadow.offset).to_string();
    let dir = angle(boxed.shadow.angle).to_string();
    part.open("a:effectLst", &[])?;
    part.open(
        "a:outerShdw",
        &[
            ("blurRad", blur.as_str()),
            ("dist", dist.as_str()),
            ("dir", dir.as_str()),
            ("algn", "tl"),
            ("rotWithShape", "0"),
        ],
    )?;
    part.open("a:srgbClr", &[("val", boxed.shadow.color.to_string().as_str())])?;
    part.empty(
        "a:alpha",
        &[("val", alpha(boxed.shadow.transparency).to_string().as_str())],
    )?;
    part.close("a:srgbClr")?;
    part.close("a:outerShdw")?;
    part.close("a:effectLst")?;
    part.close("p:spPr")?;

    text_body(part, &boxed.content, placement.scale)?;
    part.close("p:sp")
}

fn align_attr(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "l",
        Alignment::Center => "ctr",
        Alignment::Right => "r",
    }
}

fn text_body(part: &mut XmlPart, content: &TextContent, scale: f64) -> Result<()> {
    part.open("p:txBody", &[])?;
    part.open(
        "a:bodyPr",
        &[
            ("wrap", "square"),
            ("lIns", "0"),
            ("tIns", "0"),
            ("rIns", "0"),
            ("bIns", "0"),
            ("rtlCol", "0"),
            ("anchor", "ctr"),
        ],
    )?;
    part.empty("a:noAutofit", &[])?;
    part.close("a:bodyPr")?;
    part.empty("a:lstStyle", &[])?;

    let size = font_hundredths(content.font.size * scale).to_string();
    let color = content.font.color.to_string();
    let bold = if content.font.bold { "1" } else { "0" };
    let italic = if content.font.italic { "1" } else { "0" };
    let run_attrs = [
        ("lang", "en-US"),
        ("sz", size.as_str()),
        ("b", bold),
        ("i", italic),
        ("dirty", "0"),
    ];

    // Text built without the normalizer may still carry control characters.
    let text = sanitize_xml_text(&content.text);
    for line in text.split('\n') {
        part.open("a:p", &[])?;
        part.empty("a:pPr", &[("algn", align_attr(content.alignment))])?;
        if line.is_empty() {
            part.empty("a:endParaRPr", &[("lang", "en-US"), ("sz", size.as_str())])?;
        } else {
            part.open("a:r", &[])?;
            part.open("a:rPr", &run_attrs)?;
            if let Some(outline) = &content.outline {
                let w = pt_emu(outline.width).to_string();
                part.open("a:ln", &[("w", w.as_str())])?;
                solid_fill(part, &outline.color.to_string(), None)?;
                part.close("a:ln")?;
            }
            solid_fill(part, &color, None)?;
            part.empty("a:latin", &[("typeface", content.font.face.as_str())])?;
            part.empty("a:cs", &[("typeface", content.font.face.as_str())])?;
            part.close("a:rPr")?;
            part.text_element("a:t", &[], line)?;
            part.close("a:r")?;
        }
        part.close("a:p")?;
    }

    part.close("p:txBody")
}
