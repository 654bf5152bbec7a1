//! Package-level parts of a deck: content types, relationships, presentation,
//! and the fixed master/layout/theme every slide hangs off.

use slide_core::Result;

use crate::xml::{XmlPart, NS_A, NS_P, NS_R, NS_RELS};

const CT_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_EXT_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_PRES_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
const REL_VIEW_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
const REL_TABLE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
pub const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Relationship ids in `presentation.xml.rels` before the first slide.
const FIXED_PRESENTATION_RELS: usize = 5;

/// Relationship id of slide `index` (0-based) in `presentation.xml.rels`.
pub fn slide_rel_id(index: usize) -> String {
    format!("rId{}", FIXED_PRESENTATION_RELS + 1 + index)
}

/// One `<Relationship>` entry.
pub struct Relationship<'a> {
    pub id: String,
    pub rel_type: &'a str,
    pub target: String,
}

/// Serialize a relationships part.
pub fn relationships(rels: &[Relationship<'_>]) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.open("Relationships", &[("xmlns", NS_RELS)])?;
    for rel in rels {
        part.empty(
            "Relationship",
            &[
                ("Id", rel.id.as_str()),
                ("Type", rel.rel_type),
                ("Target", rel.target.as_str()),
            ],
        )?;
    }
    part.close("Relationships")?;
    Ok(part.finish())
}

/// `[Content_Types].xml` for a deck with `slide_count` slides.
pub fn content_types(slide_count: usize) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.open("Types", &[("xmlns", CT_NS)])?;

    let defaults = [
        ("rels", "application/vnd.openxmlformats-package.relationships+xml"),
        ("xml", "application/xml"),
        ("png", "image/png"),
        ("jpeg", "image/jpeg"),
    ];
    for (ext, ct) in defaults {
        part.empty("Default", &[("Extension", ext), ("ContentType", ct)])?;
    }

    let overrides = [
        (
            "/ppt/presentation.xml",
            "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
        ),
        (
            "/ppt/slideMasters/slideMaster1.xml",
            "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml",
        ),
        (
            "/ppt/slideLayouts/slideLayout1.xml",
            "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml",
        ),
        (
            "/ppt/theme/theme1.xml",
            "application/vnd.openxmlformats-officedocument.theme+xml",
        ),
        (
            "/ppt/presProps.xml",
            "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml",
        ),
        (
            "/ppt/viewProps.xml",
            "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml",
        ),
        (
            "/ppt/tableStyles.xml",
            "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml",
        ),
        (
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml",
        ),
        (
            "/docProps/app.xml",
            "application/vnd.openxmlformats-officedocument.extended-properties+xml",
        ),
    ];
    for (name, ct) in overrides {
        part.empty("Override", &[("PartName", name), ("ContentType", ct)])?;
    }

    for n in 1..=slide_count {
        let name = format!("/ppt/slides/slide{}.xml", n);
        part.empty(
            "Override",
            &[
                ("PartName", name.as_str()),
                (
                    "ContentType",
                    "application/vnd.openxmlformats-officedocument.presentationml.slide+xml",
                ),
            ],
        )?;
    }

    part.close("Types")?;
    Ok(part.finish())
}

/// `_rels/.rels`.
pub fn package_rels() -> Result<Vec<u8>> {
    relationships(&[
        Relationship {
            id: "rId1".to_string(),
            rel_type: REL_OFFICE_DOCUMENT,
            target: "ppt/presentation.xml".to_string(),
        },
        Relationship {
            id: "rId2".to_string(),
            rel_type: REL_CORE_PROPS,
            target: "docProps/core.xml".to_string(),
        },
        Relationship {
            id: "rId3".to_string(),
            rel_type: REL_EXT_PROPS,
            target: "docProps/app.xml".to_string(),
        },
    ])
}

/// `ppt/_rels/presentation.xml.rels`.
pub fn presentation_rels(slide_count: usize) -> Result<Vec<u8>> {
    let mut rels = vec![
        Relationship {
            id: "rId1".to_string(),
            rel_type: REL_SLIDE_MASTER,
            target: "slideMasters/slideMaster1.xml".to_string(),
        },
        Relationship {
            id: "rId2".to_string(),
            rel_type: REL_PRES_PROPS,
            target: "presProps.xml".to_string(),
        },
        Relationship {
            id: "rId3".to_string(),
            rel_type: REL_VIEW_PROPS,
            target: "viewProps.xml".to_string(),
        },
        Relationship {
            id: "rId4".to_string(),
            rel_type: REL_THEME,
            target: "theme/theme1.xml".to_string(),
        },
        Relationship {
            id: "rId5".to_string(),
            rel_type: REL_TABLE_STYLES,
            target: "tableStyles.xml".to_string(),
        },
    ];
    for idx in 0..slide_count {
        rels.push(Relationship {
            id: slide_rel_id(idx),
            rel_type: REL_SLIDE,
            target: format!("slides/slide{}.xml", idx + 1),
        });
    }
    relationships(&rels)
}

/// `ppt/presentation.xml` with the given slide size in EMU.
pub fn presentation(slide_count: usize, cx: i64, cy: i64) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.open(
        "p:presentation",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("saveSubsetFonts", "1"),
        ],
    )?;

    part.open("p:sldMasterIdLst", &[])?;
    part.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?;
    part.close("p:sldMasterIdLst")?;

    part.open("p:sldIdLst", &[])?;
    for idx in 0..slide_count {
        let id = (256 + idx).to_string();
        let rel = slide_rel_id(idx);
        part.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel.as_str())])?;
    }
    part.close("p:sldIdLst")?;

    let (cx, cy) = (cx.to_string(), cy.to_string());
    part.empty("p:sldSz", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    part.empty("p:notesSz", &[("cx", "6858000"), ("cy", "9144000")])?;

    part.close("p:presentation")?;
    Ok(part.finish())
}

/// `docProps/core.xml`.
pub fn core_properties(title: &str) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.open(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    part.text_element("dc:title", &[], title)?;
    part.text_element("dc:creator", &[], "slide-rebuild")?;
    part.close("cp:coreProperties")?;
    Ok(part.finish())
}

/// `docProps/app.xml`.
pub fn app_properties(slide_count: usize) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.open(
        "Properties",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
        )],
    )?;
    part.text_element("Application", &[], "slide-rebuild")?;
    part.text_element("Slides", &[], &slide_count.to_string())?;
    part.close("Properties")?;
    Ok(part.finish())
}

/// `ppt/slideMasters/_rels/slideMaster1.xml.rels`.
pub fn master_rels() -> Result<Vec<u8>> {
    relationships(&[
        Relationship {
            id: "rId1".to_string(),
            rel_type: REL_SLIDE_LAYOUT,
            target: "../slideLayouts/slideLayout1.xml".to_string(),
        },
        Relationship {
            id: "rId2".to_string(),
            rel_type: REL_THEME,
            target: "../theme/theme1.xml".to_string(),
        },
    ])
}

/// `ppt/slideLayouts/_rels/slideLayout1.xml.rels`.
pub fn layout_rels() -> Result<Vec<u8>> {
    relationships(&[Relationship {
        id: "rId1".to_string(),
        rel_type: REL_SLIDE_MASTER,
        target: "../slideMasters/slideMaster1.xml".to_string(),
    }])
}

/// Relationships of one slide: its layout and its background image.
pub fn slide_rels(media_target: &str) -> Result<Vec<u8>> {
    relationships(&[
        Relationship {
            id: "rId1".to_string(),
            rel_type: REL_SLIDE_LAYOUT,
            target: "../slideLayouts/slideLayout1.xml".to_string(),
        },
        Relationship {
            id: "rId2".to_string(),
            rel_type: REL_IMAGE,
            target: media_target.to_string(),
        },
    ])
}

pub const SLIDE_MASTER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst><p:txStyles><p:titleStyle><a:lvl1pPr><a:defRPr sz="4400"/></a:lvl1pPr></p:titleStyle><p:bodyStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:bodyStyle><p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:otherStyle></p:txStyles></p:sldMaster>"#;

pub const SLIDE_LAYOUT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

pub const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="44546A"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2><a:accent1><a:srgbClr val="4472C4"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#;

pub const PRES_PROPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentationPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#;

pub const VIEW_PROPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:viewPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#;

pub const TABLE_STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" def="{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}"/>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_rel_ids_follow_fixed_parts() {
        assert_eq!(slide_rel_id(0), "rId6");
        assert_eq!(slide_rel_id(4), "rId10");
    }

    #[test]
    fn test_content_types_lists_slides() {
        let xml = String::from_utf8(content_types(2).unwrap()).unwrap();
        assert!(xml.contains("PartName=\"/ppt/slides/slide1.xml\""));
        assert!(xml.contains("PartName=\"/ppt/slides/slide2.xml\""));
        assert!(!xml.contains("slide3.xml"));
        assert!(xml.contains("Extension=\"png\""));
    }

    #[test]
    fn test_presentation_size_and_ids() {
        let xml = String::from_utf8(presentation(2, 9_144_000, 5_143_500).unwrap()).unwrap();
        assert!(xml.contains("<p:sldSz cx=\"9144000\" cy=\"5143500\"/>"));
        assert!(xml.contains("<p:sldId id=\"256\" r:id=\"rId6\"/>"));
        assert!(xml.contains("<p:sldId id=\"257\" r:id=\"rId7\"/>"));
    }

    #[test]
    fn test_core_properties_escape_title() {
        let xml = String::from_utf8(core_properties("Q&A").unwrap()).unwrap();
        assert!(xml.contains("<dc:title>Q&amp;A</dc:title>"));
    }
}
