//! One-slide 16:9 presentation writer.
//!
//! Emits the smallest package PowerPoint opens cleanly: one master, one blank
//! layout, one theme and a single slide of positioned text boxes.

use std::fmt::Write as _;

use crate::render::package::{write_package, xml_text, XML_DECLARATION};
use crate::sales::slide::SlideContent;

pub const PPTX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

const SLIDE_CX: i64 = 12_192_000;
const SLIDE_CY: i64 = 6_858_000;
const MARGIN: i64 = 457_200;
const COLUMN_GAP: i64 = 365_760;

const ACCENT: &str = "1F4E79";
const MUTED: &str = "595959";

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/></Types>"#;

const EMPTY_TREE: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

const THEME: &str = r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Profile"><a:themeElements><a:clrScheme name="Profile"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F4E79"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2><a:accent1><a:srgbClr val="1F4E79"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Profile"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Profile"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;

/// A paragraph inside a text box. Sizes are hundredths of a point.
struct Para<'a> {
    text: &'a str,
    size: u32,
    bold: bool,
    color: Option<&'a str>,
    bullet: bool,
}

impl<'a> Para<'a> {
    fn text(text: &'a str, size: u32) -> Self {
        Para {
            text,
            size,
            bold: false,
            color: None,
            bullet: false,
        }
    }

    fn heading(text: &'a str) -> Self {
        Para {
            bold: true,
            color: Some(ACCENT),
            ..Para::text(text, 1600)
        }
    }

    fn bullet(text: &'a str) -> Self {
        Para {
            bullet: true,
            ..Para::text(text, 1200)
        }
    }
}

struct SlideTree {
    shapes: String,
    next_id: u32,
}

impl SlideTree {
    fn new() -> Self {
        // id 1 belongs to the group shape.
        Self {
            shapes: String::new(),
            next_id: 2,
        }
    }

    fn text_box(&mut self, name: &str, x: i64, y: i64, cx: i64, cy: i64, paras: &[Para]) {
        let id = self.next_id;
        self.next_id += 1;

        let _ = write!(
            self.shapes,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#,
            name = xml_text(name),
        );
        if paras.is_empty() {
            self.shapes.push_str("<a:p><a:endParaRPr lang=\"en-US\"/></a:p>");
        }
        for para in paras {
            self.paragraph(para);
        }
        self.shapes.push_str("</p:txBody></p:sp>");
    }

    fn paragraph(&mut self, para: &Para) {
        self.shapes.push_str("<a:p>");
        if para.bullet {
            self.shapes
                .push_str(r#"<a:pPr marL="228600" indent="-228600"><a:buChar char="&#8226;"/></a:pPr>"#);
        }
        let _ = write!(
            self.shapes,
            r#"<a:r><a:rPr lang="en-US" sz="{}" b="{}" dirty="0">"#,
            para.size,
            u8::from(para.bold)
        );
        if let Some(color) = para.color {
            let _ = write!(self.shapes, r#"<a:solidFill><a:srgbClr val="{color}"/></a:solidFill>"#);
        }
        let _ = write!(self.shapes, "</a:rPr><a:t>{}</a:t></a:r></a:p>", xml_text(para.text));
    }

    fn into_xml(self) -> String {
        format!(
            r#"{XML_DECLARATION}<p:sld {NS}><p:cSld><p:spTree>{EMPTY_TREE}{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
            self.shapes
        )
    }
}

fn section<'a>(title: &'a str, body: &'a [String], bulleted: bool) -> Vec<Para<'a>> {
    let mut paras = vec![Para::heading(title)];
    paras.extend(body.iter().map(|line| {
        if bulleted {
            Para::bullet(line)
        } else {
            Para::text(line, 1200)
        }
    }));
    paras
}

pub fn slide_xml(content: &SlideContent) -> String {
    let mut tree = SlideTree::new();
    let inner_width = SLIDE_CX - 2 * MARGIN;

    let mut header = vec![Para {
        bold: true,
        color: Some(ACCENT),
        ..Para::text(&content.name, 3200)
    }];
    if !content.headline.is_empty() {
        header.push(Para {
            color: Some(MUTED),
            ..Para::text(&content.headline, 1800)
        });
    }
    tree.text_box("Header", MARGIN, 320_040, inner_width, 1_005_840, &header);

    let body_y = 1_463_040;
    let body_cy = SLIDE_CY - body_y - MARGIN;
    let left_cx = (inner_width - COLUMN_GAP) * 3 / 5;
    let right_x = MARGIN + left_cx + COLUMN_GAP;
    let right_cx = inner_width - left_cx - COLUMN_GAP;

    let summary = [content.summary.clone()];
    let mut left = Vec::new();
    if !content.summary.is_empty() {
        left.extend(section("Summary", &summary, false));
    }
    if !content.experience_overview.is_empty() {
        left.extend(section("Experience Overview", &content.experience_overview, true));
    }
    tree.text_box("Profile", MARGIN, body_y, left_cx, body_cy, &left);

    let mut right = Vec::new();
    if !content.key_skills.is_empty() {
        right.extend(section("Key Skills", &content.key_skills, true));
    }
    if !content.highlights.is_empty() {
        right.extend(section("Highlights", &content.highlights, true));
    }
    tree.text_box("Strengths", right_x, body_y, right_cx, body_cy, &right);

    tree.into_xml()
}

fn relationships(entries: &[(&str, &str, &str)]) -> String {
    let mut xml = format!(r#"{XML_DECLARATION}<Relationships xmlns="{REL_NS}">"#);
    for (id, kind, target) in entries {
        let _ = write!(
            xml,
            r#"<Relationship Id="{id}" Type="{REL_TYPE}/{kind}" Target="{target}"/>"#
        );
    }
    xml.push_str("</Relationships>");
    xml
}

/// Packages `content` as `.pptx` bytes.
pub fn build_presentation(content: &SlideContent) -> anyhow::Result<Vec<u8>> {
    let presentation = format!(
        r#"{XML_DECLARATION}<p:presentation {NS} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="rId2"/></p:sldIdLst><p:sldSz cx="{SLIDE_CX}" cy="{SLIDE_CY}"/><p:notesSz cx="{SLIDE_CY}" cy="9144000"/></p:presentation>"#
    );
    let master = format!(
        r#"{XML_DECLARATION}<p:sldMaster {NS}><p:cSld><p:spTree>{EMPTY_TREE}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#
    );
    let layout = format!(
        r#"{XML_DECLARATION}<p:sldLayout {NS} type="blank" preserve="1"><p:cSld name="Blank"><p:spTree>{EMPTY_TREE}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    );

    write_package(&[
        ("[Content_Types].xml", format!("{XML_DECLARATION}{CONTENT_TYPES}")),
        (
            "_rels/.rels",
            relationships(&[("rId1", "officeDocument", "ppt/presentation.xml")]),
        ),
        ("ppt/presentation.xml", presentation),
        (
            "ppt/_rels/presentation.xml.rels",
            relationships(&[
                ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
                ("rId2", "slide", "slides/slide1.xml"),
                ("rId3", "theme", "theme/theme1.xml"),
            ]),
        ),
        ("ppt/slideMasters/slideMaster1.xml", master),
        (
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            relationships(&[
                ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                ("rId2", "theme", "../theme/theme1.xml"),
            ]),
        ),
        ("ppt/slideLayouts/slideLayout1.xml", layout),
        (
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            relationships(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
        ),
        ("ppt/slides/slide1.xml", slide_xml(content)),
        (
            "ppt/slides/_rels/slide1.xml.rels",
            relationships(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
        ),
        ("ppt/theme/theme1.xml", format!("{XML_DECLARATION}{THEME}")),
    ])
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use super::*;

    fn content() -> SlideContent {
        SlideContent {
            name: "Jane <Doe> & Co".to_string(),
            headline: "Data Engineer".to_string(),
            summary: "Builds pipelines".to_string(),
            key_skills: vec!["Rust".to_string(), "Spark".to_string()],
            highlights: vec!["Cut costs 30%".to_string()],
            experience_overview: vec![],
        }
    }

    #[test]
    fn test_package_holds_exactly_one_slide() {
        let bytes = build_presentation(&content()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

        let slides: Vec<String> = archive
            .file_names()
            .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
            .map(str::to_string)
            .collect();
        assert_eq!(slides, vec!["ppt/slides/slide1.xml"]);
        assert_eq!(archive.by_index(0).unwrap().name(), "[Content_Types].xml");

        let mut xml = String::new();
        archive
            .by_name("ppt/slides/slide1.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        assert!(xml.contains("Jane &lt;Doe&gt; &amp; Co"));
        assert!(xml.contains("Key Skills"));
        assert!(!xml.contains("Experience Overview"));
    }

    #[test]
    fn test_slide_is_widescreen() {
        let bytes = build_presentation(&content()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("ppt/presentation.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        assert!(xml.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));
    }

    #[test]
    fn test_shape_ids_are_unique() {
        let xml = slide_xml(&content());
        for id in 2..=4 {
            assert_eq!(xml.matches(&format!(r#"<p:cNvPr id="{id}""#)).count(), 1);
        }
    }

    #[test]
    fn test_empty_box_still_has_a_paragraph() {
        let xml = slide_xml(&SlideContent {
            name: "Jane".to_string(),
            ..Default::default()
        });
        assert_eq!(xml.matches("<a:endParaRPr").count(), 2);
    }
}
