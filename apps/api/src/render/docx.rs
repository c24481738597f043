//! Minimal WordprocessingML writer: paragraphs of formatted runs, simple
//! two-column tables, and the three package parts Word needs to open a file.

use std::fmt::Write as _;

use super::package::{write_package, xml_text, XML_DECLARATION};

const CONTENT_TYPES: &str = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// US letter with 0.75" margins, in twentieths of a point.
const SECTION_PROPERTIES: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1080" w:right="1080" w:bottom="1080" w:left="1080" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

/// Usable width between the margins, in twips.
pub const TEXT_WIDTH_TWIPS: u32 = 12240 - 2 * 1080;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Clone, Default)]
pub struct Run<'a> {
    pub text: &'a str,
    pub bold: bool,
    pub italic: bool,
    /// Font size in half-points.
    pub size: Option<u32>,
    /// Hex RGB, e.g. `1F3864`.
    pub color: Option<&'a str>,
    pub caps: bool,
}

impl<'a> Run<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self {
            text,
            ..Default::default()
        }
    }

    pub fn bold(text: &'a str) -> Self {
        Self {
            text,
            bold: true,
            ..Default::default()
        }
    }

    pub fn italic(text: &'a str) -> Self {
        Self {
            text,
            italic: true,
            ..Default::default()
        }
    }

    pub fn size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }

    pub fn color(mut self, color: &'a str) -> Self {
        self.color = Some(color);
        self
    }

    pub fn caps(mut self) -> Self {
        self.caps = true;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParagraphStyle<'a> {
    pub align: Align,
    /// Space after, in twips.
    pub space_after: Option<u32>,
    /// Left indent, in twips.
    pub indent: Option<u32>,
    /// Hex RGB of a bottom rule under the paragraph.
    pub bottom_border: Option<&'a str>,
}

#[derive(Debug, Default)]
pub struct DocxBuilder {
    body: String,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A plain paragraph with default formatting.
    pub fn paragraph(&mut self, text: &str) {
        self.styled(&ParagraphStyle::default(), &[Run::plain(text)]);
    }

    /// A bulleted line. The bullet is a literal glyph so no numbering part is needed.
    pub fn bullet(&mut self, text: &str, size: u32) {
        let line = format!("\u{2022}  {text}");
        self.styled(
            &ParagraphStyle {
                indent: Some(360),
                space_after: Some(40),
                ..Default::default()
            },
            &[Run::plain(&line).size(size)],
        );
    }

    pub fn styled(&mut self, style: &ParagraphStyle, runs: &[Run]) {
        self.body.push_str("<w:p><w:pPr>");
        if let Some(color) = style.bottom_border {
            let _ = write!(
                self.body,
                r#"<w:pBdr><w:bottom w:val="single" w:sz="8" w:space="1" w:color="{color}"/></w:pBdr>"#
            );
        }
        let _ = write!(
            self.body,
            r#"<w:spacing w:after="{}"/>"#,
            style.space_after.unwrap_or(120)
        );
        if let Some(indent) = style.indent {
            let _ = write!(self.body, r#"<w:ind w:left="{indent}"/>"#);
        }
        if style.align == Align::Center {
            self.body.push_str(r#"<w:jc w:val="center"/>"#);
        }
        self.body.push_str("</w:pPr>");
        for run in runs {
            self.push_run(run);
        }
        self.body.push_str("</w:p>");
    }

    fn push_run(&mut self, run: &Run) {
        self.body.push_str("<w:r><w:rPr>");
        if run.bold {
            self.body.push_str("<w:b/>");
        }
        if run.italic {
            self.body.push_str("<w:i/>");
        }
        if run.caps {
            self.body.push_str("<w:caps/>");
        }
        if let Some(color) = run.color {
            let _ = write!(self.body, r#"<w:color w:val="{color}"/>"#);
        }
        if let Some(size) = run.size {
            let _ = write!(self.body, r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#);
        }
        self.body.push_str("</w:rPr>");
        for (idx, line) in run.text.split('\n').enumerate() {
            if idx > 0 {
                self.body.push_str("<w:br/>");
            }
            let _ = write!(
                self.body,
                r#"<w:t xml:space="preserve">{}</w:t>"#,
                xml_text(line)
            );
        }
        self.body.push_str("</w:r>");
    }

    /// Lays two builders side by side in a borderless table. Widths in twips.
    /// `left_fill` shades the first column.
    pub fn two_columns(
        &mut self,
        left: DocxBuilder,
        right: DocxBuilder,
        left_width: u32,
        left_fill: Option<&str>,
    ) {
        let right_width = TEXT_WIDTH_TWIPS.saturating_sub(left_width);
        let _ = write!(
            self.body,
            r#"<w:tbl><w:tblPr><w:tblW w:w="{TEXT_WIDTH_TWIPS}" w:type="dxa"/><w:tblLayout w:type="fixed"/><w:tblCellMar><w:left w:w="144" w:type="dxa"/><w:right w:w="144" w:type="dxa"/></w:tblCellMar></w:tblPr><w:tblGrid><w:gridCol w:w="{left_width}"/><w:gridCol w:w="{right_width}"/></w:tblGrid><w:tr>"#
        );
        self.push_cell(left, left_width, left_fill);
        self.push_cell(right, right_width, None);
        self.body.push_str("</w:tr></w:tbl>");
        // Word expects a paragraph between a table and the section properties.
        self.body.push_str("<w:p/>");
    }

    fn push_cell(&mut self, cell: DocxBuilder, width: u32, fill: Option<&str>) {
        let _ = write!(self.body, r#"<w:tc><w:tcPr><w:tcW w:w="{width}" w:type="dxa"/>"#);
        if let Some(fill) = fill {
            let _ = write!(
                self.body,
                r#"<w:shd w:val="clear" w:color="auto" w:fill="{fill}"/>"#
            );
        }
        self.body.push_str("</w:tcPr>");
        if cell.body.is_empty() {
            self.body.push_str("<w:p/>");
        } else {
            self.body.push_str(&cell.body);
        }
        self.body.push_str("</w:tc>");
    }

    pub fn document_xml(&self) -> String {
        format!(
            r#"{XML_DECLARATION}<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}{SECTION_PROPERTIES}</w:body></w:document>"#,
            self.body
        )
    }

    /// Packages the document as `.docx` bytes.
    pub fn finish(self) -> anyhow::Result<Vec<u8>> {
        write_package(&[
            ("[Content_Types].xml", format!("{XML_DECLARATION}{CONTENT_TYPES}")),
            ("_rels/.rels", format!("{XML_DECLARATION}{ROOT_RELS}")),
            ("word/document.xml", self.document_xml()),
        ])
    }
}
