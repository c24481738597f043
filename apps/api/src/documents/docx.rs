use std::io::{Cursor, Read};

use anyhow::Context;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Concatenates the text of every `w:p` paragraph in `word/document.xml`,
/// newline-separated, in document order. Paragraphs inside table cells are
/// included where they appear.
pub fn extract_docx_text(data: &[u8]) -> anyhow::Result<String> {
    let cursor = Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut document_file = archive
        .by_name("word/document.xml")
        .context("docx package has no word/document.xml")?;
    let mut xml = String::new();
    document_file.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);

    let mut buf = Vec::new();
    // Open paragraphs, innermost last. Text-box content nests `w:p` inside a run.
    let mut open: Vec<String> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => open.push(String::new()),
                b"w:r" => run_depth += 1,
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:p" => {
                    if let Some(text) = open.pop() {
                        paragraphs.push(text.trim_end().to_string());
                    }
                }
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                _ => {}
            },
            // `w:tab` under `w:pPr/w:tabs` is a tab-stop definition, not text.
            Ok(Event::Empty(e)) => match (e.name().as_ref(), open.last_mut()) {
                (b"w:p", _) => paragraphs.push(String::new()),
                (b"w:tab", Some(current)) if run_depth > 0 => current.push('\t'),
                (b"w:br" | b"w:cr", Some(current)) if run_depth > 0 => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if let (true, Some(current)) = (in_text, open.last_mut()) {
                    current.push_str(&e.xml_content()?);
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if let (true, Some(current)) = (in_text, open.last_mut()) {
                    let name = e.decode()?;
                    if let Some(resolved) = resolve_entity(&name) {
                        current.push_str(&resolved);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.into()),
            _ => {}
        }

        buf.clear();
    }

    Ok(paragraphs.join("\n"))
}

fn resolve_entity(name: &str) -> Option<String> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => code.parse::<u32>().ok()?,
        };
        return char::from_u32(value).map(String::from);
    }
    resolve_predefined_entity(name).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::docx::DocxBuilder;
    use crate::render::package::write_package;

    #[test]
    fn test_extracts_paragraphs_in_order() {
        let mut doc = DocxBuilder::new();
        doc.paragraph("Jane Doe");
        doc.paragraph("Skills: Rust & Python <core>");
        doc.paragraph("Last line");
        let bytes = doc.finish().unwrap();

        let text = extract_docx_text(&bytes).unwrap();
        assert_eq!(text, "Jane Doe\nSkills: Rust & Python <core>\nLast line");
    }

    fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        write_package(&[("word/document.xml", xml)]).unwrap()
    }

    #[test]
    fn test_tab_stop_definitions_are_not_text() {
        let bytes = docx_with_body(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/><w:tab w:val="right" w:pos="9000"/></w:tabs></w:pPr><w:r><w:t>Jane Doe</w:t></w:r></w:p>"#,
        );
        assert_eq!(extract_docx_text(&bytes).unwrap(), "Jane Doe");
    }

    #[test]
    fn test_tabs_and_breaks_inside_runs_are_kept() {
        let bytes = docx_with_body(
            r#"<w:p><w:r><w:t>Skills</w:t><w:tab/><w:t>Rust</w:t><w:br/><w:t>Go</w:t></w:r></w:p>"#,
        );
        assert_eq!(extract_docx_text(&bytes).unwrap(), "Skills\tRust\nGo");
    }

    #[test]
    fn test_text_box_paragraph_keeps_outer_text() {
        let bytes = docx_with_body(concat!(
            r#"<w:p><w:r><w:t>Jane </w:t></w:r>"#,
            r#"<w:r><w:txbxContent><w:p><w:r><w:t>Sidebar</w:t></w:r></w:p></w:txbxContent></w:r>"#,
            r#"<w:r><w:t>Doe</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Next</w:t></w:r></w:p>"#,
        ));
        assert_eq!(extract_docx_text(&bytes).unwrap(), "Sidebar\nJane Doe\nNext");
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("amp").as_deref(), Some("&"));
        assert_eq!(resolve_entity("#65").as_deref(), Some("A"));
        assert_eq!(resolve_entity("#x42").as_deref(), Some("B"));
        assert_eq!(resolve_entity("bogus"), None);
    }

    #[test]
    fn test_rejects_non_zip() {
        assert!(extract_docx_text(b"plain bytes").is_err());
    }
}
