use std::borrow::Cow;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Escapes text for use inside an XML element or attribute.
pub fn xml_text(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// Zips the given `(part name, xml)` pairs into an OOXML package.
/// `[Content_Types].xml` must be among the parts; it is written first.
pub fn write_package(parts: &[(&str, String)]) -> anyhow::Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let mut ordered: Vec<&(&str, String)> = parts.iter().collect();
    ordered.sort_by_key(|(name, _)| *name != "[Content_Types].xml");

    for (name, xml) in ordered {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(*name, options)?;
        zip.write_all(xml.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn test_content_types_written_first() {
        let bytes = write_package(&[
            ("word/document.xml", "<a/>".to_string()),
            ("[Content_Types].xml", "<Types/>".to_string()),
        ])
        .unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.by_index(0).unwrap().name(), "[Content_Types].xml");
        let mut doc = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut doc)
            .unwrap();
        assert_eq!(doc, "<a/>");
    }

    #[test]
    fn test_xml_text_escapes_markup() {
        assert_eq!(xml_text("R&D <team>"), "R&amp;D &lt;team&gt;");
    }
}
