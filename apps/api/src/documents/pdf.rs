use once_cell::sync::Lazy;
use regex::Regex;

/// Tabs, or two or more consecutive spaces, separate table cells in
/// extracted PDF text.
static CELL_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\t+| {2,}").unwrap());

/// Extracts text page by page. Within each page, detected tables are
/// flattened into tab-separated rows and appended after the page's prose.
pub fn extract_pdf_text(data: &[u8]) -> anyhow::Result<String> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(data)?;

    let mut text = String::new();
    for page in &pages {
        text.push_str(&flatten_page(page));
    }
    Ok(text)
}

/// Splits a page into prose and table rows.
///
/// A table is a run of at least two consecutive lines that each split into
/// two or more cells. A lone multi-cell line stays in the prose.
pub fn flatten_page(page: &str) -> String {
    let lines: Vec<&str> = page.lines().map(str::trim_end).collect();

    let mut prose: Vec<&str> = Vec::new();
    let mut rows: Vec<Vec<&str>> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let run_end = lines[i..]
            .iter()
            .position(|line| split_cells(line).len() < 2)
            .map(|offset| i + offset)
            .unwrap_or(lines.len());

        if run_end - i >= 2 {
            rows.extend(lines[i..run_end].iter().map(|line| split_cells(line)));
            i = run_end;
        } else {
            prose.push(lines[i]);
            i += 1;
        }
    }

    let mut out = String::new();
    let prose = prose.join("\n");
    if !prose.trim().is_empty() {
        out.push_str(prose.trim_matches('\n'));
        out.push('\n');
    }
    for row in rows {
        out.push_str(&row.join("\t"));
        out.push('\n');
    }
    out
}

fn split_cells(line: &str) -> Vec<&str> {
    CELL_SPLIT_RE
        .split(line.trim())
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect()
}

#[cfg(test)]
pub mod fixtures {
    /// Builds a single-page PDF that shows `lines` in Helvetica, one per line.
    pub fn single_page_pdf(lines: &[&str]) -> Vec<u8> {
        let mut content = String::from("BT\n/F1 12 Tf\n72 720 Td\n14 TL\n");
        for line in lines {
            let escaped = line
                .replace('\\', "\\\\")
                .replace('(', "\\(")
                .replace(')', "\\)");
            content.push_str(&format!("({escaped}) Tj T*\n"));
        }
        content.push_str("ET\n");

        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{}endstream",
                content.len(),
                content
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
             /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::new();
        for (idx, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", idx + 1, body));
        }

        let xref_offset = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
        pdf.push_str("0000000000 65535 f \n");
        for offset in offsets {
            pdf.push_str(&format!("{offset:010} 00000 n \n"));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        ));
        pdf.into_bytes()
    }
}
