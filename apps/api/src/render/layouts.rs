//! The three resume layouts. Each takes a record and returns `.docx` bytes.

use super::docx::{Align, DocxBuilder, ParagraphStyle, Run};
use crate::models::resume::ResumeRecord;

const BODY: u32 = 21;
const SMALL: u32 = 19;

// ────────────────────────────────────────────────────────────────────────────
// Kallisti: classic single column, centered header
// ────────────────────────────────────────────────────────────────────────────

const KALLISTI_ACCENT: &str = "1F3864";

pub fn kallisti(record: &ResumeRecord) -> anyhow::Result<Vec<u8>> {
    let mut doc = DocxBuilder::new();

    doc.styled(
        &ParagraphStyle {
            align: Align::Center,
            space_after: Some(40),
            ..Default::default()
        },
        &[Run::bold(&record.name).size(36).color(KALLISTI_ACCENT)],
    );
    let contact = record.contact_line().join("  |  ");
    if !contact.is_empty() {
        doc.styled(
            &ParagraphStyle {
                align: Align::Center,
                space_after: Some(200),
                ..Default::default()
            },
            &[Run::plain(&contact).size(SMALL)],
        );
    }

    if !record.summary.trim().is_empty() {
        kallisti_heading(&mut doc, "Professional Summary");
        doc.styled(&ParagraphStyle::default(), &[Run::plain(&record.summary).size(BODY)]);
    }

    if !record.skills.is_empty() {
        kallisti_heading(&mut doc, "Skills");
        let skills = record.skills.join(", ");
        doc.styled(&ParagraphStyle::default(), &[Run::plain(&skills).size(BODY)]);
    }

    if !record.experience.is_empty() {
        kallisti_heading(&mut doc, "Professional Experience");
        for exp in &record.experience {
            doc.styled(
                &ParagraphStyle {
                    space_after: Some(20),
                    ..Default::default()
                },
                &[Run::bold(&exp.title).size(BODY + 1)],
            );
            let meta = join_present(&[&exp.company, &exp.duration], "  |  ");
            if !meta.is_empty() {
                doc.styled(
                    &ParagraphStyle {
                        space_after: Some(60),
                        ..Default::default()
                    },
                    &[Run::italic(&meta).size(SMALL)],
                );
            }
            for item in &exp.responsibilities {
                doc.bullet(item, BODY);
            }
        }
    }

    if !record.education.is_empty() {
        kallisti_heading(&mut doc, "Education");
        for edu in &record.education {
            let line = join_present(&[&edu.institution, &edu.duration], ", ");
            doc.styled(
                &ParagraphStyle {
                    space_after: Some(60),
                    ..Default::default()
                },
                &[
                    Run::bold(&edu.degree).size(BODY),
                    Run::plain(if line.is_empty() { "" } else { " \u{2014} " }).size(BODY),
                    Run::plain(&line).size(BODY),
                ],
            );
        }
    }

    if !record.certifications.is_empty() {
        kallisti_heading(&mut doc, "Certifications");
        for cert in &record.certifications {
            doc.bullet(cert, BODY);
        }
    }

    doc.finish()
}

fn kallisti_heading(doc: &mut DocxBuilder, title: &str) {
    doc.styled(
        &ParagraphStyle {
            space_after: Some(80),
            bottom_border: Some(KALLISTI_ACCENT),
            ..Default::default()
        },
        &[Run::bold(title).size(24).color(KALLISTI_ACCENT)],
    );
}

// ────────────────────────────────────────────────────────────────────────────
// Phaedon: two columns, shaded sidebar
// ────────────────────────────────────────────────────────────────────────────

const PHAEDON_ACCENT: &str = "0F6E6E";
const PHAEDON_SIDEBAR_FILL: &str = "EAF3F3";
const PHAEDON_SIDEBAR_WIDTH: u32 = 3300;

pub fn phaedon(record: &ResumeRecord) -> anyhow::Result<Vec<u8>> {
    let mut doc = DocxBuilder::new();

    doc.styled(
        &ParagraphStyle {
            space_after: Some(160),
            bottom_border: Some(PHAEDON_ACCENT),
            ..Default::default()
        },
        &[Run::bold(&record.name).size(40).color(PHAEDON_ACCENT)],
    );

    let mut sidebar = DocxBuilder::new();
    let contact = record.contact_line();
    if !contact.is_empty() {
        phaedon_heading(&mut sidebar, "Contact");
        for item in contact {
            sidebar.styled(&sidebar_style(), &[Run::plain(item).size(SMALL)]);
        }
    }
    if !record.skills.is_empty() {
        phaedon_heading(&mut sidebar, "Skills");
        for skill in &record.skills {
            sidebar.styled(&sidebar_style(), &[Run::plain(skill).size(SMALL)]);
        }
    }
    if !record.certifications.is_empty() {
        phaedon_heading(&mut sidebar, "Certifications");
        for cert in &record.certifications {
            sidebar.styled(&sidebar_style(), &[Run::plain(cert).size(SMALL)]);
        }
    }
    if !record.education.is_empty() {
        phaedon_heading(&mut sidebar, "Education");
        for edu in &record.education {
            sidebar.styled(&sidebar_style(), &[Run::bold(&edu.degree).size(SMALL)]);
            let line = join_present(&[&edu.institution, &edu.duration], "\n");
            if !line.is_empty() {
                sidebar.styled(&sidebar_style(), &[Run::plain(&line).size(SMALL)]);
            }
        }
    }

    let mut main = DocxBuilder::new();
    if !record.summary.trim().is_empty() {
        phaedon_heading(&mut main, "Profile");
        main.styled(&ParagraphStyle::default(), &[Run::plain(&record.summary).size(BODY)]);
    }
    if !record.experience.is_empty() {
        phaedon_heading(&mut main, "Experience");
        for exp in &record.experience {
            main.styled(
                &ParagraphStyle {
                    space_after: Some(40),
                    ..Default::default()
                },
                &[
                    Run::bold(&exp.title).size(BODY + 1),
                    Run::plain(if exp.company.is_empty() { "" } else { ", " }).size(BODY),
                    Run::plain(&exp.company).size(BODY).color(PHAEDON_ACCENT),
                ],
            );
            if !exp.duration.is_empty() {
                main.styled(
                    &ParagraphStyle {
                        space_after: Some(60),
                        ..Default::default()
                    },
                    &[Run::italic(&exp.duration).size(SMALL)],
                );
            }
            for item in &exp.responsibilities {
                main.bullet(item, BODY);
            }
        }
    }

    doc.two_columns(
        sidebar,
        main,
        PHAEDON_SIDEBAR_WIDTH,
        Some(PHAEDON_SIDEBAR_FILL),
    );
    doc.finish()
}

fn sidebar_style() -> ParagraphStyle<'static> {
    ParagraphStyle {
        space_after: Some(40),
        ..Default::default()
    }
}

fn phaedon_heading(doc: &mut DocxBuilder, title: &str) {
    doc.styled(
        &ParagraphStyle {
            space_after: Some(60),
            ..Default::default()
        },
        &[Run::bold(title).size(22).color(PHAEDON_ACCENT).caps()],
    );
}

// ────────────────────────────────────────────────────────────────────────────
// Erasmos: compact, skills first
// ────────────────────────────────────────────────────────────────────────────

const ERASMOS_ACCENT: &str = "7B2C3A";

pub fn erasmos(record: &ResumeRecord) -> anyhow::Result<Vec<u8>> {
    let mut doc = DocxBuilder::new();

    doc.styled(
        &ParagraphStyle {
            space_after: Some(20),
            ..Default::default()
        },
        &[Run::bold(&record.name).size(32).caps()],
    );
    let contact = record.contact_line().join("  \u{00B7}  ");
    doc.styled(
        &ParagraphStyle {
            space_after: Some(160),
            bottom_border: Some(ERASMOS_ACCENT),
            ..Default::default()
        },
        &[Run::plain(&contact).size(SMALL).color(ERASMOS_ACCENT)],
    );

    if !record.summary.trim().is_empty() {
        doc.styled(
            &ParagraphStyle {
                space_after: Some(160),
                ..Default::default()
            },
            &[Run::italic(&record.summary).size(BODY)],
        );
    }

    if !record.skills.is_empty() {
        erasmos_heading(&mut doc, "Core Skills");
        for skill in &record.skills {
            doc.bullet(skill, SMALL);
        }
    }

    if !record.experience.is_empty() {
        erasmos_heading(&mut doc, "Work History");
        for exp in &record.experience {
            let title = join_present(&[&exp.title, &exp.company], " \u{2013} ");
            doc.styled(
                &ParagraphStyle {
                    space_after: Some(20),
                    ..Default::default()
                },
                &[
                    Run::bold(&title).size(BODY),
                    Run::plain(if exp.duration.is_empty() { "" } else { "   " }).size(SMALL),
                    Run::plain(&exp.duration).size(SMALL).color(ERASMOS_ACCENT),
                ],
            );
            for item in &exp.responsibilities {
                doc.bullet(item, SMALL);
            }
        }
    }

    if !record.education.is_empty() {
        erasmos_heading(&mut doc, "Education");
        for edu in &record.education {
            doc.styled(
                &ParagraphStyle {
                    space_after: Some(40),
                    ..Default::default()
                },
                &[Run::plain(&edu.headline()).size(BODY)],
            );
        }
    }

    if !record.certifications.is_empty() {
        erasmos_heading(&mut doc, "Certifications");
        let certs = record.certifications.join("; ");
        doc.styled(&ParagraphStyle::default(), &[Run::plain(&certs).size(BODY)]);
    }

    doc.finish()
}

fn erasmos_heading(doc: &mut DocxBuilder, title: &str) {
    doc.styled(
        &ParagraphStyle {
            space_after: Some(60),
            ..Default::default()
        },
        &[Run::bold(title).size(22).color(ERASMOS_ACCENT).caps()],
    );
}

fn join_present(parts: &[&String], sep: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}
