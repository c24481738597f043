//! Resume Record Builder: turns a parsed oracle reply into a `ResumeRecord`.
//!
//! The reply must be a JSON object with a non-empty string `Name`. Every other
//! field is read leniently: missing keys default to empty, list fields accept
//! arrays, comma-separated strings, or objects of categorized lists.

use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::models::resume::{EducationEntry, ExperienceEntry, ResumeRecord};

const RESPONSIBILITY_KEYS: &[&str] = &[
    "Responsibilities",
    "Roles and Responsibilities",
    "Roles & Responsibilities",
    "Roles",
];
const EDUCATION_DURATION_KEYS: &[&str] = &["Duration", "Year", "Duration or Year"];
const INSTITUTION_KEYS: &[&str] = &["Institution", "University", "School"];
/// Keys that name a list item when the oracle returns objects instead of strings.
const ITEM_LABEL_KEYS: &[&str] = &["Name", "Title", "Certification", "Skill"];

pub fn build_record(value: &Value) -> Result<ResumeRecord, AppError> {
    let obj = value.as_object().ok_or_else(|| {
        AppError::InvalidRecord(format!(
            "parsed result is not an object (got {})",
            json_kind(value)
        ))
    })?;

    let name = obj
        .get("Name")
        .ok_or_else(|| AppError::InvalidRecord("the 'Name' field is missing".to_string()))?;
    let name = scalar_text(name);
    if name.is_empty() {
        return Err(AppError::InvalidRecord(
            "the 'Name' field is empty".to_string(),
        ));
    }

    Ok(ResumeRecord {
        name,
        email: text_field(obj, &["Email"]),
        phone: text_field(obj, &["Phone"]),
        linkedin: text_field(obj, &["Linkedin", "LinkedIn"]),
        summary: text_field(obj, &["Summary"]),
        skills: lookup(obj, &["Skills"]).map(string_list).unwrap_or_default(),
        certifications: lookup(obj, &["Certifications"])
            .map(string_list)
            .unwrap_or_default(),
        experience: objects(lookup(obj, &["Experience"]))
            .map(|entry| ExperienceEntry {
                title: text_field(entry, &["Title", "Role"]),
                company: text_field(entry, &["Company"]),
                duration: text_field(entry, &["Duration"]),
                responsibilities: lookup(entry, RESPONSIBILITY_KEYS)
                    .map(string_list)
                    .unwrap_or_default(),
            })
            .collect(),
        education: objects(lookup(obj, &["Education", "Academic Profile"]))
            .map(|entry| EducationEntry {
                degree: text_field(entry, &["Degree"]),
                institution: text_field(entry, INSTITUTION_KEYS),
                duration: text_field(entry, EDUCATION_DURATION_KEYS),
            })
            .collect(),
    })
}

/// Finds the first present key, exact match first, then case-insensitive.
pub(crate) fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| obj.get(*key))
        .or_else(|| {
            keys.iter().find_map(|key| {
                obj.iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
            })
        })
        .filter(|v| !v.is_null())
}

pub(crate) fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> String {
    match lookup(obj, keys) {
        Some(Value::Array(items)) => items
            .iter()
            .map(scalar_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Some(value) => scalar_text(value),
        None => String::new(),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

pub(crate) fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().flat_map(list_item).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Object(map) => map.values().flat_map(string_list).collect(),
        Value::Null => Vec::new(),
        other => vec![scalar_text(other)],
    }
}

fn list_item(value: &Value) -> Vec<String> {
    match value {
        Value::Object(map) => {
            if let Some(label) = lookup(map, ITEM_LABEL_KEYS).map(scalar_text) {
                if !label.is_empty() {
                    return vec![label];
                }
            }
            let joined = map
                .values()
                .map(scalar_text)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" - ");
            if joined.is_empty() {
                vec![]
            } else {
                vec![joined]
            }
        }
        Value::Array(_) => string_list(value),
        other => {
            let text = scalar_text(other);
            if text.is_empty() {
                vec![]
            } else {
                vec![text]
            }
        }
    }
}

/// Object entries of a list field. A single object counts as a one-item list;
/// non-object entries are skipped.
fn objects(value: Option<&Value>) -> impl Iterator<Item = &Map<String, Value>> {
    let items: Vec<&Map<String, Value>> = match value {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
        Some(Value::Object(map)) => vec![map],
        _ => Vec::new(),
    };
    items.into_iter()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
