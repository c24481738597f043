use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::errors::AppError;
use crate::extraction::builder::{lookup, string_list, text_field};
use crate::extraction::driver::parse_reply;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::CompletionOracle;
use crate::sales::prompts::SLIDE_PROMPT_TEMPLATE;

/// What goes on the one-slide profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlideContent {
    pub name: String,
    pub headline: String,
    pub summary: String,
    pub key_skills: Vec<String>,
    pub highlights: Vec<String>,
    pub experience_overview: Vec<String>,
}

impl SlideContent {
    /// Same contract as the resume builder: an object with a non-empty `Name`.
    pub fn from_value(value: &Value) -> Result<Self, AppError> {
        let obj = value.as_object().ok_or_else(|| {
            AppError::InvalidRecord("slide reply is not a JSON object".to_string())
        })?;

        let name = match obj.get("Name") {
            Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_string(),
            _ => {
                return Err(AppError::InvalidRecord(
                    "the 'Name' field is missing or empty".to_string(),
                ))
            }
        };

        let experience_overview = match lookup(obj, &["Experience Overview", "Experience"]) {
            Some(Value::String(text)) => text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Some(other) => string_list(other),
            None => Vec::new(),
        };

        Ok(SlideContent {
            name,
            headline: text_field(obj, &["Headline", "Title"]),
            summary: text_field(obj, &["Summary"]),
            key_skills: lookup(obj, &["Key Skills", "Skills"])
                .map(string_list)
                .unwrap_or_default(),
            highlights: lookup(obj, &["Highlights", "Key Highlights"])
                .map(string_list)
                .unwrap_or_default(),
            experience_overview,
        })
    }
}

/// One oracle call over the raw profile text.
pub async fn request_slide(
    oracle: &dyn CompletionOracle,
    profile_text: &str,
) -> Result<SlideContent, AppError> {
    let prompt = SLIDE_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{resume_text}", profile_text);
    let reply = oracle.complete(&prompt).await.map_err(|e| {
        error!("Error generating slide: oracle call failed: {e}");
        AppError::ParseFailure(format!("slide call failed: {e}"))
    })?;
    SlideContent::from_value(&parse_reply(&reply)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::llm_client::testing::ScriptedOracle;

    #[test]
    fn test_from_value_reads_spaced_keys() {
        let content = SlideContent::from_value(&json!({
            "Name": "Jane Doe",
            "Headline": "Data Engineer, 8 years",
            "Key Skills": ["Spark", "Rust"],
            "Highlights": "Cut costs 30%, Led migration",
            "Experience Overview": "Acme 2019-2023\nBeta 2015-2019"
        }))
        .unwrap();

        assert_eq!(content.name, "Jane Doe");
        assert_eq!(content.key_skills, vec!["Spark", "Rust"]);
        assert_eq!(content.highlights, vec!["Cut costs 30%", "Led migration"]);
        assert_eq!(content.experience_overview, vec!["Acme 2019-2023", "Beta 2015-2019"]);
        assert_eq!(content.summary, "");
    }

    #[test]
    fn test_name_is_required() {
        for value in [json!({"Headline": "x"}), json!({"Name": ""}), json!(["Jane"])] {
            assert!(matches!(
                SlideContent::from_value(&value),
                Err(AppError::InvalidRecord(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_request_slide_single_call_with_fenced_reply() {
        let oracle = ScriptedOracle::new(["```json\n{\"Name\": \"Jane Doe\", \"Summary\": \"Builds things\"}\n```"]);
        let content = request_slide(&oracle, "Jane Doe profile").await.unwrap();
        assert_eq!(content.summary, "Builds things");
        assert_eq!(oracle.prompt_count(), 1);
        assert!(oracle.prompts.lock().unwrap()[0].contains("Jane Doe profile"));
    }
}
