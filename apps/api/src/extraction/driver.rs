//! Extraction Oracle Driver.
//!
//! Flow: summarize raw text → embed summary in the extraction template →
//!       complete → strip fences → parse JSON → build record.
//!
//! One attempt per call; any oracle or decoding failure is a `ParseFailure`.

use serde_json::Value;
use tracing::{debug, error};

use crate::errors::AppError;
use crate::extraction::builder::build_record;
use crate::extraction::prompts::{EXTRACTION_PROMPT_TEMPLATE, SUMMARY_PROMPT_TEMPLATE};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{strip_json_fences, CompletionOracle};
use crate::models::resume::ResumeRecord;

/// Runs both oracle passes and returns the parsed JSON reply.
pub async fn request_extraction(
    oracle: &dyn CompletionOracle,
    resume_text: &str,
) -> Result<Value, AppError> {
    let summary_prompt = SUMMARY_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);
    let summary = oracle.complete(&summary_prompt).await.map_err(|e| {
        error!("Error parsing resume: summary call failed: {e}");
        AppError::ParseFailure(format!("summary call failed: {e}"))
    })?;
    debug!("Condensed profile to {} chars", summary.len());

    let extraction_prompt = EXTRACTION_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{resume_text}", &summary);
    let reply = oracle.complete(&extraction_prompt).await.map_err(|e| {
        error!("Error parsing resume: extraction call failed: {e}");
        AppError::ParseFailure(format!("extraction call failed: {e}"))
    })?;

    parse_reply(&reply)
}

/// Strips an optional code fence and parses the reply.
///
/// A reply that decodes to a JSON string is decoded once more. This is the
/// only place that tolerance exists; callers always receive the inner value.
pub fn parse_reply(reply: &str) -> Result<Value, AppError> {
    let text = strip_json_fences(reply);
    let value: Value = serde_json::from_str(text).map_err(|e| {
        error!("Error parsing resume: reply is not JSON: {e}");
        AppError::ParseFailure(format!("reply is not valid JSON: {e}"))
    })?;

    match value {
        Value::String(inner) => serde_json::from_str(strip_json_fences(&inner)).map_err(|e| {
            error!("Error parsing resume: double-encoded reply is not JSON: {e}");
            AppError::ParseFailure(format!("double-encoded reply is not valid JSON: {e}"))
        }),
        other => Ok(other),
    }
}

/// Full driver: raw document text in, validated record out.
pub async fn extract_record(
    oracle: &dyn CompletionOracle,
    resume_text: &str,
) -> Result<ResumeRecord, AppError> {
    let value = request_extraction(oracle, resume_text).await?;
    build_record(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedOracle;

    #[test]
    fn test_parse_reply_plain_object() {
        let value = parse_reply(r#"{"Name": "Jane"}"#).unwrap();
        assert_eq!(value["Name"], "Jane");
    }

    #[test]
    fn test_parse_reply_fenced() {
        let value = parse_reply("```json\n{\"Name\": \"Jane\"}\n```").unwrap();
        assert_eq!(value["Name"], "Jane");
    }

    #[test]
    fn test_parse_reply_double_encoded() {
        let value = parse_reply(r#""{\"Name\": \"Jane\"}""#).unwrap();
        assert_eq!(value["Name"], "Jane");
    }

    #[test]
    fn test_parse_reply_prose_is_parse_failure() {
        let err = parse_reply("Sure! Here is the JSON you asked for").unwrap_err();
        assert!(matches!(err, AppError::ParseFailure(_)));
    }

    #[tokio::test]
    async fn test_two_pass_flow_embeds_summary() {
        let oracle = ScriptedOracle::new([
            "Jane Doe. Email jane@x.com. Skills: Python, Java.",
            r#"{"Name":"Jane Doe","Email":"jane@x.com","Skills":["Python","Java"]}"#,
        ]);

        let record = extract_record(&oracle, "Jane Doe, jane@x.com, Python, Java")
            .await
            .unwrap();

        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.skills, vec!["Python", "Java"]);
        assert!(record.certifications.is_empty());

        let prompts = oracle.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("Jane Doe, jane@x.com, Python, Java"));
        assert!(prompts[1].contains("Jane Doe. Email jane@x.com. Skills: Python, Java."));
        assert!(prompts[1].contains("\"Certifications\""));
    }

    #[tokio::test]
    async fn test_oracle_failure_is_parse_failure_without_retry() {
        let oracle = ScriptedOracle::failing(503);
        let err = extract_record(&oracle, "text").await.unwrap_err();
        assert!(matches!(err, AppError::ParseFailure(_)));
        assert_eq!(oracle.prompt_count(), 1);
    }

    #[tokio::test]
    async fn test_reply_without_name_is_invalid_record() {
        let oracle = ScriptedOracle::new(["summary", r#"{"Email": "x@y.z"}"#]);
        let err = extract_record(&oracle, "text").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRecord(_)));
    }
}
