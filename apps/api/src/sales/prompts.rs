// Sales slide prompt template.

/// Keys match what `SlideContent::from_value` reads.
pub const SLIDE_PROMPT_TEMPLATE: &str = r#"You are preparing a single PowerPoint slide that presents a candidate to a client in an RFP response.
From the profile below, produce:
- Name: the candidate's full name
- Headline: current role and years of experience in one line
- Summary: two or three sentences a client would care about
- Key Skills: at most eight skills, most relevant first
- Highlights: three to five concrete achievements
- Experience Overview: one short line per major engagement

Provide the output as one JSON object with exactly these keys:
{
  "Name": "string",
  "Headline": "string",
  "Summary": "string",
  "Key Skills": ["string"],
  "Highlights": ["string"],
  "Experience Overview": ["string"]
}
{json_only}

PROFILE:
{resume_text}"#;
