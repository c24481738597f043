// Extraction prompt templates.
// All prompts for the extraction module are defined here.

/// First pass: condense the raw document into one profile. Uploaded files
/// sometimes carry several profile formats stacked one after another, so the
/// model is told to read to the end before summarizing.
pub const SUMMARY_PROMPT_TEMPLATE: &str = "\
Summarize the candidate profile below. Include the full name, email address, \
phone number, a single flat list of technical skills (no categories), business \
capabilities, an overview of functional capabilities, and the complete \
professional experience with roles and responsibilities. The document may \
contain several profile formats one below another: read the entire document \
before summarizing.

PROFILE:
{resume_text}";

/// Second pass: field extraction. Keys match `ResumeRecord`'s serialized names.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract the following information from the resume:
- Name
- Email
- Phone
- Linkedin (look for any linkedin.com profile mentioned in the resume)
- Summary
- Skills
- Certifications
- Experience with roles and responsibilities
- Education or academic profile

Provide the output as one JSON object with exactly these keys:
{
  "Name": "string",
  "Email": "string",
  "Phone": "string",
  "Linkedin": "string",
  "Summary": "string",
  "Skills": ["string"],
  "Certifications": ["string"],
  "Experience": [
    {"Title": "string", "Company": "string", "Duration": "string", "Responsibilities": ["string"]}
  ],
  "Education": [
    {"Degree": "string", "Institution": "string", "Duration": "string"}
  ]
}

Use an empty string or empty list when a field is not present.
{json_only}

Resume text:
{resume_text}"#;
