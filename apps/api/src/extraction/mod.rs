// Resume extraction: oracle driver and record builder.
// All LLM calls go through the CompletionOracle trait in llm_client.

pub mod builder;
pub mod driver;
pub mod prompts;
