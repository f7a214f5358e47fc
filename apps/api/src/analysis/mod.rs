// Resume skill-gap analysis.
// Implements: text source resolution, prompt building, LLM call, reply normalization.
// All LLM calls go through llm_client, never straight to Gemini.

pub mod analyzer;
pub mod handlers;
pub mod normalizer;
pub mod pdf;
pub mod prompts;
pub mod schema;
pub mod source;
