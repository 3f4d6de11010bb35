// Resume analysis: prompt, schema, remote call, per-session view state.
// All LLM calls go through llm_client — no direct Gemini calls here.

pub mod analyzer;
pub mod controller;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod schema;
#[cfg(test)]
pub mod testing;
