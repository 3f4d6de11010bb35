// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Closing instruction that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY the JSON object. \
    Do not include any other text, markdown formatting, or explanations.";
