// Shared prompt fragments. Each service that calls the LLM keeps its own
// prompts.rs alongside it and builds on these.

/// Appended to every prompt whose reply is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences.";

/// Keeps the model from inventing skills the analysis did not report.
pub const STAY_ON_CONTEXT: &str = "Only mention skills that appear in the provided context.";
