// Shared prompt constants.
// Each use case that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt that pushes the model towards JSON-only output.
/// Local models ignore this often enough that the response cleaner still runs.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every structured prompt after the schema description.
pub const STRING_LISTS_INSTRUCTION: &str = "\
    Ensure all lists contain plain string items, not nested objects, \
    unless the schema above explicitly describes a list of objects.";
