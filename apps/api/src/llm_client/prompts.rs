// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments.

/// Appended to every drafting instruction. Replies are shown to the user
/// almost verbatim, so they must carry no markup and no reasoning.
pub const PLAIN_TEXT_ONLY: &str = "Respond with plain text only. \
    Do not include headings, bullet points, numbering, <think> blocks, \
    explanations, or any other formatting.";
