// Drafting pipeline: prompt rendering, one model call, normalization.
// All LLM calls go through llm_client; nothing here talks to the provider directly.

pub mod generator;
pub mod handlers;
pub mod mock;
pub mod normalizer;
pub mod prompts;
pub mod suggest;
