// Prompt construction and response composition.
// All model calls go through llm_client; nothing here talks to the network.

pub mod builder;
pub mod output;
pub mod prompts;
pub mod template;
