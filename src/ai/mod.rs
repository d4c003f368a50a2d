pub mod client;
pub mod generator;

// Public API exports
pub use client::{ModelConfig, OpenRouterClient, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
pub use generator::{
    generate_questions, parse_generated_questions, GeneratedQuestion, GENERATION_TIMEOUT_SECS,
};
