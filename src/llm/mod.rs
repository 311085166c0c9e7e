//! LLM endpoint access and response parsing

pub mod client;
pub mod parser;

pub use client::{ApiFormat, LlmClient, StructuredGenerator};
pub use parser::{extract_json, parse_world_state};
