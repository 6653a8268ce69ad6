//! LLM integration - OpenRouter-compatible API
//!
//! This module provides:
//! - The `TextBackend` trait the generator depends on
//! - An HTTP client for chat completions with model fallback and retry
//! - Token usage tracking with an optional budget

mod backend;
mod client;
mod types;
mod usage;

pub use backend::{Generation, TextBackend};
pub use client::{LlmClient, LlmClientBuilder};
pub use types::{
    ChatRequest, ChatResponse, Choice, FinishReason, LlmResponse, Message, MessageRole, Usage,
};
pub use usage::{ModelUsage, TokenUsage, UsageSummary, UsageTracker};
