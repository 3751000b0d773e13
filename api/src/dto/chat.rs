//! Chat request DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use ec_core::services::chat::ChatMessage;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    /// Conversation history, oldest first
    #[validate(length(min = 1, max = 64))]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}
