use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Opens (or finds) a conversation with another user, addressed either by
/// username or by id, with an optional first message.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OpenChatRequest {
    pub username: Option<String>,
    #[serde(alias = "userToId")]
    pub user_to_id: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub id: i64,
    pub partner_id: i64,
    pub partner_username: String,
    pub created: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewMessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub id: i64,
    pub chat_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub sent_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatHistoryResponse {
    pub id: i64,
    pub partner_id: i64,
    pub partner_username: String,
    pub messages: Vec<MessageResponse>,
}

/// One sidebar entry of the chat inbox.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatPreview {
    pub chat_id: i64,
    pub partner_id: i64,
    pub partner_username: String,
    pub last_message: Option<String>,
    pub last_sender_id: Option<i64>,
    pub last_sent_at: Option<chrono::DateTime<chrono::Utc>>,
}
