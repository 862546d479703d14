use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub content: String,
    pub like_count: i64,
    pub comment_count: i64,
    pub is_liked: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Authoritative like count read back from the database after a
/// like/unlike, never the client's optimistic value.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LikeResponse {
    pub likes: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub username: String,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
