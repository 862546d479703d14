use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
}

/// Public profile as rendered on the profile page.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: i64,
    pub username: String,
    pub biography: String,
    pub avatar_url: String,
    pub followers: i64,
    pub following: i64,
    pub posts: i64,
    pub is_following: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBioRequest {
    pub biography: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FollowRequest {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FollowResponse {
    pub following: bool,
    pub followers: i64,
}
