pub mod chats;
pub mod comments;
pub mod posts;
pub mod users;

use crate::models::{
    AuthResponse, ChangePasswordRequest, ChatHistoryResponse, ChatPreview, ChatResponse,
    CommentRequest, CommentResponse, CreatePostRequest, FollowRequest, FollowResponse,
    LikeResponse, LoginRequest, MessageResponse, NewMessageRequest, OpenChatRequest, PostResponse,
    ProfileResponse, RegisterRequest, UpdateBioRequest, UserResponse,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        // User endpoints
        users::register,
        users::login,
        users::get_profile,
        users::toggle_follow,
        users::update_bio,
        users::change_password,
        // Post endpoints
        posts::create_post,
        posts::get_feed,
        posts::get_user_posts,
        posts::delete_post,
        posts::like_post,
        posts::unlike_post,
        // Comment endpoints
        comments::create_comment,
        comments::get_comments,
        comments::delete_comment,
        // Chat endpoints
        chats::open_chat,
        chats::get_user_chats,
        chats::get_chat,
        chats::new_message,
    ),
    components(schemas(
        // User schemas
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        UserResponse,
        ProfileResponse,
        UpdateBioRequest,
        ChangePasswordRequest,
        FollowRequest,
        FollowResponse,
        // Post schemas
        CreatePostRequest,
        PostResponse,
        LikeResponse,
        CommentRequest,
        CommentResponse,
        // Chat schemas
        OpenChatRequest,
        ChatResponse,
        NewMessageRequest,
        MessageResponse,
        ChatHistoryResponse,
        ChatPreview,
    )),
    tags(
        (name = "users", description = "User directory and social graph endpoints"),
        (name = "posts", description = "Post and like endpoints"),
        (name = "comments", description = "Comment endpoints"),
        (name = "chats", description = "Conversation and message endpoints"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

use utoipa::Modify;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
