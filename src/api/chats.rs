use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::entities::{chat, message, user};
use crate::error::ApiError;
use crate::models::{
    ChatHistoryResponse, ChatPreview, ChatResponse, MessageResponse, NewMessageRequest,
    OpenChatRequest,
};
use crate::services::chat::{build_inbox, canonical_pair};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};

const MESSAGE_MIN: usize = 1;
const MESSAGE_MAX: usize = 500;

fn validate_message(content: &str) -> Result<(), ApiError> {
    let len = content.chars().count();
    if !(MESSAGE_MIN..=MESSAGE_MAX).contains(&len) {
        return Err(ApiError::validation(format!(
            "Message must be between {} and {} characters",
            MESSAGE_MIN, MESSAGE_MAX
        )));
    }
    Ok(())
}

async fn append_message(
    chat_id: i64,
    sender_id: i64,
    content: &str,
    pool: &DbPool,
) -> Result<message::Model, ApiError> {
    let new_message = message::ActiveModel {
        chat_id: sea_orm::Set(chat_id),
        sender_id: sea_orm::Set(sender_id),
        content: sea_orm::Set(content.to_string()),
        sent_at: sea_orm::Set(Utc::now()),
        ..Default::default()
    };

    let message = message::Entity::insert(new_message)
        .exec_with_returning(pool)
        .await?;

    Ok(message)
}

#[utoipa::path(
    post,
    path = "/chats/chat",
    request_body = OpenChatRequest,
    responses(
        (status = 200, description = "Existing or newly created conversation", body = ChatResponse),
        (status = 400, description = "Self-conversation or missing target"),
        (status = 404, description = "Target user doesn't exist")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "chats"
)]
pub async fn open_chat(
    req: web::Json<OpenChatRequest>,
    requester: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let target = if let Some(username) = &req.username {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(pool.get_ref())
            .await?
    } else if let Some(user_to_id) = req.user_to_id {
        user::Entity::find_by_id(user_to_id).one(pool.get_ref()).await?
    } else {
        return Err(ApiError::validation("username or user_to_id is required"));
    };

    let target = target.ok_or_else(|| ApiError::not_found("User doesn't exist"))?;

    if target.id == requester.user_id {
        return Err(ApiError::validation(
            "Cannot open a conversation with yourself",
        ));
    }

    let (user1_id, user2_id) = canonical_pair(requester.user_id, target.id);

    let existing = chat::Entity::find()
        .filter(
            Condition::all()
                .add(chat::Column::User1Id.eq(user1_id))
                .add(chat::Column::User2Id.eq(user2_id)),
        )
        .one(pool.get_ref())
        .await?;

    let (chat, created) = match existing {
        Some(chat) => (chat, false),
        None => {
            let new_chat = chat::ActiveModel {
                user1_id: sea_orm::Set(user1_id),
                user2_id: sea_orm::Set(user2_id),
                ..Default::default()
            };
            let chat = chat::Entity::insert(new_chat)
                .exec_with_returning(pool.get_ref())
                .await?;
            log::info!(
                "Created chat {} for pair ({}, {})",
                chat.id,
                user1_id,
                user2_id
            );
            (chat, true)
        }
    };

    if let Some(content) = &req.message {
        validate_message(content)?;
        append_message(chat.id, requester.user_id, content, pool.get_ref()).await?;
    }

    Ok(HttpResponse::Ok().json(ChatResponse {
        id: chat.id,
        partner_id: target.id,
        partner_username: target.username,
        created,
    }))
}

#[utoipa::path(
    get,
    path = "/chats/userChats",
    responses(
        (status = 200, description = "Conversations ordered by most recent message", body = Vec<ChatPreview>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "chats"
)]
pub async fn get_user_chats(
    requester: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let chats = chat::Entity::find()
        .filter(
            Condition::any()
                .add(chat::Column::User1Id.eq(requester.user_id))
                .add(chat::Column::User2Id.eq(requester.user_id)),
        )
        .all(pool.get_ref())
        .await?;

    let mut entries = Vec::with_capacity(chats.len());
    for chat in chats {
        let partner_id = chat.partner_of(requester.user_id);

        let partner = match user::Entity::find_by_id(partner_id).one(pool.get_ref()).await? {
            Some(partner) => partner,
            None => continue,
        };

        let last = message::Entity::find()
            .filter(message::Column::ChatId.eq(chat.id))
            .order_by_desc(message::Column::SentAt)
            .order_by_desc(message::Column::Id)
            .one(pool.get_ref())
            .await?;

        entries.push(ChatPreview {
            chat_id: chat.id,
            partner_id,
            partner_username: partner.username,
            last_message: last.as_ref().map(|m| m.content.clone()),
            last_sender_id: last.as_ref().map(|m| m.sender_id),
            last_sent_at: last.as_ref().map(|m| m.sent_at),
        });
    }

    Ok(HttpResponse::Ok().json(build_inbox(entries)))
}

#[utoipa::path(
    get,
    path = "/chats/chat/{chat_id}",
    params(
        ("chat_id" = i64, Path, description = "Chat ID")
    ),
    responses(
        (status = 200, description = "Full message history, oldest first", body = ChatHistoryResponse),
        (status = 403, description = "Requester is not a participant"),
        (status = 404, description = "Chat not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "chats"
)]
pub async fn get_chat(
    path: web::Path<i64>,
    requester: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let chat_id = path.into_inner();

    let chat = chat::Entity::find_by_id(chat_id)
        .one(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Chat not found"))?;

    if !chat.has_participant(requester.user_id) {
        return Err(ApiError::Forbidden(
            "Not a participant of this chat".to_string(),
        ));
    }

    let partner_id = chat.partner_of(requester.user_id);
    let partner = user::Entity::find_by_id(partner_id)
        .one(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let messages = message::Entity::find()
        .filter(message::Column::ChatId.eq(chat.id))
        .order_by_asc(message::Column::SentAt)
        .order_by_asc(message::Column::Id)
        .all(pool.get_ref())
        .await?;

    let messages = messages
        .into_iter()
        .map(|m| MessageResponse {
            id: m.id,
            chat_id: m.chat_id,
            sender_id: m.sender_id,
            content: m.content,
            sent_at: m.sent_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ChatHistoryResponse {
        id: chat.id,
        partner_id,
        partner_username: partner.username,
        messages,
    }))
}

#[utoipa::path(
    post,
    path = "/chats/chat/{chat_id}/newMessage",
    params(
        ("chat_id" = i64, Path, description = "Chat ID")
    ),
    request_body = NewMessageRequest,
    responses(
        (status = 200, description = "Message appended", body = MessageResponse),
        (status = 400, description = "Message length out of bounds"),
        (status = 403, description = "Requester is not a participant"),
        (status = 404, description = "Chat not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "chats"
)]
pub async fn new_message(
    path: web::Path<i64>,
    req: web::Json<NewMessageRequest>,
    requester: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let chat_id = path.into_inner();

    validate_message(&req.message)?;

    let chat = chat::Entity::find_by_id(chat_id)
        .one(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Chat not found"))?;

    if !chat.has_participant(requester.user_id) {
        return Err(ApiError::Forbidden(
            "Not a participant of this chat".to_string(),
        ));
    }

    let message = append_message(chat.id, requester.user_id, &req.message, pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        id: message.id,
        chat_id: message.chat_id,
        sender_id: message.sender_id,
        content: message.content,
        sent_at: message.sent_at,
    }))
}
