use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::entities::{comment, post, user};
use crate::error::ApiError;
use crate::models::{CommentRequest, CommentResponse};
use actix_web::{web, HttpResponse};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde_json::json;
use std::collections::HashMap;

#[utoipa::path(
    post,
    path = "/comments/post/{post_id}",
    params(
        ("post_id" = i64, Path, description = "Post ID")
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Empty content"),
        (status = 404, description = "Post not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "comments"
)]
pub async fn create_comment(
    path: web::Path<i64>,
    req: web::Json<CommentRequest>,
    requester: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let post_id = path.into_inner();

    if req.content.trim().is_empty() {
        return Err(ApiError::validation("Comment content cannot be empty"));
    }

    post::Entity::find_by_id(post_id)
        .one(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    let author = user::Entity::find_by_id(requester.user_id)
        .one(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let new_comment = comment::ActiveModel {
        post_id: sea_orm::Set(post_id),
        user_id: sea_orm::Set(requester.user_id),
        content: sea_orm::Set(req.content.clone()),
        ..Default::default()
    };

    let comment = comment::Entity::insert(new_comment)
        .exec_with_returning(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        user_id: comment.user_id,
        username: author.username,
        content: comment.content,
        created_at: comment.created_at,
    }))
}

#[utoipa::path(
    get,
    path = "/comments/post/{post_id}",
    params(
        ("post_id" = i64, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Comments in posting order", body = Vec<CommentResponse>),
        (status = 404, description = "Post not found")
    ),
    tag = "comments"
)]
pub async fn get_comments(
    path: web::Path<i64>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let post_id = path.into_inner();

    post::Entity::find_by_id(post_id)
        .one(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    let comments = comment::Entity::find()
        .filter(comment::Column::PostId.eq(post_id))
        .order_by_asc(comment::Column::CreatedAt)
        .order_by_asc(comment::Column::Id)
        .all(pool.get_ref())
        .await?;

    let author_ids: Vec<i64> = comments.iter().map(|c| c.user_id).collect();
    let authors: HashMap<i64, String> = user::Entity::find()
        .filter(user::Column::Id.is_in(author_ids))
        .all(pool.get_ref())
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    let responses: Vec<CommentResponse> = comments
        .into_iter()
        .map(|c| CommentResponse {
            id: c.id,
            post_id: c.post_id,
            user_id: c.user_id,
            username: authors.get(&c.user_id).cloned().unwrap_or_default(),
            content: c.content,
            created_at: c.created_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(responses))
}

#[utoipa::path(
    delete,
    path = "/comments/{comment_id}",
    params(
        ("comment_id" = i64, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment deleted"),
        (status = 403, description = "Not the comment owner"),
        (status = 404, description = "Comment not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "comments"
)]
pub async fn delete_comment(
    path: web::Path<i64>,
    requester: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let comment_id = path.into_inner();

    let comment = comment::Entity::find_by_id(comment_id)
        .one(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    if comment.user_id != requester.user_id {
        return Err(ApiError::Forbidden(
            "Only the author can delete a comment".to_string(),
        ));
    }

    comment::Entity::delete_by_id(comment_id)
        .exec(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({"message": "Comment deleted"})))
}
