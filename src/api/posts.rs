use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::entities::{comment, follow, post, post_like, user};
use crate::error::ApiError;
use crate::models::{CreatePostRequest, LikeResponse, PostResponse};
use actix_web::{web, HttpResponse};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde_json::json;

async fn post_response(
    post: post::Model,
    requester_id: Option<i64>,
    pool: &DbPool,
) -> Result<PostResponse, ApiError> {
    let like_count = post_like::Entity::find()
        .filter(post_like::Column::PostId.eq(post.id))
        .count(pool)
        .await? as i64;

    let comment_count = comment::Entity::find()
        .filter(comment::Column::PostId.eq(post.id))
        .count(pool)
        .await? as i64;

    let is_liked = match requester_id {
        Some(user_id) => post_like::Entity::find()
            .filter(
                Condition::all()
                    .add(post_like::Column::PostId.eq(post.id))
                    .add(post_like::Column::UserId.eq(user_id)),
            )
            .one(pool)
            .await?
            .is_some(),
        None => false,
    };

    Ok(PostResponse {
        id: post.id,
        user_id: post.user_id,
        username: post.username,
        content: post.content,
        like_count,
        comment_count,
        is_liked,
        created_at: post.created_at,
    })
}

#[utoipa::path(
    post,
    path = "/posts/post",
    request_body = CreatePostRequest,
    responses(
        (status = 200, description = "Post created successfully", body = PostResponse),
        (status = 400, description = "Empty content"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "posts"
)]
pub async fn create_post(
    req: web::Json<CreatePostRequest>,
    requester: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    if req.content.trim().is_empty() {
        return Err(ApiError::validation("Post content cannot be empty"));
    }

    let author = user::Entity::find_by_id(requester.user_id)
        .one(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let new_post = post::ActiveModel {
        user_id: sea_orm::Set(author.id),
        username: sea_orm::Set(author.username.clone()),
        content: sea_orm::Set(req.content.clone()),
        ..Default::default()
    };

    let post = post::Entity::insert(new_post)
        .exec_with_returning(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(PostResponse {
        id: post.id,
        user_id: post.user_id,
        username: post.username,
        content: post.content,
        like_count: 0,
        comment_count: 0,
        is_liked: false,
        created_at: post.created_at,
    }))
}

#[utoipa::path(
    get,
    path = "/posts/feed",
    responses(
        (status = 200, description = "Posts from the requester and followed users", body = Vec<PostResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "posts"
)]
pub async fn get_feed(
    requester: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let edges = follow::Entity::find()
        .filter(follow::Column::FollowerId.eq(requester.user_id))
        .all(pool.get_ref())
        .await?;

    let mut author_ids: Vec<i64> = edges.into_iter().map(|e| e.following_id).collect();
    author_ids.push(requester.user_id);

    let posts = post::Entity::find()
        .filter(post::Column::UserId.is_in(author_ids))
        .order_by_desc(post::Column::CreatedAt)
        .all(pool.get_ref())
        .await?;

    let mut responses = Vec::with_capacity(posts.len());
    for post in posts {
        responses.push(post_response(post, Some(requester.user_id), pool.get_ref()).await?);
    }

    Ok(HttpResponse::Ok().json(responses))
}

#[utoipa::path(
    get,
    path = "/posts/user/{username}",
    params(
        ("username" = String, Path, description = "Author username")
    ),
    responses(
        (status = 200, description = "Posts authored by the user", body = Vec<PostResponse>),
        (status = 404, description = "User not found")
    ),
    tag = "posts"
)]
pub async fn get_user_posts(
    path: web::Path<String>,
    requester: Option<AuthenticatedUser>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let username = path.into_inner();

    let author = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let posts = post::Entity::find()
        .filter(post::Column::UserId.eq(author.id))
        .order_by_desc(post::Column::CreatedAt)
        .all(pool.get_ref())
        .await?;

    let requester_id = requester.map(|u| u.user_id);
    let mut responses = Vec::with_capacity(posts.len());
    for post in posts {
        responses.push(post_response(post, requester_id, pool.get_ref()).await?);
    }

    Ok(HttpResponse::Ok().json(responses))
}

#[utoipa::path(
    delete,
    path = "/posts/{post_id}",
    params(
        ("post_id" = i64, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 403, description = "Not the post owner"),
        (status = 404, description = "Post not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "posts"
)]
pub async fn delete_post(
    path: web::Path<i64>,
    requester: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let post_id = path.into_inner();

    let post = post::Entity::find_by_id(post_id)
        .one(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if post.user_id != requester.user_id {
        return Err(ApiError::Forbidden(
            "Only the author can delete a post".to_string(),
        ));
    }

    // Likes and comments go with the post via ON DELETE CASCADE.
    post::Entity::delete_by_id(post_id)
        .exec(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({"message": "Post deleted"})))
}

#[utoipa::path(
    post,
    path = "/posts/{post_id}/like",
    params(
        ("post_id" = i64, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post liked", body = LikeResponse),
        (status = 400, description = "Already liked"),
        (status = 404, description = "Post not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "posts"
)]
pub async fn like_post(
    path: web::Path<i64>,
    requester: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let post_id = path.into_inner();

    post::Entity::find_by_id(post_id)
        .one(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    let existing = post_like::Entity::find()
        .filter(
            Condition::all()
                .add(post_like::Column::PostId.eq(post_id))
                .add(post_like::Column::UserId.eq(requester.user_id)),
        )
        .one(pool.get_ref())
        .await?;

    if existing.is_some() {
        return Err(ApiError::validation("Post already liked"));
    }

    let new_like = post_like::ActiveModel {
        post_id: sea_orm::Set(post_id),
        user_id: sea_orm::Set(requester.user_id),
        ..Default::default()
    };

    post_like::Entity::insert(new_like)
        .exec(pool.get_ref())
        .await?;

    let likes = post_like::Entity::find()
        .filter(post_like::Column::PostId.eq(post_id))
        .count(pool.get_ref())
        .await? as i64;

    Ok(HttpResponse::Ok().json(LikeResponse { likes }))
}

#[utoipa::path(
    delete,
    path = "/posts/{post_id}/like",
    params(
        ("post_id" = i64, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post unliked", body = LikeResponse),
        (status = 400, description = "Post was not liked"),
        (status = 404, description = "Post not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "posts"
)]
pub async fn unlike_post(
    path: web::Path<i64>,
    requester: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let post_id = path.into_inner();

    post::Entity::find_by_id(post_id)
        .one(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    let result = post_like::Entity::delete_many()
        .filter(
            Condition::all()
                .add(post_like::Column::PostId.eq(post_id))
                .add(post_like::Column::UserId.eq(requester.user_id)),
        )
        .exec(pool.get_ref())
        .await?;

    if result.rows_affected == 0 {
        return Err(ApiError::validation("Post is not liked"));
    }

    let likes = post_like::Entity::find()
        .filter(post_like::Column::PostId.eq(post_id))
        .count(pool.get_ref())
        .await? as i64;

    Ok(HttpResponse::Ok().json(LikeResponse { likes }))
}
