use crate::auth::{create_token, hash_password, verify_password, AuthenticatedUser, Claims};
use crate::config::Config;
use crate::db::DbPool;
use crate::entities::{follow, post, user};
use crate::error::ApiError;
use crate::models::{
    AuthResponse, ChangePasswordRequest, FollowRequest, FollowResponse, LoginRequest,
    ProfileResponse, RegisterRequest, UpdateBioRequest, UserResponse,
};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
};
use serde_json::json;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 10;
const BIOGRAPHY_MAX: usize = 300;
const PASSWORD_MIN: usize = 6;

fn validate_username(username: &str) -> Result<(), ApiError> {
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(ApiError::validation(format!(
            "Username must be between {} and {} characters",
            USERNAME_MIN, USERNAME_MAX
        )));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(ApiError::validation(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN
        )));
    }
    Ok(())
}

async fn profile_of(
    target: &user::Model,
    requester_id: Option<i64>,
    pool: &DbPool,
    config: &Config,
) -> Result<ProfileResponse, ApiError> {
    let followers = follow::Entity::find()
        .filter(follow::Column::FollowingId.eq(target.id))
        .count(pool)
        .await? as i64;

    let following = follow::Entity::find()
        .filter(follow::Column::FollowerId.eq(target.id))
        .count(pool)
        .await? as i64;

    let posts = post::Entity::find()
        .filter(post::Column::UserId.eq(target.id))
        .count(pool)
        .await? as i64;

    let is_following = match requester_id {
        Some(requester_id) if requester_id != target.id => follow::Entity::find()
            .filter(
                Condition::all()
                    .add(follow::Column::FollowerId.eq(requester_id))
                    .add(follow::Column::FollowingId.eq(target.id)),
            )
            .one(pool)
            .await?
            .is_some(),
        _ => false,
    };

    Ok(ProfileResponse {
        id: target.id,
        username: target.username.clone(),
        biography: target.biography.clone(),
        avatar_url: config.avatar_url(&target.username),
        followers,
        following,
        posts,
        is_following,
    })
}

#[utoipa::path(
    post,
    path = "/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Invalid username, email or password"),
        (status = 409, description = "User already exists")
    ),
    tag = "users"
)]
pub async fn register(
    req: web::Json<RegisterRequest>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    validate_username(&req.username)?;
    validate_password(&req.password)?;
    if !req.email.contains('@') {
        return Err(ApiError::validation("Invalid email address"));
    }

    let existing_user = user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Email.eq(&req.email))
                .add(user::Column::Username.eq(&req.username)),
        )
        .one(pool.get_ref())
        .await?;

    if existing_user.is_some() {
        return Err(ApiError::Conflict(
            "User with this email or username already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)?;

    let new_user = user::ActiveModel {
        email: sea_orm::Set(req.email.clone()),
        username: sea_orm::Set(req.username.clone()),
        password_hash: sea_orm::Set(password_hash),
        biography: sea_orm::Set(String::new()),
        ..Default::default()
    };

    let user = user::Entity::insert(new_user)
        .exec_with_returning(pool.get_ref())
        .await?;

    let claims = Claims::new(user.id, user.email.clone(), config.jwt.expiration_hours);
    let token = create_token(&claims, &config.jwt.secret)?;

    log::info!("Registered user {} (id {})", user.username, user.id);

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user: UserResponse {
            id: user.id,
            email: user.email,
            username: user.username,
        },
    }))
}

#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn login(
    req: web::Json<LoginRequest>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let user = user::Entity::find()
        .filter(user::Column::Email.eq(&req.email))
        .one(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let is_valid = verify_password(&req.password, &user.password_hash)?;
    if !is_valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let claims = Claims::new(user.id, user.email.clone(), config.jwt.expiration_hours);
    let token = create_token(&claims, &config.jwt.secret)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: UserResponse {
            id: user.id,
            email: user.email,
            username: user.username,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/users/user/{username}",
    params(
        ("username" = String, Path, description = "Username to look up")
    ),
    responses(
        (status = 200, description = "Public profile", body = ProfileResponse),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_profile(
    path: web::Path<String>,
    requester: Option<AuthenticatedUser>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let username = path.into_inner();

    let target = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let profile = profile_of(
        &target,
        requester.map(|u| u.user_id),
        pool.get_ref(),
        config.get_ref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    post,
    path = "/users/follow",
    request_body = FollowRequest,
    responses(
        (status = 200, description = "Follow state toggled", body = FollowResponse),
        (status = 400, description = "Cannot follow yourself"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "users"
)]
pub async fn toggle_follow(
    req: web::Json<FollowRequest>,
    requester: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let target = user::Entity::find()
        .filter(user::Column::Username.eq(&req.username))
        .one(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if target.id == requester.user_id {
        return Err(ApiError::validation("Cannot follow yourself"));
    }

    let existing = follow::Entity::find()
        .filter(
            Condition::all()
                .add(follow::Column::FollowerId.eq(requester.user_id))
                .add(follow::Column::FollowingId.eq(target.id)),
        )
        .one(pool.get_ref())
        .await?;

    let following = match existing {
        Some(edge) => {
            follow::Entity::delete_by_id(edge.id)
                .exec(pool.get_ref())
                .await?;
            false
        }
        None => {
            let new_edge = follow::ActiveModel {
                follower_id: sea_orm::Set(requester.user_id),
                following_id: sea_orm::Set(target.id),
                ..Default::default()
            };
            follow::Entity::insert(new_edge).exec(pool.get_ref()).await?;
            true
        }
    };

    let followers = follow::Entity::find()
        .filter(follow::Column::FollowingId.eq(target.id))
        .count(pool.get_ref())
        .await? as i64;

    Ok(HttpResponse::Ok().json(FollowResponse {
        following,
        followers,
    }))
}

#[utoipa::path(
    put,
    path = "/users/bio",
    request_body = UpdateBioRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Biography too long"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "users"
)]
pub async fn update_bio(
    req: web::Json<UpdateBioRequest>,
    requester: AuthenticatedUser,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    if req.biography.chars().count() > BIOGRAPHY_MAX {
        return Err(ApiError::validation(format!(
            "Biography must be at most {} characters",
            BIOGRAPHY_MAX
        )));
    }

    let me = user::Entity::find_by_id(requester.user_id)
        .one(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let mut active: user::ActiveModel = me.into();
    active.biography = sea_orm::Set(req.biography.clone());
    active.updated_at = sea_orm::Set(Utc::now());
    let updated = active.update(pool.get_ref()).await?;

    let profile = profile_of(&updated, None, pool.get_ref(), config.get_ref()).await?;

    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    put,
    path = "/users/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "New password too short"),
        (status = 401, description = "Wrong current password")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "users"
)]
pub async fn change_password(
    req: web::Json<ChangePasswordRequest>,
    requester: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    validate_password(&req.new_password)?;

    let me = user::Entity::find_by_id(requester.user_id)
        .one(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let is_valid = verify_password(&req.current_password, &me.password_hash)?;
    if !is_valid {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let password_hash = hash_password(&req.new_password)?;

    let mut active: user::ActiveModel = me.into();
    active.password_hash = sea_orm::Set(password_hash);
    active.updated_at = sea_orm::Set(Utc::now());
    active.update(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({"message": "Password changed"})))
}
