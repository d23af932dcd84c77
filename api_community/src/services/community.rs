use authz::Role;
use chrono::Utc;
use common::{
    error::{AppError, Res},
    jwt::JwtClaims,
};
use db::{
    dtos::community::{CommentCreateRequest, PostCreateRequest, PostUpdateRequest},
    ledger::PgLedgerStore,
    models::community::{Comment, Post},
};
use entitlements::{Entitlements, FeatureKey, SubscriptionState};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::community::{
    CreateCommentRequest, CreatePostRequest, PostWithComments, UpdatePostRequest,
};

fn member_role(claims: &JwtClaims) -> Res<Role> {
    let role: Role = claims.role.parse()?;
    if !authz::can_create_member_content(role) {
        return Err(AppError::Forbidden(
            "Guests may not create content".to_string(),
        ));
    }
    Ok(role)
}

async fn fresh_state(
    pool: &PgPool,
    ents: &Entitlements<PgLedgerStore>,
    claims: &JwtClaims,
) -> Res<SubscriptionState> {
    let (_, _, state) = db::sub::load_state(pool, claims.user_id).await?;
    let state = ents
        .rollover_if_due(&state, Utc::now().naive_utc())
        .await?
        .unwrap_or(state);
    Ok(state)
}

/// Creates a community post under the `community_post` quota, removing
/// the row again if the consume step fails.
pub async fn create_post(pool: &PgPool, claims: &JwtClaims, req: CreatePostRequest) -> Res<Post> {
    member_role(claims)?;
    if req.title.trim().is_empty() || req.body.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Posts need a title and a body".to_string(),
        ));
    }

    let ents = Entitlements::new(PgLedgerStore::new(pool.clone()));
    let state = fresh_state(pool, &ents, claims).await?;
    ents.check(&state, FeatureKey::CommunityPost)?;

    let post = db::community::insert_post(
        pool,
        PostCreateRequest {
            author_id: claims.user_id,
            title: req.title,
            body: req.body,
        },
    )
    .await?;

    match ents.consume(&state, FeatureKey::CommunityPost).await {
        Ok(_) => {
            db::usage_event::insert(
                pool,
                claims.user_id,
                state.subscription_id,
                FeatureKey::CommunityPost,
            )
            .await?;
            Ok(post)
        }
        Err(err) => {
            db::community::delete_post(pool, post.id).await?;
            Err(err)
        }
    }
}

/// Comments follow the same gate sequence under `community_comment`.
pub async fn create_comment(
    pool: &PgPool,
    claims: &JwtClaims,
    post_id: Uuid,
    req: CreateCommentRequest,
) -> Res<Comment> {
    member_role(claims)?;
    if req.body.trim().is_empty() {
        return Err(AppError::BadRequest("Comments need a body".to_string()));
    }

    // commenting on a missing post is 404, not a wasted quota use
    let post = db::community::get_post(pool, post_id).await?;

    let ents = Entitlements::new(PgLedgerStore::new(pool.clone()));
    let state = fresh_state(pool, &ents, claims).await?;
    ents.check(&state, FeatureKey::CommunityComment)?;

    let comment = db::community::insert_comment(
        pool,
        CommentCreateRequest {
            post_id: post.id,
            author_id: claims.user_id,
            body: req.body,
        },
    )
    .await?;

    match ents.consume(&state, FeatureKey::CommunityComment).await {
        Ok(_) => {
            db::usage_event::insert(
                pool,
                claims.user_id,
                state.subscription_id,
                FeatureKey::CommunityComment,
            )
            .await?;
            Ok(comment)
        }
        Err(err) => {
            db::community::delete_comment(pool, comment.id).await?;
            Err(err)
        }
    }
}

pub async fn list_posts(pool: &PgPool) -> Res<Vec<Post>> {
    db::community::list_recent_posts(pool, 50).await
}

pub async fn get_post(pool: &PgPool, post_id: Uuid) -> Res<PostWithComments> {
    let post = db::community::get_post(pool, post_id).await?;
    let comments = db::community::list_comments_for_post(pool, post_id).await?;
    Ok(PostWithComments { post, comments })
}

/// Editing is owner-or-admin; no quota involved.
pub async fn update_post(
    pool: &PgPool,
    claims: &JwtClaims,
    post_id: Uuid,
    req: UpdatePostRequest,
) -> Res<Post> {
    let role: Role = claims.role.parse()?;
    let post = db::community::get_post(pool, post_id).await?;
    if !authz::can_edit_resource(role, claims.user_id, post.author_id) {
        return Err(AppError::Forbidden(
            "You may only edit your own posts".to_string(),
        ));
    }

    db::community::update_post(
        pool,
        post_id,
        PostUpdateRequest {
            title: req.title,
            body: req.body,
        },
    )
    .await
}

pub async fn delete_post(pool: &PgPool, claims: &JwtClaims, post_id: Uuid) -> Res<()> {
    let role: Role = claims.role.parse()?;
    let post = db::community::get_post(pool, post_id).await?;
    if !authz::can_edit_resource(role, claims.user_id, post.author_id) {
        return Err(AppError::Forbidden(
            "You may only delete your own posts".to_string(),
        ));
    }
    db::community::delete_post(pool, post_id).await
}

pub async fn delete_comment(pool: &PgPool, claims: &JwtClaims, comment_id: Uuid) -> Res<()> {
    let role: Role = claims.role.parse()?;
    let comment = db::community::get_comment(pool, comment_id).await?;
    if !authz::can_edit_resource(role, claims.user_id, comment.author_id) {
        return Err(AppError::Forbidden(
            "You may only delete your own comments".to_string(),
        ));
    }
    db::community::delete_comment(pool, comment_id).await
}
