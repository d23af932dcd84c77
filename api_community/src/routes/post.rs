use std::sync::Arc;

use actix_web::{Responder, delete, get, post, put, web};
use common::{error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dtos::community::{CreatePostRequest, UpdatePostRequest},
    services,
};

#[get("/posts")]
pub async fn get_posts(pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    let posts = services::community::list_posts(&pool).await?;
    Success::ok(posts)
}

#[get("/posts/{post_id}")]
pub async fn get_post(
    pool: web::Data<Arc<PgPool>>,
    post_id: web::Path<Uuid>,
) -> Res<impl Responder> {
    let post = services::community::get_post(&pool, post_id.into_inner()).await?;
    Success::ok(post)
}

/// Creates a post. Costs one `community_post` use.
#[post("/posts")]
pub async fn post_post(
    pool: web::Data<Arc<PgPool>>,
    claims: web::ReqData<JwtClaims>,
    req: web::Json<CreatePostRequest>,
) -> Res<impl Responder> {
    let post = services::community::create_post(&pool, &claims, req.into_inner()).await?;
    Success::created(post)
}

/// Edits a post; owner or admin only.
#[put("/posts/{post_id}")]
pub async fn put_post(
    pool: web::Data<Arc<PgPool>>,
    claims: web::ReqData<JwtClaims>,
    post_id: web::Path<Uuid>,
    req: web::Json<UpdatePostRequest>,
) -> Res<impl Responder> {
    let post =
        services::community::update_post(&pool, &claims, post_id.into_inner(), req.into_inner())
            .await?;
    Success::ok(post)
}

/// Deletes a post; owner or admin only.
#[delete("/posts/{post_id}")]
pub async fn delete_post(
    pool: web::Data<Arc<PgPool>>,
    claims: web::ReqData<JwtClaims>,
    post_id: web::Path<Uuid>,
) -> Res<impl Responder> {
    services::community::delete_post(&pool, &claims, post_id.into_inner()).await?;
    Success::no_content()
}
