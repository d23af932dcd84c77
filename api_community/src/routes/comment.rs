use std::sync::Arc;

use actix_web::{Responder, delete, post, web};
use common::{error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{dtos::community::CreateCommentRequest, services};

/// Comments on a post. Costs one `community_comment` use.
#[post("/posts/{post_id}/comments")]
pub async fn post_comment(
    pool: web::Data<Arc<PgPool>>,
    claims: web::ReqData<JwtClaims>,
    post_id: web::Path<Uuid>,
    req: web::Json<CreateCommentRequest>,
) -> Res<impl Responder> {
    let comment = services::community::create_comment(
        &pool,
        &claims,
        post_id.into_inner(),
        req.into_inner(),
    )
    .await?;
    Success::created(comment)
}

/// Deletes a comment; owner or admin only.
#[delete("/comments/{comment_id}")]
pub async fn delete_comment(
    pool: web::Data<Arc<PgPool>>,
    claims: web::ReqData<JwtClaims>,
    comment_id: web::Path<Uuid>,
) -> Res<impl Responder> {
    services::community::delete_comment(&pool, &claims, comment_id.into_inner()).await?;
    Success::no_content()
}
