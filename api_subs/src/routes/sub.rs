use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use common::{error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;

use crate::{
    dtos::sub::{UpgradeRequest, UsageQuery},
    services,
};

/// The authenticated user's active subscription and plan.
#[get("/current")]
pub async fn get_current(
    pool: web::Data<Arc<PgPool>>,
    claims: web::ReqData<JwtClaims>,
) -> Res<impl Responder> {
    let current = services::sub::current(&pool, claims.user_id).await?;
    Success::ok(current)
}

/// Remaining allowance per feature plus consumption in the current
/// billing cycle.
#[get("/usage")]
pub async fn get_usage(
    pool: web::Data<Arc<PgPool>>,
    claims: web::ReqData<JwtClaims>,
    query: web::Query<UsageQuery>,
) -> Res<impl Responder> {
    let usage = services::sub::usage(&pool, claims.user_id, query.into_inner()).await?;
    Success::ok(usage)
}

/// Switches the user to another plan with a fresh allowance.
#[post("/upgrade")]
pub async fn post_upgrade(
    pool: web::Data<Arc<PgPool>>,
    claims: web::ReqData<JwtClaims>,
    req: web::Json<UpgradeRequest>,
) -> Res<impl Responder> {
    let current = services::sub::upgrade(&pool, claims.user_id, req.plan_id).await?;
    Success::created(current)
}

/// Soft-terminates the active subscription.
#[post("/cancel")]
pub async fn post_cancel(
    pool: web::Data<Arc<PgPool>>,
    claims: web::ReqData<JwtClaims>,
) -> Res<impl Responder> {
    services::sub::cancel(&pool, claims.user_id).await?;
    Success::no_content()
}
