use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use common::{env_config::Config, error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;

use crate::{
    dtos::auth::{LoginRequest, RegisterRequest},
    services,
};

/// Creates a member account with a subscription on the default free
/// plan and returns a JWT for it.
#[post("/register")]
pub async fn post_register(
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
    req: web::Json<RegisterRequest>,
) -> Res<impl Responder> {
    let auth = services::auth::register(&pool, &config, req.into_inner()).await?;
    Success::created(auth)
}

/// Exchanges credentials for a JWT.
#[post("/login")]
pub async fn post_login(
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
    req: web::Json<LoginRequest>,
) -> Res<impl Responder> {
    let auth = services::auth::login(&pool, &config, req.into_inner()).await?;
    Success::ok(auth)
}

/// The authenticated user's profile.
#[get("/me")]
pub async fn get_me(
    pool: web::Data<Arc<PgPool>>,
    claims: web::ReqData<JwtClaims>,
) -> Res<impl Responder> {
    let user = services::auth::me(&pool, claims.user_id).await?;
    Success::ok(user)
}
