use std::sync::Arc;

use actix_web::{Responder, post, web};
use common::{error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;

use crate::{
    dtos::generation::{GenerateRecipeRequest, GenerateVideoRequest, SuggestionRequest},
    services,
};

/// Generates a recipe. Costs one `recipe_generation` use.
#[post("/recipe")]
pub async fn post_recipe(
    pool: web::Data<Arc<PgPool>>,
    claims: web::ReqData<JwtClaims>,
    req: web::Json<GenerateRecipeRequest>,
) -> Res<impl Responder> {
    let recipe = services::generation::generate_recipe(&pool, &claims, req.into_inner()).await?;
    Success::created(recipe)
}

/// Generates a video storyboard for one of the caller's recipes. Costs
/// one `video_generation` use.
#[post("/video")]
pub async fn post_video(
    pool: web::Data<Arc<PgPool>>,
    claims: web::ReqData<JwtClaims>,
    req: web::Json<GenerateVideoRequest>,
) -> Res<impl Responder> {
    let video = services::generation::generate_video(&pool, &claims, req.into_inner()).await?;
    Success::created(video)
}

/// Ingredient suggestions; available on plans with the AI flag.
#[post("/suggestions")]
pub async fn post_suggestions(
    pool: web::Data<Arc<PgPool>>,
    claims: web::ReqData<JwtClaims>,
    req: web::Json<SuggestionRequest>,
) -> Res<impl Responder> {
    let suggestions = services::generation::suggest_ingredients(&pool, &claims, req.into_inner()).await?;
    Success::ok(suggestions)
}
