use std::sync::Arc;

use actix_web::{Responder, delete, get, web};
use common::{error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;
use uuid::Uuid;

use crate::services;

#[get("")]
pub async fn get_recipes(
    pool: web::Data<Arc<PgPool>>,
    claims: web::ReqData<JwtClaims>,
) -> Res<impl Responder> {
    let recipes = services::generation::list_recipes(&pool, &claims).await?;
    Success::ok(recipes)
}

#[get("/{recipe_id}")]
pub async fn get_recipe(
    pool: web::Data<Arc<PgPool>>,
    claims: web::ReqData<JwtClaims>,
    recipe_id: web::Path<Uuid>,
) -> Res<impl Responder> {
    let recipe = services::generation::get_recipe(&pool, &claims, recipe_id.into_inner()).await?;
    Success::ok(recipe)
}

#[delete("/{recipe_id}")]
pub async fn delete_recipe(
    pool: web::Data<Arc<PgPool>>,
    claims: web::ReqData<JwtClaims>,
    recipe_id: web::Path<Uuid>,
) -> Res<impl Responder> {
    services::generation::delete_recipe(&pool, &claims, recipe_id.into_inner()).await?;
    Success::no_content()
}
