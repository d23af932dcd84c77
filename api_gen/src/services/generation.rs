use authz::Role;
use chrono::Utc;
use common::{
    error::{AppError, Res},
    jwt::JwtClaims,
};
use db::{
    dtos::{recipe::RecipeCreateRequest, video::VideoCreateRequest},
    ledger::PgLedgerStore,
    models::{recipe::Recipe, video::Video},
};
use entitlements::{Entitlements, FeatureKey, SubscriptionState};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::generation::{
    GenerateRecipeRequest, GenerateVideoRequest, SuggestionRequest, SuggestionResponse,
};
use crate::services::compose;

fn member_role(claims: &JwtClaims) -> Res<Role> {
    let role: Role = claims.role.parse()?;
    if !authz::can_create_member_content(role) {
        return Err(AppError::Forbidden(
            "Guests may not create content".to_string(),
        ));
    }
    Ok(role)
}

/// Loads the caller's subscription snapshot with the billing-cycle
/// rollover already applied, so stale allowances are never enforced.
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

/// Generates a recipe for the caller.
///
/// The gate sequence is fixed: rollover, entitlement check, perform the
/// action, consume. If the consume step fails the inserted row is
/// removed again, so a user is never charged for a recipe they did not
/// get, nor given one that was not charged.
pub async fn generate_recipe(
    pool: &PgPool,
    claims: &JwtClaims,
    req: GenerateRecipeRequest,
) -> Res<Recipe> {
    member_role(claims)?;

    let ents = Entitlements::new(PgLedgerStore::new(pool.clone()));
    let state = fresh_state(pool, &ents, claims).await?;
    ents.check(&state, FeatureKey::RecipeGeneration)?;

    let composed = compose::compose_recipe(&req);
    let recipe = db::recipe::insert(
        pool,
        RecipeCreateRequest {
            author_id: claims.user_id,
            title: composed.title,
            summary: composed.summary,
            ingredients: composed.ingredients,
            steps: composed.steps,
        },
    )
    .await?;

    match ents.consume(&state, FeatureKey::RecipeGeneration).await {
        Ok(_) => {
            db::usage_event::insert(
                pool,
                claims.user_id,
                state.subscription_id,
                FeatureKey::RecipeGeneration,
            )
            .await?;
            Ok(recipe)
        }
        Err(err) => {
            db::recipe::delete(pool, recipe.id).await?;
            Err(err)
        }
    }
}

/// Generates a video storyboard for one of the caller's recipes, under
/// the same gate sequence as recipe generation.
pub async fn generate_video(
    pool: &PgPool,
    claims: &JwtClaims,
    req: GenerateVideoRequest,
) -> Res<Video> {
    let role = member_role(claims)?;

    let recipe = db::recipe::get_by_id(pool, req.recipe_id).await?;
    if !authz::can_edit_resource(role, claims.user_id, recipe.author_id) {
        return Err(AppError::Forbidden(
            "You may only generate videos for your own recipes".to_string(),
        ));
    }

    let ents = Entitlements::new(PgLedgerStore::new(pool.clone()));
    let state = fresh_state(pool, &ents, claims).await?;
    ents.check(&state, FeatureKey::VideoGeneration)?;

    let storyboard = compose::compose_storyboard(&recipe.title, &recipe.steps);
    let video = db::video::insert(
        pool,
        VideoCreateRequest {
            author_id: claims.user_id,
            recipe_id: Some(recipe.id),
            title: format!("{} (video)", recipe.title),
            storyboard,
        },
    )
    .await?;

    match ents.consume(&state, FeatureKey::VideoGeneration).await {
        Ok(_) => {
            db::usage_event::insert(
                pool,
                claims.user_id,
                state.subscription_id,
                FeatureKey::VideoGeneration,
            )
            .await?;
            Ok(video)
        }
        Err(err) => {
            db::video::delete(pool, video.id).await?;
            Err(err)
        }
    }
}

/// Ingredient suggestions, gated by the plan's AI-suggestions flag
/// rather than a counter.
pub async fn suggest_ingredients(
    pool: &PgPool,
    claims: &JwtClaims,
    req: SuggestionRequest,
) -> Res<SuggestionResponse> {
    member_role(claims)?;

    let (_, plan, _) = db::sub::load_state(pool, claims.user_id).await?;
    if !plan.ai_suggestions {
        return Err(AppError::Forbidden(
            "Your plan does not include AI suggestions".to_string(),
        ));
    }

    Ok(SuggestionResponse {
        suggestions: compose::compose_suggestions(&req.ingredients),
    })
}

/// Recipes are private to their author; admins can see everything.
pub async fn get_recipe(pool: &PgPool, claims: &JwtClaims, recipe_id: Uuid) -> Res<Recipe> {
    let role: Role = claims.role.parse()?;
    let recipe = db::recipe::get_by_id(pool, recipe_id).await?;
    if !authz::can_edit_resource(role, claims.user_id, recipe.author_id) {
        return Err(AppError::Forbidden(
            "You may only view your own recipes".to_string(),
        ));
    }
    Ok(recipe)
}

pub async fn list_recipes(pool: &PgPool, claims: &JwtClaims) -> Res<Vec<Recipe>> {
    db::recipe::list_by_author(pool, claims.user_id).await
}

pub async fn delete_recipe(pool: &PgPool, claims: &JwtClaims, recipe_id: Uuid) -> Res<()> {
    let role: Role = claims.role.parse()?;
    let recipe = db::recipe::get_by_id(pool, recipe_id).await?;
    if !authz::can_edit_resource(role, claims.user_id, recipe.author_id) {
        return Err(AppError::Forbidden(
            "You may only delete your own recipes".to_string(),
        ));
    }
    db::recipe::delete(pool, recipe_id).await
}
