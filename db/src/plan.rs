use common::error::{AppError, Res};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::models::plan::Plan;

pub async fn list_active<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
) -> Res<Vec<Plan>> {
    sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE is_active = TRUE ORDER BY price_cents")
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    plan_id: Uuid,
) -> Res<Plan> {
    sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE id = $1")
        .bind(plan_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Plan does not exist".to_string()))
}

pub async fn get_by_name<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    name: &str,
) -> Res<Plan> {
    sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE name = $1")
        .bind(name)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Plan '{}' does not exist", name)))
}

pub struct PlanLimitsUpdate {
    pub recipe_generation_limit: i32,
    pub video_generation_limit: i32,
    pub community_post_limit: i32,
    pub community_comment_limit: i32,
    pub ai_suggestions: bool,
    pub is_active: bool,
}

/// Administrative update of a plan's feature surface. Plans are never
/// deleted while subscriptions reference them; `is_active = false` is
/// the soft-disable.
pub async fn update_limits<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    plan_id: Uuid,
    data: PlanLimitsUpdate,
) -> Res<Plan> {
    sqlx::query_as::<_, Plan>(
        r#"
        UPDATE plans
        SET recipe_generation_limit = $2,
            video_generation_limit = $3,
            community_post_limit = $4,
            community_comment_limit = $5,
            ai_suggestions = $6,
            is_active = $7,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(plan_id)
    .bind(data.recipe_generation_limit)
    .bind(data.video_generation_limit)
    .bind(data.community_post_limit)
    .bind(data.community_comment_limit)
    .bind(data.ai_suggestions)
    .bind(data.is_active)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)?
    .ok_or_else(|| AppError::NotFound("Plan does not exist".to_string()))
}

/// Seeds the default catalog. Idempotent: existing rows are left alone,
/// so administrative edits survive restarts.
pub async fn seed_defaults(pool: &PgPool) -> Res<()> {
    sqlx::query(
        r#"
        INSERT INTO plans (name, description, price_cents, billing_interval,
                           recipe_generation_limit, video_generation_limit,
                           community_post_limit, community_comment_limit, ai_suggestions)
        VALUES
            ('Free', 'Get started with a monthly allowance of generated recipes.',
             0, 'month', 5, 1, 10, 20, FALSE),
            ('Premium', 'Unlimited generation and community access, with AI suggestions.',
             999, 'month', -1, -1, -1, -1, TRUE)
        ON CONFLICT (name) DO NOTHING
        "#,
    )
    .execute(pool)
    .await
    .map_err(AppError::from)?;

    Ok(())
}
