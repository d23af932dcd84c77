use chrono::{Months, NaiveDateTime};
use common::error::{AppError, Res};
use entitlements::{FeatureKey, Limit, SubscriptionState};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::models::{plan::Plan, sub::Subscription};

pub async fn get_active_by_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<Subscription>> {
    sqlx::query_as::<_, Subscription>(
        "SELECT * FROM subscriptions WHERE user_id = $1 AND status = 'active'",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    subscription_id: Uuid,
) -> Res<Subscription> {
    sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE id = $1")
        .bind(subscription_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Subscription does not exist".to_string()))
}

fn initial_balance(plan: &Plan, key: FeatureKey) -> i32 {
    let limit = plan
        .features()
        .limit(key)
        .unwrap_or(Limit::Capped(0));
    limit.raw() as i32
}

/// Opens a subscription on `plan` with a full allowance and a cycle
/// starting at `now`.
pub async fn insert_for_plan<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    plan: &Plan,
    now: NaiveDateTime,
) -> Res<Subscription> {
    let next_billing_date = now
        .checked_add_months(Months::new(1))
        .ok_or_else(|| AppError::Internal("billing date overflow".to_string()))?;

    sqlx::query_as::<_, Subscription>(
        r#"
        INSERT INTO subscriptions (user_id, plan_id, status, billing_cycle_start, next_billing_date,
                                   recipe_generations_left, video_generations_left,
                                   community_posts_left, community_comments_left)
        VALUES ($1, $2, 'active', $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(plan.id)
    .bind(now)
    .bind(next_billing_date)
    .bind(initial_balance(plan, FeatureKey::RecipeGeneration))
    .bind(initial_balance(plan, FeatureKey::VideoGeneration))
    .bind(initial_balance(plan, FeatureKey::CommunityPost))
    .bind(initial_balance(plan, FeatureKey::CommunityComment))
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Soft-terminates the user's active subscription, if any. Rows are
/// never deleted.
pub async fn cancel_active<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<bool> {
    let result = sqlx::query(
        "UPDATE subscriptions SET status = 'canceled', updated_at = NOW()
         WHERE user_id = $1 AND status = 'active'",
    )
    .bind(user_id)
    .execute(executor)
    .await
    .map_err(AppError::from)?;

    Ok(result.rows_affected() > 0)
}

/// Loads the active subscription, its plan, and the evaluator snapshot
/// for one user.
pub async fn load_state(pool: &PgPool, user_id: Uuid) -> Res<(Subscription, Plan, SubscriptionState)> {
    let sub = get_active_by_user(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No active subscription".to_string()))?;
    let plan = crate::plan::get_by_id(pool, sub.plan_id).await?;
    let state = sub.state(&plan)?;
    Ok((sub, plan, state))
}
