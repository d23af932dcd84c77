use authz::Role;
use chrono::Utc;
use common::error::{AppError, Res};
use db::ledger::PgLedgerStore;
use db::models::plan::Plan;
use db::plan::PlanLimitsUpdate;
use db::usage_event::EventFilter;
use entitlements::{Entitlements, FeatureKey};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::sub::{
    PlanLimitsRequest, SubscriptionResponse, UsageItem, UsageQuery, UsageResponse,
};

pub async fn list_plans(pool: &PgPool) -> Res<Vec<Plan>> {
    db::plan::list_active(pool).await
}

/// The authenticated user's active subscription and its plan.
pub async fn current(pool: &PgPool, user_id: Uuid) -> Res<SubscriptionResponse> {
    let (sub, plan, _) = db::sub::load_state(pool, user_id).await?;
    Ok(SubscriptionResponse {
        subscription: sub,
        plan,
    })
}

/// Moves the user onto `plan_id`: the previous active subscription is
/// soft-terminated and a new one opens with a full allowance. Both
/// writes commit together, keeping at most one active subscription.
pub async fn upgrade(pool: &PgPool, user_id: Uuid, plan_id: Uuid) -> Res<SubscriptionResponse> {
    let plan = db::plan::get_by_id(pool, plan_id).await?;
    if !plan.is_active {
        return Err(AppError::BadRequest(
            "This plan is no longer available".to_string(),
        ));
    }

    let mut tx = pool.begin().await.map_err(AppError::from)?;
    db::sub::cancel_active(&mut *tx, user_id).await?;
    let sub = db::sub::insert_for_plan(&mut *tx, user_id, &plan, Utc::now().naive_utc()).await?;
    tx.commit().await.map_err(AppError::from)?;

    log::info!("user {} moved to plan {}", user_id, plan.name);
    Ok(SubscriptionResponse {
        subscription: sub,
        plan,
    })
}

pub async fn cancel(pool: &PgPool, user_id: Uuid) -> Res<()> {
    if !db::sub::cancel_active(pool, user_id).await? {
        return Err(AppError::NotFound("No active subscription".to_string()));
    }
    Ok(())
}

/// Usage report for the current billing cycle. Runs the rollover check
/// first so a report straddling a cycle boundary never shows stale
/// balances.
pub async fn usage(pool: &PgPool, user_id: Uuid, query: UsageQuery) -> Res<UsageResponse> {
    let feature_filter = query
        .feature
        .as_deref()
        .map(|raw| raw.parse::<FeatureKey>())
        .transpose()?;

    let (_, _, state) = db::sub::load_state(pool, user_id).await?;

    let ents = Entitlements::new(PgLedgerStore::new(pool.clone()));
    let state = ents
        .rollover_if_due(&state, Utc::now().naive_utc())
        .await?
        .unwrap_or(state);

    let items = FeatureKey::ALL
        .iter()
        .filter_map(|&feature| {
            let limit = state.features.limit(feature)?;
            let remaining = state.ledger.balance(feature)?;
            Some(UsageItem {
                feature: feature.as_str().to_string(),
                limit: limit.raw(),
                remaining: remaining.raw(),
            })
        })
        .collect();

    let events_this_cycle = db::usage_event::count_since(
        pool,
        state.subscription_id,
        state.billing_cycle_start,
    )
    .await?;
    let recent_events = db::usage_event::get_report(
        pool,
        EventFilter {
            user_id: Some(user_id),
            subscription_id: Some(state.subscription_id),
            feature: feature_filter,
            starting_after: Some(state.billing_cycle_start),
            limit: Some(20),
        },
    )
    .await?;

    Ok(UsageResponse {
        items,
        events_this_cycle,
        recent_events,
        billing_cycle_start: state.billing_cycle_start,
        next_billing_date: state.next_billing_date,
    })
}

/// Administrative plan edit. Only admins may reshape the catalog.
pub async fn update_plan(
    pool: &PgPool,
    actor_role: &str,
    plan_id: Uuid,
    req: PlanLimitsRequest,
) -> Res<Plan> {
    let role: Role = actor_role.parse()?;
    if role != Role::Admin {
        return Err(AppError::Forbidden(
            "Only administrators may edit plans".to_string(),
        ));
    }

    db::plan::update_limits(
        pool,
        plan_id,
        PlanLimitsUpdate {
            recipe_generation_limit: req.recipe_generation_limit,
            video_generation_limit: req.video_generation_limit,
            community_post_limit: req.community_post_limit,
            community_comment_limit: req.community_comment_limit,
            ai_suggestions: req.ai_suggestions,
            is_active: req.is_active,
        },
    )
    .await
}
