use chrono::NaiveDateTime;
use common::error::{AppError, Res};
use entitlements::FeatureKey;
use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::usage_event::UsageEvent;

/// Records one successful consumption. Written after the conditional
/// decrement succeeds, so the event stream never over-counts.
pub async fn insert<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    subscription_id: Uuid,
    feature: FeatureKey,
) -> Res<()> {
    sqlx::query(
        "INSERT INTO usage_events (user_id, subscription_id, feature) VALUES ($1, $2, $3)",
    )
    .bind(user_id)
    .bind(subscription_id)
    .bind(feature.as_str())
    .execute(executor)
    .await
    .map_err(AppError::from)?;
    Ok(())
}

pub struct EventFilter {
    pub user_id: Option<Uuid>,
    pub subscription_id: Option<Uuid>,
    pub feature: Option<FeatureKey>,
    pub starting_after: Option<NaiveDateTime>,
    pub limit: Option<i64>,
}

pub async fn get_report<'e, E>(executor: E, filter: EventFilter) -> Res<Vec<UsageEvent>>
where
    E: Executor<'e, Database = Postgres>,
{
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM usage_events");
    let mut conditions_added = false;

    // Helper to add WHERE or AND
    let mut add_condition_separator = |qb: &mut QueryBuilder<Postgres>| {
        if !conditions_added {
            qb.push(" WHERE ");
            conditions_added = true;
        } else {
            qb.push(" AND ");
        }
    };

    if let Some(user_id) = filter.user_id {
        add_condition_separator(&mut qb);
        qb.push("user_id = ").push_bind(user_id);
    }

    if let Some(subscription_id) = filter.subscription_id {
        add_condition_separator(&mut qb);
        qb.push("subscription_id = ").push_bind(subscription_id);
    }

    if let Some(feature) = filter.feature {
        add_condition_separator(&mut qb);
        qb.push("feature = ").push_bind(feature.as_str());
    }

    if let Some(starting_after) = filter.starting_after {
        add_condition_separator(&mut qb);
        qb.push("created_at > ").push_bind(starting_after);
    }

    qb.push(" ORDER BY created_at DESC");

    if let Some(limit) = filter.limit {
        qb.push(" LIMIT ").push_bind(limit);
    }

    let query = qb.build_query_as::<UsageEvent>();

    query.fetch_all(executor).await.map_err(AppError::from)
}

/// Number of events recorded for a subscription since `since`, per the
/// usage report.
pub async fn count_since<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    subscription_id: Uuid,
    since: NaiveDateTime,
) -> Res<i64> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM usage_events WHERE subscription_id = $1 AND created_at >= $2",
    )
    .bind(subscription_id)
    .bind(since)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}
