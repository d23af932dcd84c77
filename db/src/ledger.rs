use chrono::NaiveDateTime;
use common::error::{AppError, Res};
use entitlements::{Balance, DecrementOutcome, FeatureKey, LedgerStore, UsageLedger};
use sqlx::PgPool;
use uuid::Uuid;

/// Maps a feature key onto its ledger column. The set of columns is as
/// closed as the key enum, so the interpolation below never sees
/// untrusted input.
fn ledger_column(feature: FeatureKey) -> &'static str {
    match feature {
        FeatureKey::RecipeGeneration => "recipe_generations_left",
        FeatureKey::VideoGeneration => "video_generations_left",
        FeatureKey::CommunityPost => "community_posts_left",
        FeatureKey::CommunityComment => "community_comments_left",
    }
}

/// Postgres-backed ledger store.
///
/// Consumption is one conditional UPDATE: the decrement applies only
/// while the balance is still positive, so concurrent requests for the
/// last remaining use cannot both succeed and the balance can never go
/// negative.
#[derive(Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        PgLedgerStore { pool }
    }
}

impl LedgerStore for PgLedgerStore {
    async fn decrement_if_positive(
        &self,
        subscription_id: Uuid,
        feature: FeatureKey,
    ) -> Res<DecrementOutcome> {
        let column = ledger_column(feature);

        let sql = format!(
            "UPDATE subscriptions SET {column} = {column} - 1, updated_at = NOW()
             WHERE id = $1 AND {column} > 0
             RETURNING {column}"
        );
        let remaining: Option<i32> = sqlx::query_scalar(&sql)
            .bind(subscription_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;

        if let Some(remaining) = remaining {
            return Ok(DecrementOutcome::Decremented {
                remaining: remaining.max(0) as u32,
            });
        }

        // the guard did not match: either the balance is spent or the
        // subscription row is gone
        let sql = format!("SELECT {column} FROM subscriptions WHERE id = $1");
        let current: Option<i32> = sqlx::query_scalar(&sql)
            .bind(subscription_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;

        match current {
            None => Ok(DecrementOutcome::Missing),
            Some(balance) if Balance::from_raw(i64::from(balance)) == Balance::Unlimited => {
                Err(AppError::Internal(format!(
                    "conditional decrement requested for unlimited balance {}",
                    feature
                )))
            }
            Some(_) => Ok(DecrementOutcome::Exhausted),
        }
    }

    async fn apply_rollover(
        &self,
        subscription_id: Uuid,
        ledger: &UsageLedger,
        cycle_start: NaiveDateTime,
        next_billing_date: NaiveDateTime,
        expected_next_billing_date: NaiveDateTime,
    ) -> Res<bool> {
        let balance_raw = |key: FeatureKey| -> i32 {
            ledger
                .balance(key)
                .map(|b| b.raw() as i32)
                .unwrap_or(0)
        };

        let result = sqlx::query(
            r#"
            UPDATE subscriptions
            SET recipe_generations_left = $2,
                video_generations_left = $3,
                community_posts_left = $4,
                community_comments_left = $5,
                billing_cycle_start = $6,
                next_billing_date = $7,
                updated_at = NOW()
            WHERE id = $1 AND next_billing_date = $8
            "#,
        )
        .bind(subscription_id)
        .bind(balance_raw(FeatureKey::RecipeGeneration))
        .bind(balance_raw(FeatureKey::VideoGeneration))
        .bind(balance_raw(FeatureKey::CommunityPost))
        .bind(balance_raw(FeatureKey::CommunityComment))
        .bind(cycle_start)
        .bind(next_billing_date)
        .bind(expected_next_billing_date)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(result.rows_affected() == 1)
    }
}
