use std::sync::Arc;

use actix_web::{Responder, get, put, web};
use common::{error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dtos::sub::{PlanLimitsRequest, SubscriptionPlansResponse},
    services,
};

/// Lists the active plans of the catalog.
#[get("")]
pub async fn get_plans(pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    let plans = services::sub::list_plans(&pool).await?;
    Success::ok(SubscriptionPlansResponse { plans })
}

/// Updates a plan's limits and flags. Admin only.
#[put("/{plan_id}")]
pub async fn put_plan_limits(
    pool: web::Data<Arc<PgPool>>,
    claims: web::ReqData<JwtClaims>,
    plan_id: web::Path<Uuid>,
    req: web::Json<PlanLimitsRequest>,
) -> Res<impl Responder> {
    let plan = services::sub::update_plan(
        &pool,
        &claims.role,
        plan_id.into_inner(),
        req.into_inner(),
    )
    .await?;
    Success::ok(plan)
}
