use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use common::{
    env_config::Config,
    error::{AppError, Res},
    jwt::{self, ClaimsSpec},
};
use db::{dtos::user::UserCreateRequest, models::user::User};
use sqlx::PgPool;

use crate::dtos::auth::{AuthResponse, LoginRequest, RegisterRequest};

fn hash_password(password: &str) -> Res<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, stored_hash: &str) -> Res<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn issue_token(user: &User, config: &Config) -> Res<AuthResponse> {
    let token = jwt::generate_jwt(
        ClaimsSpec {
            user_id: user.id,
            role: user.role.clone(),
        },
        &config.jwt_config,
    )?;
    Ok(AuthResponse {
        token,
        user_id: user.id,
        role: user.role.clone(),
    })
}

/// Registers a new member account and opens its subscription on the
/// default free plan, both inside one transaction.
pub async fn register(pool: &PgPool, config: &Config, req: RegisterRequest) -> Res<AuthResponse> {
    if !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    if db::user::exists_by_email(pool, &req.email).await? {
        return Err(AppError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)?;
    let free_plan = db::plan::get_by_name(pool, "Free").await?;

    let mut tx = pool.begin().await.map_err(AppError::from)?;
    let user = db::user::insert(
        &mut *tx,
        UserCreateRequest {
            email: req.email,
            password_hash,
            display_name: req.display_name,
            role: "member".to_string(),
        },
    )
    .await?;
    db::sub::insert_for_plan(&mut *tx, user.id, &free_plan, Utc::now().naive_utc()).await?;
    tx.commit().await.map_err(AppError::from)?;

    log::info!("registered new member {}", user.id);
    issue_token(&user, config)
}

/// Authenticates an existing account and issues a fresh JWT.
pub async fn login(pool: &PgPool, config: &Config, req: LoginRequest) -> Res<AuthResponse> {
    let user = db::user::get_by_email(pool, &req.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    issue_token(&user, config)
}

pub async fn me(pool: &PgPool, user_id: uuid::Uuid) -> Res<User> {
    db::user::get_by_id(pool, user_id).await
}

/// Seeds the bootstrap admin account when configured. The admin gets a
/// subscription like everyone else; roles and quotas are independent.
pub async fn ensure_admin(pool: &PgPool, config: &Config) -> Res<()> {
    let (email, password) = match (&config.admin_email, &config.admin_password) {
        (Some(email), Some(password)) => (email, password),
        _ => return Ok(()),
    };

    if db::user::exists_by_email(pool, email).await? {
        return Ok(());
    }

    let password_hash = hash_password(password)?;
    let premium_plan = db::plan::get_by_name(pool, "Premium").await?;

    let mut tx = pool.begin().await.map_err(AppError::from)?;
    let admin = db::user::insert(
        &mut *tx,
        UserCreateRequest {
            email: email.clone(),
            password_hash,
            display_name: "Administrator".to_string(),
            role: "admin".to_string(),
        },
    )
    .await?;
    db::sub::insert_for_plan(&mut *tx, admin.id, &premium_plan, Utc::now().naive_utc()).await?;
    tx.commit().await.map_err(AppError::from)?;

    log::info!("seeded admin account {}", admin.id);
    Ok(())
}
