use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{dtos::recipe::RecipeCreateRequest, models::recipe::Recipe};

pub async fn insert<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: RecipeCreateRequest,
) -> Res<Recipe> {
    sqlx::query_as::<_, Recipe>(
        r#"
        INSERT INTO recipes (author_id, title, summary, ingredients, steps)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(data.author_id)
    .bind(&data.title)
    .bind(&data.summary)
    .bind(&data.ingredients)
    .bind(&data.steps)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    recipe_id: Uuid,
) -> Res<Recipe> {
    sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE id = $1")
        .bind(recipe_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Recipe does not exist".to_string()))
}

pub async fn list_by_author<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    author_id: Uuid,
) -> Res<Vec<Recipe>> {
    sqlx::query_as::<_, Recipe>(
        "SELECT * FROM recipes WHERE author_id = $1 ORDER BY created_at DESC",
    )
    .bind(author_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    recipe_id: Uuid,
) -> Res<()> {
    sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(recipe_id)
        .execute(executor)
        .await
        .map_err(AppError::from)?;
    Ok(())
}
