use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{dtos::video::VideoCreateRequest, models::video::Video};

pub async fn insert<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: VideoCreateRequest,
) -> Res<Video> {
    sqlx::query_as::<_, Video>(
        r#"
        INSERT INTO videos (author_id, recipe_id, title, storyboard)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(data.author_id)
    .bind(data.recipe_id)
    .bind(&data.title)
    .bind(&data.storyboard)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    video_id: Uuid,
) -> Res<()> {
    sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(video_id)
        .execute(executor)
        .await
        .map_err(AppError::from)?;
    Ok(())
}
