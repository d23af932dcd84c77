use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::community::{CommentCreateRequest, PostCreateRequest, PostUpdateRequest},
    models::community::{Comment, Post},
};

pub async fn insert_post<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: PostCreateRequest,
) -> Res<Post> {
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (author_id, title, body)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(data.author_id)
    .bind(&data.title)
    .bind(&data.body)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_post<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    post_id: Uuid,
) -> Res<Post> {
    sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Post does not exist".to_string()))
}

pub async fn list_recent_posts<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    limit: i64,
) -> Res<Vec<Post>> {
    sqlx::query_as::<_, Post>("SELECT * FROM posts ORDER BY created_at DESC LIMIT $1")
        .bind(limit)
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

pub async fn update_post<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    post_id: Uuid,
    data: PostUpdateRequest,
) -> Res<Post> {
    sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET title = $2, body = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(post_id)
    .bind(&data.title)
    .bind(&data.body)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)?
    .ok_or_else(|| AppError::NotFound("Post does not exist".to_string()))
}

pub async fn delete_post<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    post_id: Uuid,
) -> Res<()> {
    sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(executor)
        .await
        .map_err(AppError::from)?;
    Ok(())
}

pub async fn insert_comment<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: CommentCreateRequest,
) -> Res<Comment> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (post_id, author_id, body)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(data.post_id)
    .bind(data.author_id)
    .bind(&data.body)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_comment<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    comment_id: Uuid,
) -> Res<Comment> {
    sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
        .bind(comment_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Comment does not exist".to_string()))
}

pub async fn list_comments_for_post<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    post_id: Uuid,
) -> Res<Vec<Comment>> {
    sqlx::query_as::<_, Comment>(
        "SELECT * FROM comments WHERE post_id = $1 ORDER BY created_at ASC",
    )
    .bind(post_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete_comment<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    comment_id: Uuid,
) -> Res<()> {
    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(executor)
        .await
        .map_err(AppError::from)?;
    Ok(())
}
