use sqlx::PgPool;
use uuid::Uuid;

use crate::models::admin::AdminRow;

pub async fn find_admin_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<AdminRow>, sqlx::Error> {
    sqlx::query_as::<_, AdminRow>("SELECT * FROM admins WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Inserts an admin unless the username is taken. Returns whether a row was written.
pub async fn insert_admin(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO admins (id, username, email, password_hash)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (username) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Replaces the email and password hash of an existing admin.
pub async fn update_admin_credentials(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE admins SET email = $2, password_hash = $3, updated_at = now()
        WHERE username = $1
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
