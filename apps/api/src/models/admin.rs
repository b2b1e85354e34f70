use sqlx::FromRow;

/// Columns of `admins` needed to authenticate a login.
#[derive(Debug, Clone, FromRow)]
pub struct AdminRow {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
