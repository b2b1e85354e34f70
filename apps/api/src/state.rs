use sqlx::PgPool;

use crate::auth::token::TokenKeys;
use crate::config::Config;
use crate::cv::CvService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// CV lifecycle over the blob store and file registry.
    pub cv: CvService,
    /// Signs and verifies admin bearer tokens.
    pub tokens: TokenKeys,
    pub config: Config,
}
