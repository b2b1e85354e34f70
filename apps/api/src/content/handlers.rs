use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::auth::AdminIdentity;
use crate::content::models::{
    AboutInput, EducationInput, ExperienceInput, ProjectInput, ProjectQuery, SkillCategoryInput,
};
use crate::content::repository::{self, Collection};
use crate::content::validation::{
    validate_about, validate_education, validate_experience, validate_project,
    validate_project_query, validate_skill_category,
};
use crate::errors::AppError;
use crate::models::content::{AboutRow, EducationRow, ExperienceRow, ProjectRow, SkillCategoryRow};
use crate::state::AppState;

fn not_found(collection: Collection, id: Uuid) -> AppError {
    AppError::NotFound(format!("{} {id} not found", collection.label()))
}

async fn delete_entry(
    state: &AppState,
    admin: &AdminIdentity,
    collection: Collection,
    id: Uuid,
) -> Result<StatusCode, AppError> {
    if !repository::delete_by_id(&state.db, collection, id).await? {
        return Err(not_found(collection, id));
    }
    info!("{} {id} deleted by {}", collection.label(), admin.username);
    Ok(StatusCode::NO_CONTENT)
}

// ── Projects ────────────────────────────────────────────────────────────────

/// GET /api/v1/projects
pub async fn handle_list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<Vec<ProjectRow>>, AppError> {
    validate_project_query(&query)?;
    Ok(Json(repository::list_projects(&state.db, &query).await?))
}

/// POST /api/v1/projects
pub async fn handle_create_project(
    admin: AdminIdentity,
    State(state): State<AppState>,
    Json(input): Json<ProjectInput>,
) -> Result<(StatusCode, Json<ProjectRow>), AppError> {
    validate_project(&input)?;
    let row = repository::create_project(&state.db, &input).await?;
    info!("Project {} created by {}", row.id, admin.username);
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/projects/:id
pub async fn handle_update_project(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProjectInput>,
) -> Result<Json<ProjectRow>, AppError> {
    validate_project(&input)?;
    repository::update_project(&state.db, id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(Collection::Projects, id))
}

/// DELETE /api/v1/projects/:id
pub async fn handle_delete_project(
    admin: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_entry(&state, &admin, Collection::Projects, id).await
}

// ── Experience ──────────────────────────────────────────────────────────────

/// GET /api/v1/experiences
pub async fn handle_list_experiences(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExperienceRow>>, AppError> {
    Ok(Json(repository::list_experiences(&state.db).await?))
}

/// POST /api/v1/experiences
pub async fn handle_create_experience(
    admin: AdminIdentity,
    State(state): State<AppState>,
    Json(input): Json<ExperienceInput>,
) -> Result<(StatusCode, Json<ExperienceRow>), AppError> {
    validate_experience(&input)?;
    let row = repository::create_experience(&state.db, &input).await?;
    info!("Experience {} created by {}", row.id, admin.username);
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/experiences/:id
pub async fn handle_update_experience(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ExperienceInput>,
) -> Result<Json<ExperienceRow>, AppError> {
    validate_experience(&input)?;
    repository::update_experience(&state.db, id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(Collection::Experiences, id))
}

/// DELETE /api/v1/experiences/:id
pub async fn handle_delete_experience(
    admin: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_entry(&state, &admin, Collection::Experiences, id).await
}

// ── Education ───────────────────────────────────────────────────────────────

/// GET /api/v1/education
pub async fn handle_list_education(
    State(state): State<AppState>,
) -> Result<Json<Vec<EducationRow>>, AppError> {
    Ok(Json(repository::list_education(&state.db).await?))
}

/// POST /api/v1/education
pub async fn handle_create_education(
    admin: AdminIdentity,
    State(state): State<AppState>,
    Json(input): Json<EducationInput>,
) -> Result<(StatusCode, Json<EducationRow>), AppError> {
    validate_education(&input)?;
    let row = repository::create_education(&state.db, &input).await?;
    info!("Education record {} created by {}", row.id, admin.username);
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/education/:id
pub async fn handle_update_education(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<EducationInput>,
) -> Result<Json<EducationRow>, AppError> {
    validate_education(&input)?;
    repository::update_education(&state.db, id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(Collection::Education, id))
}

/// DELETE /api/v1/education/:id
pub async fn handle_delete_education(
    admin: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_entry(&state, &admin, Collection::Education, id).await
}

// ── Skills ──────────────────────────────────────────────────────────────────

/// GET /api/v1/skills
pub async fn handle_list_skills(
    State(state): State<AppState>,
) -> Result<Json<Vec<SkillCategoryRow>>, AppError> {
    Ok(Json(repository::list_skill_categories(&state.db).await?))
}

/// POST /api/v1/skills
pub async fn handle_create_skill_category(
    admin: AdminIdentity,
    State(state): State<AppState>,
    Json(input): Json<SkillCategoryInput>,
) -> Result<(StatusCode, Json<SkillCategoryRow>), AppError> {
    validate_skill_category(&input)?;
    let row = repository::create_skill_category(&state.db, &input).await?;
    info!("Skill category {} created by {}", row.id, admin.username);
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/skills/:id
pub async fn handle_update_skill_category(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SkillCategoryInput>,
) -> Result<Json<SkillCategoryRow>, AppError> {
    validate_skill_category(&input)?;
    repository::update_skill_category(&state.db, id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(Collection::SkillCategories, id))
}

/// DELETE /api/v1/skills/:id
pub async fn handle_delete_skill_category(
    admin: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_entry(&state, &admin, Collection::SkillCategories, id).await
}

// ── About ───────────────────────────────────────────────────────────────────

/// GET /api/v1/about
pub async fn handle_get_about(State(state): State<AppState>) -> Result<Json<AboutRow>, AppError> {
    repository::get_about(&state.db)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("About section has not been written yet".to_string()))
}

/// PUT /api/v1/about
pub async fn handle_put_about(
    admin: AdminIdentity,
    State(state): State<AppState>,
    Json(input): Json<AboutInput>,
) -> Result<Json<AboutRow>, AppError> {
    validate_about(&input)?;
    let row = repository::upsert_about(&state.db, &input).await?;
    info!("About section updated by {}", admin.username);
    Ok(Json(row))
}
