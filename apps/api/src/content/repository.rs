//! SQL for the content collections. Updates replace every editable field
//! and bump `updated_at`; `None` from an update means the id is unknown.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::content::models::{
    AboutInput, EducationInput, ExperienceInput, ProjectInput, ProjectQuery, SkillCategoryInput,
};
use crate::content::validation::blank_to_none;
use crate::models::content::{AboutRow, EducationRow, ExperienceRow, ProjectRow, SkillCategoryRow};

const ABOUT_SLOT: &str = "about";

// ── Projects ────────────────────────────────────────────────────────────────

/// Newest first. `featured=true` restricts to featured projects.
pub async fn list_projects(pool: &PgPool, query: &ProjectQuery) -> Result<Vec<ProjectRow>, sqlx::Error> {
    sqlx::query_as::<_, ProjectRow>(
        r#"
        SELECT * FROM projects
        WHERE (NOT $1 OR featured)
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(query.featured.unwrap_or(false))
    .bind(query.limit)
    .fetch_all(pool)
    .await
}

pub async fn create_project(pool: &PgPool, input: &ProjectInput) -> Result<ProjectRow, sqlx::Error> {
    sqlx::query_as::<_, ProjectRow>(
        r#"
        INSERT INTO projects (id, title, description, tags, image, github_url, live_url, featured)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(input.title.trim())
    .bind(&input.description)
    .bind(&input.tags)
    .bind(&input.image)
    .bind(blank_to_none(&input.github_url))
    .bind(blank_to_none(&input.live_url))
    .bind(input.featured)
    .fetch_one(pool)
    .await
}

pub async fn update_project(
    pool: &PgPool,
    id: Uuid,
    input: &ProjectInput,
) -> Result<Option<ProjectRow>, sqlx::Error> {
    sqlx::query_as::<_, ProjectRow>(
        r#"
        UPDATE projects SET
            title = $2, description = $3, tags = $4, image = $5,
            github_url = $6, live_url = $7, featured = $8, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.title.trim())
    .bind(&input.description)
    .bind(&input.tags)
    .bind(&input.image)
    .bind(blank_to_none(&input.github_url))
    .bind(blank_to_none(&input.live_url))
    .bind(input.featured)
    .fetch_optional(pool)
    .await
}

// ── Experience ──────────────────────────────────────────────────────────────

pub async fn list_experiences(pool: &PgPool) -> Result<Vec<ExperienceRow>, sqlx::Error> {
    sqlx::query_as::<_, ExperienceRow>("SELECT * FROM experiences ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn create_experience(
    pool: &PgPool,
    input: &ExperienceInput,
) -> Result<ExperienceRow, sqlx::Error> {
    sqlx::query_as::<_, ExperienceRow>(
        r#"
        INSERT INTO experiences (id, title, company, description, date, location, current)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(input.title.trim())
    .bind(input.company.trim())
    .bind(&input.description)
    .bind(input.date.trim())
    .bind(&input.location)
    .bind(input.current)
    .fetch_one(pool)
    .await
}

pub async fn update_experience(
    pool: &PgPool,
    id: Uuid,
    input: &ExperienceInput,
) -> Result<Option<ExperienceRow>, sqlx::Error> {
    sqlx::query_as::<_, ExperienceRow>(
        r#"
        UPDATE experiences SET
            title = $2, company = $3, description = $4, date = $5,
            location = $6, current = $7, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.title.trim())
    .bind(input.company.trim())
    .bind(&input.description)
    .bind(input.date.trim())
    .bind(&input.location)
    .bind(input.current)
    .fetch_optional(pool)
    .await
}

// ── Education ───────────────────────────────────────────────────────────────

pub async fn list_education(pool: &PgPool) -> Result<Vec<EducationRow>, sqlx::Error> {
    sqlx::query_as::<_, EducationRow>("SELECT * FROM education ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn create_education(
    pool: &PgPool,
    input: &EducationInput,
) -> Result<EducationRow, sqlx::Error> {
    sqlx::query_as::<_, EducationRow>(
        r#"
        INSERT INTO education (id, degree, field, institution, achievements, date, location, current)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(input.degree.trim())
    .bind(&input.field)
    .bind(input.institution.trim())
    .bind(&input.achievements)
    .bind(input.date.trim())
    .bind(&input.location)
    .bind(input.current)
    .fetch_one(pool)
    .await
}

pub async fn update_education(
    pool: &PgPool,
    id: Uuid,
    input: &EducationInput,
) -> Result<Option<EducationRow>, sqlx::Error> {
    sqlx::query_as::<_, EducationRow>(
        r#"
        UPDATE education SET
            degree = $2, field = $3, institution = $4, achievements = $5,
            date = $6, location = $7, current = $8, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.degree.trim())
    .bind(&input.field)
    .bind(input.institution.trim())
    .bind(&input.achievements)
    .bind(input.date.trim())
    .bind(&input.location)
    .bind(input.current)
    .fetch_optional(pool)
    .await
}

// ── Skills ──────────────────────────────────────────────────────────────────

pub async fn list_skill_categories(pool: &PgPool) -> Result<Vec<SkillCategoryRow>, sqlx::Error> {
    sqlx::query_as::<_, SkillCategoryRow>(
        "SELECT * FROM skill_categories ORDER BY sort_order ASC, created_at ASC",
    )
    .fetch_all(pool)
    .await
}

pub async fn create_skill_category(
    pool: &PgPool,
    input: &SkillCategoryInput,
) -> Result<SkillCategoryRow, sqlx::Error> {
    sqlx::query_as::<_, SkillCategoryRow>(
        r#"
        INSERT INTO skill_categories (id, title, icon, skills, sort_order)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(input.title.trim())
    .bind(&input.icon)
    .bind(Json(&input.skills))
    .bind(input.order)
    .fetch_one(pool)
    .await
}

pub async fn update_skill_category(
    pool: &PgPool,
    id: Uuid,
    input: &SkillCategoryInput,
) -> Result<Option<SkillCategoryRow>, sqlx::Error> {
    sqlx::query_as::<_, SkillCategoryRow>(
        r#"
        UPDATE skill_categories SET
            title = $2, icon = $3, skills = $4, sort_order = $5, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.title.trim())
    .bind(&input.icon)
    .bind(Json(&input.skills))
    .bind(input.order)
    .fetch_optional(pool)
    .await
}

// ── Shared ──────────────────────────────────────────────────────────────────

/// Tables whose rows are deleted by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Projects,
    Experiences,
    Education,
    SkillCategories,
}

impl Collection {
    fn table(self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::Experiences => "experiences",
            Collection::Education => "education",
            Collection::SkillCategories => "skill_categories",
        }
    }

    /// Human label used in NotFound messages.
    pub fn label(self) -> &'static str {
        match self {
            Collection::Projects => "Project",
            Collection::Experiences => "Experience",
            Collection::Education => "Education record",
            Collection::SkillCategories => "Skill category",
        }
    }
}

/// Returns whether a row was deleted.
pub async fn delete_by_id(pool: &PgPool, collection: Collection, id: Uuid) -> Result<bool, sqlx::Error> {
    // Table names come from a closed enum, never from input.
    let sql = format!("DELETE FROM {} WHERE id = $1", collection.table());
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

// ── About ───────────────────────────────────────────────────────────────────

pub async fn get_about(pool: &PgPool) -> Result<Option<AboutRow>, sqlx::Error> {
    sqlx::query_as::<_, AboutRow>(
        r#"
        SELECT title, description, location, email, profile_image, updated_at
        FROM about WHERE slot = $1
        "#,
    )
    .bind(ABOUT_SLOT)
    .fetch_optional(pool)
    .await
}

pub async fn upsert_about(pool: &PgPool, input: &AboutInput) -> Result<AboutRow, sqlx::Error> {
    sqlx::query_as::<_, AboutRow>(
        r#"
        INSERT INTO about (slot, title, description, location, email, profile_image, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, now())
        ON CONFLICT (slot) DO UPDATE SET
            title = EXCLUDED.title,
            description = EXCLUDED.description,
            location = EXCLUDED.location,
            email = EXCLUDED.email,
            profile_image = EXCLUDED.profile_image,
            updated_at = now()
        RETURNING title, description, location, email, profile_image, updated_at
        "#,
    )
    .bind(ABOUT_SLOT)
    .bind(input.title.trim())
    .bind(&input.description)
    .bind(&input.location)
    .bind(input.email.trim())
    .bind(&input.profile_image)
    .fetch_one(pool)
    .await
}
