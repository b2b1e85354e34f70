use serde::Deserialize;

use crate::models::content::Skill;

// Request payloads. Fields default when absent so that validation, not
// deserialization, reports what is missing.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub image: String,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperienceInput {
    pub title: String,
    pub company: String,
    pub description: String,
    pub date: String,
    pub location: String,
    pub current: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationInput {
    pub degree: String,
    pub field: String,
    pub institution: String,
    pub achievements: String,
    pub date: String,
    pub location: String,
    pub current: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkillCategoryInput {
    pub title: String,
    pub icon: String,
    pub skills: Vec<Skill>,
    pub order: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AboutInput {
    pub title: String,
    pub description: Vec<String>,
    pub location: String,
    pub email: String,
    pub profile_image: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectQuery {
    pub featured: Option<bool>,
    pub limit: Option<i64>,
}
