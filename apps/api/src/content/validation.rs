use crate::content::models::{
    AboutInput, EducationInput, ExperienceInput, ProjectInput, ProjectQuery, SkillCategoryInput,
};
use crate::errors::AppError;

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Empty optional strings are stored as NULL.
pub fn blank_to_none(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn validate_project(input: &ProjectInput) -> Result<(), AppError> {
    require("title", &input.title)?;
    require("description", &input.description)?;
    if input.tags.iter().any(|t| t.trim().is_empty()) {
        return Err(AppError::Validation("tags must not be blank".to_string()));
    }
    Ok(())
}

pub fn validate_project_query(query: &ProjectQuery) -> Result<(), AppError> {
    match query.limit {
        Some(limit) if limit <= 0 => Err(AppError::Validation(
            "limit must be a positive integer".to_string(),
        )),
        _ => Ok(()),
    }
}

pub fn validate_experience(input: &ExperienceInput) -> Result<(), AppError> {
    require("title", &input.title)?;
    require("company", &input.company)?;
    require("date", &input.date)
}

pub fn validate_education(input: &EducationInput) -> Result<(), AppError> {
    require("degree", &input.degree)?;
    require("institution", &input.institution)?;
    require("date", &input.date)
}

pub fn validate_skill_category(input: &SkillCategoryInput) -> Result<(), AppError> {
    require("title", &input.title)?;
    for skill in &input.skills {
        require("skill name", &skill.name)?;
        if !(0..=100).contains(&skill.percentage) {
            return Err(AppError::Validation(format!(
                "skill '{}' has percentage {} outside 0-100",
                skill.name, skill.percentage
            )));
        }
    }
    Ok(())
}

pub fn validate_about(input: &AboutInput) -> Result<(), AppError> {
    require("title", &input.title)?;
    if !input.email.trim().is_empty() && !input.email.contains('@') {
        return Err(AppError::Validation("email is not valid".to_string()));
    }
    Ok(())
}
