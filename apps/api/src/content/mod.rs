// Portfolio content collections: projects, experience, education, skills
// and the "about me" section. Reads are public; writes require an admin.

pub mod handlers;
pub mod models;
pub mod repository;
pub mod validation;
