pub mod admin;
pub mod content;
