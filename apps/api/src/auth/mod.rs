// Admin authentication: argon2id password hashes, HS256 bearer tokens,
// and the `AdminIdentity` extractor that gates admin-only routes.

pub mod admins;
pub mod bootstrap;
pub mod handlers;
pub mod password;
pub mod token;

mod extractor;

pub use extractor::AdminIdentity;
