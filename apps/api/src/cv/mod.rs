// CV file storage: a single downloadable PDF held in the blob store and
// tracked by one registry row.

pub mod blob_store;
pub mod handlers;
pub mod registry;
pub mod service;

#[cfg(test)]
pub mod memory;

pub use service::CvService;
