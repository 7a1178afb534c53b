//! Component store: discovery, caching and metadata for template fragments

pub mod errors;
pub mod metadata;
pub mod store;

pub use errors::*;
pub use metadata::*;
pub use store::*;
