//! Infrastructure layer - concrete implementations of domain ports

pub mod generation;
pub mod output;
pub mod templates;

pub use templates::*;
