//! Generation domain module - turns an IR into a map of generated files
//!
//! A [`GenerationEngine`] selects the [`LanguageRenderer`] registered for the
//! requested language, builds a [`RenderContext`] from the IR, and renders every
//! component the renderer's output structure names. Per-component failures are
//! recorded in the [`GenerationReport`] instead of ending the run.

pub mod context;
pub mod errors;
pub mod filters;
pub mod orchestrator;
pub mod sanitizers;
pub mod traits;
pub mod types;
pub mod utils;

pub use context::*;
pub use errors::*;
pub use filters::{FilterFn, FilterTable};
pub use orchestrator::*;
pub use traits::*;
pub use types::*;
pub use utils::NamingConvention;
