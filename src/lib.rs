//! cliweave - generate CLI packages for several languages from one description
//!
//! ```no_run
//! use cliweave::generation::GenerationEngine;
//! use cliweave::infrastructure::templates::ComponentStore;
//! use cliweave::ir::IntermediateRepresentation;
//! use std::path::Path;
//!
//! let ir = IntermediateRepresentation::from_path(Path::new("cli.yaml"))?;
//! let mut engine = GenerationEngine::with_default_renderers(ComponentStore::from_dir("components"));
//! let report = engine.generate(&ir, "rust", Path::new("out"))?;
//! for path in report.files.keys() {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod generation;
pub mod infrastructure;
pub mod ir;

pub use config::{ConfigError, GeneratorConfig};
pub use generation::{GenerationEngine, GenerationError, GenerationReport, Language};
pub use infrastructure::templates::{ComponentError, ComponentStore, ComponentStoreConfig};
pub use ir::IntermediateRepresentation;
