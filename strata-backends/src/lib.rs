//! Strata Backends - Example analysis backends for the snapshot pipeline
//!
//! Two concrete backends exercise the `strata-core` pipeline: `DepsBackend`
//! extracts an import/type graph per commit, `LangBackend` measures language
//! composition or per-file line metrics.

pub mod analyzers;
mod deps;
mod lang;

pub use deps::{DepsBackend, CATEGORY_CODE_DEPENDENCIES};
pub use lang::{LangBackend, CATEGORY_CODE_LANGUAGE, CATEGORY_CODE_METRICS};
