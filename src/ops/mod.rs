//! High-level operations.
//!
//! Each stage of a rebuild run lives in its own module; [`pipeline`] strings
//! them together.

pub mod classify;
pub mod pipeline;
pub mod rebuild;
pub mod reconcile;
pub mod substitution;
pub mod user_modules;

pub use classify::{classify, Classification, SkipReason, SkippedDependency};
pub use pipeline::{plan_rebuild, rebuild_native_modules, RebuildReport, RebuildSession};
pub use rebuild::{rebuild_all, rebuild_dependency, RebuildError, RebuildFlags, RebuildOptions};
pub use reconcile::{output_relative, reconcile, Reconciled};
pub use substitution::{read_substitution_map, write_substitution_map, SUBSTITUTION_MAP_FILE};
pub use user_modules::{build_user_modules, GypModuleBuilder, ModuleBuilder};
