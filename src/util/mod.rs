//! Shared utilities

pub mod config;
pub mod context;
pub mod fs;
pub mod process;

pub use config::RebuildConfig;
pub use context::GlobalContext;
