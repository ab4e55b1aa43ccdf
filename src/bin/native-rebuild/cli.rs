//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use native_rebuild::core::UserModuleSpec;
use native_rebuild::util::RebuildConfig;

/// native-rebuild - rebuild native Node add-ons against the Electron ABI
#[derive(Parser)]
#[command(name = "native-rebuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rebuild native dependencies and write the substitution map
    Rebuild(RebuildArgs),

    /// Show which dependencies would be rebuilt
    Classify(ClassifyArgs),

    /// Remove the substitution map
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by commands that read the configuration.
#[derive(Args, Clone, Default)]
pub struct ConfigArgs {
    /// Configuration file (defaults to native-rebuild.toml in the project root)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also scan optionalDependencies
    #[arg(long)]
    pub optional_dependencies: bool,
}

#[derive(Args)]
pub struct RebuildArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Force the rebuild tool to rebuild everything
    #[arg(short, long)]
    pub force: bool,

    /// Build debug binaries
    #[arg(short, long)]
    pub debug: bool,

    /// Let the rebuild tool build in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Output root artifacts are copied into
    #[arg(long, value_name = "DIR", env = "NATIVE_REBUILD_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Default output sub-path under the output root
    #[arg(long, value_name = "PATH")]
    pub output_path: Option<String>,

    /// Python interpreter for the native toolchain
    #[arg(long, value_name = "PATH")]
    pub python: Option<PathBuf>,

    /// Rebuild tool executable
    #[arg(long, value_name = "PROGRAM")]
    pub rebuild_tool: Option<String>,

    /// Electron version user modules are built against
    #[arg(long, value_name = "VERSION")]
    pub electron_version: Option<String>,

    /// Build a native module from source in this directory (repeatable)
    #[arg(long = "user-module", value_name = "SRC")]
    pub user_modules: Vec<String>,
}

impl RebuildArgs {
    /// Configuration expressed by the command-line flags alone.
    pub fn to_config(&self) -> RebuildConfig {
        RebuildConfig {
            force_rebuild: self.force.then_some(true),
            output_path: self.output_path.clone(),
            python_path: self.python.clone(),
            debug_build: self.debug.then_some(true),
            parallel_build: self.parallel.then_some(true),
            user_modules: self
                .user_modules
                .iter()
                .cloned()
                .map(UserModuleSpec::Source)
                .collect(),
            optional_dependencies: self.config.optional_dependencies.then_some(true),
            rebuild_tool: self.rebuild_tool.clone(),
            electron_version: self.electron_version.clone(),
            output_dir: self.out_dir.clone(),
            ..Default::default()
        }
    }
}

#[derive(Args)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Also remove the output root
    #[arg(long)]
    pub all: bool,

    /// Configuration file (defaults to native-rebuild.toml in the project root)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
