//! `native-rebuild rebuild` command

use std::time::Instant;

use anyhow::Result;

use crate::cli::RebuildArgs;
use crate::commands::load_project;
use native_rebuild::ops::user_modules::installed_electron_version;
use native_rebuild::ops::{rebuild_native_modules, GypModuleBuilder, RebuildSession};
use native_rebuild::util::fs::relative_path;
use native_rebuild::util::process::{resolve_tool, SystemRunner};
use native_rebuild::util::GlobalContext;
use native_rebuild::NodeModulesResolver;

pub fn execute(args: RebuildArgs, verbose: bool) -> Result<()> {
    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(verbose);

    let (root, mut config) = load_project(&ctx, args.config.config.as_deref())?;
    // CLI flags override both config files
    config.merge(args.to_config());

    // Only user modules need to know the Electron version up front.
    let electron_version = match config.electron_version.clone() {
        Some(version) => version,
        None if !config.user_modules.is_empty() => installed_electron_version(&root)?,
        None => String::new(),
    };

    let runner = SystemRunner;
    let resolver = NodeModulesResolver::new(&root);
    let builder = GypModuleBuilder::new(
        &root,
        resolve_tool(config.node_gyp(), &root),
        electron_version,
        &runner,
    )
    .debug(config.debug_build())
    .python(config.python_path.clone());

    let session = RebuildSession {
        project_root: root.clone(),
        config: &config,
        output_root: config.output_dir(ctx.cwd()),
        map_path: ctx.substitution_map_path(),
        resolver: &resolver,
        runner: &runner,
        builder: &builder,
    };

    let start = Instant::now();
    let report = rebuild_native_modules(&session)?;

    for file in &report.copied {
        eprintln!("      Copied {}", relative_path(ctx.cwd(), file).display());
    }
    if ctx.is_verbose() {
        for (runtime, target) in &report.map {
            eprintln!("  Substitute {} -> {}", runtime, target);
        }
    }
    eprintln!(
        "    Finished {} native module(s) in {:.2}s",
        report.map.len(),
        start.elapsed().as_secs_f64()
    );
    eprintln!(
        "       Wrote {}",
        relative_path(ctx.cwd(), &session.map_path).display()
    );

    Ok(())
}
