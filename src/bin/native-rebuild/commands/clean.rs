//! `native-rebuild clean` command

use anyhow::Result;

use crate::cli::CleanArgs;
use crate::commands::load_project;
use native_rebuild::util::fs::{remove_dir_all_if_exists, remove_file_if_exists};
use native_rebuild::util::GlobalContext;

pub fn execute(args: CleanArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;

    let map_path = ctx.substitution_map_path();
    if remove_file_if_exists(&map_path)? {
        eprintln!("     Removed {}", map_path.display());
    }

    if args.all {
        let (_, config) = load_project(&ctx, args.config.as_deref())?;
        let out_dir = config.output_dir(ctx.cwd());
        remove_dir_all_if_exists(&out_dir)?;
        eprintln!("     Removed {}", out_dir.display());
    }

    Ok(())
}
