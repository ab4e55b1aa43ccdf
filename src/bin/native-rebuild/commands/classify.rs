//! `native-rebuild classify` command

use anyhow::Result;

use crate::cli::ClassifyArgs;
use crate::commands::load_project;
use native_rebuild::ops::{plan_rebuild, SkipReason};
use native_rebuild::util::GlobalContext;
use native_rebuild::NodeModulesResolver;

pub fn execute(args: ClassifyArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;

    let (root, mut config) = load_project(&ctx, args.config.config.as_deref())?;
    if args.config.optional_dependencies {
        config.optional_dependencies = Some(true);
    }

    let classification = plan_rebuild(&root, &config, &NodeModulesResolver::new(&root))?;

    for name in &classification.rebuild {
        println!("rebuild  {}", name);
    }
    for skipped in &classification.skipped {
        let why = match &skipped.reason {
            SkipReason::OptionalNotInstalled => "optional, not installed".to_string(),
            SkipReason::Unresolved(err) => err.to_string(),
        };
        println!("skip     {} ({})", skipped.name, why);
    }
    for name in &classification.non_native {
        println!("ignore   {}", name);
    }

    Ok(())
}
