//! Command create - Generates a project and applies the catalog to it

use anyhow::{Context as _, Result};
use colored::*;
use std::io::{BufRead, Write};

use flutter_assist::core::config::Settings;
use flutter_assist::core::project::ProjectCreator;
use flutter_assist::core::runner::XshellRunner;
use flutter_assist::core::select::Prompt;

use super::{Context, select_types};

pub fn run<R: BufRead, W: Write>(
    ctx: &Context,
    prompt: &mut Prompt<R, W>,
    name: &str,
) -> Result<()> {
    ctx.reporter.info("Starting project creation...");

    let Some(types) = select_types(ctx, prompt)? else {
        return Ok(());
    };

    let settings = Settings::load(&ctx.paths)?;
    let parent = std::env::current_dir().context("Failed to get current directory")?;
    ctx.reporter
        .detail(&format!("Catalog: {}", ctx.paths.util_dir().display()));

    let creator = ProjectCreator::new(&ctx.paths, settings, XshellRunner, ctx.reporter);
    let created = creator
        .create(&parent, name, &types)
        .with_context(|| format!("Failed to create project {name}"))?;

    if !ctx.reporter.is_quiet() {
        println!();
        println!("{}", "🎉 Project created and configured!".bright_green().bold());
        println!(
            "   Packages: {}",
            created.packages.len().to_string().bright_green()
        );
        println!("   Files: {}", created.files.len().to_string().bright_green());
        println!(
            "   📁 {}",
            created.dir.display().to_string().bright_cyan()
        );
    }
    Ok(())
}
