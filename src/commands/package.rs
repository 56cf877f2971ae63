//! Command package - Adds and deletes catalog packages

use anyhow::{Context as _, Result};
use colored::*;
use std::io::{BufRead, Write};

use flutter_assist::core::catalog::{Package, PackageCatalog};
use flutter_assist::core::select::Prompt;

use super::{Context, select_types};

/// `-p <name>`: add a package tagged with the selected types
pub fn add<R: BufRead, W: Write>(
    ctx: &Context,
    prompt: &mut Prompt<R, W>,
    name: &str,
) -> Result<()> {
    ctx.reporter.info("Adding package...");

    let Some(types) = select_types(ctx, prompt)? else {
        return Ok(());
    };

    let catalog = PackageCatalog::open(&ctx.paths);
    catalog.add(Package::new(name, types))?;
    ctx.reporter.detail(&catalog.path().display().to_string());

    ctx.reporter
        .success(&format!("Package added: {}", name.bright_cyan()));
    Ok(())
}

/// `-pdelete`: pick one package to remove
pub fn delete<R: BufRead, W: Write>(ctx: &Context, prompt: &mut Prompt<R, W>) -> Result<()> {
    ctx.reporter.info("Deleting package...");

    let catalog = PackageCatalog::open(&ctx.paths);
    let names: Vec<String> = catalog.list()?.into_iter().map(|p| p.name).collect();
    if names.is_empty() {
        ctx.reporter.info("No packages to delete");
        return Ok(());
    }

    let Some(selected) = prompt
        .select_one("Select the package to delete:", &names)
        .context("Failed to read selection")?
    else {
        ctx.reporter.info("Nothing selected");
        return Ok(());
    };

    catalog.delete(&[selected])?;
    ctx.reporter
        .success(&format!("Package deleted: {}", selected.bright_cyan()));
    Ok(())
}
