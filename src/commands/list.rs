//! Command list - Shows the contents of the catalogs
use anyhow::Result;
use colored::*;

use flutter_assist::core::catalog::{PackageCatalog, TemplateForCatalog};
use flutter_assist::core::template::TemplateStore;

use super::Context;

pub fn run(ctx: &Context) -> Result<()> {
    ctx.reporter
        .detail(&format!("Catalog: {}", ctx.paths.util_dir().display()));

    println!("{}", "🏷  Template-for types:".bright_cyan());
    let types = TemplateForCatalog::open(&ctx.paths).list()?;
    if types.is_empty() {
        println!("   {}", "(none)".bright_black());
    }
    for entry in &types {
        println!("  {} - {}", entry.name.bright_green(), entry.description);
    }
    println!();

    println!("{}", "📦 Packages:".bright_cyan());
    let packages = PackageCatalog::open(&ctx.paths).list()?;
    if packages.is_empty() {
        println!("   {}", "(none)".bright_black());
    }
    for package in &packages {
        println!(
            "  {} [{}]",
            package.name.bright_green(),
            package.types.join(", ")
        );
    }
    println!();

    println!("{}", "📄 Templates:".bright_cyan());
    let store = TemplateStore::open(&ctx.paths);
    let names = store.names()?;
    if names.is_empty() {
        println!("   {}", "(none)".bright_black());
    }
    for name in &names {
        let template = store.load(name)?;
        println!(
            "  {} → {} [{}]",
            name.bright_green(),
            template.path,
            template.types.join(", ")
        );
    }

    Ok(())
}
