//! Command template-for - Adds and deletes template-for types

use anyhow::{Context as _, Result};
use colored::*;
use std::io::{BufRead, Write};

use flutter_assist::core::catalog::TemplateForCatalog;
use flutter_assist::core::select::Prompt;

use super::Context;

/// `-tf <name>`
pub fn add(ctx: &Context, name: &str) -> Result<()> {
    ctx.reporter.info("Adding template-for type...");

    let catalog = TemplateForCatalog::open(&ctx.paths);
    catalog.add_named(name)?;
    ctx.reporter.detail(&catalog.path().display().to_string());

    ctx.reporter
        .success(&format!("Template-for added: {}", name.bright_cyan()));
    Ok(())
}

/// `-tfdelete`: pick one type to remove
pub fn delete<R: BufRead, W: Write>(ctx: &Context, prompt: &mut Prompt<R, W>) -> Result<()> {
    ctx.reporter.info("Deleting template-for type...");

    let catalog = TemplateForCatalog::open(&ctx.paths);
    let names: Vec<String> = catalog.list()?.into_iter().map(|t| t.name).collect();
    if names.is_empty() {
        ctx.reporter.info("No template-for types to delete");
        return Ok(());
    }

    let Some(selected) = prompt
        .select_one("Select the template-for to delete:", &names)
        .context("Failed to read selection")?
    else {
        ctx.reporter.info("Nothing selected");
        return Ok(());
    };

    catalog.delete(&[selected])?;
    ctx.reporter
        .success(&format!("Template-for deleted: {}", selected.bright_cyan()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testing::{context, prompt};
    use super::*;

    fn names(ctx: &Context) -> Vec<String> {
        TemplateForCatalog::open(&ctx.paths)
            .list()
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect()
    }

    #[test]
    fn add_appends_named_type() {
        let (_home, ctx) = context(&["state"]);
        add(&ctx, "maps").unwrap();
        assert_eq!(names(&ctx), ["state", "maps"]);
        assert!(add(&ctx, "maps").is_err());
    }

    #[test]
    fn delete_takes_first_valid_index() {
        let (_home, ctx) = context(&["state", "firebase", "maps"]);
        delete(&ctx, &mut prompt("2 3\n")).unwrap();
        assert_eq!(names(&ctx), ["state", "maps"]);
    }

    #[test]
    fn delete_with_invalid_selection_keeps_types() {
        let (_home, ctx) = context(&["state", "firebase"]);
        delete(&ctx, &mut prompt("5 x\n")).unwrap();
        assert_eq!(names(&ctx), ["state", "firebase"]);
    }
}
