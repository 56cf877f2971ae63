//! Command template - Captures, updates and deletes templates

use anyhow::{Context as _, Result, bail};
use colored::*;
use std::io::{BufRead, Write};
use std::path::Path;

use flutter_assist::core::select::Prompt;
use flutter_assist::core::template::{Template, TemplateStore, read_text};

use super::{Context, ask_project_name, relative_to_cwd, select_types};

/// `-t <path>`: capture a file or directory into templates
pub fn capture<R: BufRead, W: Write>(
    ctx: &Context,
    prompt: &mut Prompt<R, W>,
    source: &Path,
) -> Result<()> {
    ctx.reporter.info("Starting template creation...");

    if !source.exists() {
        bail!("Template source not found: {}", source.display());
    }

    let Some(types) = select_types(ctx, prompt)? else {
        return Ok(());
    };
    let project_name = ask_project_name(prompt)?;
    if project_name.is_empty() {
        ctx.reporter
            .warning("No project name given, content is stored unchanged");
    }

    let store = TemplateStore::open(&ctx.paths);
    let source = relative_to_cwd(source);
    let captured = store
        .capture(&source, &types, &project_name)
        .with_context(|| format!("Failed to capture {}", source.display()))?;

    for name in &captured.names {
        ctx.reporter.detail(&store.file_for(name).display().to_string());
    }
    for path in &captured.skipped {
        ctx.reporter
            .warning(&format!("Skipped {} (not UTF-8 text)", path.display()));
    }
    ctx.reporter.success(&format!(
        "{} template(s) created",
        captured.names.len().to_string().bright_green()
    ));
    Ok(())
}

/// `-tupdate <name> <source>`: recapture `source` into an existing template
pub fn update<R: BufRead, W: Write>(
    ctx: &Context,
    prompt: &mut Prompt<R, W>,
    name: &str,
    source: &Path,
) -> Result<()> {
    let store = TemplateStore::open(&ctx.paths);
    let current = store.load(name)?;
    ctx.reporter.info(&format!(
        "Updating template {} ({})",
        name.bright_cyan(),
        current.path
    ));

    let raw = read_text(source)?;

    let Some(types) = select_types(ctx, prompt)? else {
        return Ok(());
    };
    let project_name = ask_project_name(prompt)?;

    let recaptured = Template::capture(current.path, &raw, &project_name, &types);
    store.update(name, recaptured.content, &types)?;

    ctx.reporter
        .success(&format!("Template updated: {}", name.bright_cyan()));
    Ok(())
}

/// `-tdelete`: pick templates to remove
pub fn delete<R: BufRead, W: Write>(ctx: &Context, prompt: &mut Prompt<R, W>) -> Result<()> {
    let store = TemplateStore::open(&ctx.paths);
    let names = store.names()?;
    if names.is_empty() {
        ctx.reporter.info("No templates to delete");
        return Ok(());
    }

    let selected: Vec<&String> = prompt
        .select_many("Templates:", &names)
        .context("Failed to read selection")?;
    if selected.is_empty() {
        ctx.reporter.info("Nothing selected");
        return Ok(());
    }

    let removed = store.delete(&selected)?;
    ctx.reporter.success(&format!(
        "{} template(s) deleted",
        removed.to_string().bright_green()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testing::{context, prompt};
    use super::*;
    use flutter_assist::core::config::tokens;
    use tempfile::TempDir;

    fn seed(store: &TemplateStore, names: &[&str]) {
        for name in names {
            let path = format!("lib/{name}.dart");
            store
                .save(name, &Template::capture(path, "// shop", "shop", &[]))
                .unwrap();
        }
    }

    #[test]
    fn update_keeps_stored_path_and_replaces_content() {
        let (_home, ctx) = context(&["state"]);
        let store = TemplateStore::open(&ctx.paths);
        store
            .save(
                "lib__main.dart",
                &Template::capture("lib/main.dart", "v1", "", &[]),
            )
            .unwrap();

        let work = TempDir::new().unwrap();
        let source = work.path().join("elsewhere/main.dart");
        std::fs::create_dir_all(source.parent().unwrap()).unwrap();
        std::fs::write(&source, "runApp(shop)").unwrap();

        update(&ctx, &mut prompt("1\nshop\n"), "lib__main.dart", &source).unwrap();

        let template = store.load("lib__main.dart").unwrap();
        assert_eq!(template.path, "lib/main.dart");
        assert_eq!(template.content, format!("runApp({})", tokens::PLACEHOLDER));
        assert_eq!(template.types, ["state"]);
    }

    #[test]
    fn update_with_no_types_selected_changes_nothing() {
        let (_home, ctx) = context(&["state"]);
        let store = TemplateStore::open(&ctx.paths);
        seed(&store, &["main"]);
        let before = store.load("main").unwrap();

        let work = TempDir::new().unwrap();
        let source = work.path().join("main.dart");
        std::fs::write(&source, "new").unwrap();

        update(&ctx, &mut prompt("5 x\nshop\n"), "main", &source).unwrap();
        assert_eq!(store.load("main").unwrap(), before);
    }

    #[test]
    fn update_of_binary_source_fails() {
        let (_home, ctx) = context(&["state"]);
        let store = TemplateStore::open(&ctx.paths);
        seed(&store, &["main"]);

        let work = TempDir::new().unwrap();
        let source = work.path().join("icon.png");
        std::fs::write(&source, [0x89, b'P', 0xff, 0xfe]).unwrap();

        assert!(update(&ctx, &mut prompt("1\nshop\n"), "main", &source).is_err());
        assert_eq!(store.content("main").unwrap(), format!("// {}", tokens::PLACEHOLDER));
    }

    #[test]
    fn delete_removes_selected_templates() {
        let (_home, ctx) = context(&[]);
        let store = TemplateStore::open(&ctx.paths);
        seed(&store, &["a", "b", "c"]);

        delete(&ctx, &mut prompt("3 1\n")).unwrap();
        assert_eq!(store.names().unwrap(), ["b"]);
    }

    #[test]
    fn delete_with_invalid_selection_keeps_everything() {
        let (_home, ctx) = context(&[]);
        let store = TemplateStore::open(&ctx.paths);
        seed(&store, &["a", "b"]);

        delete(&ctx, &mut prompt("5 x\n")).unwrap();
        assert_eq!(store.names().unwrap(), ["a", "b"]);
    }

    #[test]
    fn capture_with_no_types_selected_writes_nothing() {
        let (_home, ctx) = context(&["state"]);
        let work = TempDir::new().unwrap();
        let source = work.path().join("main.dart");
        std::fs::write(&source, "shop").unwrap();

        capture(&ctx, &mut prompt("\nshop\n"), &source).unwrap();
        assert!(TemplateStore::open(&ctx.paths).names().unwrap().is_empty());
    }

    #[test]
    fn capture_stores_tagged_template() {
        let (_home, ctx) = context(&["state"]);
        let work = TempDir::new().unwrap();
        let source = work.path().join("main.dart");
        std::fs::write(&source, "shop").unwrap();

        capture(&ctx, &mut prompt("1\nshop\n"), &source).unwrap();

        let store = TemplateStore::open(&ctx.paths);
        let names = store.names().unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(store.content(&names[0]).unwrap(), tokens::PLACEHOLDER);
        assert_eq!(store.types(&names[0]).unwrap(), ["state"]);
    }
}
