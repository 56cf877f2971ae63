//! Command modules of Flutter Assist

pub mod create;
pub mod list;
pub mod package;
pub mod template;
pub mod template_for;

use anyhow::{Context as _, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use flutter_assist::core::catalog::TemplateForCatalog;
use flutter_assist::core::config::Paths;
use flutter_assist::core::report::Reporter;
use flutter_assist::core::select::Prompt;

/// Everything a command needs from the command line
pub struct Context {
    pub paths: Paths,
    pub reporter: Reporter,
}

/// Ask for the type tags an operation applies to
///
/// Returns `None` (after telling the user) when nothing could be selected.
pub fn select_types<R: BufRead, W: Write>(
    ctx: &Context,
    prompt: &mut Prompt<R, W>,
) -> Result<Option<Vec<String>>> {
    let types = TemplateForCatalog::open(&ctx.paths)
        .list()
        .context("Failed to read template-for types")?;
    if types.is_empty() {
        ctx.reporter
            .error("No template-for types defined yet, add one with -tf <name>");
        return Ok(None);
    }

    let names: Vec<String> = types.into_iter().map(|t| t.name).collect();
    let selected = prompt
        .select_many("Types:", &names)
        .context("Failed to read selection")?;
    if selected.is_empty() {
        ctx.reporter.error("At least one type must be selected");
        return Ok(None);
    }
    Ok(Some(selected.into_iter().cloned().collect()))
}

/// Ask for the name of the project the captured files come from
pub fn ask_project_name<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>) -> Result<String> {
    prompt
        .read_line("📝 Enter the project name: ")
        .context("Failed to read project name")
}

/// `path` relative to the current directory when it lies below it
pub fn relative_to_cwd(path: &Path) -> PathBuf {
    if path.is_absolute() {
        if let Ok(cwd) = std::env::current_dir() {
            if let Ok(relative) = path.strip_prefix(&cwd) {
                return relative.to_path_buf();
            }
        }
    }
    path.to_path_buf()
}
