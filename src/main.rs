//! Flutter Assist - Scaffolding helper for Flutter projects
//!
//! Creates projects with `flutter create`, adds catalog packages with
//! `flutter pub add` and writes catalog templates into them.
//!
//! # Usage
//! ```bash
//! flutter_assist my_app            # create a project
//! flutter_assist -t lib/screens    # capture templates
//! flutter_assist -p http           # add a package
//! flutter_assist -tf state         # add a template-for type
//! flutter_assist -tdelete          # delete templates
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::*;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use flutter_assist::core::config::{HOME_ENV, Paths};
use flutter_assist::core::report::{Reporter, print_error};
use flutter_assist::core::select::Prompt;

mod commands;

#[derive(Parser)]
#[command(name = "flutter_assist")]
#[command(about = "🚀 Flutter Assist - scaffolds Flutter projects from packages and templates", long_about = None)]
#[command(version)]
struct Cli {
    /// Name of the project to create
    #[arg(group = "action")]
    project_name: Option<String>,

    /// Create templates from a file or directory
    #[arg(short = 't', long = "template", value_name = "PATH", group = "action")]
    template: Option<PathBuf>,

    /// Add a template-for type
    #[arg(long = "tf", value_name = "NAME", group = "action")]
    template_for: Option<String>,

    /// Add a package
    #[arg(short = 'p', long = "package", value_name = "NAME", group = "action")]
    package: Option<String>,

    /// Update an existing template from a file
    #[arg(long = "tupdate", num_args = 2, value_names = ["NAME", "SOURCE"], group = "action")]
    template_update: Option<Vec<String>>,

    /// Delete templates
    #[arg(long = "tdelete", group = "action")]
    template_delete: bool,

    /// Delete a template-for type
    #[arg(long = "tfdelete", group = "action")]
    template_for_delete: bool,

    /// Delete a package
    #[arg(long = "pdelete", group = "action")]
    package_delete: bool,

    /// List packages, template-for types and templates
    #[arg(short, long, group = "action")]
    list: bool,

    /// Directory holding template_util/ (defaults to the executable's directory)
    #[arg(long, env = HOME_ENV, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode
    #[arg(short, long)]
    quiet: bool,
}

/// Single-dash long flags accepted for compatibility
const LEGACY_FLAGS: [&str; 5] = ["-tf", "-tupdate", "-tdelete", "-tfdelete", "-pdelete"];

/// Rewrite `-tf` style flags to `--tf` so clap does not read them as `-t f`
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some(flag) if LEGACY_FLAGS.contains(&flag) => OsString::from(format!("-{flag}")),
            _ => arg,
        })
        .collect()
}

fn main() {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    if let Err(err) = run(cli) {
        print_error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let reporter = Reporter::new(cli.verbose, cli.quiet);

    // Banner
    if !cli.quiet {
        println!("{}", "🚀 Flutter Assist".bright_cyan().bold());
        println!();
    }

    let ctx = commands::Context {
        paths: Paths::resolve(cli.root)?,
        reporter,
    };
    let mut prompt = Prompt::stdio();

    if cli.template_delete {
        commands::template::delete(&ctx, &mut prompt)?;
    } else if cli.template_for_delete {
        commands::template_for::delete(&ctx, &mut prompt)?;
    } else if cli.package_delete {
        commands::package::delete(&ctx, &mut prompt)?;
    } else if cli.list {
        commands::list::run(&ctx)?;
    } else if let Some(name) = cli.template_for {
        commands::template_for::add(&ctx, &name)?;
    } else if let Some(source) = cli.template {
        commands::template::capture(&ctx, &mut prompt, &source)?;
    } else if let Some([name, source]) = cli.template_update.as_deref() {
        commands::template::update(&ctx, &mut prompt, name, Path::new(source))?;
    } else if let Some(name) = cli.package {
        commands::package::add(&ctx, &mut prompt, &name)?;
    } else if let Some(name) = cli.project_name {
        commands::create::run(&ctx, &mut prompt, &name)?;
    } else {
        Cli::command().print_help()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(normalize_args(args.iter().map(OsString::from))).unwrap()
    }

    #[test]
    fn legacy_flags_are_rewritten() {
        let cli = parse(&["flutter_assist", "-tf", "state"]);
        assert_eq!(cli.template_for.as_deref(), Some("state"));
        assert!(cli.template.is_none());

        assert!(parse(&["flutter_assist", "-tdelete"]).template_delete);
        assert!(parse(&["flutter_assist", "-tfdelete"]).template_for_delete);
        assert!(parse(&["flutter_assist", "-pdelete"]).package_delete);
    }

    #[test]
    fn short_flags_take_values() {
        let cli = parse(&["flutter_assist", "-t", "lib/main.dart"]);
        assert_eq!(cli.template, Some(PathBuf::from("lib/main.dart")));

        let cli = parse(&["flutter_assist", "-p", "http"]);
        assert_eq!(cli.package.as_deref(), Some("http"));
    }

    #[test]
    fn positional_is_project_name() {
        let cli = parse(&["flutter_assist", "shop"]);
        assert_eq!(cli.project_name.as_deref(), Some("shop"));
    }

    #[test]
    fn update_takes_name_and_source() {
        let cli = parse(&["flutter_assist", "-tupdate", "lib__main.dart", "lib/main.dart"]);
        assert_eq!(
            cli.template_update,
            Some(vec!["lib__main.dart".to_string(), "lib/main.dart".to_string()])
        );
    }

    #[test]
    fn actions_are_exclusive() {
        let args = normalize_args(["flutter_assist", "-p", "http", "-tdelete"].map(OsString::from));
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn no_arguments_parse() {
        let cli = parse(&["flutter_assist", "--root", "/opt/assist"]);
        assert!(cli.project_name.is_none());
        assert_eq!(cli.root, Some(PathBuf::from("/opt/assist")));
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
