//! Project module - Generates a project and applies packages and templates
//!
//! Steps run in order and the first failure aborts with the step named in
//! the error. Nothing is rolled back: a project directory that was already
//! generated, or packages that were already added, stay in place.

use colored::*;
use std::path::{Path, PathBuf};

use super::catalog::{Package, PackageCatalog, read_json, write_json};
use super::config::{Paths, Settings, files};
use super::error::{Error, Result};
use super::report::Reporter;
use super::runner::{CommandRunner, command_line};
use super::template::{TemplateStore, write_template};

/// `packages.json` inside a generated project, listing the packages applied to it
///
/// Project creation leaves this file alone; it is maintained on request.
#[derive(Debug, Clone)]
pub struct ProjectManifest {
    path: PathBuf,
}

impl ProjectManifest {
    pub fn open(project_dir: &Path) -> Self {
        Self {
            path: project_dir.join(files::PACKAGES),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn packages(&self) -> Result<Vec<Package>> {
        let packages: Option<Option<Vec<Package>>> = read_json(&self.path)?;
        Ok(packages.flatten().unwrap_or_default())
    }

    pub fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.packages()?.iter().any(|package| package.name == name))
    }

    pub fn add(&self, package: Package) -> Result<()> {
        let mut packages = self.packages()?;
        if packages.iter().any(|existing| existing.name == package.name) {
            return Err(Error::DuplicateEntry {
                kind: "package",
                name: package.name,
            });
        }
        packages.push(package);
        write_json(&self.path, &packages)
    }

    pub fn packages_for(&self, selected: &[String]) -> Result<Vec<Package>> {
        Ok(self
            .packages()?
            .into_iter()
            .filter(|package| package.applies_to(selected))
            .collect())
    }
}

/// What [`ProjectCreator::create`] produced
#[derive(Debug, Clone, Default)]
pub struct CreatedProject {
    pub dir: PathBuf,
    pub packages: Vec<String>,
    pub files: Vec<PathBuf>,
}

/// Drives the generator, the package manager and template materialization
pub struct ProjectCreator<R> {
    runner: R,
    settings: Settings,
    packages: PackageCatalog,
    templates: TemplateStore,
    reporter: Reporter,
}

impl<R: CommandRunner> ProjectCreator<R> {
    pub fn new(paths: &Paths, settings: Settings, runner: R, reporter: Reporter) -> Self {
        Self {
            runner,
            settings,
            packages: PackageCatalog::open(paths),
            templates: TemplateStore::open(paths),
            reporter,
        }
    }

    /// Create project `name` inside `parent_dir` for the `selected` types
    pub fn create(&self, parent_dir: &Path, name: &str, selected: &[String]) -> Result<CreatedProject> {
        let dir = self.generate(parent_dir, name)?;

        let packages = self
            .packages
            .select(selected)
            .map_err(|err| err.in_step("reading package catalog"))?;
        let added = self.add_packages(&dir, &packages)?;

        let files = self.write_templates(&dir, name, selected)?;

        Ok(CreatedProject {
            dir,
            packages: added,
            files,
        })
    }

    fn generate(&self, parent_dir: &Path, name: &str) -> Result<PathBuf> {
        let program = self.settings.generator.as_str();
        let args = ["create", name];
        self.reporter.detail(&command_line(program, &args));

        let spinner = self
            .reporter
            .spinner(format!("Creating Flutter project {}...", name.bright_cyan()));
        let result = self.runner.run_checked(parent_dir, program, &args);
        spinner.finish_and_clear();
        let output = result.map_err(|err| err.in_step(format!("creating project {name}")))?;
        self.reporter.detail(output.stdout.trim_end());

        let dir = parent_dir.join(name);
        if !dir.is_dir() {
            return Err(Error::ProjectDirMissing(dir).in_step(format!("creating project {name}")));
        }
        self.reporter
            .success(&format!("Flutter project created: {}", name.bright_cyan()));
        Ok(dir)
    }

    fn add_packages(&self, dir: &Path, packages: &[Package]) -> Result<Vec<String>> {
        if packages.is_empty() {
            self.reporter.info("No packages apply to the selected types");
            return Ok(Vec::new());
        }

        self.reporter.step("Adding selected packages...");
        let program = self.settings.package_manager.as_str();
        let mut added = Vec::with_capacity(packages.len());

        for package in packages {
            let args = ["pub", "add", package.name.as_str()];
            self.reporter.detail(&command_line(program, &args));

            let spinner = self
                .reporter
                .spinner(format!("📦 Adding {}...", package.name.bright_cyan()));
            let result = self.runner.run_checked(dir, program, &args);
            spinner.finish_and_clear();
            result.map_err(|err| err.in_step(format!("adding package {}", package.name)))?;

            self.reporter
                .success(&format!("Package added: {}", package.name.bright_cyan()));
            added.push(package.name.clone());
        }
        Ok(added)
    }

    fn write_templates(&self, dir: &Path, name: &str, selected: &[String]) -> Result<Vec<PathBuf>> {
        let templates = self
            .templates
            .matching(selected)
            .map_err(|err| err.in_step("reading templates"))?;
        if templates.is_empty() {
            self.reporter.info("No templates apply to the selected types");
            return Ok(Vec::new());
        }

        self.reporter.step("Writing template files...");
        let mut written = Vec::with_capacity(templates.len());
        for (template_name, template) in templates {
            let path = write_template(&template, name, dir)
                .map_err(|err| err.in_step(format!("writing template {template_name}")))?;
            self.reporter
                .success(&format!("📄 {}", template.path.bright_cyan()));
            written.push(path);
        }
        Ok(written)
    }
}
