//! Catalog module - JSON-backed lists of packages and template-for types
//!
//! Every mutation reads the whole document, changes it in memory and
//! rewrites it pretty-printed. A missing file reads as an empty catalog.
//! There is no locking: two processes mutating the same catalog race and
//! the last writer wins.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::config::{Paths, tokens};
use super::error::{Error, Result};

/// A dependency added to generated projects through the package manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl Package {
    pub fn new<S: Into<String>>(name: impl Into<String>, types: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn applies_to(&self, selected: &[String]) -> bool {
        applies_to(&self.types, selected)
    }
}

/// A project flavor that packages and templates are tagged with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateType {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl TemplateType {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Entry created by the `-tf <name>` shortcut
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let description = format!("Template for {name}");
        Self { name, description }
    }
}

/// Entries addressed by a unique name
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Package {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for TemplateType {
    fn name(&self) -> &str {
        &self.name
    }
}

/// True when `tags` carries the `ALL` wildcard or shares a tag with `selected`
pub fn applies_to(tags: &[String], selected: &[String]) -> bool {
    tags.iter()
        .any(|tag| tag == tokens::ALL || selected.iter().any(|s| s == tag))
}

/// Read and parse a JSON document, `None` when the file does not exist
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(Error::read(path, err)),
    };
    serde_json::from_slice(&data)
        .map(Some)
        .map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Pretty-print `value` into `path`, creating the parent directory first
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| Error::create_dir(parent, err))?;
    }
    let data = serde_json::to_string_pretty(value).map_err(Error::Serialize)?;
    std::fs::write(path, data).map_err(|err| Error::write(path, err))
}

fn ensure_unique<T: Named>(entries: &[T], name: &str, kind: &'static str) -> Result<()> {
    if entries.iter().any(|entry| entry.name() == name) {
        return Err(Error::DuplicateEntry {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Drop every entry whose name is in `names`, returning how many went away
fn remove_named<T: Named, S: AsRef<str>>(entries: &mut Vec<T>, names: &[S]) -> usize {
    let before = entries.len();
    entries.retain(|entry| !names.iter().any(|name| name.as_ref() == entry.name()));
    before - entries.len()
}

/// Catalog of packages stored as a JSON array
#[derive(Debug, Clone)]
pub struct PackageCatalog {
    path: PathBuf,
}

impl PackageCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(paths: &Paths) -> Self {
        Self::new(paths.packages_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> Result<Vec<Package>> {
        // Older catalogs may hold `null` after every entry was deleted
        let packages: Option<Option<Vec<Package>>> = read_json(&self.path)?;
        Ok(packages.flatten().unwrap_or_default())
    }

    pub fn add(&self, package: Package) -> Result<()> {
        let mut packages = self.list()?;
        ensure_unique(&packages, &package.name, "package")?;
        packages.push(package);
        write_json(&self.path, &packages)
    }

    pub fn delete<S: AsRef<str>>(&self, names: &[S]) -> Result<usize> {
        let mut packages = self.list()?;
        let removed = remove_named(&mut packages, names);
        if removed > 0 {
            write_json(&self.path, &packages)?;
        }
        Ok(removed)
    }

    /// Packages that apply to `selected`, in catalog order
    pub fn select(&self, selected: &[String]) -> Result<Vec<Package>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|package| package.applies_to(selected))
            .collect())
    }
}

#[derive(Deserialize)]
struct TemplateForDocument {
    #[serde(default)]
    types: Option<Vec<TemplateType>>,
}

#[derive(Serialize)]
struct TemplateForDocumentRef<'a> {
    types: &'a [TemplateType],
}

/// Catalog of template-for types stored as `{"types": [...]}`
#[derive(Debug, Clone)]
pub struct TemplateForCatalog {
    path: PathBuf,
}

impl TemplateForCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(paths: &Paths) -> Self {
        Self::new(paths.template_for_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> Result<Vec<TemplateType>> {
        let document: Option<TemplateForDocument> = read_json(&self.path)?;
        Ok(document
            .and_then(|document| document.types)
            .unwrap_or_default())
    }

    pub fn add(&self, entry: TemplateType) -> Result<()> {
        let mut types = self.list()?;
        ensure_unique(&types, &entry.name, "template for")?;
        types.push(entry);
        self.write(&types)
    }

    pub fn add_named(&self, name: &str) -> Result<()> {
        self.add(TemplateType::named(name))
    }

    pub fn delete<S: AsRef<str>>(&self, names: &[S]) -> Result<usize> {
        let mut types = self.list()?;
        let removed = remove_named(&mut types, names);
        if removed > 0 {
            self.write(&types)?;
        }
        Ok(removed)
    }

    fn write(&self, types: &[TemplateType]) -> Result<()> {
        write_json(&self.path, &TemplateForDocumentRef { types })
    }
}
