//! Template module - Captures files into JSON templates and materializes them
//!
//! A template stores one file: its project-relative path, its content with
//! every occurrence of the project name swapped for [`tokens::PLACEHOLDER`],
//! and the type tags it applies to. Substitution is a literal, case-sensitive
//! substring replacement in both directions.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use super::catalog::{applies_to, read_json, write_json};
use super::config::{self, Paths, files, tokens};
use super::error::{Error, Result};

/// Separator used when a nested path is flattened into a template name
const NAME_SEPARATOR: &str = "__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub path: String,
    pub content: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl Template {
    /// Build a template from raw file content, abstracting `project_name` away
    pub fn capture(path: impl Into<String>, raw: &str, project_name: &str, types: &[String]) -> Self {
        // An empty name would match between every character
        let content = if project_name.is_empty() {
            raw.to_string()
        } else {
            raw.replace(project_name, tokens::PLACEHOLDER)
        };
        Self {
            path: path.into(),
            content,
            types: types.to_vec(),
        }
    }

    /// Content with the placeholder replaced by `project_name`
    pub fn render(&self, project_name: &str) -> String {
        self.content.replace(tokens::PLACEHOLDER, project_name)
    }

    pub fn applies_to(&self, selected: &[String]) -> bool {
        applies_to(&self.types, selected)
    }
}

/// Path recorded in a template: normal components only, `/`-separated
pub fn stored_path(source: &Path) -> String {
    source
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Name a template is stored under, derived from its stored path
pub fn template_name(stored_path: &str) -> String {
    stored_path.replace('/', NAME_SEPARATOR)
}

/// Read a file that must hold UTF-8 text
pub fn read_text(path: &Path) -> Result<String> {
    let raw = std::fs::read(path).map_err(|err| Error::read(path, err))?;
    String::from_utf8(raw).map_err(|source| Error::NotText {
        path: path.to_path_buf(),
        source,
    })
}

/// Create `dir` and its parents with [`config::DIR_MODE`]
fn create_dirs(dir: &Path) -> Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(config::DIR_MODE);
    }
    builder.create(dir).map_err(|err| Error::create_dir(dir, err))
}

/// Outcome of [`TemplateStore::capture`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    /// Names of the templates written, in walk order
    pub names: Vec<String>,
    /// Files left out because they are not UTF-8 text
    pub skipped: Vec<PathBuf>,
}

/// Directory of `<name>.json` template documents
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn open(paths: &Paths) -> Self {
        Self::new(paths.templates_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{}", files::TEMPLATE_EXT))
    }

    /// Names of every stored template, sorted; a missing directory is empty
    pub fn names(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(Error::read(&self.dir, err)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| Error::read(&self.dir, err))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(files::TEMPLATE_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                names.push(stem.to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn load(&self, name: &str) -> Result<Template> {
        read_json(&self.file_for(name))?.ok_or_else(|| Error::TemplateNotFound(name.to_string()))
    }

    pub fn content(&self, name: &str) -> Result<String> {
        Ok(self.load(name)?.content)
    }

    pub fn types(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.load(name)?.types)
    }

    pub fn save(&self, name: &str, template: &Template) -> Result<()> {
        write_json(&self.file_for(name), template)
    }

    /// Rewrite the content and tags of an existing template, keeping its path
    pub fn update(&self, name: &str, content: impl Into<String>, types: &[String]) -> Result<()> {
        let mut template = self.load(name)?;
        template.content = content.into();
        template.types = types.to_vec();
        self.save(name, &template)
    }

    /// Remove the named templates; names without a file are skipped
    pub fn delete<S: AsRef<str>>(&self, names: &[S]) -> Result<usize> {
        let mut removed = 0;
        for name in names {
            let path = self.file_for(name.as_ref());
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => return Err(Error::Remove { path, source }),
            }
        }
        Ok(removed)
    }

    /// Capture a file, or every regular file below a directory
    ///
    /// A single file that is not UTF-8 text is an error; inside a directory
    /// such files are skipped and listed in [`Captured::skipped`].
    pub fn capture(&self, source: &Path, types: &[String], project_name: &str) -> Result<Captured> {
        let metadata = std::fs::metadata(source).map_err(|err| Error::read(source, err))?;
        if !metadata.is_dir() {
            let name = self.capture_file(source, types, project_name)?;
            return Ok(Captured {
                names: vec![name],
                skipped: Vec::new(),
            });
        }

        let mut captured = Captured::default();
        for entry in WalkDir::new(source).sort_by_file_name() {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(source).to_path_buf();
                Error::read(path, err.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            match self.capture_file(entry.path(), types, project_name) {
                Ok(name) => captured.names.push(name),
                Err(Error::NotText { path, .. }) => captured.skipped.push(path),
                Err(err) => return Err(err),
            }
        }
        Ok(captured)
    }

    fn capture_file(&self, source: &Path, types: &[String], project_name: &str) -> Result<String> {
        let raw = read_text(source)?;
        let path = stored_path(source);
        let name = template_name(&path);

        // Flattening can map two different paths onto one name
        let existing: Option<Template> = read_json(&self.file_for(&name))?;
        if let Some(existing) = existing {
            if existing.path != path {
                return Err(Error::DuplicateEntry {
                    kind: "template",
                    name,
                });
            }
        }

        let template = Template::capture(path, &raw, project_name, types);
        self.save(&name, &template)?;
        Ok(name)
    }

    /// Templates applying to `selected`, sorted by name
    pub fn matching(&self, selected: &[String]) -> Result<Vec<(String, Template)>> {
        let mut matches = Vec::new();
        for name in self.names()? {
            let template = self.load(&name)?;
            if template.applies_to(selected) {
                matches.push((name, template));
            }
        }
        Ok(matches)
    }

    /// Write the named template below `dest_root`, returning the file written
    ///
    /// An existing file at the destination is overwritten.
    pub fn materialize(&self, name: &str, project_name: &str, dest_root: &Path) -> Result<PathBuf> {
        let template = self.load(name)?;
        write_template(&template, project_name, dest_root)
    }
}

pub(crate) fn write_template(template: &Template, project_name: &str, dest_root: &Path) -> Result<PathBuf> {
    let dest = dest_root.join(stored_path(Path::new(&template.path)));
    if let Some(parent) = dest.parent() {
        create_dirs(parent)?;
    }
    std::fs::write(&dest, template.render(project_name)).map_err(|err| Error::write(&dest, err))?;
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn capture_replaces_every_occurrence() {
        let template = Template::capture(
            "lib/main.dart",
            "import 'package:shop/a.dart';\nimport 'package:shop/b.dart';\n// shop",
            "shop",
            &tags(&["state"]),
        );
        assert_eq!(template.content.matches(tokens::PLACEHOLDER).count(), 3);
        assert!(!template.content.contains("shop"));
    }

    #[test]
    fn substitution_is_case_sensitive() {
        let template = Template::capture("a.txt", "shop Shop SHOP", "shop", &[]);
        assert_eq!(template.content, "{FLUTTER_ASSIST} Shop SHOP");
    }

    #[test]
    fn empty_project_name_leaves_content_alone() {
        let template = Template::capture("a.txt", "abc", "", &[]);
        assert_eq!(template.content, "abc");
    }

    #[test]
    fn render_into_other_name_leaves_no_placeholder() {
        let template = Template::capture("a.txt", "shop/shop/shop", "shop", &[]);
        let rendered = template.render("market");
        assert_eq!(rendered, "market/market/market");
        assert!(!rendered.contains(tokens::PLACEHOLDER));
    }

    #[test]
    fn stored_path_drops_root_and_dots() {
        assert_eq!(stored_path(Path::new("/lib/main.dart")), "lib/main.dart");
        assert_eq!(stored_path(Path::new("./lib/./main.dart")), "lib/main.dart");
        assert_eq!(stored_path(Path::new("../shared/x.dart")), "shared/x.dart");
        assert_eq!(template_name("lib/src/app.dart"), "lib__src__app.dart");
    }

    #[test]
    fn capture_file_and_materialize_round_trip() {
        let work = TempDir::new().unwrap();
        let store = TemplateStore::new(work.path().join("templates"));
        let source = work.path().join("pubspec.yaml");
        let original = "name: shop\ndescription: shop app\n";
        std::fs::write(&source, original).unwrap();

        let names = store.capture(&source, &tags(&["ALL"]), "shop").unwrap().names;
        assert_eq!(names.len(), 1);
        let stored = store.load(&names[0]).unwrap();
        assert_eq!(stored.types, tags(&["ALL"]));
        assert_eq!(stored.path, stored_path(&source));

        let out = TempDir::new().unwrap();
        let written = store.materialize(&names[0], "shop", out.path()).unwrap();
        assert_eq!(std::fs::read_to_string(written).unwrap(), original);
    }

    #[test]
    fn capture_directory_keeps_relative_paths() {
        let work = TempDir::new().unwrap();
        let store = TemplateStore::new(work.path().join("templates"));
        let lib = work.path().join("lib");
        std::fs::create_dir_all(lib.join("screens")).unwrap();
        std::fs::write(lib.join("main.dart"), "void main() => runApp(shop());").unwrap();
        std::fs::write(lib.join("screens/home.dart"), "class ShopHome {}").unwrap();
        std::fs::write(lib.join(".hidden"), "shop").unwrap();

        let captured = store.capture(&lib, &tags(&["state"]), "shop").unwrap();
        assert_eq!(captured.names.len(), 3);
        assert!(captured.skipped.is_empty());

        let home = store
            .load(&template_name(&stored_path(&lib.join("screens/home.dart"))))
            .unwrap();
        assert!(home.path.ends_with("lib/screens/home.dart"));
        assert_eq!(home.content, "class ShopHome {}");
    }

    const PNG_BYTES: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0xff, 0xfe, 0x00];

    #[test]
    fn non_utf8_file_is_refused_not_mangled() {
        let work = TempDir::new().unwrap();
        let store = TemplateStore::new(work.path().join("templates"));
        let icon = work.path().join("icon.png");
        std::fs::write(&icon, PNG_BYTES).unwrap();

        let err = store.capture(&icon, &tags(&["ALL"]), "shop").unwrap_err();
        assert!(matches!(err, Error::NotText { ref path, .. } if *path == icon));
        assert!(store.names().unwrap().is_empty());
    }

    #[test]
    fn directory_capture_skips_binary_files() {
        let work = TempDir::new().unwrap();
        let store = TemplateStore::new(work.path().join("templates"));
        let assets = work.path().join("assets");
        std::fs::create_dir_all(&assets).unwrap();
        std::fs::write(assets.join("icon.png"), PNG_BYTES).unwrap();
        std::fs::write(assets.join("strings.txt"), "shop").unwrap();

        let captured = store.capture(&assets, &[], "shop").unwrap();
        assert_eq!(captured.names.len(), 1);
        assert_eq!(captured.skipped, [assets.join("icon.png")]);
        assert_eq!(store.content(&captured.names[0]).unwrap(), tokens::PLACEHOLDER);
    }

    #[test]
    fn flattened_name_collision_is_rejected() {
        let work = TempDir::new().unwrap();
        let store = TemplateStore::new(work.path().join("templates"));
        let lib = work.path().join("lib");
        std::fs::create_dir_all(lib.join("a")).unwrap();
        std::fs::write(lib.join("a__b.dart"), "first").unwrap();
        std::fs::write(lib.join("a/b.dart"), "second").unwrap();

        let first = store.capture(&lib.join("a__b.dart"), &[], "").unwrap().names;
        let err = store.capture(&lib.join("a/b.dart"), &[], "").unwrap_err();
        assert!(matches!(err, Error::DuplicateEntry { kind: "template", .. }));
        assert_eq!(store.content(&first[0]).unwrap(), "first");

        // recapturing the same file still overwrites
        std::fs::write(lib.join("a__b.dart"), "again").unwrap();
        store.capture(&lib.join("a__b.dart"), &[], "").unwrap();
        assert_eq!(store.content(&first[0]).unwrap(), "again");
    }

    #[test]
    fn materialize_creates_parent_dirs_and_overwrites() {
        let work = TempDir::new().unwrap();
        let store = TemplateStore::new(work.path().join("templates"));
        let template = Template::capture("lib/src/deep/app.dart", "// shop", "shop", &[]);
        store.save("app", &template).unwrap();

        let project = TempDir::new().unwrap();
        let dest = project.path().join("lib/src/deep/app.dart");
        std::fs::create_dir_all(dest.parent().unwrap()).unwrap();
        std::fs::write(&dest, "old").unwrap();

        let written = store.materialize("app", "market", project.path()).unwrap();
        assert_eq!(written, dest);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "// market");
    }

    #[cfg(unix)]
    #[test]
    fn materialized_dirs_use_directory_mode() {
        use std::os::unix::fs::PermissionsExt;

        let work = TempDir::new().unwrap();
        let store = TemplateStore::new(work.path().join("templates"));
        store
            .save("a", &Template::capture("assets/icons/a.txt", "x", "shop", &[]))
            .unwrap();

        let project = TempDir::new().unwrap();
        store.materialize("a", "shop", project.path()).unwrap();

        let mode = std::fs::metadata(project.path().join("assets/icons"))
            .unwrap()
            .permissions()
            .mode();
        // umask may only clear bits
        assert_eq!(mode & 0o022, 0);
        assert_eq!(mode & 0o700, 0o700);
    }

    #[test]
    fn names_lists_json_files_sorted() {
        let work = TempDir::new().unwrap();
        let store = TemplateStore::new(work.path().join("templates"));
        assert!(store.names().unwrap().is_empty());

        store.save("b", &Template::capture("b", "", "", &[])).unwrap();
        store.save("a", &Template::capture("a", "", "", &[])).unwrap();
        std::fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.names().unwrap(), ["a", "b"]);
    }

    #[test]
    fn delete_skips_missing_templates() {
        let work = TempDir::new().unwrap();
        let store = TemplateStore::new(work.path().join("templates"));
        store.save("a", &Template::capture("a", "", "", &[])).unwrap();

        assert_eq!(store.delete(&["a", "ghost"]).unwrap(), 1);
        assert!(store.names().unwrap().is_empty());
    }

    #[test]
    fn update_rewrites_content_and_types_only() {
        let work = TempDir::new().unwrap();
        let store = TemplateStore::new(work.path().join("templates"));
        store
            .save("main", &Template::capture("lib/main.dart", "v1", "", &tags(&["state"])))
            .unwrap();

        store.update("main", "v2", &tags(&["ALL"])).unwrap();

        let template = store.load("main").unwrap();
        assert_eq!(template.path, "lib/main.dart");
        assert_eq!(store.content("main").unwrap(), "v2");
        assert_eq!(store.types("main").unwrap(), tags(&["ALL"]));
    }

    #[test]
    fn update_of_unknown_template_fails() {
        let work = TempDir::new().unwrap();
        let store = TemplateStore::new(work.path().join("templates"));
        assert!(matches!(
            store.update("ghost", "x", &[]),
            Err(Error::TemplateNotFound(name)) if name == "ghost"
        ));
    }

    #[test]
    fn matching_honors_all_and_intersection() {
        let work = TempDir::new().unwrap();
        let store = TemplateStore::new(work.path().join("templates"));
        store.save("a", &Template::capture("a", "", "", &tags(&["ALL"]))).unwrap();
        store.save("b", &Template::capture("b", "", "", &tags(&["state"]))).unwrap();
        store.save("c", &Template::capture("c", "", "", &tags(&["firebase"]))).unwrap();

        let names = |selected: &[&str]| -> Vec<String> {
            store
                .matching(&tags(selected))
                .unwrap()
                .into_iter()
                .map(|(name, _)| name)
                .collect()
        };
        assert_eq!(names(&["state"]), ["a", "b"]);
        assert_eq!(names(&[]), ["a"]);
    }
}
