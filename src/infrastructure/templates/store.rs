//! Filesystem-backed component store
//!
//! Components are template files under one root directory. A component's name is
//! its path relative to the root with `/` separators and the extension stripped,
//! so `components/python/pyproject.tera` is `python/pyproject`.
//!
//! Discovery is lenient: a readable UTF-8 file is cataloged even when its template
//! syntax is broken, and [`ComponentStore::validate_all_components`] reports the
//! problem. Unreadable or non-UTF-8 files are skipped with a warning.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::generation::errors::describe_tera_error;
use crate::infrastructure::templates::{ComponentError, ComponentMetadata};

/// Default extension for component files
pub const DEFAULT_COMPONENT_EXTENSION: &str = "tera";

/// Store settings
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentStoreConfig {
    pub components_dir: PathBuf,
    /// Re-read a cached component on access when its file changed on disk
    pub auto_reload: bool,
    /// File extension without the leading dot
    pub extension: String,
}

impl ComponentStoreConfig {
    pub fn new(components_dir: impl Into<PathBuf>) -> Self {
        Self {
            components_dir: components_dir.into(),
            auto_reload: true,
            extension: DEFAULT_COMPONENT_EXTENSION.to_string(),
        }
    }

    pub fn with_auto_reload(mut self, auto_reload: bool) -> Self {
        self.auto_reload = auto_reload;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }
}

/// Named template fragments loaded from disk, with per-fragment metadata.
///
/// Each store owns its cache; run one store per thread rather than sharing one.
#[derive(Debug)]
pub struct ComponentStore {
    config: ComponentStoreConfig,
    components: HashMap<String, String>,
    metadata: HashMap<String, ComponentMetadata>,
    discovered: bool,
}

impl ComponentStore {
    pub fn new(config: ComponentStoreConfig) -> Self {
        Self {
            config,
            components: HashMap::new(),
            metadata: HashMap::new(),
            discovered: false,
        }
    }

    /// Store over `components_dir` with default settings
    pub fn from_dir(components_dir: impl Into<PathBuf>) -> Self {
        Self::new(ComponentStoreConfig::new(components_dir))
    }

    pub fn config(&self) -> &ComponentStoreConfig {
        &self.config
    }

    pub fn components_dir(&self) -> &Path {
        &self.config.components_dir
    }

    /// Scan the components directory and load every component file.
    ///
    /// Returns the number of components in the catalog afterwards. Individual
    /// files that cannot be read are skipped; only a missing root directory is
    /// an error.
    pub fn load_components(&mut self) -> Result<usize, ComponentError> {
        let root = self.config.components_dir.clone();
        if !root.is_dir() {
            return Err(ComponentError::DirectoryMissing(root));
        }

        let mut skipped = 0usize;
        for entry in WalkDir::new(&root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry in components directory");
                    skipped += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = self.name_for_path(entry.path()) else {
                continue;
            };

            if let Err(e) = self.load_single(&name) {
                warn!(component = %name, error = %e, "Skipping component that failed to load");
                skipped += 1;
            }
        }

        self.discovered = true;
        info!(
            components_dir = %root.display(),
            loaded = self.components.len(),
            skipped,
            "Loaded components"
        );
        Ok(self.components.len())
    }

    /// Raw text of a component.
    ///
    /// Unknown names are loaded on demand. With auto-reload enabled a cached
    /// component whose file changed is re-read first.
    pub fn get_component(&mut self, name: &str) -> Result<String, ComponentError> {
        if self.components.contains_key(name) {
            let stale = self.config.auto_reload
                && self.metadata.get(name).is_some_and(|m| m.is_stale());
            if stale {
                debug!(component = %name, "Component changed on disk, reloading");
                self.load_single(name)?;
            }
        } else {
            self.load_single(name)?;
        }

        self.components
            .get(name)
            .cloned()
            .ok_or_else(|| ComponentError::not_found(name))
    }

    /// Whether the component is cached or present on disk
    pub fn has_component(&self, name: &str) -> bool {
        self.components.contains_key(name)
            || self.component_path(name).is_some_and(|path| path.is_file())
    }

    /// Sorted component names.
    ///
    /// Before [`load_components`](Self::load_components) has run this lists what
    /// discovery would find, plus anything already loaded on demand.
    pub fn list_components(&self) -> Vec<String> {
        let mut names: BTreeSet<String> = self.components.keys().cloned().collect();
        if !self.discovered && self.config.components_dir.is_dir() {
            names.extend(
                WalkDir::new(&self.config.components_dir)
                    .follow_links(true)
                    .into_iter()
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| entry.file_type().is_file())
                    .filter_map(|entry| self.name_for_path(entry.path())),
            );
        }
        names.into_iter().collect()
    }

    /// Direct dependencies declared in the component's dependency comment
    pub fn get_dependencies(&mut self, name: &str) -> Result<Vec<String>, ComponentError> {
        self.get_component(name)?;
        Ok(self
            .metadata
            .get(name)
            .map(|m| m.dependencies.clone())
            .unwrap_or_default())
    }

    /// Text of every component `name` depends on, directly or through other
    /// dependencies, keyed by name.
    ///
    /// Each component is visited once, so mutual dependencies terminate. Declared
    /// dependencies that cannot be loaded are left out with a warning; a template
    /// that really includes one then fails when rendered.
    pub fn get_dependency_sources(
        &mut self,
        name: &str,
    ) -> Result<BTreeMap<String, String>, ComponentError> {
        let mut pending = self.get_dependencies(name)?;
        let mut visited = BTreeSet::from([name.to_string()]);
        let mut sources = BTreeMap::new();

        while let Some(dependency) = pending.pop() {
            if !visited.insert(dependency.clone()) {
                continue;
            }
            match self.get_component(&dependency) {
                Ok(content) => {
                    if let Some(metadata) = self.metadata.get(&dependency) {
                        pending.extend(metadata.dependencies.iter().cloned());
                    }
                    sources.insert(dependency, content);
                }
                Err(e) => {
                    warn!(
                        component = %name,
                        dependency = %dependency,
                        error = %e,
                        "Declared dependency is unavailable"
                    );
                }
            }
        }
        Ok(sources)
    }

    pub fn get_component_metadata(&self, name: &str) -> Option<&ComponentMetadata> {
        self.metadata.get(name)
    }

    /// Re-read one component from disk. Returns `false` instead of failing.
    pub fn reload_component(&mut self, name: &str) -> bool {
        match self.load_single(name) {
            Ok(()) => true,
            Err(e) => {
                warn!(component = %name, error = %e, "Failed to reload component");
                false
            }
        }
    }

    /// Drop every cached component; later access re-discovers from disk
    pub fn clear_cache(&mut self) {
        self.components.clear();
        self.metadata.clear();
        self.discovered = false;
    }

    pub fn clear(&mut self) {
        self.clear_cache();
    }

    /// Syntax-check every loaded component.
    ///
    /// Every component gets an entry; an empty list means it parsed. Each one is
    /// parsed together with its cached dependencies, so `extends` of a declared
    /// dependency resolves. Discovery runs first if it has not yet.
    pub fn validate_all_components(&mut self) -> BTreeMap<String, Vec<String>> {
        if !self.discovered {
            if let Err(e) = self.load_components() {
                warn!(error = %e, "Component discovery failed before validation");
            }
        }

        let mut results = BTreeMap::new();
        for (name, content) in &self.components {
            let templates = self
                .cached_dependency_closure(name)
                .into_iter()
                .filter_map(|dep| self.components.get(dep).map(|text| (dep, text.as_str())))
                .chain(std::iter::once((name.as_str(), content.as_str())));

            let mut errors = Vec::new();
            let mut tera = tera::Tera::default();
            if let Err(e) = tera.add_raw_templates(templates) {
                errors.push(describe_tera_error(&e));
            }
            results.insert(name.clone(), errors);
        }
        results
    }

    /// Transitive dependencies of `name` among cached components, `name` excluded
    fn cached_dependency_closure<'a>(&'a self, name: &'a str) -> BTreeSet<&'a str> {
        let mut closure = BTreeSet::new();
        let mut pending = vec![name];
        while let Some(current) = pending.pop() {
            let Some(metadata) = self.metadata.get(current) else {
                continue;
            };
            for dependency in &metadata.dependencies {
                if dependency != name && closure.insert(dependency.as_str()) {
                    pending.push(dependency.as_str());
                }
            }
        }
        closure
    }

    /// Path a component name maps to, or `None` for names that would escape the root
    fn component_path(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let escapes = name.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return None;
        }
        Some(
            self.config
                .components_dir
                .join(format!("{name}.{}", self.config.extension)),
        )
    }

    fn name_for_path(&self, path: &Path) -> Option<String> {
        if path.extension().and_then(|ext| ext.to_str()) != Some(self.config.extension.as_str()) {
            return None;
        }
        let relative = path
            .strip_prefix(&self.config.components_dir)
            .ok()?
            .with_extension("");
        let parts: Vec<&str> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;
        Some(parts.join("/"))
    }

    fn load_single(&mut self, name: &str) -> Result<(), ComponentError> {
        let path = self
            .component_path(name)
            .ok_or_else(|| ComponentError::not_found(name))?;

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(if self.components.contains_key(name) {
                    ComponentError::FileMissing {
                        name: name.to_string(),
                        path,
                    }
                } else {
                    ComponentError::not_found(name)
                });
            }
            Err(source) => {
                return Err(ComponentError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        let content = String::from_utf8(bytes).map_err(|e| ComponentError::InvalidEncoding {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let metadata =
            ComponentMetadata::from_content(name, &path, &content, &self.config.extension);
        debug!(
            component = %name,
            dependencies = metadata.dependencies.len(),
            "Loaded component"
        );
        self.metadata.insert(name.to_string(), metadata);
        self.components.insert(name.to_string(), content);
        Ok(())
    }
}
