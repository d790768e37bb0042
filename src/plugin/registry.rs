//! Plugin discovery and the shared element catalog.
//!
//! Discovery scans each search directory for module files, loads them through
//! a [`ModuleLoader`], and keeps the exports that implement the element
//! contract. A failing module is recorded and skipped; it never aborts the
//! scan.
//!
//! The registry publishes the catalog through an `ArcSwap`: readers always see
//! a complete catalog, and a refresh replaces it in one store.

use super::abi::ExportKind;
use super::catalog::{Catalog, ElementSummary, PluginDescriptor};
use super::loader::{LoadedModule, ModuleLoader, PluginLoadError};
use crate::config::EditorConfig;
use crate::pipeline::element::AnyElement;
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Knobs for a discovery run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Module file extension, without the dot.
    pub library_extension: String,
    /// Seed the catalog with the built-in elements.
    pub include_builtins: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            library_extension: std::env::consts::DLL_EXTENSION.to_string(),
            include_builtins: true,
        }
    }
}

impl DiscoveryOptions {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            library_extension: config.plugins.library_extension(),
            include_builtins: config.catalog.include_builtins,
        }
    }
}

/// A module or export that could not be added to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryFailure {
    pub path: PathBuf,
    pub error: PluginLoadError,
}

/// Result of one discovery run.
#[derive(Debug, Clone)]
pub struct DiscoveryReport {
    pub catalog: Catalog,
    pub failures: Vec<DiscoveryFailure>,
    /// Number of distinct module files handed to the loader.
    pub scanned: usize,
    pub completed_at: DateTime<Utc>,
}

/// Scan `search_paths` in order and build a catalog.
pub fn discover(
    loader: &dyn ModuleLoader,
    search_paths: &[PathBuf],
    options: &DiscoveryOptions,
) -> DiscoveryReport {
    let mut catalog = if options.include_builtins {
        Catalog::with_builtins()
    } else {
        Catalog::new()
    };
    let mut failures = Vec::new();
    let mut seen = HashSet::new();
    let mut scanned = 0;

    for dir in search_paths {
        let candidates = match candidate_modules(dir, &options.library_extension) {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("Skipping plugin directory {}: {}", dir.display(), e);
                continue;
            }
        };

        for path in candidates {
            let canonical = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
            if !seen.insert(canonical) {
                tracing::debug!("Skipping {} (already scanned)", path.display());
                continue;
            }
            scanned += 1;

            match loader.load(&path) {
                Ok(module) => register_module(&mut catalog, &path, module, &mut failures),
                Err(error) => {
                    tracing::warn!("Failed to load plugin {}: {}", path.display(), error);
                    failures.push(DiscoveryFailure { path, error });
                }
            }
        }
    }

    tracing::info!(
        "Discovered {} element kinds from {} modules ({} failures)",
        catalog.len(),
        scanned,
        failures.len()
    );

    DiscoveryReport {
        catalog,
        failures,
        scanned,
        completed_at: Utc::now(),
    }
}

/// Module files directly inside `dir`, sorted by file name.
fn candidate_modules(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .collect();
    paths.sort();
    Ok(paths)
}

fn register_module(
    catalog: &mut Catalog,
    path: &Path,
    module: LoadedModule,
    failures: &mut Vec<DiscoveryFailure>,
) {
    for export in module.exports {
        if export.kind != ExportKind::Element {
            tracing::debug!(
                "Ignoring export '{}' of {} ({:?})",
                export.name,
                path.display(),
                export.kind
            );
            continue;
        }

        let result = PluginDescriptor::from_export(export, path, &module.name)
            .and_then(|descriptor| catalog.insert(descriptor));
        if let Err(error) = result {
            tracing::warn!("Rejected element from {}: {}", path.display(), error);
            failures.push(DiscoveryFailure {
                path: path.to_path_buf(),
                error,
            });
        }
    }
}

/// Owns the published catalog and re-runs discovery on demand.
pub struct PluginRegistry {
    loader: Arc<dyn ModuleLoader>,
    search_paths: Vec<PathBuf>,
    options: DiscoveryOptions,
    catalog: Arc<ArcSwap<Catalog>>,
}

impl PluginRegistry {
    /// Create a registry. The catalog holds only built-ins (if enabled) until
    /// the first refresh.
    pub fn new(
        loader: Arc<dyn ModuleLoader>,
        search_paths: Vec<PathBuf>,
        options: DiscoveryOptions,
    ) -> Self {
        let initial = if options.include_builtins {
            Catalog::with_builtins()
        } else {
            Catalog::new()
        };
        Self {
            loader,
            search_paths,
            options,
            catalog: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    pub fn from_config(loader: Arc<dyn ModuleLoader>, config: &EditorConfig) -> Self {
        Self::new(
            loader,
            config.plugins.effective_search_paths(),
            DiscoveryOptions::from_config(config),
        )
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Run discovery now and publish the result.
    pub fn refresh(&self) -> DiscoveryReport {
        let report = discover(self.loader.as_ref(), &self.search_paths, &self.options);
        self.catalog.store(Arc::new(report.catalog.clone()));
        report
    }

    /// Run discovery on a worker thread. The new catalog is published before
    /// the report is sent.
    pub fn spawn_refresh(&self) -> Receiver<DiscoveryReport> {
        let (sender, receiver) = bounded(1);
        let loader = Arc::clone(&self.loader);
        let search_paths = self.search_paths.clone();
        let options = self.options.clone();
        let catalog = Arc::clone(&self.catalog);

        std::thread::spawn(move || {
            let report = discover(loader.as_ref(), &search_paths, &options);
            catalog.store(Arc::new(report.catalog.clone()));
            let _ = sender.send(report);
        });

        receiver
    }

    /// The currently published catalog.
    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog.load_full()
    }

    pub fn list_element_kinds(&self) -> Vec<ElementSummary> {
        self.catalog.load().list_element_kinds()
    }

    pub fn create_element(&self, name: &str) -> Result<AnyElement, PluginLoadError> {
        self.catalog.load().create(name)
    }
}
