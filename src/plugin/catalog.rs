//! The element catalog: every element kind the editor can instantiate.

use super::loader::{ElementFactory, ModuleExport, PluginLoadError};
use crate::pipeline::element::{AnyElement, Element};
use crate::pipeline::element_kind::ElementKind;
use crate::pipeline::pad::PadDeclaration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where an element kind comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementSource {
    Builtin,
    Module { path: PathBuf, plugin: String },
}

impl fmt::Display for ElementSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementSource::Builtin => write!(f, "built-in"),
            ElementSource::Module { path, plugin } => {
                write!(f, "plugin '{}' ({})", plugin, path.display())
            }
        }
    }
}

/// Static description of an element kind, read once from a prototype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementInfo {
    pub name: String,
    pub category: String,
    pub description: String,
    pub inputs: Vec<PadDeclaration>,
    pub outputs: Vec<PadDeclaration>,
}

impl ElementInfo {
    pub fn of(element: &dyn Element) -> Self {
        Self {
            name: element.name().to_string(),
            category: element.category().to_string(),
            description: element.description().to_string(),
            inputs: element.input_pads().to_vec(),
            outputs: element.output_pads().to_vec(),
        }
    }
}

/// Palette row for an element kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSummary {
    pub name: String,
    pub category: String,
    pub description: String,
}

#[derive(Clone)]
enum Factory {
    Builtin(ElementKind),
    Module(ElementFactory),
}

/// Catalog entry for one element kind.
#[derive(Clone)]
pub struct PluginDescriptor {
    pub info: ElementInfo,
    pub source: ElementSource,
    factory: Factory,
}

impl PluginDescriptor {
    pub fn builtin(kind: ElementKind) -> Self {
        Self {
            info: ElementInfo::of(&kind.create()),
            source: ElementSource::Builtin,
            factory: Factory::Builtin(kind),
        }
    }

    /// Build an entry from a module export by instantiating a prototype.
    pub fn from_export(
        export: ModuleExport,
        path: &Path,
        plugin: &str,
    ) -> Result<Self, PluginLoadError> {
        let prototype =
            (export.factory)().ok_or_else(|| PluginLoadError::CreateFailed(export.name.clone()))?;
        Ok(Self {
            info: ElementInfo::of(prototype.as_ref()),
            source: ElementSource::Module {
                path: path.to_path_buf(),
                plugin: plugin.to_string(),
            },
            factory: Factory::Module(export.factory),
        })
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.source, ElementSource::Builtin)
    }

    /// Instantiate a new element of this kind.
    pub fn create(&self) -> Result<AnyElement, PluginLoadError> {
        match &self.factory {
            Factory::Builtin(kind) => Ok(AnyElement::Builtin(kind.create())),
            Factory::Module(factory) => factory()
                .map(AnyElement::Plugin)
                .ok_or_else(|| PluginLoadError::CreateFailed(self.info.name.clone())),
        }
    }

    pub fn summary(&self) -> ElementSummary {
        ElementSummary {
            name: self.info.name.clone(),
            category: self.info.category.clone(),
            description: self.info.description.clone(),
        }
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("name", &self.info.name)
            .field("source", &self.source)
            .finish()
    }
}

/// Element kinds by name, in registration order.
#[derive(Clone, Default)]
pub struct Catalog {
    entries: Vec<Arc<PluginDescriptor>>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding the built-in element kinds.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        for &kind in ElementKind::all() {
            // Built-in names are distinct.
            let _ = catalog.insert(PluginDescriptor::builtin(kind));
        }
        catalog
    }

    /// Register an element kind. The first registration of a name wins.
    pub fn insert(&mut self, descriptor: PluginDescriptor) -> Result<(), PluginLoadError> {
        if let Some(&existing) = self.index.get(descriptor.name()) {
            return Err(PluginLoadError::DuplicateElement {
                name: descriptor.name().to_string(),
                existing: self.entries[existing].source.to_string(),
            });
        }
        self.index
            .insert(descriptor.name().to_string(), self.entries.len());
        self.entries.push(Arc::new(descriptor));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PluginDescriptor> {
        self.index.get(name).map(|&i| self.entries[i].as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PluginDescriptor> + '_ {
        self.entries.iter().map(Arc::as_ref)
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(PluginDescriptor::name).collect()
    }

    pub fn list_element_kinds(&self) -> Vec<ElementSummary> {
        self.iter().map(PluginDescriptor::summary).collect()
    }

    /// Instantiate an element by catalog name.
    pub fn create(&self, name: &str) -> Result<AnyElement, PluginLoadError> {
        self.get(name)
            .ok_or_else(|| PluginLoadError::UnknownElement(name.to_string()))?
            .create()
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
