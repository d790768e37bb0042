//! Loading plugin modules.
//!
//! [`ModuleLoader`] is the seam between discovery and the operating system:
//! [`DylibLoader`] opens real dynamic libraries with libloading, tests swap in
//! a mock.

use super::abi::{
    element_from_raw, ExportKind, FyrePluginTable, PluginEntryPoint, FYRE_ABI_VERSION,
    FYRE_PLUGIN_ENTRY_SYMBOL,
};
use crate::pipeline::element::{ConfigValue, Element};
use crate::pipeline::pad::PadDeclaration;
use crate::types::{TypeDescriptor, TypeError};
use libloading::{Library, Symbol};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while loading a module or instantiating its elements.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PluginLoadError {
    #[error("failed to load library: {0}")]
    LoadFailed(String),

    #[error("missing plugin entry point: fyre_plugin_descriptor")]
    MissingEntryPoint,

    #[error("plugin returned null descriptor")]
    NullDescriptor,

    #[error("ABI version mismatch: expected {expected}, got {actual}")]
    AbiMismatch { expected: u32, actual: u32 },

    #[error("invalid plugin descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("failed to create element '{0}'")]
    CreateFailed(String),

    #[error("element '{name}' is already provided by {existing}")]
    DuplicateElement { name: String, existing: String },

    #[error("element '{0}' not found in catalog")]
    UnknownElement(String),
}

/// Creates a fresh element instance, or `None` if the module failed to.
pub type ElementFactory = Arc<dyn Fn() -> Option<Box<dyn Element>> + Send + Sync>;

/// One export of a loaded module.
#[derive(Clone)]
pub struct ModuleExport {
    pub kind: ExportKind,
    pub name: String,
    pub factory: ElementFactory,
}

impl std::fmt::Debug for ModuleExport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleExport")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish()
    }
}

/// A module whose export table has been read.
#[derive(Debug, Clone)]
pub struct LoadedModule {
    pub name: String,
    pub exports: Vec<ModuleExport>,
}

/// Opens a module file and enumerates its exports.
#[cfg_attr(test, mockall::automock)]
pub trait ModuleLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<LoadedModule, PluginLoadError>;
}

/// Loads modules as dynamic libraries.
///
/// Loading a module runs code from it; only trusted directories should be on
/// the search path.
#[derive(Debug, Default, Clone, Copy)]
pub struct DylibLoader;

impl ModuleLoader for DylibLoader {
    fn load(&self, path: &Path) -> Result<LoadedModule, PluginLoadError> {
        // SAFETY: Loading a dynamic library. Search paths are trusted.
        let library = unsafe { Library::new(path) }
            .map_err(|e| PluginLoadError::LoadFailed(e.to_string()))?;
        let library = Arc::new(library);

        // SAFETY: Library was just loaded successfully; the symbol has the
        // entry point signature by ABI contract.
        let table = unsafe {
            let entry: Symbol<PluginEntryPoint> = library
                .get(FYRE_PLUGIN_ENTRY_SYMBOL)
                .map_err(|_| PluginLoadError::MissingEntryPoint)?;
            entry()
        };
        // SAFETY: The table lives as long as the library, which every factory
        // below keeps alive.
        let table = unsafe { validated_table(table) }?;

        // SAFETY: Table was validated above.
        let name = unsafe { table.name_str() }.to_string();
        let exports: Vec<ModuleExport> = unsafe { table.exports() }
            .iter()
            .map(|export| {
                let create = export.create;
                let library = Arc::clone(&library);
                let factory: ElementFactory = Arc::new(move || {
                    // SAFETY: `create` belongs to a loaded, validated module.
                    let ptr = unsafe { create() };
                    if ptr.is_null() {
                        return None;
                    }
                    // SAFETY: By ABI contract the pointer comes from element_to_raw.
                    let element = unsafe { element_from_raw(ptr) };
                    Some(Box::new(PluginElement::new(element, Arc::clone(&library))) as Box<dyn Element>)
                });
                ModuleExport {
                    kind: ExportKind::from_raw(export.kind),
                    // SAFETY: Export names were checked by validate().
                    name: unsafe { export.name_str() }.to_string(),
                    factory,
                }
            })
            .collect();

        tracing::debug!(
            "Loaded module '{}' from {} ({} exports)",
            name,
            path.display(),
            exports.len()
        );

        Ok(LoadedModule { name, exports })
    }
}

/// Check a table returned by a module entry point before anything reads it.
///
/// # Safety
///
/// `table` must be null or point to a table whose non-null pointer fields are
/// valid for `'a`.
unsafe fn validated_table<'a>(
    table: *const FyrePluginTable,
) -> Result<&'a FyrePluginTable, PluginLoadError> {
    if table.is_null() {
        return Err(PluginLoadError::NullDescriptor);
    }

    // SAFETY: Non-null, and the caller guarantees it is valid.
    let table = unsafe { &*table };
    if table.abi_version != FYRE_ABI_VERSION {
        return Err(PluginLoadError::AbiMismatch {
            expected: FYRE_ABI_VERSION,
            actual: table.abi_version,
        });
    }

    // SAFETY: Caller guarantees the pointer fields are valid.
    unsafe { table.validate() }
        .map_err(|e| PluginLoadError::InvalidDescriptor(e.to_string()))?;
    Ok(table)
}

/// An element created by a module. Keeps the module loaded while alive.
pub struct PluginElement {
    // Dropped before the library: fields drop in declaration order.
    inner: Box<dyn Element>,
    _library: Arc<Library>,
}

impl PluginElement {
    fn new(inner: Box<dyn Element>, library: Arc<Library>) -> Self {
        Self {
            inner,
            _library: library,
        }
    }
}

impl Element for PluginElement {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn category(&self) -> &str {
        self.inner.category()
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    fn input_pads(&self) -> &[PadDeclaration] {
        self.inner.input_pads()
    }

    fn output_pads(&self) -> &[PadDeclaration] {
        self.inner.output_pads()
    }

    fn check(&self, inputs: &[TypeDescriptor]) -> Result<Vec<TypeDescriptor>, TypeError> {
        self.inner.check(inputs)
    }

    fn configure(&mut self, key: &str, value: &ConfigValue) -> bool {
        self.inner.configure(key, value)
    }

    fn input_descriptions(&self) -> Vec<(String, String)> {
        self.inner.input_descriptions()
    }

    fn output_descriptions(&self) -> Vec<(String, String)> {
        self.inner.output_descriptions()
    }
}
