//! Plugin modules and the element catalog.
//!
//! ```text
//! search paths ──► discover() ──► ModuleLoader::load() ──► Catalog
//!                                                           │
//!                           PluginRegistry (ArcSwap) ◄──────┘
//! ```
//!
//! Built-in elements are seeded into the catalog next to plugin elements, so
//! the editor palette lists both the same way.

pub mod abi;
pub mod catalog;
pub mod loader;
pub mod registry;

pub use abi::{
    element_from_raw, element_to_raw, ExportKind, FyreExport, FyrePluginTable,
    EXPORT_KIND_ELEMENT, FYRE_ABI_VERSION, FYRE_PLUGIN_ENTRY_SYMBOL,
};
pub use catalog::{Catalog, ElementInfo, ElementSource, ElementSummary, PluginDescriptor};
pub use loader::{
    DylibLoader, ElementFactory, LoadedModule, ModuleExport, ModuleLoader, PluginElement,
    PluginLoadError,
};
pub use registry::{discover, DiscoveryFailure, DiscoveryOptions, DiscoveryReport, PluginRegistry};
