//! Fake plugin modules
//!
//! `FakeLoader` reads plain-text "modules" written by `write_module`. The
//! first line must be `MODULE_MAGIC`; each following line declares one export,
//! `element:<Name>` or `other:<Name>`. Anything else fails to load, like a
//! corrupt library would.

use fyre_pipeline::pipeline::{ensure_arity, Element, PadDeclaration};
use fyre_pipeline::plugin::{ExportKind, LoadedModule, ModuleExport, ModuleLoader, PluginLoadError};
use fyre_pipeline::{TypeDescriptor, TypeError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const MODULE_MAGIC: &str = "FYRE-FAKE-MODULE";

/// Extension used for fake module files
pub const MODULE_EXTENSION: &str = "fmod";

/// A source element with a caller-chosen name and an `int` output.
pub struct NamedSource {
    name: String,
    outputs: Vec<PadDeclaration>,
}

impl NamedSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            outputs: vec![PadDeclaration::output("o", "value", TypeDescriptor::int())],
        }
    }
}

impl Element for NamedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        "Test"
    }

    fn description(&self) -> &str {
        "Emits an int"
    }

    fn input_pads(&self) -> &[PadDeclaration] {
        &[]
    }

    fn output_pads(&self) -> &[PadDeclaration] {
        &self.outputs
    }

    fn check(&self, inputs: &[TypeDescriptor]) -> Result<Vec<TypeDescriptor>, TypeError> {
        ensure_arity(0, inputs)?;
        Ok(vec![TypeDescriptor::int()])
    }
}

/// Loads fake module files.
pub struct FakeLoader;

impl ModuleLoader for FakeLoader {
    fn load(&self, path: &Path) -> Result<LoadedModule, PluginLoadError> {
        let content =
            fs::read_to_string(path).map_err(|e| PluginLoadError::LoadFailed(e.to_string()))?;
        let mut lines = content.lines();
        if lines.next() != Some(MODULE_MAGIC) {
            return Err(PluginLoadError::LoadFailed(format!(
                "{} is not a module",
                path.display()
            )));
        }

        let exports = lines
            .filter(|line| !line.trim().is_empty())
            .map(parse_export)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LoadedModule {
            name: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            exports,
        })
    }
}

fn parse_export(line: &str) -> Result<ModuleExport, PluginLoadError> {
    let (kind, name) = line.split_once(':').ok_or_else(|| {
        PluginLoadError::InvalidDescriptor(format!("bad export line '{}'", line))
    })?;
    let kind = match kind {
        "element" => ExportKind::Element,
        "other" => ExportKind::Other(2),
        other => {
            return Err(PluginLoadError::InvalidDescriptor(format!(
                "unknown export kind '{}'",
                other
            )))
        }
    };
    let element_name = name.to_string();
    Ok(ModuleExport {
        kind,
        name: name.to_string(),
        factory: Arc::new(move || {
            Some(Box::new(NamedSource::new(&element_name)) as Box<dyn Element>)
        }),
    })
}

/// Write a fake module declaring `exports` (e.g. `"element:Foo"`).
pub fn write_module(dir: &Path, file_stem: &str, exports: &[&str]) -> PathBuf {
    let path = dir.join(format!("{}.{}", file_stem, MODULE_EXTENSION));
    let mut content = String::from(MODULE_MAGIC);
    for export in exports {
        content.push('\n');
        content.push_str(export);
    }
    fs::write(&path, content).unwrap();
    path
}

/// Write a module file that fails to load.
pub fn write_corrupt_module(dir: &Path, file_stem: &str) -> PathBuf {
    let path = dir.join(format!("{}.{}", file_stem, MODULE_EXTENSION));
    fs::write(&path, b"\x7fELF\0garbage").unwrap();
    path
}
