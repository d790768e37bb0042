//! C-compatible plugin ABI.
//!
//! A plugin module is a dynamic library exporting one function,
//! `fyre_plugin_descriptor`, which returns a pointer to a static
//! [`FyrePluginTable`]. The table lists the module's exports; each export
//! carries a kind tag, a name and a factory function.

use crate::pipeline::element::Element;
use std::ffi::{c_char, c_void, CStr};

/// Current ABI version. Modules built against another version are rejected.
pub const FYRE_ABI_VERSION: u32 = 1;

/// Null-terminated name of the module entry point.
pub const FYRE_PLUGIN_ENTRY_SYMBOL: &[u8] = b"fyre_plugin_descriptor\0";

/// Export kind tag for pipeline elements.
pub const EXPORT_KIND_ELEMENT: u32 = 1;

/// Function creating a new element instance.
///
/// # Safety
///
/// The returned pointer must be null or come from [`element_to_raw`].
pub type CreateElementFn = unsafe extern "C" fn() -> *mut c_void;

/// Type of the module entry point.
pub type PluginEntryPoint = unsafe extern "C" fn() -> *const FyrePluginTable;

/// One entry in a module's export table.
#[repr(C)]
pub struct FyreExport {
    /// Contract tag, see [`ExportKind`].
    pub kind: u32,
    /// Null-terminated export name.
    pub name: *const c_char,
    pub create: CreateElementFn,
}

// SAFETY: FyreExport holds pointers to static data and a function pointer.
unsafe impl Send for FyreExport {}
unsafe impl Sync for FyreExport {}

impl FyreExport {
    /// # Safety
    ///
    /// `name` must be valid and null-terminated.
    pub unsafe fn name_str(&self) -> &str {
        // SAFETY: Caller guarantees `name` is valid and null-terminated.
        unsafe { CStr::from_ptr(self.name).to_str().unwrap_or("unknown") }
    }
}

/// Table returned by `fyre_plugin_descriptor()`.
#[repr(C)]
pub struct FyrePluginTable {
    /// Must equal [`FYRE_ABI_VERSION`].
    pub abi_version: u32,
    /// Null-terminated module name.
    pub name: *const c_char,
    pub num_exports: u32,
    pub exports: *const FyreExport,
}

// SAFETY: FyrePluginTable only points at static data inside the module.
unsafe impl Send for FyrePluginTable {}
unsafe impl Sync for FyrePluginTable {}

impl FyrePluginTable {
    /// # Safety
    ///
    /// `name` must be valid and null-terminated.
    pub unsafe fn name_str(&self) -> &str {
        // SAFETY: Caller guarantees `name` is valid and null-terminated.
        unsafe { CStr::from_ptr(self.name).to_str().unwrap_or("unknown") }
    }

    /// # Safety
    ///
    /// `exports` must point to `num_exports` valid entries.
    pub unsafe fn exports(&self) -> &[FyreExport] {
        if self.exports.is_null() || self.num_exports == 0 {
            &[]
        } else {
            // SAFETY: Caller guarantees `exports` points to a valid array.
            unsafe { std::slice::from_raw_parts(self.exports, self.num_exports as usize) }
        }
    }

    /// Check the table before any of its contents are used.
    ///
    /// # Safety
    ///
    /// All non-null pointer fields must be valid.
    pub unsafe fn validate(&self) -> Result<(), &'static str> {
        if self.name.is_null() {
            return Err("plugin name is null");
        }
        if self.exports.is_null() && self.num_exports != 0 {
            return Err("export table is null");
        }
        // SAFETY: We're in an unsafe fn, caller guarantees validity.
        for export in unsafe { self.exports() } {
            if export.name.is_null() {
                return Err("export name is null");
            }
        }
        Ok(())
    }
}

/// Contract declared by a module export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Implements the pipeline element contract.
    Element,
    /// Anything else; ignored by discovery.
    Other(u32),
}

impl ExportKind {
    pub fn from_raw(tag: u32) -> Self {
        match tag {
            EXPORT_KIND_ELEMENT => ExportKind::Element,
            other => ExportKind::Other(other),
        }
    }
}

/// Convert an element box to a raw pointer for the C ABI.
///
/// Used by plugins to return elements from their create functions.
pub fn element_to_raw(element: Box<dyn Element>) -> *mut c_void {
    // Box the fat pointer so data pointer and vtable survive the thin cast.
    let boxed: Box<Box<dyn Element>> = Box::new(element);
    Box::into_raw(boxed) as *mut c_void
}

/// Convert a raw pointer back to an element box.
///
/// # Safety
///
/// The pointer must have been created by [`element_to_raw`].
pub unsafe fn element_from_raw(ptr: *mut c_void) -> Box<dyn Element> {
    // SAFETY: Caller guarantees ptr was created by element_to_raw.
    let boxed: Box<Box<dyn Element>> = unsafe { Box::from_raw(ptr as *mut Box<dyn Element>) };
    *boxed
}

/// Declare a module's export table and its `fyre_plugin_descriptor` entry
/// point. Use once, at the root of a `cdylib` crate.
///
/// ```ignore
/// use fyre_pipeline::pipeline::PixmapElement;
///
/// fyre_pipeline::fyre_plugin! {
///     name: "basic",
///     elements: [
///         "Pixmap" => || Box::new(PixmapElement::new()),
///     ]
/// }
/// ```
#[macro_export]
macro_rules! fyre_plugin {
    (
        name: $name:literal,
        elements: [
            $( $elem_name:literal => $create:expr ),* $(,)?
        ] $(,)?
    ) => {
        const FYRE_PLUGIN_EXPORTS: &[$crate::plugin::abi::FyreExport] = &[
            $(
                $crate::plugin::abi::FyreExport {
                    kind: $crate::plugin::abi::EXPORT_KIND_ELEMENT,
                    name: concat!($elem_name, "\0").as_ptr() as *const ::std::ffi::c_char,
                    create: {
                        unsafe extern "C" fn create() -> *mut ::std::ffi::c_void {
                            let creator: fn() -> ::std::boxed::Box<dyn $crate::pipeline::Element> =
                                $create;
                            $crate::plugin::abi::element_to_raw(creator())
                        }
                        create
                    },
                },
            )*
        ];

        static FYRE_PLUGIN_TABLE: $crate::plugin::abi::FyrePluginTable =
            $crate::plugin::abi::FyrePluginTable {
                abi_version: $crate::plugin::abi::FYRE_ABI_VERSION,
                name: concat!($name, "\0").as_ptr() as *const ::std::ffi::c_char,
                num_exports: FYRE_PLUGIN_EXPORTS.len() as u32,
                exports: FYRE_PLUGIN_EXPORTS.as_ptr(),
            };

        /// Plugin entry point.
        #[no_mangle]
        pub extern "C" fn fyre_plugin_descriptor() -> *const $crate::plugin::abi::FyrePluginTable {
            &FYRE_PLUGIN_TABLE
        }
    };
}
