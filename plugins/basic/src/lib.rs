//! Basic Fyre elements as a plugin module.
//!
//! Exports `Matrix Multiply` and `Pixmap` through the plugin ABI, so hosts
//! that do not seed built-ins can still discover them from a plugin
//! directory.

use fyre_pipeline::pipeline::{MatrixMultiplyElement, PixmapElement};

fyre_pipeline::fyre_plugin! {
    name: "basic",
    elements: [
        "Matrix Multiply" => || Box::new(MatrixMultiplyElement::new()),
        "Pixmap" => || Box::new(PixmapElement::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use fyre_pipeline::plugin::{element_from_raw, ExportKind, FYRE_ABI_VERSION};
    use fyre_pipeline::Element;

    #[test]
    fn test_plugin_descriptor_is_valid() {
        let table = fyre_plugin_descriptor();
        assert!(!table.is_null());

        // SAFETY: The pointer refers to this crate's static table.
        unsafe {
            let table = &*table;
            assert_eq!(table.abi_version, FYRE_ABI_VERSION);
            assert_eq!(table.validate(), Ok(()));
            assert_eq!(table.name_str(), "basic");

            let names: Vec<&str> = table.exports().iter().map(|e| e.name_str()).collect();
            assert_eq!(names, vec!["Matrix Multiply", "Pixmap"]);
            assert!(table
                .exports()
                .iter()
                .all(|e| ExportKind::from_raw(e.kind) == ExportKind::Element));
        }
    }

    #[test]
    fn test_exports_create_their_elements() {
        // SAFETY: As above; create functions return element_to_raw pointers.
        unsafe {
            for export in (*fyre_plugin_descriptor()).exports() {
                let element = element_from_raw((export.create)());
                assert_eq!(element.name(), export.name_str());
            }
        }
    }
}
