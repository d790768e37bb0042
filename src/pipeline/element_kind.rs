//! Built-in element kinds, for creating elements by name.
//!
//! The plugin catalog seeds itself from this list so built-ins and plugin
//! elements show up side by side in the editor palette.

use crate::pipeline::element::BuiltinElement;
use crate::pipeline::elements::{ConstantElement, MatrixMultiplyElement, PixmapElement};
use serde::{Deserialize, Serialize};

/// Elements shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    // Sources
    /// A value of a configurable type.
    Constant,

    // Arithmetic
    /// Vector × matrix product.
    MatrixMultiply,

    // Renderers
    /// Renders a pixmap image.
    Pixmap,
}

impl ElementKind {
    /// Name shown in the palette; matches the element's own `name()`.
    pub fn display_name(&self) -> &'static str {
        match self {
            ElementKind::Constant => "Constant",
            ElementKind::MatrixMultiply => "Matrix Multiply",
            ElementKind::Pixmap => "Pixmap",
        }
    }

    pub fn all() -> &'static [ElementKind] {
        &[
            ElementKind::Constant,
            ElementKind::MatrixMultiply,
            ElementKind::Pixmap,
        ]
    }

    /// Create a fresh element of this kind.
    pub fn create(&self) -> BuiltinElement {
        match self {
            ElementKind::Constant => BuiltinElement::Constant(ConstantElement::new()),
            ElementKind::MatrixMultiply => {
                BuiltinElement::MatrixMultiply(MatrixMultiplyElement::new())
            }
            ElementKind::Pixmap => BuiltinElement::Pixmap(PixmapElement::new()),
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
