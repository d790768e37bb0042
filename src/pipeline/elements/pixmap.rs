//! PixmapElement: simple pixmap renderer.
//!
//! Every pad is concrete, so the default pad-driven check is all it needs.

use crate::pipeline::element::Element;
use crate::pipeline::pad::PadDeclaration;
use crate::types::{ScalarKind, TypeDescriptor};

pub struct PixmapElement {
    inputs: Vec<PadDeclaration>,
    outputs: Vec<PadDeclaration>,
}

impl PixmapElement {
    pub fn new() -> Self {
        Self {
            inputs: vec![
                PadDeclaration::input("w", "width", TypeDescriptor::int()),
                PadDeclaration::input("h", "height", TypeDescriptor::int()),
                PadDeclaration::input(
                    "v",
                    "point",
                    TypeDescriptor::pair(TypeDescriptor::Scalar(ScalarKind::Int)),
                ),
                PadDeclaration::input("c", "color", TypeDescriptor::Color),
            ],
            outputs: vec![PadDeclaration::output("M", "image", TypeDescriptor::Image)],
        }
    }
}

impl Element for PixmapElement {
    fn name(&self) -> &str {
        "Pixmap"
    }

    fn category(&self) -> &str {
        "Renderers"
    }

    fn description(&self) -> &str {
        "Simple pixmap image"
    }

    fn input_pads(&self) -> &[PadDeclaration] {
        &self.inputs
    }

    fn output_pads(&self) -> &[PadDeclaration] {
        &self.outputs
    }
}

impl Default for PixmapElement {
    fn default() -> Self {
        Self::new()
    }
}
