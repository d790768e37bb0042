//! Built-in pipeline element implementations.

pub mod constant;
pub mod matrix_multiply;
pub mod pixmap;

pub use constant::ConstantElement;
pub use matrix_multiply::MatrixMultiplyElement;
pub use pixmap::PixmapElement;
