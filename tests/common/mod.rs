//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod mock_helpers;

use fyre_pipeline::{ScalarKind, TypeDescriptor};
use std::time::Duration;

/// Timeout for background discovery in tests
pub fn test_timeout() -> Duration {
    Duration::from_secs(5)
}

/// `int[n]`
pub fn int_vec(n: usize) -> TypeDescriptor {
    TypeDescriptor::vector(ScalarKind::Int, n)
}

/// `float[n]`
pub fn float_vec(n: usize) -> TypeDescriptor {
    TypeDescriptor::vector(ScalarKind::Float, n)
}

/// Rank-2 matrix of the given kind
pub fn matrix(kind: ScalarKind, rows: usize, cols: usize) -> TypeDescriptor {
    TypeDescriptor::matrix(kind, vec![rows, cols]).expect("rank-2 shape is never empty")
}
