//! MatrixMultiplyElement: vector × matrix.
//!
//! Right-multiplication convention `v·M`: the vector's length has to match
//! the matrix's second dimension. The output type is the input vector type,
//! unchanged.

use crate::pipeline::element::{ensure_arity, Element};
use crate::pipeline::pad::PadDeclaration;
use crate::types::{TypeClass, TypeDescriptor, TypeError};

/// Multiplies a vector and a matrix.
pub struct MatrixMultiplyElement {
    inputs: Vec<PadDeclaration>,
    outputs: Vec<PadDeclaration>,
}

impl MatrixMultiplyElement {
    pub fn new() -> Self {
        Self {
            inputs: vec![
                PadDeclaration::input("v0", "vector", TypeClass::matrix_of_rank(1)),
                PadDeclaration::input("M", "matrix", TypeClass::matrix_of_rank(2)),
            ],
            outputs: vec![PadDeclaration::output(
                "v1",
                "new vector",
                TypeClass::matrix_of_rank(1),
            )],
        }
    }
}

/// Rank of input `pad`, failing unless it is a matrix of exactly `expected` rank.
fn expect_rank(pad: usize, ty: &TypeDescriptor, expected: usize) -> Result<(), TypeError> {
    match ty.matrix_rank() {
        Ok(rank) if rank == expected => Ok(()),
        _ => Err(TypeError::RankMismatch {
            pad,
            expected,
            found: ty.clone(),
        }),
    }
}

impl Element for MatrixMultiplyElement {
    fn name(&self) -> &str {
        "Matrix Multiply"
    }

    fn category(&self) -> &str {
        "Arithmetic"
    }

    fn description(&self) -> &str {
        "Multiplies a vector\nand a matrix"
    }

    fn input_pads(&self) -> &[PadDeclaration] {
        &self.inputs
    }

    fn output_pads(&self) -> &[PadDeclaration] {
        &self.outputs
    }

    fn input_descriptions(&self) -> Vec<(String, String)> {
        vec![
            ("<i>v<sub>0</sub></i>".to_string(), "vector".to_string()),
            ("<b>M</b>".to_string(), "matrix".to_string()),
        ]
    }

    fn output_descriptions(&self) -> Vec<(String, String)> {
        vec![("<i>v<sub>1</sub></i>".to_string(), "new vector".to_string())]
    }

    fn check(&self, inputs: &[TypeDescriptor]) -> Result<Vec<TypeDescriptor>, TypeError> {
        ensure_arity(2, inputs)?;
        let (vector, matrix) = (&inputs[0], &inputs[1]);

        expect_rank(0, vector, 1)?;
        expect_rank(1, matrix, 2)?;
        let vector = vector.as_matrix()?;
        let matrix = matrix.as_matrix()?;

        // No int/float coercion.
        if vector.kind() != matrix.kind() {
            return Err(TypeError::KindMismatch {
                left: vector.kind(),
                right: matrix.kind(),
            });
        }

        let (len, inner) = (vector.size()[0], matrix.size()[1]);
        if len != inner {
            return Err(TypeError::DimensionMismatch {
                left: len,
                right: inner,
            });
        }

        Ok(vec![inputs[0].clone()])
    }
}

impl Default for MatrixMultiplyElement {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScalarKind;

    fn mat(kind: ScalarKind, rows: usize, cols: usize) -> TypeDescriptor {
        TypeDescriptor::matrix(kind, vec![rows, cols]).unwrap()
    }

    #[test]
    fn test_int_vector_times_int_matrix() {
        let e = MatrixMultiplyElement::new();
        let v = TypeDescriptor::vector(ScalarKind::Int, 3);
        assert_eq!(
            e.check(&[v.clone(), mat(ScalarKind::Int, 3, 3)]),
            Ok(vec![v])
        );
    }

    #[test]
    fn test_inner_dimension_is_second_matrix_dimension() {
        let e = MatrixMultiplyElement::new();
        let v = TypeDescriptor::vector(ScalarKind::Int, 3);
        // 4 rows, 3 columns: size(M)[1] == 3 matches.
        assert!(e.check(&[v.clone(), mat(ScalarKind::Int, 4, 3)]).is_ok());
        assert_eq!(
            e.check(&[v, mat(ScalarKind::Int, 3, 4)]),
            Err(TypeError::DimensionMismatch { left: 3, right: 4 })
        );
    }

    #[test]
    fn test_mixed_kinds_rejected() {
        let e = MatrixMultiplyElement::new();
        let result = e.check(&[
            TypeDescriptor::vector(ScalarKind::Int, 3),
            mat(ScalarKind::Float, 3, 3),
        ]);
        assert_eq!(
            result,
            Err(TypeError::KindMismatch {
                left: ScalarKind::Int,
                right: ScalarKind::Float
            })
        );
    }

    #[test]
    fn test_second_input_rank_is_checked() {
        let e = MatrixMultiplyElement::new();
        let v = TypeDescriptor::vector(ScalarKind::Int, 3);
        let result = e.check(&[v.clone(), v]);
        assert!(matches!(
            result,
            Err(TypeError::RankMismatch { pad: 1, expected: 2, .. })
        ));
    }

    #[test]
    fn test_first_input_must_be_vector() {
        let e = MatrixMultiplyElement::new();
        let result = e.check(&[TypeDescriptor::int(), mat(ScalarKind::Int, 1, 1)]);
        assert!(matches!(
            result,
            Err(TypeError::RankMismatch { pad: 0, expected: 1, .. })
        ));
    }

    #[test]
    fn test_arity() {
        let e = MatrixMultiplyElement::new();
        assert!(matches!(
            e.check(&[TypeDescriptor::vector(ScalarKind::Int, 1)]),
            Err(TypeError::Arity { expected: 2, found: 1 })
        ));
    }
}
