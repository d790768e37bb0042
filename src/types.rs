//! Core type descriptors for Fyre pipelines
//!
//! Every pad carries values of one [`TypeDescriptor`]. Descriptors are
//! immutable, compare structurally, and render to a short textual form
//! that is also accepted by the parser:
//!
//! | Type                  | Text         |
//! |-----------------------|--------------|
//! | integer scalar        | `int`        |
//! | float scalar          | `float`      |
//! | 3-vector of ints      | `int[3]`     |
//! | 3×4 matrix of floats  | `float[3,4]` |
//! | pair of ints          | `pair(int)`  |
//! | color                 | `color`      |
//! | image                 | `image`      |
//!
//! Pad declarations often need a relaxed matcher rather than a single
//! concrete type ("any rank-1 matrix"). That is what [`TypeClass`] is for;
//! it never appears on an edge, it is only evaluated against concrete types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Base numeric kind of a scalar or of a matrix's elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Int,
    Float,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape and element kind of a matrix. The rank is the length of `size`,
/// so a matrix can never disagree with its own rank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatrixType {
    kind: ScalarKind,
    size: Vec<usize>,
}

impl MatrixType {
    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    pub fn rank(&self) -> usize {
        self.size.len()
    }

    pub fn size(&self) -> &[usize] {
        &self.size
    }
}

/// A concrete type flowing along an edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeDescriptor {
    Scalar(ScalarKind),
    Matrix(MatrixType),
    Pair(Box<TypeDescriptor>),
    Color,
    Image,
}

impl TypeDescriptor {
    pub fn int() -> Self {
        TypeDescriptor::Scalar(ScalarKind::Int)
    }

    pub fn float() -> Self {
        TypeDescriptor::Scalar(ScalarKind::Float)
    }

    /// Build a matrix type. Fails when `size` is empty (rank must be at least 1).
    pub fn matrix(kind: ScalarKind, size: impl Into<Vec<usize>>) -> Result<Self, TypeError> {
        let size = size.into();
        if size.is_empty() {
            return Err(TypeError::EmptyShape);
        }
        Ok(TypeDescriptor::Matrix(MatrixType { kind, size }))
    }

    /// Rank-1 matrix of length `len`.
    pub fn vector(kind: ScalarKind, len: usize) -> Self {
        TypeDescriptor::Matrix(MatrixType {
            kind,
            size: vec![len],
        })
    }

    pub fn pair(of: TypeDescriptor) -> Self {
        TypeDescriptor::Pair(Box::new(of))
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self, TypeDescriptor::Matrix(_))
    }

    pub fn as_matrix(&self) -> Result<&MatrixType, TypeError> {
        match self {
            TypeDescriptor::Matrix(m) => Ok(m),
            other => Err(TypeError::NotAMatrix {
                found: other.clone(),
            }),
        }
    }

    pub fn matrix_rank(&self) -> Result<usize, TypeError> {
        self.as_matrix().map(MatrixType::rank)
    }

    /// The scalar type of a matrix's elements.
    pub fn matrix_element_type(&self) -> Result<TypeDescriptor, TypeError> {
        self.as_matrix().map(|m| TypeDescriptor::Scalar(m.kind))
    }

    pub fn matrix_size(&self) -> Result<&[usize], TypeError> {
        self.as_matrix().map(MatrixType::size)
    }

    /// Base numeric kind of a scalar or matrix; `None` for everything else.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            TypeDescriptor::Scalar(kind) => Some(*kind),
            TypeDescriptor::Matrix(m) => Some(m.kind),
            _ => None,
        }
    }

    pub fn is_int(&self) -> bool {
        self.scalar_kind() == Some(ScalarKind::Int)
    }

    pub fn is_float(&self) -> bool {
        self.scalar_kind() == Some(ScalarKind::Float)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Scalar(kind) => write!(f, "{}", kind),
            TypeDescriptor::Matrix(m) => {
                write!(f, "{}[", m.kind)?;
                for (i, dim) in m.size.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", dim)?;
                }
                f.write_str("]")
            }
            TypeDescriptor::Pair(of) => write!(f, "pair({})", of),
            TypeDescriptor::Color => f.write_str("color"),
            TypeDescriptor::Image => f.write_str("image"),
        }
    }
}

/// Deepest `pair(...)` nesting the parser accepts.
pub const MAX_PAIR_DEPTH: usize = 16;

impl FromStr for TypeDescriptor {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = |reason: &str| TypeError::Parse {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        // Peel pair wrappers iteratively, then rebuild from the inside out.
        let mut text = s.trim();
        let mut depth = 0;
        while let Some(inner) = text.strip_prefix("pair(") {
            depth += 1;
            if depth > MAX_PAIR_DEPTH {
                return Err(parse_err("pair nesting too deep"));
            }
            text = inner
                .strip_suffix(')')
                .ok_or_else(|| parse_err("unterminated pair"))?
                .trim();
        }

        let mut ty = parse_leaf(text).map_err(|reason| parse_err(reason))?;
        for _ in 0..depth {
            ty = TypeDescriptor::pair(ty);
        }
        Ok(ty)
    }
}

/// Parse a type with no `pair(...)` wrapper.
fn parse_leaf(text: &str) -> Result<TypeDescriptor, &'static str> {
    match text {
        "color" => return Ok(TypeDescriptor::Color),
        "image" => return Ok(TypeDescriptor::Image),
        _ => {}
    }

    let (base, dims) = match text.find('[') {
        Some(open) => {
            let dims = text[open + 1..]
                .strip_suffix(']')
                .ok_or("unterminated dimension list")?;
            (text[..open].trim_end(), Some(dims))
        }
        None => (text, None),
    };

    let kind = match base {
        "int" => ScalarKind::Int,
        "float" => ScalarKind::Float,
        _ => return Err("unknown type name"),
    };

    match dims {
        None => Ok(TypeDescriptor::Scalar(kind)),
        Some(dims) => {
            let size = dims
                .split(',')
                .map(|d| d.trim().parse::<usize>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| "dimensions must be unsigned integers")?;
            TypeDescriptor::matrix(kind, size).map_err(|_| "a matrix needs at least one dimension")
        }
    }
}

impl TryFrom<String> for TypeDescriptor {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeDescriptor> for String {
    fn from(value: TypeDescriptor) -> Self {
        value.to_string()
    }
}

/// Relaxed matcher used by pad declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeClass {
    /// Accepts every concrete type.
    Any,
    /// Int or float scalar.
    Numeric,
    /// Any matrix, optionally restricted by rank and element kind.
    Matrix {
        rank: Option<usize>,
        kind: Option<ScalarKind>,
    },
}

impl TypeClass {
    pub fn matrix_of_rank(rank: usize) -> Self {
        TypeClass::Matrix {
            rank: Some(rank),
            kind: None,
        }
    }

    pub fn matches(&self, ty: &TypeDescriptor) -> bool {
        match self {
            TypeClass::Any => true,
            TypeClass::Numeric => matches!(ty, TypeDescriptor::Scalar(_)),
            TypeClass::Matrix { rank, kind } => match ty {
                TypeDescriptor::Matrix(m) => {
                    rank.map_or(true, |r| m.rank() == r) && kind.map_or(true, |k| m.kind == k)
                }
                _ => false,
            },
        }
    }
}

impl fmt::Display for TypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeClass::Any => f.write_str("any"),
            TypeClass::Numeric => f.write_str("int|float"),
            TypeClass::Matrix { rank, kind } => {
                match kind {
                    Some(kind) => write!(f, "{} matrix", kind)?,
                    None => f.write_str("int|float matrix")?,
                }
                if let Some(rank) = rank {
                    write!(f, " of rank {}", rank)?;
                }
                Ok(())
            }
        }
    }
}

/// Rejection produced while checking types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("expected {expected} input types, got {found}")]
    Arity { expected: usize, found: usize },

    #[error("expected a matrix, found {found}")]
    NotAMatrix { found: TypeDescriptor },

    #[error("matrix types need at least one dimension")]
    EmptyShape,

    #[error("pad {pad} expects a matrix of rank {expected}, found {found}")]
    RankMismatch {
        pad: usize,
        expected: usize,
        found: TypeDescriptor,
    },

    #[error("element kinds differ: {left} vs {right}")]
    KindMismatch { left: ScalarKind, right: ScalarKind },

    #[error("dimension mismatch: {left} != {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("pad {pad} expects {expected}, found {found}")]
    Constraint {
        pad: usize,
        expected: String,
        found: TypeDescriptor,
    },

    #[error("cannot parse type '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("{0}")]
    Rejected(String),
}
