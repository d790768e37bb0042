//! Pad declarations for elements.
//!
//! Each element declares its input and output pads at construction. The
//! graph uses the declared constraints for a first, per-edge compatibility
//! test before the element's own `check` sees the full set of input types.

use crate::types::{TypeClass, TypeDescriptor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a pad is an input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadDirection {
    Input,
    Output,
}

/// What a pad will accept (inputs) or promise (outputs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadConstraint {
    /// Exactly this type.
    Concrete(TypeDescriptor),
    /// Any type matching the class.
    Class(TypeClass),
}

impl PadConstraint {
    pub fn accepts(&self, ty: &TypeDescriptor) -> bool {
        match self {
            PadConstraint::Concrete(expected) => expected == ty,
            PadConstraint::Class(class) => class.matches(ty),
        }
    }

    /// The single concrete type, if the constraint pins one down.
    pub fn concrete(&self) -> Option<&TypeDescriptor> {
        match self {
            PadConstraint::Concrete(ty) => Some(ty),
            PadConstraint::Class(_) => None,
        }
    }
}

impl fmt::Display for PadConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PadConstraint::Concrete(ty) => write!(f, "{}", ty),
            PadConstraint::Class(class) => write!(f, "{}", class),
        }
    }
}

impl From<TypeDescriptor> for PadConstraint {
    fn from(ty: TypeDescriptor) -> Self {
        PadConstraint::Concrete(ty)
    }
}

impl From<TypeClass> for PadConstraint {
    fn from(class: TypeClass) -> Self {
        PadConstraint::Class(class)
    }
}

/// Declaration of one input or output slot on an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadDeclaration {
    /// Short symbol shown on the canvas, e.g. `M`.
    pub name: String,
    /// Human label, e.g. `matrix`.
    pub label: String,
    pub direction: PadDirection,
    pub constraint: PadConstraint,
}

impl PadDeclaration {
    pub fn input(
        name: impl Into<String>,
        label: impl Into<String>,
        constraint: impl Into<PadConstraint>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            direction: PadDirection::Input,
            constraint: constraint.into(),
        }
    }

    pub fn output(
        name: impl Into<String>,
        label: impl Into<String>,
        constraint: impl Into<PadConstraint>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            direction: PadDirection::Output,
            constraint: constraint.into(),
        }
    }

    /// `(name, "label: constraint")` row used for pad tooltips.
    pub fn describe(&self) -> (String, String) {
        (
            self.name.clone(),
            format!("{}: {}", self.label, self.constraint),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScalarKind;

    #[test]
    fn test_concrete_constraint() {
        let pad = PadDeclaration::input("w", "width", TypeDescriptor::int());
        assert!(pad.constraint.accepts(&TypeDescriptor::int()));
        assert!(!pad.constraint.accepts(&TypeDescriptor::float()));
        assert_eq!(pad.constraint.concrete(), Some(&TypeDescriptor::int()));
    }

    #[test]
    fn test_class_constraint() {
        let pad = PadDeclaration::input("M", "matrix", TypeClass::matrix_of_rank(2));
        let m = TypeDescriptor::matrix(ScalarKind::Float, vec![2, 2]).unwrap();
        assert!(pad.constraint.accepts(&m));
        assert!(!pad.constraint.accepts(&TypeDescriptor::vector(ScalarKind::Float, 2)));
        assert!(pad.constraint.concrete().is_none());
    }

    #[test]
    fn test_describe() {
        let pad = PadDeclaration::output("M", "image", TypeDescriptor::Image);
        assert_eq!(pad.describe(), ("M".to_string(), "image: image".to_string()));
    }
}
