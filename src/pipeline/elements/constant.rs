//! ConstantElement: a source with one configurable output type.
//!
//! Has no inputs. Until a type is configured its check fails: the node is
//! Invalid and every edge leaving it is marked Invalid.

use crate::pipeline::element::{ensure_arity, ConfigValue, Element};
use crate::pipeline::pad::PadDeclaration;
use crate::types::{TypeClass, TypeDescriptor, TypeError};

/// Source element emitting a value of the configured type.
pub struct ConstantElement {
    output_type: Option<TypeDescriptor>,
    outputs: Vec<PadDeclaration>,
}

impl ConstantElement {
    pub fn new() -> Self {
        Self {
            output_type: None,
            outputs: vec![PadDeclaration::output("k", "value", TypeClass::Any)],
        }
    }

    pub fn with_type(ty: TypeDescriptor) -> Self {
        let mut element = Self::new();
        element.output_type = Some(ty);
        element
    }

    pub fn output_type(&self) -> Option<&TypeDescriptor> {
        self.output_type.as_ref()
    }
}

impl Element for ConstantElement {
    fn name(&self) -> &str {
        "Constant"
    }

    fn category(&self) -> &str {
        "Sources"
    }

    fn description(&self) -> &str {
        "Emits a value\nof a configured type"
    }

    fn input_pads(&self) -> &[PadDeclaration] {
        &[]
    }

    fn output_pads(&self) -> &[PadDeclaration] {
        &self.outputs
    }

    fn check(&self, inputs: &[TypeDescriptor]) -> Result<Vec<TypeDescriptor>, TypeError> {
        ensure_arity(0, inputs)?;
        self.output_type
            .clone()
            .map(|ty| vec![ty])
            .ok_or_else(|| TypeError::Rejected("constant has no type configured".to_string()))
    }

    fn configure(&mut self, key: &str, value: &ConfigValue) -> bool {
        match key {
            "type" => match value.as_type() {
                Some(Ok(ty)) => {
                    let changed = self.output_type.as_ref() != Some(&ty);
                    self.output_type = Some(ty);
                    changed
                }
                Some(Err(e)) => {
                    tracing::warn!("Ignoring constant type '{:?}': {}", value, e);
                    false
                }
                None => false,
            },
            "clear" => self.output_type.take().is_some(),
            _ => false,
        }
    }
}

impl Default for ConstantElement {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScalarKind;

    #[test]
    fn test_unconfigured_constant_rejects() {
        let e = ConstantElement::new();
        assert!(matches!(e.check(&[]), Err(TypeError::Rejected(_))));
    }

    #[test]
    fn test_configure_type() {
        let mut e = ConstantElement::new();
        assert!(e.configure("type", &ConfigValue::String("float[3]".to_string())));
        assert_eq!(
            e.check(&[]),
            Ok(vec![TypeDescriptor::vector(ScalarKind::Float, 3)])
        );
        // Same type again is not a change.
        assert!(!e.configure("type", &ConfigValue::Type(TypeDescriptor::vector(ScalarKind::Float, 3))));
    }

    #[test]
    fn test_bad_type_text_is_ignored() {
        let mut e = ConstantElement::with_type(TypeDescriptor::int());
        assert!(!e.configure("type", &ConfigValue::String("tensor".to_string())));
        assert_eq!(e.output_type(), Some(&TypeDescriptor::int()));
    }

    #[test]
    fn test_clear() {
        let mut e = ConstantElement::with_type(TypeDescriptor::Color);
        assert!(e.configure("clear", &ConfigValue::Bool(true)));
        assert!(e.output_type().is_none());
    }
}
