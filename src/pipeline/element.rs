//! Element abstraction for the pipeline.
//!
//! Two-layer design:
//! - **`Element` trait**: the capability contract every element implements,
//!   including elements loaded from plugin modules.
//! - **`BuiltinElement` enum**: the elements shipped with the crate. Match
//!   arms replace dynamic dispatch for them.
//!
//! `AnyElement` wraps either variant so the graph can handle both uniformly
//! and never has to know a concrete element type.

use crate::pipeline::elements::{ConstantElement, MatrixMultiplyElement, PixmapElement};
use crate::pipeline::pad::PadDeclaration;
use crate::types::{TypeDescriptor, TypeError};
use serde::{Deserialize, Serialize};

/// A setting applied to an element through `Element::configure`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Type(TypeDescriptor),
}

impl ConfigValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// A type value, either given directly or in its textual form.
    pub fn as_type(&self) -> Option<Result<TypeDescriptor, TypeError>> {
        match self {
            ConfigValue::Type(ty) => Some(Ok(ty.clone())),
            ConfigValue::String(text) => Some(text.parse()),
            _ => None,
        }
    }
}

/// Contract implemented by every pipeline element.
pub trait Element: Send {
    /// Human-readable name, also the catalog key.
    fn name(&self) -> &str;

    /// Palette category, e.g. `Arithmetic`.
    fn category(&self) -> &str;

    fn description(&self) -> &str;

    fn input_pads(&self) -> &[PadDeclaration];

    fn output_pads(&self) -> &[PadDeclaration];

    /// Derive output types from one concrete type per input pad.
    ///
    /// Must be a pure function of the declared pads and `inputs`. The default
    /// validates each input against its pad constraint and returns the
    /// output pads' concrete types.
    fn check(&self, inputs: &[TypeDescriptor]) -> Result<Vec<TypeDescriptor>, TypeError> {
        check_declared(self.input_pads(), self.output_pads(), inputs)
    }

    /// Apply a setting. Returns true when output types may have changed.
    fn configure(&mut self, _key: &str, _value: &ConfigValue) -> bool {
        false
    }

    /// `(name, description)` rows for input pad tooltips.
    fn input_descriptions(&self) -> Vec<(String, String)> {
        self.input_pads().iter().map(PadDeclaration::describe).collect()
    }

    /// `(name, description)` rows for output pad tooltips.
    fn output_descriptions(&self) -> Vec<(String, String)> {
        self.output_pads().iter().map(PadDeclaration::describe).collect()
    }
}

/// Fail unless exactly `expected` input types were supplied.
pub fn ensure_arity(expected: usize, inputs: &[TypeDescriptor]) -> Result<(), TypeError> {
    if inputs.len() != expected {
        return Err(TypeError::Arity {
            expected,
            found: inputs.len(),
        });
    }
    Ok(())
}

/// Default check: every input satisfies its pad, every output pad is concrete.
pub fn check_declared(
    input_pads: &[PadDeclaration],
    output_pads: &[PadDeclaration],
    inputs: &[TypeDescriptor],
) -> Result<Vec<TypeDescriptor>, TypeError> {
    ensure_arity(input_pads.len(), inputs)?;

    for (pad, (decl, ty)) in input_pads.iter().zip(inputs).enumerate() {
        if !decl.constraint.accepts(ty) {
            return Err(TypeError::Constraint {
                pad,
                expected: decl.constraint.to_string(),
                found: ty.clone(),
            });
        }
    }

    output_pads
        .iter()
        .map(|decl| {
            decl.constraint.concrete().cloned().ok_or_else(|| {
                TypeError::Rejected(format!(
                    "output pad '{}' has no concrete type to derive",
                    decl.name
                ))
            })
        })
        .collect()
}

/// Enum dispatch for built-in elements.
pub enum BuiltinElement {
    Constant(ConstantElement),
    MatrixMultiply(MatrixMultiplyElement),
    Pixmap(PixmapElement),
}

impl Element for BuiltinElement {
    fn name(&self) -> &str {
        match self {
            BuiltinElement::Constant(e) => e.name(),
            BuiltinElement::MatrixMultiply(e) => e.name(),
            BuiltinElement::Pixmap(e) => e.name(),
        }
    }

    fn category(&self) -> &str {
        match self {
            BuiltinElement::Constant(e) => e.category(),
            BuiltinElement::MatrixMultiply(e) => e.category(),
            BuiltinElement::Pixmap(e) => e.category(),
        }
    }

    fn description(&self) -> &str {
        match self {
            BuiltinElement::Constant(e) => e.description(),
            BuiltinElement::MatrixMultiply(e) => e.description(),
            BuiltinElement::Pixmap(e) => e.description(),
        }
    }

    fn input_pads(&self) -> &[PadDeclaration] {
        match self {
            BuiltinElement::Constant(e) => e.input_pads(),
            BuiltinElement::MatrixMultiply(e) => e.input_pads(),
            BuiltinElement::Pixmap(e) => e.input_pads(),
        }
    }

    fn output_pads(&self) -> &[PadDeclaration] {
        match self {
            BuiltinElement::Constant(e) => e.output_pads(),
            BuiltinElement::MatrixMultiply(e) => e.output_pads(),
            BuiltinElement::Pixmap(e) => e.output_pads(),
        }
    }

    fn check(&self, inputs: &[TypeDescriptor]) -> Result<Vec<TypeDescriptor>, TypeError> {
        match self {
            BuiltinElement::Constant(e) => e.check(inputs),
            BuiltinElement::MatrixMultiply(e) => e.check(inputs),
            BuiltinElement::Pixmap(e) => e.check(inputs),
        }
    }

    fn configure(&mut self, key: &str, value: &ConfigValue) -> bool {
        match self {
            BuiltinElement::Constant(e) => e.configure(key, value),
            BuiltinElement::MatrixMultiply(e) => e.configure(key, value),
            BuiltinElement::Pixmap(e) => e.configure(key, value),
        }
    }

    fn input_descriptions(&self) -> Vec<(String, String)> {
        match self {
            BuiltinElement::Constant(e) => e.input_descriptions(),
            BuiltinElement::MatrixMultiply(e) => e.input_descriptions(),
            BuiltinElement::Pixmap(e) => e.input_descriptions(),
        }
    }

    fn output_descriptions(&self) -> Vec<(String, String)> {
        match self {
            BuiltinElement::Constant(e) => e.output_descriptions(),
            BuiltinElement::MatrixMultiply(e) => e.output_descriptions(),
            BuiltinElement::Pixmap(e) => e.output_descriptions(),
        }
    }
}

/// Wrapper that holds either a built-in element (enum dispatch) or a plugin
/// element (trait object).
pub enum AnyElement {
    Builtin(BuiltinElement),
    Plugin(Box<dyn Element>),
}

impl Element for AnyElement {
    fn name(&self) -> &str {
        match self {
            AnyElement::Builtin(e) => e.name(),
            AnyElement::Plugin(e) => e.name(),
        }
    }

    fn category(&self) -> &str {
        match self {
            AnyElement::Builtin(e) => e.category(),
            AnyElement::Plugin(e) => e.category(),
        }
    }

    fn description(&self) -> &str {
        match self {
            AnyElement::Builtin(e) => e.description(),
            AnyElement::Plugin(e) => e.description(),
        }
    }

    fn input_pads(&self) -> &[PadDeclaration] {
        match self {
            AnyElement::Builtin(e) => e.input_pads(),
            AnyElement::Plugin(e) => e.input_pads(),
        }
    }

    fn output_pads(&self) -> &[PadDeclaration] {
        match self {
            AnyElement::Builtin(e) => e.output_pads(),
            AnyElement::Plugin(e) => e.output_pads(),
        }
    }

    fn check(&self, inputs: &[TypeDescriptor]) -> Result<Vec<TypeDescriptor>, TypeError> {
        match self {
            AnyElement::Builtin(e) => e.check(inputs),
            AnyElement::Plugin(e) => e.check(inputs),
        }
    }

    fn configure(&mut self, key: &str, value: &ConfigValue) -> bool {
        match self {
            AnyElement::Builtin(e) => e.configure(key, value),
            AnyElement::Plugin(e) => e.configure(key, value),
        }
    }

    fn input_descriptions(&self) -> Vec<(String, String)> {
        match self {
            AnyElement::Builtin(e) => e.input_descriptions(),
            AnyElement::Plugin(e) => e.input_descriptions(),
        }
    }

    fn output_descriptions(&self) -> Vec<(String, String)> {
        match self {
            AnyElement::Builtin(e) => e.output_descriptions(),
            AnyElement::Plugin(e) => e.output_descriptions(),
        }
    }
}

impl From<BuiltinElement> for AnyElement {
    fn from(element: BuiltinElement) -> Self {
        AnyElement::Builtin(element)
    }
}

impl From<Box<dyn Element>> for AnyElement {
    fn from(element: Box<dyn Element>) -> Self {
        AnyElement::Plugin(element)
    }
}

impl From<ConstantElement> for AnyElement {
    fn from(element: ConstantElement) -> Self {
        AnyElement::Builtin(BuiltinElement::Constant(element))
    }
}

impl From<MatrixMultiplyElement> for AnyElement {
    fn from(element: MatrixMultiplyElement) -> Self {
        AnyElement::Builtin(BuiltinElement::MatrixMultiply(element))
    }
}

impl From<PixmapElement> for AnyElement {
    fn from(element: PixmapElement) -> Self {
        AnyElement::Builtin(BuiltinElement::Pixmap(element))
    }
}

impl std::fmt::Debug for AnyElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyElement")
            .field("name", &self.name())
            .field("builtin", &matches!(self, AnyElement::Builtin(_)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ScalarKind, TypeClass};

    struct Doubler {
        inputs: Vec<PadDeclaration>,
        outputs: Vec<PadDeclaration>,
    }

    impl Doubler {
        fn new() -> Self {
            Self {
                inputs: vec![PadDeclaration::input("x", "value", TypeClass::Numeric)],
                outputs: vec![PadDeclaration::output("y", "doubled", TypeDescriptor::float())],
            }
        }
    }

    impl Element for Doubler {
        fn name(&self) -> &str {
            "Doubler"
        }

        fn category(&self) -> &str {
            "Arithmetic"
        }

        fn description(&self) -> &str {
            "Doubles a number"
        }

        fn input_pads(&self) -> &[PadDeclaration] {
            &self.inputs
        }

        fn output_pads(&self) -> &[PadDeclaration] {
            &self.outputs
        }
    }

    #[test]
    fn test_default_check_accepts_matching_inputs() {
        let e = Doubler::new();
        assert_eq!(e.check(&[TypeDescriptor::int()]), Ok(vec![TypeDescriptor::float()]));
    }

    #[test]
    fn test_default_check_rejects_constraint_violation() {
        let e = Doubler::new();
        let err = e.check(&[TypeDescriptor::Color]).unwrap_err();
        assert!(matches!(err, TypeError::Constraint { pad: 0, .. }));
    }

    #[test]
    fn test_default_check_rejects_wrong_arity() {
        let e = Doubler::new();
        assert_eq!(
            e.check(&[]),
            Err(TypeError::Arity {
                expected: 1,
                found: 0
            })
        );
    }

    #[test]
    fn test_default_check_needs_concrete_outputs() {
        let outputs = vec![PadDeclaration::output("o", "out", TypeClass::Any)];
        let result = check_declared(&[], &outputs, &[]);
        assert!(matches!(result, Err(TypeError::Rejected(_))));
    }

    #[test]
    fn test_plugin_element_dispatch() {
        let boxed: Box<dyn Element> = Box::new(Doubler::new());
        let any = AnyElement::from(boxed);
        assert_eq!(any.name(), "Doubler");
        assert_eq!(any.input_descriptions(), vec![("x".to_string(), "value: int|float".to_string())]);
        assert!(any
            .check(&[TypeDescriptor::vector(ScalarKind::Int, 2)])
            .is_err());
    }

    struct Annotated(Doubler);

    impl Element for Annotated {
        fn name(&self) -> &str {
            "Annotated"
        }

        fn category(&self) -> &str {
            self.0.category()
        }

        fn description(&self) -> &str {
            self.0.description()
        }

        fn input_pads(&self) -> &[PadDeclaration] {
            self.0.input_pads()
        }

        fn output_pads(&self) -> &[PadDeclaration] {
            self.0.output_pads()
        }

        fn input_descriptions(&self) -> Vec<(String, String)> {
            vec![("<i>x</i>".to_string(), "any number".to_string())]
        }

        fn output_descriptions(&self) -> Vec<(String, String)> {
            vec![("<i>y</i>".to_string(), "twice x".to_string())]
        }
    }

    #[test]
    fn test_wrapped_element_keeps_custom_descriptions() {
        let boxed: Box<dyn Element> = Box::new(Annotated(Doubler::new()));
        let any = AnyElement::from(boxed);
        assert_eq!(
            any.input_descriptions(),
            vec![("<i>x</i>".to_string(), "any number".to_string())]
        );
        assert_eq!(
            any.output_descriptions(),
            vec![("<i>y</i>".to_string(), "twice x".to_string())]
        );
    }

    #[test]
    fn test_builtin_descriptions_dispatch() {
        let any = AnyElement::from(MatrixMultiplyElement::new());
        assert_eq!(
            any.input_descriptions(),
            vec![
                ("<i>v<sub>0</sub></i>".to_string(), "vector".to_string()),
                ("<b>M</b>".to_string(), "matrix".to_string()),
            ]
        );
        assert_eq!(any.output_descriptions()[0].1, "new vector");
    }

    #[test]
    fn test_config_value_as_type() {
        let text = ConfigValue::String("int[2]".to_string());
        assert_eq!(
            text.as_type(),
            Some(Ok(TypeDescriptor::vector(ScalarKind::Int, 2)))
        );
        assert!(ConfigValue::Bool(true).as_type().is_none());
    }
}
