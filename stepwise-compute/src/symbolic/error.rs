//! Error kinds raised by the symbolic engine.

use stepwise_error::ErrorKind;
use super::expr::Operation;

/// The derivative of an operation cannot be computed symbolically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedDerivative {
    /// The operation with no differentiation rule.
    pub operation: Operation,
}

impl ErrorKind for UnsupportedDerivative {
    fn message(&self) -> String {
        format!("cannot differentiate `{}` symbolically", self.operation)
    }

    fn labels(&self) -> Vec<String> {
        vec![String::from("this expression has no differentiation rule")]
    }

    fn help(&self) -> Option<String> {
        match self.operation {
            Operation::Log => Some(String::from("the base of a logarithm must not depend on the variable")),
            _ => None,
        }
    }
}

/// The expression has no numeric value, because it contains variables or is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndefinedValue;

impl ErrorKind for UndefinedValue {
    fn message(&self) -> String {
        String::from("expression cannot be evaluated")
    }

    fn labels(&self) -> Vec<String> {
        vec![String::from("this expression is undefined")]
    }

    fn help(&self) -> Option<String> {
        Some(String::from(
            "check for variables, division by zero, or even roots of negative numbers",
        ))
    }
}
