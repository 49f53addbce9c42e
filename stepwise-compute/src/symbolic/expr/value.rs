//! Numeric evaluation of expressions.

use crate::primitive::{is_equal, is_odd};
use crate::symbolic::error::UndefinedValue;
use stepwise_error::Error;
use super::{Expr, Operation};

impl Expr {
    /// Evaluates the expression, looking up the values of variables with the given function.
    ///
    /// Returns [`None`] if a variable has no value, or if the result (or any intermediate
    /// result) is not a finite number.
    fn evaluate(&self, lookup: &dyn Fn(&str) -> Option<f64>) -> Option<f64> {
        let value = match self {
            Self::Constant(value) => *value,
            Self::Variable(name) => lookup(name)?,
            Self::Operation(op, operands) => {
                let mut values = Vec::with_capacity(operands.len());
                for operand in operands {
                    values.push(operand.evaluate(lookup)?);
                }
                apply(*op, &values)?
            },
        };

        value.is_finite().then_some(value)
    }

    /// Returns the numeric value of the expression, or [`None`] if it contains variables or is
    /// undefined (division by zero, even root of a negative number, ...).
    pub fn value(&self) -> Option<f64> {
        self.evaluate(&|_| None)
    }

    /// Returns the numeric value of the expression with `var` bound to `x`, or [`None`] if it
    /// contains other variables or is undefined at that point.
    pub fn value_at(&self, var: &str, x: f64) -> Option<f64> {
        self.evaluate(&|name| (name == var).then_some(x))
    }

    /// Returns true if [`Expr::value`] would produce a number.
    pub fn can_be_evaluated(&self) -> bool {
        self.value().is_some()
    }

    /// Returns the numeric value of the expression, or an error pointing at the expression if it
    /// cannot be evaluated.
    pub fn try_value(&self) -> Result<f64, Error> {
        self.value().ok_or_else(|| {
            let printed_len = self.to_string().len();
            Error::new(vec![0..printed_len], UndefinedValue)
        })
    }
}

/// Applies an operation to already evaluated operands.
fn apply(op: Operation, values: &[f64]) -> Option<f64> {
    Some(match (op, values) {
        (Operation::Plus, terms) => terms.iter().sum(),
        (Operation::Minus, [value]) => -value,
        (Operation::Multiply, factors) => factors.iter().product(),
        (Operation::Divide, [num, den]) => {
            if is_equal(*den, 0.0) {
                return None;
            }
            num / den
        },
        (Operation::Power, [base, exp]) => base.powf(*exp),
        (Operation::NRoot, [radicand, index]) => {
            if *radicand < 0.0 {
                if !is_odd(*index) {
                    return None;
                }
                -(-radicand).powf(index.recip())
            } else {
                radicand.powf(index.recip())
            }
        },
        (Operation::Sin, [value]) => value.sin(),
        (Operation::Cos, [value]) => value.cos(),
        (Operation::Tan, [value]) => value.tan(),
        (Operation::Arcsin, [value]) => value.asin(),
        (Operation::Arccos, [value]) => value.acos(),
        (Operation::Arctan, [value]) => value.atan(),
        (Operation::Log, [base, arg]) => {
            if *base <= 0.0 || *arg <= 0.0 || is_equal(*base, 1.0) {
                return None;
            }
            arg.ln() / base.ln()
        },
        (Operation::Abs, [value]) => value.abs(),
        _ => return None,
    })
}
