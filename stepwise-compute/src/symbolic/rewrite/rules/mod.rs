//! Implementation of the rewrite rules.
//!
//! Each rule in this module is a function that takes the node to rewrite as an argument, and
//! returns `Some(expr)` with the rewritten node if the rule applies, or `None` if the rule does
//! not apply. Rules only look at the node they are given; the rewrite engine takes care of
//! visiting every node of the expression.

pub mod add;
pub mod expand;
pub mod factor;
pub mod fraction;
pub mod log;
pub mod multiply;
pub mod power;
pub mod root;
pub mod structure;
pub mod trigonometry;

use crate::symbolic::{
    expr::{Expr, Operation},
    step::{Step, StepKind},
    step_collector::StepCollector,
};

/// If the expression is an operation with the given tag, calls the given transformation function
/// with its operands.
///
/// Returns `Some(value)` with the result of the transformation if it was applied.
pub(crate) fn do_operation<T>(
    expr: &Expr,
    op: Operation,
    f: impl Fn(&[Expr]) -> Option<T>,
) -> Option<T> {
    match expr {
        Expr::Operation(own, operands) if *own == op => f(operands),
        _ => None,
    }
}

/// If the expression is a sum, calls the given transformation function with the terms.
pub(crate) fn do_add<T>(expr: &Expr, f: impl Fn(&[Expr]) -> Option<T>) -> Option<T> {
    do_operation(expr, Operation::Plus, f)
}

/// If the expression is a product, calls the given transformation function with the factors.
pub(crate) fn do_multiply<T>(expr: &Expr, f: impl Fn(&[Expr]) -> Option<T>) -> Option<T> {
    do_operation(expr, Operation::Multiply, f)
}

/// If the expression is a negation, calls the given transformation function with the negated
/// operand.
pub(crate) fn do_minus<T>(expr: &Expr, f: impl Fn(&Expr) -> Option<T>) -> Option<T> {
    do_operation(expr, Operation::Minus, |operands| match operands {
        [operand] => f(operand),
        _ => None,
    })
}

/// If the expression is a power, calls the given transformation function with the base and the
/// exponent.
pub(crate) fn do_power<T>(expr: &Expr, f: impl Fn(&Expr, &Expr) -> Option<T>) -> Option<T> {
    do_binary(expr, Operation::Power, f)
}

/// If the expression is a quotient, calls the given transformation function with the numerator
/// and the denominator.
pub(crate) fn do_divide<T>(expr: &Expr, f: impl Fn(&Expr, &Expr) -> Option<T>) -> Option<T> {
    do_binary(expr, Operation::Divide, f)
}

/// If the expression is a root, calls the given transformation function with the radicand and
/// the index.
pub(crate) fn do_root<T>(expr: &Expr, f: impl Fn(&Expr, &Expr) -> Option<T>) -> Option<T> {
    do_binary(expr, Operation::NRoot, f)
}

/// If the expression is a logarithm, calls the given transformation function with the base and
/// the argument.
pub(crate) fn do_log<T>(expr: &Expr, f: impl Fn(&Expr, &Expr) -> Option<T>) -> Option<T> {
    do_binary(expr, Operation::Log, f)
}

fn do_binary<T>(
    expr: &Expr,
    op: Operation,
    f: impl Fn(&Expr, &Expr) -> Option<T>,
) -> Option<T> {
    do_operation(expr, op, |operands| match operands {
        [lhs, rhs] => f(lhs, rhs),
        _ => None,
    })
}

/// Records a step with the expression before and after the rule was applied.
pub(crate) fn record(
    steps: &mut dyn StepCollector<Step>,
    kind: StepKind,
    before: &Expr,
    after: &Expr,
) {
    if steps.is_recording() {
        steps.push(Step::new(kind, vec![before.clone(), after.clone()]));
    }
}

/// Builds a sum or product from the given operands, collapsing the trivial cases: no operands
/// gives the identity element (`0` or `1`), and a single operand is returned as is.
pub(crate) fn downgrade(op: Operation, mut operands: Vec<Expr>) -> Expr {
    match operands.len() {
        0 => match op {
            Operation::Multiply => Expr::Constant(1.0),
            _ => Expr::Constant(0.0),
        },
        1 => operands.remove(0),
        _ => Expr::Operation(op, operands),
    }
}

/// Returns true if the expression is an explicit negation or a negative constant.
pub(crate) fn is_negated(expr: &Expr) -> bool {
    match expr {
        Expr::Constant(value) => *value < 0.0,
        Expr::Operation(Operation::Minus, operands) => operands.len() == 1,
        _ => false,
    }
}

/// Splits a factor into its base and its exponent, if the exponent is a plain number. Factors
/// that are not powers have an exponent of `1`.
pub(crate) fn base_and_exponent(factor: &Expr) -> (Expr, Option<f64>) {
    match factor {
        Expr::Operation(Operation::Power, operands) if operands.len() == 2 => {
            (operands[0].clone(), operands[1].as_number())
        },
        _ => (factor.clone(), Some(1.0)),
    }
}

/// Returns the factors of the expression: the operands of a product, or the expression itself.
pub(crate) fn factors_of(expr: &Expr) -> Vec<Expr> {
    match expr {
        Expr::Operation(Operation::Multiply, factors) => factors.clone(),
        _ => vec![expr.clone()],
    }
}

/// Splits a term of a sum into its numeric coefficient and its remaining factors.
///
/// - `(3)(x)(y)` -> `(3, [x, y])`
/// - `-(2)(x)` -> `(-2, [x])`
/// - `x` -> `(1, [x])`
///
/// Returns [`None`] if the term is a number.
pub(crate) fn split_coefficient(term: &Expr) -> Option<(f64, Vec<Expr>)> {
    if add::numeric_value(term).is_some() {
        return None;
    }

    match term {
        Expr::Operation(Operation::Minus, operands) if operands.len() == 1 => {
            split_coefficient(&operands[0]).map(|(coefficient, factors)| (-coefficient, factors))
        },
        Expr::Operation(Operation::Multiply, factors) => {
            let mut coefficient = 1.0;
            let mut rest = Vec::with_capacity(factors.len());
            for factor in factors {
                match factor.as_number() {
                    Some(n) => coefficient *= n,
                    None => rest.push(factor.clone()),
                }
            }

            if rest.is_empty() {
                None
            } else {
                Some((coefficient, rest))
            }
        },
        _ => Some((1.0, vec![term.clone()])),
    }
}

/// Builds `coefficient * factors`, writing the coefficient first and moving its sign out of the
/// product. Returns [`None`] if the coefficient is zero.
pub(crate) fn with_coefficient(coefficient: f64, factors: Vec<Expr>) -> Option<Expr> {
    use crate::primitive::is_equal;

    if is_equal(coefficient, 0.0) {
        return None;
    }

    let magnitude = coefficient.abs();
    let product = if is_equal(magnitude, 1.0) {
        downgrade(Operation::Multiply, factors)
    } else {
        let mut new_factors = Vec::with_capacity(factors.len() + 1);
        new_factors.push(Expr::Constant(magnitude));
        new_factors.extend(factors);
        Expr::Operation(Operation::Multiply, new_factors)
    };

    if coefficient < 0.0 {
        Some(crate::symbolic::expr::minus(product))
    } else {
        Some(product)
    }
}

/// Applies all regroup rules.
///
/// Regroup rules never expand the expression; the groups are tried in order, and the first rule
/// that applies wins.
pub fn regroup(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    structure::all(expr, steps)
        .or_else(|| add::all(expr, steps))
        .or_else(|| multiply::all(expr, steps))
        .or_else(|| power::all(expr, steps))
        .or_else(|| fraction::all(expr, steps))
        .or_else(|| root::all(expr, steps))
        .or_else(|| trigonometry::all(expr, steps))
        .or_else(|| log::all(expr, steps))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::symbolic::expr::*;
    use super::*;

    fn x() -> Expr {
        Expr::variable("x")
    }

    #[test]
    fn coefficients() {
        let term = multiply(Expr::number(3.0), multiply(x(), Expr::variable("y")));
        assert_eq!(split_coefficient(&term), Some((3.0, vec![x(), Expr::variable("y")])));
        assert_eq!(
            split_coefficient(&minus(multiply(Expr::number(2.0), x()))),
            Some((-2.0, vec![x()])),
        );
        assert_eq!(split_coefficient(&x()), Some((1.0, vec![x()])));
        assert_eq!(split_coefficient(&Expr::number(4.0)), None);
    }

    #[test]
    fn rebuild_with_coefficient() {
        assert_eq!(with_coefficient(1.0, vec![x()]), Some(x()));
        assert_eq!(with_coefficient(-1.0, vec![x()]), Some(minus(x())));
        assert_eq!(
            with_coefficient(-4.0, vec![x()]),
            Some(minus(multiply(Expr::number(4.0), x()))),
        );
        assert_eq!(with_coefficient(0.0, vec![x()]), None);
    }

    #[test]
    fn trivial_sums_and_products() {
        assert_eq!(downgrade(Operation::Plus, vec![]), Expr::number(0.0));
        assert_eq!(downgrade(Operation::Multiply, vec![]), Expr::number(1.0));
        assert_eq!(downgrade(Operation::Multiply, vec![x()]), x());
    }
}
