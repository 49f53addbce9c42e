//! Evaluation of inverse trigonometric functions at well-known values.
//!
//! The inverse trigonometric functions of certain values are well-known angles that can be
//! written exactly as a fraction of `π`. The lookup table below maps these inputs to their
//! outputs; inputs are compared by value, so `nroot(3, 2)/2` and `(1/2)(nroot(3, 2))` both
//! match.

use crate::primitive::is_equal;
use crate::symbolic::{
    expr::{divide, minus, multiply, Expr, Operation},
    step::{Step, StepKind},
    step_collector::StepCollector,
};
use once_cell::sync::Lazy;
use std::f64::consts::FRAC_1_SQRT_2;
use super::record;

/// `sqrt(3)/2`
const SQRT_3_2: f64 = 0.866_025_403_784_438_6;

/// `sqrt(3)/3`
const SQRT_3_3: f64 = 0.577_350_269_189_625_8;

/// `sqrt(3)`
const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// `num * π / den`
fn pi_times(num: f64, den: f64) -> Expr {
    let numerator = if is_equal(num, 1.0) {
        Expr::pi()
    } else {
        multiply(Expr::number(num), Expr::pi())
    };

    if is_equal(den, 1.0) {
        numerator
    } else {
        divide(numerator, Expr::number(den))
    }
}

/// An entry of the lookup table: the function, its input, and its output.
struct Entry {
    op: Operation,
    input: f64,
    output: Expr,
}

/// Lookup table of inverse trigonometric functions at well-known values.
///
/// Negative inputs of `arcsin` and `arctan` are handled by the odd symmetry of the functions,
/// while `arccos` lists them explicitly.
static INVERSE_TRIGO: Lazy<Vec<Entry>> = Lazy::new(|| {
    let entry = |op, input, output| Entry { op, input, output };
    vec![
        entry(Operation::Arcsin, 0.0, Expr::Constant(0.0)),
        entry(Operation::Arcsin, 0.5, pi_times(1.0, 6.0)),
        entry(Operation::Arcsin, FRAC_1_SQRT_2, pi_times(1.0, 4.0)),
        entry(Operation::Arcsin, SQRT_3_2, pi_times(1.0, 3.0)),
        entry(Operation::Arcsin, 1.0, pi_times(1.0, 2.0)),

        entry(Operation::Arccos, 1.0, Expr::Constant(0.0)),
        entry(Operation::Arccos, SQRT_3_2, pi_times(1.0, 6.0)),
        entry(Operation::Arccos, FRAC_1_SQRT_2, pi_times(1.0, 4.0)),
        entry(Operation::Arccos, 0.5, pi_times(1.0, 3.0)),
        entry(Operation::Arccos, 0.0, pi_times(1.0, 2.0)),
        entry(Operation::Arccos, -0.5, pi_times(2.0, 3.0)),
        entry(Operation::Arccos, -FRAC_1_SQRT_2, pi_times(3.0, 4.0)),
        entry(Operation::Arccos, -SQRT_3_2, pi_times(5.0, 6.0)),
        entry(Operation::Arccos, -1.0, pi_times(1.0, 1.0)),

        entry(Operation::Arctan, 0.0, Expr::Constant(0.0)),
        entry(Operation::Arctan, SQRT_3_3, pi_times(1.0, 6.0)),
        entry(Operation::Arctan, 1.0, pi_times(1.0, 4.0)),
        entry(Operation::Arctan, SQRT_3, pi_times(1.0, 3.0)),
    ]
});

/// Looks up the output of the inverse trigonometric function at the given input.
fn lookup(op: Operation, input: f64) -> Option<Expr> {
    let find = |input: f64| {
        INVERSE_TRIGO.iter()
            .find(|entry| entry.op == op && is_equal(entry.input, input))
            .map(|entry| entry.output.clone())
    };

    find(input).or_else(|| match op {
        Operation::Arcsin | Operation::Arctan if input < 0.0 => {
            find(-input).map(|output| if output.is_number(0.0) { output } else { minus(output) })
        },
        _ => None,
    })
}

/// Evaluates inverse trigonometric functions at well-known values.
///
/// `arcsin(1/2) = π/6`
/// `arccos(-1) = π`
pub fn evaluate_inverse_trigo(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = match expr {
        Expr::Operation(op, operands) if op.is_inverse_trigonometric() && operands.len() == 1 => {
            let input = operands[0].value()?;
            lookup(*op, input)?
        },
        _ => return None,
    };

    record(steps, StepKind::EvaluateInverseTrigo, expr, &opt);
    Some(opt)
}

/// Applies all trigonometric rules.
pub fn all(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    evaluate_inverse_trigo(expr, steps)
}
