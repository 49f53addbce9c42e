//! Symbolic derivatives of the functions supported by [`Operation`].

use crate::symbolic::{
    expr::{
        add, cos, divide, ln, minus, multiply, non_trivial_power, non_trivial_product, power, root,
        sin, sqrt, subtract,
        consts::{ONE, TWO},
        Expr, Operation,
    },
    step::{Step, StepKind},
    step_collector::StepCollector,
};
use super::{chain, minus_one, record, SymbolicDerivativeError};

/// Computes the derivative of a supported function and performs the chain rule.
pub(super) fn function_derivative(
    f: &Expr,
    op: Operation,
    args: &[Expr],
    var: &str,
    steps: &mut dyn StepCollector<Step>,
) -> Result<Expr, SymbolicDerivativeError> {
    let unsupported = || SymbolicDerivativeError::Unsupported(f.clone());
    let one = || ONE.clone();

    let (outer, arg, kinds) = match (op, args) {
        (Operation::Sin, [u]) => (cos(u.clone()), u, (StepKind::DiffSin, StepKind::DiffSinChain)),
        (Operation::Cos, [u]) => (minus(sin(u.clone())), u, (StepKind::DiffCos, StepKind::DiffCosChain)),
        (Operation::Tan, [u]) => (
            divide(one(), power(cos(u.clone()), TWO.clone())),
            u,
            (StepKind::DiffTan, StepKind::DiffTanChain),
        ),
        (Operation::Arcsin, [u]) => (
            divide(one(), sqrt(subtract(one(), power(u.clone(), TWO.clone())))),
            u,
            (StepKind::DiffArcsin, StepKind::DiffArcsinChain),
        ),
        (Operation::Arccos, [u]) => (
            minus(divide(one(), sqrt(subtract(one(), power(u.clone(), TWO.clone()))))),
            u,
            (StepKind::DiffArccos, StepKind::DiffArccosChain),
        ),
        (Operation::Arctan, [u]) => (
            divide(one(), add(power(u.clone(), TWO.clone()), one())),
            u,
            (StepKind::DiffArctan, StepKind::DiffArctanChain),
        ),
        (Operation::Log, [base, u]) if *base == Expr::e() => (
            divide(one(), u.clone()),
            u,
            (StepKind::DiffNaturalLog, StepKind::DiffNaturalLogChain),
        ),
        (Operation::Log, [base, u]) if base.is_constant_in(var) => (
            divide(one(), multiply(ln(base.clone()), u.clone())),
            u,
            (StepKind::DiffLog, StepKind::DiffLogChain),
        ),
        (Operation::NRoot, [u, n]) if n.is_constant_in(var) => (
            divide(
                one(),
                non_trivial_product(n.clone(), root(non_trivial_power(u.clone(), minus_one(n)), n.clone())),
            ),
            u,
            (StepKind::DiffRoot, StepKind::DiffRootChain),
        ),
        _ => return Err(unsupported()),
    };

    let (result, kind) = chain(outer, arg, var, kinds, steps)?;
    record(steps, kind, f, &result);
    Ok(result)
}
