//! Rules that only change the shape of the tree: nested sums and products, sums and products of
//! a single operand, and double negations.

use crate::symbolic::{
    expr::{Expr, Operation},
    step::{Step, StepKind},
    step_collector::StepCollector,
};
use super::{do_minus, do_operation, downgrade, record};

/// Splices the operands of nested sums / products into the outer node.
///
/// `a + (b + c) = a + b + c`
/// `a(bc) = abc`
fn flatten(expr: &Expr, op: Operation) -> Option<Expr> {
    do_operation(expr, op, |operands| {
        if !operands.iter().any(|operand| operand.is_operation(op)) {
            return None;
        }

        let mut new_operands = Vec::with_capacity(operands.len());
        for operand in operands {
            match operand {
                Expr::Operation(inner, inner_operands) if *inner == op => {
                    new_operands.extend(inner_operands.iter().cloned());
                },
                operand => new_operands.push(operand.clone()),
            }
        }
        Some(Expr::Operation(op, new_operands))
    })
}

/// `a + (b + c) = a + b + c`
pub fn flatten_sum(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = flatten(expr, Operation::Plus)?;
    record(steps, StepKind::FlattenSum, expr, &opt);
    Some(opt)
}

/// `a(bc) = abc`
pub fn flatten_product(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = flatten(expr, Operation::Multiply)?;
    record(steps, StepKind::FlattenProduct, expr, &opt);
    Some(opt)
}

/// A sum or product with fewer than two operands is replaced by its operand, or by the identity
/// element if it has none.
pub fn single_operand(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = match expr {
        Expr::Operation(op @ (Operation::Plus | Operation::Multiply), operands)
            if operands.len() < 2 =>
        {
            downgrade(*op, operands.clone())
        },
        _ => return None,
    };

    record(steps, StepKind::SingleOperand, expr, &opt);
    Some(opt)
}

/// `--a = a`
pub fn double_minus(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_minus(expr, |operand| {
        do_minus(operand, |inner| Some(inner.clone()))
            .or_else(|| {
                // a negative constant under a negation
                operand.as_constant()
                    .filter(|value| *value < 0.0)
                    .map(|value| Expr::Constant(-value))
            })
    })?;

    record(steps, StepKind::DoubleMinus, expr, &opt);
    Some(opt)
}

/// Applies all structural rules.
pub fn all(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    flatten_sum(expr, steps)
        .or_else(|| flatten_product(expr, steps))
        .or_else(|| single_operand(expr, steps))
        .or_else(|| double_minus(expr, steps))
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
    fn nested_sum() {
        let y = Expr::variable("y");
        let inner = Expr::Operation(Operation::Plus, vec![y.clone(), Expr::number(1.0)]);
        let expr = Expr::Operation(Operation::Plus, vec![x(), inner]);
        assert_eq!(flatten_sum(&expr, &mut ()), Some(add(add(x(), y), Expr::number(1.0))));
    }

    #[test]
    fn single_term() {
        let expr = Expr::Operation(Operation::Multiply, vec![x()]);
        assert_eq!(single_operand(&expr, &mut ()), Some(x()));
        assert_eq!(single_operand(&add(x(), x()), &mut ()), None);
    }

    #[test]
    fn double_negation() {
        let mut steps = Vec::new();
        assert_eq!(double_minus(&minus(minus(x())), &mut steps), Some(x()));
        assert_eq!(steps[0].kind, StepKind::DoubleMinus);
        assert_eq!(double_minus(&minus(x()), &mut ()), None);
    }
}
