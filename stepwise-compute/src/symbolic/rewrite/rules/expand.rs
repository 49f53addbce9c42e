//! Expansion rules.
//!
//! These rules distribute products and integer powers over sums. They make the expression
//! larger, so they are only part of [`Strategy::Expand`](crate::symbolic::rewrite::Strategy).
//! The regroup rules are applied after them at every node, which combines the like terms the
//! expansion produces.

use crate::primitive::close_to_integer;
use crate::symbolic::{
    expr::{add, minus, multiply, power, Expr, Operation},
    step::{Step, StepKind},
    step_collector::StepCollector,
};
use super::{do_minus, do_multiply, do_power, downgrade, is_negated, record};

/// Sums raised to a larger power are left as is.
const MAX_EXPANDED_POWER: f64 = 10.0;

/// Returns the integer value of a numeric exponent.
fn integer_exponent(exp: &Expr) -> Option<f64> {
    exp.as_number().filter(|n| close_to_integer(*n)).map(f64::round)
}

fn squared(expr: &Expr) -> Expr {
    power(expr.clone(), Expr::Constant(2.0))
}

fn cubed(expr: &Expr) -> Expr {
    power(expr.clone(), Expr::Constant(3.0))
}

/// `-(a + b) = -a - b`
pub fn distribute_minus(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_minus(expr, |inner| match inner {
        Expr::Operation(Operation::Plus, terms) => Some(Expr::Operation(
            Operation::Plus,
            terms.iter().map(Expr::negate).collect(),
        )),
        _ => None,
    })?;

    record(steps, StepKind::DistributeMinus, expr, &opt);
    Some(opt)
}

/// `(a + b)^2 = a^2 + 2ab + b^2`
/// `(a - b)^2 = a^2 - 2ab + b^2`
pub fn binomial_squared(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let (opt, kind) = do_power(expr, |base, exp| {
        if integer_exponent(exp)? != 2.0 {
            return None;
        }

        let [a, b] = base.as_operation().filter(|(op, _)| *op == Operation::Plus)?.1 else {
            return None;
        };

        let two = Expr::Constant(2.0);
        if is_negated(b) {
            let b = b.negate();
            Some((
                Expr::Operation(Operation::Plus, vec![
                    squared(a),
                    minus(multiply(multiply(two, a.clone()), b.clone())),
                    squared(&b),
                ]),
                StepKind::BinomSquaredDiff,
            ))
        } else {
            Some((
                Expr::Operation(Operation::Plus, vec![
                    squared(a),
                    multiply(multiply(two, a.clone()), b.clone()),
                    squared(b),
                ]),
                StepKind::BinomSquaredSum,
            ))
        }
    })?;

    record(steps, kind, expr, &opt);
    Some(opt)
}

/// `(a + b)^3 = a^3 + 3a^2b + 3ab^2 + b^3`
pub fn binomial_cubed(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |base, exp| {
        if integer_exponent(exp)? != 3.0 {
            return None;
        }

        let [a, b] = base.as_operation().filter(|(op, _)| *op == Operation::Plus)?.1 else {
            return None;
        };

        let three = Expr::Constant(3.0);
        Some(Expr::Operation(Operation::Plus, vec![
            cubed(a),
            multiply(multiply(three.clone(), squared(a)), b.clone()),
            multiply(multiply(three, a.clone()), squared(b)),
            cubed(b),
        ]))
    })?;

    record(steps, StepKind::BinomCubed, expr, &opt);
    Some(opt)
}

/// `(a + b + c)^2 = a^2 + b^2 + c^2 + 2ab + 2ac + 2bc`
pub fn trinomial_squared(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |base, exp| {
        if integer_exponent(exp)? != 2.0 {
            return None;
        }

        let [a, b, c] = base.as_operation().filter(|(op, _)| *op == Operation::Plus)?.1 else {
            return None;
        };

        let double = |x: &Expr, y: &Expr| multiply(multiply(Expr::Constant(2.0), x.clone()), y.clone());
        Some(Expr::Operation(Operation::Plus, vec![
            squared(a),
            squared(b),
            squared(c),
            double(a, b),
            double(a, c),
            double(b, c),
        ]))
    })?;

    record(steps, StepKind::TrinomSquared, expr, &opt);
    Some(opt)
}

/// Writes a sum raised to a small integer power as a repeated product, so that it can be
/// expanded by the product rules.
///
/// `(a + b)^4 = (a + b)(a + b)(a + b)(a + b)`
pub fn rewrite_as_multiplication(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |base, exp| {
        let n = integer_exponent(exp).filter(|n| (2.0..=MAX_EXPANDED_POWER).contains(n))?;
        if !base.is_operation(Operation::Plus) {
            return None;
        }

        Some(Expr::Operation(Operation::Multiply, vec![base.clone(); n as usize]))
    })?;

    record(steps, StepKind::RewriteAsMultiplication, expr, &opt);
    Some(opt)
}

/// `(ab)^n = a^n b^n`, for integer `n`.
pub fn distribute_power_over_product(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |base, exp| {
        let n = integer_exponent(exp)?;
        if n.abs() < 2.0 {
            return None;
        }

        do_multiply(base, |factors| {
            Some(Expr::Operation(
                Operation::Multiply,
                factors.iter().map(|factor| power(factor.clone(), exp.clone())).collect(),
            ))
        })
    })?;

    record(steps, StepKind::DistributePowerOverProduct, expr, &opt);
    Some(opt)
}

/// Multiplies the first two sums of a product together.
///
/// `(a + b)(c + d) = ac + ad + bc + bd`
pub fn expand_sum_times_sum(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        let mut sums = factors.iter()
            .enumerate()
            .filter(|(_, factor)| factor.is_operation(Operation::Plus))
            .map(|(i, _)| i);
        let i = sums.next()?;
        let j = sums.next()?;

        let mut terms = Vec::new();
        for a in factors[i].operands() {
            for b in factors[j].operands() {
                terms.push(multiply(a.clone(), b.clone()));
            }
        }

        let mut new_factors = factors.to_vec();
        new_factors[i] = Expr::Operation(Operation::Plus, terms);
        new_factors.remove(j);
        Some(downgrade(Operation::Multiply, new_factors))
    })?;

    record(steps, StepKind::ExpandSumTimesSum, expr, &opt);
    Some(opt)
}

/// Distributes the other factors of a product over its only sum.
///
/// `a(b + c) = ab + ac`
pub fn expand_simple_times_sum(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        if factors.len() < 2 {
            return None;
        }

        let mut sums = factors.iter()
            .enumerate()
            .filter(|(_, factor)| factor.is_operation(Operation::Plus));
        let (i, sum) = sums.next()?;
        if sums.next().is_some() {
            return None;
        }

        let terms = sum.operands()
            .map(|term| {
                factors.iter()
                    .enumerate()
                    .map(|(j, factor)| if j == i { term.clone() } else { factor.clone() })
                    .reduce(multiply)
            })
            .collect::<Option<Vec<_>>>()?;
        Some(terms.into_iter().reduce(add).unwrap_or(Expr::Constant(0.0)))
    })?;

    record(steps, StepKind::ExpandSimpleTimesSum, expr, &opt);
    Some(opt)
}

/// Applies all expansion rules.
pub fn all(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    distribute_minus(expr, steps)
        .or_else(|| binomial_squared(expr, steps))
        .or_else(|| binomial_cubed(expr, steps))
        .or_else(|| trinomial_squared(expr, steps))
        .or_else(|| rewrite_as_multiplication(expr, steps))
        .or_else(|| distribute_power_over_product(expr, steps))
        .or_else(|| expand_sum_times_sum(expr, steps))
        .or_else(|| expand_simple_times_sum(expr, steps))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::symbolic::expr::*;
    use super::*;

    fn x() -> Expr {
        Expr::variable("x")
    }

    fn y() -> Expr {
        Expr::variable("y")
    }

    fn num(n: f64) -> Expr {
        Expr::number(n)
    }

    #[test]
    fn minus_over_sum() {
        let expr = minus(add(x(), minus(y())));
        assert_eq!(distribute_minus(&expr, &mut ()), Some(add(minus(x()), y())));
    }

    #[test]
    fn square_of_difference() {
        let mut steps = Vec::new();
        let expr = power(subtract(x(), num(3.0)), num(2.0));
        let result = binomial_squared(&expr, &mut steps).unwrap();
        assert_eq!(result.to_string(), "((x)^(2)-(2)(x)(3) + (3)^(2))");
        assert_eq!(steps[0].kind, StepKind::BinomSquaredDiff);
    }

    #[test]
    fn repeated_product() {
        let sum = add(x(), num(1.0));
        let expr = power(sum.clone(), num(4.0));
        assert_eq!(
            rewrite_as_multiplication(&expr, &mut ()),
            Some(Expr::Operation(Operation::Multiply, vec![sum.clone(); 4])),
        );
        assert_eq!(rewrite_as_multiplication(&power(sum, num(11.0)), &mut ()), None);
    }

    #[test]
    fn power_over_product() {
        let expr = power(multiply(num(2.0), x()), num(3.0));
        assert_eq!(
            distribute_power_over_product(&expr, &mut ()).unwrap().to_string(),
            "((2)^(3))((x)^(3))",
        );
    }

    #[test]
    fn sum_times_sum() {
        let expr = multiply(add(x(), num(1.0)), add(y(), num(2.0)));
        assert_eq!(
            expand_sum_times_sum(&expr, &mut ()).unwrap().to_string(),
            "((x)(y) + (x)(2) + (1)(y) + (1)(2))",
        );
    }

    #[test]
    fn simple_times_sum() {
        let expr = multiply(num(3.0), add(x(), minus(y())));
        assert_eq!(
            expand_simple_times_sum(&expr, &mut ()).unwrap().to_string(),
            "((3)(x) + (3)(-y))",
        );
    }

    #[test]
    fn full_expansion() {
        let expr = power(add(x(), num(1.0)), num(2.0));
        assert_eq!(expr.expand(&mut ()).to_string(), "((x)^(2) + (2)(x) + 1)");

        let expr = multiply(add(x(), num(2.0)), add(x(), num(3.0)));
        assert_eq!(expr.expand(&mut ()).to_string(), "((x)^(2) + (5)(x) + 6)");

        let expr = minus(add(x(), num(1.0)));
        assert_eq!(expr.expand(&mut ()).to_string(), "(-x-1)");
    }

    #[test]
    fn expansion_preserves_value() {
        let expr = power(add(x(), minus(multiply(num(2.0), y()))), num(5.0));
        let expanded = expr.expand(&mut ());
        let bind = |e: &Expr| e.replace(&y(), &num(0.5)).value_at("x", 1.75);
        let (before, after) = (bind(&expr).unwrap(), bind(&expanded).unwrap());
        assert!((before - after).abs() < 1e-6, "{} != {}", before, after);
    }
}
