//! Rewrite rules for sums, including combining like terms.

use crate::approx::approximate_rational;
use crate::primitive::int_from_f64;
use crate::symbolic::{
    expr::{divide, minus, Expr, Operation},
    step::{Step, StepKind},
    step_collector::StepCollector,
};
use rug::Rational;
use std::cmp::Ordering;
use super::{do_add, downgrade, record, split_coefficient, with_coefficient};

/// Returns the exact value of a plain number, or of a fraction of two plain integers.
pub(crate) fn numeric_value(expr: &Expr) -> Option<Rational> {
    match expr {
        Expr::Operation(Operation::Minus, operands) if operands.len() == 1 => {
            numeric_value(&operands[0]).map(|value| -value)
        },
        Expr::Operation(Operation::Divide, operands) if operands.len() == 2 => {
            let num = int_from_f64(operands[0].as_number()?)?;
            let den = int_from_f64(operands[1].as_number()?)?;
            if den.is_zero() {
                return None;
            }
            Some(Rational::from((num, den)))
        },
        _ => expr.as_number().and_then(approximate_rational),
    }
}

/// Returns true if the expression is a (possibly negated) fraction.
fn is_numeric_fraction(expr: &Expr) -> bool {
    match expr {
        Expr::Operation(Operation::Minus, operands) if operands.len() == 1 => {
            is_numeric_fraction(&operands[0])
        },
        _ => expr.is_fraction(),
    }
}

/// Converts a rational number into a plain number or a fraction of two integers.
pub(crate) fn rational_to_expr(value: &Rational) -> Expr {
    if *value.denom() == 1 {
        return Expr::number(value.numer().to_f64());
    }

    let fraction = divide(
        Expr::Constant(value.numer().clone().abs().to_f64()),
        Expr::Constant(value.denom().to_f64()),
    );
    match value.cmp0() {
        Ordering::Less => minus(fraction),
        _ => fraction,
    }
}

/// `0+a = a`
/// `a+0 = a`
pub fn zero_in_addition(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let new_terms = terms.iter()
            .filter(|term| !term.is_number(0.0))
            .cloned()
            .collect::<Vec<_>>();

        if new_terms.len() == terms.len() {
            None
        } else {
            Some(downgrade(Operation::Plus, new_terms))
        }
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    record(steps, StepKind::ZeroInAddition, expr, &opt);
    Some(opt)
}

/// `a + b - a = b`
pub fn eliminate_opposites(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        for i in 0..terms.len() {
            let opposite = terms[i].negate();
            if let Some(j) = (i + 1..terms.len()).find(|&j| terms[j] == opposite) {
                let new_terms = terms.iter()
                    .enumerate()
                    .filter(|(k, _)| *k != i && *k != j)
                    .map(|(_, term)| term.clone())
                    .collect();
                return Some(downgrade(Operation::Plus, new_terms));
            }
        }

        None
    })?;

    record(steps, StepKind::EliminateOpposites, expr, &opt);
    Some(opt)
}

/// Adds the numeric terms of a sum. The result takes the place of the first numeric term.
///
/// `2 + x + 3 = 5 + x`
/// `1/3 + 1/6 = 1/2`
pub fn add_constants(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let (opt, kind) = do_add(expr, |terms| {
        let numeric = terms.iter()
            .enumerate()
            .filter(|(_, term)| numeric_value(term).is_some())
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        if numeric.len() < 2 {
            return None;
        }

        let has_fraction = numeric.iter().any(|&i| is_numeric_fraction(&terms[i]));
        let sum = if has_fraction {
            let mut sum = Rational::new();
            for &i in &numeric {
                sum += numeric_value(&terms[i])?;
            }
            rational_to_expr(&sum)
        } else {
            Expr::number(numeric.iter().filter_map(|&i| terms[i].as_number()).sum::<f64>())
        };

        let mut new_terms = Vec::with_capacity(terms.len() - numeric.len() + 1);
        for (i, term) in terms.iter().enumerate() {
            if i == numeric[0] {
                if !sum.is_number(0.0) {
                    new_terms.push(sum.clone());
                }
            } else if !numeric.contains(&i) {
                new_terms.push(term.clone());
            }
        }

        let kind = if has_fraction { StepKind::AddFractions } else { StepKind::AddConstants };
        Some((downgrade(Operation::Plus, new_terms), kind))
    })?;

    record(steps, kind, expr, &opt);
    Some(opt)
}

/// Combines like terms. The combined term takes the place of the first term of the group.
///
/// `a+a = 2a`
/// `2a+3a = 5a`
/// `2a-a = a`
/// etc.
pub fn collect_like_terms(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let mut new_terms = Vec::with_capacity(terms.len());
        let mut used = vec![false; terms.len()];
        let mut changed = false;

        for i in 0..terms.len() {
            if used[i] {
                continue;
            }

            let Some((mut coefficient, factors)) = split_coefficient(&terms[i]) else {
                new_terms.push(terms[i].clone());
                continue;
            };

            // factors must be structurally equal
            let mut merged = false;
            for j in i + 1..terms.len() {
                if used[j] {
                    continue;
                }
                if let Some((other_coefficient, other_factors)) = split_coefficient(&terms[j]) {
                    if other_factors == factors {
                        coefficient += other_coefficient;
                        used[j] = true;
                        merged = true;
                    }
                }
            }

            if merged {
                changed = true;
                if let Some(term) = with_coefficient(coefficient, factors) {
                    new_terms.push(term);
                }
            } else {
                new_terms.push(terms[i].clone());
            }
        }

        changed.then(|| downgrade(Operation::Plus, new_terms))
    })?;

    record(steps, StepKind::CollectLikeTerms, expr, &opt);
    Some(opt)
}

/// Applies all addition rules.
///
/// All addition rules will reduce the complexity of the expression.
pub fn all(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    zero_in_addition(expr, steps)
        .or_else(|| eliminate_opposites(expr, steps))
        .or_else(|| add_constants(expr, steps))
        .or_else(|| collect_like_terms(expr, steps))
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
    fn remove_zero() {
        let expr = add(x(), Expr::number(0.0));
        assert_eq!(zero_in_addition(&expr, &mut ()), Some(x()));
    }

    #[test]
    fn opposites() {
        let expr = add(add(sin(x()), x()), minus(sin(x())));
        assert_eq!(eliminate_opposites(&expr, &mut ()), Some(x()));
    }

    #[test]
    fn integers() {
        let expr = add(add(Expr::number(2.0), x()), Expr::number(-5.0));
        let result = add_constants(&expr, &mut ()).unwrap();
        assert_eq!(result.to_string(), "(-3 + x)");
    }

    #[test]
    fn fractions() {
        let third = divide(Expr::number(1.0), Expr::number(3.0));
        let sixth = divide(Expr::number(1.0), Expr::number(6.0));
        let mut steps = Vec::new();
        let result = add_constants(&add(third, sixth), &mut steps).unwrap();
        assert_eq!(result, divide(Expr::number(1.0), Expr::number(2.0)));
        assert_eq!(steps[0].kind, StepKind::AddFractions);
    }

    #[test]
    fn like_terms_keep_first_position() {
        let y = Expr::variable("y");
        let expr = add(
            add(multiply(Expr::number(2.0), x()), y.clone()),
            minus(multiply(Expr::number(5.0), x())),
        );
        let result = collect_like_terms(&expr, &mut ()).unwrap();
        assert_eq!(result.to_string(), "(-(3)(x) + y)");
    }

    #[test]
    fn like_terms_cancel() {
        let expr = add(multiply(Expr::number(2.0), x()), minus(multiply(Expr::number(2.0), x())));
        assert_eq!(collect_like_terms(&expr, &mut ()), Some(Expr::number(0.0)));
    }
}
