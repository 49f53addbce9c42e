//! Rewrite rules for products.

use crate::symbolic::{
    expr::{minus, non_trivial_power, Expr, Operation},
    step::{Step, StepKind},
    step_collector::StepCollector,
};
use super::{base_and_exponent, do_multiply, downgrade, is_negated, record};

/// `0*a = 0`
/// `a*0 = 0`
pub fn multiplied_by_zero(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        factors.iter()
            .any(|factor| factor.is_number(0.0))
            .then(|| Expr::Constant(0.0))
    })?;

    record(steps, StepKind::MultipliedByZero, expr, &opt);
    Some(opt)
}

/// Moves the negations of the factors out of the product.
///
/// `(-a)(-b) = ab`
/// `(-a)(b) = -(ab)`
pub fn negatives(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let (opt, kind) = do_multiply(expr, |factors| {
        let count = factors.iter().filter(|factor| is_negated(factor)).count();
        if count == 0 {
            return None;
        }

        let mut new_factors = factors.iter()
            .map(|factor| if is_negated(factor) { factor.negate() } else { factor.clone() })
            .collect::<Vec<_>>();
        if new_factors.len() > 1 {
            // negating `-1` leaves a factor of one behind
            new_factors.retain(|factor| !factor.is_number(1.0));
        }

        let product = downgrade(Operation::Multiply, new_factors);
        if count % 2 == 0 {
            Some((product, StepKind::EvenNumberOfNegatives))
        } else {
            Some((minus(product), StepKind::OddNumberOfNegatives))
        }
    })?;

    record(steps, kind, expr, &opt);
    Some(opt)
}

/// `1*a = a`
/// `a*1 = a`
pub fn multiplied_by_one(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        let new_factors = factors.iter()
            .filter(|factor| !factor.is_number(1.0))
            .cloned()
            .collect::<Vec<_>>();

        if new_factors.len() == factors.len() {
            None
        } else {
            Some(downgrade(Operation::Multiply, new_factors))
        }
    })?;

    record(steps, StepKind::MultipliedByOne, expr, &opt);
    Some(opt)
}

/// Multiplies the numeric factors of a product together, and writes the result as the first
/// factor.
///
/// `(2)(x)(3) = (6)(x)`
/// `(x)(2) = (2)(x)`
pub fn multiply_constants(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let (opt, kind) = do_multiply(expr, |factors| {
        let numeric = factors.iter()
            .enumerate()
            .filter_map(|(i, factor)| factor.as_number().map(|n| (i, n)))
            .collect::<Vec<_>>();

        let kind = match numeric.as_slice() {
            [] | [(0, _)] => return None,
            [_] => StepKind::ConstantToFront,
            _ => StepKind::MultiplyConstants,
        };

        let product = numeric.iter().map(|(_, n)| n).product::<f64>();
        let mut new_factors = Vec::with_capacity(factors.len() - numeric.len() + 1);
        new_factors.push(Expr::number(product));
        new_factors.extend(
            factors.iter()
                .filter(|factor| factor.as_number().is_none())
                .cloned(),
        );
        Some((downgrade(Operation::Multiply, new_factors), kind))
    })?;

    record(steps, kind, expr, &opt);
    Some(opt)
}

/// Combines factors with the same base by adding their exponents. The combined factor takes the
/// place of the first factor with that base.
///
/// `(x)(x) = x^2`
/// `(x^2)(y)(x^3) = (x^5)(y)`
pub fn product_of_powers(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        let decomposed = factors.iter()
            .map(|factor| {
                let (base, exponent) = base_and_exponent(factor);
                // numbers are combined by `multiply_constants`
                let exponent = exponent.filter(|_| base.as_number().is_none());
                (base, exponent)
            })
            .collect::<Vec<_>>();

        for i in 0..decomposed.len() {
            let (base, exponent) = &decomposed[i];
            let Some(mut exponent) = *exponent else {
                continue;
            };

            let mut merged = Vec::new();
            for (j, (other_base, other_exponent)) in decomposed.iter().enumerate().skip(i + 1) {
                if let Some(other_exponent) = other_exponent {
                    if other_base == base {
                        exponent += other_exponent;
                        merged.push(j);
                    }
                }
            }

            if merged.is_empty() {
                continue;
            }

            let combined = non_trivial_power(base.clone(), Expr::number(exponent));
            let new_factors = factors.iter()
                .enumerate()
                .filter(|(j, _)| !merged.contains(j))
                .map(|(j, factor)| if j == i { combined.clone() } else { factor.clone() })
                .collect();
            return Some(downgrade(Operation::Multiply, new_factors));
        }

        None
    })?;

    record(steps, StepKind::ProductOfPowers, expr, &opt);
    Some(opt)
}

/// Applies all multiplication rules.
pub fn all(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    multiplied_by_zero(expr, steps)
        .or_else(|| negatives(expr, steps))
        .or_else(|| multiplied_by_one(expr, steps))
        .or_else(|| multiply_constants(expr, steps))
        .or_else(|| product_of_powers(expr, steps))
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
    fn zero_factor() {
        let expr = multiply(x(), Expr::number(0.0));
        assert_eq!(multiplied_by_zero(&expr, &mut ()), Some(Expr::number(0.0)));
    }

    #[test]
    fn odd_negatives() {
        let mut steps = Vec::new();
        let expr = multiply(sin(x()), minus(sin(x())));
        assert_eq!(negatives(&expr, &mut steps), Some(minus(multiply(sin(x()), sin(x())))));
        assert_eq!(steps[0].kind, StepKind::OddNumberOfNegatives);
    }

    #[test]
    fn even_negatives() {
        let expr = multiply(Expr::number(-1.0), minus(x()));
        assert_eq!(negatives(&expr, &mut ()), Some(x()));
    }

    #[test]
    fn constants_move_to_front() {
        let expr = multiply(multiply(Expr::number(6.0), Expr::number(2.0)), x());
        assert_eq!(multiply_constants(&expr, &mut ()).unwrap().to_string(), "(12)(x)");

        let expr = multiply(x(), Expr::number(3.0));
        assert_eq!(multiply_constants(&expr, &mut ()).unwrap().to_string(), "(3)(x)");

        let expr = multiply(Expr::number(3.0), x());
        assert_eq!(multiply_constants(&expr, &mut ()), None);
    }

    #[test]
    fn powers_of_same_base() {
        let y = Expr::variable("y");
        let expr = multiply(
            multiply(power(x(), Expr::number(2.0)), y.clone()),
            power(x(), Expr::number(3.0)),
        );
        let result = product_of_powers(&expr, &mut ()).unwrap();
        assert_eq!(result.to_string(), "((x)^(5))(y)");

        let expr = multiply(x(), x());
        assert_eq!(product_of_powers(&expr, &mut ()), Some(power(x(), Expr::number(2.0))));
    }
}
