//! Rewrite rules for quotients.

use crate::primitive::{int, int_from_f64};
use crate::symbolic::{
    expr::{divide, minus, non_trivial_power, Expr, Operation},
    step::{Step, StepKind},
    step_collector::StepCollector,
};
use rug::Integer;
use super::{base_and_exponent, do_divide, downgrade, factors_of, is_negated, record};

/// `a/1 = a`
pub fn divide_by_one(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_divide(expr, |num, den| den.is_number(1.0).then(|| num.clone()))?;
    record(steps, StepKind::DivideByOne, expr, &opt);
    Some(opt)
}

/// `a/(-1) = -a`
pub fn divide_by_negative_one(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_divide(expr, |num, den| den.is_number(-1.0).then(|| minus(num.clone())))?;
    record(steps, StepKind::DivideByNegativeOne, expr, &opt);
    Some(opt)
}

/// `0/a = 0`
pub fn zero_numerator(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_divide(expr, |num, den| {
        (num.is_number(0.0) && !den.is_number(0.0)).then(|| Expr::Constant(0.0))
    })?;
    record(steps, StepKind::ZeroNumerator, expr, &opt);
    Some(opt)
}

/// Moves negations out of the numerator and the denominator.
///
/// `(-a)/(-b) = a/b`
/// `(-a)/b = -(a/b)`
/// `a/(-b) = -(a/b)`
pub fn negative_num_denom(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_divide(expr, |num, den| {
        match (is_negated(num), is_negated(den)) {
            (true, true) => Some(divide(num.negate(), den.negate())),
            (true, false) => Some(minus(divide(num.negate(), den.clone()))),
            (false, true) => Some(minus(divide(num.clone(), den.negate()))),
            (false, false) => None,
        }
    })?;

    record(steps, StepKind::NegativeNumDenom, expr, &opt);
    Some(opt)
}

/// Cancels equal numerator and denominator, or a non-numeric factor common to both.
///
/// `a/a = 1`
/// `(ab)/(ac) = b/c`
/// `(x^3)/(x) = x^2`
pub fn cancel_fraction(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_divide(expr, |num, den| {
        if num == den {
            return Some(Expr::Constant(1.0));
        }

        let mut num_factors = factors_of(num);
        let mut den_factors = factors_of(den);
        for i in 0..num_factors.len() {
            let (base, Some(num_exp)) = base_and_exponent(&num_factors[i]) else {
                continue;
            };
            if base.as_number().is_some() || num_exp <= 0.0 {
                continue;
            }

            let found = den_factors.iter()
                .enumerate()
                .find_map(|(j, factor)| match base_and_exponent(factor) {
                    (other, Some(den_exp)) if other == base && den_exp > 0.0 => Some((j, den_exp)),
                    _ => None,
                });
            let Some((j, den_exp)) = found else {
                continue;
            };

            let common = num_exp.min(den_exp);
            num_factors[i] = non_trivial_power(base.clone(), Expr::number(num_exp - common));
            den_factors[j] = non_trivial_power(base, Expr::number(den_exp - common));
            num_factors.retain(|factor| !factor.is_number(1.0));
            den_factors.retain(|factor| !factor.is_number(1.0));

            let num = downgrade(Operation::Multiply, num_factors);
            return Some(if den_factors.is_empty() {
                num
            } else {
                divide(num, downgrade(Operation::Multiply, den_factors))
            });
        }

        None
    })?;

    record(steps, StepKind::CancelFraction, expr, &opt);
    Some(opt)
}

/// Splits an expression into its leading integer coefficient and its other factors.
fn integer_coefficient(expr: &Expr) -> (Integer, Vec<Expr>) {
    if let Some(n) = expr.as_number().and_then(int_from_f64) {
        return (n, Vec::new());
    }

    let factors = factors_of(expr);
    match factors.first().and_then(Expr::as_number).and_then(int_from_f64) {
        Some(n) => (n, factors[1..].to_vec()),
        None => (int(1), factors),
    }
}

/// Rebuilds `coefficient * factors`.
fn from_coefficient(coefficient: Integer, mut factors: Vec<Expr>) -> Expr {
    if coefficient != 1 || factors.is_empty() {
        factors.insert(0, Expr::number(coefficient.to_f64()));
    }
    downgrade(Operation::Multiply, factors)
}

/// Divides the integer coefficients of the numerator and the denominator by their greatest
/// common divisor.
///
/// `6/4 = 3/2`
/// `(6x)/3 = 2x`
pub fn reduce_fraction(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_divide(expr, |num, den| {
        let (num_coefficient, num_factors) = integer_coefficient(num);
        let (den_coefficient, den_factors) = integer_coefficient(den);
        if num_coefficient.is_zero() || den_coefficient.is_zero() {
            return None;
        }

        let gcd = num_coefficient.clone().gcd(&den_coefficient);
        if gcd == 1 {
            return None;
        }

        let num = from_coefficient(num_coefficient / &gcd, num_factors);
        let den_coefficient = den_coefficient / &gcd;
        if den_coefficient == 1 && den_factors.is_empty() {
            Some(num)
        } else {
            Some(divide(num, from_coefficient(den_coefficient, den_factors)))
        }
    })?;

    record(steps, StepKind::ReduceFraction, expr, &opt);
    Some(opt)
}

/// Applies all quotient rules.
pub fn all(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    divide_by_one(expr, steps)
        .or_else(|| divide_by_negative_one(expr, steps))
        .or_else(|| zero_numerator(expr, steps))
        .or_else(|| negative_num_denom(expr, steps))
        .or_else(|| cancel_fraction(expr, steps))
        .or_else(|| reduce_fraction(expr, steps))
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
    fn trivial_denominators() {
        assert_eq!(divide_by_one(&divide(x(), Expr::number(1.0)), &mut ()), Some(x()));
        assert_eq!(
            divide_by_negative_one(&divide(x(), Expr::number(-1.0)), &mut ()),
            Some(minus(x())),
        );
        assert_eq!(zero_numerator(&divide(Expr::number(0.0), x()), &mut ()), Some(Expr::number(0.0)));
    }

    #[test]
    fn negations() {
        let expr = divide(minus(x()), Expr::number(2.0));
        assert_eq!(
            negative_num_denom(&expr, &mut ()),
            Some(minus(divide(x(), Expr::number(2.0)))),
        );
    }

    #[test]
    fn common_factors() {
        let y = Expr::variable("y");
        let expr = divide(multiply(x(), y.clone()), x());
        assert_eq!(cancel_fraction(&expr, &mut ()), Some(y));

        let expr = divide(power(x(), Expr::number(3.0)), power(x(), Expr::number(2.0)));
        assert_eq!(cancel_fraction(&expr, &mut ()), Some(x()));

        let expr = divide(x(), power(x(), Expr::number(2.0)));
        assert_eq!(cancel_fraction(&expr, &mut ()), Some(divide(Expr::number(1.0), x())));
    }

    #[test]
    fn numeric_gcd() {
        let expr = divide(Expr::number(6.0), Expr::number(4.0));
        assert_eq!(reduce_fraction(&expr, &mut ()).unwrap().to_string(), "(3)/(2)");

        let expr = divide(multiply(Expr::number(6.0), x()), Expr::number(3.0));
        assert_eq!(reduce_fraction(&expr, &mut ()).unwrap().to_string(), "(2)(x)");

        let expr = divide(Expr::number(3.0), Expr::number(5.0));
        assert_eq!(reduce_fraction(&expr, &mut ()), None);
    }
}
