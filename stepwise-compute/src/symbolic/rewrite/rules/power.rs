//! Rewrite rules for powers.

use crate::primitive::{close_to_integer, is_even};
use crate::symbolic::{
    expr::{minus, non_trivial_power, power, Expr},
    step::{Step, StepKind},
    step_collector::StepCollector,
};
use super::{do_minus, do_power, record};

/// Powers with a larger result are left unevaluated.
const MAX_EVALUATED_POWER: f64 = 1e15;

/// `a^0 = 1`
pub fn zeroth_power(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |_, exp| exp.is_number(0.0).then(|| Expr::Constant(1.0)))?;
    record(steps, StepKind::ZerothPower, expr, &opt);
    Some(opt)
}

/// `a^1 = a`
pub fn first_power(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |base, exp| exp.is_number(1.0).then(|| base.clone()))?;
    record(steps, StepKind::FirstPower, expr, &opt);
    Some(opt)
}

/// `1^a = 1`
pub fn power_of_one(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |base, _| base.is_number(1.0).then(|| Expr::Constant(1.0)))?;
    record(steps, StepKind::PowerOfOne, expr, &opt);
    Some(opt)
}

/// Evaluates a non-negative number raised to a positive integer.
///
/// `2^3 = 8`
pub fn evaluate_power(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |base, exp| {
        let base = base.as_constant()?;
        let exp = exp.as_constant()?;
        if !base.is_finite() || !close_to_integer(exp) || exp < 1.0 {
            return None;
        }

        let base_expr = Expr::Constant(base);
        if base_expr.special_constant() {
            return None;
        }

        let result = base.powf(exp.round());
        (result.is_finite() && result.abs() < MAX_EVALUATED_POWER).then(|| Expr::number(result))
    })?;

    record(steps, StepKind::EvaluatePower, expr, &opt);
    Some(opt)
}

/// A negated base raised to an integer exponent.
///
/// `(-a)^2 = a^2`
/// `(-a)^3 = -(a^3)`
pub fn power_of_negative(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let (opt, kind) = do_power(expr, |base, exp| {
        let inner = do_minus(base, |inner| Some(inner.clone()))?;
        let n = exp.as_number().filter(|n| close_to_integer(*n))?;
        let result = power(inner, exp.clone());
        if is_even(n) {
            Some((result, StepKind::EvenPowerNegative))
        } else {
            Some((minus(result), StepKind::OddPowerNegative))
        }
    })?;

    record(steps, kind, expr, &opt);
    Some(opt)
}

/// `(a^m)^n = a^(mn)`, for integer `n`.
pub fn power_of_power(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |base, exp| {
        let outer = exp.as_number().filter(|n| close_to_integer(*n))?;
        do_power(base, |inner_base, inner_exp| {
            let inner = inner_exp.as_number()?;
            Some(non_trivial_power(inner_base.clone(), Expr::number(inner * outer)))
        })
    })?;

    record(steps, StepKind::PowerOfPower, expr, &opt);
    Some(opt)
}

/// Applies all power rules.
pub fn all(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    zeroth_power(expr, steps)
        .or_else(|| first_power(expr, steps))
        .or_else(|| power_of_one(expr, steps))
        .or_else(|| evaluate_power(expr, steps))
        .or_else(|| power_of_negative(expr, steps))
        .or_else(|| power_of_power(expr, steps))
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
    fn trivial_exponents() {
        assert_eq!(zeroth_power(&power(x(), Expr::number(0.0)), &mut ()), Some(Expr::number(1.0)));
        assert_eq!(first_power(&power(x(), Expr::number(1.0)), &mut ()), Some(x()));
        assert_eq!(power_of_one(&power(Expr::number(1.0), x()), &mut ()), Some(Expr::number(1.0)));
    }

    #[test]
    fn evaluate() {
        let expr = power(Expr::number(2.0), Expr::number(10.0));
        assert_eq!(evaluate_power(&expr, &mut ()), Some(Expr::number(1024.0)));
        assert_eq!(evaluate_power(&power(Expr::e(), Expr::number(2.0)), &mut ()), None);
        assert_eq!(evaluate_power(&power(Expr::number(2.0), Expr::number(0.5)), &mut ()), None);
    }

    #[test]
    fn negative_base() {
        let even = power(minus(x()), Expr::number(2.0));
        assert_eq!(power_of_negative(&even, &mut ()), Some(power(x(), Expr::number(2.0))));

        let odd = power(minus(x()), Expr::number(3.0));
        assert_eq!(power_of_negative(&odd, &mut ()), Some(minus(power(x(), Expr::number(3.0)))));
    }

    #[test]
    fn nested_powers() {
        let expr = power(power(x(), Expr::number(2.0)), Expr::number(3.0));
        assert_eq!(power_of_power(&expr, &mut ()), Some(power(x(), Expr::number(6.0))));
    }
}
