//! Rewrite rules for roots.

use crate::primitive::{close_to_integer, is_equal, is_even, is_odd};
use crate::symbolic::{
    expr::{abs, minus, root, Expr},
    step::{Step, StepKind},
    step_collector::StepCollector,
};
use super::{do_minus, do_power, do_root, record};

/// `nroot(a, 1) = a`
pub fn first_root(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_root(expr, |radicand, index| index.is_number(1.0).then(|| radicand.clone()))?;
    record(steps, StepKind::FirstRoot, expr, &opt);
    Some(opt)
}

/// `nroot(1, n) = 1`
pub fn root_of_one(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_root(expr, |radicand, _| radicand.is_number(1.0).then(|| Expr::Constant(1.0)))?;
    record(steps, StepKind::RootOfOne, expr, &opt);
    Some(opt)
}

/// Evaluates the root of a non-negative integer if the result is an integer.
///
/// `nroot(8, 3) = 2`
pub fn evaluate_root(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_root(expr, |radicand, index| {
        let radicand = radicand.as_constant().filter(|r| close_to_integer(*r) && *r >= 0.0)?;
        let index = index.as_number().filter(|n| close_to_integer(*n) && *n >= 2.0)?;

        let result = radicand.powf(index.recip()).round();
        is_equal(result.powf(index), radicand).then(|| Expr::Constant(result))
    })?;

    record(steps, StepKind::EvaluateRoot, expr, &opt);
    Some(opt)
}

/// `nroot(-a, n) = -nroot(a, n)` for odd `n`
pub fn odd_root_of_negative(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_root(expr, |radicand, index| {
        if !index.as_number().map(is_odd).unwrap_or(false) {
            return None;
        }
        do_minus(radicand, |inner| Some(minus(root(inner.clone(), index.clone()))))
    })?;

    record(steps, StepKind::OddRootOfNegative, expr, &opt);
    Some(opt)
}

/// Cancels a root and a power with the same integer index.
///
/// `nroot(a^n, n) = a` for odd `n`
/// `nroot(a^n, n) = |a|` for even `n`
/// `nroot(a, n)^n = a`
pub fn reduce_root_and_power(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let same_index = |a: &Expr, b: &Expr| {
        a.as_number()
            .zip(b.as_number())
            .map(|(a, b)| close_to_integer(a) && a >= 2.0 && is_equal(a, b))
            .unwrap_or(false)
    };

    let (opt, kind) = do_root(expr, |radicand, index| {
        do_power(radicand, |base, exp| {
            if !same_index(exp, index) {
                return None;
            }

            if index.as_number().map(is_even).unwrap_or(false) {
                Some((abs(base.clone()), StepKind::ReduceRootAndPowerEven))
            } else {
                Some((base.clone(), StepKind::ReduceRootAndPower))
            }
        })
    })
    .or_else(|| do_power(expr, |base, exp| {
        do_root(base, |radicand, index| {
            same_index(exp, index).then(|| (radicand.clone(), StepKind::ReduceRootAndPower))
        })
    }))?;

    record(steps, kind, expr, &opt);
    Some(opt)
}

/// Applies all root rules.
pub fn all(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    first_root(expr, steps)
        .or_else(|| root_of_one(expr, steps))
        .or_else(|| evaluate_root(expr, steps))
        .or_else(|| odd_root_of_negative(expr, steps))
        .or_else(|| reduce_root_and_power(expr, steps))
}
