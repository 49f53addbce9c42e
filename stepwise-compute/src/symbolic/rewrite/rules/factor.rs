//! Factoring rules.
//!
//! These rules only apply to sums that depend on at least one variable. They are part of
//! [`Strategy::Factor`](crate::symbolic::rewrite::Strategy), where the regroup rules are applied
//! after them at every node.

use crate::primitive::int_from_f64;
use crate::symbolic::{
    expr::{minus, multiply, non_trivial_power, power, Expr, Operation},
    step::{Step, StepKind},
    step_collector::StepCollector,
};
use rug::Integer;
use super::{
    add::numeric_value,
    base_and_exponent,
    do_add,
    downgrade,
    factors_of,
    is_negated,
    record,
    split_coefficient,
    with_coefficient,
};

/// Returns the integer coefficient of a term, and its other factors.
fn integer_term(term: &Expr) -> Option<(Integer, Vec<Expr>)> {
    if numeric_value(term).is_some() {
        return Some((int_from_f64(term.as_number()?)?, Vec::new()));
    }

    let (coefficient, factors) = split_coefficient(term)?;
    Some((int_from_f64(coefficient)?, factors))
}

/// Factors out the greatest common divisor of the integer coefficients of the terms.
///
/// `6x + 9 = 3(2x + 3)`
pub fn factor_gcd(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let split = terms.iter().map(integer_term).collect::<Option<Vec<_>>>()?;
        let gcd = split.iter()
            .fold(Integer::new(), |gcd, (coefficient, _)| gcd.gcd(coefficient));
        if gcd <= 1 {
            return None;
        }

        let new_terms = split.into_iter()
            .filter_map(|(coefficient, factors)| {
                let coefficient = (coefficient / &gcd).to_f64();
                if factors.is_empty() {
                    Some(Expr::number(coefficient))
                } else {
                    with_coefficient(coefficient, factors)
                }
            })
            .collect();

        Some(multiply(Expr::Constant(gcd.to_f64()), downgrade(Operation::Plus, new_terms)))
    })?;

    record(steps, StepKind::FactorGcd, expr, &opt);
    Some(opt)
}

/// A term with its sign removed, split into factors with numeric exponents.
struct Decomposed {
    negated: bool,
    factors: Vec<Expr>,
}

impl Decomposed {
    fn new(term: &Expr) -> Self {
        let (negated, inner) = match term {
            Expr::Operation(Operation::Minus, operands) if operands.len() == 1 => (true, &operands[0]),
            _ => (false, term),
        };
        Self { negated, factors: factors_of(inner) }
    }

    /// Returns the exponent of the first factor with the given base.
    fn exponent_of(&self, base: &Expr) -> Option<f64> {
        self.factors.iter().find_map(|factor| match base_and_exponent(factor) {
            (other, Some(exp)) if other == *base && exp > 0.0 => Some(exp),
            _ => None,
        })
    }

    /// Divides the first factor with the given base by `base^exp`.
    fn remove(&mut self, base: &Expr, exp: f64) {
        let position = self.factors.iter().position(|factor| {
            matches!(base_and_exponent(factor), (other, Some(_)) if other == *base)
        });
        if let Some(i) = position {
            if let (_, Some(own)) = base_and_exponent(&self.factors[i]) {
                let rest = non_trivial_power(base.clone(), Expr::number(own - exp));
                if rest.is_number(1.0) {
                    self.factors.remove(i);
                } else {
                    self.factors[i] = rest;
                }
            }
        }
    }

    fn into_expr(self) -> Expr {
        let product = downgrade(Operation::Multiply, self.factors);
        if self.negated {
            minus(product)
        } else {
            product
        }
    }
}

/// Factors out the non-numeric factors common to every term, with the smallest exponent they
/// appear with.
///
/// `x^3 + 2x^2 = x^2(x + 2)`
pub fn factor_common(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let mut decomposed = terms.iter().map(Decomposed::new).collect::<Vec<_>>();
        let (first, rest) = decomposed.split_first()?;

        let mut common: Vec<(Expr, f64)> = Vec::new();
        for factor in &first.factors {
            let (base, Some(exp)) = base_and_exponent(factor) else {
                continue;
            };
            if base.as_number().is_some() || exp <= 0.0 {
                continue;
            }
            if common.iter().any(|(seen, _)| *seen == base) {
                continue;
            }

            let mut min = exp;
            let mut everywhere = true;
            for other in rest {
                match other.exponent_of(&base) {
                    Some(other_exp) => min = min.min(other_exp),
                    None => {
                        everywhere = false;
                        break;
                    },
                }
            }

            if everywhere {
                common.push((base, min));
            }
        }

        if common.is_empty() {
            return None;
        }

        for term in &mut decomposed {
            for (base, exp) in &common {
                term.remove(base, *exp);
            }
        }

        let mut factors = common.into_iter()
            .map(|(base, exp)| non_trivial_power(base, Expr::number(exp)))
            .collect::<Vec<_>>();
        factors.push(Expr::Operation(
            Operation::Plus,
            decomposed.into_iter().map(Decomposed::into_expr).collect(),
        ));
        Some(Expr::Operation(Operation::Multiply, factors))
    })?;

    record(steps, StepKind::FactorCommon, expr, &opt);
    Some(opt)
}

/// Factors a negation out of a sum whose terms are all negated.
///
/// `-a - b = -(a + b)`
pub fn factor_minus(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        if !terms.iter().all(is_negated) {
            return None;
        }

        Some(minus(Expr::Operation(
            Operation::Plus,
            terms.iter().map(Expr::negate).collect(),
        )))
    })?;

    record(steps, StepKind::FactorMinus, expr, &opt);
    Some(opt)
}

/// Splits a two-term sum into its positive term and the magnitude of its negated term.
fn positive_and_negated(terms: &[Expr]) -> Option<(&Expr, Expr)> {
    match terms {
        [a, b] if !is_negated(a) && is_negated(b) => Some((a, b.negate())),
        [a, b] if is_negated(a) && !is_negated(b) => Some((b, a.negate())),
        _ => None,
    }
}

/// `a^2 - b^2 = (a + b)(a - b)`
pub fn difference_of_squares(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let (a, b) = positive_and_negated(terms)?;
        if a.is_negative() || b.is_negative() {
            return None;
        }
        let a = a.square_root()?;
        let b = b.square_root()?;

        Some(multiply(
            Expr::Operation(Operation::Plus, vec![a.clone(), b.clone()]),
            Expr::Operation(Operation::Plus, vec![a, minus(b)]),
        ))
    })?;

    record(steps, StepKind::DifferenceOfSquaresFactor, expr, &opt);
    Some(opt)
}

/// `a^3 + b^3 = (a + b)(a^2 - ab + b^2)`
pub fn sum_of_cubes(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let [a, b] = terms else {
            return None;
        };
        if is_negated(a) || is_negated(b) || (a.is_constant() && b.is_constant()) {
            return None;
        }

        let a = a.cube_root()?;
        let b = b.cube_root()?;
        Some(multiply(
            Expr::Operation(Operation::Plus, vec![a.clone(), b.clone()]),
            Expr::Operation(Operation::Plus, vec![
                power(a.clone(), Expr::Constant(2.0)),
                minus(multiply(a, b.clone())),
                power(b, Expr::Constant(2.0)),
            ]),
        ))
    })?;

    record(steps, StepKind::SumOfCubes, expr, &opt);
    Some(opt)
}

/// `a^3 - b^3 = (a - b)(a^2 + ab + b^2)`
pub fn difference_of_cubes(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let (a, b) = positive_and_negated(terms)?;
        if a.is_constant() && b.is_constant() {
            return None;
        }

        let a = a.cube_root()?;
        let b = b.cube_root()?;
        Some(multiply(
            Expr::Operation(Operation::Plus, vec![a.clone(), minus(b.clone())]),
            Expr::Operation(Operation::Plus, vec![
                power(a.clone(), Expr::Constant(2.0)),
                multiply(a, b.clone()),
                power(b, Expr::Constant(2.0)),
            ]),
        ))
    })?;

    record(steps, StepKind::DifferenceOfCubesFactor, expr, &opt);
    Some(opt)
}

/// `a^2 + 2ab + b^2 = (a + b)^2`
/// `a^2 - 2ab + b^2 = (a - b)^2`
pub fn binomial_squared(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let (opt, kind) = do_add(expr, |terms| {
        if terms.len() != 3 {
            return None;
        }

        for (i, j, k) in [(0, 1, 2), (0, 2, 1), (1, 2, 0)] {
            if terms[i].is_negative() || terms[j].is_negative() {
                continue;
            }
            let (Some(a), Some(b)) = (terms[i].square_root(), terms[j].square_root()) else {
                continue;
            };

            let twice = multiply(multiply(Expr::Constant(2.0), a.clone()), b.clone()).regroup(&mut ());
            let middle = &terms[k];
            if middle.regroup(&mut ()) == twice {
                let sum = Expr::Operation(Operation::Plus, vec![a, b]);
                return Some((power(sum, Expr::Constant(2.0)), StepKind::BinomSquaredSumFactor));
            }
            if is_negated(middle) && middle.negate().regroup(&mut ()) == twice {
                let difference = Expr::Operation(Operation::Plus, vec![a, minus(b)]);
                return Some((power(difference, Expr::Constant(2.0)), StepKind::BinomSquaredDiffFactor));
            }
        }

        None
    })?;

    record(steps, kind, expr, &opt);
    Some(opt)
}

/// `x - r`, or `x` if `r` is zero.
fn linear(x: &Expr, r: &Integer) -> Expr {
    if r.is_zero() {
        x.clone()
    } else {
        Expr::Operation(Operation::Plus, vec![x.clone(), Expr::number(-r.to_f64())])
    }
}

/// Factors a quadratic polynomial in a single variable with integer coefficients and integer
/// roots.
///
/// `x^2 + 5x + 6 = (x + 2)(x + 3)`
pub fn factor_polynomial(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |_| {
        let variables = expr.variables();
        let [var] = variables.as_slice() else {
            return None;
        };
        if expr.degree(var) != 2 {
            return None;
        }

        let coefficients = expr.integer_coefficients(var)?;
        let [c, b, a] = coefficients.as_slice() else {
            return None;
        };
        if a.is_zero() {
            return None;
        }

        let discriminant = Integer::from(b * b) - Integer::from(4) * a * c;
        if discriminant < 0 || !discriminant.is_perfect_square() {
            return None;
        }

        let root = discriminant.sqrt();
        let two_a = Integer::from(2) * a;
        let first = -b.clone() + &root;
        let second = -b.clone() - &root;
        if !first.is_divisible(&two_a) || !second.is_divisible(&two_a) {
            return None;
        }
        let first = first / &two_a;
        let second = second / &two_a;

        let x = Expr::variable(var.clone());
        let mut factors = Vec::with_capacity(3);
        if *a != 1 {
            factors.push(Expr::number(a.to_f64()));
        }
        if first == second {
            factors.push(power(linear(&x, &first), Expr::Constant(2.0)));
        } else {
            factors.push(linear(&x, &first));
            factors.push(linear(&x, &second));
        }
        Some(downgrade(Operation::Multiply, factors))
    })?;

    record(steps, StepKind::FactorPolynomial, expr, &opt);
    Some(opt)
}

/// Applies all factoring rules.
pub fn all(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    if !expr.is_operation(Operation::Plus) || expr.operands().len() < 2 || expr.is_constant() {
        return None;
    }

    factor_gcd(expr, steps)
        .or_else(|| factor_common(expr, steps))
        .or_else(|| factor_minus(expr, steps))
        .or_else(|| difference_of_squares(expr, steps))
        .or_else(|| sum_of_cubes(expr, steps))
        .or_else(|| difference_of_cubes(expr, steps))
        .or_else(|| binomial_squared(expr, steps))
        .or_else(|| factor_polynomial(expr, steps))
}
