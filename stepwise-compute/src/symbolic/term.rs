//! Decomposition of a single term into its coefficient and the rest of its factors.
//!
//! A term is split over negations and products only, with quotients by an independent
//! denominator kept on the coefficient side. Sums are never split, so `(3)(x) + y` is a term
//! with no coefficient.

use crate::primitive::{close_to_integer, is_equal};
use super::{
    expr::{divide, minus, non_trivial_power, non_trivial_product, root, Expr, Operation},
    rewrite::rules::{downgrade, split_coefficient},
};

/// Multiplies an optional accumulator by `factor`.
fn product_opt(acc: Option<Expr>, factor: Expr) -> Expr {
    match acc {
        Some(acc) => non_trivial_product(acc, factor),
        None => factor,
    }
}

impl Expr {
    /// Splits the term into the factors for which `independent` holds and the remaining factors.
    /// A missing side is [`None`].
    fn split_term(&self, independent: &dyn Fn(&Expr) -> bool) -> (Option<Expr>, Option<Expr>) {
        match self {
            Self::Operation(Operation::Minus, operands) if operands.len() == 1 => {
                let (coefficient, rest) = operands[0].split_term(independent);
                let coefficient = match coefficient {
                    Some(coefficient) => minus(coefficient),
                    None => Expr::number(-1.0),
                };
                (Some(coefficient), rest)
            },
            Self::Operation(Operation::Multiply, factors) => {
                let mut coefficient = None;
                let mut rest = None;
                for factor in factors {
                    let (c, r) = factor.split_term(independent);
                    if let Some(c) = c {
                        coefficient = Some(product_opt(coefficient, c));
                    }
                    if let Some(r) = r {
                        rest = Some(product_opt(rest, r));
                    }
                }
                (coefficient, rest)
            },
            Self::Operation(Operation::Divide, operands)
                if operands.len() == 2 && independent(&operands[1]) && !independent(&operands[0]) =>
            {
                let (coefficient, rest) = operands[0].split_term(independent);
                let coefficient = coefficient.unwrap_or(Expr::Constant(1.0));
                (Some(divide(coefficient, operands[1].clone())), rest)
            },
            _ if independent(self) => (Some(self.clone()), None),
            _ => (None, Some(self.clone())),
        }
    }

    /// Returns the factors of the term that contain no variable, or `1` if there are none.
    ///
    /// `(3)(nroot(3, 2))(x)` gives `(3)(nroot(3, 2))`.
    pub fn coefficient(&self) -> Expr {
        self.split_term(&Self::is_constant).0.unwrap_or(Expr::Constant(1.0))
    }

    /// Returns the factors of the term that contain a variable, or [`None`] if the term is
    /// constant.
    ///
    /// `(3)(x)((1)/(nroot(x, 2)))` gives `(x)((1)/(nroot(x, 2)))`.
    pub fn variable_part(&self) -> Option<Expr> {
        self.split_term(&Self::is_constant).1
    }

    /// Returns the factors of the term that do not depend on `var`, or `1` if there are none.
    ///
    /// `(2)(y)(x)` with `var = x` gives `(2)(y)`.
    pub fn coefficient_in(&self, var: &str) -> Expr {
        self.split_term(&|expr: &Expr| expr.is_constant_in(var)).0.unwrap_or(Expr::Constant(1.0))
    }

    /// Returns the factors of the term that depend on `var`, or [`None`] if the term does not
    /// depend on `var`.
    pub fn variable_part_in(&self, var: &str) -> Option<Expr> {
        self.split_term(&|expr: &Expr| expr.is_constant_in(var)).1
    }

    /// Returns the plain numeric factor of the term, or [`None`] if the numeric factor is `1`.
    ///
    /// `(3)(nroot(3, 2))` gives `3`, and `-x` gives `-1`. A number is its own numeric factor.
    pub fn integer_coefficient(&self) -> Option<Expr> {
        if self.as_number().is_some() {
            return Some(self.clone());
        }

        let (coefficient, _) = split_coefficient(self)?;
        (!is_equal(coefficient, 1.0)).then(|| Expr::number(coefficient))
    }

    /// Returns the term without its plain numeric factor, or [`None`] if the term is a number.
    ///
    /// `(3)(nroot(3, 2))` gives `nroot(3, 2)`.
    pub fn non_integer(&self) -> Option<Expr> {
        if self.as_number().is_some() {
            return None;
        }

        match split_coefficient(self) {
            Some((_, factors)) => Some(downgrade(Operation::Multiply, factors)),
            None => Some(self.clone()),
        }
    }

    /// Returns the denominator of the expression if it is an integer.
    ///
    /// Constants without a denominator give `1`. Quotients whose denominator is not an integer,
    /// and expressions containing variables, give [`None`].
    pub fn constant_denominator(&self) -> Option<i64> {
        match self {
            Self::Operation(Operation::Minus, operands) if operands.len() == 1 => {
                operands[0].constant_denominator()
            },
            Self::Operation(Operation::Divide, operands) if operands.len() == 2 => operands[1]
                .value()
                .filter(|value| close_to_integer(*value))
                .map(|value| value.round() as i64),
            _ if self.is_constant() => Some(1),
            _ => None,
        }
    }

    /// Decomposes the term into bases and the exponents they are raised to.
    ///
    /// Factors of a quotient's denominator get negated exponents, and a negation contributes a
    /// base of `-1`. Factors that are not powers have an exponent of `1`.
    ///
    /// `((x)^(2))(y)/((z)^(3))` gives `[(x, 2), (y, 1), (z, -3)]`.
    pub fn bases_and_exponents(&self) -> Vec<(Expr, Expr)> {
        fn collect(expr: &Expr, exponent: Option<&Expr>, out: &mut Vec<(Expr, Expr)>) {
            match expr {
                Expr::Operation(Operation::Multiply, factors) => {
                    for factor in factors {
                        collect(factor, exponent, out);
                    }
                },
                Expr::Operation(Operation::Minus, operands)
                    if operands.len() == 1 && !operands[0].non_special_constant() =>
                {
                    out.push((Expr::number(-1.0), Expr::Constant(1.0)));
                    collect(&operands[0], exponent, out);
                },
                Expr::Operation(Operation::Divide, operands) if operands.len() == 2 => {
                    collect(&operands[0], exponent, out);
                    let negated = match exponent {
                        Some(exponent) => minus(exponent.clone()),
                        None => Expr::number(-1.0),
                    };
                    collect(&operands[1], Some(&negated), out);
                },
                Expr::Operation(Operation::Power, operands) if operands.len() == 2 => {
                    let exponent = match exponent {
                        Some(exponent) => non_trivial_product(exponent.clone(), operands[1].clone()),
                        None => operands[1].clone(),
                    };
                    out.push((operands[0].clone(), exponent));
                },
                _ => {
                    let exponent = exponent.cloned().unwrap_or(Expr::Constant(1.0));
                    out.push((expr.clone(), exponent));
                },
            }
        }

        let mut out = Vec::new();
        collect(self, None, &mut out);
        out
    }
}

/// Multiplies `fraction` by `base ^ exponent`, placing the new factor in the numerator or the
/// denominator depending on the sign of the exponent.
///
/// Exponents of the form `1/n` are written as an `n`th root. A missing `fraction` is `1`.
///
/// - `((x + 1))/(x)` times `(x + 1)^1` gives `(((x + 1))((x + 1)))/(x)`
/// - `((x + 1))/((x)((x + 1)))` times `x^-1` gives `((x + 1))/((x)((x + 1))(x))`
pub fn make_fraction(fraction: Option<Expr>, base: Expr, exponent: Expr) -> Expr {
    let (mut numerator, mut denominator) = match fraction {
        Some(Expr::Operation(Operation::Divide, mut operands)) if operands.len() == 2 => {
            let den = operands.pop();
            let num = operands.pop();
            (num, den)
        },
        fraction => (fraction, None),
    };

    let value = exponent.value();
    let root_index = value
        .map(|value| 1.0 / value)
        .filter(|index| close_to_integer(*index) && !is_equal(index.abs(), 1.0))
        .map(|index| Expr::Constant(index.abs().round()));

    match value {
        Some(value) if value < 0.0 => {
            let factor = match root_index {
                Some(index) => root(base, index),
                None => non_trivial_power(base, exponent.negate()),
            };
            denominator = Some(product_opt(denominator, factor));
        },
        _ => {
            let factor = match root_index {
                Some(index) => root(base, index),
                None => non_trivial_power(base, exponent),
            };
            numerator = Some(product_opt(numerator, factor));
        },
    }

    match (numerator, denominator) {
        (Some(num), Some(den)) => divide(num, den),
        (Some(num), None) => num,
        (None, Some(den)) => divide(Expr::Constant(1.0), den),
        (None, None) => Expr::Constant(1.0),
    }
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
    fn coefficient_and_variable_part() {
        let term = multiply(multiply(num(3.0), sqrt(num(3.0))), x());
        assert_eq!(term.coefficient(), multiply(num(3.0), sqrt(num(3.0))));
        assert_eq!(term.variable_part(), Some(x()));

        let term = multiply(multiply(num(3.0), x()), divide(num(1.0), sqrt(x())));
        assert_eq!(term.coefficient(), num(3.0));
        assert_eq!(term.variable_part(), Some(multiply(x(), divide(num(1.0), sqrt(x())))));

        assert_eq!(num(5.0).coefficient(), num(5.0));
        assert_eq!(num(5.0).variable_part(), None);
        assert_eq!(sin(x()).coefficient(), num(1.0));
    }

    #[test]
    fn negated_term() {
        let term = minus(multiply(num(2.0), x()));
        assert_eq!(term.coefficient(), num(-2.0));
        assert_eq!(term.variable_part(), Some(x()));

        assert_eq!(minus(x()).coefficient(), num(-1.0));
        assert_eq!(minus(x()).variable_part(), Some(x()));
    }

    #[test]
    fn coefficient_in_variable() {
        let term = multiply(multiply(num(2.0), y()), x());
        assert_eq!(term.coefficient_in("x"), multiply(num(2.0), y()));
        assert_eq!(term.variable_part_in("x"), Some(x()));
        assert_eq!(term.coefficient(), num(2.0));
        assert_eq!(term.variable_part(), Some(multiply(y(), x())));

        let quotient = divide(multiply(num(3.0), x()), y());
        assert_eq!(quotient.coefficient_in("x"), divide(num(3.0), y()));
        assert_eq!(quotient.variable_part_in("x"), Some(x()));

        assert_eq!(add(x(), y()).coefficient_in("x"), num(1.0));
        assert_eq!(add(x(), y()).variable_part_in("x"), Some(add(x(), y())));
    }

    #[test]
    fn numeric_factor() {
        let term = multiply(num(3.0), sqrt(num(3.0)));
        assert_eq!(term.integer_coefficient(), Some(num(3.0)));
        assert_eq!(term.non_integer(), Some(sqrt(num(3.0))));

        let term = multiply(multiply(num(2.0), x()), multiply(num(5.0), y()));
        assert_eq!(term.integer_coefficient(), Some(num(10.0)));
        assert_eq!(term.non_integer(), Some(multiply(x(), y())));

        assert_eq!(minus(x()).integer_coefficient(), Some(num(-1.0)));
        assert_eq!(x().integer_coefficient(), None);
        assert_eq!(x().non_integer(), Some(x()));
        assert_eq!(num(-7.0).integer_coefficient(), Some(num(-7.0)));
        assert_eq!(num(-7.0).non_integer(), None);
    }

    #[test]
    fn denominators() {
        assert_eq!(divide(num(3.0), num(4.0)).constant_denominator(), Some(4));
        assert_eq!(minus(divide(num(1.0), num(6.0))).constant_denominator(), Some(6));
        assert_eq!(num(5.0).constant_denominator(), Some(1));
        assert_eq!(Expr::pi().constant_denominator(), Some(1));
        assert_eq!(divide(num(1.0), sqrt(num(2.0))).constant_denominator(), None);
        assert_eq!(divide(num(1.0), x()).constant_denominator(), None);
        assert_eq!(x().constant_denominator(), None);
    }

    #[test]
    fn bases_and_exponents_of_quotient() {
        let z = Expr::variable("z");
        let term = divide(
            multiply(power(x(), num(2.0)), y()),
            power(z.clone(), num(3.0)),
        );
        assert_eq!(term.bases_and_exponents(), vec![
            (x(), num(2.0)),
            (y(), num(1.0)),
            (z, num(-3.0)),
        ]);
    }

    #[test]
    fn bases_and_exponents_of_negation() {
        assert_eq!(minus(multiply(num(2.0), x())).bases_and_exponents(), vec![
            (num(-1.0), num(1.0)),
            (num(2.0), num(1.0)),
            (x(), num(1.0)),
        ]);
        assert_eq!(num(-3.0).bases_and_exponents(), vec![(num(-3.0), num(1.0))]);
    }

    #[test]
    fn fractions_from_powers() {
        let x_plus_one = || add(x(), num(1.0));

        let fraction = divide(x_plus_one(), x());
        assert_eq!(
            make_fraction(Some(fraction), x_plus_one(), num(1.0)),
            divide(multiply(x_plus_one(), x_plus_one()), x()),
        );

        let fraction = divide(x_plus_one(), multiply(x(), x_plus_one()));
        assert_eq!(
            make_fraction(Some(fraction), x(), num(-1.0)),
            divide(x_plus_one(), multiply(multiply(x(), x_plus_one()), x())),
        );
    }

    #[test]
    fn fractional_exponents_become_roots() {
        assert_eq!(make_fraction(None, x(), num(0.5)), sqrt(x()));
        assert_eq!(make_fraction(Some(y()), x(), num(-0.5)), divide(y(), sqrt(x())));
        assert_eq!(
            make_fraction(Some(y()), x(), num(3.0)),
            multiply(y(), power(x(), num(3.0))),
        );
        assert_eq!(make_fraction(None, x(), num(-2.0)), divide(num(1.0), power(x(), num(2.0))));

        let value = make_fraction(Some(divide(num(3.0), x())), x(), num(1.0 / 3.0))
            .value_at("x", 8.0)
            .unwrap();
        assert!((value - 0.75).abs() < 1e-12);
    }
}
