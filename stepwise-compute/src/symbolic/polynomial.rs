//! Polynomial analysis of expressions: degrees, coefficients, and detection of squares and
//! cubes.
//!
//! The coefficient functions decompose an expression over sums, negations, products and
//! quotients with a constant denominator only. Every other operation is treated as an opaque
//! atom, so `sin(x)` has no coefficient of `x`.

use crate::primitive::{close_to_integer, int_from_f64, is_equal, is_even};
use rug::Integer;
use super::expr::{add_opt, divide, minus, non_trivial_power, non_trivial_product, power, root, sqrt, Expr, Operation};

impl Expr {
    /// Returns the degree of the expression as a polynomial in `var`, or `-1` if it is not a
    /// polynomial in `var`.
    ///
    /// No expansion is performed: the degree of a sum is the largest degree of its terms, and
    /// the degree of a product is the sum of the degrees of its factors. An operation that is not
    /// polynomial makes the whole expression non-polynomial.
    pub fn degree(&self, var: &str) -> i32 {
        if self.is_constant_in(var) {
            return 0;
        }

        match self {
            Self::Constant(_) => 0,
            Self::Variable(_) => 1,
            Self::Operation(op, operands) => match (op, operands.as_slice()) {
                (Operation::Plus, terms) => {
                    let mut max = 0;
                    for term in terms {
                        let degree = term.degree(var);
                        if degree < 0 {
                            return -1;
                        }
                        max = max.max(degree);
                    }
                    max
                },
                (Operation::Minus, [operand]) => operand.degree(var),
                (Operation::Multiply, factors) => {
                    let mut sum = 0;
                    for factor in factors {
                        let degree = factor.degree(var);
                        if degree < 0 {
                            return -1;
                        }
                        sum += degree;
                    }
                    sum
                },
                (Operation::Divide, [num, den]) if den.is_constant() => num.degree(var),
                (Operation::Power, [base, exp]) => {
                    let Some(n) = exp.as_number().filter(|n| close_to_integer(*n) && *n >= 0.0) else {
                        return -1;
                    };
                    let degree = base.degree(var);
                    if degree < 0 {
                        -1
                    } else {
                        degree * n.round() as i32
                    }
                },
                _ => -1,
            },
        }
    }

    /// Returns the sum of all terms of the expression that contain `target` as a factor, or
    /// [`None`] if there are none.
    ///
    /// `(3)(x) + (x)(y) + 2` with target `x` gives `((3)(x) + (x)(y))`.
    pub fn find_expression(&self, target: &Expr) -> Option<Expr> {
        if self == target {
            return Some(self.clone());
        }

        match self {
            Self::Operation(Operation::Multiply, factors) => {
                factors.iter().any(|factor| factor == target).then(|| self.clone())
            },
            Self::Operation(Operation::Minus, operands) if operands.len() == 1 => {
                operands[0].find_expression(target).map(minus)
            },
            Self::Operation(Operation::Plus, terms) => terms.iter()
                .map(|term| term.find_expression(target))
                .fold(None, add_opt),
            Self::Operation(Operation::Divide, operands)
                if operands.len() == 2 && operands[1].is_constant() =>
            {
                operands[0]
                    .find_expression(target)
                    .map(|num| divide(num, operands[1].clone()))
            },
            _ => None,
        }
    }

    /// Returns the coefficient of `target` in the expression, or [`None`] if `target` does not
    /// occur as a factor of any term.
    ///
    /// `(3)(x) + (x)(y) + 2` with target `x` gives `(3 + y)`.
    pub fn find_coefficient(&self, target: &Expr) -> Option<Expr> {
        if self == target {
            return Some(Expr::Constant(1.0));
        }

        match self {
            Self::Operation(Operation::Multiply, factors) => {
                let mut coefficient = None;
                let mut found = false;
                for factor in factors {
                    let part = match factor.find_coefficient(target) {
                        Some(inner) => {
                            found = true;
                            inner
                        },
                        None => factor.clone(),
                    };
                    coefficient = Some(match coefficient {
                        Some(coefficient) => non_trivial_product(coefficient, part),
                        None => part,
                    });
                }

                if found {
                    coefficient
                } else {
                    None
                }
            },
            Self::Operation(Operation::Minus, operands) if operands.len() == 1 => {
                operands[0].find_coefficient(target).map(minus)
            },
            Self::Operation(Operation::Plus, terms) => terms.iter()
                .map(|term| term.find_coefficient(target))
                .fold(None, add_opt),
            Self::Operation(Operation::Divide, operands)
                if operands.len() == 2 && operands[1].is_constant() =>
            {
                operands[0]
                    .find_coefficient(target)
                    .map(|num| divide(num, operands[1].clone()))
            },
            _ => None,
        }
    }

    /// Returns the sum of all terms of the expression that do not depend on `var`, or [`None`]
    /// if there are none.
    pub fn find_constant_in(&self, var: &str) -> Option<Expr> {
        if self.is_constant_in(var) {
            return Some(self.clone());
        }

        match self {
            Self::Operation(Operation::Minus, operands) if operands.len() == 1 => {
                operands[0].find_constant_in(var).map(minus)
            },
            Self::Operation(Operation::Plus, terms) => terms.iter()
                .map(|term| term.find_constant_in(var))
                .fold(None, add_opt),
            Self::Operation(Operation::Divide, operands)
                if operands.len() == 2 && operands[1].is_constant() =>
            {
                operands[0]
                    .find_constant_in(var)
                    .map(|num| divide(num, operands[1].clone()))
            },
            _ => None,
        }
    }

    /// Returns the coefficients of the expression as a polynomial in `var`, indexed by power.
    ///
    /// The expression is expanded first. Missing coefficients are `0`. Returns an empty list if
    /// the expression is not a polynomial in `var`.
    pub fn convert_to_polynomial(&self, var: &str) -> Vec<Expr> {
        if self.degree(var) < 0 {
            return Vec::new();
        }

        let expanded = self.expand(&mut ());
        let degree = expanded.degree(var);
        if degree < 0 {
            return Vec::new();
        }

        let x = Expr::variable(var);
        let mut coefficients = Vec::with_capacity(degree as usize + 1);
        coefficients.push(expanded.find_constant_in(var));
        for n in 1..=degree {
            let target = if n == 1 {
                x.clone()
            } else {
                power(x.clone(), Expr::Constant(n as f64))
            };
            coefficients.push(expanded.find_coefficient(&target));
        }

        coefficients.into_iter()
            .map(|coefficient| match coefficient {
                Some(coefficient) => coefficient.regroup(&mut ()),
                None => Expr::Constant(0.0),
            })
            .collect()
    }

    /// Returns the coefficients of the expression as a polynomial in `var` if all of them are
    /// integers.
    pub fn integer_coefficients(&self, var: &str) -> Option<Vec<Integer>> {
        let coefficients = self.convert_to_polynomial(var);
        if coefficients.is_empty() {
            return None;
        }

        coefficients.iter()
            .map(|coefficient| coefficient.as_number().and_then(int_from_f64))
            .collect()
    }

    /// Returns true if the expression is a square: any number, a power with an even exponent,
    /// or a product of squares.
    pub fn is_square(&self) -> bool {
        self.square_root().is_some()
    }

    /// Returns true if the expression is a cube: any number, a power with an exponent that is a
    /// multiple of `3`, the negation of a cube, or a product of cubes.
    pub fn is_cube(&self) -> bool {
        self.cube_root().is_some()
    }

    /// Returns the square root of the expression if it is a square (see [`Expr::is_square`]).
    ///
    /// The square root of a number that is not a perfect square is written as `nroot(n, 2)`. This
    /// includes negative numbers, so `-4` gives `nroot(-4, 2)`.
    pub fn square_root(&self) -> Option<Expr> {
        if let Some(value) = self.as_number() {
            let root = value.sqrt();
            return Some(if value >= 0.0 && close_to_integer(root) {
                Expr::Constant(root.round())
            } else {
                sqrt(self.clone())
            });
        }

        match self {
            Self::Operation(Operation::Power, operands) if operands.len() == 2 => {
                let n = operands[1].as_number().filter(|n| is_even(*n))?;
                Some(non_trivial_power(operands[0].clone(), Expr::number(n / 2.0)))
            },
            Self::Operation(Operation::Multiply, factors) => factors.iter()
                .map(Self::square_root)
                .collect::<Option<Vec<_>>>()
                .map(|roots| Expr::Operation(Operation::Multiply, roots)),
            _ => None,
        }
    }

    /// Returns the cube root of the expression if it is a cube (see [`Expr::is_cube`]).
    ///
    /// The cube root of a number that is not a perfect cube is written as `nroot(n, 3)`.
    pub fn cube_root(&self) -> Option<Expr> {
        if let Some(value) = self.as_number() {
            let root = value.cbrt();
            return Some(if close_to_integer(root) {
                Expr::number(root.round())
            } else {
                root_of(self.clone(), 3.0)
            });
        }

        match self {
            Self::Operation(Operation::Minus, operands) if operands.len() == 1 => {
                operands[0].cube_root().map(|root| root.negate())
            },
            Self::Operation(Operation::Power, operands) if operands.len() == 2 => {
                let n = operands[1].as_number()
                    .filter(|n| close_to_integer(*n) && is_equal(n.rem_euclid(3.0), 0.0))?;
                Some(non_trivial_power(operands[0].clone(), Expr::number(n / 3.0)))
            },
            Self::Operation(Operation::Multiply, factors) => factors.iter()
                .map(Self::cube_root)
                .collect::<Option<Vec<_>>>()
                .map(|roots| Expr::Operation(Operation::Multiply, roots)),
            _ => None,
        }
    }

    /// Returns the names of the variables in the expression, in order of first occurrence.
    pub fn variables(&self) -> Vec<String> {
        fn collect(expr: &Expr, names: &mut Vec<String>) {
            match expr {
                Expr::Variable(name) => {
                    if !names.iter().any(|seen| seen == name) {
                        names.push(name.clone());
                    }
                },
                Expr::Operation(_, operands) => {
                    for operand in operands {
                        collect(operand, names);
                    }
                },
                Expr::Constant(_) => {},
            }
        }

        let mut names = Vec::new();
        collect(self, &mut names);
        names
    }
}

/// `nroot(radicand, index)`
fn root_of(radicand: Expr, index: f64) -> Expr {
    root(radicand, Expr::Constant(index))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use crate::primitive::int;
    use crate::symbolic::expr::*;
    use super::*;

    fn x() -> Expr {
        Expr::variable("x")
    }

    fn num(n: f64) -> Expr {
        Expr::number(n)
    }

    #[test]
    fn degrees() {
        let expr = add(
            add(num(12.0), multiply(num(12.0), x())),
            multiply(num(3.0), power(x(), num(2.0))),
        );
        assert_eq!(expr.degree("x"), 2);
        assert_eq!(expr.degree("y"), 0);

        let product = multiply(power(add(x(), num(1.0)), num(3.0)), x());
        assert_eq!(product.degree("x"), 4);

        assert_eq!(divide(x(), num(2.0)).degree("x"), 1);
        assert_eq!(minus(power(x(), num(5.0))).degree("x"), 5);
    }

    #[test]
    fn non_polynomial_degrees() {
        assert_eq!(sin(x()).degree("x"), -1);
        assert_eq!(divide(num(1.0), x()).degree("x"), -1);
        assert_eq!(power(x(), num(0.5)).degree("x"), -1);
        assert_eq!(add(x(), sqrt(x())).degree("x"), -1);
        assert_eq!(multiply(sin(Expr::variable("y")), x()).degree("x"), 1);
    }

    #[test]
    fn coefficients_of_terms() {
        let y = Expr::variable("y");
        let expr = add(
            add(multiply(num(3.0), x()), multiply(x(), y.clone())),
            num(2.0),
        );
        assert_eq!(expr.find_coefficient(&x()).unwrap().to_string(), "(3 + y)");
        assert_eq!(
            expr.find_expression(&x()).unwrap().to_string(),
            "((3)(x) + (x)(y))",
        );
        assert_eq!(expr.find_constant_in("x"), Some(num(2.0)));
        assert_eq!(sin(x()).find_coefficient(&x()), None);
    }

    #[test]
    fn polynomial_coefficients() {
        let expr = multiply(add(x(), num(2.0)), add(x(), num(3.0)));
        let coefficients = expr.convert_to_polynomial("x");
        assert_eq!(coefficients, vec![num(6.0), num(5.0), num(1.0)]);
        assert_eq!(expr.integer_coefficients("x"), Some(vec![int(6), int(5), int(1)]));

        let sparse = add(power(x(), num(3.0)), minus(num(1.0)));
        assert_eq!(sparse.convert_to_polynomial("x"), vec![num(-1.0), num(0.0), num(0.0), num(1.0)]);

        assert!(sin(x()).convert_to_polynomial("x").is_empty());
        assert_eq!(add(divide(x(), num(2.0)), num(1.0)).integer_coefficients("x"), None);
    }

    #[test]
    fn squares_and_cubes() {
        assert!(num(4.0).is_square());
        assert!(num(-4.0).is_square());
        assert_eq!(num(-4.0).square_root(), Some(sqrt(num(-4.0))));
        assert!(num(-8.0).is_cube());
        assert_eq!(num(9.0).square_root(), Some(num(3.0)));
        assert_eq!(num(2.0).square_root(), Some(sqrt(num(2.0))));
        assert_eq!(num(-8.0).cube_root(), Some(num(-2.0)));

        let square = power(x(), num(4.0));
        assert_eq!(square.square_root(), Some(power(x(), num(2.0))));
        assert!(!power(x(), num(3.0)).is_square());
        assert_eq!(power(x(), num(3.0)).cube_root(), Some(x()));

        let product = multiply(num(4.0), power(x(), num(2.0)));
        assert_eq!(product.square_root().unwrap().to_string(), "(2)(x)");
        assert!(!x().is_square());
    }

    #[test]
    fn variables_in_order() {
        let expr = add(
            multiply(Expr::variable("b"), x()),
            power(Expr::variable("a"), Expr::variable("b")),
        );
        assert_eq!(expr.variables(), vec!["b", "x", "a"]);
    }

    #[test]
    fn degree_survives_expansion() {
        let mut rng = StdRng::seed_from_u64(0xde6);
        for _ in 0..50 {
            let terms = rng.gen_range(1..4);
            let mut expected = 0;
            let mut expr = None;
            for _ in 0..terms {
                let coefficient = num(rng.gen_range(1..6) as f64);
                let shift = num(rng.gen_range(1..6) as f64);
                let exponent = rng.gen_range(2..=3);
                expected = expected.max(exponent);

                let term = multiply(coefficient, power(add(x(), shift), num(exponent as f64)));
                expr = add_opt(expr, Some(term));
            }
            let Some(expr) = expr else { continue };

            assert_eq!(expr.degree("x"), expected);
            let expanded = expr.expand(&mut ());
            assert_eq!(expanded.degree("x"), expected, "{} expanded to {}", expr, expanded);
            assert_eq!(expanded.convert_to_polynomial("x").len(), expected as usize + 1);

            for point in [-2.0, 0.5, 3.0] {
                let before = expr.value_at("x", point).unwrap();
                let after = expanded.value_at("x", point).unwrap();
                assert!((before - after).abs() < 1e-6 * before.abs().max(1.0));
            }
        }
    }
}
