//! An immutable tree representation of mathematical expressions.
//!
//! An [`Expr`] is either a numeric [`Expr::Constant`], a named [`Expr::Variable`], or an
//! [`Expr::Operation`] tagged with one of a fixed set of [`Operation`]s. All submodules of
//! [`crate::symbolic`] work on this type, and every transformation returns a new tree.
//!
//! # Construction
//!
//! Expressions are built with the free functions of this module ([`add`], [`multiply`],
//! [`power`], ...). These do **not** simplify anything, with two exceptions:
//!
//! - [`add`] and [`multiply`] flatten nested sums and products, so `x + (y + z)` is a single
//! [`Operation::Plus`] node with three operands.
//! - [`non_trivial_product`] and [`non_trivial_power`] apply the identity simplifications
//! (multiplying by `1` / `-1`, raising to the power `0` / `1`).
//!
//! Everything else is left to the rewrite engine (see [`crate::symbolic::rewrite`]).
//!
//! # Equality
//!
//! [`PartialEq`] implements **structural** equality: two expressions are equal if they have the
//! same shape, the same operation tags and equal operands in the same order. `x + 1` and `1 + x`
//! are not equal. Constants compare within [`EPSILON`](crate::primitive::EPSILON).
//!
//! # Printing
//!
//! The [`Display`](std::fmt::Display) implementation prints the fully parenthesised form used
//! by the step renderer, for example `(12 + (12)(x) + (3)((x)^(2)))`.

pub mod consts;
mod iter;
mod value;

use crate::primitive::{close_to_integer, is_equal};
use std::{f64::consts::{E, PI}, fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use iter::Operands;

/// The operation tag of an [`Expr::Operation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operation {
    /// Sum of any number of terms.
    Plus,

    /// Negation of a single operand.
    Minus,

    /// Product of any number of factors.
    Multiply,

    /// Quotient of a numerator and a denominator.
    Divide,

    /// A base raised to an exponent.
    Power,

    /// The root of a radicand with the given index, `nroot(radicand, index)`.
    NRoot,

    Sin,
    Cos,
    Tan,
    Arcsin,
    Arccos,
    Arctan,

    /// Logarithm of an argument in the given base, `log_(base)(argument)`.
    Log,

    /// Absolute value.
    Abs,
}

impl Operation {
    /// Returns the name of the operation as it appears in printed expressions and error
    /// messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Power => "^",
            Self::NRoot => "nroot",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Arcsin => "arcsin",
            Self::Arccos => "arccos",
            Self::Arctan => "arctan",
            Self::Log => "log",
            Self::Abs => "abs",
        }
    }

    /// Returns true if the operation is one of `sin`, `cos` or `tan`.
    pub fn is_trigonometric(self) -> bool {
        matches!(self, Self::Sin | Self::Cos | Self::Tan)
    }

    /// Returns true if the operation is one of `arcsin`, `arccos` or `arctan`.
    pub fn is_inverse_trigonometric(self) -> bool {
        matches!(self, Self::Arcsin | Self::Arccos | Self::Arctan)
    }

    /// Returns the inverse of a trigonometric function, or the trigonometric function of an
    /// inverse trigonometric function.
    pub fn inverse(self) -> Option<Self> {
        Some(match self {
            Self::Sin => Self::Arcsin,
            Self::Cos => Self::Arccos,
            Self::Tan => Self::Arctan,
            Self::Arcsin => Self::Sin,
            Self::Arccos => Self::Cos,
            Self::Arctan => Self::Tan,
            _ => return None,
        })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A mathematical expression.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A numeric value. Negative numbers are usually represented as
    /// `Operation(Minus, [Constant(|v|)])`, see [`Expr::number`].
    Constant(f64),

    /// A named symbol, such as `x`.
    Variable(String),

    /// An operation applied to an ordered list of operands.
    Operation(Operation, Vec<Expr>),
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Constant(lhs), Self::Constant(rhs)) => {
                is_equal(*lhs, *rhs)
                    || (lhs.is_infinite() && lhs == rhs)
                    || (lhs.is_nan() && rhs.is_nan())
            },
            (Self::Variable(lhs), Self::Variable(rhs)) => lhs == rhs,
            (Self::Operation(lhs_op, lhs), Self::Operation(rhs_op, rhs)) => {
                lhs_op == rhs_op && lhs == rhs
            },
            _ => false,
        }
    }
}

/// Writes a constant, printing the special constants by name and integers without a decimal
/// point.
fn fmt_constant(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if is_equal(value, PI) {
        write!(f, "π")
    } else if is_equal(value, E) {
        write!(f, "e")
    } else if value.is_infinite() {
        write!(f, "{}∞", if value < 0.0 { "-" } else { "" })
    } else if close_to_integer(value) && value.abs() < 1e15 {
        write!(f, "{}", value.round() as i64)
    } else {
        write!(f, "{}", value)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => fmt_constant(*value, f),
            Self::Variable(name) => write!(f, "{}", name),
            Self::Operation(op, operands) => match (op, operands.as_slice()) {
                (Operation::Plus, operands) => {
                    write!(f, "(")?;
                    let mut iter = operands.iter();
                    if let Some(term) = iter.next() {
                        write!(f, "{}", term)?;
                        for term in iter {
                            if term.is_operation(Operation::Minus) {
                                write!(f, "{}", term)?;
                            } else {
                                write!(f, " + {}", term)?;
                            }
                        }
                    }
                    write!(f, ")")
                },
                (Operation::Minus, [operand]) => write!(f, "-{}", operand),
                (Operation::Multiply, factors) => {
                    for factor in factors {
                        write!(f, "({})", factor)?;
                    }
                    Ok(())
                },
                (Operation::Divide, [num, den]) => write!(f, "({})/({})", num, den),
                (Operation::Power, [base, exp]) => write!(f, "({})^({})", base, exp),
                (Operation::NRoot, [radicand, index]) => write!(f, "nroot({}, {})", radicand, index),
                (Operation::Log, [base, arg]) => write!(f, "log_({})({})", base, arg),
                (Operation::Abs, [operand]) => write!(f, "|{}|", operand),
                (op, args) => {
                    write!(f, "{}(", op.name())?;
                    let mut iter = args.iter();
                    if let Some(arg) = iter.next() {
                        write!(f, "{}", arg)?;
                        for arg in iter {
                            write!(f, ", {}", arg)?;
                        }
                    }
                    write!(f, ")")
                },
            },
        }
    }
}

impl Expr {
    /// Creates a constant with the given value. Negative values are represented as the
    /// [`Operation::Minus`] of their absolute value.
    pub fn number(value: f64) -> Self {
        if value < 0.0 {
            minus(Self::Constant(-value))
        } else {
            Self::Constant(value)
        }
    }

    /// Creates a variable with the given name.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// The constant `π`.
    pub fn pi() -> Self {
        Self::Constant(PI)
    }

    /// Euler's number `e`.
    pub fn e() -> Self {
        Self::Constant(E)
    }

    /// Returns an iterator over the direct operands of this expression.
    pub fn operands(&self) -> Operands<'_> {
        Operands::new(self)
    }

    /// If the expression is an operation, returns its tag.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Operation(op, _) => Some(*op),
            _ => None,
        }
    }

    /// If the expression is an operation, returns its tag and operands.
    pub fn as_operation(&self) -> Option<(Operation, &[Expr])> {
        match self {
            Self::Operation(op, operands) => Some((*op, operands)),
            _ => None,
        }
    }

    /// Returns true if the expression is an operation with the given tag.
    pub fn is_operation(&self, op: Operation) -> bool {
        self.operation() == Some(op)
    }

    /// Returns the operand at the given index, if the expression is an operation with enough
    /// operands.
    pub fn operand(&self, index: usize) -> Option<&Expr> {
        match self {
            Self::Operation(_, operands) => operands.get(index),
            _ => None,
        }
    }

    /// If the expression is a [`Expr::Constant`], returns its value.
    pub fn as_constant(&self) -> Option<f64> {
        match self {
            Self::Constant(value) => Some(*value),
            _ => None,
        }
    }

    /// If the expression is a [`Expr::Variable`], returns its name.
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Self::Variable(name) => Some(name),
            _ => None,
        }
    }

    /// If the expression is a plain numeric literal (see [`Expr::non_special_constant`]),
    /// returns its value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Constant(value) if !is_special(*value) && value.is_finite() => Some(*value),
            Self::Operation(Operation::Minus, operands) => match operands.as_slice() {
                [operand] => operand.as_number().map(|value| -value),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns true if the expression is a plain numeric literal: a constant other than `π`,
    /// `e` and infinity, or the negation of one.
    pub fn non_special_constant(&self) -> bool {
        self.as_number().is_some()
    }

    /// Returns true if the expression is `π` or `e`.
    pub fn special_constant(&self) -> bool {
        matches!(self, Self::Constant(value) if is_special(*value))
    }

    /// Returns true if the expression is a plain numeric literal with an integer value.
    pub fn is_integer(&self) -> bool {
        self.as_number().map(close_to_integer).unwrap_or(false)
    }

    /// Returns true if the expression is the plain numeric literal with the given value.
    pub fn is_number(&self, value: f64) -> bool {
        self.as_number().map(|n| is_equal(n, value)).unwrap_or(false)
    }

    /// Returns true if no variable occurs anywhere in the expression.
    pub fn is_constant(&self) -> bool {
        match self {
            Self::Constant(_) => true,
            Self::Variable(_) => false,
            Self::Operation(_, operands) => operands.iter().all(Self::is_constant),
        }
    }

    /// Returns true if the given variable does not occur anywhere in the expression.
    pub fn is_constant_in(&self, var: &str) -> bool {
        match self {
            Self::Constant(_) => true,
            Self::Variable(name) => name != var,
            Self::Operation(_, operands) => operands.iter().all(|op| op.is_constant_in(var)),
        }
    }

    /// Returns true if the expression is negative at the top level: a negation, a negative
    /// constant, or a product whose first factor is negative.
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Constant(value) => *value < 0.0,
            Self::Operation(Operation::Minus, _) => true,
            Self::Operation(Operation::Multiply, factors) => {
                factors.first().map(Self::is_negative).unwrap_or(false)
            },
            _ => false,
        }
    }

    /// Returns the negation of this expression, removing an existing negation instead of adding
    /// a second one where possible.
    ///
    /// - `-a` -> `a`
    /// - `(-2)(x)` -> `(2)(x)`
    /// - `(-a)/(b)` -> `(a)/(b)`
    /// - `a` -> `-a`
    pub fn negate(&self) -> Self {
        match self {
            Self::Constant(value) => Self::number(-value),
            Self::Operation(Operation::Minus, operands) if operands.len() == 1 => {
                operands[0].clone()
            },
            Self::Operation(Operation::Multiply, factors)
                if factors.first().map(Self::is_negative).unwrap_or(false) =>
            {
                let first = factors[0].negate();
                let mut new_factors = Vec::with_capacity(factors.len());
                if !first.is_number(1.0) || factors.len() == 1 {
                    new_factors.push(first);
                }
                new_factors.extend(factors[1..].iter().cloned());
                if new_factors.len() == 1 {
                    new_factors.remove(0)
                } else {
                    Self::Operation(Operation::Multiply, new_factors)
                }
            },
            Self::Operation(Operation::Divide, operands)
                if operands.len() == 2 && operands[0].is_negative() =>
            {
                divide(operands[0].negate(), operands[1].clone())
            },
            _ => minus(self.clone()),
        }
    }

    /// Returns true if the expression is a square root.
    pub fn is_square_root(&self) -> bool {
        match self {
            Self::Operation(Operation::NRoot, operands) => {
                operands.get(1).map(|index| index.is_number(2.0)).unwrap_or(false)
            },
            _ => false,
        }
    }

    /// Returns true if the expression is `sin`, `cos` or `tan` of something.
    pub fn is_trigonometric(&self) -> bool {
        self.operation().map(Operation::is_trigonometric).unwrap_or(false)
    }

    /// Returns true if the expression is `arcsin`, `arccos` or `arctan` of something.
    pub fn is_inverse_trigonometric(&self) -> bool {
        self.operation().map(Operation::is_inverse_trigonometric).unwrap_or(false)
    }

    /// Returns true if the expression is a logarithm in base `e`.
    pub fn is_natural_log(&self) -> bool {
        match self {
            Self::Operation(Operation::Log, operands) => {
                operands.first().map(|base| *base == Self::e()).unwrap_or(false)
            },
            _ => false,
        }
    }

    /// Returns true if the expression is a quotient.
    pub fn is_fraction(&self) -> bool {
        self.is_operation(Operation::Divide)
    }

    /// Returns the numerator of the expression: the numerator of a quotient, the negated
    /// numerator of a negated quotient, or the expression itself.
    pub fn numerator(&self) -> Self {
        match self {
            Self::Operation(Operation::Divide, operands) if operands.len() == 2 => {
                operands[0].clone()
            },
            Self::Operation(Operation::Minus, operands)
                if operands.len() == 1 && operands[0].is_fraction() =>
            {
                minus(operands[0].numerator())
            },
            _ => self.clone(),
        }
    }

    /// Returns the denominator of the expression, or `1` if it is not a quotient.
    pub fn denominator(&self) -> Self {
        match self {
            Self::Operation(Operation::Divide, operands) if operands.len() == 2 => {
                operands[1].clone()
            },
            Self::Operation(Operation::Minus, operands)
                if operands.len() == 1 && operands[0].is_fraction() =>
            {
                operands[0].denominator()
            },
            _ => Self::Constant(1.0),
        }
    }

    /// Returns the reciprocal of the expression.
    ///
    /// - `1` -> `1`
    /// - `(1)/(a)` -> `a`
    /// - `(a)/(b)` -> `(b)/(a)`
    /// - `a` -> `(1)/(a)`
    pub fn reciprocate(&self) -> Self {
        if self.is_number(1.0) {
            return self.clone();
        }

        match self {
            Self::Operation(Operation::Divide, operands) if operands.len() == 2 => {
                if operands[0].is_number(1.0) {
                    operands[1].clone()
                } else {
                    divide(operands[1].clone(), operands[0].clone())
                }
            },
            _ => divide(Self::Constant(1.0), self.clone()),
        }
    }

    /// Returns a copy of the expression with every occurrence of `from` replaced by `to`.
    pub fn replace(&self, from: &Expr, to: &Expr) -> Self {
        if self == from {
            return to.clone();
        }

        match self {
            Self::Operation(op, operands) => Self::Operation(
                *op,
                operands.iter().map(|operand| operand.replace(from, to)).collect(),
            ),
            _ => self.clone(),
        }
    }

    /// Counts the nodes in the expression with the given operation tag.
    pub fn count_operation(&self, op: Operation) -> usize {
        match self {
            Self::Operation(own, operands) => {
                let own = usize::from(*own == op);
                own + operands.iter().map(|operand| operand.count_operation(op)).sum::<usize>()
            },
            _ => 0,
        }
    }

    /// Counts the nodes in the expression with the given operation tag that depend on the given
    /// variable.
    pub fn count_non_const_operation(&self, op: Operation, var: &str) -> usize {
        if self.is_constant_in(var) {
            return 0;
        }

        match self {
            Self::Operation(own, operands) => {
                let own = usize::from(*own == op);
                own + operands.iter()
                    .map(|operand| operand.count_non_const_operation(op, var))
                    .sum::<usize>()
            },
            _ => 0,
        }
    }

    /// Returns true if a square root occurs anywhere in the expression.
    pub fn contains_square_root(&self) -> bool {
        self.is_square_root() || self.operands().any(Self::contains_square_root)
    }

    /// Returns the byte range of the first occurrence of `sub` in the printed form of this
    /// expression.
    pub fn span_of(&self, sub: &Expr) -> Option<Range<usize>> {
        let printed = self.to_string();
        let needle = sub.to_string();
        printed.find(&needle).map(|start| start..start + needle.len())
    }
}

/// Returns true if the value is `π` or `e`.
fn is_special(value: f64) -> bool {
    is_equal(value, PI) || is_equal(value, E)
}

/// Pushes the operand into the list, splicing in its operands instead if it is an operation
/// with the same tag.
fn push_flattened(operands: &mut Vec<Expr>, expr: Expr, op: Operation) {
    match expr {
        Expr::Operation(inner, inner_operands) if inner == op => operands.extend(inner_operands),
        expr => operands.push(expr),
    }
}

/// `a + b`, flattening nested sums.
pub fn add(a: Expr, b: Expr) -> Expr {
    let mut operands = Vec::new();
    push_flattened(&mut operands, a, Operation::Plus);
    push_flattened(&mut operands, b, Operation::Plus);
    Expr::Operation(Operation::Plus, operands)
}

/// Adds two optional expressions. A missing operand means "nothing", so the other operand is
/// returned as is.
pub fn add_opt(a: Option<Expr>, b: Option<Expr>) -> Option<Expr> {
    match (a, b) {
        (Some(a), Some(b)) => Some(add(a, b)),
        (a, b) => a.or(b),
    }
}

/// `a - b`, represented as `a + (-b)`.
pub fn subtract(a: Expr, b: Expr) -> Expr {
    add(a, minus(b))
}

/// `a * b`, flattening nested products.
pub fn multiply(a: Expr, b: Expr) -> Expr {
    let mut operands = Vec::new();
    push_flattened(&mut operands, a, Operation::Multiply);
    push_flattened(&mut operands, b, Operation::Multiply);
    Expr::Operation(Operation::Multiply, operands)
}

/// Multiplies two optional expressions. A missing operand means "nothing", so the other operand
/// is returned as is.
pub fn multiply_opt(a: Option<Expr>, b: Option<Expr>) -> Option<Expr> {
    match (a, b) {
        (Some(a), Some(b)) => Some(multiply(a, b)),
        (a, b) => a.or(b),
    }
}

/// `a / b`.
pub fn divide(a: Expr, b: Expr) -> Expr {
    Expr::Operation(Operation::Divide, vec![a, b])
}

/// `base ^ exp`.
pub fn power(base: Expr, exp: Expr) -> Expr {
    Expr::Operation(Operation::Power, vec![base, exp])
}

/// `-a`. Existing negations are not removed.
pub fn minus(a: Expr) -> Expr {
    Expr::Operation(Operation::Minus, vec![a])
}

/// The `index`th root of `radicand`.
pub fn root(radicand: Expr, index: Expr) -> Expr {
    Expr::Operation(Operation::NRoot, vec![radicand, index])
}

/// The square root of `radicand`.
pub fn sqrt(radicand: Expr) -> Expr {
    root(radicand, Expr::Constant(2.0))
}

/// Applies a unary function.
pub fn apply(op: Operation, arg: Expr) -> Expr {
    Expr::Operation(op, vec![arg])
}

pub fn sin(arg: Expr) -> Expr {
    apply(Operation::Sin, arg)
}

pub fn cos(arg: Expr) -> Expr {
    apply(Operation::Cos, arg)
}

pub fn tan(arg: Expr) -> Expr {
    apply(Operation::Tan, arg)
}

pub fn arcsin(arg: Expr) -> Expr {
    apply(Operation::Arcsin, arg)
}

pub fn arccos(arg: Expr) -> Expr {
    apply(Operation::Arccos, arg)
}

pub fn arctan(arg: Expr) -> Expr {
    apply(Operation::Arctan, arg)
}

/// The logarithm of `arg` in the given `base`.
pub fn log(base: Expr, arg: Expr) -> Expr {
    Expr::Operation(Operation::Log, vec![base, arg])
}

/// The natural logarithm of `arg`.
pub fn ln(arg: Expr) -> Expr {
    log(Expr::e(), arg)
}

pub fn abs(arg: Expr) -> Expr {
    apply(Operation::Abs, arg)
}

/// `a * b`, dropping factors of `1` and turning a factor of `-1` into a negation.
pub fn non_trivial_product(a: Expr, b: Expr) -> Expr {
    if a.is_number(1.0) {
        b
    } else if a.is_number(-1.0) {
        minus(b)
    } else if b.is_number(1.0) {
        a
    } else if b.is_number(-1.0) {
        minus(a)
    } else {
        multiply(a, b)
    }
}

/// `base ^ exp`, where an exponent of `0` gives `1` and an exponent of `1` gives the base.
pub fn non_trivial_power(base: Expr, exp: Expr) -> Expr {
    if exp.is_number(0.0) {
        Expr::Constant(1.0)
    } else if exp.is_number(1.0) {
        base
    } else {
        power(base, exp)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Expr {
        Expr::variable("x")
    }

    #[test]
    fn print_sum_with_negative_term() {
        let expr = add(sin(x()), minus(cos(x())));
        assert_eq!(expr.to_string(), "(sin(x)-cos(x))");
    }

    #[test]
    fn print_polynomial() {
        let expr = add(
            add(Expr::number(12.0), multiply(Expr::number(12.0), x())),
            multiply(Expr::number(3.0), power(x(), Expr::number(2.0))),
        );
        assert_eq!(expr.to_string(), "(12 + (12)(x) + (3)((x)^(2)))");
    }

    #[test]
    fn print_functions() {
        assert_eq!(log(Expr::e(), x()).to_string(), "log_(e)(x)");
        assert_eq!(sqrt(x()).to_string(), "nroot(x, 2)");
        assert_eq!(abs(x()).to_string(), "|x|");
        assert_eq!(divide(Expr::pi(), Expr::number(0.5)).to_string(), "(π)/(0.5)");
        assert_eq!(arctan(Expr::number(-3.0)).to_string(), "arctan(-3)");
    }

    #[test]
    fn flattening() {
        let expr = add(x(), add(Expr::variable("y"), Expr::variable("z")));
        assert_eq!(expr.operands().len(), 3);

        let product = multiply(multiply(x(), x()), x());
        assert_eq!(product.operands().len(), 3);
    }

    #[test]
    fn structural_equality_is_order_sensitive() {
        let a = add(x(), Expr::number(1.0));
        let b = add(Expr::number(1.0), x());
        assert_ne!(a, b);
        assert_eq!(a, add(x(), Expr::Constant(1.0 + 1e-12)));
    }

    #[test]
    fn negative_numbers_are_negations() {
        assert_eq!(Expr::number(-2.0), minus(Expr::Constant(2.0)));
        assert!(Expr::number(-2.0).non_special_constant());
        assert!(!Expr::pi().non_special_constant());
        assert!(Expr::e().special_constant());
    }

    #[test]
    fn negate_removes_existing_negations() {
        assert_eq!(minus(x()).negate(), x());
        assert_eq!(x().negate(), minus(x()));
        assert_eq!(
            multiply(Expr::number(-2.0), x()).negate(),
            multiply(Expr::number(2.0), x()),
        );
        assert_eq!(multiply(Expr::number(-1.0), x()).negate(), x());
        assert_eq!(divide(minus(x()), Expr::number(2.0)).negate(), divide(x(), Expr::number(2.0)));
    }

    #[test]
    fn non_trivial_helpers() {
        assert_eq!(non_trivial_product(Expr::number(1.0), x()), x());
        assert_eq!(non_trivial_product(x(), Expr::number(-1.0)), minus(x()));
        assert_eq!(non_trivial_power(x(), Expr::number(0.0)), Expr::number(1.0));
        assert_eq!(non_trivial_power(x(), Expr::number(1.0)), x());
        assert_eq!(non_trivial_power(x(), Expr::number(3.0)), power(x(), Expr::number(3.0)));
    }

    #[test]
    fn fractions() {
        let frac = divide(x(), Expr::number(3.0));
        assert_eq!(frac.numerator(), x());
        assert_eq!(frac.denominator(), Expr::number(3.0));
        assert_eq!(frac.reciprocate(), divide(Expr::number(3.0), x()));
        assert_eq!(x().reciprocate(), divide(Expr::number(1.0), x()));
        assert_eq!(divide(Expr::number(1.0), x()).reciprocate(), x());
        assert_eq!(minus(frac).numerator(), minus(x()));
    }

    #[test]
    fn constancy() {
        let expr = multiply(Expr::variable("y"), sin(x()));
        assert!(!expr.is_constant());
        assert!(expr.is_constant_in("z"));
        assert!(!expr.is_constant_in("x"));
        assert!(add(Expr::pi(), Expr::number(1.0)).is_constant());
    }

    #[test]
    fn counting_and_replacing() {
        let expr = add(sqrt(x()), sqrt(Expr::number(2.0)));
        assert_eq!(expr.count_operation(Operation::NRoot), 2);
        assert_eq!(expr.count_non_const_operation(Operation::NRoot, "x"), 1);
        assert!(expr.contains_square_root());

        let replaced = expr.replace(&x(), &Expr::variable("t"));
        assert_eq!(replaced.to_string(), "(nroot(t, 2) + nroot(2, 2))");
    }

    #[test]
    fn direct_operands_only() {
        let expr = multiply(add(x(), Expr::number(1.0)), x());
        let operands = expr.operands().collect::<Vec<_>>();
        assert_eq!(operands, vec![&add(x(), Expr::number(1.0)), &x()]);
        assert_eq!(x().operands().count(), 0);
    }

    #[test]
    fn spans_point_into_printed_form() {
        let expr = add(x(), abs(x()));
        assert_eq!(expr.to_string(), "(x + |x|)");
        assert_eq!(expr.span_of(&abs(x())), Some(5..8));
    }
}
