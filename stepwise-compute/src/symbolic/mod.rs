//! Step-by-step manipulation of expressions.
//!
//! # Expression representation
//!
//! Expressions are represented as a tree of [`Expr`] nodes (see [`mod@expr`]). Sums and products
//! are **flattened**: `x + (y + z)` is a single [`Operation::Plus`] node with three operands,
//! which makes it easy to combine like terms.
//!
//! # Transformations
//!
//! Every transformation accepts a [`StepCollector`] and returns a new tree. Pass `&mut ()` to
//! ignore the steps, or a `Vec<Step>` to record them:
//!
//! - [`Expr::regroup`], [`Expr::expand`] and [`Expr::factor`] run the rewrite engine (see
//! [`rewrite`]) with the corresponding [`Strategy`](rewrite::Strategy).
//! - [`Expr::differentiate`] computes the derivative with respect to a variable and regroups it
//! (see [`derivative`]).
//! - The [`polynomial`] module inspects expressions as polynomials of one variable, and the
//! [`term`] module splits single terms into coefficients, bases and exponents.
//!
//! ```
//! use stepwise_compute::symbolic::{expr::{add, multiply, Expr}, Step, StepKind};
//!
//! let x = Expr::variable("x");
//! let expr = add(multiply(Expr::number(2.0), x.clone()), multiply(Expr::number(3.0), x));
//!
//! let mut steps = Vec::<Step>::new();
//! let regrouped = expr.regroup(&mut steps);
//! assert_eq!(regrouped.to_string(), "(5)(x)");
//! assert_eq!(steps[0].kind, StepKind::RegroupWrapper);
//! ```

pub mod derivative;
pub mod error;
pub mod expr;
pub mod polynomial;
pub mod rewrite;
pub mod step;
pub mod step_collector;
pub mod term;

pub use derivative::SymbolicDerivativeError;
pub use expr::{Expr, Operation};
pub use rewrite::{RewriteOptions, Strategy};
pub use step::{Step, StepKind};
pub use step_collector::StepCollector;
