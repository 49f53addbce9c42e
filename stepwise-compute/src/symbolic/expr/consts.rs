//! Commonly used constant expressions.

use once_cell::sync::Lazy;
use super::Expr;

/// The number zero, wrapped in an [`Expr`].
pub static ZERO: Lazy<Expr> = Lazy::new(|| Expr::Constant(0.0));

/// The number one, wrapped in an [`Expr`].
pub static ONE: Lazy<Expr> = Lazy::new(|| Expr::Constant(1.0));

/// The number two, wrapped in an [`Expr`].
pub static TWO: Lazy<Expr> = Lazy::new(|| Expr::Constant(2.0));
