//! Step-by-step symbolic manipulation of mathematical expressions.
//!
//! See the [`symbolic`] module for the expression tree, the rewrite engine and differentiation.

pub mod approx;
pub mod primitive;
pub mod symbolic;
