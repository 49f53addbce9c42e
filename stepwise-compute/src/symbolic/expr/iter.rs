use std::{iter::FusedIterator, slice};
use super::Expr;

/// An iterator over the direct operands of an expression, in order.
///
/// Constants and variables have no operands. Deeper traversal is left to the algorithm that
/// needs it, usually as a plain recursive function.
///
/// This iterator is created by [`Expr::operands`].
#[derive(Clone, Debug)]
pub struct Operands<'a> {
    inner: slice::Iter<'a, Expr>,
}

impl<'a> Operands<'a> {
    /// Creates a new iterator over the operands of the given expression.
    pub(super) fn new(expr: &'a Expr) -> Self {
        let operands: &'a [Expr] = match expr {
            Expr::Operation(_, operands) => operands,
            Expr::Constant(_) | Expr::Variable(_) => &[],
        };
        Self { inner: operands.iter() }
    }
}

impl<'a> Iterator for Operands<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Operands<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Operands<'_> {}

impl FusedIterator for Operands<'_> {}
