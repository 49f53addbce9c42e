//! Numeric helpers shared by the symbolic engine.
//!
//! Expressions store their constants as `f64`, so every comparison between constants goes
//! through [`is_equal`] with the engine-wide [`EPSILON`]. Exact integer arithmetic (greatest
//! common divisors, rational sums) is done with [`rug`].

use rug::Integer;

/// The tolerance used when comparing two constants.
pub const EPSILON: f64 = 1e-8;

/// Returns true if the two values are equal within [`EPSILON`].
pub fn is_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Returns true if the value is within [`EPSILON`] of an integer.
pub fn close_to_integer(n: f64) -> bool {
    n.is_finite() && is_equal(n, n.round())
}

/// Returns true if the value is within [`EPSILON`] of an even integer.
pub fn is_even(n: f64) -> bool {
    close_to_integer(n) && is_equal(n.round().rem_euclid(2.0), 0.0)
}

/// Returns true if the value is within [`EPSILON`] of an odd integer.
pub fn is_odd(n: f64) -> bool {
    close_to_integer(n) && is_equal(n.round().rem_euclid(2.0), 1.0)
}

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates an [`Integer`] from a float by rounding it to the nearest integer. Returns [`None`]
/// if the value is not within [`EPSILON`] of an integer.
pub fn int_from_f64(n: f64) -> Option<Integer> {
    if close_to_integer(n) {
        Integer::from_f64(n.round())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_detection() {
        assert!(close_to_integer(3.0));
        assert!(close_to_integer(2.999_999_999_9));
        assert!(!close_to_integer(2.5));
        assert!(!close_to_integer(f64::NAN));
        assert!(!close_to_integer(f64::INFINITY));
    }

    #[test]
    fn parity() {
        assert!(is_even(4.0));
        assert!(is_even(-2.0));
        assert!(is_odd(-3.0));
        assert!(!is_even(3.0));
        assert!(!is_odd(2.5));
    }

    #[test]
    fn rounding_to_integer() {
        assert_eq!(int_from_f64(12.000_000_000_1), Some(int(12)));
        assert_eq!(int_from_f64(-7.0), Some(int(-7)));
        assert_eq!(int_from_f64(0.5), None);
    }
}
