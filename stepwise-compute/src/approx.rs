use rug::{Integer, Rational};
use super::primitive::EPSILON;

/// The maximum number of terms of the continued fraction to compute.
const MAX_TERMS: usize = 32;

/// Computes the [`Rational`] from the continued fraction form of a float.
fn rational_from_continued_fraction(continued_fraction_form: &[Integer]) -> Rational {
    let mut iter = continued_fraction_form.iter().rev();
    let Some(last) = iter.next() else {
        return Rational::new();
    };

    // every term after the first is at least 1, so the reciprocal is always defined
    let mut rational = Rational::from(last.clone());
    for integer in iter {
        rational = rational.recip() + integer;
    }
    rational
}

/// Approximates the given float as a rational fraction.
///
/// This function applies the continued fraction algorithm to the given float until the
/// approximation is within `EPSILON^2` of the original value, or the remaining fractional part
/// is negligible. Constants in expressions are stored as `f64`, so sums of fractions such as
/// `1/3 + 1/6` are computed exactly by converting each value with this function first.
///
/// Returns [`None`] if the value is not finite.
///
/// See
/// [Wikipedia](https://en.wikipedia.org/wiki/Continued_fraction#Calculating_continued_fraction_representations)
/// for more information.
pub fn approximate_rational(n: f64) -> Option<Rational> {
    if !n.is_finite() {
        return None;
    }

    let mut continued_fraction_form = Vec::new();
    let mut x = n;
    for _ in 0..MAX_TERMS {
        let integer = x.floor();
        continued_fraction_form.push(Integer::from_f64(integer)?);

        // check how close we are to the original number
        let rational = rational_from_continued_fraction(&continued_fraction_form);
        let error = (rational.to_f64() - n).abs();
        let fractional = x - integer;
        if fractional < EPSILON * EPSILON || error < EPSILON * EPSILON {
            break;
        }

        x = fractional.recip();
    }

    Some(rational_from_continued_fraction(&continued_fraction_form))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(approximate_rational(5.0), Some(Rational::from(5)));
        assert_eq!(approximate_rational(-3.0), Some(Rational::from(-3)));
        assert_eq!(approximate_rational(0.0), Some(Rational::from(0)));
    }

    #[test]
    fn simple_fractions() {
        assert_eq!(approximate_rational(0.5), Some(Rational::from((1, 2))));
        assert_eq!(approximate_rational(1.0 / 3.0), Some(Rational::from((1, 3))));
        assert_eq!(approximate_rational(-2.0 / 7.0), Some(Rational::from((-2, 7))));
    }

    #[test]
    fn not_finite() {
        assert_eq!(approximate_rational(f64::NAN), None);
        assert_eq!(approximate_rational(f64::INFINITY), None);
    }
}
