//! Symbolic differentiation.
//!
//! [`Expr::derivative`] applies the differentiation rules recursively and returns the raw
//! derivative, only cleaned up by the trivial simplifications of [`MultBuilder`] and
//! [`SumBuilder`]. [`Expr::differentiate`] additionally regroups the result, and reports
//! unsupported operations as an [`Error`] pointing into the printed expression.

mod function;

use stepwise_error::Error;
use tracing::{debug, instrument};
use super::{
    error::UnsupportedDerivative,
    expr::{consts::{ONE, TWO, ZERO}, divide, ln, minus, non_trivial_power, power, subtract, Expr, Operation},
    step::{Step, StepKind},
    step_collector::StepCollector,
};

/// Returns `true` if the given [`Expr`] is "clearly" zero. This is intended to clean up the
/// derivative and is not mathematically rigorous.
fn is_trivially_zero(e: &Expr) -> bool {
    match e {
        Expr::Operation(Operation::Plus, terms) => terms.iter().all(is_trivially_zero),
        Expr::Operation(Operation::Multiply, factors) => factors.iter().any(is_trivially_zero),
        _ => e.is_number(0.0),
    }
}

/// Returns `true` if the given [`Expr`] is "clearly" one.
fn is_trivially_unity(e: &Expr) -> bool {
    match e {
        Expr::Operation(Operation::Multiply, factors) => factors.iter().all(is_trivially_unity),
        _ => e.is_number(1.0),
    }
}

/// Helper struct to build a product of expressions while applying basic simplification rules. If
/// any of the expressions are zero, the product is reduced to zero.
#[derive(Default)]
struct MultBuilder(Vec<Expr>);

impl From<MultBuilder> for Expr {
    fn from(value: MultBuilder) -> Self {
        let mut factors = value.0;
        match factors.len() {
            0 => Expr::Constant(1.0),
            1 => factors.remove(0),
            _ => Expr::Operation(Operation::Multiply, factors),
        }
    }
}

impl MultBuilder {
    fn mult(&mut self, e: Expr) {
        if is_trivially_zero(&e) || self.0.first().is_some_and(is_trivially_zero) {
            self.0 = vec![Expr::Constant(0.0)];
            return;
        }

        match e {
            Expr::Operation(Operation::Multiply, factors) => {
                for factor in factors {
                    self.mult(factor);
                }
            },
            e if is_trivially_unity(&e) => {},
            e => self.0.push(e),
        }
    }
}

/// Helper struct to build a summation of expressions while applying basic simplification rules.
/// Only non-zero expressions are added to the sum.
#[derive(Default)]
struct SumBuilder(Vec<Expr>);

impl From<SumBuilder> for Expr {
    fn from(value: SumBuilder) -> Self {
        let mut terms = value.0;
        match terms.len() {
            0 => Expr::Constant(0.0),
            1 => terms.remove(0),
            _ => Expr::Operation(Operation::Plus, terms),
        }
    }
}

impl SumBuilder {
    fn add(&mut self, e: Expr) {
        if !is_trivially_zero(&e) {
            self.0.push(e)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolicDerivativeError {
    /// The given sub-expression has no differentiation rule.
    Unsupported(Expr),
}

/// Records a differentiation step with the differentiated expression and its derivative.
fn record(steps: &mut dyn StepCollector<Step>, kind: StepKind, f: &Expr, result: &Expr) {
    if steps.is_recording() {
        steps.push(Step::new(kind, vec![f.clone(), result.clone()]));
    }
}

/// Multiplies the derivative of an outer function by the derivative of its argument, unless the
/// argument is the variable itself. Returns the step kind to record.
fn chain(
    outer: Expr,
    arg: &Expr,
    var: &str,
    kinds: (StepKind, StepKind),
    steps: &mut dyn StepCollector<Step>,
) -> Result<(Expr, StepKind), SymbolicDerivativeError> {
    if matches!(arg, Expr::Variable(name) if name == var) {
        return Ok((outer, kinds.0));
    }

    let mut product = MultBuilder::default();
    product.mult(outer);
    product.mult(derivative(arg, var, steps)?);
    Ok((product.into(), kinds.1))
}

/// `(f + g)' = f' + g'`
fn sum_rule(
    terms: &[Expr],
    var: &str,
    steps: &mut dyn StepCollector<Step>,
) -> Result<Expr, SymbolicDerivativeError> {
    let mut sum = SumBuilder::default();
    for term in terms {
        sum.add(derivative(term, var, steps)?);
    }
    Ok(sum.into())
}

/// `(cf)' = cf'` if `c` does not depend on the variable, otherwise `(fg)' = fg' + f'g`, where
/// `g` is the product of every factor but the first.
fn product_rule(
    f: &Expr,
    factors: &[Expr],
    var: &str,
    steps: &mut dyn StepCollector<Step>,
) -> Result<Expr, SymbolicDerivativeError> {
    let (constants, rest): (Vec<_>, Vec<_>) = factors.iter()
        .cloned()
        .partition(|factor| factor.is_constant_in(var));

    if !constants.is_empty() {
        let rest = match rest.len() {
            1 => rest.into_iter().next().unwrap_or(Expr::Constant(1.0)),
            _ => Expr::Operation(Operation::Multiply, rest),
        };

        let mut product = MultBuilder::default();
        for constant in constants {
            product.mult(constant);
        }
        product.mult(derivative(&rest, var, steps)?);

        let result = product.into();
        record(steps, StepKind::DiffConstantCoefficient, f, &result);
        return Ok(result);
    }

    let (first, others) = factors.split_first()
        .ok_or_else(|| SymbolicDerivativeError::Unsupported(f.clone()))?;
    let others = match others {
        [single] => single.clone(),
        _ => Expr::Operation(Operation::Multiply, others.to_vec()),
    };

    let mut left = MultBuilder::default();
    left.mult(first.clone());
    left.mult(derivative(&others, var, steps)?);

    let mut right = MultBuilder::default();
    right.mult(derivative(first, var, steps)?);
    right.mult(others);

    let mut sum = SumBuilder::default();
    sum.add(left.into());
    sum.add(right.into());

    let result = sum.into();
    record(steps, StepKind::DiffProduct, f, &result);
    Ok(result)
}

/// `(f/g)' = (f'g - fg')/g^2`
fn quotient_rule(
    f: &Expr,
    num: &Expr,
    den: &Expr,
    var: &str,
    steps: &mut dyn StepCollector<Step>,
) -> Result<Expr, SymbolicDerivativeError> {
    if den.is_constant_in(var) {
        let result = divide(derivative(num, var, steps)?, den.clone());
        record(steps, StepKind::DiffConstantCoefficient, f, &result);
        return Ok(result);
    }

    let mut left = MultBuilder::default();
    left.mult(derivative(num, var, steps)?);
    left.mult(den.clone());

    let mut right = MultBuilder::default();
    right.mult(num.clone());
    right.mult(derivative(den, var, steps)?);

    let mut numerator = SumBuilder::default();
    numerator.add(left.into());
    let right = Expr::from(right);
    if !is_trivially_zero(&right) {
        numerator.add(minus(right));
    }

    let result = divide(numerator.into(), power(den.clone(), TWO.clone()));
    record(steps, StepKind::DiffFraction, f, &result);
    Ok(result)
}

/// `n - 1`, evaluated if `n` is a number.
fn minus_one(n: &Expr) -> Expr {
    match n.as_number() {
        Some(value) => Expr::number(value - 1.0),
        None => subtract(n.clone(), Expr::Constant(1.0)),
    }
}

/// Derivatives of powers:
///
/// - `(u^n)' = nu^(n-1)u'` for a constant exponent,
/// - `(a^u)' = ln(a)a^u u'` for a constant base (`(e^u)' = e^u u'`),
/// - `u^v = e^(v ln(u))` otherwise.
fn power_rule(
    f: &Expr,
    base: &Expr,
    exp: &Expr,
    var: &str,
    steps: &mut dyn StepCollector<Step>,
) -> Result<Expr, SymbolicDerivativeError> {
    if exp.is_constant_in(var) {
        let mut outer = MultBuilder::default();
        outer.mult(exp.clone());
        outer.mult(non_trivial_power(base.clone(), minus_one(exp)));

        let (result, kind) = chain(
            outer.into(),
            base,
            var,
            (StepKind::DiffPower, StepKind::DiffPowerChain),
            steps,
        )?;
        record(steps, kind, f, &result);
        return Ok(result);
    }

    if base.is_constant_in(var) {
        let exponential = power(base.clone(), exp.clone());
        let (outer, kinds) = if *base == Expr::e() {
            (exponential, (StepKind::DiffExponentialE, StepKind::DiffExponentialEChain))
        } else {
            let mut product = MultBuilder::default();
            product.mult(ln(base.clone()));
            product.mult(exponential);
            (product.into(), (StepKind::DiffExponential, StepKind::DiffExponentialChain))
        };

        let (result, kind) = chain(outer, exp, var, kinds, steps)?;
        record(steps, kind, f, &result);
        return Ok(result);
    }

    let rewritten = power(
        Expr::e(),
        Expr::Operation(Operation::Multiply, vec![exp.clone(), ln(base.clone())]),
    );
    record(steps, StepKind::DiffVariableExponent, f, &rewritten);
    derivative(&rewritten, var, steps)
}

/// Computes the derivative of the given expression with respect to `var`.
fn derivative(
    f: &Expr,
    var: &str,
    steps: &mut dyn StepCollector<Step>,
) -> Result<Expr, SymbolicDerivativeError> {
    if f.is_constant_in(var) {
        let result = ZERO.clone();
        record(steps, StepKind::DiffConstant, f, &result);
        return Ok(result);
    }

    match f {
        Expr::Constant(_) => Ok(ZERO.clone()),
        Expr::Variable(_) => {
            let result = ONE.clone();
            record(steps, StepKind::DiffVariable, f, &result);
            Ok(result)
        },
        Expr::Operation(op, operands) => match (op, operands.as_slice()) {
            (Operation::Plus, terms) => {
                let result = sum_rule(terms, var, steps)?;
                record(steps, StepKind::DiffSum, f, &result);
                Ok(result)
            },
            (Operation::Minus, [operand]) => {
                let inner = derivative(operand, var, steps)?;
                if is_trivially_zero(&inner) {
                    Ok(Expr::Constant(0.0))
                } else {
                    Ok(minus(inner))
                }
            },
            (Operation::Multiply, factors) => product_rule(f, factors, var, steps),
            (Operation::Divide, [num, den]) => quotient_rule(f, num, den, var, steps),
            (Operation::Power, [base, exp]) => power_rule(f, base, exp, var, steps),
            _ => function::function_derivative(f, *op, operands, var, steps),
        },
    }
}

impl Expr {
    /// Computes the derivative of the expression with respect to `var`.
    ///
    /// The result is not simplified beyond dropping factors of one and terms of zero; use
    /// [`Expr::differentiate`] for a regrouped result. Returns [`Err`] with the offending
    /// sub-expression if some part of the expression has no differentiation rule.
    pub fn derivative(
        &self,
        var: &str,
        steps: &mut dyn StepCollector<Step>,
    ) -> Result<Expr, SymbolicDerivativeError> {
        derivative(self, var, steps)
    }

    /// Computes the regrouped derivative of the expression with respect to `var`.
    ///
    /// If the step collector records steps, the differentiation steps and the regrouping are
    /// grouped in a single [`StepKind::Differentiate`] step.
    #[instrument(level = "debug", skip_all, fields(expr = %self, var = var))]
    pub fn differentiate(
        &self,
        var: &str,
        steps: &mut dyn StepCollector<Step>,
    ) -> Result<Expr, Error> {
        let mut substeps = Vec::new();
        let mut silent = ();
        let sink: &mut dyn StepCollector<Step> = if steps.is_recording() {
            &mut substeps
        } else {
            &mut silent
        };

        let raw = self.derivative(var, sink).map_err(|err| match err {
            SymbolicDerivativeError::Unsupported(sub) => {
                debug!(sub = %sub, "no differentiation rule");
                let span = self.span_of(&sub).unwrap_or(0..self.to_string().len());
                let operation = sub.operation().unwrap_or(Operation::Abs);
                Error::new(vec![span], UnsupportedDerivative { operation })
            },
        })?;

        let result = raw.regroup(sink);
        debug!(raw = %raw, result = %result, "differentiated");

        if steps.is_recording() {
            steps.push(Step::wrapper(
                StepKind::Differentiate,
                vec![self.clone(), result.clone()],
                substeps,
            ));
        }
        Ok(result)
    }
}
