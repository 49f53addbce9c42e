//! Records of the rules applied by the rewrite and differentiation engines.
//!
//! A [`Step`] only stores the kind of rule and the expressions involved; turning it into text is
//! left to the caller. [`StepKind::description`] provides an English template where `%0`, `%1`,
//! ... refer to the parameters of the step.

use std::fmt;
use super::expr::Expr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The rule that produced a [`Step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StepKind {
    // wrappers around the steps of a whole transformation
    RegroupWrapper,
    Expand,
    Factor,
    Differentiate,

    // structure
    FlattenSum,
    FlattenProduct,
    SingleOperand,
    DoubleMinus,

    // sums
    ZeroInAddition,
    EliminateOpposites,
    AddConstants,
    AddFractions,
    CollectLikeTerms,

    // products
    MultipliedByZero,
    EvenNumberOfNegatives,
    OddNumberOfNegatives,
    MultipliedByOne,
    MultiplyConstants,
    ConstantToFront,
    ProductOfPowers,

    // powers
    ZerothPower,
    FirstPower,
    PowerOfOne,
    EvaluatePower,
    EvenPowerNegative,
    OddPowerNegative,
    PowerOfPower,

    // fractions
    DivideByOne,
    DivideByNegativeOne,
    ZeroNumerator,
    NegativeNumDenom,
    CancelFraction,
    ReduceFraction,

    // roots
    FirstRoot,
    RootOfOne,
    EvaluateRoot,
    OddRootOfNegative,
    ReduceRootAndPower,
    ReduceRootAndPowerEven,

    // functions
    EvaluateInverseTrigo,
    LogOfOne,
    LogOfBase,

    // expansion
    DistributeMinus,
    BinomSquaredSum,
    BinomSquaredDiff,
    BinomCubed,
    TrinomSquared,
    RewriteAsMultiplication,
    DistributePowerOverProduct,
    ExpandSumTimesSum,
    ExpandSimpleTimesSum,

    // factoring
    FactorGcd,
    FactorCommon,
    FactorMinus,
    DifferenceOfSquaresFactor,
    SumOfCubes,
    DifferenceOfCubesFactor,
    BinomSquaredSumFactor,
    BinomSquaredDiffFactor,
    FactorPolynomial,

    // differentiation
    DiffSum,
    DiffConstant,
    DiffConstantCoefficient,
    DiffVariable,
    DiffProduct,
    DiffFraction,
    DiffPower,
    DiffPowerChain,
    DiffExponentialE,
    DiffExponentialEChain,
    DiffExponential,
    DiffExponentialChain,
    DiffVariableExponent,
    DiffRoot,
    DiffRootChain,
    DiffNaturalLog,
    DiffNaturalLogChain,
    DiffLog,
    DiffLogChain,
    DiffSin,
    DiffSinChain,
    DiffCos,
    DiffCosChain,
    DiffTan,
    DiffTanChain,
    DiffArcsin,
    DiffArcsinChain,
    DiffArccos,
    DiffArccosChain,
    DiffArctan,
    DiffArctanChain,
}

impl StepKind {
    /// Returns the English template describing the step. `%0`, `%1`, ... are replaced by the
    /// parameters of the step when rendered.
    pub fn description(self) -> &'static str {
        use StepKind::*;
        match self {
            RegroupWrapper => "Regroup %0",
            Expand => "Expand %0",
            Factor => "Factor %0",
            Differentiate => "Differentiate %0",

            FlattenSum => "Remove the parentheses around the inner sum: %1",
            FlattenProduct => "Remove the parentheses around the inner product: %1",
            SingleOperand => "A sum or product of one element is the element itself: %1",
            DoubleMinus => "Two negations cancel: %0 = %1",

            ZeroInAddition => "Adding zero does not change the sum: %1",
            EliminateOpposites => "Opposite terms cancel: %1",
            AddConstants => "Add the numbers: %1",
            AddFractions => "Add the fractions: %1",
            CollectLikeTerms => "Collect like terms: %1",

            MultipliedByZero => "Anything multiplied by zero is zero",
            EvenNumberOfNegatives => "An even number of negatives multiply to a positive: %1",
            OddNumberOfNegatives => "An odd number of negatives multiply to a negative: %1",
            MultipliedByOne => "Multiplying by one does not change the product: %1",
            MultiplyConstants => "Multiply the numbers: %1",
            ConstantToFront => "Write the numeric factor first: %1",
            ProductOfPowers => "Add the exponents of equal bases: %1",

            ZerothPower => "Anything to the power of zero is one",
            FirstPower => "Anything to the power of one is itself: %1",
            PowerOfOne => "One to any power is one",
            EvaluatePower => "Evaluate the power: %0 = %1",
            EvenPowerNegative => "A negative number to an even power is positive: %1",
            OddPowerNegative => "A negative number to an odd power is negative: %1",
            PowerOfPower => "Multiply the exponents: %0 = %1",

            DivideByOne => "Dividing by one does not change the value: %1",
            DivideByNegativeOne => "Dividing by negative one negates the value: %1",
            ZeroNumerator => "Zero divided by anything is zero",
            NegativeNumDenom => "Move the negative signs out of the fraction: %1",
            CancelFraction => "Cancel the common factors: %0 = %1",
            ReduceFraction => "Reduce the fraction: %0 = %1",

            FirstRoot => "The first root of a number is the number itself: %1",
            RootOfOne => "Any root of one is one",
            EvaluateRoot => "Evaluate the root: %0 = %1",
            OddRootOfNegative => "An odd root of a negative number is negative: %1",
            ReduceRootAndPower => "The root and the power cancel: %0 = %1",
            ReduceRootAndPowerEven => "An even root of an even power is the absolute value: %0 = %1",

            EvaluateInverseTrigo => "Evaluate the inverse trigonometric function: %0 = %1",
            LogOfOne => "The logarithm of one is zero",
            LogOfBase => "The logarithm of its own base is one",

            DistributeMinus => "Distribute the minus sign: %1",
            BinomSquaredSum => "Expand using (a + b)^2 = a^2 + 2ab + b^2: %1",
            BinomSquaredDiff => "Expand using (a - b)^2 = a^2 - 2ab + b^2: %1",
            BinomCubed => "Expand using (a + b)^3 = a^3 + 3a^2b + 3ab^2 + b^3: %1",
            TrinomSquared => "Expand using (a + b + c)^2 = a^2 + b^2 + c^2 + 2ab + 2ac + 2bc: %1",
            RewriteAsMultiplication => "Rewrite the power as a product: %1",
            DistributePowerOverProduct => "Raise every factor to the power: %1",
            ExpandSumTimesSum => "Multiply every term of the first sum by every term of the second: %1",
            ExpandSimpleTimesSum => "Multiply every term of the sum: %1",

            FactorGcd => "Factor out the greatest common divisor: %1",
            FactorCommon => "Factor out the common factor: %1",
            FactorMinus => "Factor out the minus sign: %1",
            DifferenceOfSquaresFactor => "Factor using a^2 - b^2 = (a + b)(a - b): %1",
            SumOfCubes => "Factor using a^3 + b^3 = (a + b)(a^2 - ab + b^2): %1",
            DifferenceOfCubesFactor => "Factor using a^3 - b^3 = (a - b)(a^2 + ab + b^2): %1",
            BinomSquaredSumFactor => "Factor using a^2 + 2ab + b^2 = (a + b)^2: %1",
            BinomSquaredDiffFactor => "Factor using a^2 - 2ab + b^2 = (a - b)^2: %1",
            FactorPolynomial => "Factor the polynomial using its roots: %1",

            DiffSum => "The derivative of a sum is the sum of the derivatives",
            DiffConstant => "The derivative of a constant is zero",
            DiffConstantCoefficient => "Constant factors can be moved out of the derivative",
            DiffVariable => "The derivative of the variable is one",
            DiffProduct => "Apply the product rule: (fg)' = fg' + f'g",
            DiffFraction => "Apply the quotient rule: (f/g)' = (f'g - fg')/g^2",
            DiffPower => "Apply the power rule: (x^n)' = nx^(n-1)",
            DiffPowerChain => "Apply the power rule and the chain rule: (u^n)' = nu^(n-1)u'",
            DiffExponentialE => "The derivative of e^x is e^x",
            DiffExponentialEChain => "Apply the chain rule: (e^u)' = e^u u'",
            DiffExponential => "The derivative of a^x is ln(a)a^x",
            DiffExponentialChain => "Apply the chain rule: (a^u)' = ln(a)a^u u'",
            DiffVariableExponent => "Rewrite the power as an exponential: u^v = e^(v ln(u))",
            DiffRoot => "The derivative of nroot(x, n) is 1/(n nroot(x^(n-1), n))",
            DiffRootChain => "Apply the chain rule: (nroot(u, n))' = u'/(n nroot(u^(n-1), n))",
            DiffNaturalLog => "The derivative of ln(x) is 1/x",
            DiffNaturalLogChain => "Apply the chain rule: (ln(u))' = u'/u",
            DiffLog => "The derivative of log_a(x) is 1/(ln(a)x)",
            DiffLogChain => "Apply the chain rule: (log_a(u))' = u'/(ln(a)u)",
            DiffSin => "The derivative of sin(x) is cos(x)",
            DiffSinChain => "Apply the chain rule: (sin(u))' = cos(u)u'",
            DiffCos => "The derivative of cos(x) is -sin(x)",
            DiffCosChain => "Apply the chain rule: (cos(u))' = -sin(u)u'",
            DiffTan => "The derivative of tan(x) is 1/cos(x)^2",
            DiffTanChain => "Apply the chain rule: (tan(u))' = u'/cos(u)^2",
            DiffArcsin => "The derivative of arcsin(x) is 1/sqrt(1 - x^2)",
            DiffArcsinChain => "Apply the chain rule: (arcsin(u))' = u'/sqrt(1 - u^2)",
            DiffArccos => "The derivative of arccos(x) is -1/sqrt(1 - x^2)",
            DiffArccosChain => "Apply the chain rule: (arccos(u))' = -u'/sqrt(1 - u^2)",
            DiffArctan => "The derivative of arctan(x) is 1/(x^2 + 1)",
            DiffArctanChain => "Apply the chain rule: (arctan(u))' = u'/(u^2 + 1)",
        }
    }
}

/// A single applied rule.
///
/// Rewrite rules store `[before, after]` as their parameters. Wrapper steps group the steps of a
/// whole transformation in [`Step::substeps`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Step {
    /// The rule that was applied.
    pub kind: StepKind,

    /// The expressions involved, referred to as `%0`, `%1`, ... by [`StepKind::description`].
    pub params: Vec<Expr>,

    /// Steps of the sub-derivation, in the order they were applied.
    pub substeps: Vec<Step>,
}

impl Step {
    /// Creates a step without substeps.
    pub fn new(kind: StepKind, params: Vec<Expr>) -> Self {
        Self { kind, params, substeps: Vec::new() }
    }

    /// Creates a step grouping the given substeps.
    pub fn wrapper(kind: StepKind, params: Vec<Expr>, substeps: Vec<Step>) -> Self {
        Self { kind, params, substeps }
    }

    /// Returns the description of the step with its parameters filled in.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut chars = self.kind.description().chars().peekable();
        while let Some(c) = chars.next() {
            let Some(index) = (c == '%')
                .then(|| chars.peek().and_then(|d| d.to_digit(10)))
                .flatten()
            else {
                out.push(c);
                continue;
            };

            chars.next();
            match self.params.get(index as usize) {
                Some(param) => out.push_str(&param.to_string()),
                None => {
                    out.push('%');
                    out.push_str(&index.to_string());
                },
            }
        }
        out
    }

    /// Returns the number of steps in this tree, including this step.
    pub fn count(&self) -> usize {
        1 + self.substeps.iter().map(Step::count).sum::<usize>()
    }

    /// Returns true if this step or any of its substeps has the given kind.
    pub fn contains(&self, kind: StepKind) -> bool {
        self.kind == kind || self.substeps.iter().any(|step| step.contains(kind))
    }
}

/// Prints the rendered description of the step followed by its substeps, indented.
impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_indented(step: &Step, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(f, "{:width$}{}", "", step.render(), width = depth * 2)?;
            for substep in &step.substeps {
                write_indented(substep, depth + 1, f)?;
            }
            Ok(())
        }

        write_indented(self, 0, f)
    }
}
