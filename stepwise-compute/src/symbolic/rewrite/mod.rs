//! Bottom-up rewriting of expressions with an ordered list of rules.
//!
//! A [`Strategy`] is an ordered list of rewrite rules (see [`rules`]). A single pass visits the
//! expression in post-order, rewriting the operands of a node before the node itself, and
//! applies at most the first matching rule at each node. Passes are repeated until one of them
//! changes nothing, or until the [`Budget`] is spent. Running out of budget is not an error: the
//! partially rewritten expression is returned as is.

pub mod rules;

use tracing::{debug, instrument, trace};
use super::{expr::Expr, step::{Step, StepKind}, step_collector::StepCollector};

/// A rewrite rule.
///
/// Returns `Some(expr)` with the rewritten expression if the rule applies to the given node, or
/// [`None`] otherwise. The rule records its own [`Step`] when it applies.
pub type Rule = fn(&Expr, &mut dyn StepCollector<Step>) -> Option<Expr>;

/// The set of rules applied by a rewrite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Simplifications that never make the expression larger.
    Regroup,

    /// Expansion of products and powers of sums, followed by the regroup rules.
    Expand,

    /// Factoring of sums, followed by the regroup rules.
    Factor,
}

impl Strategy {
    /// The kind of the step wrapping all steps of a rewrite with this strategy.
    pub fn wrapper(self) -> StepKind {
        match self {
            Self::Regroup => StepKind::RegroupWrapper,
            Self::Expand => StepKind::Expand,
            Self::Factor => StepKind::Factor,
        }
    }

    /// Applies the first matching rule of this strategy to the given node.
    fn apply(self, expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
        match self {
            Self::Regroup => rules::regroup(expr, steps),
            Self::Expand => rules::expand::all(expr, steps)
                .or_else(|| rules::regroup(expr, steps)),
            Self::Factor => rules::factor::all(expr, steps)
                .or_else(|| rules::regroup(expr, steps)),
        }
    }
}

/// Options to use when rewriting an expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewriteOptions {
    /// The maximum number of passes over the expression.
    ///
    /// Each pass applies at most one rule per node. If the expression still changes after this
    /// many passes, the rewrite stops and returns the expression produced by the last pass.
    ///
    /// The default value is `100`.
    pub max_passes: usize,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self { max_passes: 100 }
    }
}

impl RewriteOptions {
    /// Sets the maximum number of passes.
    pub fn max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }
}

/// The number of passes a rewrite may still perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Budget {
    remaining: usize,
}

impl Budget {
    /// Creates a budget allowing the given number of passes.
    pub fn new(passes: usize) -> Self {
        Self { remaining: passes }
    }

    /// Returns the number of passes left.
    pub fn remaining(self) -> usize {
        self.remaining
    }

    /// Returns true if no passes are left.
    pub fn is_exhausted(self) -> bool {
        self.remaining == 0
    }

    /// Spends one pass, returning the remaining budget, or [`None`] if there is nothing left to
    /// spend.
    pub fn spend(self) -> Option<Self> {
        self.remaining.checked_sub(1).map(|remaining| Self { remaining })
    }
}

/// Rewrites the expression with the given strategy until it stops changing or the budget is
/// spent. Returns the rewritten expression and the unspent budget.
#[instrument(level = "debug", skip_all, fields(strategy = ?strategy, expr = %expr))]
pub fn run(
    expr: &Expr,
    strategy: Strategy,
    budget: Budget,
    steps: &mut dyn StepCollector<Step>,
) -> (Expr, Budget) {
    let mut current = expr.clone();
    let mut budget = budget;
    let mut passes = 0usize;

    loop {
        let Some(next_budget) = budget.spend() else {
            debug!(passes, result = %current, "pass budget exhausted, returning best effort");
            break;
        };
        budget = next_budget;

        match pass(&current, strategy, steps) {
            Some(rewritten) => {
                passes += 1;
                current = rewritten;
            },
            None => break,
        }
    }

    debug!(passes, result = %current, "rewrite finished");
    (current, budget)
}

/// Performs a single bottom-up pass. Returns [`None`] if no rule applied anywhere.
fn pass(expr: &Expr, strategy: Strategy, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let rebuilt = match expr {
        Expr::Operation(op, operands) => {
            let mut changed = false;
            let mut new_operands = Vec::with_capacity(operands.len());
            for operand in operands {
                match pass(operand, strategy, steps) {
                    Some(rewritten) => {
                        changed = true;
                        new_operands.push(rewritten);
                    },
                    None => new_operands.push(operand.clone()),
                }
            }
            changed.then(|| Expr::Operation(*op, new_operands))
        },
        Expr::Constant(_) | Expr::Variable(_) => None,
    };

    let node = rebuilt.as_ref().unwrap_or(expr);
    match strategy.apply(node, steps) {
        Some(rewritten) => {
            trace!(before = %node, after = %rewritten, "rule applied");
            Some(rewritten)
        },
        None => rebuilt,
    }
}

impl Expr {
    /// Rewrites the expression with the given strategy and options.
    ///
    /// If the step collector records steps, the steps of the rewrite are grouped in a single
    /// wrapper step (see [`Strategy::wrapper`]). Nothing is recorded if no rule applied.
    pub fn rewrite(
        &self,
        strategy: Strategy,
        options: &RewriteOptions,
        steps: &mut dyn StepCollector<Step>,
    ) -> Expr {
        let mut substeps = Vec::new();
        let mut silent = ();
        let sink: &mut dyn StepCollector<Step> = if steps.is_recording() {
            &mut substeps
        } else {
            &mut silent
        };

        let (result, _) = run(self, strategy, Budget::new(options.max_passes), sink);
        if !substeps.is_empty() {
            steps.push(Step::wrapper(
                strategy.wrapper(),
                vec![self.clone(), result.clone()],
                substeps,
            ));
        }
        result
    }

    /// Simplifies the expression without expanding or factoring it.
    pub fn regroup(&self, steps: &mut dyn StepCollector<Step>) -> Expr {
        self.rewrite(Strategy::Regroup, &RewriteOptions::default(), steps)
    }

    /// Expands products and powers of sums, then simplifies the result.
    pub fn expand(&self, steps: &mut dyn StepCollector<Step>) -> Expr {
        self.rewrite(Strategy::Expand, &RewriteOptions::default(), steps)
    }

    /// Factors sums, then simplifies the result.
    pub fn factor(&self, steps: &mut dyn StepCollector<Step>) -> Expr {
        self.rewrite(Strategy::Factor, &RewriteOptions::default(), steps)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use crate::symbolic::expr::*;
    use super::*;

    fn x() -> Expr {
        Expr::variable("x")
    }

    fn num(n: f64) -> Expr {
        Expr::number(n)
    }

    /// Builds a random expression over `x` and `y` from sums, products, powers and negations.
    fn random_expr(rng: &mut StdRng, depth: usize) -> Expr {
        if depth == 0 || rng.gen_bool(0.3) {
            return match rng.gen_range(0..4) {
                0 => x(),
                1 => Expr::variable("y"),
                2 => num(rng.gen_range(0..5) as f64),
                _ => num(-(rng.gen_range(1..4) as f64)),
            };
        }

        match rng.gen_range(0..5) {
            0 => add(random_expr(rng, depth - 1), random_expr(rng, depth - 1)),
            1 => multiply(random_expr(rng, depth - 1), random_expr(rng, depth - 1)),
            2 => power(random_expr(rng, depth - 1), num(rng.gen_range(0..4) as f64)),
            3 => minus(random_expr(rng, depth - 1)),
            _ => subtract(random_expr(rng, depth - 1), random_expr(rng, depth - 1)),
        }
    }

    #[test]
    fn budget_spending() {
        let budget = Budget::new(2);
        let budget = budget.spend().unwrap();
        assert_eq!(budget.remaining(), 1);
        let budget = budget.spend().unwrap();
        assert!(budget.is_exhausted());
        assert_eq!(budget.spend(), None);
    }

    #[test]
    fn exhausted_budget_returns_best_effort() {
        // the negation is moved out of the product in the first pass, the powers are combined
        // in the second
        let expr = multiply(x(), minus(x()));
        let options = RewriteOptions::default().max_passes(1);
        let partial = expr.rewrite(Strategy::Regroup, &options, &mut ());
        assert_eq!(partial.to_string(), "-(x)(x)");
        assert_eq!(expr.regroup(&mut ()).to_string(), "-(x)^(2)");
    }

    #[test]
    fn zero_budget_changes_nothing() {
        let expr = add(x(), num(0.0));
        let options = RewriteOptions::default().max_passes(0);
        assert_eq!(expr.rewrite(Strategy::Regroup, &options, &mut ()), expr);
    }

    #[test]
    fn steps_are_wrapped() {
        let expr = add(multiply(num(2.0), x()), multiply(num(3.0), x()));
        let mut steps = Vec::new();
        let result = expr.regroup(&mut steps);

        assert_eq!(result.to_string(), "(5)(x)");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].kind, StepKind::RegroupWrapper);
        assert_eq!(steps[0].params, vec![expr, result]);
        assert!(steps[0].contains(StepKind::CollectLikeTerms));
    }

    #[test]
    fn nothing_recorded_without_changes() {
        let mut steps = Vec::new();
        x().regroup(&mut steps);
        assert!(steps.is_empty());
    }

    #[test]
    fn regroup_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let expr = random_expr(&mut rng, 4);
            let once = expr.regroup(&mut ());
            let twice = once.regroup(&mut ());
            assert_eq!(once, twice, "regrouping {} is not idempotent", expr);
        }
    }

    #[test]
    fn regroup_preserves_value() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let expr = random_expr(&mut rng, 4);
            let regrouped = expr.regroup(&mut ());
            for point in [-1.5, 0.5, 2.0] {
                let bind = |e: &Expr| e.replace(&Expr::variable("y"), &num(0.75)).value_at("x", point);
                if let (Some(before), Some(after)) = (bind(&expr), bind(&regrouped)) {
                    assert!(
                        (before - after).abs() <= 1e-6 * before.abs().max(1.0),
                        "{} = {} but {} = {} at x = {}", expr, before, regrouped, after, point,
                    );
                }
            }
        }
    }
}
