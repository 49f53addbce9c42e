//! Rewrite rules for logarithms.

use crate::symbolic::{
    expr::Expr,
    step::{Step, StepKind},
    step_collector::StepCollector,
};
use super::{do_log, record};

/// `log_b(1) = 0`
pub fn log_of_one(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_log(expr, |_, arg| arg.is_number(1.0).then(|| Expr::Constant(0.0)))?;
    record(steps, StepKind::LogOfOne, expr, &opt);
    Some(opt)
}

/// `log_b(b) = 1`
pub fn log_of_base(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_log(expr, |base, arg| (base == arg).then(|| Expr::Constant(1.0)))?;
    record(steps, StepKind::LogOfBase, expr, &opt);
    Some(opt)
}

/// Applies all logarithm rules.
pub fn all(expr: &Expr, steps: &mut dyn StepCollector<Step>) -> Option<Expr> {
    log_of_one(expr, steps)
        .or_else(|| log_of_base(expr, steps))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::symbolic::expr::*;
    use super::*;

    #[test]
    fn log_one() {
        let expr = log(Expr::number(10.0), Expr::number(1.0));
        assert_eq!(log_of_one(&expr, &mut ()), Some(Expr::number(0.0)));
    }

    #[test]
    fn log_base() {
        let mut steps = Vec::new();
        assert_eq!(log_of_base(&ln(Expr::e()), &mut steps), Some(Expr::number(1.0)));
        assert_eq!(steps[0].kind, StepKind::LogOfBase);

        let x = Expr::variable("x");
        assert_eq!(log_of_base(&log(x.clone(), x), &mut ()), Some(Expr::number(1.0)));
        assert_eq!(log_of_base(&ln(Expr::number(3.0)), &mut ()), None);
    }
}
