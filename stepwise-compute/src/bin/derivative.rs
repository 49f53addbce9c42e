use ariadne::Source;
use stepwise_compute::symbolic::expr::{add, cos, ln, multiply, power, sin, Expr};
use stepwise_compute::symbolic::Step;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let x = Expr::variable("x");
    let expr = add(
        multiply(power(x.clone(), Expr::number(2.0)), sin(x.clone())),
        ln(cos(x)),
    );
    println!("d/dx {expr}");

    let mut steps = Vec::<Step>::new();
    match expr.differentiate("x", &mut steps) {
        Ok(deriv) => {
            println!("= {deriv}");
            println!();
            for step in &steps {
                print!("{step}");
            }
        },
        Err(err) => {
            let src = expr.to_string();
            let _ = err.build_report("input")
                .eprint(("input", Source::from(src)));
        },
    }
}
