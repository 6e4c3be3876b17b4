//! Random planar systems for exploration.
//!
//! Each equation is two or three terms `c*v^p` with `c` in 1..=9, `p` in
//! 1..=5 and `v` either `x` or `y`. A term is wrapped in `sin` or `cos` 30%
//! of the time, and later terms are subtracted half the time.

use flowfield_core::prng::Xorshift64;

const VARIABLES: [&str; 2] = ["x", "y"];
const FUNCTIONS: [&str; 2] = ["sin", "cos"];

fn term(rng: &mut Xorshift64) -> String {
    let var = VARIABLES[rng.next_below(2) as usize];
    let coefficient = rng.next_below(9) + 1;
    let power = rng.next_below(5) + 1;
    match (coefficient, power) {
        (1, 1) => var.to_string(),
        (1, p) => format!("{var}^{p}"),
        (c, 1) => format!("{c}*{var}"),
        (c, p) => format!("{c}*{var}^{p}"),
    }
}

/// One random right-hand side.
pub fn random_expression(rng: &mut Xorshift64) -> String {
    let terms = rng.next_below(2) + 2;
    let mut out = String::new();
    for i in 0..terms {
        let mut t = term(rng);
        if rng.next_f64() < 0.3 {
            let func = FUNCTIONS[rng.next_below(2) as usize];
            t = format!("{func}({t})");
        }
        if i > 0 {
            out.push_str(if rng.next_f64() < 0.5 { " - " } else { " + " });
        }
        out.push_str(&t);
    }
    out
}

/// A random `(dx, dy)` pair.
pub fn random_system(rng: &mut Xorshift64) -> (String, String) {
    let dx = random_expression(rng);
    let dy = random_expression(rng);
    (dx, dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowfield_core::expr::{evaluate, Bindings};

    #[test]
    fn same_seed_same_system() {
        let a = random_system(&mut Xorshift64::new(9));
        let b = random_system(&mut Xorshift64::new(9));
        assert_eq!(a, b);
    }

    #[test]
    fn generated_expressions_parse_and_evaluate() {
        let mut rng = Xorshift64::new(2024);
        let at = Bindings::new(0.3, -0.7, 0.0, 0.0);
        for _ in 0..500 {
            let expr = random_expression(&mut rng);
            assert!(evaluate(&expr, &at).is_ok(), "failed to evaluate {expr:?}");
        }
    }

    #[test]
    fn term_count_is_two_or_three() {
        let mut rng = Xorshift64::new(5);
        for _ in 0..300 {
            let expr = random_expression(&mut rng);
            let joins = expr.matches(" + ").count() + expr.matches(" - ").count();
            assert!((1..=2).contains(&joins), "{expr:?}");
        }
    }

    #[test]
    fn functions_and_both_signs_appear() {
        let mut rng = Xorshift64::new(77);
        let all: Vec<String> = (0..200).map(|_| random_expression(&mut rng)).collect();
        assert!(all.iter().any(|e| e.contains("sin(") || e.contains("cos(")));
        assert!(all.iter().any(|e| e.contains(" - ")));
        assert!(all.iter().any(|e| e.contains(" + ")));
    }

    #[test]
    fn coefficient_one_is_omitted() {
        let mut rng = Xorshift64::new(13);
        for _ in 0..300 {
            let expr = random_expression(&mut rng);
            assert!(!expr.contains("1*"), "{expr:?}");
        }
    }
}
