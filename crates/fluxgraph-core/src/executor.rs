//! Pure node computation.
//!
//! [`execute`] maps a node and its gathered inputs to output tokens. It has no
//! side effects beyond drawing fresh ids from the supplied [`TokenIdGen`].
//! Every output token is stamped with `arrival_time = now` and inherits
//! `origin_time` from the first input in declared port order (or `now` when
//! the node consumed nothing).
//!
//! A node whose required inputs are missing produces no output at all.
//!
//! | kind      | inputs              | outputs                    |
//! |-----------|---------------------|----------------------------|
//! | source    | –                   | –                          |
//! | sink      | `in`                | `out` (observation only)   |
//! | add       | `a`, `b`            | `out = a + b`              |
//! | mul       | `a`, `b`            | `out = a × b`              |
//! | butterfly | `x0`, `x1`          | `y0 = x0+x1`, `y1 = (x0−x1)·W` |
//! | dft4      | `in0`..`in3`        | `out0`..`out3`             |
//! | twiddle   | `in`                | `out = in · W_N^k`         |

use crate::complex::{Complex, Twiddle};
use crate::graph::{NodeKind, NodeSpec, SINK_OBSERVATION_PORT};
use crate::ports::PortValues;
use crate::time::Time;
use crate::token::{Token, TokenIdGen, Value};

/// Computes the outputs of `node` for `inputs` at time `now`.
pub fn execute(node: &NodeSpec, inputs: &PortValues, now: Time, ids: &mut TokenIdGen) -> PortValues {
    let origin = node
        .inputs
        .iter()
        .find_map(|p| inputs.get(p))
        .or_else(|| inputs.first())
        .map_or(now, |t| t.origin_time);

    let mut out = PortValues::with_capacity(node.kind.output_ports().len());
    let mut emit = |port: &str, value: Value| {
        let mut token = Token::new(ids.next_id(), value, now);
        token.origin_time = origin;
        out.insert(port, token);
    };

    match node.kind {
        NodeKind::Source => {}
        NodeKind::Sink => {
            if let Some(t) = inputs.get("in") {
                emit(SINK_OBSERVATION_PORT, t.value);
            }
        }
        NodeKind::Add => {
            if let (Some(a), Some(b)) = (inputs.get("a"), inputs.get("b")) {
                emit("out", a.value + b.value);
            }
        }
        NodeKind::Mul => {
            if let (Some(a), Some(b)) = (inputs.get("a"), inputs.get("b")) {
                emit("out", a.value * b.value);
            }
        }
        NodeKind::Butterfly { twiddle } => {
            if let (Some(x0), Some(x1)) = (inputs.get("x0"), inputs.get("x1")) {
                let (y0, y1) = butterfly(x0.value.as_complex(), x1.value.as_complex(), twiddle);
                emit("y0", y0.into());
                emit("y1", y1.into());
            }
        }
        NodeKind::Dft4 => {
            let x = ["in0", "in1", "in2", "in3"].map(|p| inputs.get(p).map(|t| t.value.as_complex()));
            if let [Some(x0), Some(x1), Some(x2), Some(x3)] = x {
                let y = dft4([x0, x1, x2, x3]);
                for (port, value) in ["out0", "out1", "out2", "out3"].into_iter().zip(y) {
                    emit(port, value.into());
                }
            }
        }
        NodeKind::Twiddle(tw) => {
            if let Some(t) = inputs.get("in") {
                emit("out", (t.value.as_complex() * tw.factor()).into());
            }
        }
    }

    out
}

/// Radix-2 DIF butterfly: `(x0 + x1, (x0 − x1)·W)`.
///
/// Without a twiddle the difference branch is left unrotated.
#[inline]
pub fn butterfly(x0: Complex, x1: Complex, twiddle: Option<Twiddle>) -> (Complex, Complex) {
    let sum = x0 + x1;
    let diff = x0 - x1;
    match twiddle {
        Some(tw) => (sum, diff * tw.factor()),
        None => (sum, diff),
    }
}

/// 4-point DFT via two radix-2 stages.
///
/// ```text
/// E0 = x0 + x2    E1 = x0 − x2
/// O0 = x1 + x3    O1 = x1 − x3
/// X0 = E0 + O0    X2 = E0 − O0
/// X1 = E1 − j·O1  X3 = E1 + j·O1
/// ```
///
/// The `j` rotation is exact, so integer inputs give integer outputs.
pub fn dft4(x: [Complex; 4]) -> [Complex; 4] {
    let [x0, x1, x2, x3] = x;
    let e0 = x0 + x2;
    let e1 = x0 - x2;
    let o0 = x1 + x3;
    let o1 = x1 - x3;
    let jo1 = o1.mul_j();
    [e0 + o0, e1 - jo1, e0 - o0, e1 + jo1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenId;

    fn inputs(pairs: &[(&str, Value, Time)]) -> PortValues {
        let mut ids = TokenIdGen::starting_at(1000);
        let mut pv = PortValues::new();
        for (port, value, origin) in pairs {
            pv.insert(*port, Token::new(ids.next_id(), *value, *origin));
        }
        pv
    }

    fn c(re: f64, im: f64) -> Value {
        Value::Complex(Complex::new(re, im))
    }

    #[test]
    fn add_scalars_stays_scalar() {
        let node = NodeSpec::add("sum", 0.0);
        let mut ids = TokenIdGen::new();
        let out = execute(&node, &inputs(&[("a", 2.0.into(), 0.0), ("b", 3.0.into(), 0.0)]), 1.0, &mut ids);
        assert_eq!(out.get("out").unwrap().value, Value::Scalar(5.0));
    }

    #[test]
    fn mul_promotes_to_complex() {
        let node = NodeSpec::mul("m", 0.0);
        let mut ids = TokenIdGen::new();
        let out = execute(&node, &inputs(&[("a", 2.0.into(), 0.0), ("b", c(0.0, 1.0), 0.0)]), 0.0, &mut ids);
        assert_eq!(out.get("out").unwrap().value, c(0.0, 2.0));
    }

    #[test]
    fn missing_input_produces_nothing() {
        let node = NodeSpec::add("sum", 0.0);
        let mut ids = TokenIdGen::new();
        let out = execute(&node, &inputs(&[("a", 1.0.into(), 0.0)]), 0.0, &mut ids);
        assert!(out.is_empty());
        assert_eq!(ids.peek(), TokenId::new(0));
    }

    #[test]
    fn butterfly_without_twiddle() {
        let (y0, y1) = butterfly(Complex::new(3.0, 1.0), Complex::new(1.0, 2.0), None);
        assert_eq!(y0, Complex::new(4.0, 3.0));
        assert_eq!(y1, Complex::new(2.0, -1.0));
    }

    #[test]
    fn butterfly_with_twiddle_rotates_difference() {
        // W4^1 = -j
        let (y0, y1) = butterfly(Complex::ONE, Complex::ZERO, Twiddle::new(4, 1));
        assert_eq!(y0, Complex::ONE);
        assert!(y1.approx_eq(Complex::new(0.0, -1.0), 1e-12));
    }

    #[test]
    fn dft4_impulse_and_constant() {
        let y = dft4([Complex::ONE, Complex::ZERO, Complex::ZERO, Complex::ZERO]);
        assert_eq!(y, [Complex::ONE; 4]);

        let y = dft4([Complex::ONE; 4]);
        assert_eq!(y, [Complex::new(4.0, 0.0), Complex::ZERO, Complex::ZERO, Complex::ZERO]);
    }

    #[test]
    fn dft4_shifted_impulse_is_exact() {
        // x = δ[n-1] → X[k] = (-j)^k
        let y = dft4([Complex::ZERO, Complex::ONE, Complex::ZERO, Complex::ZERO]);
        assert_eq!(
            y,
            [
                Complex::ONE,
                Complex::new(0.0, -1.0),
                Complex::new(-1.0, 0.0),
                Complex::new(0.0, 1.0),
            ]
        );
    }

    #[test]
    fn dft4_node_emits_all_outputs() {
        let node = NodeSpec::dft4("d", 2.0);
        let mut ids = TokenIdGen::new();
        let pv = inputs(&[
            ("in0", 1.0.into(), 5.0),
            ("in1", 0.0.into(), 7.0),
            ("in2", 0.0.into(), 7.0),
            ("in3", 0.0.into(), 7.0),
        ]);
        let out = execute(&node, &pv, 10.0, &mut ids);
        assert_eq!(out.ports().collect::<Vec<_>>(), ["out0", "out1", "out2", "out3"]);
        for (_, t) in out.iter() {
            assert_eq!(t.value, c(1.0, 0.0));
            assert_eq!(t.arrival_time, 10.0);
            assert_eq!(t.origin_time, 5.0);
        }
    }

    #[test]
    fn origin_follows_declared_port_order() {
        let node = NodeSpec::butterfly("b", None, 0.0);
        let mut ids = TokenIdGen::new();
        // x1 was inserted first but x0 is the first declared input.
        let pv = inputs(&[("x1", 1.0.into(), 3.0), ("x0", 1.0.into(), 9.0)]);
        let out = execute(&node, &pv, 20.0, &mut ids);
        assert_eq!(out.get("y0").unwrap().origin_time, 9.0);
    }

    #[test]
    fn sink_reports_on_observation_port() {
        let node = NodeSpec::sink("snk0");
        let mut ids = TokenIdGen::new();
        let out = execute(&node, &inputs(&[("in", c(2.0, -1.0), 0.0)]), 4.0, &mut ids);
        assert_eq!(out.get(SINK_OBSERVATION_PORT).unwrap().value, c(2.0, -1.0));
    }

    #[test]
    fn source_never_produces() {
        let node = NodeSpec::source("src0");
        let mut ids = TokenIdGen::new();
        assert!(execute(&node, &PortValues::new(), 0.0, &mut ids).is_empty());
    }

    #[test]
    fn twiddle_node_reduces_exponent() {
        let node = NodeSpec::twiddle("tw", Twiddle::new(8, 10).unwrap(), 0.0);
        let mut ids = TokenIdGen::new();
        let out = execute(&node, &inputs(&[("in", 1.0.into(), 0.0)]), 0.0, &mut ids);
        let expected = Twiddle::new(8, 2).unwrap().factor();
        assert_eq!(out.get("out").unwrap().value, Value::Complex(expected));
    }

    #[test]
    fn fresh_ids_per_output() {
        let node = NodeSpec::butterfly("b", None, 0.0);
        let mut ids = TokenIdGen::new();
        let pv = inputs(&[("x0", 1.0.into(), 0.0), ("x1", 1.0.into(), 0.0)]);
        let out = execute(&node, &pv, 0.0, &mut ids);
        assert_eq!(out.get("y0").unwrap().id, TokenId::new(0));
        assert_eq!(out.get("y1").unwrap().id, TokenId::new(1));
    }
}
