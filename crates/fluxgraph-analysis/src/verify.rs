//! Sink values checked against a reference DFT.

use std::collections::BTreeMap;

use fluxgraph_core::{Complex, Graph, Value};

use crate::reference::reference_dft;

/// Outcome of [`compare_with_reference`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompareResult {
    /// Reference spectrum, one bin per sink.
    pub reference: Vec<Complex>,
    /// `(sink id, mismatched)` in bin order.
    pub mismatches: Vec<(String, bool)>,
}

impl CompareResult {
    /// Returns true if every sink matched.
    pub fn all_match(&self) -> bool {
        self.mismatches.iter().all(|(_, bad)| !bad)
    }

    /// Number of mismatched sinks.
    pub fn mismatch_count(&self) -> usize {
        self.mismatches.iter().filter(|(_, bad)| *bad).count()
    }

    /// Whether `sink` mismatched. Unknown sinks report `false`.
    pub fn is_mismatch(&self, sink: &str) -> bool {
        self.mismatches
            .iter()
            .any(|(id, bad)| *bad && id == sink)
    }
}

/// Compares recorded sink values against the DFT of the last input.
///
/// `N` is the graph's source count. The input vector is read from
/// `src0..src{N-1}` in `last_input` (absent entries are zero) and bin `k` is
/// checked against sink `snk{k}`. `sinks` maps sink ids to the JSON
/// serialization of their last value; a missing or unparsable entry counts
/// as a mismatch, as does any component differing by more than `eps`.
pub fn compare_with_reference(
    graph: &Graph,
    last_input: &BTreeMap<String, Complex>,
    sinks: &BTreeMap<String, String>,
    eps: f64,
) -> CompareResult {
    let n = graph.source_count();
    let input: Vec<Complex> = (0..n)
        .map(|i| {
            last_input
                .get(&format!("src{i}"))
                .copied()
                .unwrap_or(Complex::ZERO)
        })
        .collect();
    let reference = reference_dft(&input);

    let mismatches = reference
        .iter()
        .enumerate()
        .map(|(k, expected)| {
            let id = format!("snk{k}");
            let bad = match sinks.get(&id).and_then(|json| parse_value(json)) {
                Some(observed) => differs(observed, *expected, eps),
                None => true,
            };
            (id, bad)
        })
        .collect();

    CompareResult {
        reference,
        mismatches,
    }
}

fn parse_value(json: &str) -> Option<Complex> {
    serde_json::from_str::<Value>(json)
        .ok()
        .map(Value::as_complex)
}

fn differs(observed: Complex, expected: Complex, eps: f64) -> bool {
    (observed.re - expected.re).abs() > eps || (observed.im - expected.im).abs() > eps
}
