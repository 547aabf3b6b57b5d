//! Sink value recording.

use std::collections::BTreeMap;

use fluxgraph_core::{Complex, NodeKind, NodeSpec, Observer, PortValues, SINK_OBSERVATION_PORT, Value};

/// Observer that keeps the last value each sink produced.
///
/// Values are stored both as numbers and in their JSON serialization
/// (`{"re":1.0,"im":0.0}` for complex values), which is the form
/// [`compare_with_reference`](crate::compare_with_reference) consumes.
#[derive(Debug, Clone, Default)]
pub struct SinkRecorder {
    values: BTreeMap<String, Value>,
    serialized: BTreeMap<String, String>,
    hits: u64,
}

impl SinkRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value observed at `sink`.
    pub fn value(&self, sink: &str) -> Option<Value> {
        self.values.get(sink).copied()
    }

    /// JSON serialization of the last value observed at `sink`.
    pub fn json(&self, sink: &str) -> Option<&str> {
        self.serialized.get(sink).map(String::as_str)
    }

    /// Every recorded sink, keyed by sink id.
    pub fn serialized(&self) -> &BTreeMap<String, String> {
        &self.serialized
    }

    /// Total sink observations, including overwritten ones.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of distinct sinks observed.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no sink has fired.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Forgets every recorded value.
    pub fn clear(&mut self) {
        self.values.clear();
        self.serialized.clear();
        self.hits = 0;
    }

    /// `snk0..snk{n-1}` as a spectrum; unobserved bins are zero.
    pub fn spectrum(&self, n: usize) -> Vec<Complex> {
        (0..n)
            .map(|k| {
                self.value(&format!("snk{k}"))
                    .map_or(Complex::ZERO, Value::as_complex)
            })
            .collect()
    }
}

impl Observer for SinkRecorder {
    fn on_output(&mut self, node: &NodeSpec, outputs: &PortValues) {
        if node.kind != NodeKind::Sink {
            return;
        }
        let Some(token) = outputs.get(SINK_OBSERVATION_PORT) else {
            return;
        };
        let id = node.id.to_string();
        if let Ok(json) = serde_json::to_string(&token.value) {
            self.serialized.insert(id.clone(), json);
        }
        self.values.insert(id, token.value);
        self.hits += 1;
    }
}
