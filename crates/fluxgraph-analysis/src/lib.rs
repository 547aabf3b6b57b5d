//! Fluxgraph Analysis - checking dataflow FFT networks against a reference
//!
//! - [`reference`] - rustfft-backed reference DFT and a naive cross-check
//! - [`verify`] - per-sink comparison of recorded values with the reference
//! - [`recorder`] - [`SinkRecorder`] observer capturing sink outputs
//! - [`stimulus`] - named input vectors ([`InputPreset`])
//! - [`spectrum`] - magnitude, dB and phase views of a spectrum
//!
//! ## Example Workflow
//!
//! ```rust,ignore
//! use fluxgraph_analysis::{InputPreset, SinkRecorder, compare_with_reference};
//! use fluxgraph_core::Scheduler;
//!
//! // 1. Build a network and attach a recorder
//! let graph = fluxgraph_topology::radix2(8, 0.0)?;
//! let mut s = Scheduler::new(graph)?.with_observer(SinkRecorder::new());
//!
//! // 2. Feed a stimulus and tick until drained
//! let input = InputPreset::Sin1.generate(8);
//! // ...
//!
//! // 3. Verify
//! let result = compare_with_reference(s.graph(), &last_input, s.observer().serialized(), 1e-9);
//! assert!(result.all_match());
//! ```

pub mod recorder;
pub mod reference;
pub mod spectrum;
pub mod stimulus;
pub mod verify;

pub use recorder::SinkRecorder;
pub use reference::{ReferenceFft, naive_dft, reference_dft};
pub use spectrum::{magnitude, magnitude_db, peak_bin, phase, relative_db};
pub use stimulus::{InputPreset, UnknownPreset};
pub use verify::{CompareResult, compare_with_reference};
