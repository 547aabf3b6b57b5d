//! fluxgraph Core - discrete-time dataflow simulation
//!
//! This crate runs static dataflow graphs of small numeric units (adders,
//! multipliers, FFT butterflies, 4-point DFT blocks, twiddle multipliers)
//! connected by delayed, buffered channels. Time is simulated; nothing here
//! reads a wall clock, so every run is reproducible.
//!
//! # Core Abstractions
//!
//! ## Values
//!
//! - [`Complex`] - Double-precision complex number with exact `j` rotation
//! - [`Value`] - Scalar or complex token payload
//! - [`Token`] - Immutable value in flight, with arrival and origin times
//!
//! ## Graph Model
//!
//! - [`Graph`] - Immutable list of [`NodeSpec`]s and [`Edge`]s
//! - [`NodeKind`] - Closed set of node computations
//! - [`ChannelBuffer`] - Per-edge FIFO gated by the edge delay
//!
//! ## Execution
//!
//! - [`Scheduler`] - Tick-driven runtime: transfer, then fire
//! - [`execute`] - Pure per-kind node computation
//! - [`Clock`] / [`VirtualClock`] - Injectable source of simulated time
//!
//! ## Observation
//!
//! - [`Observer`] - Synchronous hooks with no-op defaults
//! - [`TraceRecorder`] - Records every event
//! - [`RuntimeMetrics`] - Throughput, latency and queue-depth averages
//!
//! # no_std Support
//!
//! The crate is `no_std` + `alloc` compatible. Disable the default `std`
//! feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! fluxgraph-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Features
//!
//! - `std` (default): `std::error::Error` impls for error types
//! - `tracing`: `debug!` events for binding, firing and mailbox overwrites
//! - `serde`: `Serialize`/`Deserialize` for [`Complex`], [`Value`] and [`Token`]

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod complex;
pub mod executor;
pub mod graph;
pub mod metrics;
pub mod observer;
pub mod ports;
pub mod scheduler;
pub mod time;
pub mod token;

pub use complex::{Complex, Twiddle, complex_multiply, twiddle_factor};
pub use executor::{butterfly, dft4, execute};
pub use graph::{
    ChannelBuffer, Edge, EdgeId, Graph, GraphError, NodeId, NodeKind, NodeSpec, PortId, PortRef,
    SINK_OBSERVATION_PORT,
};
pub use metrics::{Ema, RuntimeMetrics};
pub use observer::{Observer, TraceEvent, TraceRecorder};
pub use ports::PortValues;
pub use scheduler::{Scheduler, SchedulerError, SchedulerStats};
pub use time::{Clock, Time, VirtualClock};
pub use token::{Token, TokenId, TokenIdGen, Value};
