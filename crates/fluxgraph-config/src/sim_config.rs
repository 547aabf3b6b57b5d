//! Simulation config file format.

use std::fmt;
use std::path::Path;

use fluxgraph_analysis::InputPreset;
use fluxgraph_core::{Graph, Time};
use fluxgraph_topology::TopologyKind;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, read_to_string, write_with_parents};
use crate::validation::{Checks, ValidationResult};

/// Everything needed to run one simulation.
///
/// # TOML Format
///
/// ```toml
/// [topology]
/// kind = "radix2"
/// size = 8
/// delay = 80.0
/// latency = 1.0
///
/// [run]
/// dt = 16.0
/// speed = 1.0
/// mode = "run"          # or "single-fire"
/// max_ticks = 10000
///
/// [stimulus]
/// preset = "impulse"
///
/// [verify]
/// epsilon = 1e-9
/// ```
///
/// Every table and field is optional and falls back to the values above.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Graph to build.
    pub topology: TopologyConfig,
    /// Tick loop settings.
    pub run: RunConfig,
    /// Input vector.
    pub stimulus: StimulusConfig,
    /// Reference comparison.
    pub verify: VerifyConfig,
}

/// `[topology]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// Generator.
    pub kind: TopologyKind,
    /// Transform size. Ignored by fixed-size kinds.
    pub size: usize,
    /// Channel delay.
    pub delay: Time,
    /// Node latency.
    pub latency: Time,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            kind: TopologyKind::Radix2,
            size: 8,
            delay: 80.0,
            latency: 1.0,
        }
    }
}

impl TopologyConfig {
    /// Size actually built: the kind's fixed size, else `size`.
    pub fn effective_size(&self) -> usize {
        self.kind.fixed_size().unwrap_or(self.size)
    }

    /// Generates the configured graph.
    pub fn build(&self) -> Result<Graph, ConfigError> {
        Ok(self
            .kind
            .build(self.effective_size(), self.delay, self.latency)?)
    }
}

/// How many nodes may fire per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Every eligible node fires.
    #[default]
    Run,
    /// At most one node fires per tick.
    SingleFire,
}

impl RunMode {
    /// `max_fires` argument for [`Scheduler::tick`](fluxgraph_core::Scheduler::tick).
    pub fn max_fires(self) -> Option<usize> {
        match self {
            Self::Run => None,
            Self::SingleFire => Some(1),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Run => "run",
            Self::SingleFire => "single-fire",
        })
    }
}

/// `[run]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Base time step per tick.
    pub dt: Time,
    /// Multiplier on `dt`.
    pub speed: f64,
    /// Firing mode.
    pub mode: RunMode,
    /// Upper bound on ticks when running to completion.
    pub max_ticks: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dt: 16.0,
            speed: 1.0,
            mode: RunMode::Run,
            max_ticks: 10_000,
        }
    }
}

/// `[stimulus]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StimulusConfig {
    /// Input vector fed to the sources.
    pub preset: InputPreset,
}

/// `[verify]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Per-component tolerance.
    pub epsilon: f64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self { epsilon: 1e-9 }
    }
}

impl SimConfig {
    /// Loads and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_toml(&read_to_string(path.as_ref())?)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a config from TOML without validating it.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Saves the config, creating the parent directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        write_with_parents(path.as_ref(), &self.to_toml()?)
    }

    /// Serializes the config to pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks every numeric field, reporting all failures at once.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut checks = Checks::default();
        if self.topology.kind.fixed_size().is_none() {
            checks.power_of_two("topology.size", self.topology.size);
        }
        checks
            .non_negative("topology.delay", self.topology.delay)
            .non_negative("topology.latency", self.topology.latency)
            .positive("run.dt", self.run.dt)
            .positive("run.speed", self.run.speed)
            .non_negative("verify.epsilon", self.verify.epsilon)
            .finish()
    }

    /// Time advanced per tick: `dt · speed`.
    pub fn step(&self) -> Time {
        self.run.dt * self.run.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;

    #[test]
    fn defaults() {
        let c = SimConfig::default();
        assert_eq!(c.topology.kind, TopologyKind::Radix2);
        assert_eq!(c.topology.size, 8);
        assert_eq!(c.topology.delay, 80.0);
        assert_eq!(c.topology.latency, 1.0);
        assert_eq!(c.run.dt, 16.0);
        assert_eq!(c.run.speed, 1.0);
        assert_eq!(c.run.mode, RunMode::Run);
        assert_eq!(c.run.max_ticks, 10_000);
        assert_eq!(c.stimulus.preset, InputPreset::Impulse);
        assert_eq!(c.verify.epsilon, 1e-9);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(SimConfig::from_toml("").unwrap(), SimConfig::default());
    }

    #[test]
    fn partial_tables() {
        let c = SimConfig::from_toml(
            r#"
            [topology]
            kind = "dft4x4"

            [run]
            mode = "single-fire"
            speed = 2.0

            [stimulus]
            preset = "sin1+3"
            "#,
        )
        .unwrap();
        assert_eq!(c.topology.kind, TopologyKind::Dft4x4);
        assert_eq!(c.topology.effective_size(), 16);
        assert_eq!(c.run.mode.max_fires(), Some(1));
        assert_eq!(c.step(), 32.0);
        assert_eq!(c.stimulus.preset, InputPreset::Sin1Plus3);
        assert_eq!(c.run.dt, 16.0);
    }

    #[test]
    fn unknown_values_fail_to_parse() {
        assert!(SimConfig::from_toml("[topology]\nkind = \"fft9\"").is_err());
        assert!(SimConfig::from_toml("[run]\nmode = \"walk\"").is_err());
        assert!(SimConfig::from_toml("[stimulus]\npreset = \"noise\"").is_err());
    }

    #[test]
    fn validation_rejects_bad_fields() {
        let mut c = SimConfig::default();
        c.topology.size = 12;
        assert_eq!(
            c.validate(),
            Err(ValidationError::NotPowerOfTwo {
                field: "topology.size",
                value: 12
            })
        );

        c.topology.size = 8;
        c.run.dt = 0.0;
        c.verify.epsilon = -1.0;
        assert!(matches!(c.validate(), Err(ValidationError::Multiple(v)) if v.len() == 2));
    }

    #[test]
    fn fixed_size_kinds_ignore_size() {
        let mut c = SimConfig::default();
        c.topology.kind = TopologyKind::Butterfly;
        c.topology.size = 3;
        assert!(c.validate().is_ok());
        assert_eq!(c.topology.build().unwrap().source_count(), 2);
    }

    #[test]
    fn toml_round_trip() {
        let mut c = SimConfig::default();
        c.topology.size = 32;
        c.run.mode = RunMode::SingleFire;
        let text = c.to_toml().unwrap();
        assert!(text.contains("mode = \"single-fire\""), "{text}");
        assert_eq!(SimConfig::from_toml(&text).unwrap(), c);
    }
}
