//! qstep.toml and circuit file loading

use anyhow::{Context, Result};
use qstep_core::{Circuit, SimulatorConfig};
use qstep_timeline::{ControllerConfig, SessionConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file looked up in the current directory
pub const CONFIG_FILE: &str = "qstep.toml";

/// Settings read from qstep.toml
///
/// Run defaults live with the controller so `simulate`, `state` and `replay`
/// share one source; command-line flags override only what they set.
///
/// ```toml
/// [session]
/// tick_interval = 500
///
/// [session.controller]
/// shots = 2048
/// seed = 7
///
/// [session.controller.simulator]
/// max_qubits = 12
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub session: SessionConfig,
}

/// Flags that override file settings for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOverrides {
    pub qubits: Option<usize>,
    pub shots: Option<usize>,
    pub seed: Option<u64>,
}

impl CliConfig {
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse qstep.toml")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Controller settings for a circuit: file values with the flags applied
    ///
    /// The register size always comes from the flag, the circuit file, or the
    /// circuit itself.
    pub fn controller_for(&self, loaded: &LoadedCircuit, overrides: RunOverrides) -> ControllerConfig {
        let mut controller = self.session.controller.clone();
        controller.num_qubits = loaded.register_size(overrides.qubits);
        if let Some(shots) = overrides.shots {
            controller.shots = shots;
        }
        if overrides.seed.is_some() {
            controller.seed = overrides.seed;
        }
        controller
    }

    /// Simulator settings for a single run (seed: flag, controller, simulator)
    pub fn simulator_for(&self, overrides: RunOverrides) -> SimulatorConfig {
        let controller = &self.session.controller;
        SimulatorConfig {
            seed: overrides.seed.or(controller.seed).or(controller.simulator.seed),
            ..controller.simulator.clone()
        }
    }

    /// Explicit path must exist; otherwise `./qstep.toml` is optional
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// A circuit file: a bare gate array or a document with the register size
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CircuitFile {
    Gates(Circuit),
    Document {
        #[serde(rename = "numQubits")]
        num_qubits: Option<usize>,
        gates: Circuit,
    },
}

/// Circuit plus the register size it asked for (if any)
#[derive(Debug, Clone)]
pub struct LoadedCircuit {
    pub circuit: Circuit,
    pub num_qubits: Option<usize>,
}

impl LoadedCircuit {
    pub fn parse(content: &str) -> Result<Self> {
        let file: CircuitFile = serde_json::from_str(content).context("Invalid circuit JSON")?;
        Ok(match file {
            CircuitFile::Document { num_qubits, gates } => Self {
                circuit: gates,
                num_qubits,
            },
            CircuitFile::Gates(circuit) => Self {
                circuit,
                num_qubits: None,
            },
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to load circuit {}", path.display()))
    }

    /// Register size: flag, then file, then the smallest that fits (at least 1)
    pub fn register_size(&self, flag: Option<usize>) -> usize {
        flag.or(self.num_qubits)
            .unwrap_or_else(|| self.circuit.required_qubits().max(1))
    }
}
