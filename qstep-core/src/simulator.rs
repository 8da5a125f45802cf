//! Simulador de circuitos: ordena portas, evolui o vetor de estado e amostra medições

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::circuit::Circuit;
use crate::error::{QuantumError, QuantumResult};
use crate::state::{NOISE_FLOOR, StateVector, basis_label};

/// Configuração do simulador
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Maior registrador aceito (memória cresce com 2^n)
    pub max_qubits: usize,
    /// Maior número de shots por execução
    pub max_shots: usize,
    /// Probabilidades abaixo deste valor são descartadas
    pub noise_floor: f64,
    /// Seed para amostragem determinística (`None` = entropia do SO)
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: 16,
            max_shots: 1_000_000,
            noise_floor: NOISE_FLOOR,
            seed: None,
        }
    }
}

/// Resultado de uma simulação
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Contagem de medições por bitstring
    pub counts: BTreeMap<String, u64>,
    /// Probabilidade por bitstring (acima do piso de ruído)
    pub probabilities: BTreeMap<String, f64>,
    pub shots: usize,
    pub num_qubits: usize,
    /// Portas que evoluíram o estado
    pub applied_gates: usize,
    /// Marcadores de medição e portas de dois qubits ignorados
    pub skipped_gates: usize,
}

impl SimulationResult {
    fn empty(num_qubits: usize, shots: usize) -> Self {
        Self {
            num_qubits,
            shots,
            ..Default::default()
        }
    }

    /// Total de contagens amostradas
    pub fn total_counts(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Resultado mais frequente
    pub fn most_likely(&self) -> Option<(&str, f64)> {
        self.probabilities
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, &p)| (k.as_str(), p))
    }
}

/// Simulador de circuitos em vetor de estado
#[derive(Debug, Clone, Default)]
pub struct CircuitSimulator {
    config: SimulatorConfig,
}

impl CircuitSimulator {
    /// Cria simulador com configuração padrão
    pub fn new() -> Self {
        Self::default()
    }

    /// Cria simulador com configuração customizada
    pub fn with_config(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Valida registrador, shots e portas antes de qualquer simulação
    pub fn validate(&self, circuit: &Circuit, num_qubits: usize, shots: usize) -> QuantumResult<()> {
        if num_qubits == 0 || num_qubits > self.config.max_qubits {
            return Err(QuantumError::InvalidQubitCount {
                requested: num_qubits,
                max: self.config.max_qubits,
            });
        }
        if shots == 0 || shots > self.config.max_shots {
            return Err(QuantumError::InvalidShots {
                shots,
                max: self.config.max_shots,
            });
        }
        circuit.validate(num_qubits)
    }

    /// Evolui |0...0⟩ pelo circuito, retornando o estado final
    ///
    /// Retorna também (aplicadas, ignoradas).
    pub fn evolve(&self, circuit: &Circuit, num_qubits: usize) -> QuantumResult<(StateVector, usize, usize)> {
        let mut state = StateVector::zero(num_qubits)?;
        let mut applied = 0;
        let mut skipped = 0;

        for gate in circuit.sorted_by_step() {
            match gate.kind.matrix() {
                Some(matrix) => {
                    state.apply_in_place(&matrix, gate.qubit)?;
                    applied += 1;
                }
                None => {
                    debug!(gate = %gate.kind, id = %gate.id, step = gate.step, "skipping gate without single-qubit matrix");
                    skipped += 1;
                }
            }
        }

        Ok((state, applied, skipped))
    }

    /// Estado final do circuito (com validação de fronteira)
    pub fn final_state(&self, circuit: &Circuit, num_qubits: usize) -> QuantumResult<StateVector> {
        self.validate(circuit, num_qubits, 1)?;
        Ok(self.evolve(circuit, num_qubits)?.0)
    }

    /// Simula o circuito e amostra `shots` medições
    pub fn simulate(&self, circuit: &Circuit, num_qubits: usize, shots: usize) -> QuantumResult<SimulationResult> {
        match self.config.seed {
            Some(seed) => self.simulate_with_rng(circuit, num_qubits, shots, &mut StdRng::seed_from_u64(seed)),
            None => self.simulate_with_rng(circuit, num_qubits, shots, &mut rand::rng()),
        }
    }

    /// Simula usando um gerador fornecido pelo chamador
    pub fn simulate_with_rng<R: Rng + ?Sized>(
        &self,
        circuit: &Circuit,
        num_qubits: usize,
        shots: usize,
        rng: &mut R,
    ) -> QuantumResult<SimulationResult> {
        if circuit.is_empty() {
            return Ok(SimulationResult::empty(num_qubits, shots));
        }
        self.validate(circuit, num_qubits, shots)?;

        let (state, applied_gates, skipped_gates) = self.evolve(circuit, num_qubits)?;

        let table: Vec<(String, f64)> = state
            .probabilities()
            .into_iter()
            .enumerate()
            .filter(|&(_, p)| p > self.config.noise_floor)
            .map(|(i, p)| (basis_label(i, num_qubits), p))
            .collect();

        let counts = sample_counts(&table, shots, rng);
        debug!(num_qubits, shots, applied_gates, skipped_gates, outcomes = table.len(), "circuit simulated");

        Ok(SimulationResult {
            counts,
            probabilities: table.into_iter().collect(),
            shots,
            num_qubits,
            applied_gates,
            skipped_gates,
        })
    }
}

/// Amostragem por probabilidade acumulada
///
/// A tabela é percorrida em ordem; a primeira saída com acumulado >= sorteio
/// recebe o shot. Sorteios acima do total acumulado vão para a última saída.
fn sample_counts<R: Rng + ?Sized>(table: &[(String, f64)], shots: usize, rng: &mut R) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    let Some(last) = table.last() else {
        return counts;
    };

    for _ in 0..shots {
        let r: f64 = rng.random();
        let mut cumulative = 0.0;
        let mut selected = &last.0;
        for (label, p) in table {
            cumulative += p;
            if cumulative >= r {
                selected = label;
                break;
            }
        }
        *counts.entry(selected.clone()).or_insert(0) += 1;
    }
    counts
}

/// Simula com configuração padrão
pub fn simulate(circuit: &Circuit, num_qubits: usize, shots: usize) -> QuantumResult<SimulationResult> {
    CircuitSimulator::new().simulate(circuit, num_qubits, shots)
}
