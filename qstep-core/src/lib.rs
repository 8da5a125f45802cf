//! # ⚛️ qstep-core — State-Vector Engine
//!
//! Simula a evolução de um registrador quântico pequeno sob portas single-qubit
//! posicionadas em uma grade (qubit × step), amostra medições e reduz um qubit
//! para coordenadas de Bloch.
//!
//! ## Computational Complexity
//!
//! **Gate application — O(2^n):**
//! - n = número de qubits do registrador
//! - Cada índice da base pertence a exatamente um par (i, i | mask)
//!
//! **Simulation — O(G × 2^n + S × 2^n):**
//! - G = portas no circuito, S = shots
//! - Amostragem percorre a tabela de probabilidades por shot
//!
//! **Bloch reduction — O(G):**
//! - Estado de 2 amplitudes, independente de n
//!
//! **Scalability:**
//! - n ≤ 10: ✓ tempo real por frame
//! - n ≤ 16: △ limite padrão de `SimulatorConfig::max_qubits`
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │          CircuitSimulator                       │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  Circuit (Gate × step, validação)         │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  StateVector (2^n Complex) ← Matrix2x2    │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  Probabilities + Shot Sampling            │  │
//! │  └───────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Portas de dois qubits (CNOT, CZ, SWAP) e marcadores de medição são aceitos
//! no circuito mas não evoluem o estado.
//!
//! ## Exemplo
//!
//! ```
//! use qstep_core::{Circuit, Gate, GateKind, simulate, reduce_single_qubit};
//!
//! let circuit = Circuit::from_gates(vec![Gate::new("g1", GateKind::H, 0, 0)]);
//! let result = simulate(&circuit, 1, 1000).unwrap();
//! assert_eq!(result.total_counts(), 1000);
//!
//! let angles = reduce_single_qubit(circuit.gates());
//! assert!((angles.theta - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
//! ```

pub mod bloch;
pub mod circuit;
pub mod complex;
pub mod error;
pub mod gates;
pub mod simulator;
pub mod state;

pub use bloch::{BlochAngles, BlochVector, reduce_qubit, reduce_single_qubit};
pub use circuit::{Circuit, Gate, GateRecord};
pub use complex::Complex;
pub use error::{QuantumError, QuantumResult};
pub use gates::{
    GateKind, Matrix2x2, QuantumGate, matrix_for,
    Identity, Hadamard, PauliX, PauliY, PauliZ, SGate, TGate,
    RotationX, RotationY, RotationZ, Phase,
};
pub use simulator::{CircuitSimulator, SimulationResult, SimulatorConfig, simulate};
pub use state::{NOISE_FLOOR, StateVector, apply_gate, basis_label};
