//! Tipos de erro para qstep-core

use thiserror::Error;

/// Resultado customizado para operações quânticas
pub type QuantumResult<T> = Result<T, QuantumError>;

/// Erros que podem ocorrer na aceitação ou simulação de um circuito
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantumError {
    #[error("Unknown gate type: {0:?}")]
    UnknownGate(String),

    #[error("Gate {0} requires an angle parameter")]
    MissingAngle(String),

    #[error("Gate {0} requires a target qubit")]
    MissingTarget(String),

    #[error("Gate {0} is not a single-qubit unitary")]
    NotSingleQubit(String),

    #[error("Qubit index {qubit} out of range for a {num_qubits}-qubit register")]
    QubitOutOfRange { qubit: usize, num_qubits: usize },

    #[error("Gate uses qubit {0} as both control and target")]
    DuplicateQubit(usize),

    #[error("Invalid qubit count {requested}: must be between 1 and {max}")]
    InvalidQubitCount { requested: usize, max: usize },

    #[error("Invalid shot count {shots}: must be between 1 and {max}")]
    InvalidShots { shots: usize, max: usize },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Invalid state: {0}")]
    InvalidState(String),
}
