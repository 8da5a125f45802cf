//! Tipos de erro para qstep-timeline

use qstep_core::QuantumError;
use thiserror::Error;

/// Resultado customizado para operações de timeline
pub type TimelineResult<T> = Result<T, TimelineError>;

/// Erros que podem ocorrer no controle da timeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineError {
    #[error("Circuit rejected: {0}")]
    Quantum(#[from] QuantumError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantum_error_conversion() {
        let err: TimelineError = QuantumError::UnknownGate("W".into()).into();
        assert!(err.to_string().starts_with("Circuit rejected"));
    }
}
