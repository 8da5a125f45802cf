//! Redução de um qubit para coordenadas na esfera de Bloch
//!
//! |ψ⟩ = cos(θ/2)|0⟩ + e^(iφ)sin(θ/2)|1⟩, com θ ∈ [0, π] e φ ∈ [0, 2π).

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::circuit::{Circuit, Gate};
use crate::complex::Complex;
use crate::error::QuantumResult;

/// Ângulos esféricos (radianos)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BlochAngles {
    /// Ângulo polar θ ∈ [0, π]
    pub theta: f64,
    /// Ângulo azimutal φ ∈ [0, 2π)
    pub phi: f64,
}

/// Coordenadas cartesianas na esfera unitária (+z = |0⟩)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BlochVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl BlochAngles {
    /// Polo norte (|0⟩)
    pub const NORTH: Self = Self { theta: 0.0, phi: 0.0 };

    /// Ângulos a partir do par de amplitudes (α, β)
    pub fn from_state(state: [Complex; 2]) -> Self {
        let [alpha, beta] = state;
        // erro de ponto flutuante pode levar |α| levemente acima de 1
        let theta = 2.0 * alpha.abs().clamp(-1.0, 1.0).acos();
        let phi = (beta.arg() - alpha.arg()).rem_euclid(TAU);
        // rem_euclid pode arredondar para exatamente TAU
        let phi = if phi >= TAU { 0.0 } else { phi };
        Self { theta, phi }
    }

    pub fn to_vector(self) -> BlochVector {
        BlochVector::from_angles(self)
    }
}

impl BlochVector {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_angles(angles: BlochAngles) -> Self {
        let (sin_t, cos_t) = angles.theta.sin_cos();
        let (sin_p, cos_p) = angles.phi.sin_cos();
        Self {
            x: sin_t * cos_p,
            y: sin_t * sin_p,
            z: cos_t,
        }
    }

    /// Norma (1 para estados puros)
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Reduz portas de um único qubit para ângulos de Bloch
///
/// Lista vazia retorna o polo norte sem executar a redução. Marcadores de medição
/// e portas de dois qubits são ignorados.
pub fn reduce_single_qubit(gates: &[Gate]) -> BlochAngles {
    if gates.is_empty() {
        return BlochAngles::NORTH;
    }

    let mut sorted: Vec<&Gate> = gates.iter().collect();
    sorted.sort_by_key(|g| g.step);

    let state = sorted
        .into_iter()
        .filter_map(|g| g.kind.matrix())
        .fold([Complex::ONE, Complex::ZERO], |state, m| m.apply(state));

    BlochAngles::from_state(state)
}

/// Ângulos de Bloch de um qubit do circuito
///
/// Considera apenas as portas single-qubit que atuam sobre `qubit`.
pub fn reduce_qubit(circuit: &Circuit, qubit: usize) -> QuantumResult<BlochAngles> {
    circuit.validate(circuit.required_qubits().max(qubit + 1))?;
    Ok(reduce_single_qubit(&circuit.gates_on_qubit(qubit)))
}
