//! Vetor de estado: 2^n amplitudes de um registrador de n qubits
//!
//! O bit `k` do índice da base é o valor do qubit `k`. Cada aplicação de porta
//! percorre os pares de índices que diferem apenas no bit do qubit alvo — O(2^n).

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::complex::Complex;
use crate::error::{QuantumError, QuantumResult};
use crate::gates::Matrix2x2;
use crate::circuit::Gate;

/// Amplitudes abaixo deste valor são tratadas como ruído numérico
pub const NOISE_FLOOR: f64 = 1e-10;

/// Vetor de estado de um registrador
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    num_qubits: usize,
    amplitudes: Vec<Complex>,
}

impl StateVector {
    /// Estado |0...0⟩
    ///
    /// Falha se `2^n` não cabe em `usize`.
    pub fn zero(num_qubits: usize) -> QuantumResult<Self> {
        let dim = u32::try_from(num_qubits)
            .ok()
            .and_then(|shift| 1usize.checked_shl(shift))
            .ok_or(QuantumError::InvalidQubitCount {
                requested: num_qubits,
                max: usize::BITS as usize - 1,
            })?;

        let mut amplitudes = vec![Complex::ZERO; dim];
        amplitudes[0] = Complex::ONE;
        Ok(Self { num_qubits, amplitudes })
    }

    /// Cria a partir de amplitudes arbitrárias (normaliza)
    pub fn from_amplitudes(amplitudes: Vec<Complex>) -> QuantumResult<Self> {
        let dim = amplitudes.len();
        if dim == 0 || !dim.is_power_of_two() {
            return Err(QuantumError::InvalidState(format!(
                "amplitude count {dim} is not a power of two"
            )));
        }

        let norm = amplitudes.iter().map(|a| a.norm_sq()).sum::<f64>().sqrt();
        if norm < NOISE_FLOOR {
            return Err(QuantumError::InvalidState("zero-norm state".into()));
        }

        Ok(Self {
            num_qubits: dim.trailing_zeros() as usize,
            amplitudes: amplitudes.into_iter().map(|a| a.scale(1.0 / norm)).collect(),
        })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Dimensão do espaço (2^n)
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn amplitudes(&self) -> &[Complex] {
        &self.amplitudes
    }

    pub fn amplitude(&self, index: usize) -> Option<Complex> {
        self.amplitudes.get(index).copied()
    }

    fn check_qubit(&self, qubit: usize) -> QuantumResult<()> {
        if qubit >= self.num_qubits {
            return Err(QuantumError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    /// Aplica matriz single-qubit, retornando novo estado
    pub fn apply(&self, matrix: &Matrix2x2, qubit: usize) -> QuantumResult<StateVector> {
        let mut next = self.clone();
        next.apply_in_place(matrix, qubit)?;
        Ok(next)
    }

    /// Aplica matriz single-qubit no próprio estado
    ///
    /// Índice fora do registrador é rejeitado antes de qualquer escrita.
    pub fn apply_in_place(&mut self, matrix: &Matrix2x2, qubit: usize) -> QuantumResult<()> {
        self.check_qubit(qubit)?;

        let mask = 1usize << qubit;
        let [[m00, m01], [m10, m11]] = matrix.elements;

        for i in 0..self.amplitudes.len() {
            if i & mask != 0 {
                continue;
            }
            let i1 = i | mask;
            let a0 = self.amplitudes[i];
            let a1 = self.amplitudes[i1];
            self.amplitudes[i] = m00.mul(a0).add(m01.mul(a1));
            self.amplitudes[i1] = m10.mul(a0).add(m11.mul(a1));
        }
        Ok(())
    }

    /// Σ|amp|²
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sq()).sum()
    }

    /// Verifica normalização
    pub fn is_normalized(&self, epsilon: f64) -> bool {
        (self.total_probability() - 1.0).abs() < epsilon
    }

    /// Distribuição de probabilidade sobre a base computacional
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sq()).collect()
    }

    /// Probabilidade de medir `outcome` no qubit
    pub fn qubit_probability(&self, qubit: usize, outcome: bool) -> QuantumResult<f64> {
        self.check_qubit(qubit)?;
        Ok(self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| ((i >> qubit) & 1 == 1) == outcome)
            .map(|(_, a)| a.norm_sq())
            .sum())
    }

    /// Mede um qubit e retorna (resultado, estado colapsado)
    pub fn measure_qubit<R: Rng + ?Sized>(
        &self,
        qubit: usize,
        rng: &mut R,
    ) -> QuantumResult<(bool, StateVector)> {
        let p0 = self.qubit_probability(qubit, false)?;
        let outcome = rng.random::<f64>() >= p0;

        let kept: Vec<Complex> = self
            .amplitudes
            .iter()
            .enumerate()
            .map(|(i, &a)| {
                if ((i >> qubit) & 1 == 1) == outcome {
                    a
                } else {
                    Complex::ZERO
                }
            })
            .collect();

        Ok((outcome, StateVector::from_amplitudes(kept)?))
    }

    /// Mede todos os qubits em sequência (qubit 0 primeiro)
    ///
    /// O estado devolvido é o estado da base correspondente aos resultados.
    pub fn measure_all<R: Rng + ?Sized>(&self, rng: &mut R) -> QuantumResult<(Vec<bool>, StateVector)> {
        (0..self.num_qubits).try_fold(
            (Vec::with_capacity(self.num_qubits), self.clone()),
            |(mut outcomes, state), qubit| {
                let (outcome, collapsed) = state.measure_qubit(qubit, rng)?;
                outcomes.push(outcome);
                Ok((outcomes, collapsed))
            },
        )
    }

    /// Fidelidade |⟨self|other⟩|²
    pub fn fidelity(&self, other: &StateVector) -> QuantumResult<f64> {
        if self.dimension() != other.dimension() {
            return Err(QuantumError::DimensionMismatch {
                expected: self.dimension(),
                got: other.dimension(),
            });
        }
        let overlap = self
            .amplitudes
            .iter()
            .zip(&other.amplitudes)
            .fold(Complex::ZERO, |acc, (a, b)| acc.add(a.conj().mul(*b)));
        Ok(overlap.norm_sq())
    }

    /// Entropia de Shannon (bits) da distribuição na base computacional
    pub fn entropy(&self) -> f64 {
        -self
            .amplitudes
            .iter()
            .map(|a| a.norm_sq())
            .filter(|&p| p > NOISE_FLOOR)
            .map(|p| p * p.log2())
            .sum::<f64>()
    }

    /// Vetor de Bloch (x, y, z) do qubit via traço parcial
    pub fn bloch_vector(&self, qubit: usize) -> QuantumResult<(f64, f64, f64)> {
        self.check_qubit(qubit)?;
        let mask = 1usize << qubit;

        // ρ00, ρ11 reais; ρ01 complexo
        let mut rho00 = 0.0;
        let mut rho11 = 0.0;
        let mut rho01 = Complex::ZERO;
        for i in 0..self.amplitudes.len() {
            if i & mask != 0 {
                continue;
            }
            let a0 = self.amplitudes[i];
            let a1 = self.amplitudes[i | mask];
            rho00 += a0.norm_sq();
            rho11 += a1.norm_sq();
            rho01 = rho01.add(a0.mul(a1.conj()));
        }

        Ok((2.0 * rho01.re, -2.0 * rho01.im, rho00 - rho11))
    }

    /// Rótulo MSB-first da base, com `num_qubits` dígitos
    pub fn basis_label(&self, index: usize) -> String {
        basis_label(index, self.num_qubits)
    }
}

/// Rótulo binário MSB-first (qubit n-1 à esquerda)
pub fn basis_label(index: usize, num_qubits: usize) -> String {
    format!("{:0width$b}", index, width = num_qubits)
}

/// Aplica uma porta do circuito ao estado
///
/// Portas sem matriz 2x2 (medição, dois qubits) resultam em `NotSingleQubit`.
pub fn apply_gate(state: &StateVector, gate: &Gate) -> QuantumResult<StateVector> {
    let matrix = gate
        .kind
        .matrix()
        .ok_or_else(|| QuantumError::NotSingleQubit(gate.kind.id().to_string()))?;
    state.apply(&matrix, gate.qubit)
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            if amp.abs() <= NOISE_FLOOR {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            write!(f, "{}|{}⟩", amp, self.basis_label(i))?;
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}
