//! # Quantum Gates — biblioteca de matrizes
//!
//! Mapeia cada identificador de porta para sua matriz unitária 2x2.
//!
//! ## Gates Implementadas
//!
//! - **Single-qubit**: I, H (Hadamard), X, Y, Z (Pauli), S, T (Phase)
//! - **Rotation**: Rx, Ry, Rz, P(φ)
//! - **Marcador**: M (medição, não evolui o estado)
//! - **Two-qubit**: CNOT, CZ, SWAP (aceitas no circuito, não simuladas)
//!
//! O conjunto é fechado: identificadores desconhecidos resultam em
//! [`QuantumError::UnknownGate`], nunca em identidade silenciosa.

use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::fmt;

use crate::complex::Complex;
use crate::error::{QuantumError, QuantumResult};

/// Matriz 2x2 complexa para gates single-qubit
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix2x2 {
    /// Elementos: [[a, b], [c, d]]
    pub elements: [[Complex; 2]; 2],
}

impl Matrix2x2 {
    /// Cria matriz a partir dos quatro elementos
    pub const fn new(m00: Complex, m01: Complex, m10: Complex, m11: Complex) -> Self {
        Self {
            elements: [[m00, m01], [m10, m11]],
        }
    }

    /// Cria matriz identidade
    pub const fn identity() -> Self {
        Self::new(Complex::ONE, Complex::ZERO, Complex::ZERO, Complex::ONE)
    }

    /// Aplica gate a um estado [alpha, beta]
    pub fn apply(&self, state: [Complex; 2]) -> [Complex; 2] {
        let [alpha, beta] = state;
        let [[a, b], [c, d]] = self.elements;

        [
            a.mul(alpha).add(b.mul(beta)),
            c.mul(alpha).add(d.mul(beta)),
        ]
    }

    /// Multiplicação de matrizes
    pub fn mul(&self, other: &Matrix2x2) -> Matrix2x2 {
        let [[a, b], [c, d]] = self.elements;
        let [[e, f], [g, h]] = other.elements;

        Matrix2x2::new(
            a.mul(e).add(b.mul(g)),
            a.mul(f).add(b.mul(h)),
            c.mul(e).add(d.mul(g)),
            c.mul(f).add(d.mul(h)),
        )
    }

    /// Transposta conjugada (dagger)
    pub fn dagger(&self) -> Matrix2x2 {
        let [[a, b], [c, d]] = self.elements;
        Matrix2x2::new(a.conj(), c.conj(), b.conj(), d.conj())
    }

    /// Verifica se M·M† = I dentro da tolerância
    pub fn is_unitary(&self, epsilon: f64) -> bool {
        self.mul(&self.dagger()).approx_eq(&Matrix2x2::identity(), epsilon)
    }

    /// Compara elemento a elemento
    pub fn approx_eq(&self, other: &Matrix2x2, epsilon: f64) -> bool {
        self.elements
            .iter()
            .flatten()
            .zip(other.elements.iter().flatten())
            .all(|(a, b)| a.approx_eq(*b, epsilon))
    }
}

impl Default for Matrix2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

/// Trait para portas quânticas single-qubit
pub trait QuantumGate: Send + Sync {
    /// Nome da porta
    fn name(&self) -> &'static str;

    /// Matriz da porta (2x2 para single-qubit)
    fn matrix(&self) -> Matrix2x2;

    /// Verifica se é unitária
    fn is_unitary(&self) -> bool {
        self.matrix().is_unitary(1e-10)
    }

    /// Aplica a um estado
    fn apply(&self, state: [Complex; 2]) -> [Complex; 2] {
        self.matrix().apply(state)
    }
}

// =============================================================================
// Portas Padrão
// =============================================================================

/// Porta identidade
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl QuantumGate for Identity {
    fn name(&self) -> &'static str {
        "I"
    }

    fn matrix(&self) -> Matrix2x2 {
        Matrix2x2::identity()
    }
}

/// Porta Hadamard: cria superposição
#[derive(Clone, Copy, Debug, Default)]
pub struct Hadamard;

impl QuantumGate for Hadamard {
    fn name(&self) -> &'static str {
        "H"
    }

    fn matrix(&self) -> Matrix2x2 {
        let h = Complex::real(FRAC_1_SQRT_2);
        Matrix2x2::new(h, h, h, h.scale(-1.0))
    }
}

/// Porta Pauli-X (NOT quântico)
#[derive(Clone, Copy, Debug, Default)]
pub struct PauliX;

impl QuantumGate for PauliX {
    fn name(&self) -> &'static str {
        "X"
    }

    fn matrix(&self) -> Matrix2x2 {
        Matrix2x2::new(Complex::ZERO, Complex::ONE, Complex::ONE, Complex::ZERO)
    }
}

/// Porta Pauli-Y
#[derive(Clone, Copy, Debug, Default)]
pub struct PauliY;

impl QuantumGate for PauliY {
    fn name(&self) -> &'static str {
        "Y"
    }

    fn matrix(&self) -> Matrix2x2 {
        Matrix2x2::new(
            Complex::ZERO,
            Complex::new(0.0, -1.0),
            Complex::I,
            Complex::ZERO,
        )
    }
}

/// Porta Pauli-Z (phase flip)
#[derive(Clone, Copy, Debug, Default)]
pub struct PauliZ;

impl QuantumGate for PauliZ {
    fn name(&self) -> &'static str {
        "Z"
    }

    fn matrix(&self) -> Matrix2x2 {
        Matrix2x2::new(Complex::ONE, Complex::ZERO, Complex::ZERO, Complex::real(-1.0))
    }
}

/// Porta S (√Z)
#[derive(Clone, Copy, Debug, Default)]
pub struct SGate;

impl QuantumGate for SGate {
    fn name(&self) -> &'static str {
        "S"
    }

    fn matrix(&self) -> Matrix2x2 {
        Matrix2x2::new(Complex::ONE, Complex::ZERO, Complex::ZERO, Complex::I)
    }
}

/// Porta T (π/8)
#[derive(Clone, Copy, Debug, Default)]
pub struct TGate;

impl QuantumGate for TGate {
    fn name(&self) -> &'static str {
        "T"
    }

    fn matrix(&self) -> Matrix2x2 {
        Matrix2x2::new(
            Complex::ONE,
            Complex::ZERO,
            Complex::ZERO,
            Complex::from_polar(PI / 4.0),
        )
    }
}

/// Porta de rotação em X
#[derive(Clone, Copy, Debug)]
pub struct RotationX {
    pub theta: f64,
}

impl QuantumGate for RotationX {
    fn name(&self) -> &'static str {
        "RX"
    }

    fn matrix(&self) -> Matrix2x2 {
        let c = (self.theta / 2.0).cos();
        let s = (self.theta / 2.0).sin();
        Matrix2x2::new(
            Complex::real(c),
            Complex::new(0.0, -s),
            Complex::new(0.0, -s),
            Complex::real(c),
        )
    }
}

/// Porta de rotação em Y
#[derive(Clone, Copy, Debug)]
pub struct RotationY {
    pub theta: f64,
}

impl QuantumGate for RotationY {
    fn name(&self) -> &'static str {
        "RY"
    }

    fn matrix(&self) -> Matrix2x2 {
        let c = (self.theta / 2.0).cos();
        let s = (self.theta / 2.0).sin();
        Matrix2x2::new(
            Complex::real(c),
            Complex::real(-s),
            Complex::real(s),
            Complex::real(c),
        )
    }
}

/// Porta de rotação em Z
#[derive(Clone, Copy, Debug)]
pub struct RotationZ {
    pub theta: f64,
}

impl QuantumGate for RotationZ {
    fn name(&self) -> &'static str {
        "RZ"
    }

    fn matrix(&self) -> Matrix2x2 {
        let half = self.theta / 2.0;
        Matrix2x2::new(
            Complex::from_polar(-half),
            Complex::ZERO,
            Complex::ZERO,
            Complex::from_polar(half),
        )
    }
}

/// Porta de fase genérica
#[derive(Clone, Copy, Debug)]
pub struct Phase {
    pub phi: f64,
}

impl QuantumGate for Phase {
    fn name(&self) -> &'static str {
        "P"
    }

    fn matrix(&self) -> Matrix2x2 {
        Matrix2x2::new(
            Complex::ONE,
            Complex::ZERO,
            Complex::ZERO,
            Complex::from_polar(self.phi),
        )
    }
}

// =============================================================================
// Conjunto fechado de portas
// =============================================================================

/// Tipo de porta colocada no circuito
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GateKind {
    I,
    H,
    X,
    Y,
    Z,
    S,
    T,
    Rx(f64),
    Ry(f64),
    Rz(f64),
    Phase(f64),
    /// Marcador de medição (não altera amplitudes)
    Measure,
    /// `qubit` do gate é o controle
    Cnot { target: usize },
    /// `qubit` do gate é o controle
    Cz { target: usize },
    Swap { target: usize },
}

impl GateKind {
    /// Identificadores aceitos, na forma canônica
    pub const SUPPORTED: &'static [&'static str] = &[
        "I", "H", "X", "Y", "Z", "S", "T", "RX", "RY", "RZ", "P", "M", "CNOT", "CZ", "SWAP",
    ];

    /// Resolve identificador textual (case-insensitive)
    ///
    /// Portas parametrizadas exigem `angle`; portas de dois qubits exigem `target`.
    pub fn parse(id: &str, angle: Option<f64>, target: Option<usize>) -> QuantumResult<Self> {
        let upper = id.trim().to_ascii_uppercase();
        let need_angle = || angle.ok_or_else(|| QuantumError::MissingAngle(upper.clone()));
        let need_target = || target.ok_or_else(|| QuantumError::MissingTarget(upper.clone()));

        let kind = match upper.as_str() {
            "I" | "ID" => Self::I,
            "H" => Self::H,
            "X" => Self::X,
            "Y" => Self::Y,
            "Z" => Self::Z,
            "S" => Self::S,
            "T" => Self::T,
            "RX" => Self::Rx(need_angle()?),
            "RY" => Self::Ry(need_angle()?),
            "RZ" => Self::Rz(need_angle()?),
            "P" | "PHASE" => Self::Phase(need_angle()?),
            "M" | "MEASURE" => Self::Measure,
            "CNOT" | "CX" => Self::Cnot { target: need_target()? },
            "CZ" => Self::Cz { target: need_target()? },
            "SWAP" => Self::Swap { target: need_target()? },
            _ => return Err(QuantumError::UnknownGate(id.to_string())),
        };
        Ok(kind)
    }

    /// Identificador canônico
    pub fn id(&self) -> &'static str {
        match self {
            Self::I => "I",
            Self::H => "H",
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::S => "S",
            Self::T => "T",
            Self::Rx(_) => "RX",
            Self::Ry(_) => "RY",
            Self::Rz(_) => "RZ",
            Self::Phase(_) => "P",
            Self::Measure => "M",
            Self::Cnot { .. } => "CNOT",
            Self::Cz { .. } => "CZ",
            Self::Swap { .. } => "SWAP",
        }
    }

    /// Ângulo das portas parametrizadas
    pub fn angle(&self) -> Option<f64> {
        match *self {
            Self::Rx(t) | Self::Ry(t) | Self::Rz(t) | Self::Phase(t) => Some(t),
            _ => None,
        }
    }

    /// Segundo qubit das portas de dois qubits
    pub fn target(&self) -> Option<usize> {
        match *self {
            Self::Cnot { target } | Self::Cz { target } | Self::Swap { target } => Some(target),
            _ => None,
        }
    }

    pub fn is_measurement(&self) -> bool {
        matches!(self, Self::Measure)
    }

    /// Portas que exigem mais de um qubit
    pub fn is_entangling(&self) -> bool {
        self.target().is_some()
    }

    /// Matriz 2x2, `None` para marcador de medição e portas de dois qubits
    pub fn matrix(&self) -> Option<Matrix2x2> {
        let m = match *self {
            Self::I => Identity.matrix(),
            Self::H => Hadamard.matrix(),
            Self::X => PauliX.matrix(),
            Self::Y => PauliY.matrix(),
            Self::Z => PauliZ.matrix(),
            Self::S => SGate.matrix(),
            Self::T => TGate.matrix(),
            Self::Rx(theta) => RotationX { theta }.matrix(),
            Self::Ry(theta) => RotationY { theta }.matrix(),
            Self::Rz(theta) => RotationZ { theta }.matrix(),
            Self::Phase(phi) => Phase { phi }.matrix(),
            Self::Measure | Self::Cnot { .. } | Self::Cz { .. } | Self::Swap { .. } => {
                return None;
            }
        };
        Some(m)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.angle(), self.target()) {
            (Some(angle), _) => write!(f, "{}({:.4})", self.id(), angle),
            (_, Some(target)) => write!(f, "{}→q{}", self.id(), target),
            _ => write!(f, "{}", self.id()),
        }
    }
}

/// Matriz de um identificador sem parâmetros
pub fn matrix_for(id: &str) -> QuantumResult<Matrix2x2> {
    let kind = GateKind::parse(id, None, None)?;
    kind.matrix()
        .ok_or_else(|| QuantumError::NotSingleQubit(kind.id().to_string()))
}

// =============================================================================
// Testes
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hadamard_unitary() {
        assert!(Hadamard.is_unitary());
    }

    #[test]
    fn test_pauli_gates_unitary() {
        assert!(PauliX.is_unitary());
        assert!(PauliY.is_unitary());
        assert!(PauliZ.is_unitary());
    }

    #[test]
    fn test_rotation_gates() {
        assert!(RotationX { theta: PI }.is_unitary());
        assert!(RotationY { theta: 0.3 }.is_unitary());
        assert!(RotationZ { theta: -1.7 }.is_unitary());
        assert!(Phase { phi: 2.0 }.is_unitary());
    }

    #[test]
    fn test_hadamard_creates_superposition() {
        let result = Hadamard.apply([Complex::ONE, Complex::ZERO]);

        // |+⟩ = (|0⟩ + |1⟩)/√2
        assert!((result[0].re - FRAC_1_SQRT_2).abs() < 1e-10);
        assert!((result[1].re - FRAC_1_SQRT_2).abs() < 1e-10);
    }

    #[test]
    fn test_pauli_x_flips() {
        let result = PauliX.apply([Complex::ONE, Complex::ZERO]);

        // X|0⟩ = |1⟩
        assert!(result[0].norm_sq() < 1e-10);
        assert!((result[1].re - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_pauli_z_phase() {
        let result = PauliZ.apply([Complex::ZERO, Complex::ONE]);

        // Z|1⟩ = -|1⟩
        assert!(result[0].norm_sq() < 1e-10);
        assert!((result[1].re + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_s_squared_is_z() {
        let s2 = SGate.matrix().mul(&SGate.matrix());
        assert!(s2.approx_eq(&PauliZ.matrix(), 1e-12));
    }

    #[test]
    fn test_t_squared_is_s() {
        let t2 = TGate.matrix().mul(&TGate.matrix());
        assert!(t2.approx_eq(&SGate.matrix(), 1e-12));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(GateKind::parse("h", None, None).unwrap(), GateKind::H);
        assert_eq!(GateKind::parse(" cx ", None, Some(1)).unwrap(), GateKind::Cnot { target: 1 });
        assert_eq!(GateKind::parse("Phase", Some(0.5), None).unwrap(), GateKind::Phase(0.5));
    }

    #[test]
    fn test_unknown_gate_is_error() {
        let err = GateKind::parse("QFT", None, None).unwrap_err();
        assert_eq!(err, QuantumError::UnknownGate("QFT".into()));
        assert!(matrix_for("nope").is_err());
    }

    #[test]
    fn test_parametric_gate_requires_angle() {
        assert_eq!(
            GateKind::parse("rx", None, None).unwrap_err(),
            QuantumError::MissingAngle("RX".into())
        );
        assert_eq!(
            GateKind::parse("swap", None, None).unwrap_err(),
            QuantumError::MissingTarget("SWAP".into())
        );
    }

    #[test]
    fn test_matrix_for_literals() {
        assert!(matrix_for("X").unwrap().approx_eq(&PauliX.matrix(), 1e-15));
        assert!(matrix_for("I").unwrap().approx_eq(&Matrix2x2::identity(), 1e-15));
        assert_eq!(
            matrix_for("M").unwrap_err(),
            QuantumError::NotSingleQubit("M".into())
        );
    }

    #[test]
    fn test_every_single_qubit_kind_is_unitary() {
        let kinds = [
            GateKind::I,
            GateKind::H,
            GateKind::X,
            GateKind::Y,
            GateKind::Z,
            GateKind::S,
            GateKind::T,
            GateKind::Rx(0.7),
            GateKind::Ry(1.1),
            GateKind::Rz(2.9),
            GateKind::Phase(PI / 3.0),
        ];
        for kind in kinds {
            let m = kind.matrix().expect("single-qubit kind has a matrix");
            assert!(m.is_unitary(1e-10), "{kind} is not unitary");
        }
    }

    #[test]
    fn test_entangling_and_marker_have_no_matrix() {
        assert!(GateKind::Measure.matrix().is_none());
        assert!(GateKind::Cz { target: 2 }.matrix().is_none());
        assert!(GateKind::Swap { target: 0 }.is_entangling());
        assert!(!GateKind::H.is_entangling());
    }
}
