//! Modelo de circuito: portas posicionadas em (qubit, step)

use serde::{Deserialize, Serialize};

use crate::error::{QuantumError, QuantumResult};
use crate::gates::GateKind;

/// Porta posicionada no circuito
///
/// Imutável: reposicionar na mesma coordenada substitui a porta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GateRecord", into = "GateRecord")]
pub struct Gate {
    /// Identificador atribuído pela camada de edição
    pub id: String,
    /// Tipo da porta
    pub kind: GateKind,
    /// Qubit alvo (controle, para portas de dois qubits)
    pub qubit: usize,
    /// Posição na ordem de execução
    pub step: usize,
}

/// Forma serializada de uma porta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateRecord {
    pub id: String,
    pub gate_type: String,
    pub qubit: usize,
    pub step: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<usize>,
}

impl TryFrom<GateRecord> for Gate {
    type Error = QuantumError;

    fn try_from(record: GateRecord) -> QuantumResult<Self> {
        let kind = GateKind::parse(&record.gate_type, record.angle, record.target)?;
        Ok(Gate {
            id: record.id,
            kind,
            qubit: record.qubit,
            step: record.step,
        })
    }
}

impl From<Gate> for GateRecord {
    fn from(gate: Gate) -> Self {
        GateRecord {
            angle: gate.kind.angle(),
            target: gate.kind.target(),
            gate_type: gate.kind.id().to_string(),
            id: gate.id,
            qubit: gate.qubit,
            step: gate.step,
        }
    }
}

impl Gate {
    /// Cria nova porta
    pub fn new(id: impl Into<String>, kind: GateKind, qubit: usize, step: usize) -> Self {
        Self {
            id: id.into(),
            kind,
            qubit,
            step,
        }
    }

    /// Todos os qubits tocados pela porta
    pub fn qubits(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(self.qubit).chain(self.kind.target())
    }

    /// Valida índices contra o tamanho do registrador
    pub fn validate(&self, num_qubits: usize) -> QuantumResult<()> {
        for qubit in self.qubits() {
            if qubit >= num_qubits {
                return Err(QuantumError::QubitOutOfRange { qubit, num_qubits });
            }
        }
        if self.kind.target() == Some(self.qubit) {
            return Err(QuantumError::DuplicateQubit(self.qubit));
        }
        Ok(())
    }
}

/// Coleção não ordenada de portas, agrupada logicamente por `step`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Circuit {
    gates: Vec<Gate>,
}

impl Circuit {
    /// Cria circuito vazio
    pub fn new() -> Self {
        Self::default()
    }

    /// Cria circuito a partir de uma lista de portas
    pub fn from_gates(gates: Vec<Gate>) -> Self {
        Self { gates }
    }

    /// Posiciona porta, substituindo a que ocupar a mesma coordenada
    ///
    /// Retorna a porta substituída, se houver.
    pub fn place(&mut self, gate: Gate) -> Option<Gate> {
        match self
            .gates
            .iter()
            .position(|g| g.qubit == gate.qubit && g.step == gate.step)
        {
            Some(pos) => Some(std::mem::replace(&mut self.gates[pos], gate)),
            None => {
                self.gates.push(gate);
                None
            }
        }
    }

    /// Remove porta pelo id
    pub fn remove(&mut self, id: &str) -> Option<Gate> {
        let pos = self.gates.iter().position(|g| g.id == id)?;
        Some(self.gates.remove(pos))
    }

    /// Remove todas as portas
    pub fn clear(&mut self) {
        self.gates.clear();
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Maior `step` presente (0 se vazio)
    pub fn max_step(&self) -> usize {
        self.gates.iter().map(|g| g.step).max().unwrap_or(0)
    }

    /// Portas em ordem de execução (ordenação estável por `step`)
    pub fn sorted_by_step(&self) -> Vec<&Gate> {
        let mut sorted: Vec<&Gate> = self.gates.iter().collect();
        sorted.sort_by_key(|g| g.step);
        sorted
    }

    /// Subcircuito com as portas em `step <= step`
    pub fn visible_at(&self, step: usize) -> Circuit {
        Circuit {
            gates: self.gates.iter().filter(|g| g.step <= step).cloned().collect(),
        }
    }

    /// Portas que atuam sobre um qubit
    pub fn gates_on_qubit(&self, qubit: usize) -> Vec<Gate> {
        self.gates.iter().filter(|g| g.qubit == qubit).cloned().collect()
    }

    /// Menor registrador capaz de conter todas as portas (0 se vazio)
    pub fn required_qubits(&self) -> usize {
        self.gates
            .iter()
            .flat_map(|g| g.qubits())
            .max()
            .map_or(0, |q| q + 1)
    }

    /// Valida todas as portas contra o tamanho do registrador
    pub fn validate(&self, num_qubits: usize) -> QuantumResult<()> {
        self.gates.iter().try_for_each(|g| g.validate(num_qubits))
    }
}

impl From<Vec<Gate>> for Circuit {
    fn from(gates: Vec<Gate>) -> Self {
        Self::from_gates(gates)
    }
}

impl FromIterator<Gate> for Circuit {
    fn from_iter<I: IntoIterator<Item = Gate>>(iter: I) -> Self {
        Self::from_gates(iter.into_iter().collect())
    }
}
