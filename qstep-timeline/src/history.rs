//! Histórico de edições (undo/redo) do circuito
//!
//! Pilha limitada de snapshots com ponteiro para o snapshot ativo. Independente
//! da execução: nunca toca no step atual do controlador.

use qstep_core::Circuit;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Limite padrão de snapshots
pub const DEFAULT_MAX_SNAPSHOTS: usize = 50;

/// Snapshot de uma edição
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// Circuito salvo (cópia independente)
    pub gates: Circuit,
    /// Timestamp de criação (ms desde UNIX epoch)
    pub timestamp: u64,
}

impl HistorySnapshot {
    /// Cria novo snapshot
    pub fn new(gates: Circuit) -> Self {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self { gates, timestamp }
    }
}

/// Configuração do histórico
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Máximo de snapshots mantidos
    pub max_snapshots: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_snapshots: DEFAULT_MAX_SNAPSHOTS,
        }
    }
}

/// Gerenciador de histórico de edições
#[derive(Debug, Clone)]
pub struct EditHistory {
    /// Snapshots armazenados (VecDeque para O(1) pop_front)
    snapshots: VecDeque<HistorySnapshot>,
    /// Snapshot ativo (`None` = histórico vazio)
    current: Option<usize>,
    /// Limite máximo de snapshots
    max_snapshots: usize,
}

impl EditHistory {
    /// Cria histórico vazio com limite padrão
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    /// Cria com configuração customizada (limite mínimo de 1)
    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            snapshots: VecDeque::new(),
            current: None,
            max_snapshots: config.max_snapshots.max(1),
        }
    }

    /// Registra uma edição
    ///
    /// Descarta o ramo de redo, anexa uma cópia e, se o limite for excedido,
    /// remove o snapshot mais antigo mantendo o ponteiro no fim.
    pub fn push(&mut self, gates: &Circuit) {
        let keep = self.current.map_or(0, |i| i + 1);
        if keep < self.snapshots.len() {
            debug!(dropped = self.snapshots.len() - keep, "pruning redo branch");
            self.snapshots.truncate(keep);
        }

        self.snapshots.push_back(HistorySnapshot::new(gates.clone()));

        // Remove snapshots antigos se exceder limite (O(1) com VecDeque)
        while self.snapshots.len() > self.max_snapshots {
            self.snapshots.pop_front();
        }
        self.current = Some(self.snapshots.len() - 1);
    }

    /// Volta um snapshot; `None` se não houver para onde voltar
    pub fn undo(&mut self) -> Option<Circuit> {
        if !self.can_undo() {
            return None;
        }
        let index = self.current? - 1;
        self.current = Some(index);
        Some(self.snapshots[index].gates.clone())
    }

    /// Avança um snapshot; `None` se já estiver no fim
    pub fn redo(&mut self) -> Option<Circuit> {
        if !self.can_redo() {
            return None;
        }
        let index = self.current.map_or(0, |i| i + 1);
        self.current = Some(index);
        Some(self.snapshots[index].gates.clone())
    }

    pub fn can_undo(&self) -> bool {
        self.current.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        match self.current {
            Some(i) => i + 1 < self.snapshots.len(),
            None => false,
        }
    }

    /// Volta ao estado inicial vazio
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.current = None;
    }

    /// Circuito do snapshot ativo
    pub fn current(&self) -> Option<&Circuit> {
        self.current.map(|i| &self.snapshots[i].gates)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Número de snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn max_snapshots(&self) -> usize {
        self.max_snapshots
    }

    /// Snapshots do mais antigo ao mais recente
    pub fn snapshots(&self) -> impl Iterator<Item = &HistorySnapshot> {
        self.snapshots.iter()
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qstep_core::{Gate, GateKind};

    fn circuit(tag: &str) -> Circuit {
        Circuit::from_gates(vec![Gate::new(tag, GateKind::H, 0, 0)])
    }

    #[test]
    fn test_initial_state() {
        let history = EditHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.current_index(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo() {
        let mut history = EditHistory::new();
        history.push(&circuit("a"));
        history.push(&circuit("b"));

        assert_eq!(history.undo(), Some(circuit("a")));
        assert_eq!(history.redo(), Some(circuit("b")));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_single_snapshot_cannot_undo() {
        let mut history = EditHistory::new();
        history.push(&circuit("a"));
        assert!(!history.can_undo());
        assert_eq!(history.undo(), None);
        assert_eq!(history.current_index(), Some(0));
    }

    #[test]
    fn test_push_after_undo_prunes_redo() {
        let mut history = EditHistory::new();
        history.push(&circuit("a"));
        history.push(&circuit("b"));
        history.undo();
        history.push(&circuit("c"));

        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.redo(), None);
        assert_eq!(history.undo(), Some(circuit("a")));
        assert_eq!(history.redo(), Some(circuit("c")));
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut history = EditHistory::with_config(HistoryConfig { max_snapshots: 3 });
        for i in 0..5 {
            history.push(&circuit(&format!("c{i}")));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.current_index(), Some(2));
        assert_eq!(history.current(), Some(&circuit("c4")));

        history.undo();
        history.undo();
        assert!(!history.can_undo());
        assert_eq!(history.current(), Some(&circuit("c2")));
    }

    #[test]
    fn test_returned_copies_are_independent() {
        let mut history = EditHistory::new();
        history.push(&circuit("a"));
        history.push(&circuit("b"));

        let mut restored = history.undo().unwrap();
        restored.place(Gate::new("z", GateKind::Z, 1, 1));
        restored.remove("a");

        assert_eq!(history.current(), Some(&circuit("a")));
    }

    #[test]
    fn test_clear() {
        let mut history = EditHistory::new();
        history.push(&circuit("a"));
        history.push(&circuit("b"));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.current_index(), None);
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
    }
}
