//! Scheduler de eventos discretos com cancelamento
//!
//! Tempo virtual em unidades abstratas. Os eventos disparam um de cada vez, em
//! ordem de vencimento (empates na ordem de agendamento); entre dois eventos é o
//! único ponto de suspensão.

use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Instante no tempo virtual
pub type Tick = u64;

/// Token de cancelamento de um timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Evento vencido retirado da fila
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<E> {
    pub id: TimerId,
    /// Instante em que o evento venceu
    pub at: Tick,
    pub event: E,
}

/// Estatísticas do scheduler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Timers agendados
    pub scheduled: u64,
    /// Timers disparados
    pub fired: u64,
    /// Timers cancelados antes de disparar
    pub cancelled: u64,
}

/// Scheduler single-threaded de timers
#[derive(Debug)]
pub struct Scheduler<E> {
    now: Tick,
    next_id: u64,
    /// Fila ordenada por (vencimento, id)
    queue: BTreeMap<(Tick, TimerId), E>,
    /// Vencimento de cada timer pendente
    due: HashMap<TimerId, Tick>,
    stats: SchedulerStats,
}

impl<E> Scheduler<E> {
    /// Cria scheduler no instante 0
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            queue: BTreeMap::new(),
            due: HashMap::new(),
            stats: SchedulerStats::default(),
        }
    }

    /// Instante atual
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Agenda evento para `now + delay`
    pub fn schedule(&mut self, delay: Tick, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let at = self.now.saturating_add(delay);
        self.queue.insert((at, id), event);
        self.due.insert(id, at);
        self.stats.scheduled += 1;
        trace!(?id, at, "timer scheduled");
        id
    }

    /// Cancela timer pendente
    ///
    /// Idempotente: timers já disparados ou cancelados retornam `false`.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.due.remove(&id) {
            Some(at) => {
                self.queue.remove(&(at, id));
                self.stats.cancelled += 1;
                trace!(?id, "timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancela todos os timers pendentes
    pub fn cancel_all(&mut self) -> usize {
        let count = self.queue.len();
        self.queue.clear();
        self.due.clear();
        self.stats.cancelled += count as u64;
        count
    }

    /// Verifica se o timer ainda está pendente
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.due.contains_key(&id)
    }

    /// Número de timers pendentes
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Próximo vencimento, se houver
    pub fn next_deadline(&self) -> Option<Tick> {
        self.queue.keys().next().map(|&(at, _)| at)
    }

    /// Retira o próximo evento vencido até `until`, avançando o relógio até ele
    pub fn next_due(&mut self, until: Tick) -> Option<Fired<E>> {
        let (&(at, id), _) = self.queue.iter().next()?;
        if at > until {
            return None;
        }

        let event = self.queue.remove(&(at, id))?;
        self.due.remove(&id);
        self.now = self.now.max(at);
        self.stats.fired += 1;
        trace!(?id, at, "timer fired");
        Some(Fired { id, at, event })
    }

    /// Avança o relógio sem disparar eventos (nunca retrocede)
    pub fn advance_to(&mut self, at: Tick) {
        self.now = self.now.max(at);
    }

    /// Retira todos os eventos vencidos até `until` e avança o relógio
    pub fn drain_until(&mut self, until: Tick) -> Vec<Fired<E>> {
        let mut fired = Vec::new();
        while let Some(f) = self.next_due(until) {
            fired.push(f);
        }
        self.advance_to(until);
        fired
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduler_creation() {
        let scheduler: Scheduler<&str> = Scheduler::new();
        assert_eq!(scheduler.now(), 0);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(30, "c");
        scheduler.schedule(10, "a");
        scheduler.schedule(20, "b");

        let events: Vec<&str> = scheduler.drain_until(100).into_iter().map(|f| f.event).collect();
        assert_eq!(events, vec!["a", "b", "c"]);
        assert_eq!(scheduler.now(), 100);
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(5, 1);
        scheduler.schedule(5, 2);
        scheduler.schedule(5, 3);

        let events: Vec<i32> = scheduler.drain_until(5).into_iter().map(|f| f.event).collect();
        assert_eq!(events, vec![1, 2, 3]);
    }

    #[test]
    fn test_not_due_stays_pending() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(250, ());
        assert!(scheduler.drain_until(249).is_empty());
        assert!(scheduler.is_pending(id));
        assert_eq!(scheduler.now(), 249);

        let fired = scheduler.drain_until(250);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].at, 250);
        assert!(!scheduler.is_pending(id));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(10, "x");

        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.drain_until(100).is_empty());
        assert_eq!(scheduler.stats().cancelled, 1);
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(1, "x");
        scheduler.drain_until(1);
        assert!(!scheduler.cancel(id));
        assert_eq!(scheduler.stats().fired, 1);
        assert_eq!(scheduler.stats().cancelled, 0);
    }

    #[test]
    fn test_delay_is_relative_to_now() {
        let mut scheduler = Scheduler::new();
        scheduler.advance_to(1000);
        scheduler.schedule(10, "late");
        assert_eq!(scheduler.next_deadline(), Some(1010));

        // relógio não retrocede
        scheduler.advance_to(3);
        assert_eq!(scheduler.now(), 1000);
    }

    #[test]
    fn test_cancel_all() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1, 'a');
        scheduler.schedule(2, 'b');
        assert_eq!(scheduler.cancel_all(), 2);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.cancel_all(), 0);
    }
}
