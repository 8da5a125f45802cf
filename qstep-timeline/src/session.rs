//! Sessão de edição e replay
//!
//! Junta histórico, controlador e scheduler. Edições são registradas no
//! histórico imediatamente, mas a re-simulação espera um período de silêncio
//! (debounce); o playback é um timer periódico re-armado a cada tick.

use qstep_core::Circuit;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::controller::{ControllerConfig, Frame, StepController};
use crate::error::{TimelineError, TimelineResult};
use crate::history::{EditHistory, HistoryConfig};
use crate::scheduler::{Scheduler, Tick, TimerId};

/// Eventos agendados pela sessão
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineEvent {
    /// Avança um step do playback
    PlaybackTick,
    /// Aplica o circuito pendente após o debounce
    Resimulate,
}

/// Configuração da sessão
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Período de silêncio antes de re-simular uma edição
    pub debounce_delay: Tick,
    /// Intervalo entre ticks de playback
    pub tick_interval: Tick,
    pub history: HistoryConfig,
    pub controller: ControllerConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_delay: 250,
            tick_interval: 500,
            history: HistoryConfig::default(),
            controller: ControllerConfig::default(),
        }
    }
}

/// Estatísticas de diagnóstico
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Edições aceitas
    pub edits: u64,
    /// Re-simulações aplicadas a partir do debounce
    pub recomputations: u64,
    /// Ticks de playback que avançaram o step
    pub ticks: u64,
    /// Edições absorvidas por uma edição posterior dentro do debounce
    pub coalesced_edits: u64,
}

/// Sessão single-threaded
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    history: EditHistory,
    controller: StepController,
    scheduler: Scheduler<TimelineEvent>,
    debounce_timer: Option<TimerId>,
    tick_timer: Option<TimerId>,
    /// Circuito aguardando o fim do debounce
    pending: Option<Circuit>,
    stats: SessionStats,
}

impl Session {
    /// Cria sessão vazia
    pub fn new(config: SessionConfig) -> TimelineResult<Self> {
        if config.tick_interval == 0 {
            return Err(TimelineError::InvalidConfiguration(
                "tick_interval must be greater than zero".into(),
            ));
        }

        let controller = StepController::new(config.controller.clone())?;
        let history = EditHistory::with_config(config.history.clone());
        info!(
            debounce = config.debounce_delay,
            tick = config.tick_interval,
            "session started"
        );

        Ok(Self {
            config,
            history,
            controller,
            scheduler: Scheduler::new(),
            debounce_timer: None,
            tick_timer: None,
            pending: None,
            stats: SessionStats::default(),
        })
    }

    /// Carrega um circuito novo: histórico reiniciado com ele como base
    pub fn load(&mut self, circuit: Circuit) -> TimelineResult<()> {
        self.controller.load(circuit.clone())?;
        self.cancel_timers();
        self.pending = None;
        self.history.clear();
        self.history.push(&circuit);
        info!(gates = circuit.len(), "circuit loaded");
        Ok(())
    }

    /// Registra uma edição e (re)inicia o debounce
    pub fn edit(&mut self, circuit: Circuit) -> TimelineResult<()> {
        if let Err(e) = self.controller.validate(&circuit) {
            warn!(error = %e, "edit rejected");
            return Err(e);
        }

        self.history.push(&circuit);
        self.stats.edits += 1;
        self.schedule_resimulate(circuit);
        Ok(())
    }

    /// Desfaz a última edição; `false` se não houver
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(circuit) => {
                self.schedule_resimulate(circuit);
                true
            }
            None => false,
        }
    }

    /// Refaz a edição desfeita; `false` se não houver
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(circuit) => {
                self.schedule_resimulate(circuit);
                true
            }
            None => false,
        }
    }

    pub fn play(&mut self) -> TimelineResult<()> {
        self.controller.play()?;
        self.sync_tick_timer();
        Ok(())
    }

    pub fn pause(&mut self) {
        self.controller.pause();
        self.sync_tick_timer();
    }

    pub fn toggle(&mut self) -> TimelineResult<()> {
        self.controller.toggle()?;
        self.sync_tick_timer();
        Ok(())
    }

    pub fn next(&mut self) -> TimelineResult<()> {
        self.controller.next()
    }

    pub fn previous(&mut self) -> TimelineResult<()> {
        self.controller.previous()
    }

    pub fn seek(&mut self, step: usize) -> TimelineResult<()> {
        self.controller.seek(step)
    }

    pub fn reset(&mut self) -> TimelineResult<()> {
        self.controller.reset()?;
        self.sync_tick_timer();
        Ok(())
    }

    /// Aplica imediatamente uma re-simulação pendente
    ///
    /// Retorna se havia algo pendente.
    pub fn flush(&mut self) -> TimelineResult<bool> {
        let Some(id) = self.debounce_timer.take() else {
            return Ok(false);
        };
        self.scheduler.cancel(id);
        self.apply_pending()?;
        Ok(true)
    }

    /// Avança o relógio virtual em `dt`, despachando os eventos vencidos em ordem
    ///
    /// Retorna o número de eventos despachados.
    pub fn advance(&mut self, dt: Tick) -> TimelineResult<usize> {
        let until = self.scheduler.now().saturating_add(dt);
        let mut dispatched = 0;
        while let Some(fired) = self.scheduler.next_due(until) {
            dispatched += 1;
            match fired.event {
                TimelineEvent::Resimulate => {
                    self.debounce_timer = None;
                    self.apply_pending()?;
                }
                TimelineEvent::PlaybackTick => {
                    self.tick_timer = None;
                    if self.controller.tick()? {
                        self.stats.ticks += 1;
                    }
                    self.sync_tick_timer();
                }
            }
        }
        self.scheduler.advance_to(until);
        Ok(dispatched)
    }

    /// Limpa histórico e circuito, cancelando todos os timers
    pub fn clear(&mut self) -> TimelineResult<()> {
        self.cancel_timers();
        self.pending = None;
        self.history.clear();
        self.controller.load(Circuit::new())?;
        info!("session cleared");
        Ok(())
    }

    /// Cancela todos os timers pendentes
    pub fn dispose(&mut self) {
        let cancelled = self.cancel_timers();
        self.pending = None;
        if cancelled > 0 {
            debug!(cancelled, "session disposed with pending timers");
        }
    }

    /// Circuito mais recente (pendente ou já aplicado)
    pub fn circuit(&self) -> &Circuit {
        self.pending.as_ref().unwrap_or_else(|| self.controller.circuit())
    }

    pub fn has_pending_recompute(&self) -> bool {
        self.debounce_timer.is_some()
    }

    pub fn frame(&self) -> &Frame {
        self.controller.frame()
    }

    pub fn controller(&self) -> &StepController {
        &self.controller
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn scheduler(&self) -> &Scheduler<TimelineEvent> {
        &self.scheduler
    }

    pub fn now(&self) -> Tick {
        self.scheduler.now()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn schedule_resimulate(&mut self, circuit: Circuit) {
        if let Some(id) = self.debounce_timer.take()
            && self.scheduler.cancel(id)
        {
            self.stats.coalesced_edits += 1;
        }
        self.pending = Some(circuit);
        self.debounce_timer = Some(
            self.scheduler
                .schedule(self.config.debounce_delay, TimelineEvent::Resimulate),
        );
    }

    fn apply_pending(&mut self) -> TimelineResult<()> {
        if let Some(circuit) = self.pending.take() {
            self.controller.update_circuit(circuit)?;
            self.stats.recomputations += 1;
            debug!(step = self.controller.current_step(), "debounced recompute applied");
        }
        self.sync_tick_timer();
        Ok(())
    }

    /// Arma o timer de playback se tocando; cancela se parado
    fn sync_tick_timer(&mut self) {
        match (self.controller.is_playing(), self.tick_timer) {
            (true, None) => {
                self.tick_timer = Some(
                    self.scheduler
                        .schedule(self.config.tick_interval, TimelineEvent::PlaybackTick),
                );
            }
            (false, Some(id)) => {
                self.scheduler.cancel(id);
                self.tick_timer = None;
            }
            _ => {}
        }
    }

    fn cancel_timers(&mut self) -> usize {
        self.debounce_timer = None;
        self.tick_timer = None;
        self.scheduler.cancel_all()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qstep_core::{Gate, GateKind};

    fn session() -> Session {
        Session::new(SessionConfig {
            controller: ControllerConfig {
                num_qubits: 1,
                shots: 100,
                seed: Some(1),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap()
    }

    fn with_x_at(steps: &[usize]) -> Circuit {
        steps
            .iter()
            .map(|&s| Gate::new(format!("x{s}"), GateKind::X, 0, s))
            .collect()
    }

    #[test]
    fn test_edit_waits_for_debounce() {
        let mut session = session();
        session.edit(with_x_at(&[0])).unwrap();

        assert!(session.has_pending_recompute());
        assert!(session.controller().circuit().is_empty());
        assert_eq!(session.circuit(), &with_x_at(&[0]));

        session.advance(249).unwrap();
        assert!(session.controller().circuit().is_empty());

        session.advance(1).unwrap();
        assert_eq!(session.controller().circuit(), &with_x_at(&[0]));
        assert_eq!(session.frame().result.counts["1"], 100);
    }

    #[test]
    fn test_rapid_edits_coalesce() {
        let mut session = session();
        for i in 0..5 {
            session.edit(with_x_at(&[0, i])).unwrap();
            session.advance(100).unwrap();
        }
        session.advance(250).unwrap();

        let stats = session.stats();
        assert_eq!(stats.edits, 5);
        assert_eq!(stats.coalesced_edits, 4);
        assert_eq!(stats.recomputations, 1);
        assert_eq!(session.history().len(), 5);
    }

    #[test]
    fn test_rejected_edit_leaves_history_untouched() {
        let mut session = session();
        let bad = Circuit::from_gates(vec![Gate::new("far", GateKind::H, 3, 0)]);
        assert!(session.edit(bad).is_err());
        assert!(session.history().is_empty());
        assert!(!session.has_pending_recompute());
    }

    #[test]
    fn test_undo_redo_go_through_debounce() {
        let mut session = session();
        session.edit(with_x_at(&[0])).unwrap();
        session.edit(with_x_at(&[0, 1])).unwrap();
        session.flush().unwrap();

        assert!(session.undo());
        assert_eq!(session.controller().circuit(), &with_x_at(&[0, 1]));
        session.flush().unwrap();
        assert_eq!(session.controller().circuit(), &with_x_at(&[0]));

        assert!(session.redo());
        assert!(!session.redo());
        session.advance(250).unwrap();
        assert_eq!(session.controller().circuit(), &with_x_at(&[0, 1]));
    }

    #[test]
    fn test_playback_ticks_until_end() {
        let mut session = session();
        session.load(with_x_at(&[0, 1, 2, 3])).unwrap();
        session.play().unwrap();

        session.advance(500).unwrap();
        assert_eq!(session.controller().current_step(), 1);

        session.advance(1000).unwrap();
        assert_eq!(session.controller().current_step(), 3);
        assert!(!session.controller().is_playing());
        assert_eq!(session.scheduler().pending(), 0);
        assert_eq!(session.stats().ticks, 3);
    }

    #[test]
    fn test_pause_cancels_tick_timer() {
        let mut session = session();
        session.load(with_x_at(&[0, 1, 2])).unwrap();
        session.play().unwrap();
        session.pause();

        assert_eq!(session.scheduler().pending(), 0);
        session.advance(5000).unwrap();
        assert_eq!(session.controller().current_step(), 0);
    }

    #[test]
    fn test_clear_and_dispose_cancel_timers() {
        let mut session = session();
        session.load(with_x_at(&[0, 1, 2])).unwrap();
        session.play().unwrap();
        session.edit(with_x_at(&[0, 1])).unwrap();
        assert_eq!(session.scheduler().pending(), 2);

        session.clear().unwrap();
        assert_eq!(session.scheduler().pending(), 0);
        assert!(session.history().is_empty());
        assert!(session.circuit().is_empty());
        assert_eq!(session.controller().current_step(), 0);

        session.edit(with_x_at(&[0])).unwrap();
        session.dispose();
        assert_eq!(session.scheduler().pending(), 0);
        assert!(session.controller().circuit().is_empty());
    }

    #[test]
    fn test_play_on_empty_circuit_arms_no_timer() {
        let mut session = session();
        session.play().unwrap();
        assert!(!session.controller().is_playing());
        assert_eq!(session.scheduler().pending(), 0);
    }

    #[test]
    fn test_zero_tick_interval_rejected() {
        let err = Session::new(SessionConfig {
            tick_interval: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, TimelineError::InvalidConfiguration(_)));
    }
}
