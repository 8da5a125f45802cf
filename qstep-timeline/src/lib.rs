//! # ⏱️ qstep-timeline — Edit History & Step Replay
//!
//! Duas noções independentes de "passado" sobre um circuito:
//! o histórico de edições (undo/redo) e o step de execução (replay frame a frame).
//! Uma sessão as une com re-simulação debounced e playback por timer.
//!
//! ## Computational Complexity
//!
//! **History — O(1) amortizado:**
//! - Push: O(g) para copiar o circuito, evicção com `VecDeque::pop_front()`
//! - Undo/Redo: O(g) por cópia devolvida
//!
//! **Scheduler — O(log t):**
//! - t = timers pendentes (`BTreeMap` por vencimento)
//! - Cancelamento: O(log t), idempotente
//!
//! **Frame — O(G × 2^n + S × 2^n):**
//! - Cada step re-simula do zero as portas visíveis
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │          Session                                │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  EditHistory (snapshots, undo/redo)       │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  Scheduler<TimelineEvent> (debounce/tick) │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  StepController → Frame (qstep-core)      │  │
//! │  └───────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Exemplo
//!
//! ```
//! use qstep_core::{Circuit, Gate, GateKind};
//! use qstep_timeline::{Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::default()).unwrap();
//! session
//!     .edit(Circuit::from_gates(vec![Gate::new("g1", GateKind::H, 0, 0)]))
//!     .unwrap();
//!
//! // re-simulação só depois do debounce
//! session.advance(250).unwrap();
//! assert_eq!(session.frame().visible_gates.len(), 1);
//!
//! assert!(!session.undo());
//! ```

pub mod controller;
pub mod error;
pub mod history;
pub mod scheduler;
pub mod session;

pub use controller::{ControllerConfig, Frame, PlaybackState, StepController};
pub use error::{TimelineError, TimelineResult};
pub use history::{DEFAULT_MAX_SNAPSHOTS, EditHistory, HistoryConfig, HistorySnapshot};
pub use scheduler::{Fired, Scheduler, SchedulerStats, Tick, TimerId};
pub use session::{Session, SessionConfig, SessionStats, TimelineEvent};
