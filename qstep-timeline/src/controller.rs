//! Controlador de execução passo a passo
//!
//! Mantém o step atual, o estado de playback e o frame ao vivo. Cada frame é
//! re-simulado do zero sobre as portas com `step <= current_step`.

use qstep_core::{Circuit, CircuitSimulator, SimulationResult, SimulatorConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TimelineError, TimelineResult};

/// Estado de playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

/// Configuração do controlador
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Tamanho do registrador simulado em cada frame
    pub num_qubits: usize,
    /// Shots por frame
    pub shots: usize,
    /// Seed base; o frame do step `s` usa `seed + s`
    pub seed: Option<u64>,
    pub simulator: SimulatorConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            num_qubits: 2,
            shots: 1024,
            seed: None,
            simulator: SimulatorConfig::default(),
        }
    }
}

/// Resultado parcial em um step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub step: usize,
    /// Portas com `step <= self.step`
    pub visible_gates: Circuit,
    pub result: SimulationResult,
}

/// Controlador de steps com re-simulação por frame
#[derive(Debug, Clone)]
pub struct StepController {
    circuit: Circuit,
    current_step: usize,
    state: PlaybackState,
    frame: Frame,
    config: ControllerConfig,
}

impl StepController {
    /// Cria controlador com circuito vazio no step 0
    pub fn new(config: ControllerConfig) -> TimelineResult<Self> {
        if config.num_qubits == 0 || config.shots == 0 {
            return Err(TimelineError::InvalidConfiguration(format!(
                "controller needs at least one qubit and one shot (got {} qubits, {} shots)",
                config.num_qubits, config.shots
            )));
        }
        CircuitSimulator::with_config(config.simulator.clone()).validate(
            &Circuit::new(),
            config.num_qubits,
            config.shots,
        )?;

        let mut controller = Self {
            circuit: Circuit::new(),
            current_step: 0,
            state: PlaybackState::Stopped,
            frame: Frame {
                step: 0,
                visible_gates: Circuit::new(),
                result: SimulationResult::default(),
            },
            config,
        };
        controller.recompute()?;
        Ok(controller)
    }

    /// Substitui o circuito e volta ao início, parado
    pub fn load(&mut self, circuit: Circuit) -> TimelineResult<()> {
        self.validate(&circuit)?;
        self.circuit = circuit;
        self.current_step = 0;
        self.state = PlaybackState::Stopped;
        self.recompute()
    }

    /// Substitui o circuito mantendo o step (limitado ao novo `max_step`)
    ///
    /// Se estiver tocando e o step cair no fim, pausa.
    pub fn update_circuit(&mut self, circuit: Circuit) -> TimelineResult<()> {
        self.validate(&circuit)?;
        self.circuit = circuit;
        self.current_step = self.current_step.min(self.max_step());
        if self.is_playing() && self.current_step >= self.max_step() {
            debug!(step = self.current_step, "auto-pause after edit");
            self.state = PlaybackState::Stopped;
        }
        self.recompute()
    }

    /// Inicia playback; no fim, reinicia do step 0
    ///
    /// Com `max_step == 0` não há para onde avançar e o controlador fica parado.
    pub fn play(&mut self) -> TimelineResult<()> {
        if self.current_step >= self.max_step() && self.current_step != 0 {
            self.current_step = 0;
            self.recompute()?;
        }
        if self.current_step >= self.max_step() {
            debug!(max_step = self.max_step(), "nothing to play");
            self.state = PlaybackState::Stopped;
            return Ok(());
        }
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// Avança um step durante o playback
    ///
    /// Retorna se o step avançou. Chegar ao `max_step` para o playback.
    pub fn tick(&mut self) -> TimelineResult<bool> {
        if !self.is_playing() {
            return Ok(false);
        }
        if self.current_step >= self.max_step() {
            self.state = PlaybackState::Stopped;
            return Ok(false);
        }

        self.current_step += 1;
        if self.current_step >= self.max_step() {
            self.state = PlaybackState::Stopped;
        }
        self.recompute()?;
        Ok(true)
    }

    pub fn pause(&mut self) {
        self.state = PlaybackState::Stopped;
    }

    /// Alterna entre play e pause
    pub fn toggle(&mut self) -> TimelineResult<()> {
        match self.state {
            PlaybackState::Playing => {
                self.pause();
                Ok(())
            }
            PlaybackState::Stopped => self.play(),
        }
    }

    /// Próximo step (sem alterar o playback)
    pub fn next(&mut self) -> TimelineResult<()> {
        self.seek(self.current_step.saturating_add(1))
    }

    /// Step anterior (sem alterar o playback)
    pub fn previous(&mut self) -> TimelineResult<()> {
        self.seek(self.current_step.saturating_sub(1))
    }

    /// Vai para um step, limitado a `[0, max_step]`
    pub fn seek(&mut self, step: usize) -> TimelineResult<()> {
        let step = step.min(self.max_step());
        if step == self.current_step {
            return Ok(());
        }
        self.current_step = step;
        self.recompute()
    }

    /// Volta ao step 0, parado
    pub fn reset(&mut self) -> TimelineResult<()> {
        self.state = PlaybackState::Stopped;
        self.seek(0)
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn max_step(&self) -> usize {
        self.circuit.max_step()
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Portas visíveis no step atual
    pub fn visible_gates(&self) -> &Circuit {
        &self.frame.visible_gates
    }

    /// Frame do step atual
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Valida um circuito contra o registrador e os shots configurados
    pub fn validate(&self, circuit: &Circuit) -> TimelineResult<()> {
        CircuitSimulator::with_config(self.config.simulator.clone()).validate(
            circuit,
            self.config.num_qubits,
            self.config.shots,
        )?;
        Ok(())
    }

    fn recompute(&mut self) -> TimelineResult<()> {
        let step = self.current_step;
        let visible_gates = self.circuit.visible_at(step);
        let simulator = CircuitSimulator::with_config(SimulatorConfig {
            seed: self.config.seed.or(self.config.simulator.seed).map(|s| s.wrapping_add(step as u64)),
            ..self.config.simulator.clone()
        });
        let result = simulator.simulate(&visible_gates, self.config.num_qubits, self.config.shots)?;

        debug!(step, visible = visible_gates.len(), "frame recomputed");
        self.frame = Frame {
            step,
            visible_gates,
            result,
        };
        Ok(())
    }
}
