//! Testes de integração para qstep-timeline

use qstep_core::*;
use qstep_timeline::*;

fn bell_like() -> Circuit {
    let json = r#"[
        {"id": "h", "gateType": "H", "qubit": 0, "step": 0},
        {"id": "cx", "gateType": "CNOT", "qubit": 0, "step": 1, "target": 1},
        {"id": "ry", "gateType": "RY", "qubit": 1, "step": 2, "angle": 1.5707963267948966},
        {"id": "m", "gateType": "M", "qubit": 0, "step": 3}
    ]"#;
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_full_edit_replay_cycle() {
    let mut session = Session::new(SessionConfig {
        controller: ControllerConfig {
            num_qubits: 2,
            shots: 2000,
            seed: Some(3),
            ..Default::default()
        },
        ..Default::default()
    })
    .unwrap();

    session.edit(bell_like()).unwrap();
    assert_eq!(session.advance(250).unwrap(), 1);
    assert_eq!(session.controller().max_step(), 3);

    session.play().unwrap();
    session.advance(1500).unwrap();
    assert_eq!(session.controller().current_step(), 3);
    assert!(!session.controller().is_playing());

    let result = &session.frame().result;
    assert_eq!(result.applied_gates, 2);
    assert_eq!(result.skipped_gates, 2);
    assert_eq!(result.probabilities.len(), 4);
    assert_eq!(result.total_counts(), 2000);

    // play no fim recomeça do zero
    session.play().unwrap();
    assert_eq!(session.controller().current_step(), 0);
    session.reset().unwrap();
    assert_eq!(session.scheduler().pending(), 0);
}

#[test]
fn test_frames_match_direct_simulation() {
    let circuit = bell_like();
    let mut controller = StepController::new(ControllerConfig {
        num_qubits: 2,
        shots: 300,
        seed: Some(10),
        ..Default::default()
    })
    .unwrap();
    controller.load(circuit.clone()).unwrap();

    for step in 0..=controller.max_step() {
        controller.seek(step).unwrap();
        let direct = CircuitSimulator::with_config(SimulatorConfig {
            seed: Some(10 + step as u64),
            ..Default::default()
        })
        .simulate(&circuit.visible_at(step), 2, 300)
        .unwrap();
        assert_eq!(controller.frame().result, direct);
    }
}

#[test]
fn test_history_snapshots_are_value_copies() {
    let mut history = EditHistory::new();
    let mut circuit = bell_like();
    history.push(&circuit);

    circuit.clear();
    history.push(&circuit);

    assert_eq!(history.undo().map(|c| c.len()), Some(4));
    assert_eq!(history.snapshots().count(), 2);
}

#[test]
fn test_scheduler_drives_custom_events() {
    let mut scheduler = Scheduler::new();
    let keep = scheduler.schedule(10, "keep");
    let drop = scheduler.schedule(5, "drop");
    scheduler.cancel(drop);

    let fired = scheduler.drain_until(10);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].id, keep);
    assert_eq!(scheduler.stats(), SchedulerStats { scheduled: 2, fired: 1, cancelled: 1 });
}
