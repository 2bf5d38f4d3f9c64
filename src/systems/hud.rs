use std::fmt;

use bevy_ecs::prelude::*;
use bevy_utils::tracing::{debug, info, warn};

use crate::components::modality::ModalityKind;
use crate::simulation::clock::GameClock;
use crate::simulation::modality::{Instantiator, ModalityBlocked, ModalityRoster};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudPhase {
    Running,
    TimedOut,
}

/// Which part of the HUD is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudView {
    Controls,
    Credits,
}

/// Owner of the active modality slot.
#[derive(Resource, Debug, Clone)]
pub struct Hud {
    pub idle: ModalityKind,
    pub abort_time: f32,
    pub status: String,
    current: Option<ModalityKind>,
    phase: HudPhase,
    view: HudView,
}

impl Hud {
    pub fn new(idle: ModalityKind, abort_time: f32) -> Self {
        Self {
            idle,
            abort_time,
            status: String::new(),
            current: None,
            phase: HudPhase::Running,
            view: HudView::Controls,
        }
    }

    pub fn current(&self) -> Option<ModalityKind> {
        self.current
    }

    pub fn phase(&self) -> HudPhase {
        self.phase
    }

    pub fn view(&self) -> HudView {
        self.view
    }

    pub fn is_timed_out(&self) -> bool {
        self.phase == HudPhase::TimedOut
    }
}

/// Player-facing messages about HUD transitions, drained into each snapshot.
#[derive(Resource, Debug, Default)]
pub struct HudEventLog(pub Vec<String>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    Unchanged,
    Switched {
        from: Option<ModalityKind>,
        to: Option<ModalityKind>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationError {
    Blocked(ModalityBlocked),
    TimedOut,
    UnknownModality(ModalityKind),
}

impl fmt::Display for ActivationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationError::Blocked(blocked) => {
                write!(f, "cannot start {}: {}", blocked.kind, blocked.reason)
            }
            ActivationError::TimedOut => f.write_str("the session has ended"),
            ActivationError::UnknownModality(kind) => write!(f, "no {} modality configured", kind),
        }
    }
}

impl std::error::Error for ActivationError {}

/// Make `target` the active modality. The previous holder is always closed before the new
/// one opens; requesting the current modality again does nothing.
pub fn switch_modality<I: Instantiator>(
    hud: &mut Hud,
    roster: &mut ModalityRoster,
    instantiator: &mut I,
    target: Option<ModalityKind>,
) -> SwitchOutcome {
    if hud.current == target {
        return SwitchOutcome::Unchanged;
    }

    let from = hud.current.take();
    if let Some(previous) = from.and_then(|kind| roster.get_mut(kind)) {
        previous.close(instantiator);
    }

    if let Some(kind) = target {
        match roster.get_mut(kind) {
            Some(next) => {
                next.open(instantiator);
                hud.status = next.text().to_string();
                hud.current = Some(kind);
            }
            None => warn!(modality = %kind, "switch requested to unconfigured modality"),
        }
    }

    debug!(from = ?from, to = ?hud.current, "active modality switched");
    SwitchOutcome::Switched {
        from,
        to: hud.current,
    }
}

/// Player-initiated activation: honours the modality's own rule and reports a refusal
/// through the status line.
pub fn try_activate<I: Instantiator>(
    hud: &mut Hud,
    roster: &mut ModalityRoster,
    clock: &GameClock,
    instantiator: &mut I,
    kind: ModalityKind,
) -> Result<SwitchOutcome, ActivationError> {
    if hud.is_timed_out() {
        return Err(ActivationError::TimedOut);
    }
    let Some(modality) = roster.get(kind) else {
        return Err(ActivationError::UnknownModality(kind));
    };

    if let Err(blocked) = modality.can_open(clock) {
        hud.status = blocked.reason.clone();
        info!(modality = %kind, reason = %blocked.reason, "activation refused");
        return Err(ActivationError::Blocked(blocked));
    }

    Ok(switch_modality(hud, roster, instantiator, Some(kind)))
}

/// Per-tick HUD evaluation: time out once the abort time is reached, otherwise fall back to
/// the idle modality whenever nothing openable is active.
pub fn evaluate_hud<I: Instantiator>(
    hud: &mut Hud,
    roster: &mut ModalityRoster,
    clock: &mut GameClock,
    instantiator: &mut I,
    log: &mut HudEventLog,
) {
    if hud.is_timed_out() {
        return;
    }

    if clock.time >= hud.abort_time {
        switch_modality(hud, roster, instantiator, None);
        clock.disable();
        hud.phase = HudPhase::TimedOut;
        hud.view = HudView::Credits;
        log.0.push("Time is up.".to_string());
        info!(time = clock.time, abort_time = hud.abort_time, "session timed out");
        return;
    }

    let still_open = hud
        .current
        .and_then(|kind| roster.get(kind))
        .map(|modality| modality.can_open(clock).is_ok())
        .unwrap_or(false);
    if still_open {
        return;
    }

    let idle = hud.idle;
    if let SwitchOutcome::Switched { from, .. } =
        switch_modality(hud, roster, instantiator, Some(idle))
    {
        let message = match from {
            Some(kind) => format!("Can't keep {} any longer; back to {}.", kind, idle),
            None => format!("Falling back to {}.", idle),
        };
        log.0.push(message);
    }
}

/// System: Runs the HUD evaluation after the clock and incrementers have updated.
pub fn hud_evaluate_system(
    mut commands: Commands,
    mut hud: ResMut<Hud>,
    mut roster: ResMut<ModalityRoster>,
    mut clock: ResMut<GameClock>,
    mut log: ResMut<HudEventLog>,
) {
    evaluate_hud(&mut hud, &mut roster, &mut clock, &mut commands, &mut log);
}
