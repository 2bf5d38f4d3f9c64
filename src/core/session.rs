use std::mem;

use bevy_ecs::prelude::*;
use bevy_utils::tracing::{info, warn};

use crate::components::modality::{ModalityInstance, ModalityKind};
use crate::core::ecs::{create_schedule, create_world};
use crate::data::config::{ConfigError, SessionConfig};
use crate::simulation::clock::{FrameDelta, GameClock};
use crate::simulation::modality::{ModalityRoster, OpenRule};
use crate::systems::hud::{self, ActivationError, Hud, HudEventLog, HudPhase, HudView, SwitchOutcome};

/// Data snapshot returned to the display layer after each tick. Time stays raw; formatting
/// belongs to the caller.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub time: f32,
    pub delta_time: f32,
    pub clock_enabled: bool,
    pub status: String,
    pub active: Option<ModalityKind>,
    pub phase: HudPhase,
    pub view: HudView,
    pub modalities: Vec<ModalitySummary>,
    pub open_instances: usize,
    pub events: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ModalitySummary {
    pub kind: ModalityKind,
    pub counter: u32,
    pub is_open: bool,
    pub rule: OpenRule,
    /// Why the modality would refuse to open right now, if it would.
    pub blocked: Option<String>,
}

/// Wrapper around the ECS world and the per-frame schedule.
pub struct Session {
    world: World,
    schedule: Schedule,
}

impl Session {
    /// Build a session from an already validated config and activate the idle modality.
    pub fn new(config: &SessionConfig) -> Self {
        let mut session = Self {
            world: create_world(config),
            schedule: create_schedule(),
        };
        session.start();
        session
    }

    /// Validate `config` before building the session.
    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    fn start(&mut self) {
        let idle = self.world.resource::<Hud>().idle;
        match self.try_activate(idle) {
            Ok(_) => info!(modality = %idle, "session started"),
            Err(err) => warn!(modality = %idle, error = %err, "idle modality refused to open"),
        }
    }

    /// Run one frame with `real_delta` of unscaled time and return a snapshot for rendering.
    pub fn tick(&mut self, real_delta: f32) -> Snapshot {
        self.world.resource_mut::<FrameDelta>().0 = real_delta;
        self.schedule.run(&mut self.world);
        self.snapshot()
    }

    /// Player request to switch to `kind`, honouring its openability rule.
    pub fn try_activate(&mut self, kind: ModalityKind) -> Result<SwitchOutcome, ActivationError> {
        let clock = *self.world.resource::<GameClock>();
        let result = self.world.resource_scope(|world, mut hud: Mut<Hud>| {
            world.resource_scope(|world, mut roster: Mut<ModalityRoster>| {
                hud::try_activate(&mut hud, &mut roster, &clock, world, kind)
            })
        });

        let message = match &result {
            Ok(SwitchOutcome::Switched { .. }) => Some(format!("Switched to {}.", kind)),
            Ok(SwitchOutcome::Unchanged) => None,
            Err(err) => Some(err.to_string()),
        };
        if let Some(message) = message {
            self.world.resource_mut::<HudEventLog>().0.push(message);
        }
        result
    }

    /// Capture the current state and drain pending HUD events.
    pub fn snapshot(&mut self) -> Snapshot {
        let events = mem::take(&mut self.world.resource_mut::<HudEventLog>().0);
        let open_instances = self.open_instance_count();

        let clock = *self.world.resource::<GameClock>();
        let hud = self.world.resource::<Hud>();
        let modalities = self
            .world
            .resource::<ModalityRoster>()
            .iter()
            .map(|modality| ModalitySummary {
                kind: modality.kind(),
                counter: modality.counter(),
                is_open: modality.is_open(),
                rule: modality.rule().clone(),
                blocked: modality.can_open(&clock).err().map(|b| b.reason),
            })
            .collect();

        Snapshot {
            time: clock.time,
            delta_time: clock.delta_time,
            clock_enabled: clock.is_enabled(),
            status: hud.status.clone(),
            active: hud.current(),
            phase: hud.phase(),
            view: hud.view(),
            modalities,
            open_instances,
            events,
        }
    }

    pub fn clock(&self) -> &GameClock {
        self.world.resource::<GameClock>()
    }

    pub fn hud(&self) -> &Hud {
        self.world.resource::<Hud>()
    }

    pub fn roster(&self) -> &ModalityRoster {
        self.world.resource::<ModalityRoster>()
    }

    /// Number of modality scene instances currently alive.
    pub fn open_instance_count(&mut self) -> usize {
        let mut query = self.world.query::<&ModalityInstance>();
        query.iter(&self.world).count()
    }

    /// Kinds of the modality scene instances currently alive.
    pub fn open_instances(&mut self) -> Vec<ModalityKind> {
        let mut query = self.world.query::<&ModalityInstance>();
        query.iter(&self.world).map(|instance| instance.kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::config::IncrementerConfig;

    fn scenario_config() -> SessionConfig {
        let mut config = SessionConfig::default();
        config.clock.start_time = 9.0;
        config.clock.multiplier = 1.0;
        config.hud.abort_time = 60.0;
        config.incrementers = vec![IncrementerConfig {
            target: ModalityKind::Marketing,
            multiplier: 1.0,
        }];
        config
    }

    #[test]
    fn session_starts_in_idle() {
        let mut session = Session::from_config(&scenario_config()).unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.active, Some(ModalityKind::Idling));
        assert_eq!(snapshot.status, "Now doing: Nothing");
        assert_eq!(snapshot.view, HudView::Controls);
        assert_eq!(session.open_instances(), vec![ModalityKind::Idling]);
    }

    #[test]
    fn clock_advances_by_scaled_delta() {
        let mut config = scenario_config();
        config.clock.multiplier = 2.0;
        let mut session = Session::new(&config);
        let snapshot = session.tick(0.5);
        assert_eq!(snapshot.delta_time, 1.0);
        assert_eq!(snapshot.time, 10.0);
    }

    #[test]
    fn marketing_unlocks_after_three_hours() {
        let mut session = Session::new(&scenario_config());
        for _ in 0..3 {
            session.tick(1.0);
        }

        let marketing = session.roster().get(ModalityKind::Marketing).unwrap();
        assert_eq!(marketing.counter(), 3);
        assert!(marketing.can_open(session.clock()).is_ok());
        let idle_instance = session.roster().get(ModalityKind::Idling).unwrap().instance();
        assert!(idle_instance.is_some());

        let outcome = session.try_activate(ModalityKind::Marketing).unwrap();
        assert_eq!(
            outcome,
            SwitchOutcome::Switched {
                from: Some(ModalityKind::Idling),
                to: Some(ModalityKind::Marketing),
            }
        );
        assert_eq!(session.hud().current(), Some(ModalityKind::Marketing));
        assert!(!session.roster().get(ModalityKind::Idling).unwrap().is_open());
        assert!(session.roster().get(ModalityKind::Marketing).unwrap().is_open());
        assert_eq!(session.open_instances(), vec![ModalityKind::Marketing]);
        assert_eq!(session.hud().status, "Now doing: Marketing");

        // Marketing stays openable, so the next tick keeps it.
        let snapshot = session.tick(1.0);
        assert_eq!(snapshot.active, Some(ModalityKind::Marketing));
        assert_eq!(snapshot.open_instances, 1);
    }

    #[test]
    fn marketing_is_refused_too_early() {
        let mut session = Session::new(&scenario_config());
        session.tick(1.0);
        let err = session.try_activate(ModalityKind::Marketing).unwrap_err();
        assert!(matches!(err, ActivationError::Blocked(_)));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, "Nothing worth marketing yet.");
        assert_eq!(snapshot.active, Some(ModalityKind::Idling));
        assert_eq!(snapshot.events.len(), 1);
    }

    #[test]
    fn snapshot_reports_each_rule() {
        let mut session = Session::new(&scenario_config());
        let snapshot = session.snapshot();
        let marketing = snapshot
            .modalities
            .iter()
            .find(|m| m.kind == ModalityKind::Marketing)
            .unwrap();
        assert_eq!(marketing.rule, OpenRule::CounterAtLeast { min: 3 });
        assert_eq!(marketing.blocked.as_deref(), Some("Nothing worth marketing yet."));
    }

    #[test]
    fn reactivating_current_modality_changes_nothing() {
        let mut session = Session::new(&scenario_config());
        let before = session.roster().get(ModalityKind::Idling).unwrap().instance();
        let outcome = session.try_activate(ModalityKind::Idling).unwrap();
        assert_eq!(outcome, SwitchOutcome::Unchanged);
        assert_eq!(session.roster().get(ModalityKind::Idling).unwrap().instance(), before);
        assert_eq!(session.open_instance_count(), 1);
    }

    #[test]
    fn timeout_freezes_clock_and_closes_everything() {
        let mut session = Session::new(&scenario_config());
        let snapshot = session.tick(51.0);
        assert_eq!(snapshot.time, 60.0);
        assert_eq!(snapshot.phase, HudPhase::TimedOut);
        assert_eq!(snapshot.view, HudView::Credits);
        assert_eq!(snapshot.active, None);
        assert!(!snapshot.clock_enabled);
        assert_eq!(snapshot.open_instances, 0);
        assert!(snapshot.events.iter().any(|e| e == "Time is up."));

        let snapshot = session.tick(5.0);
        assert_eq!(snapshot.time, 60.0);
        assert_eq!(snapshot.delta_time, 0.0);
        assert_eq!(snapshot.active, None);
        assert_eq!(snapshot.open_instances, 0);

        assert_eq!(
            session.try_activate(ModalityKind::Idling),
            Err(ActivationError::TimedOut)
        );
    }

    #[test]
    fn counters_stop_once_timed_out() {
        let mut session = Session::new(&scenario_config());
        session.tick(50.5);
        let counter = session.roster().get(ModalityKind::Marketing).unwrap().counter();
        assert_eq!(counter, 50);

        session.tick(1.0);
        assert!(session.hud().is_timed_out());
        for _ in 0..5 {
            session.tick(10.0);
        }
        assert_eq!(
            session.roster().get(ModalityKind::Marketing).unwrap().counter(),
            51
        );
    }

    #[test]
    fn jamming_is_dropped_when_night_falls() {
        let mut config = scenario_config();
        config.clock.start_time = 21.0;
        let mut session = Session::new(&config);

        session.try_activate(ModalityKind::Jamming).unwrap();
        assert_eq!(session.open_instances(), vec![ModalityKind::Jamming]);

        let snapshot = session.tick(0.5);
        assert_eq!(snapshot.active, Some(ModalityKind::Jamming));

        let snapshot = session.tick(0.5);
        assert_eq!(snapshot.active, Some(ModalityKind::Idling));
        assert_eq!(snapshot.status, "Now doing: Nothing");
        assert_eq!(snapshot.open_instances, 1);
        assert!(snapshot.events.iter().any(|e| e.contains("back to idling")));
    }

    #[test]
    fn misconfigured_idle_is_forced_open_on_first_tick() {
        let mut config = scenario_config();
        config.modalities[0].rule = OpenRule::HourWithin { from: 0, until: 1 };
        config.modalities[0].blocked_text = "Can't idle now.".to_string();
        assert!(config.validate().is_err());

        let mut session = Session::new(&config);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.active, None);
        assert_eq!(snapshot.status, "Can't idle now.");
        assert_eq!(snapshot.open_instances, 0);

        let snapshot = session.tick(0.1);
        assert_eq!(snapshot.active, Some(ModalityKind::Idling));
        assert_eq!(snapshot.open_instances, 1);
    }
}
