use bevy_ecs::prelude::*;
use bevy_ecs::schedule::SystemSet;

use crate::components::incrementer::ModalityIncrementer;
use crate::data::config::SessionConfig;
use crate::simulation::clock::{advance_clock_system, FrameDelta, GameClock};
use crate::simulation::modality::ModalityRoster;
use crate::systems::hud::{hud_evaluate_system, Hud, HudEventLog};
use crate::systems::incrementer::modality_incrementer_system;

/// Canonical tick ordering: the clock moves first, counters follow, the HUD decides last.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum TickSet {
    Clock,
    Accumulate,
    Evaluate,
}

/// Build the ECS world with the session's resources and incrementer entities.
pub fn create_world(config: &SessionConfig) -> World {
    let mut world = World::new();
    world.insert_resource(GameClock::new(
        config.clock.start_time,
        config.clock.multiplier,
    ));
    world.insert_resource(FrameDelta::default());
    world.insert_resource(ModalityRoster::from_config(&config.modalities));
    world.insert_resource(Hud::new(config.hud.idle, config.hud.abort_time));
    world.insert_resource(HudEventLog::default());

    for incrementer in &config.incrementers {
        world.spawn(ModalityIncrementer::new(
            incrementer.target,
            incrementer.multiplier,
        ));
    }
    world
}

/// Build the per-frame schedule in the canonical order.
pub fn create_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.configure_sets((TickSet::Clock, TickSet::Accumulate, TickSet::Evaluate).chain());

    schedule.add_systems((
        advance_clock_system.in_set(TickSet::Clock),
        modality_incrementer_system.in_set(TickSet::Accumulate),
        hud_evaluate_system.in_set(TickSet::Evaluate),
    ));

    schedule
}
