use bevy_ecs::prelude::*;
use bevy_utils::tracing::{debug, warn};

use crate::components::incrementer::ModalityIncrementer;
use crate::simulation::clock::GameClock;
use crate::simulation::modality::ModalityRoster;

/// System: Converts the clock's scaled delta into modality counter increments.
pub fn modality_incrementer_system(
    clock: Res<GameClock>,
    mut roster: ResMut<ModalityRoster>,
    mut incrementers: Query<&mut ModalityIncrementer>,
) {
    for mut incrementer in incrementers.iter_mut() {
        feed_modality(&mut incrementer, clock.delta_time, &mut roster);
    }
}

/// Advance one incrementer and apply the increments it yields. Returns how many were applied.
pub fn feed_modality(
    incrementer: &mut ModalityIncrementer,
    scaled_delta: f32,
    roster: &mut ModalityRoster,
) -> u32 {
    let due = incrementer.advance(scaled_delta);
    if due == 0 {
        return 0;
    }

    let Some(modality) = roster.get_mut(incrementer.target) else {
        warn!(target_modality = %incrementer.target, "incrementer bound to unknown modality");
        return 0;
    };
    modality.increment_by(due);
    debug!(
        modality = %incrementer.target,
        increments = due,
        counter = modality.counter(),
        "modality counter advanced"
    );
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::modality::ModalityKind;
    use crate::data::config::SessionConfig;

    #[test]
    fn feeds_bound_modality_only() {
        let mut roster = ModalityRoster::from_config(&SessionConfig::default().modalities);
        let mut incrementer = ModalityIncrementer::new(ModalityKind::Marketing, 1.0);

        for _ in 0..5 {
            feed_modality(&mut incrementer, 1.0, &mut roster);
        }

        assert_eq!(roster.get(ModalityKind::Marketing).unwrap().counter(), 5);
        assert_eq!(roster.get(ModalityKind::Jamming).unwrap().counter(), 0);
    }

    #[test]
    fn huge_delta_is_applied_in_one_step() {
        let mut roster = ModalityRoster::from_config(&SessionConfig::default().modalities);
        let mut incrementer = ModalityIncrementer::new(ModalityKind::Marketing, 1.0);

        assert_eq!(feed_modality(&mut incrementer, 3.0e9, &mut roster), 3_000_000_000);
        feed_modality(&mut incrementer, 3.0e9, &mut roster);
        assert_eq!(roster.get(ModalityKind::Marketing).unwrap().counter(), u32::MAX);
    }

    #[test]
    fn zero_delta_never_increments() {
        let mut roster = ModalityRoster::from_config(&SessionConfig::default().modalities);
        let mut incrementer = ModalityIncrementer::new(ModalityKind::Marketing, 4.0);
        for _ in 0..10 {
            assert_eq!(feed_modality(&mut incrementer, 0.0, &mut roster), 0);
        }
        assert_eq!(roster.get(ModalityKind::Marketing).unwrap().counter(), 0);
    }
}
