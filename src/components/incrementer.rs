use bevy_ecs::prelude::*;

use crate::components::modality::ModalityKind;

/// Feeds a modality's counter from elapsed game time.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ModalityIncrementer {
    pub target: ModalityKind,
    pub multiplier: f32,
    accumulator: f32,
}

impl ModalityIncrementer {
    pub fn new(target: ModalityKind, multiplier: f32) -> Self {
        Self {
            target,
            multiplier,
            accumulator: 0.0,
        }
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Accumulate `scaled_delta * multiplier` and return how many whole units are now due.
    pub fn advance(&mut self, scaled_delta: f32) -> u32 {
        self.accumulator += scaled_delta * self.multiplier;
        let whole = self.accumulator.floor();
        if whole < 1.0 {
            return 0;
        }
        self.accumulator -= whole;
        whole as u32
    }
}
