use std::fmt;

use bevy_ecs::prelude::*;
use bevy_utils::tracing::warn;
use serde::{Deserialize, Serialize};

use crate::components::modality::{ModalityInstance, ModalityKind};
use crate::data::config::ModalityConfig;
use crate::simulation::clock::GameClock;

/// Openability rule attached to a modality definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpenRule {
    Always,
    /// Open once the modality's own counter reaches `min`.
    CounterAtLeast { min: u32 },
    /// Open during `[from, until)` hours of the day. Wraps past midnight when `from > until`.
    HourWithin { from: u8, until: u8 },
}

impl Default for OpenRule {
    fn default() -> Self {
        OpenRule::Always
    }
}

impl OpenRule {
    pub fn allows(&self, counter: u32, clock: &GameClock) -> bool {
        match *self {
            OpenRule::Always => true,
            OpenRule::CounterAtLeast { min } => counter >= min,
            OpenRule::HourWithin { from, until } => {
                let hour = hour_of_day(clock.time);
                if from <= until {
                    hour >= from && hour < until
                } else {
                    hour >= from || hour < until
                }
            }
        }
    }
}

fn hour_of_day(time: f32) -> u8 {
    (time.rem_euclid(24.0) as u8).min(23)
}

/// Why a modality refused to open. Displays as the player-facing reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalityBlocked {
    pub kind: ModalityKind,
    pub reason: String,
}

impl fmt::Display for ModalityBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for ModalityBlocked {}

/// Creates and disposes of the scene object representing an open modality.
pub trait Instantiator {
    fn instantiate(&mut self, kind: ModalityKind, prefab: &str) -> Entity;
    fn release(&mut self, instance: Entity);
}

impl Instantiator for World {
    fn instantiate(&mut self, kind: ModalityKind, prefab: &str) -> Entity {
        self.spawn(ModalityInstance {
            kind,
            prefab: prefab.to_string(),
        })
        .id()
    }

    fn release(&mut self, instance: Entity) {
        if !self.despawn(instance) {
            warn!(?instance, "released a modality instance that was already gone");
        }
    }
}

impl Instantiator for Commands<'_, '_> {
    fn instantiate(&mut self, kind: ModalityKind, prefab: &str) -> Entity {
        self.spawn(ModalityInstance {
            kind,
            prefab: prefab.to_string(),
        })
        .id()
    }

    fn release(&mut self, instance: Entity) {
        self.entity(instance).despawn();
    }
}

/// One selectable activity: its rule, its counter and, while active, its scene instance.
#[derive(Debug, Clone)]
pub struct Modality {
    kind: ModalityKind,
    counter: u32,
    text: String,
    prefab: String,
    rule: OpenRule,
    blocked_text: String,
    instance: Option<Entity>,
}

impl Modality {
    pub fn new(
        kind: ModalityKind,
        text: impl Into<String>,
        prefab: impl Into<String>,
        rule: OpenRule,
        blocked_text: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            counter: 0,
            text: text.into(),
            prefab: prefab.into(),
            rule,
            blocked_text: blocked_text.into(),
            instance: None,
        }
    }

    pub fn from_config(config: &ModalityConfig) -> Self {
        Self::new(
            config.kind,
            config.text.clone(),
            config.prefab.clone(),
            config.rule.clone(),
            config.blocked_text.clone(),
        )
    }

    pub fn kind(&self) -> ModalityKind {
        self.kind
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rule(&self) -> &OpenRule {
        &self.rule
    }

    pub fn instance(&self) -> Option<Entity> {
        self.instance
    }

    pub fn is_open(&self) -> bool {
        self.instance.is_some()
    }

    pub fn can_open(&self, clock: &GameClock) -> Result<(), ModalityBlocked> {
        if self.rule.allows(self.counter, clock) {
            Ok(())
        } else {
            Err(ModalityBlocked {
                kind: self.kind,
                reason: self.blocked_text.clone(),
            })
        }
    }

    pub fn increment(&mut self) {
        self.increment_by(1);
    }

    pub fn increment_by(&mut self, amount: u32) {
        self.counter = self.counter.saturating_add(amount);
    }

    /// Spawn the scene instance. The switcher only calls this on a closed modality.
    pub fn open<I: Instantiator>(&mut self, instantiator: &mut I) -> Entity {
        debug_assert!(self.instance.is_none(), "{} opened twice", self.kind);
        let instance = instantiator.instantiate(self.kind, &self.prefab);
        self.instance = Some(instance);
        instance
    }

    pub fn close<I: Instantiator>(&mut self, instantiator: &mut I) {
        if let Some(instance) = self.instance.take() {
            instantiator.release(instance);
        }
    }
}

/// Every modality definition of the session, one per kind.
#[derive(Resource, Debug, Clone, Default)]
pub struct ModalityRoster {
    modalities: Vec<Modality>,
}

impl ModalityRoster {
    pub fn new(modalities: Vec<Modality>) -> Self {
        Self { modalities }
    }

    pub fn from_config(configs: &[ModalityConfig]) -> Self {
        Self::new(configs.iter().map(Modality::from_config).collect())
    }

    pub fn get(&self, kind: ModalityKind) -> Option<&Modality> {
        self.modalities.iter().find(|m| m.kind == kind)
    }

    pub fn get_mut(&mut self, kind: ModalityKind) -> Option<&mut Modality> {
        self.modalities.iter_mut().find(|m| m.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modality> {
        self.modalities.iter()
    }

    pub fn open_count(&self) -> usize {
        self.modalities.iter().filter(|m| m.is_open()).count()
    }
}
