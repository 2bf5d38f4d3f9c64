use std::fmt;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// The closed set of activities the HUD can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalityKind {
    Idling,
    Marketing,
    Jamming,
    Sleeping,
}

impl ModalityKind {
    pub const ALL: [ModalityKind; 4] = [
        ModalityKind::Idling,
        ModalityKind::Marketing,
        ModalityKind::Jamming,
        ModalityKind::Sleeping,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ModalityKind::Idling => "idling",
            ModalityKind::Marketing => "marketing",
            ModalityKind::Jamming => "jamming",
            ModalityKind::Sleeping => "sleeping",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        ModalityKind::ALL
            .into_iter()
            .find(|kind| kind.label() == value)
    }
}

impl fmt::Display for ModalityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Scene object standing in for an open modality's prefab.
#[derive(Component, Debug, Clone)]
pub struct ModalityInstance {
    pub kind: ModalityKind,
    pub prefab: String,
}
