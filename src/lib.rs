// Re-export core modules for use by the binary or other consumers
pub mod components;
pub mod core;
pub mod data;
pub mod simulation;
pub mod systems;
pub mod ui;

// Expose the session wrapper and the types needed to drive it
pub use crate::components::modality::ModalityKind;
pub use crate::core::session::{ModalitySummary, Session, Snapshot};
pub use crate::data::config::{ConfigError, SessionConfig};
pub use crate::systems::hud::{ActivationError, HudPhase, HudView, SwitchOutcome};
