use std::collections::HashSet;
use std::fs;
use std::path::Path;

use bevy_utils::tracing::warn;
use serde::{Deserialize, Serialize};

use crate::components::modality::ModalityKind;
use crate::simulation::modality::OpenRule;

pub const DEFAULT_CONFIG_PATH: &str = "./assets/data/session.json";

/// Everything a session needs at startup. Read-only once the session is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub clock: ClockSettings,
    #[serde(default)]
    pub hud: HudSettings,
    #[serde(default = "default_modalities")]
    pub modalities: Vec<ModalityConfig>,
    #[serde(default = "default_incrementers")]
    pub incrementers: Vec<IncrementerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockSettings {
    #[serde(default = "default_start_time")]
    pub start_time: f32,
    #[serde(default = "default_multiplier")]
    pub multiplier: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HudSettings {
    #[serde(default = "default_abort_time")]
    pub abort_time: f32,
    #[serde(default = "default_idle")]
    pub idle: ModalityKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalityConfig {
    pub kind: ModalityKind,
    pub text: String,
    pub prefab: String,
    #[serde(default)]
    pub rule: OpenRule,
    #[serde(default)]
    pub blocked_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncrementerConfig {
    pub target: ModalityKind,
    #[serde(default = "default_multiplier")]
    pub multiplier: f32,
}

fn default_start_time() -> f32 {
    9.0
}

fn default_multiplier() -> f32 {
    1.0
}

fn default_abort_time() -> f32 {
    60.0
}

fn default_idle() -> ModalityKind {
    ModalityKind::Idling
}

fn default_modalities() -> Vec<ModalityConfig> {
    let modality = |kind, text: &str, prefab: &str, rule, blocked_text: &str| ModalityConfig {
        kind,
        text: text.to_string(),
        prefab: prefab.to_string(),
        rule,
        blocked_text: blocked_text.to_string(),
    };

    vec![
        modality(
            ModalityKind::Idling,
            "Now doing: Nothing",
            "IdlingRoom",
            OpenRule::Always,
            "",
        ),
        modality(
            ModalityKind::Marketing,
            "Now doing: Marketing",
            "MarketingDesk",
            OpenRule::CounterAtLeast { min: 3 },
            "Nothing worth marketing yet.",
        ),
        modality(
            ModalityKind::Jamming,
            "Now doing: Jamming",
            "JamSession",
            OpenRule::HourWithin { from: 10, until: 22 },
            "Too late to make noise.",
        ),
        modality(
            ModalityKind::Sleeping,
            "Now doing: Sleeping",
            "Bed",
            OpenRule::HourWithin { from: 22, until: 8 },
            "Not tired yet.",
        ),
    ]
}

fn default_incrementers() -> Vec<IncrementerConfig> {
    vec![IncrementerConfig {
        target: ModalityKind::Marketing,
        multiplier: 1.0,
    }]
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            start_time: default_start_time(),
            multiplier: default_multiplier(),
        }
    }
}

impl Default for HudSettings {
    fn default() -> Self {
        Self {
            abort_time: default_abort_time(),
            idle: default_idle(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            clock: ClockSettings::default(),
            hud: HudSettings::default(),
            modalities: default_modalities(),
            incrementers: default_incrementers(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, source: std::io::Error },
    Json { path: String, source: serde_json::Error },
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "failed to read {}: {}", path, source),
            ConfigError::Json { path, source } => {
                write!(f, "failed to parse {}: {}", path, source)
            }
            ConfigError::Validation(message) => write!(f, "invalid session config: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Json { source, .. } => Some(source),
            ConfigError::Validation(_) => None,
        }
    }
}

pub fn load_session_config(path: impl AsRef<Path>) -> Result<SessionConfig, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_session_config(&raw).map_err(|err| match err {
        ConfigError::Json { source, .. } => ConfigError::Json {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })
}

pub fn parse_session_config(raw: &str) -> Result<SessionConfig, ConfigError> {
    let config: SessionConfig = serde_json::from_str(raw).map_err(|source| ConfigError::Json {
        path: "<inline>".to_string(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

impl SessionConfig {
    pub fn modality(&self, kind: ModalityKind) -> Option<&ModalityConfig> {
        self.modalities.iter().find(|m| m.kind == kind)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_finite("clock.start_time", self.clock.start_time)?;
        require_finite("clock.multiplier", self.clock.multiplier)?;
        require_finite("hud.abort_time", self.hud.abort_time)?;
        if self.clock.multiplier < 0.0 {
            return Err(ConfigError::Validation(format!(
                "clock.multiplier must not be negative (got {})",
                self.clock.multiplier
            )));
        }
        if self.clock.multiplier == 0.0 {
            warn!("clock.multiplier is zero; game time will never advance");
        }

        let mut kinds = HashSet::new();
        for modality in &self.modalities {
            if !kinds.insert(modality.kind) {
                return Err(ConfigError::Validation(format!(
                    "duplicate modality {}",
                    modality.kind
                )));
            }
            if modality.text.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "modality {} missing text",
                    modality.kind
                )));
            }
            if modality.prefab.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "modality {} missing prefab",
                    modality.kind
                )));
            }
            if modality.rule != OpenRule::Always && modality.blocked_text.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "modality {} can refuse to open but has no blocked_text",
                    modality.kind
                )));
            }
            if let OpenRule::HourWithin { from, until } = modality.rule {
                if from >= 24 || until >= 24 || from == until {
                    return Err(ConfigError::Validation(format!(
                        "modality {} has an empty or out-of-range hour window {}..{}",
                        modality.kind, from, until
                    )));
                }
            }
        }
        for kind in ModalityKind::ALL {
            if !kinds.contains(&kind) {
                return Err(ConfigError::Validation(format!("missing modality {}", kind)));
            }
        }

        match self.modality(self.hud.idle) {
            Some(idle) if idle.rule == OpenRule::Always => {}
            _ => {
                return Err(ConfigError::Validation(format!(
                    "idle modality {} must always be openable",
                    self.hud.idle
                )));
            }
        }

        for incrementer in &self.incrementers {
            require_finite("incrementer.multiplier", incrementer.multiplier)?;
            if incrementer.multiplier < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "incrementer for {} has a negative multiplier",
                    incrementer.target
                )));
            }
        }

        // Counters only move through incrementers.
        for modality in &self.modalities {
            if let OpenRule::CounterAtLeast { min } = modality.rule {
                let fed = self
                    .incrementers
                    .iter()
                    .any(|inc| inc.target == modality.kind && inc.multiplier > 0.0);
                if min > 0 && !fed {
                    return Err(ConfigError::Validation(format!(
                        "modality {} needs a counter of {} but no incrementer feeds it",
                        modality.kind, min
                    )));
                }
            }
        }

        Ok(())
    }
}

fn require_finite(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{} must be a finite number (got {})",
            field, value
        )))
    }
}
