use crate::constants::{GAME_OVER_AT, POLL_INTERVAL_MS, PROGRESS_MAX};
use crate::controller::StepConfig;
use crate::position::TrackLayout;
use std::str::FromStr;
use thiserror::Error;

/// Keys accepted by [`TrolleyConfig::apply_override`].
pub const OVERRIDE_KEYS: &[&str] = &[
    "direction-x",
    "direction-y",
    "start-x",
    "start-y",
    "face-step",
    "no-face-step",
    "game-over-at",
    "poll-ms",
    "debug-overlay",
    "seed",
];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown setting `{0}`")]
    UnknownKey(String),
    #[error("invalid value `{value}` for `{key}`")]
    Parse { key: String, value: String },
    #[error("`{key}` out of range: {value}")]
    OutOfRange { key: &'static str, value: f32 },
}

/// Everything tunable about one page load.
#[derive(Clone, Debug, PartialEq)]
pub struct TrolleyConfig {
    pub layout: TrackLayout,
    pub steps: StepConfig,
    pub game_over_at: f32,
    pub poll_interval_ms: u32,
    pub debug_overlay: bool,
    /// Seed for overlay randomization; chosen per page load when `None`.
    pub seed: Option<u64>,
}

impl Default for TrolleyConfig {
    fn default() -> Self {
        Self {
            layout: TrackLayout::default(),
            steps: StepConfig::default(),
            game_over_at: GAME_OVER_AT,
            poll_interval_ms: POLL_INTERVAL_MS,
            debug_overlay: true,
            seed: None,
        }
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::Parse {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(ConfigError::Parse {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

impl TrolleyConfig {
    /// Apply one string override, e.g. from a `data-*` attribute.
    ///
    /// The config is left untouched when the value fails to parse or
    /// would make the config invalid.
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut next = self.clone();
        match key {
            "direction-x" => next.layout.direction.x = parse(key, value)?,
            "direction-y" => next.layout.direction.y = parse(key, value)?,
            "start-x" => next.layout.start.x = parse(key, value)?,
            "start-y" => next.layout.start.y = parse(key, value)?,
            "face-step" => next.steps.face_step = parse(key, value)?,
            "no-face-step" => next.steps.no_face_step = parse(key, value)?,
            "game-over-at" => next.game_over_at = parse(key, value)?,
            "poll-ms" => next.poll_interval_ms = parse(key, value)?,
            "debug-overlay" => next.debug_overlay = parse_flag(key, value)?,
            "seed" => next.seed = Some(parse(key, value)?),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = |key: &'static str, v: f32| {
            if (-1.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange { key, value: v })
            }
        };
        unit("direction-x", self.layout.direction.x)?;
        unit("direction-y", self.layout.direction.y)?;
        let non_negative = |key: &'static str, v: f32| {
            if v >= 0.0 && v.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange { key, value: v })
            }
        };
        non_negative("start-x", self.layout.start.x)?;
        non_negative("start-y", self.layout.start.y)?;
        non_negative("face-step", self.steps.face_step)?;
        non_negative("no-face-step", self.steps.no_face_step)?;
        if !(self.game_over_at > 0.0 && self.game_over_at <= PROGRESS_MAX) {
            return Err(ConfigError::OutOfRange {
                key: "game-over-at",
                value: self.game_over_at,
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::OutOfRange {
                key: "poll-ms",
                value: 0.0,
            });
        }
        Ok(())
    }
}
