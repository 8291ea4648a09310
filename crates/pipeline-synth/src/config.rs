//! Generator configuration
//!
//! Defaults reproduce the published datasets; a YAML file may override any
//! field (missing fields keep their default).

use crate::error::{Result, SynthError};
use crate::grammar::Grammar;
use crate::registry::RELATIVE_PERCENT_RANGE;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Inclusive range of explicit turns generated as history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRange {
    pub min: usize,
    pub max: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// History window capacity
    pub max_context_len: usize,
    /// Chance that a contextual sample carries history
    pub history_probability: f64,
    pub history_turns: TurnRange,
    /// `(count, weight)` pairs for commands in the latest turn
    pub command_count_weights: Vec<(usize, f64)>,
    /// Same, for the flat (history-free) variant
    pub flat_command_count_weights: Vec<(usize, f64)>,
    /// Explicit move commands: body part vs literal coordinates
    pub move_body_part_probability: f64,
    /// Elliptical commands: prefixed vs standalone form
    #[serde(alias = "ambiguous_prefixed_probability")]
    pub elliptical_prefixed_probability: f64,
    pub punctuation_probability: f64,
    pub noise_probability: f64,
    /// Magnitude assumed by a bare direction word ("boost")
    pub standalone_force_percent: u8,
    pub grammar: Grammar,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_context_len: 3,
            history_probability: 0.5,
            history_turns: TurnRange { min: 1, max: 3 },
            command_count_weights: vec![(1, 0.2), (2, 0.25), (3, 0.25), (4, 0.15), (5, 0.15)],
            flat_command_count_weights: vec![(1, 0.5), (2, 0.3), (3, 0.2)],
            move_body_part_probability: 0.7,
            elliptical_prefixed_probability: 0.5,
            punctuation_probability: 0.5,
            noise_probability: 0.3,
            standalone_force_percent: 20,
            grammar: Grammar::standard(),
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        let probabilities = [
            ("history_probability", self.history_probability),
            ("move_body_part_probability", self.move_body_part_probability),
            (
                "elliptical_prefixed_probability",
                self.elliptical_prefixed_probability,
            ),
            ("punctuation_probability", self.punctuation_probability),
            ("noise_probability", self.noise_probability),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(SynthError::Config(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }

        if self.max_context_len == 0 {
            return Err(SynthError::Config(
                "max_context_len must be at least 1".to_string(),
            ));
        }
        let TurnRange { min, max } = self.history_turns;
        if min == 0 || min > max {
            return Err(SynthError::Config(format!(
                "history_turns must satisfy 1 <= min <= max, got {min}..={max}"
            )));
        }
        if max > self.max_context_len {
            tracing::warn!(
                max_turns = max,
                max_context_len = self.max_context_len,
                "history turns beyond the window capacity will be evicted"
            );
        }

        for (name, table) in [
            ("command_count_weights", &self.command_count_weights),
            ("flat_command_count_weights", &self.flat_command_count_weights),
        ] {
            if table.iter().any(|(count, _)| *count == 0) {
                return Err(SynthError::Config(format!(
                    "{name} may not draw zero commands"
                )));
            }
        }

        if !RELATIVE_PERCENT_RANGE.contains(&self.standalone_force_percent) {
            return Err(SynthError::Config(format!(
                "standalone_force_percent must be within {}..={}, got {}",
                RELATIVE_PERCENT_RANGE.start(),
                RELATIVE_PERCENT_RANGE.end(),
                self.standalone_force_percent
            )));
        }

        self.grammar.validate()
    }
}

/// Read a YAML config file and validate it.
pub fn load_config_file(path: impl AsRef<Path>) -> anyhow::Result<GeneratorConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading generator config: {}", path.display()))?;
    let config: GeneratorConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("parsing yaml: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("validating generator config: {}", path.display()))?;
    Ok(config)
}
