//! Utterance composer
//!
//! Builds one sample: optional explicit history, then a latest turn bundling
//! several commands. Elliptical phrasings are only drawn when history exists.

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::history::{HistoryWindow, USER_ROLE};
use crate::primitives::Pipeline;
use crate::registry::{CommandKind, GeneratedUtterance};
use crate::sampling::{coin, WeightedTable};
use rand::{Rng, RngCore};

/// Separator between commands in a contextual latest turn
pub const CONTEXT_JOINER: &str = "; ";
/// Separator between commands in a flat record
pub const FLAT_JOINER: &str = "; then ";

/// One sample before it is turned into a record
#[derive(Debug, Clone)]
pub struct ComposedSample {
    pub history: HistoryWindow,
    pub utterances: Vec<GeneratedUtterance>,
    pub latest_input: String,
    /// Every command's pipeline, in generation order
    pub response: Pipeline,
}

impl ComposedSample {
    pub fn has_history(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn expected_response(&self) -> String {
        self.response.render()
    }
}

pub struct UtteranceComposer {
    config: GeneratorConfig,
    command_counts: WeightedTable<usize>,
    flat_command_counts: WeightedTable<usize>,
}

impl UtteranceComposer {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let command_counts =
            WeightedTable::new("command_count_weights", config.command_count_weights.clone())?;
        let flat_command_counts = WeightedTable::new(
            "flat_command_count_weights",
            config.flat_command_count_weights.clone(),
        )?;
        Ok(Self {
            config,
            command_counts,
            flat_command_counts,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Sample with a coin-flip history and possibly elliptical commands.
    pub fn compose_contextual(&self, rng: &mut dyn RngCore) -> Result<ComposedSample> {
        let mut history = HistoryWindow::new(self.config.max_context_len)?;
        if coin(rng, self.config.history_probability) {
            let turns = self.config.history_turns;
            for _ in 0..rng.gen_range(turns.min..=turns.max) {
                let utterance = random_kind(rng).spec().generate_explicit(&self.config, rng)?;
                history.push(utterance.into());
            }
        }

        let has_history = !history.is_empty();
        let count = *self.command_counts.sample(rng);
        let mut utterances = Vec::with_capacity(count);
        for _ in 0..count {
            let spec = random_kind(rng).spec();
            let utterance = if has_history && spec.has_ambiguous_form() {
                spec.generate_ambiguous(&self.config, has_history, rng)?
            } else {
                let mut utterance = spec.generate_explicit(&self.config, rng)?;
                if let Some(bare) = utterance.text.strip_prefix(USER_ROLE) {
                    utterance.text = bare.to_string();
                }
                utterance
            };
            utterances.push(utterance);
        }

        tracing::trace!(
            history_turns = history.len(),
            commands = utterances.len(),
            "composed contextual sample"
        );
        Ok(assemble(history, utterances, CONTEXT_JOINER))
    }

    /// History-free sample of explicit commands only.
    pub fn compose_flat(&self, rng: &mut dyn RngCore) -> Result<ComposedSample> {
        let history = HistoryWindow::new(self.config.max_context_len)?;
        let count = *self.flat_command_counts.sample(rng);
        let utterances = (0..count)
            .map(|_| random_kind(rng).spec().generate_explicit(&self.config, rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(assemble(history, utterances, FLAT_JOINER))
    }
}

fn random_kind(rng: &mut dyn RngCore) -> CommandKind {
    CommandKind::ALL[rng.gen_range(0..CommandKind::ALL.len())]
}

/// No reordering or merging across commands.
fn assemble(
    history: HistoryWindow,
    utterances: Vec<GeneratedUtterance>,
    joiner: &str,
) -> ComposedSample {
    let latest_input = utterances
        .iter()
        .map(|u| u.text.as_str())
        .collect::<Vec<_>>()
        .join(joiner);
    let mut response = Pipeline::default();
    for utterance in &utterances {
        response.extend(&utterance.pipeline);
    }
    ComposedSample {
        history,
        utterances,
        latest_input,
        response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::config::TurnRange;
    use crate::registry::Command;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn composer() -> UtteranceComposer {
        UtteranceComposer::new(GeneratorConfig::default()).unwrap()
    }

    #[test]
    fn test_no_elliptical_text_without_history() {
        let composer = composer();
        let mut rng = StdRng::seed_from_u64(21);
        let mut without_history = 0;
        for _ in 0..2000 {
            let sample = composer.compose_contextual(&mut rng).unwrap();
            if !sample.has_history() {
                without_history += 1;
                assert!(sample.utterances.iter().all(|u| !u.ambiguous));
            }
        }
        assert!((800..1200).contains(&without_history), "{without_history}");
    }

    #[test]
    fn test_history_uses_elliptical_forms_when_available() {
        let composer = composer();
        let mut rng = StdRng::seed_from_u64(22);
        for _ in 0..1000 {
            let sample = composer.compose_contextual(&mut rng).unwrap();
            for utterance in &sample.utterances {
                let elliptical_kind = utterance.kind().spec().has_ambiguous_form();
                assert_eq!(utterance.ambiguous, sample.has_history() && elliptical_kind);
            }
        }
    }

    #[test]
    fn test_response_is_reconstructable_from_commands() {
        let composer = composer();
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..500 {
            let sample = composer.compose_contextual(&mut rng).unwrap();
            assert!((1..=5).contains(&sample.utterances.len()));
            let rebuilt: Vec<String> = sample
                .utterances
                .iter()
                .map(|u| compile(&u.command).render())
                .collect();
            assert_eq!(sample.expected_response(), rebuilt.join("\n"));
            let texts: Vec<&str> = sample.utterances.iter().map(|u| u.text.as_str()).collect();
            assert_eq!(sample.latest_input, texts.join("; "));
        }
    }

    #[test]
    fn test_start_then_home() {
        let utterances = [Command::Start, Command::Home]
            .into_iter()
            .zip(["Start the massage robot", "Go to home"])
            .map(|(command, text)| GeneratedUtterance {
                command,
                text: text.to_string(),
                pipeline: compile(&command),
                ambiguous: false,
            })
            .collect();
        let sample = assemble(HistoryWindow::new(3).unwrap(), utterances, CONTEXT_JOINER);
        assert_eq!(sample.expected_response(), "start()\nhome()");
        assert_eq!(sample.latest_input, "Start the massage robot; Go to home");
    }

    #[test]
    fn test_history_never_exceeds_window() {
        let config = GeneratorConfig {
            max_context_len: 2,
            history_probability: 1.0,
            history_turns: TurnRange { min: 1, max: 6 },
            ..GeneratorConfig::default()
        };
        let composer = UtteranceComposer::new(config).unwrap();
        let mut rng = StdRng::seed_from_u64(24);
        for _ in 0..300 {
            let sample = composer.compose_contextual(&mut rng).unwrap();
            assert!(sample.history.len() <= 2);
            assert!(sample.has_history());
            let blocks = sample.history.render().matches("User: ").count();
            assert!(blocks <= 2);
        }
    }

    #[test]
    fn test_flat_samples() {
        let composer = composer();
        let mut rng = StdRng::seed_from_u64(25);
        for _ in 0..500 {
            let sample = composer.compose_flat(&mut rng).unwrap();
            assert!(!sample.has_history());
            assert!((1..=3).contains(&sample.utterances.len()));
            assert!(sample.utterances.iter().all(|u| !u.ambiguous));
            assert_eq!(
                sample.latest_input.matches("; then ").count(),
                sample.utterances.len() - 1
            );
        }
    }

    #[test]
    fn test_bad_weights_fail_fast() {
        let config = GeneratorConfig {
            command_count_weights: vec![(1, 0.5), (2, 0.2)],
            ..GeneratorConfig::default()
        };
        assert!(UtteranceComposer::new(config).is_err());
    }
}
