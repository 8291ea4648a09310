//! Command specification registry
//!
//! One entry per command type: an explicit generator, always available, and
//! an optional elliptical generator whose text is only resolvable against
//! earlier turns. Dispatch is a lookup in [`REGISTRY`] by [`CommandKind`].

use crate::compiler::compile;
use crate::config::GeneratorConfig;
use crate::error::{Result, SynthError};
use crate::grammar::{render, CaseStyle, Phrasebook};
use crate::primitives::{
    BodyPart, Coords, ForceChange, ForceDirection, Pipeline, RelativeForce,
};
use crate::sampling::{coin, pick};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Drawn percentage range of relative force changes.
pub const RELATIVE_PERCENT_RANGE: std::ops::RangeInclusive<u8> = 10..=50;
/// Drawn range of absolute force values.
pub const ABSOLUTE_FORCE_RANGE: std::ops::RangeInclusive<f64> = 0.1..=1.0;

/// Closed set of command types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Start,
    Stop,
    Home,
    Detect,
    Move,
    ChangeForceRelative,
    ChangeForceAbsolute,
    AutomaticMassage,
}

impl CommandKind {
    pub const ALL: [CommandKind; 8] = [
        CommandKind::Start,
        CommandKind::Stop,
        CommandKind::Home,
        CommandKind::Detect,
        CommandKind::Move,
        CommandKind::ChangeForceRelative,
        CommandKind::ChangeForceAbsolute,
        CommandKind::AutomaticMassage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Start => "start",
            CommandKind::Stop => "stop",
            CommandKind::Home => "home",
            CommandKind::Detect => "detect",
            CommandKind::Move => "move",
            CommandKind::ChangeForceRelative => "change_force_relative",
            CommandKind::ChangeForceAbsolute => "change_force_absolute",
            CommandKind::AutomaticMassage => "automatic_massage",
        }
    }

    pub fn spec(&self) -> &'static CommandSpec {
        // REGISTRY is ordered like ALL
        &REGISTRY[*self as usize]
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandKind {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| SynthError::Config(format!("unknown command type: {s}")))
    }
}

/// Target of a move command
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MoveGoal {
    BodyPart(BodyPart),
    Coords(Coords),
}

/// Semantic intent of one command, with all parameters drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Start,
    Stop,
    Home,
    Detect(BodyPart),
    Move(MoveGoal),
    ChangeForce(ForceChange),
    AutomaticMassage(BodyPart),
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Start => CommandKind::Start,
            Command::Stop => CommandKind::Stop,
            Command::Home => CommandKind::Home,
            Command::Detect(_) => CommandKind::Detect,
            Command::Move(_) => CommandKind::Move,
            Command::ChangeForce(ForceChange::Relative(_)) => CommandKind::ChangeForceRelative,
            Command::ChangeForce(ForceChange::Absolute(_)) => CommandKind::ChangeForceAbsolute,
            Command::AutomaticMassage(_) => CommandKind::AutomaticMassage,
        }
    }
}

/// Text for one command together with its pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedUtterance {
    pub command: Command,
    pub text: String,
    pub pipeline: Pipeline,
    /// Produced by an elliptical generator
    pub ambiguous: bool,
}

impl GeneratedUtterance {
    fn explicit(command: Command, text: String) -> Self {
        Self {
            pipeline: compile(&command),
            command,
            text,
            ambiguous: false,
        }
    }

    fn elliptical(command: Command, text: String) -> Self {
        Self {
            ambiguous: true,
            ..Self::explicit(command, text)
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.command.kind()
    }
}

pub type GeneratorFn = fn(&GeneratorConfig, &mut dyn RngCore) -> Result<GeneratedUtterance>;

/// Registry entry: at most two generators per command type
pub struct CommandSpec {
    pub kind: CommandKind,
    pub explicit: GeneratorFn,
    pub ambiguous: Option<GeneratorFn>,
}

impl CommandSpec {
    pub fn has_ambiguous_form(&self) -> bool {
        self.ambiguous.is_some()
    }

    pub fn generate_explicit(
        &self,
        config: &GeneratorConfig,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedUtterance> {
        (self.explicit)(config, rng)
    }

    /// The caller asserts whether conversation history exists. Resolvability
    /// of the elided subject against that history is not checked.
    pub fn generate_ambiguous(
        &self,
        config: &GeneratorConfig,
        has_history: bool,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedUtterance> {
        if !has_history {
            return Err(SynthError::AmbiguousWithoutHistory { command: self.kind });
        }
        let generate = self
            .ambiguous
            .ok_or(SynthError::NoAmbiguousForm { command: self.kind })?;
        generate(config, rng)
    }
}

pub static REGISTRY: [CommandSpec; 8] = [
    CommandSpec {
        kind: CommandKind::Start,
        explicit: explicit_start,
        ambiguous: None,
    },
    CommandSpec {
        kind: CommandKind::Stop,
        explicit: explicit_stop,
        ambiguous: None,
    },
    CommandSpec {
        kind: CommandKind::Home,
        explicit: explicit_home,
        ambiguous: None,
    },
    CommandSpec {
        kind: CommandKind::Detect,
        explicit: explicit_detect,
        ambiguous: None,
    },
    CommandSpec {
        kind: CommandKind::Move,
        explicit: explicit_move,
        ambiguous: None,
    },
    CommandSpec {
        kind: CommandKind::ChangeForceRelative,
        explicit: explicit_relative_force,
        ambiguous: Some(elliptical_relative_force),
    },
    CommandSpec {
        kind: CommandKind::ChangeForceAbsolute,
        explicit: explicit_absolute_force,
        ambiguous: None,
    },
    CommandSpec {
        kind: CommandKind::AutomaticMassage,
        explicit: explicit_automatic_massage,
        ambiguous: Some(elliptical_automatic_massage),
    },
];

/// Verb synonym + template draw, then punctuation and noise.
fn phrase(
    kind: CommandKind,
    book: &Phrasebook,
    extra: &[(&str, &str)],
    config: &GeneratorConfig,
    rng: &mut dyn RngCore,
) -> Result<String> {
    let syn = pick(&book.synonyms, rng, kind, "synonym")?;
    let template = pick(&book.templates, rng, kind, "template")?;
    let syn_lower = syn.to_lowercase();

    let mut params = vec![("syn", syn.as_str()), ("syn_lower", syn_lower.as_str())];
    params.extend_from_slice(extra);
    let text = render(kind, template, &params, CaseStyle::Keep)?;
    finish_explicit(kind, &text, config, rng)
}

fn finish_explicit(
    kind: CommandKind,
    text: &str,
    config: &GeneratorConfig,
    rng: &mut dyn RngCore,
) -> Result<String> {
    let text = config
        .grammar
        .punctuate(kind, text, config.punctuation_probability, rng)?;
    config
        .grammar
        .add_noise(kind, text, config.noise_probability, rng)
}

fn explicit_start(config: &GeneratorConfig, rng: &mut dyn RngCore) -> Result<GeneratedUtterance> {
    let text = phrase(CommandKind::Start, &config.grammar.start, &[], config, rng)?;
    Ok(GeneratedUtterance::explicit(Command::Start, text))
}

fn explicit_stop(config: &GeneratorConfig, rng: &mut dyn RngCore) -> Result<GeneratedUtterance> {
    let text = phrase(CommandKind::Stop, &config.grammar.stop, &[], config, rng)?;
    Ok(GeneratedUtterance::explicit(Command::Stop, text))
}

fn explicit_home(config: &GeneratorConfig, rng: &mut dyn RngCore) -> Result<GeneratedUtterance> {
    let text = phrase(CommandKind::Home, &config.grammar.home, &[], config, rng)?;
    Ok(GeneratedUtterance::explicit(Command::Home, text))
}

fn explicit_detect(config: &GeneratorConfig, rng: &mut dyn RngCore) -> Result<GeneratedUtterance> {
    let part = BodyPart::random(rng);
    let bp = CaseStyle::random(rng).apply(part.as_str());
    let text = phrase(
        CommandKind::Detect,
        &config.grammar.detect,
        &[("bp", bp.as_str())],
        config,
        rng,
    )?;
    Ok(GeneratedUtterance::explicit(Command::Detect(part), text))
}

fn explicit_move(config: &GeneratorConfig, rng: &mut dyn RngCore) -> Result<GeneratedUtterance> {
    let (goal, text) = if coin(rng, config.move_body_part_probability) {
        let part = BodyPart::random(rng);
        let bp = CaseStyle::random(rng).apply(part.as_str());
        let text = phrase(
            CommandKind::Move,
            &config.grammar.move_to_part,
            &[("bp", bp.as_str())],
            config,
            rng,
        )?;
        (MoveGoal::BodyPart(part), text)
    } else {
        let coords = Coords::random(rng);
        let shown = coords.to_string();
        let text = phrase(
            CommandKind::Move,
            &config.grammar.move_to_coords,
            &[("coords", shown.as_str())],
            config,
            rng,
        )?;
        (MoveGoal::Coords(coords), text)
    };
    Ok(GeneratedUtterance::explicit(Command::Move(goal), text))
}

fn force_verbs(config: &GeneratorConfig, direction: ForceDirection) -> &[String] {
    match direction {
        ForceDirection::Increase => &config.grammar.increase_verbs,
        ForceDirection::Decrease => &config.grammar.decrease_verbs,
    }
}

fn random_direction(rng: &mut dyn RngCore) -> ForceDirection {
    if coin(rng, 0.5) {
        ForceDirection::Decrease
    } else {
        ForceDirection::Increase
    }
}

fn force_phrase(
    kind: CommandKind,
    verbs: &[String],
    templates: &[String],
    percent: &str,
    case: CaseStyle,
    config: &GeneratorConfig,
    rng: &mut dyn RngCore,
) -> Result<String> {
    let verb = pick(verbs, rng, kind, "verb")?;
    let noun = pick(&config.grammar.force_nouns, rng, kind, "force noun")?;
    let template = pick(templates, rng, kind, "template")?;
    let verb_lower = verb.to_lowercase();
    let (verb, verb_lower) = match case {
        // Elliptical phrasings put the verb mid-sentence
        CaseStyle::Keep => (verb.as_str(), verb_lower.as_str()),
        _ => (verb_lower.as_str(), verb_lower.as_str()),
    };
    render(
        kind,
        template,
        &[
            ("verb", verb),
            ("verb_lower", verb_lower),
            ("noun", noun.as_str()),
            ("perc", percent),
        ],
        case,
    )
}

fn explicit_relative_force(
    config: &GeneratorConfig,
    rng: &mut dyn RngCore,
) -> Result<GeneratedUtterance> {
    let kind = CommandKind::ChangeForceRelative;
    let percent = rng.gen_range(RELATIVE_PERCENT_RANGE);
    let direction = random_direction(rng);
    let change = RelativeForce::new(percent, direction)?;
    let text = force_phrase(
        kind,
        force_verbs(config, direction),
        &config.grammar.relative_templates,
        &percent.to_string(),
        CaseStyle::Keep,
        config,
        rng,
    )?;
    let text = finish_explicit(kind, &text, config, rng)?;
    Ok(GeneratedUtterance::explicit(
        Command::ChangeForce(ForceChange::Relative(change)),
        text,
    ))
}

fn explicit_absolute_force(
    config: &GeneratorConfig,
    rng: &mut dyn RngCore,
) -> Result<GeneratedUtterance> {
    let kind = CommandKind::ChangeForceAbsolute;
    let value: f64 = rng.gen_range(ABSOLUTE_FORCE_RANGE);
    // text shows the truncated percentage, the pipeline the 2-decimal value
    let percent = (value * 100.0) as u32;
    let text = force_phrase(
        kind,
        &config.grammar.set_verbs,
        &config.grammar.absolute_templates,
        &percent.to_string(),
        CaseStyle::Keep,
        config,
        rng,
    )?;
    let text = finish_explicit(kind, &text, config, rng)?;
    Ok(GeneratedUtterance::explicit(
        Command::ChangeForce(ForceChange::Absolute(value)),
        text,
    ))
}

fn explicit_automatic_massage(
    config: &GeneratorConfig,
    rng: &mut dyn RngCore,
) -> Result<GeneratedUtterance> {
    let part = BodyPart::random(rng);
    let bp = CaseStyle::random(rng).apply(part.as_str());
    let text = phrase(
        CommandKind::AutomaticMassage,
        &config.grammar.automatic_massage,
        &[("bp", bp.as_str())],
        config,
        rng,
    )?;
    Ok(GeneratedUtterance::explicit(Command::AutomaticMassage(part), text))
}

/// Elliptical forms only get the punctuation pass; a standalone form stays a
/// single bare word.
fn finish_elliptical(
    kind: CommandKind,
    text: &str,
    config: &GeneratorConfig,
    rng: &mut dyn RngCore,
) -> Result<String> {
    config
        .grammar
        .punctuate(kind, text, config.punctuation_probability, rng)
}

fn elliptical_relative_force(
    config: &GeneratorConfig,
    rng: &mut dyn RngCore,
) -> Result<GeneratedUtterance> {
    let kind = CommandKind::ChangeForceRelative;
    let (change, text) = if coin(rng, config.elliptical_prefixed_probability) {
        // "After that, reduce force level by 20%"
        let percent = rng.gen_range(RELATIVE_PERCENT_RANGE);
        let direction = random_direction(rng);
        let case = CaseStyle::random(rng);
        let verbs = match direction {
            ForceDirection::Increase => &config.grammar.elliptical_increase_verbs,
            ForceDirection::Decrease => &config.grammar.elliptical_decrease_verbs,
        };
        let text = force_phrase(
            kind,
            verbs,
            &config.grammar.elliptical_force_templates,
            &percent.to_string(),
            case,
            config,
            rng,
        )?;
        (RelativeForce::new(percent, direction)?, text)
    } else {
        // "boost": direction word alone, default magnitude
        let direction = random_direction(rng);
        let word = pick(force_verbs(config, direction), rng, kind, "verb")?.to_lowercase();
        (
            RelativeForce::new(config.standalone_force_percent, direction)?,
            word,
        )
    };
    let text = finish_elliptical(kind, &text, config, rng)?;
    Ok(GeneratedUtterance::elliptical(
        Command::ChangeForce(ForceChange::Relative(change)),
        text,
    ))
}

fn elliptical_automatic_massage(
    config: &GeneratorConfig,
    rng: &mut dyn RngCore,
) -> Result<GeneratedUtterance> {
    let kind = CommandKind::AutomaticMassage;
    let part = BodyPart::random_elliptical(rng);
    let text = if coin(rng, config.elliptical_prefixed_probability) {
        // "Then neck"
        let template = pick(
            &config.grammar.elliptical_massage_templates,
            rng,
            kind,
            "elliptical template",
        )?;
        let case = CaseStyle::random(rng);
        render(kind, template, &[("bp", part.as_str())], case)?
    } else {
        // "SHOULDERS"
        CaseStyle::random(rng).apply(part.as_str())
    };
    let text = finish_elliptical(kind, &text, config, rng)?;
    Ok(GeneratedUtterance::elliptical(Command::AutomaticMassage(part), text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{MoveTarget, Primitive};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn draws(kind: CommandKind, n: usize) -> Vec<GeneratedUtterance> {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(kind as u64 + 100);
        (0..n)
            .map(|_| kind.spec().generate_explicit(&config, &mut rng).unwrap())
            .collect()
    }

    fn elliptical_draws(kind: CommandKind, n: usize) -> Vec<GeneratedUtterance> {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(kind as u64 + 200);
        (0..n)
            .map(|_| {
                kind.spec()
                    .generate_ambiguous(&config, true, &mut rng)
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_registry_order_matches_kinds() {
        for kind in CommandKind::ALL {
            assert_eq!(kind.spec().kind, kind);
        }
        let with_ambiguous: Vec<CommandKind> = REGISTRY
            .iter()
            .filter(|spec| spec.has_ambiguous_form())
            .map(|spec| spec.kind)
            .collect();
        assert_eq!(
            with_ambiguous,
            vec![CommandKind::ChangeForceRelative, CommandKind::AutomaticMassage]
        );
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in CommandKind::ALL {
            assert_eq!(kind.as_str().parse::<CommandKind>().unwrap(), kind);
        }
        assert_eq!(
            "change-force-relative".parse::<CommandKind>().unwrap(),
            CommandKind::ChangeForceRelative
        );
    }

    #[test]
    fn test_explicit_output_matches_compiler() {
        for kind in CommandKind::ALL {
            for utterance in draws(kind, 200) {
                assert_eq!(utterance.kind(), kind);
                assert!(!utterance.ambiguous);
                assert_eq!(utterance.pipeline, compile(&utterance.command));
                assert!(!utterance.text.is_empty());
            }
        }
    }

    #[test]
    fn test_drawn_ranges_cannot_leave_bounds() {
        // percent ≤ 50 keeps |value| ≤ 0.5, well inside the [-1, 1] contract
        assert!(*RELATIVE_PERCENT_RANGE.start() >= 1);
        assert!(*RELATIVE_PERCENT_RANGE.end() <= 50);
        assert!(RelativeForce::new(*RELATIVE_PERCENT_RANGE.end(), ForceDirection::Decrease).is_ok());
        assert!(*ABSOLUTE_FORCE_RANGE.start() >= 0.1);
        assert!(*ABSOLUTE_FORCE_RANGE.end() <= 1.0);
        assert!(RELATIVE_PERCENT_RANGE.contains(&GeneratorConfig::default().standalone_force_percent));
    }

    #[test]
    fn test_relative_force_stays_within_half() {
        let mut all = draws(CommandKind::ChangeForceRelative, 2000);
        all.extend(elliptical_draws(CommandKind::ChangeForceRelative, 2000));
        for utterance in all {
            let Command::ChangeForce(ForceChange::Relative(rel)) = utterance.command else {
                panic!("unexpected command {:?}", utterance.command);
            };
            assert!((-0.5..=0.5).contains(&rel.value()), "{}", rel.value());
            assert!(rel.percent() >= 10);
        }
    }

    #[test]
    fn test_absolute_force_bounds_and_format() {
        for utterance in draws(CommandKind::ChangeForceAbsolute, 2000) {
            let Command::ChangeForce(ForceChange::Absolute(value)) = utterance.command else {
                panic!("unexpected command {:?}", utterance.command);
            };
            assert!((0.1..=1.0).contains(&value), "{value}");
            let line = utterance.pipeline.render();
            let number = line
                .strip_prefix("change_force('absolute', ")
                .and_then(|rest| rest.strip_suffix(')'))
                .unwrap();
            let decimals = number.split('.').nth(1).unwrap();
            assert_eq!(decimals.len(), 2, "{line}");
        }
    }

    #[test]
    fn test_move_coordinates_in_bounds() {
        let mut literal = 0;
        for utterance in draws(CommandKind::Move, 3000) {
            for step in utterance.pipeline.steps() {
                if let Primitive::MoveTo(MoveTarget::Literal(coords)) = step {
                    literal += 1;
                    assert!(coords.axes().iter().all(|v| (-20..=20).contains(v)));
                    assert!(utterance.text.contains(&coords.to_string()));
                }
            }
        }
        // roughly 30% of moves target coordinates
        assert!((600..1200).contains(&literal), "{literal}");
    }

    #[test]
    fn test_automatic_massage_order_and_part() {
        let mut all = draws(CommandKind::AutomaticMassage, 500);
        all.extend(elliptical_draws(CommandKind::AutomaticMassage, 500));
        for utterance in all {
            let Command::AutomaticMassage(part) = utterance.command else {
                panic!("unexpected command {:?}", utterance.command);
            };
            assert_eq!(
                utterance.pipeline.steps(),
                &[
                    Primitive::DetectBodyPart(part),
                    Primitive::MoveTo(MoveTarget::Detected),
                    Primitive::AutomaticMassage(part),
                ]
            );
        }
    }

    #[test]
    fn test_body_part_appears_in_text_with_random_case() {
        for utterance in draws(CommandKind::Detect, 300) {
            let Command::Detect(part) = utterance.command else {
                panic!("unexpected command {:?}", utterance.command);
            };
            assert!(utterance.text.to_lowercase().contains(part.as_str()));
        }
    }

    #[test]
    fn test_standalone_forms() {
        let config = GeneratorConfig::default();
        let mut standalone_force = 0;
        for utterance in elliptical_draws(CommandKind::ChangeForceRelative, 500) {
            assert!(utterance.ambiguous);
            let word = utterance.text.trim_end_matches(['.', '!']);
            if !word.contains(' ') {
                standalone_force += 1;
                let Command::ChangeForce(ForceChange::Relative(rel)) = utterance.command else {
                    panic!("unexpected command {:?}", utterance.command);
                };
                assert_eq!(rel.value().abs(), 0.2);
                let verbs = force_verbs(&config, rel.direction());
                assert!(verbs.iter().any(|v| v.to_lowercase() == word), "{word}");
            }
        }
        assert!(standalone_force > 150, "{standalone_force}");

        for utterance in elliptical_draws(CommandKind::AutomaticMassage, 500) {
            let Command::AutomaticMassage(part) = utterance.command else {
                panic!("unexpected command {:?}", utterance.command);
            };
            assert!(BodyPart::ELLIPTICAL.contains(&part));
            assert!(utterance.text.to_lowercase().contains(part.as_str()));
        }
    }

    #[test]
    fn test_prefixed_elliptical_force_verbs() {
        let config = GeneratorConfig {
            elliptical_prefixed_probability: 1.0,
            ..GeneratorConfig::default()
        };
        let synonyms: Vec<String> = config
            .grammar
            .increase_verbs
            .iter()
            .chain(&config.grammar.decrease_verbs)
            .map(|v| v.to_lowercase())
            .collect();
        let mut rng = StdRng::seed_from_u64(41);
        for _ in 0..400 {
            let utterance = CommandKind::ChangeForceRelative
                .spec()
                .generate_ambiguous(&config, true, &mut rng)
                .unwrap();
            let Command::ChangeForce(ForceChange::Relative(rel)) = utterance.command else {
                panic!("unexpected command {:?}", utterance.command);
            };
            let text = utterance.text.to_lowercase();
            let verbs: Vec<&str> = text
                .split([' ', ','])
                .filter(|w| synonyms.iter().any(|s| s == w))
                .collect();
            let expected = match rel.direction() {
                ForceDirection::Increase => "increase",
                ForceDirection::Decrease => "reduce",
            };
            assert_eq!(verbs, vec![expected], "{}", utterance.text);
        }
    }

    #[test]
    fn test_ambiguous_gating() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        let err = CommandKind::AutomaticMassage
            .spec()
            .generate_ambiguous(&config, false, &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            SynthError::AmbiguousWithoutHistory { command: CommandKind::AutomaticMassage }
        ));
        let err = CommandKind::Home
            .spec()
            .generate_ambiguous(&config, true, &mut rng)
            .unwrap_err();
        assert!(matches!(err, SynthError::NoAmbiguousForm { command: CommandKind::Home }));
    }

    #[test]
    fn test_empty_phrase_list_names_command() {
        let mut config = GeneratorConfig::default();
        config.grammar.stop.templates.clear();
        let mut rng = StdRng::seed_from_u64(1);
        let err = CommandKind::Stop
            .spec()
            .generate_explicit(&config, &mut rng)
            .unwrap_err();
        assert_eq!(err.to_string(), "stop: empty template list");
    }
}
