//! Template grammar
//!
//! Phrase lists and sentence templates per command type, placeholder
//! substitution, case randomization and the surface post-processing (trailing
//! punctuation, noise phrases) applied to generated text. Nothing here touches
//! the semantic intent: the pipeline is compiled from the drawn parameters,
//! never from the text.

use crate::error::{Result, SynthError};
use crate::registry::CommandKind;
use crate::sampling::{coin, pick};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Letter case applied to a noun or to the literal text of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStyle {
    Keep,
    Lower,
    Upper,
    /// First letter upper, the rest lower
    Capitalized,
}

impl CaseStyle {
    /// Uniform over lower / UPPER / Capitalized.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(0..3) {
            0 => CaseStyle::Lower,
            1 => CaseStyle::Upper,
            _ => CaseStyle::Capitalized,
        }
    }

    pub fn apply(&self, text: &str) -> String {
        self.apply_segment(text, true)
    }

    /// `at_start` is false for segments that do not open the sentence; those
    /// are lower-cased under `Capitalized`.
    fn apply_segment(&self, text: &str, at_start: bool) -> String {
        match self {
            CaseStyle::Keep => text.to_string(),
            CaseStyle::Lower => text.to_lowercase(),
            CaseStyle::Upper => text.to_uppercase(),
            CaseStyle::Capitalized if at_start => {
                let mut chars = text.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                    None => String::new(),
                }
            }
            CaseStyle::Capitalized => text.to_lowercase(),
        }
    }
}

/// Substitute `{name}` placeholders in `template`.
///
/// Literal text is re-cased with `case`; substituted values are inserted
/// verbatim. Unknown or unterminated placeholders fail.
pub fn render(
    command: CommandKind,
    template: &str,
    params: &[(&str, &str)],
    case: CaseStyle,
) -> Result<String> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;
    let mut at_start = true;

    while let Some(open) = rest.find('{') {
        let literal = &rest[..open];
        if !literal.is_empty() {
            out.push_str(&case.apply_segment(literal, at_start));
        }
        at_start = false;

        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| SynthError::UnterminatedPlaceholder {
                command,
                template: template.to_string(),
            })?;
        let name = &after[..close];
        let value = params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| SynthError::UnknownPlaceholder {
                command,
                template: template.to_string(),
                placeholder: name.to_string(),
            })?;
        out.push_str(value);
        rest = &after[close + 1..];
    }
    if !rest.is_empty() {
        out.push_str(&case.apply_segment(rest, at_start));
    }
    Ok(out)
}

/// Synonyms and templates for one phrasing of a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phrasebook {
    pub synonyms: Vec<String>,
    pub templates: Vec<String>,
}

impl Phrasebook {
    fn from_static(synonyms: &[&str], templates: &[&str]) -> Self {
        Self {
            synonyms: to_owned(synonyms),
            templates: to_owned(templates),
        }
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Every phrase list used by the generators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grammar {
    pub start: Phrasebook,
    pub stop: Phrasebook,
    pub home: Phrasebook,
    pub detect: Phrasebook,
    pub move_to_part: Phrasebook,
    pub move_to_coords: Phrasebook,
    pub automatic_massage: Phrasebook,
    pub increase_verbs: Vec<String>,
    pub decrease_verbs: Vec<String>,
    pub set_verbs: Vec<String>,
    pub force_nouns: Vec<String>,
    pub relative_templates: Vec<String>,
    pub absolute_templates: Vec<String>,
    /// Connective + bare force request, e.g. "After that, {verb} {noun} by {perc}%"
    pub elliptical_force_templates: Vec<String>,
    /// Verbs of the prefixed elliptical force form, used lower-case
    pub elliptical_increase_verbs: Vec<String>,
    pub elliptical_decrease_verbs: Vec<String>,
    /// Connective + bare body part, e.g. "Then {bp}"
    pub elliptical_massage_templates: Vec<String>,
    pub noise_phrases: Vec<String>,
    pub endings: Vec<String>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::standard()
    }
}

const ROBOT_TEMPLATES: [&str; 4] = [
    "{syn} the massage robot",
    "Could you {syn_lower} the massage robot",
    "Please {syn_lower} the massage robot",
    "I would like you to {syn_lower} the massage robot",
];

impl Grammar {
    /// The phrase lists the published datasets were generated with.
    pub fn standard() -> Self {
        Self {
            start: Phrasebook::from_static(
                &["Start", "Initiate", "Activate", "Power on"],
                &ROBOT_TEMPLATES,
            ),
            stop: Phrasebook::from_static(
                &["Shut down", "Turn off", "Deactivate", "Stop"],
                &ROBOT_TEMPLATES,
            ),
            home: Phrasebook::from_static(
                &[
                    "Return to the home position",
                    "Reset to the default position",
                    "Go to home",
                    "Move to home position",
                ],
                &["{syn}", "Please {syn_lower}", "Could you {syn_lower}"],
            ),
            detect: Phrasebook::from_static(
                &["Detect", "Identify", "Locate", "Find"],
                &[
                    "{syn} my {bp}",
                    "Can you {syn_lower} my {bp}?",
                    "Please {syn_lower} my {bp}",
                    "I need you to {syn_lower} my {bp}",
                ],
            ),
            move_to_part: Phrasebook::from_static(
                &["Move to position", "Navigate to", "Go to", "Proceed to"],
                &[
                    "{syn} to my {bp}",
                    "Could you {syn_lower} to my {bp}?",
                    "Please {syn_lower} to my {bp}",
                    "I need you to {syn_lower} to my {bp}",
                ],
            ),
            move_to_coords: Phrasebook::from_static(
                &["Move to position", "Navigate to", "Go to", "Proceed to"],
                &[
                    "{syn} {coords}",
                    "Could you {syn_lower} {coords}?",
                    "Please {syn_lower} {coords}",
                    "I need you to {syn_lower} {coords}",
                ],
            ),
            automatic_massage: Phrasebook::from_static(
                &[
                    "Start automatic massage",
                    "Begin auto massage",
                    "Initiate automatic massage",
                    "Activate auto massage",
                ],
                &[
                    "{syn} for my {bp}",
                    "Could you {syn_lower} for my {bp}?",
                    "Please {syn_lower} for my {bp}",
                    "I would like you to {syn_lower} for my {bp}",
                ],
            ),
            increase_verbs: to_owned(&["Increase", "Boost", "Raise", "Enhance"]),
            decrease_verbs: to_owned(&["Reduce", "Lower", "Decrease", "Diminish"]),
            set_verbs: to_owned(&["Set", "Adjust", "Configure", "Establish"]),
            force_nouns: to_owned(&["massage intensity", "massage pressure", "force level"]),
            relative_templates: to_owned(&[
                "{verb} {noun} by {perc}%",
                "Could you {verb_lower} {noun} by {perc}%",
                "Please {verb_lower} {noun} by {perc}%",
                "I would like you to {verb_lower} {noun} by {perc}%",
            ]),
            absolute_templates: to_owned(&[
                "{verb} {noun} to {perc}%",
                "Could you {verb_lower} {noun} to {perc}%",
                "Please {verb_lower} {noun} to {perc}%",
                "I want you to {verb_lower} {noun} to {perc}%",
            ]),
            elliptical_force_templates: to_owned(&[
                "Then {verb} {noun} by {perc}%",
                "After that, {verb} {noun} by {perc}%",
                "Also, {verb} {noun} by {perc}%",
            ]),
            elliptical_increase_verbs: to_owned(&["increase"]),
            elliptical_decrease_verbs: to_owned(&["reduce"]),
            elliptical_massage_templates: to_owned(&[
                "Then {bp}",
                "After that, {bp}",
                "Also {bp}",
                "Next {bp}",
                "And {bp}",
            ]),
            noise_phrases: to_owned(&[
                " and also check the battery level",
                " and then report the temperature",
                " and verify the system status",
                " and log the current time",
                " and update diagnostics",
            ]),
            endings: to_owned(&[".", "!", "..."]),
        }
    }

    /// Fail fast on empty lists and on templates whose placeholders the
    /// generators never supply.
    pub fn validate(&self) -> Result<()> {
        use CommandKind::*;

        const SYN: &[&str] = &["syn", "syn_lower"];
        const SYN_BP: &[&str] = &["syn", "syn_lower", "bp"];
        const SYN_COORDS: &[&str] = &["syn", "syn_lower", "coords"];
        const FORCE: &[&str] = &["verb", "verb_lower", "noun", "perc"];
        const BP: &[&str] = &["bp"];

        let lists: [(CommandKind, &'static str, &Vec<String>); 24] = [
            (Start, "synonym", &self.start.synonyms),
            (Start, "template", &self.start.templates),
            (Stop, "synonym", &self.stop.synonyms),
            (Stop, "template", &self.stop.templates),
            (Home, "synonym", &self.home.synonyms),
            (Home, "template", &self.home.templates),
            (Detect, "synonym", &self.detect.synonyms),
            (Detect, "template", &self.detect.templates),
            (Move, "synonym", &self.move_to_part.synonyms),
            (Move, "template", &self.move_to_part.templates),
            (Move, "coordinate synonym", &self.move_to_coords.synonyms),
            (Move, "coordinate template", &self.move_to_coords.templates),
            (AutomaticMassage, "synonym", &self.automatic_massage.synonyms),
            (AutomaticMassage, "template", &self.automatic_massage.templates),
            (ChangeForceRelative, "increase verb", &self.increase_verbs),
            (ChangeForceRelative, "decrease verb", &self.decrease_verbs),
            (ChangeForceAbsolute, "set verb", &self.set_verbs),
            (ChangeForceRelative, "force noun", &self.force_nouns),
            (ChangeForceRelative, "template", &self.relative_templates),
            (ChangeForceAbsolute, "template", &self.absolute_templates),
            (ChangeForceRelative, "elliptical template", &self.elliptical_force_templates),
            (ChangeForceRelative, "elliptical increase verb", &self.elliptical_increase_verbs),
            (ChangeForceRelative, "elliptical decrease verb", &self.elliptical_decrease_verbs),
            (AutomaticMassage, "elliptical template", &self.elliptical_massage_templates),
        ];
        for (command, list, items) in lists {
            if items.is_empty() {
                return Err(SynthError::EmptyList { command, list });
            }
        }
        // Shared by every command
        for (list, items) in [("ending", &self.endings), ("noise phrase", &self.noise_phrases)] {
            if items.is_empty() {
                return Err(SynthError::Config(format!("grammar: empty {list} list")));
            }
        }

        let template_sets: [(CommandKind, &Vec<String>, &[&str]); 10] = [
            (Start, &self.start.templates, SYN),
            (Stop, &self.stop.templates, SYN),
            (Home, &self.home.templates, SYN),
            (Detect, &self.detect.templates, SYN_BP),
            (Move, &self.move_to_part.templates, SYN_BP),
            (Move, &self.move_to_coords.templates, SYN_COORDS),
            (AutomaticMassage, &self.automatic_massage.templates, SYN_BP),
            (ChangeForceRelative, &self.relative_templates, FORCE),
            (ChangeForceAbsolute, &self.absolute_templates, FORCE),
            (ChangeForceRelative, &self.elliptical_force_templates, FORCE),
        ];
        for (command, templates, names) in template_sets {
            check_templates(command, templates, names)?;
        }
        check_templates(AutomaticMassage, &self.elliptical_massage_templates, BP)
    }

    /// Strip trailing `.`, `!`, `?`; then maybe append one of the endings.
    pub fn punctuate<R: Rng + ?Sized>(
        &self,
        command: CommandKind,
        text: &str,
        probability: f64,
        rng: &mut R,
    ) -> Result<String> {
        let mut out = text.trim_end_matches(['.', '!', '?']).to_string();
        if coin(rng, probability) {
            out.push_str(pick(&self.endings, rng, command, "ending")?);
        }
        Ok(out)
    }

    /// Maybe append an out-of-capability request.
    pub fn add_noise<R: Rng + ?Sized>(
        &self,
        command: CommandKind,
        text: String,
        probability: f64,
        rng: &mut R,
    ) -> Result<String> {
        if !coin(rng, probability) {
            return Ok(text);
        }
        let noise = pick(&self.noise_phrases, rng, command, "noise phrase")?;
        Ok(text + noise)
    }
}

fn check_templates(command: CommandKind, templates: &[String], names: &[&str]) -> Result<()> {
    let params: Vec<(&str, &str)> = names.iter().map(|name| (*name, "")).collect();
    for template in templates {
        render(command, template, &params, CaseStyle::Keep)?;
    }
    Ok(())
}
