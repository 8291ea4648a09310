//! Command pipeline synthesis for the massage robot
//!
//! This crate generates paired training records: a natural-language
//! instruction and the ordered robot primitive calls that carry it out.
//! Text is produced from drawn semantic parameters, never parsed, so the
//! expected pipeline is always exact.

mod compiler;
mod composer;
mod config;
mod dataset;
mod error;
mod grammar;
mod history;
mod primitives;
mod record;
mod registry;
mod sampling;

pub use compiler::compile;
pub use composer::{ComposedSample, UtteranceComposer, CONTEXT_JOINER, FLAT_JOINER};
pub use config::{load_config_file, GeneratorConfig, TurnRange};
pub use dataset::{DatasetGenerator, DatasetVariant};
pub use error::{Result, SynthError};
pub use grammar::{render, CaseStyle, Grammar, Phrasebook};
pub use history::{ConversationTurn, HistoryWindow, ASSISTANT_ROLE, USER_ROLE};
pub use primitives::{
    BodyPart, Coords, ForceChange, ForceDirection, MoveTarget, Pipeline, Primitive,
    RelativeForce, COORD_LIMIT,
};
pub use record::{
    emit_contextual, emit_flat, DatasetRecord, FlatRecord, Record, CAPABILITIES,
    CONTEXT_INSTRUCTION, FLAT_INSTRUCTION,
};
pub use registry::{
    Command, CommandKind, CommandSpec, GeneratedUtterance, GeneratorFn, MoveGoal,
    ABSOLUTE_FORCE_RANGE, RELATIVE_PERCENT_RANGE, REGISTRY,
};
pub use sampling::{sample_seed, WeightedTable};

/// Initialize the synthesis engine
pub fn init() -> Result<()> {
    tracing::info!("Initializing pipeline synthesis engine");
    Grammar::standard().validate()
}

/// Create a dataset generator with the default configuration
pub fn create_generator() -> Result<DatasetGenerator> {
    DatasetGenerator::new(GeneratorConfig::default())
}

/// Compile a single command into its primitive call lines
pub fn compile_lines(command: &Command) -> Vec<String> {
    compile(command).lines()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_examples() {
        assert_eq!(
            compile_lines(&Command::Move(MoveGoal::BodyPart(BodyPart::Neck))),
            vec![
                "[x, y, z] = detect_body_part('neck')",
                "move_to([x, y, z])"
            ]
        );

        let decrease = RelativeForce::new(30, ForceDirection::Decrease).unwrap();
        assert_eq!(
            compile_lines(&Command::ChangeForce(ForceChange::Relative(decrease))),
            vec!["change_force('relative', -0.3)"]
        );
    }

    #[test]
    fn test_default_generator() {
        init().unwrap();
        let generator = create_generator().unwrap();
        let records = generator
            .generate(DatasetVariant::Contextual, 5, 0, 1)
            .unwrap();
        assert_eq!(records.len(), 5);
    }
}
