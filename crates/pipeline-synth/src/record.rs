//! Dataset records and the fixed instruction texts they carry

use crate::composer::ComposedSample;
use serde::{Deserialize, Serialize};

macro_rules! capabilities {
    () => {
        "Capabilities:
    start() → Initializes the robot.
    stop() → Stops the robot.
    home() → Moves the robot to the home position.
    [x, y, z] = detect_body_part(part_name) → Detects the specified body part and returns the coordinates.
    move_to([x, y, z]) → Moves the robot to the specified coordinates.
    change_force(mode, value) → Adjusts the massage force based on the specified mode:
        - If mode is 'absolute', then value is any real number, setting the force directly.
        - If mode is 'relative', then value is between -1 and 1, modifying the current force F as:
          F_new = (1 + value) * F
    automatic_massage(part_name) → Automatically massages the specified body part.
"
    };
}

/// Primitive documentation shared by both instruction texts
pub const CAPABILITIES: &str = capabilities!();

/// Prompt template of contextual records. The three `{}` slots take the
/// history, the latest input and the response at training time.
pub const CONTEXT_INSTRUCTION: &str = concat!(
    "Below is a conversation that provides instructions for operating a massage robot. ",
    "The conversation history provides context to help generate an executable Python pipeline using only the provided functions.\n",
    "Before answering, carefully consider the conversation history to infer any missing actions.\n",
    "\n",
    "### Instruction:\n",
    "You are provided with high-level instructions for operating a massage robot. ",
    "Create an executable pipeline in Python that structures task execution through a sub-task pipeline. ",
    "This pipeline should be composed exclusively of the functions listed below in the Capabilities section, ",
    "arranged in a logical and correct order so that it can be directly executed. ",
    "Your response should only consist of the pipeline without additional information.\n",
    "\n",
    capabilities!(),
    "\n",
    "### Conversation History:\n",
    "{}\n",
    "### Latest User Input:\n",
    "{}\n",
    "\n",
    "### Response:\n",
    "{}"
);

/// Instruction of flat records
pub const FLAT_INSTRUCTION: &str = concat!(
    "You are provided with high-level instructions for operating a massage robot. ",
    "Create an executable plan in Python that structures task execution through a sub-task pipeline. ",
    "This pipeline should be composed exclusively of the functions listed below in the Capabilities section, ",
    "arranged in a logical and correct order so that it can be directly executed. ",
    "Your response should only consist of the pipeline without additional information.\n",
    "\n",
    capabilities!()
);

/// Record of the contextual dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    instruction: String,
    conversation_history: String,
    latest_user_input: String,
    response: String,
}

impl DatasetRecord {
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn conversation_history(&self) -> &str {
        &self.conversation_history
    }

    pub fn latest_user_input(&self) -> &str {
        &self.latest_user_input
    }

    pub fn response(&self) -> &str {
        &self.response
    }
}

/// Record of the flat (history-free) dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRecord {
    instruction: String,
    input: String,
    response: Vec<String>,
}

impl FlatRecord {
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn response(&self) -> &[String] {
        &self.response
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    Contextual(DatasetRecord),
    Flat(FlatRecord),
}

pub fn emit_contextual(sample: &ComposedSample) -> DatasetRecord {
    DatasetRecord {
        instruction: CONTEXT_INSTRUCTION.to_string(),
        conversation_history: sample.history.render(),
        latest_user_input: sample.latest_input.clone(),
        response: sample.expected_response(),
    }
}

pub fn emit_flat(sample: &ComposedSample) -> FlatRecord {
    FlatRecord {
        instruction: FLAT_INSTRUCTION.to_string(),
        input: sample.latest_input.clone(),
        response: sample.response.lines(),
    }
}
