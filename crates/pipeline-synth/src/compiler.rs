//! Command → primitive pipeline compiler
//!
//! Pure and deterministic: the pipeline depends only on the command's own
//! parameters, never on robot state or on the text it was phrased with.

use crate::primitives::{BodyPart, MoveTarget, Pipeline, Primitive};
use crate::registry::{Command, MoveGoal};

pub fn compile(command: &Command) -> Pipeline {
    let steps = match command {
        Command::Start => vec![Primitive::Start],
        Command::Stop => vec![Primitive::Stop],
        Command::Home => vec![Primitive::Home],
        Command::Detect(part) => vec![Primitive::DetectBodyPart(*part)],
        // Body parts must be located before the robot can move there;
        // literal coordinates are already known.
        Command::Move(MoveGoal::BodyPart(part)) => locate_and_reach(*part),
        Command::Move(MoveGoal::Coords(coords)) => {
            vec![Primitive::MoveTo(MoveTarget::Literal(*coords))]
        }
        Command::ChangeForce(change) => vec![Primitive::ChangeForce(*change)],
        Command::AutomaticMassage(part) => {
            let mut steps = locate_and_reach(*part);
            steps.push(Primitive::AutomaticMassage(*part));
            steps
        }
    };
    Pipeline::new(steps)
}

fn locate_and_reach(part: BodyPart) -> Vec<Primitive> {
    vec![
        Primitive::DetectBodyPart(part),
        Primitive::MoveTo(MoveTarget::Detected),
    ]
}
