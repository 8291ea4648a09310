//! Bounded conversation history

use crate::error::{Result, SynthError};
use crate::primitives::Pipeline;
use crate::registry::GeneratedUtterance;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const USER_ROLE: &str = "User: ";
pub const ASSISTANT_ROLE: &str = "Assistant: ";

/// A committed user instruction and the pipeline answering it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user: String,
    pub assistant: Pipeline,
}

impl ConversationTurn {
    pub fn render(&self) -> String {
        format!(
            "{USER_ROLE}{}\n{ASSISTANT_ROLE}{}",
            self.user,
            self.assistant.render()
        )
    }
}

impl From<GeneratedUtterance> for ConversationTurn {
    fn from(utterance: GeneratedUtterance) -> Self {
        Self {
            user: utterance.text,
            assistant: utterance.pipeline,
        }
    }
}

/// FIFO of the most recent turns, at most `capacity` long
#[derive(Debug, Clone)]
pub struct HistoryWindow {
    turns: VecDeque<ConversationTurn>,
    capacity: usize,
}

impl HistoryWindow {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(SynthError::Config(
                "history window capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append a turn, evicting the oldest ones past capacity.
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.capacity {
            self.turns.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    /// Oldest first; empty string when there is no history.
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(ConversationTurn::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Primitive;

    fn turn(text: &str, step: Primitive) -> ConversationTurn {
        ConversationTurn {
            user: text.to_string(),
            assistant: Pipeline::new(vec![step]),
        }
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut window = HistoryWindow::new(3).unwrap();
        for i in 0..7 {
            window.push(turn(&format!("turn {i}"), Primitive::Home));
            assert!(window.len() <= 3);
        }
        let kept: Vec<&str> = window.turns().map(|t| t.user.as_str()).collect();
        assert_eq!(kept, vec!["turn 4", "turn 5", "turn 6"]);
    }

    #[test]
    fn test_render_blocks() {
        let mut window = HistoryWindow::new(2).unwrap();
        assert_eq!(window.render(), "");
        window.push(turn("Start the massage robot", Primitive::Start));
        window.push(ConversationTurn {
            user: "Find my neck".to_string(),
            assistant: Pipeline::new(vec![
                Primitive::DetectBodyPart(crate::primitives::BodyPart::Neck),
            ]),
        });
        assert_eq!(
            window.render(),
            "User: Start the massage robot\nAssistant: start()\nUser: Find my neck\nAssistant: [x, y, z] = detect_body_part('neck')"
        );
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(HistoryWindow::new(0).is_err());
    }
}
