//! Service words and named command sequences
//!
//! A sequence fires when an utterance matches its name exactly; the backend
//! then runs each step as if it had been spoken.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error when a special command cannot be registered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecialCommandError {
    #[error("Service word is empty")]
    EmptyWord,

    #[error("Sequence name is empty")]
    EmptyName,

    #[error("Sequence has no steps")]
    NoSteps,
}

/// Validated, trimmed service word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceWord {
    word: String,
}

impl ServiceWord {
    pub fn new(word: &str) -> Result<Self, SpecialCommandError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(SpecialCommandError::EmptyWord);
        }
        Ok(Self {
            word: word.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.word
    }
}

/// A named list of commands run in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSequence {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<String>,
    /// Creation time as reported by the backend
    #[serde(default, skip_serializing)]
    pub ts: Option<String>,
}

impl CommandSequence {
    /// Build a sequence from raw input.
    ///
    /// The name and every step are trimmed; blank steps are dropped. At least
    /// one step must remain.
    pub fn new<I, S>(name: &str, steps: I, description: &str) -> Result<Self, SpecialCommandError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(SpecialCommandError::EmptyName);
        }

        let steps: Vec<String> = steps
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if steps.is_empty() {
            return Err(SpecialCommandError::NoSteps);
        }

        Ok(Self {
            name: name.to_string(),
            description: description.trim().to_string(),
            steps,
            ts: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_word_is_trimmed() {
        let word = ServiceWord::new("  Алиса ").unwrap();
        assert_eq!(word.as_str(), "Алиса");
        assert_eq!(
            serde_json::to_value(&word).unwrap(),
            serde_json::json!({"word": "Алиса"})
        );
    }

    #[test]
    fn blank_service_word_is_rejected() {
        assert_eq!(ServiceWord::new(" \t"), Err(SpecialCommandError::EmptyWord));
    }

    #[test]
    fn sequence_steps_are_trimmed_and_filtered() {
        let seq = CommandSequence::new(
            " good night ",
            ["  turn off the light", "", "   ", "lock the door "],
            "",
        )
        .unwrap();
        assert_eq!(seq.name, "good night");
        assert_eq!(seq.steps, vec!["turn off the light", "lock the door"]);
    }

    #[test]
    fn sequence_needs_a_name() {
        let err = CommandSequence::new("  ", ["turn off the light"], "").unwrap_err();
        assert_eq!(err, SpecialCommandError::EmptyName);
    }

    #[test]
    fn sequence_needs_a_non_blank_step() {
        let err = CommandSequence::new("bedtime", ["", "  "], "").unwrap_err();
        assert_eq!(err, SpecialCommandError::NoSteps);

        let none: [&str; 0] = [];
        let err = CommandSequence::new("bedtime", none, "").unwrap_err();
        assert_eq!(err, SpecialCommandError::NoSteps);
    }

    #[test]
    fn request_body_omits_timestamp() {
        let seq = CommandSequence::new("bedtime", ["lights off"], "evening").unwrap();
        assert_eq!(
            serde_json::to_value(&seq).unwrap(),
            serde_json::json!({
                "name": "bedtime",
                "description": "evening",
                "steps": ["lights off"]
            })
        );
    }

    #[test]
    fn backend_sequence_parses_with_timestamp() {
        let seq: CommandSequence = serde_json::from_str(
            r#"{"name":"bedtime","description":"","steps":["lights off"],"ts":"2024-05-01T21:00:00"}"#,
        )
        .unwrap();
        assert_eq!(seq.ts.as_deref(), Some("2024-05-01T21:00:00"));
        assert_eq!(seq.steps, vec!["lights off"]);
    }
}
