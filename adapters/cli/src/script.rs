//! Movement scripts for unattended runs.
//!
//! A script is a string of steps, one per frame, repeated until the run
//! stops: `l`, `r`, `u` and `d` walk the hero left, right, up and down, `.`
//! stands still. Whitespace is ignored.

use thiserror::Error;

/// Scroll intent for one frame. The maze scrolls opposite to the hero's walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Step {
    pub(crate) right: i32,
    pub(crate) down: i32,
}

/// Errors raised while parsing a movement script.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// The script holds no steps.
    #[error("movement script is empty")]
    Empty,
    /// A character is not a known step.
    #[error("unknown step {step:?} at position {position}")]
    UnknownStep {
        /// Offending character.
        step: char,
        /// Character index within the script.
        position: usize,
    },
}

/// Parsed, endlessly repeating movement script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Script {
    steps: Vec<Step>,
}

impl Script {
    pub(crate) fn parse(source: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        for (position, step) in source.chars().enumerate() {
            let (right, down) = match step {
                'l' => (1, 0),
                'r' => (-1, 0),
                'u' => (0, 1),
                'd' => (0, -1),
                '.' => (0, 0),
                step if step.is_whitespace() => continue,
                step => return Err(ScriptError::UnknownStep { step, position }),
            };
            steps.push(Step { right, down });
        }
        if steps.is_empty() {
            return Err(ScriptError::Empty);
        }
        Ok(Self { steps })
    }

    /// Step for the given zero-based frame.
    pub(crate) fn step(&self, frame: u64) -> Step {
        self.steps[(frame % self.steps.len() as u64) as usize]
    }
}
