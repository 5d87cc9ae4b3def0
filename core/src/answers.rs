//! Answer sources for the eight ball.
//!
//! An `AnswerSource` hands out one phrase per call. The standard source is
//! `FixedAnswerSet`, the twenty phrases printed on the die inside the toy.

use std::fmt::Debug;
use std::sync::Arc;

use rand::Rng;

use crate::errors::{EightBallError, EightBallResult};

/// The classic phrases: ten affirmative, five non-committal, five negative
pub const STANDARD_ANSWERS: [&str; 20] = [
    "It is certain",
    "It is decidedly so",
    "Without a doubt",
    "Yes definitely",
    "You may rely on it",
    "As I see it, yes",
    "Most likely",
    "Outlook good",
    "Yes",
    "Signs point to yes",
    "Reply hazy, try again",
    "Ask again later",
    "Better not tell you now",
    "Cannot predict now",
    "Concentrate and ask again",
    "Don't count on it",
    "My reply is no",
    "My sources say no",
    "Outlook not so good",
    "Very doubtful",
];

/// Trait implemented by anything that can produce an answer phrase.
///
/// Implementations are shared across worker threads and must not need
/// external locking.
pub trait AnswerSource: Send + Sync + Debug {
    /// Pick one answer
    fn draw(&self) -> EightBallResult<String>;
}

/// Type alias for Arc-wrapped AnswerSource trait objects
pub type AnswerSourceRef = Arc<dyn AnswerSource>;

/// Immutable answer set drawn from uniformly at random
#[derive(Debug, Clone)]
pub struct FixedAnswerSet {
    phrases: &'static [&'static str],
}

impl FixedAnswerSet {
    /// The standard twenty-phrase set
    pub fn standard() -> Self {
        Self {
            phrases: &STANDARD_ANSWERS,
        }
    }

    pub fn phrases(&self) -> &'static [&'static str] {
        self.phrases
    }

    pub fn contains(&self, answer: &str) -> bool {
        self.phrases.iter().any(|phrase| *phrase == answer)
    }
}

impl Default for FixedAnswerSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl AnswerSource for FixedAnswerSet {
    fn draw(&self) -> EightBallResult<String> {
        if self.phrases.is_empty() {
            return Err(EightBallError::AnswerSource(
                "answer set is empty".to_string(),
            ));
        }
        // Thread-local generator, so concurrent draws never contend
        let index = rand::rng().random_range(0..self.phrases.len());
        Ok(self.phrases[index].to_string())
    }
}
