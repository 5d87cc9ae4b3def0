use std::time::Instant;

use tracing::{debug, warn};

use crate::answers::AnswerSourceRef;
use crate::types::ResponseRecord;

/// Asks the answer source a single question and times the exchange
#[derive(Debug, Clone)]
pub struct QuestionResponder {
    source: AnswerSourceRef,
}

impl QuestionResponder {
    pub fn new(source: AnswerSourceRef) -> Self {
        Self { source }
    }

    /// Answer one question.
    ///
    /// Never fails: a source error is folded into an `internal_error` record
    /// so that callers answering several questions keep going.
    pub fn answer(&self, question_number: u32, question: &str) -> ResponseRecord {
        let started = Instant::now();
        let drawn = self.source.draw();
        let elapsed_millis = elapsed_millis_since(started);

        match drawn {
            Ok(answer) => {
                debug!(question_number, elapsed_millis, "Answered question");
                ResponseRecord::answered(question_number, question, answer, elapsed_millis)
            }
            Err(e) => {
                warn!(error = %e, question_number, "Failed to draw an answer");
                ResponseRecord::internal_error(question_number, question, elapsed_millis)
            }
        }
    }
}

/// Whole milliseconds elapsed since `started`, saturating at `u64::MAX`
pub fn elapsed_millis_since(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
