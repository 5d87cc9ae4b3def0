//! Fan-out of a batch of questions.
//!
//! Every question gets its own unit of work on the blocking thread pool. The
//! dispatcher waits for all of them before it hands back anything, then orders
//! the records by how long each one took.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::{task, time};
use tracing::{debug, warn};

use crate::config::EightBallConfig;
use crate::errors::EightBallError;
use crate::responder::{elapsed_millis_since, QuestionResponder};
use crate::types::ResponseRecord;

/// Bounds applied to a single dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchLimits {
    /// Maximum number of questions answered at the same time. `None` runs all at once.
    pub max_concurrency: Option<usize>,
    /// How long one question may take before it is reported as failed
    pub question_timeout: Option<Duration>,
}

impl DispatchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EightBallConfig) -> Self {
        Self {
            max_concurrency: config.resolved_max_concurrency(),
            question_timeout: config.resolved_question_timeout(),
        }
    }
}

/// Answers a batch of questions concurrently
#[derive(Debug, Clone)]
pub struct BatchDispatcher {
    responder: QuestionResponder,
    limits: DispatchLimits,
}

impl BatchDispatcher {
    pub fn new(responder: QuestionResponder, limits: DispatchLimits) -> Self {
        Self { responder, limits }
    }

    /// Answer every question and return the records sorted by elapsed time.
    ///
    /// Question numbers follow input order. Failures of individual questions
    /// show up as `internal_error` records; the batch itself never fails.
    pub async fn dispatch(&self, questions: Vec<String>) -> Vec<ResponseRecord> {
        let permits = self
            .limits
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit.max(1))));

        debug!(
            count = questions.len(),
            max_concurrency = ?self.limits.max_concurrency,
            "Dispatching questions"
        );

        let units = questions.into_iter().enumerate().map(|(index, question)| {
            let question_number = u32::try_from(index + 1).unwrap_or(u32::MAX);
            self.run_unit(question_number, question, permits.clone())
        });

        let mut records = join_all(units).await;
        sort_records(&mut records);
        records
    }

    async fn run_unit(
        &self,
        question_number: u32,
        question: String,
        permits: Option<Arc<Semaphore>>,
    ) -> ResponseRecord {
        // Held by this future, not the blocking task, so a timed-out unit frees its slot
        let _permit = match permits {
            Some(semaphore) => match semaphore.acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(e) => {
                    let error = EightBallError::TaskFailed(format!(
                        "concurrency limiter closed: {}",
                        e
                    ));
                    return failed_record(question_number, question, Instant::now(), error);
                }
            },
            None => None,
        };

        let started = Instant::now();
        let responder = self.responder.clone();
        let asked = question.clone();
        let handle = task::spawn_blocking(move || responder.answer(question_number, &asked));

        let joined = match self.limits.question_timeout {
            Some(limit) => match time::timeout(limit, handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    let error = EightBallError::Timeout {
                        question_number,
                        after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    };
                    return failed_record(question_number, question, started, error);
                }
            },
            None => handle.await,
        };

        match joined {
            Ok(record) => record,
            Err(join_error) => {
                let error = EightBallError::TaskFailed(join_error.to_string());
                failed_record(question_number, question, started, error)
            }
        }
    }
}

fn failed_record(
    question_number: u32,
    question: String,
    started: Instant,
    error: EightBallError,
) -> ResponseRecord {
    warn!(error = %error, question_number, "Question could not be answered");
    ResponseRecord::internal_error(question_number, question, elapsed_millis_since(started))
}

/// Ascending by elapsed time; equal times keep submission order
pub fn sort_records(records: &mut [ResponseRecord]) {
    records.sort_by_key(|record| (record.elapsed_millis, record.question_number));
}
