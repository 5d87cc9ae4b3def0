// Core of the eight ball service:
// - Answer sources
// - Question responder and batch dispatcher
// - Request/response data structures
// - Configuration loading
// - Shared error types
// - Request log capability

// Export answers module - Fixed answer set and the AnswerSource trait
pub mod answers;
pub use answers::{AnswerSource, AnswerSourceRef, FixedAnswerSet, STANDARD_ANSWERS};

// Export responder module - Answers one question at a time
pub mod responder;
pub use responder::QuestionResponder;

// Export dispatcher module - Concurrent fan-out over a batch of questions
pub mod dispatcher;
pub use dispatcher::{BatchDispatcher, DispatchLimits};

// Export types module - Request/response data structures
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

// Export request_log module - Operational log sink
pub mod request_log;
pub use request_log::{MemoryRequestLog, RequestLog, RequestLogRef, TracingRequestLog};
