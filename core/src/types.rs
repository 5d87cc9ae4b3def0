use serde::{Deserialize, Serialize};

/// Message carried by every record whose answer could not be obtained
pub const INTERNAL_ERROR_MESSAGE: &str = "Error interacting with answer source";

/// Batch of questions submitted in one request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionRequest {
    pub questions: Vec<String>,
}

/// Outcome of answering a single question
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    InternalError,
}

/// Result of asking the eight ball one question.
///
/// Records are plain owned values. Once handed out, nothing else holds a
/// reference into them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    /// 1-based position of the question in the submitted order
    pub question_number: u32,
    pub question: String,
    pub answer: String,
    pub elapsed_millis: u64,
    pub status: Status,
    /// Empty on success
    pub message: String,
}

impl ResponseRecord {
    pub fn answered(
        question_number: u32,
        question: impl Into<String>,
        answer: impl Into<String>,
        elapsed_millis: u64,
    ) -> Self {
        Self {
            question_number,
            question: question.into(),
            answer: answer.into(),
            elapsed_millis,
            status: Status::Success,
            message: String::new(),
        }
    }

    pub fn internal_error(
        question_number: u32,
        question: impl Into<String>,
        elapsed_millis: u64,
    ) -> Self {
        Self {
            question_number,
            question: question.into(),
            answer: String::new(),
            elapsed_millis,
            status: Status::InternalError,
            message: INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_serializes_with_camel_case_fields() {
        let record = ResponseRecord::answered(1, "Will it rain?", "Yes", 0);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(
            value,
            json!({
                "questionNumber": 1,
                "question": "Will it rain?",
                "answer": "Yes",
                "elapsedMillis": 0,
                "status": "success",
                "message": ""
            })
        );
    }

    #[test]
    fn test_internal_error_record() {
        let record = ResponseRecord::internal_error(3, "Am I lucky?", 2);

        assert!(!record.is_success());
        assert_eq!(record.status, Status::InternalError);
        assert_eq!(record.message, INTERNAL_ERROR_MESSAGE);
        assert!(record.answer.is_empty());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], "internal_error");
    }

    #[test]
    fn test_question_request_requires_questions_field() {
        let parsed: QuestionRequest =
            serde_json::from_str(r#"{"questions": ["a", "b"]}"#).unwrap();
        assert_eq!(parsed.questions, vec!["a".to_string(), "b".to_string()]);

        let empty: QuestionRequest = serde_json::from_str(r#"{"questions": []}"#).unwrap();
        assert!(empty.questions.is_empty());

        assert!(serde_json::from_str::<QuestionRequest>("{}").is_err());
        assert!(serde_json::from_str::<QuestionRequest>(r#"{"questions": "a"}"#).is_err());
    }

    #[test]
    fn test_cloned_record_is_independent() {
        let original = ResponseRecord::answered(1, "q", "Yes", 0);
        let mut copy = original.clone();
        copy.answer.push_str(" indeed");

        assert_eq!(original.answer, "Yes");
    }
}
