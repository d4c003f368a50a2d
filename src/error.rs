use thiserror::Error;

/// Everything that can stop a quiz session from starting. All variants are
/// recovered at the session-start boundary: the caller shows the message and
/// stays on the setup screen, and neither the subjects nor the question bank
/// are touched by the failed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizStartError {
    #[error("Subject not found")]
    SubjectNotFound,
    #[error("No questions available for this quiz mode.")]
    NoQuestionsAvailable,
    #[error("Failed to generate questions: {0}")]
    GenerationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_user_facing() {
        assert_eq!(QuizStartError::SubjectNotFound.to_string(), "Subject not found");
        assert_eq!(
            QuizStartError::NoQuestionsAvailable.to_string(),
            "No questions available for this quiz mode."
        );
        assert_eq!(
            QuizStartError::GenerationFailed("timed out".to_string()).to_string(),
            "Failed to generate questions: timed out"
        );
    }
}
