use thiserror::Error;

/// Error taxonomy for the assistant core.
///
/// Validation and precondition failures (`InvalidArgument`,
/// `TokenLimitExceeded`, `EmptyHistory`) surface immediately and are never
/// retried. `QuotaExceeded` is the one transient class: index builds retry it
/// with a fixed backoff before giving up.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Input exceeds the maximum token limit of {0} tokens.")]
    TokenLimitExceeded(usize),
    #[error("Vector index not found. Please upload documents to create the index.")]
    IndexNotFound,
    #[error("provider quota exceeded: {0}")]
    QuotaExceeded(String),
    #[error("provider error: {0}")]
    Provider(String),
    #[error("conversation history is empty")]
    EmptyHistory,
    #[error("storage error: {0}")]
    Storage(String),
}

impl AssistantError {
    pub fn provider<E: std::fmt::Display>(err: E) -> Self {
        AssistantError::Provider(err.to_string())
    }

    pub fn storage<E: std::fmt::Display>(err: E) -> Self {
        AssistantError::Storage(err.to_string())
    }

    /// Render the error as the text shown at the conversational boundary.
    /// Callers of that boundary only ever see readable sentences.
    pub fn to_user_message(&self) -> String {
        match self {
            AssistantError::InvalidArgument(_) | AssistantError::TokenLimitExceeded(_) => {
                format!("Validation error: {self}")
            }
            AssistantError::IndexNotFound => self.to_string(),
            other => format!("An unexpected error occurred: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_limit_renders_as_validation_error() {
        let message = AssistantError::TokenLimitExceeded(2048).to_user_message();
        assert_eq!(
            message,
            "Validation error: Input exceeds the maximum token limit of 2048 tokens."
        );
    }

    #[test]
    fn missing_index_renders_its_own_instruction() {
        let message = AssistantError::IndexNotFound.to_user_message();
        assert_eq!(
            message,
            "Vector index not found. Please upload documents to create the index."
        );
    }

    #[test]
    fn provider_failures_render_as_unexpected() {
        let message = AssistantError::Provider("connection refused".to_string()).to_user_message();
        assert_eq!(
            message,
            "An unexpected error occurred: provider error: connection refused"
        );
    }
}
