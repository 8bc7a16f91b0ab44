/// Errors coming back from the backend collaborator.
///
/// `Rejected` carries the server's own message verbatim so it can be shown
/// to the user unchanged; everything else gets the generic fallback at the
/// presentation edge.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { message: String },

    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Message to put in front of the user: server-provided when we have one,
    /// generic fallback otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message } => message.clone(),
            _ => "No pudimos completar la operación. Intenta nuevamente.".to_string(),
        }
    }
}
