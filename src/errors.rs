use thiserror::Error;

/// Message shown when a scanned tag does not belong to the artwork.
pub const TAG_MISMATCH_REASON: &str =
    "NFC tag doesn't match the expected ID. Please try again or contact support.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtifyError {
    #[error("Verification failed: {reason}")]
    VerificationFailed { reason: String },
    #[error("Capability not available: {capability}")]
    UnsupportedCapability { capability: String },
    #[error("Artwork not found: {0}")]
    ArtworkNotFound(String),
    #[error("Artwork mismatch: expected {expected}, got {actual}")]
    ArtworkMismatch { expected: String, actual: String },
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
    #[error("Cannot {operation} while {state}")]
    InvalidTransition { operation: String, state: String },
    #[error("Payment failed: {0}")]
    PaymentFailed(String),
}

impl ArtifyError {
    pub fn invalid_transition(operation: &str, state: impl std::fmt::Display) -> Self {
        ArtifyError::InvalidTransition {
            operation: operation.to_string(),
            state: state.to_string(),
        }
    }

    /// Whether the user can recover by trying the same action again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ArtifyError::VerificationFailed { .. } | ArtifyError::PaymentFailed(_)
        )
    }

    /// Text suitable for rendering directly in a confirmation or error panel.
    pub fn user_message(&self) -> String {
        match self {
            ArtifyError::VerificationFailed { reason } => reason.clone(),
            ArtifyError::UnsupportedCapability { .. } => {
                "Your device doesn't support NFC. Please use a compatible device.".to_string()
            }
            ArtifyError::ArtworkNotFound(id) => {
                format!("We couldn't find an artwork with id '{id}'.")
            }
            ArtifyError::ArtworkMismatch { .. } => {
                "This verification belongs to a different artwork. Please scan again.".to_string()
            }
            ArtifyError::InvalidPrice(detail) => {
                format!("This artwork cannot be priced right now ({detail}).")
            }
            ArtifyError::InvalidTransition { operation, state } => {
                format!("You can't {operation} right now: the purchase is {state}.")
            }
            ArtifyError::PaymentFailed(_) => {
                "Payment could not be processed. Please try again.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ArtifyError>;
