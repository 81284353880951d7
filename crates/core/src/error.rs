/// Reasons a request can fail identity resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("No token, authorization denied")]
    MissingToken,

    #[error("Token is not valid")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The entity does not exist, or its id is not a valid id at all.
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("User already exists")]
    DuplicateEmail,

    /// Deliberately identical for "unknown email" and "wrong password".
    #[error("Invalid Credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Unauthorized(#[from] AuthFailure),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
