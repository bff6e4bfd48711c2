use thiserror::Error;

/// Input-shape problems surfaced to the caller for user-facing messaging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("identity is required")]
    EmptyIdentity,
    #[error("identity is not a valid email address")]
    InvalidEmail,
    #[error("password confirmation does not match")]
    PasswordMismatch,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("password must be at most {max} characters")]
    PasswordTooLong { max: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    /// Generic login denial; never says which check failed.
    #[error("invalid credentials")]
    AuthFailure,
    /// Generic session denial; malformed, unknown and expired tokens all map here.
    #[error("invalid session")]
    Invalid,
    #[error("identity already registered")]
    Conflict,
    #[error("password encoding error")]
    Encoding,
    #[error("invalid hasher configuration: {0}")]
    Config(String),
    #[error("failed to generate session token")]
    Token,
    #[error("credential store failure: {0}")]
    Store(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors reported by credential and session store backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => Self::Conflict,
            StoreError::NotFound => Self::AuthFailure,
            StoreError::Backend(message) => Self::Store(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_auth_errors() {
        assert!(matches!(Error::from(StoreError::Conflict), Error::Conflict));
        assert!(matches!(
            Error::from(StoreError::NotFound),
            Error::AuthFailure
        ));
        assert!(matches!(
            Error::from(StoreError::Backend("down".to_string())),
            Error::Store(message) if message == "down"
        ));
    }

    #[test]
    fn validation_messages_are_user_facing() {
        let err = Error::from(ValidationError::PasswordTooShort { min: 6 });
        assert_eq!(
            err.to_string(),
            "validation failed: password must be at least 6 characters"
        );
    }
}
