use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// A required request or metadata field is missing or malformed.
    /// The message is shown to the caller as-is.
    #[error("{0}")]
    InvalidField(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Payment processor error: {0}")]
    Processor(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Document store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug)]
pub enum ErrorCode {
    InvalidField,
    InvalidInput,
    InvalidSignature,
    PaymentProcessorError,
    NotFound,
    StoreError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidField => "INVALID_FIELD",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::InvalidSignature => "INVALID_SIGNATURE",
            ErrorCode::PaymentProcessorError => "PAYMENT_PROCESSOR_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::StoreError => "STORE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl AppError {
    pub fn missing(message: impl Into<String>) -> Self {
        AppError::InvalidField(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidField(_) => ErrorCode::InvalidField,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::InvalidSignature(_) => ErrorCode::InvalidSignature,
            AppError::Processor(_) => ErrorCode::PaymentProcessorError,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Store(_) => ErrorCode::StoreError,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
