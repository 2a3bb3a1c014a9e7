use thiserror::Error;

/// Infrastructure errors that can occur during application startup.
///
/// SECURITY: Display messages are sanitized and safe for logs/console output.
/// Debug output includes the full #[source] error chain which may contain
/// secrets (e.g., the decoded service account) - use Display (%e) not Debug
/// (?e) in logs.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("FIREBASE_CREDENTIALS is not valid base64")]
    CredentialEncoding(#[source] base64::DecodeError),

    #[error("FIREBASE_CREDENTIALS does not contain a service account")]
    CredentialFormat(#[source] serde_json::Error),

    #[error("Service account private key is not a valid RSA PEM key")]
    CredentialKey(#[source] jsonwebtoken::errors::Error),

    #[error("Log file could not be created")]
    LogFile(#[source] std::io::Error),

    #[error("TCP bind failed")]
    TcpBind(#[source] std::io::Error),

    #[error("Server error")]
    Server(#[source] std::io::Error),
}
