use validator::ValidateEmail;

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// Removes the punctuation Brazilian documents are usually typed with.
///
/// Only literal `.` and `-` are stripped; slashes, spaces and letters are kept
/// so that the processor rejects a malformed CPF/CNPJ instead of us guessing.
pub fn strip_document_punctuation(raw: &str) -> String {
    raw.chars().filter(|c| *c != '.' && *c != '-').collect()
}

/// True when the value is absent or blank after trimming.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}
