//! Date formats shared by the HTTP payloads and the stored documents.
//!
//! Everything is rendered in the server's local time zone, which is what the
//! back office reads.

use chrono::{DateTime, Duration, Local, TimeZone};

/// `YYYY-MM-DDTHH:MM:SS.ffffff`, no offset.
pub fn iso_local(at: DateTime<Local>) -> String {
    at.naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Unix seconds as `YYYY-MM-DD HH:MM:SS`.
pub fn unix_to_local(secs: i64) -> Option<String> {
    Local
        .timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Due date of a boleto issued at `issued_at`, as `YYYY-MM-DD`.
pub fn due_date(issued_at: DateTime<Local>, days: i64) -> String {
    (issued_at + Duration::days(days)).format("%Y-%m-%d").to_string()
}

/// `dd/mm/YYYY às HH:MM:SS`, used for plan enrolment dates.
pub fn br_datetime(at: DateTime<Local>) -> String {
    at.format("%d/%m/%Y às %H:%M:%S").to_string()
}
