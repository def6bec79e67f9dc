/// Translation jobs are keyed by a random UUID v4, rendered hyphenated on the wire.
pub type JobId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Allocate a fresh, never-reused job identifier.
pub fn new_job_id() -> JobId {
    uuid::Uuid::new_v4()
}

/// Parse a client-supplied identifier.
///
/// Anything that is not a UUID yields `None` and is treated by callers
/// exactly like an identifier that was never issued.
pub fn parse_job_id(raw: &str) -> Option<JobId> {
    uuid::Uuid::parse_str(raw.trim()).ok()
}
