/// Domain errors raised by the rules in this crate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Client input broke a rule; the message is safe to show.
    #[error("Validation failed: {0}")]
    Validation(String),
}
