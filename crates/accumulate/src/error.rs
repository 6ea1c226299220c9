//! Error types for the piena-accumulate crate.

/// Error type for all fallible operations in the piena-accumulate crate.
///
/// Missing and corrupt frames are never errors here; they are tallied on the
/// produced [`CumulativeGrid`](crate::CumulativeGrid)s.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AccumulateError {
    /// Returned when no durations are configured.
    #[error("no cumulation durations configured")]
    NoDurations,

    /// Returned when a duration is zero hours.
    #[error("cumulation duration must be >= 1 hour, got {hours}")]
    InvalidDuration {
        /// The invalid duration.
        hours: u32,
    },

    /// Returned when the same duration is configured twice.
    #[error("duplicate cumulation duration {hours}")]
    DuplicateDuration {
        /// The duplicated duration.
        hours: u32,
    },
}
