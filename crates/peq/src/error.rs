use thiserror::Error;

/// Errors raised by the equivalent precipitation transform.
#[derive(Debug, Error, PartialEq)]
pub enum PeqError {
    #[error("curve number {cn} is outside (0, 100]")]
    CnOutOfRange { cn: f64 },

    #[error("initial abstraction ratio {lambda} is outside [0, 1)")]
    InvalidLambda { lambda: f64 },
}
