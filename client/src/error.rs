use thiserror::Error;

/// Failures the reconciliation core can report.
///
/// None of these are retried; the caller decides whether to log and
/// drop the offending operation or abort startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Coordinate outside the fixed board dimensions. Should not happen
    /// with a correctly synced board; log and drop the operation.
    #[error("coordinate ({x}, {y}) is outside the board")]
    OutOfBounds { x: i32, y: i32 },

    /// Inbound payload carried a rotation that is not one of the four
    /// cardinal headings. The update is dropped, prior state kept.
    #[error("rotation {0} is not a cardinal heading")]
    InvalidRotation(i16),

    /// A bullet spawn reused an id that already has a live simulation.
    /// The new spawn is dropped, the existing simulation kept.
    #[error("bullet {0} already has an active simulation")]
    DuplicateBulletId(String),

    /// The join handshake or the post-match reset request failed.
    #[error("request failed: {0}")]
    RequestFailed(String),
}
