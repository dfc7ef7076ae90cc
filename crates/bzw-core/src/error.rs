/// Alias for `Result<T, BzwError>`.
pub type BzwResult<T> = Result<T, BzwError>;

/// Errors raised when converting raw text into model values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BzwError {
    /// The keyword does not name one of the world object kinds.
    #[error("unknown object kind: \"{0}\"")]
    UnknownObjectKind(String),

    /// The character is not a teleporter side (`f`, `b`, `?`, `*`).
    #[error("unknown teleporter side: '{0}'")]
    UnknownSide(char),

    /// The text is neither `good`, `bad`, nor a one or two letter flag code.
    #[error("invalid flag code: \"{0}\"")]
    InvalidFlagCode(String),
}
