use thiserror::Error as ThisError;

/// The failure reports shared by every primitive in the crate.
///
/// All of these are local, synchronous conditions: they are returned to the
/// caller of the operation that detected them and never tear down the
/// process. The enum is `Clone` because stored failures are re-delivered on
/// every read of a result slot, and `PartialEq` so tests and callers can
/// match on exact outcomes.
///
/// `Abandoned` stands apart from the rest: it is not a programmer error but
/// a legitimate runtime condition, raised on behalf of a producer that was
/// destroyed before delivering a result. It travels through the same channel
/// as user failures and is distinguished only by its kind and message.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// A read of a slot that has nothing in it yet.
    #[error("result has not been set")]
    NotSet,

    /// A second write to a slot or result cell.
    #[error("result has already been set")]
    AlreadySet,

    /// A second `get_future` call on the same promise.
    #[error("future has already been retrieved")]
    FutureAlreadyRetrieved,

    /// The producer side of a result cell was dropped while a consumer was
    /// still expecting a result.
    #[error("producer destroyed before a result was produced")]
    Abandoned,

    /// An arbitrary, message-carrying failure raised by user code.
    #[error("{0}")]
    Failed(String),

    /// A panic captured at a task frame boundary.
    #[error("panicked: {0}")]
    Panicked(String),
}

impl Error {
    /// Wraps an arbitrary failure message as an [`Error::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// The result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
