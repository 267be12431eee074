use workforce_core::error::{CoreError, ErrorKind};

use crate::store::StoreError;

/// Error returned by every engine operation.
///
/// Domain failures arrive as [`CoreError`]; anything the store could not do
/// is an opaque [`StoreError`] and is never retried here.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Core(core) => core.kind(),
            Self::Store(_) => ErrorKind::Internal,
        }
    }

    /// The domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            Self::Core(core) => Some(core),
            Self::Store(_) => None,
        }
    }
}
