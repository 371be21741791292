// src/error.rs

use thiserror::Error;

use crate::db::StoreError;

/// Errors surfaced by the relay pipeline and its controls.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("console I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_keep_their_message() {
        let e: RelayError = StoreError::Poisoned.into();
        assert!(matches!(e, RelayError::Store(StoreError::Poisoned)));
        assert_eq!(e.to_string(), "store lock poisoned");
    }
}
