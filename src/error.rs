use thiserror::Error;

use crate::persistence::StoreError;
use crate::platform::ScanSourceError;
use crate::sim::ScanError;

/// Every failure the player can be told about
///
/// None of these are fatal; each ends the current scan attempt only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    ScanSource(#[from] ScanSourceError),

    #[error("progress could not be saved: {0}")]
    Store(#[from] StoreError),
}

impl GameError {
    /// Store failures leave the game playable but it will not survive a reload
    pub fn is_store_failure(&self) -> bool {
        matches!(self, GameError::Store(_))
    }
}
