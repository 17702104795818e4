use thiserror::Error;

use crate::state::StateError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("IO/Terminal error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("State error: {0}")]
    StateError(#[from] StateError),

    #[error("Render error: {0}")]
    RenderError(String),
}
