use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("clipboard rejected text: {0}")]
    Clipboard(String),

    #[error("icon fetch failed for {id}: {reason}")]
    Fetch { id: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
