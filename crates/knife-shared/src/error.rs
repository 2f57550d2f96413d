use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Invalid {kind}: {value:?}")]
    InvalidId { kind: &'static str, value: String },

    #[error("Invalid visibility: {0:?} (expected 0-3 or a tier name)")]
    InvalidPublicRange(String),
}
