use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("captured frame could not be converted: {0}")]
    Convert(String),

    #[error("failed to write {path}: {reason}")]
    Write { path: String, reason: String },
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("{var} is not a valid u64 seed: {value:?}")]
    Invalid { var: &'static str, value: String },
}
